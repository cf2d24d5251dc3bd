pub mod metrics;
pub mod sensor;
