pub mod types;
pub mod extractor;
pub mod fetcher;
pub mod coordinator;
pub mod classifier;
pub mod accessory;

pub use types::*;
pub use extractor::{extract, lookup, FieldPath};
pub use fetcher::{parse_sample, HttpSampleFetcher, SampleSource};
pub use coordinator::{PendingSample, PollCoordinator, SampleObserver};
pub use classifier::{classify, DetectionState};
pub use accessory::*;
