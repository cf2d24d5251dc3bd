use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;

use super::fetcher::SampleSource;
use super::types::{SampleError, SampleResult};

/// Hooks run by the coordinator task. `on_sample` runs once per completed
/// cycle, after the cached result is updated and before any waiter resumes.
pub trait SampleObserver: Send + Sync {
    fn on_poll_started(&self) {}

    fn on_coalesced(&self) {}

    fn on_sample(&self, result: &SampleResult, elapsed: Duration);
}

enum Command {
    Sample(oneshot::Sender<SampleResult>),
}

/// Single-flight poller with a sticky last-result cache.
///
/// All state lives in one spawned task; this handle only sends requests to it
/// and peeks at the published last result. At most one fetch runs at a time
/// and every request made while it runs receives that fetch's result.
#[derive(Clone)]
pub struct PollCoordinator {
    commands: mpsc::UnboundedSender<Command>,
    last_result: watch::Receiver<Option<SampleResult>>,
}

impl PollCoordinator {
    /// Spawn the coordinating task on the current Tokio runtime.
    ///
    /// `deadline` bounds a whole fetch; `None` waits for the source however
    /// long it takes.
    pub fn spawn(
        source: Arc<dyn SampleSource>,
        deadline: Option<Duration>,
        observers: Vec<Arc<dyn SampleObserver>>,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (last_tx, last_rx) = watch::channel(None);

        let worker = PollWorker {
            source,
            deadline,
            observers,
            commands: command_rx,
            last_result: last_tx,
            waiters: Vec::new(),
            fetches: JoinSet::new(),
            started_at: None,
        };
        tokio::spawn(worker.run());

        Self {
            commands,
            last_result: last_rx,
        }
    }

    /// Result of the poll in progress, starting one if the coordinator is idle
    pub fn request_sample(&self) -> PendingSample {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Sample(tx)).is_err() {
            tracing::debug!("Sample requested after the poll coordinator stopped");
        }
        PendingSample { receiver: rx }
    }

    pub fn last_known(&self) -> Option<SampleResult> {
        self.last_result.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SampleResult>> {
        self.last_result.clone()
    }

    /// Fire-and-forget poll used by the update timer
    pub fn tick(&self) {
        drop(self.request_sample());
    }
}

/// Awaitable handle on one poll cycle's result
pub struct PendingSample {
    receiver: oneshot::Receiver<SampleResult>,
}

impl Future for PendingSample {
    type Output = SampleResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(SampleError::Closed)))
    }
}

struct PollWorker {
    source: Arc<dyn SampleSource>,
    deadline: Option<Duration>,
    observers: Vec<Arc<dyn SampleObserver>>,
    commands: mpsc::UnboundedReceiver<Command>,
    last_result: watch::Sender<Option<SampleResult>>,
    waiters: Vec<oneshot::Sender<SampleResult>>,
    // Holds at most one fetch; non-empty means a poll is in flight
    fetches: JoinSet<SampleResult>,
    started_at: Option<Instant>,
}

impl PollWorker {
    async fn run(mut self) {
        loop {
            tokio::select! {
                Some(joined) = self.fetches.join_next() => {
                    let result = joined.unwrap_or_else(|e| Err(SampleError::Internal(e.to_string())));
                    self.complete(result);
                }
                command = self.commands.recv() => match command {
                    Some(Command::Sample(waiter)) => self.attach(waiter),
                    None => break,
                },
            }
        }

        tracing::debug!("Poll coordinator stopped");
    }

    fn attach(&mut self, waiter: oneshot::Sender<SampleResult>) {
        self.waiters.push(waiter);

        if !self.fetches.is_empty() {
            tracing::debug!("Joining in-flight poll as previous response hasn't arrived yet");
            for observer in &self.observers {
                observer.on_coalesced();
            }
            return;
        }

        let source = Arc::clone(&self.source);
        let deadline = self.deadline;
        self.started_at = Some(Instant::now());
        for observer in &self.observers {
            observer.on_poll_started();
        }

        self.fetches.spawn(async move {
            match deadline {
                Some(limit) => tokio::time::timeout(limit, source.fetch())
                    .await
                    .unwrap_or(Err(SampleError::Deadline(limit))),
                None => source.fetch().await,
            }
        });
    }

    fn complete(&mut self, result: SampleResult) {
        let elapsed = self
            .started_at
            .take()
            .map(|started| started.elapsed())
            .unwrap_or_default();

        self.last_result.send_replace(Some(result.clone()));

        for observer in &self.observers {
            observer.on_sample(&result, elapsed);
        }

        for waiter in self.waiters.drain(..) {
            // Timer ticks drop their receiver
            let _ = waiter.send(result.clone());
        }
    }
}
