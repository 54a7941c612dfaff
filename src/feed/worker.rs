//! Background fetch dispatch.
//!
//! Every fetch runs on its own thread and reports back over a channel that the
//! UI loop drains between frames. Outcomes carry the generation they were
//! issued under so the controller can tell stale answers apart.

use super::client::FeedSource;
use super::model::Feature;
use super::FeedRequest;
use crate::error::Result;
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Result of one completed fetch.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Generation the fetch was issued under.
    pub generation: u64,
    /// What was requested.
    pub request: FeedRequest,
    /// The snapshot, or why there is none.
    pub result: Result<Vec<Feature>>,
}

/// Runs fetches off the UI thread.
pub struct FetchWorker {
    source: Arc<dyn FeedSource>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
}

impl fmt::Debug for FetchWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchWorker").finish_non_exhaustive()
    }
}

impl FetchWorker {
    /// Create a worker over a feed source.
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx }
    }

    /// Start a fetch in the background.
    pub fn spawn(&self, request: FeedRequest, generation: u64) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("fetch-{}", generation))
            .spawn(move || {
                let result = source.fetch(&request);
                // The receiver only goes away when the app is shutting down.
                let _ = tx.send(FetchOutcome {
                    generation,
                    request,
                    result,
                });
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn fetch thread: {}", e);
            let _ = self.tx.send(FetchOutcome {
                generation,
                request,
                result: Err(e.into()),
            });
        }
    }

    /// Take a completed outcome if one is waiting.
    pub fn try_recv(&self) -> Option<FetchOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for a completed outcome.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeismoError;
    use crate::feed::Timeframe;

    struct Failing;

    impl FeedSource for Failing {
        fn fetch(&self, _request: &FeedRequest) -> Result<Vec<Feature>> {
            Err(SeismoError::HttpStatus { status: 500 })
        }
    }

    #[test]
    fn outcomes_carry_their_generation() {
        let worker = FetchWorker::new(Arc::new(Failing));
        let request = FeedRequest::Summary(Timeframe::AllHour);
        worker.spawn(request, 42);

        let outcome = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.generation, 42);
        assert_eq!(outcome.request, request);
        assert!(matches!(
            outcome.result,
            Err(SeismoError::HttpStatus { status: 500 })
        ));
        assert!(worker.try_recv().is_none());
    }
}
