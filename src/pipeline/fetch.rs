use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::debug;

use crate::remote::{QuizService, RemoteError};
use crate::session::question::Question;

pub type Fetched = Result<Question, RemoteError>;

/// Issues question requests on a worker thread, at most one at a time.
///
/// A request attempted while another is outstanding is dropped: `spawn`
/// returns `None` and nothing is sent.
#[derive(Clone)]
pub struct QuestionFetcher {
    service: Arc<dyn QuizService>,
    in_flight: Arc<AtomicBool>,
}

impl QuestionFetcher {
    pub fn new(service: Arc<dyn QuizService>) -> Self {
        Self {
            service,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn spawn(&self, topic: &str) -> Option<PendingFetch> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("fetch for {topic:?} dropped, another request is in flight");
            return None;
        }

        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let guard = Arc::clone(&self.in_flight);
        let topic_owned = topic.to_string();
        debug!("fetching question for {topic:?}");

        thread::spawn(move || {
            let result = service.fetch_question(&topic_owned);
            // Release before delivering so the receiver can chain the next request.
            guard.store(false, Ordering::Release);
            let _ = tx.send(result);
        });

        Some(PendingFetch { rx })
    }
}

/// Handle to an outstanding question request. Dropping it orphans the
/// worker; its result is discarded.
pub struct PendingFetch {
    rx: Receiver<Fetched>,
}

impl PendingFetch {
    /// Non-blocking check. `None` while the request is still running.
    pub fn try_take(&self) -> Option<Fetched> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(RemoteError::Transport("fetch worker exited".to_string())))
            }
        }
    }

    #[cfg(test)]
    fn wait(self) -> Fetched {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(RemoteError::Transport("fetch worker exited".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::mpsc::Sender;

    use super::*;
    use crate::session::question::{AnswerRecord, sample_question};

    struct GatedService {
        gate: Mutex<Receiver<Fetched>>,
    }

    impl QuizService for GatedService {
        fn fetch_question(&self, _topic: &str) -> Fetched {
            let gate = self.gate.lock().unwrap();
            gate.recv()
                .unwrap_or_else(|_| Err(RemoteError::Transport("closed".into())))
        }

        fn fetch_feedback(&self, _results: &[AnswerRecord]) -> Result<String, RemoteError> {
            Err(RemoteError::Disabled)
        }
    }

    fn gated() -> (QuestionFetcher, Sender<Fetched>) {
        let (tx, rx) = mpsc::channel();
        let service = Arc::new(GatedService {
            gate: Mutex::new(rx),
        });
        (QuestionFetcher::new(service), tx)
    }

    #[test]
    fn second_request_is_dropped_while_first_is_outstanding() {
        let (fetcher, release) = gated();
        let first = fetcher.spawn("Percentages").unwrap();
        assert!(fetcher.is_busy());
        assert!(fetcher.spawn("Percentages").is_none());
        assert!(first.try_take().is_none());

        release.send(Ok(sample_question("one"))).unwrap();
        assert_eq!(first.wait().unwrap().prompt, "one");
        assert!(!fetcher.is_busy());
    }

    #[test]
    fn guard_is_released_before_delivery() {
        let (fetcher, release) = gated();
        let first = fetcher.spawn("Averages").unwrap();
        release.send(Err(RemoteError::Service("nope".into()))).unwrap();
        assert_eq!(first.wait(), Err(RemoteError::Service("nope".into())));

        let second = fetcher.spawn("Averages");
        assert!(second.is_some());
        release.send(Ok(sample_question("two"))).unwrap();
        assert!(second.unwrap().wait().is_ok());
    }
}
