use std::mem;

use log::debug;

use crate::pipeline::fetch::{PendingFetch, QuestionFetcher};
use crate::remote::RemoteError;
use crate::session::question::Question;

/// The one-slot buffer holding the question after the current one.
pub enum Prefetch {
    Idle,
    Prefetching(PendingFetch),
    Ready(Question),
    /// The last request resolved to no question.
    Failed(RemoteError),
}

impl Prefetch {
    pub fn label(&self) -> &'static str {
        match self {
            Prefetch::Idle => "idle",
            Prefetch::Prefetching(_) => "prefetching",
            Prefetch::Ready(_) => "ready",
            Prefetch::Failed(_) => "failed",
        }
    }
}

/// Result of asking for the next question.
#[derive(Debug, PartialEq)]
pub enum Advance {
    /// Buffered question handed over; the slot is now idle.
    Ready(Question),
    /// Request still running; ask again once it resolves.
    Pending,
    /// No question is coming. The session should end.
    Exhausted(RemoteError),
}

pub struct PrefetchPipeline {
    fetcher: QuestionFetcher,
    state: Prefetch,
    issued: usize,
}

impl PrefetchPipeline {
    pub fn new(fetcher: QuestionFetcher) -> Self {
        Self {
            fetcher,
            state: Prefetch::Idle,
            issued: 0,
        }
    }

    pub fn fetcher(&self) -> &QuestionFetcher {
        &self.fetcher
    }

    pub fn state(&self) -> &Prefetch {
        &self.state
    }

    /// Number of background requests that actually went out.
    pub fn issued(&self) -> usize {
        self.issued
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, Prefetch::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, Prefetch::Prefetching(_))
    }

    pub fn failure(&self) -> Option<&RemoteError> {
        match self.state {
            Prefetch::Failed(ref e) => Some(e),
            _ => None,
        }
    }

    /// Starts a background fetch. Only acts from `Idle`, so a buffered
    /// question or a running request is never replaced.
    pub fn issue(&mut self, topic: &str) {
        if !matches!(self.state, Prefetch::Idle) {
            return;
        }
        self.state = match self.fetcher.spawn(topic) {
            Some(pending) => {
                self.issued += 1;
                Prefetch::Prefetching(pending)
            }
            None => Prefetch::Failed(RemoteError::Busy),
        };
        debug!("prefetch issued for {topic:?}: {}", self.state.label());
    }

    /// Folds a finished request into `Ready` or `Failed`. Returns true when
    /// the state changed.
    pub fn poll(&mut self) -> bool {
        let Prefetch::Prefetching(ref pending) = self.state else {
            return false;
        };
        let Some(result) = pending.try_take() else {
            return false;
        };
        self.state = match result {
            Ok(question) => Prefetch::Ready(question),
            Err(e) => Prefetch::Failed(e),
        };
        debug!("prefetch resolved: {}", self.state.label());
        true
    }

    /// Takes the buffered question if there is one. From `Idle` a request is
    /// issued first, so the caller always has something to wait on.
    pub fn advance(&mut self, topic: &str) -> Advance {
        if matches!(self.state, Prefetch::Idle) {
            self.issue(topic);
        }
        self.poll();
        match mem::replace(&mut self.state, Prefetch::Idle) {
            Prefetch::Ready(question) => Advance::Ready(question),
            Prefetch::Failed(e) => Advance::Exhausted(e),
            Prefetch::Prefetching(pending) => {
                self.state = Prefetch::Prefetching(pending);
                Advance::Pending
            }
            Prefetch::Idle => Advance::Exhausted(RemoteError::Busy),
        }
    }

    /// Forgets the slot. A running request is orphaned, not cancelled.
    pub fn reset(&mut self) {
        self.state = Prefetch::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::remote::QuizService;
    use crate::session::question::{AnswerRecord, sample_question};

    #[derive(Default)]
    struct Scripted {
        answers: Mutex<VecDeque<Result<Question, RemoteError>>>,
        calls: AtomicUsize,
    }

    impl QuizService for Scripted {
        fn fetch_question(&self, _topic: &str) -> Result<Question, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(RemoteError::Transport("script exhausted".into())))
        }

        fn fetch_feedback(&self, _results: &[AnswerRecord]) -> Result<String, RemoteError> {
            Err(RemoteError::Disabled)
        }
    }

    fn pipeline(script: Vec<Result<Question, RemoteError>>) -> (PrefetchPipeline, Arc<Scripted>) {
        let service = Arc::new(Scripted {
            answers: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        });
        let fetcher = QuestionFetcher::new(service.clone());
        (PrefetchPipeline::new(fetcher), service)
    }

    fn settle(p: &mut PrefetchPipeline) {
        for _ in 0..400 {
            if p.poll() || !p.is_pending() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        panic!("prefetch never resolved");
    }

    #[test]
    fn ready_question_is_handed_over_and_slot_cleared() {
        let (mut p, _) = pipeline(vec![Ok(sample_question("two"))]);
        p.issue("Percentages");
        settle(&mut p);
        assert!(p.is_ready());

        match p.advance("Percentages") {
            Advance::Ready(q) => assert_eq!(q.prompt, "two"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(p.state(), Prefetch::Idle));
        assert_eq!(p.issued(), 1);
    }

    #[test]
    fn issue_never_replaces_a_buffered_question() {
        let (mut p, service) = pipeline(vec![Ok(sample_question("two"))]);
        p.issue("Percentages");
        settle(&mut p);
        p.issue("Percentages");
        assert!(p.is_ready());
        assert_eq!(p.issued(), 1);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_prefetch_exhausts() {
        let (mut p, _) = pipeline(vec![Err(RemoteError::Transport("reset".into()))]);
        p.issue("Percentages");
        settle(&mut p);
        assert!(p.failure().is_some());
        assert_eq!(
            p.advance("Percentages"),
            Advance::Exhausted(RemoteError::Transport("reset".into()))
        );
    }

    #[test]
    fn advance_from_idle_issues_a_request() {
        let (mut p, _) = pipeline(vec![Ok(sample_question("two"))]);
        let first = p.advance("Percentages");
        assert!(matches!(first, Advance::Pending | Advance::Ready(_)));
        assert_eq!(p.issued(), 1);
    }

    #[test]
    fn reset_orphans_running_request() {
        let (mut p, _) = pipeline(vec![Ok(sample_question("two"))]);
        p.issue("Percentages");
        p.reset();
        assert!(matches!(p.state(), Prefetch::Idle));
    }
}
