use std::time::{Duration, Instant};

/// Per-question stopwatch counting whole seconds. Replacing a session's timer
/// implicitly cancels the previous one.
#[derive(Clone, Copy, Debug)]
pub struct QuestionTimer {
    started_at: Instant,
    stopped_secs: Option<u64>,
}

impl QuestionTimer {
    pub fn start() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started_at: Instant) -> Self {
        Self {
            started_at,
            stopped_secs: None,
        }
    }

    /// Backdated timer, mostly useful for tests that need a known elapsed value.
    pub fn started_secs_ago(secs: u64) -> Self {
        let now = Instant::now();
        let start = now
            .checked_sub(Duration::from_secs(secs))
            .unwrap_or(now);
        Self::started_at(start)
    }

    pub fn is_running(&self) -> bool {
        self.stopped_secs.is_none()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.stopped_secs
            .unwrap_or_else(|| self.started_at.elapsed().as_secs())
    }

    /// Freezes the counter. Stopping twice keeps the first reading.
    pub fn stop(&mut self) -> u64 {
        let secs = self.elapsed_secs();
        self.stopped_secs.get_or_insert(secs);
        secs
    }
}
