pub mod http;

use thiserror::Error;

use crate::session::question::{AnswerRecord, Question};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("server not responding: {0}")]
    Transport(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("{0}")]
    Service(String),
    #[error("another request is already in flight")]
    Busy,
    #[error("built without network support")]
    Disabled,
}

impl RemoteError {
    /// Failures the user should hear about as "server not responding".
    /// Service-reported errors and a busy guard are not.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            RemoteError::Transport(_)
                | RemoteError::Status(_)
                | RemoteError::Decode(_)
                | RemoteError::Disabled
        )
    }
}

/// The question and feedback generation backend. Calls block; callers run
/// them off the control thread.
pub trait QuizService: Send + Sync {
    fn fetch_question(&self, topic: &str) -> Result<Question, RemoteError>;

    fn fetch_feedback(&self, results: &[AnswerRecord]) -> Result<String, RemoteError>;
}
