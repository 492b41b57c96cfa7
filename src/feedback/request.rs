use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, warn};

use crate::feedback::markdown::Document;
use crate::feedback::narrative::{NarrativeSections, SectionKind};
use crate::remote::{QuizService, RemoteError};
use crate::session::question::AnswerRecord;

/// Lifecycle of the single coaching-feedback call made when a run ends.
pub enum FeedbackState {
    NotRequested,
    Pending(Receiver<Result<String, RemoteError>>),
    Ready(NarrativeSections),
    Failed(RemoteError),
}

/// What a report panel should show for one section.
#[derive(Debug, PartialEq)]
pub enum SectionView<'a> {
    Loading(&'static str),
    Content(&'a Document),
    Notice(String),
}

impl FeedbackState {
    pub fn request(service: &Arc<dyn QuizService>, records: Vec<AnswerRecord>) -> Self {
        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(service);
        debug!("requesting feedback for {} answers", records.len());
        thread::spawn(move || {
            let _ = tx.send(service.fetch_feedback(&records));
        });
        FeedbackState::Pending(rx)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FeedbackState::Pending(_))
    }

    /// Returns true once the call has resolved on this poll.
    pub fn poll(&mut self) -> bool {
        let FeedbackState::Pending(ref rx) = *self else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(RemoteError::Transport("feedback worker exited".to_string()))
            }
        };
        *self = match result {
            Ok(text) => {
                let sections = NarrativeSections::parse(&text);
                let missing = sections.missing();
                if !missing.is_empty() {
                    warn!("feedback is missing sections: {missing:?}");
                }
                FeedbackState::Ready(sections)
            }
            Err(e) => {
                warn!("feedback unavailable: {e}");
                FeedbackState::Failed(e)
            }
        };
        true
    }

    pub fn section(&self, kind: SectionKind) -> SectionView<'_> {
        match self {
            FeedbackState::NotRequested => SectionView::Notice(kind.unavailable_text().to_string()),
            FeedbackState::Pending(_) => SectionView::Loading(kind.loading_text()),
            FeedbackState::Ready(sections) => match sections.get(kind) {
                Some(doc) => SectionView::Content(doc),
                None => SectionView::Notice(kind.missing_text().to_string()),
            },
            FeedbackState::Failed(e) => SectionView::Notice(failure_text(kind, e)),
        }
    }
}

fn failure_text(kind: SectionKind, err: &RemoteError) -> String {
    if kind != SectionKind::Summary {
        return kind.unavailable_text().to_string();
    }
    match err {
        RemoteError::Service(msg) => format!("\u{26a0} {msg}"),
        _ => "\u{26a0} Server not responding.".to_string(),
    }
}
