use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::Config;
use crate::feedback::request::FeedbackState;
use crate::pipeline::fetch::{PendingFetch, QuestionFetcher};
use crate::pipeline::prefetch::{Advance, PrefetchPipeline};
use crate::remote::{QuizService, RemoteError};
use crate::session::question::Question;
use crate::session::report::SessionReport;
use crate::session::state::SessionState;
use crate::ui::components::menu::TopicMenu;
use crate::ui::theme::Theme;

pub const SERVER_DOWN_NOTICE: &str = "Server not responding.";
pub const BUSY_NOTICE: &str = "A previous request is still finishing. Try again in a moment.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Setup,
    Loading,
    Practice,
    Report,
}

/// What the loading screen is waiting for.
pub enum Loading {
    /// Blocking fetch of question 1.
    FirstQuestion(PendingFetch),
    /// Slow path: the prefetch slot is still running.
    NextQuestion,
}

/// Session controller. Owns every piece of mutable state and performs all
/// transitions on the UI thread; workers only deliver results over channels.
pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: TopicMenu<'static>,
    pub session: Option<SessionState>,
    pub report: Option<SessionReport>,
    pub feedback: FeedbackState,
    pub notice: Option<String>,
    pub should_quit: bool,
    pub spinner_frame: usize,
    loading: Option<Loading>,
    pipeline: PrefetchPipeline,
    service: Arc<dyn QuizService>,
    slow_waits: usize,
    feedback_calls: usize,
}

impl App {
    pub fn new(config: Config, service: Arc<dyn QuizService>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let mut menu = TopicMenu::new(config.topics.clone(), theme);
        menu.selected = config.default_topic_index();
        let pipeline = PrefetchPipeline::new(QuestionFetcher::new(Arc::clone(&service)));

        Self {
            screen: AppScreen::Setup,
            config,
            theme,
            menu,
            session: None,
            report: None,
            feedback: FeedbackState::NotRequested,
            notice: None,
            should_quit: false,
            spinner_frame: 0,
            loading: None,
            pipeline,
            service,
            slow_waits: 0,
            feedback_calls: 0,
        }
    }

    pub fn pipeline(&self) -> &PrefetchPipeline {
        &self.pipeline
    }

    pub fn loading(&self) -> Option<&Loading> {
        self.loading.as_ref()
    }

    /// Times the controller had to block on the prefetch slot.
    pub fn slow_waits(&self) -> usize {
        self.slow_waits
    }

    pub fn feedback_calls(&self) -> usize {
        self.feedback_calls
    }

    pub fn selected_topic(&self) -> &str {
        self.menu.current()
    }

    pub fn start_session(&mut self) {
        let topic = self.selected_topic().to_string();
        info!("starting session on {topic:?}");

        self.pipeline.reset();
        self.report = None;
        self.feedback = FeedbackState::NotRequested;
        self.notice = None;
        self.session = Some(SessionState::new(&topic));

        match self.pipeline.fetcher().spawn(&topic) {
            Some(pending) => {
                self.loading = Some(Loading::FirstQuestion(pending));
                self.screen = AppScreen::Loading;
            }
            None => {
                warn!("cannot start, a request is still in flight");
                self.session = None;
                self.notice = Some(BUSY_NOTICE.to_string());
                self.screen = AppScreen::Setup;
            }
        }
    }

    /// Called on every loop iteration; resolves whatever finished.
    pub fn poll(&mut self) {
        match self.screen {
            AppScreen::Loading => self.poll_loading(),
            AppScreen::Practice => {
                if self.pipeline.poll() {
                    if let Some(err) = self.pipeline.failure().cloned() {
                        self.surface(err);
                    }
                }
            }
            AppScreen::Report => {
                self.feedback.poll();
            }
            AppScreen::Setup => {}
        }
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.poll();
    }

    fn poll_loading(&mut self) {
        match self.loading {
            Some(Loading::FirstQuestion(ref pending)) => {
                let Some(result) = pending.try_take() else {
                    return;
                };
                self.loading = None;
                match result {
                    Ok(question) => self.begin_practice(question),
                    Err(e) => {
                        // No notice before practice has begun.
                        warn!("first question unavailable: {e}");
                        self.session = None;
                        self.screen = AppScreen::Setup;
                    }
                }
            }
            Some(Loading::NextQuestion) => {
                let topic = self.topic();
                match self.pipeline.advance(&topic) {
                    Advance::Pending => {}
                    Advance::Ready(question) => {
                        self.loading = None;
                        self.show_next(question);
                    }
                    Advance::Exhausted(e) => {
                        self.loading = None;
                        self.surface(e);
                        self.end_session();
                    }
                }
            }
            None => {}
        }
    }

    fn begin_practice(&mut self, question: Question) {
        let topic = self.topic();
        if let Some(session) = self.session.as_mut() {
            session.display(question);
        }
        self.pipeline.issue(&topic);
        self.screen = AppScreen::Practice;
    }

    fn show_next(&mut self, question: Question) {
        let topic = self.topic();
        if let Some(session) = self.session.as_mut() {
            session.display(question);
            debug!("showing question {}", session.question_number());
        }
        self.pipeline.issue(&topic);
        self.screen = AppScreen::Practice;
    }

    fn topic(&self) -> String {
        self.session
            .as_ref()
            .map_or_else(|| self.selected_topic().to_string(), |s| s.topic().to_string())
    }

    fn surface(&mut self, err: RemoteError) {
        let answered_any = self.session.as_ref().is_some_and(|s| s.question_number() > 0);
        if answered_any && err.is_connectivity() {
            self.notice = Some(SERVER_DOWN_NOTICE.to_string());
        }
    }

    pub fn select_option(&mut self, idx: usize) {
        if let Some(session) = self.session.as_mut() {
            session.select(idx);
        }
    }

    pub fn select_next(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.select_next();
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.select_prev();
        }
    }

    pub fn submit(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(record) = session.submit() {
            debug!(
                "answered {:?} in {}s, correct={}",
                record.user_answer, record.time_taken_seconds, record.is_correct
            );
        }
    }

    pub fn toggle_solution(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_solution();
        }
    }

    /// Fast path when the slot holds a question, slow path otherwise.
    pub fn next_question(&mut self) {
        if self.screen != AppScreen::Practice {
            return;
        }
        if !self.session.as_ref().is_some_and(SessionState::is_submitted) {
            return;
        }
        let topic = self.topic();
        match self.pipeline.advance(&topic) {
            Advance::Ready(question) => self.show_next(question),
            Advance::Pending => {
                self.slow_waits += 1;
                self.loading = Some(Loading::NextQuestion);
                self.screen = AppScreen::Loading;
            }
            Advance::Exhausted(e) => {
                self.surface(e);
                self.end_session();
            }
        }
    }

    pub fn end_session(&mut self) {
        self.loading = None;
        self.pipeline.reset();
        let records = match self.session.as_mut() {
            Some(session) => {
                session.stop_timer();
                session.records().to_vec()
            }
            None => Vec::new(),
        };
        let topic = self.topic();
        self.report = SessionReport::from_records(&topic, &records);
        self.feedback = match self.report {
            Some(ref report) => {
                info!(
                    "session ended: {}/{} correct, {}%",
                    report.correct, report.total, report.accuracy
                );
                self.feedback_calls += 1;
                FeedbackState::request(&self.service, records)
            }
            None => {
                info!("session ended with no answers");
                FeedbackState::NotRequested
            }
        };
        self.screen = AppScreen::Report;
    }

    /// Leaves the loading screen. Waiting for question 1 returns to setup;
    /// waiting for a later one ends the run.
    pub fn cancel_loading(&mut self) {
        match self.loading {
            Some(Loading::FirstQuestion(_)) => self.restart(),
            Some(Loading::NextQuestion) => self.end_session(),
            None => {}
        }
    }

    pub fn restart(&mut self) {
        self.loading = None;
        self.pipeline.reset();
        self.session = None;
        self.report = None;
        self.feedback = FeedbackState::NotRequested;
        self.notice = None;
        self.screen = AppScreen::Setup;
    }
}
