use crate::session::question::{AnswerRecord, Question};
use crate::session::timer::QuestionTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Idle,
    Selected,
    Correct,
    Incorrect,
    Locked,
}

/// Everything one practice run owns. Created on start, dropped on restart.
#[derive(Debug)]
pub struct SessionState {
    topic: String,
    records: Vec<AnswerRecord>,
    current: Option<Question>,
    question_number: usize,
    selected: Option<usize>,
    submitted: bool,
    solution_visible: bool,
    timer: Option<QuestionTimer>,
}

impl SessionState {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            records: Vec::new(),
            current: None,
            question_number: 0,
            selected: None,
            submitted: false,
            solution_visible: false,
            timer: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn question_number(&self) -> usize {
        self.question_number
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn solution_visible(&self) -> bool {
        self.solution_visible
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.map_or(0, |t| t.elapsed_secs())
    }

    pub fn can_submit(&self) -> bool {
        self.current.is_some() && self.selected.is_some() && !self.submitted
    }

    /// Shows `question`, bumps the counter and restarts the stopwatch.
    pub fn display(&mut self, question: Question) {
        self.display_with_timer(question, QuestionTimer::start());
    }

    pub fn display_with_timer(&mut self, question: Question, timer: QuestionTimer) {
        self.question_number += 1;
        self.current = Some(question);
        self.selected = None;
        self.submitted = false;
        self.solution_visible = false;
        self.timer = Some(timer);
    }

    /// Returns false when the choice is out of range or options are locked.
    pub fn select(&mut self, idx: usize) -> bool {
        if self.submitted {
            return false;
        }
        if idx >= self.option_count() {
            return false;
        }
        self.selected = Some(idx);
        true
    }

    pub fn select_next(&mut self) {
        let len = self.option_count();
        if len == 0 {
            return;
        }
        let idx = self.selected.map_or(0, |s| (s + 1) % len);
        self.select(idx);
    }

    pub fn select_prev(&mut self) {
        let len = self.option_count();
        if len == 0 {
            return;
        }
        let idx = match self.selected {
            Some(0) | None => len - 1,
            Some(s) => s - 1,
        };
        self.select(idx);
    }

    fn option_count(&self) -> usize {
        self.current.as_ref().map_or(0, |q| q.options.len())
    }

    /// Stops the timer and appends the answer. No-op unless an option is selected.
    pub fn submit(&mut self) -> Option<&AnswerRecord> {
        if !self.can_submit() {
            return None;
        }
        let question = self.current.as_ref()?;
        let choice = self.selected.and_then(|i| question.options.get(i));
        let elapsed = self.timer.as_mut().map_or(0, QuestionTimer::stop);
        let record = AnswerRecord::new(&self.topic, question, choice.map(String::as_str), elapsed);
        self.records.push(record);
        self.submitted = true;
        self.records.last()
    }

    pub fn toggle_solution(&mut self) -> bool {
        if self.submitted {
            self.solution_visible = !self.solution_visible;
        }
        self.solution_visible
    }

    pub fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
    }

    pub fn option_mark(&self, idx: usize) -> OptionMark {
        let Some(question) = self.current.as_ref() else {
            return OptionMark::Idle;
        };
        let Some(option) = question.options.get(idx) else {
            return OptionMark::Idle;
        };
        if !self.submitted {
            return if self.selected == Some(idx) {
                OptionMark::Selected
            } else {
                OptionMark::Idle
            };
        }
        if question.is_correct(option) {
            OptionMark::Correct
        } else if self.selected == Some(idx) {
            OptionMark::Incorrect
        } else {
            OptionMark::Locked
        }
    }
}
