use chrono::{DateTime, Local};

use crate::session::question::AnswerRecord;

/// Aggregate score for a finished run. Only exists when at least one
/// question was answered.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub topic: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: u32,
    pub avg_time_secs: f64,
    pub finished_at: DateTime<Local>,
}

impl SessionReport {
    pub fn from_records(topic: &str, records: &[AnswerRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let total = records.len();
        let correct = records.iter().filter(|r| r.is_correct).count();
        let total_time: u64 = records.iter().map(|r| r.time_taken_seconds).sum();

        Some(Self {
            topic: topic.to_string(),
            total,
            correct,
            accuracy: (correct as f64 / total as f64 * 100.0).round() as u32,
            avg_time_secs: total_time as f64 / total as f64,
            finished_at: Local::now(),
        })
    }

    pub fn headline(&self) -> &'static str {
        if self.accuracy >= 80 {
            "Great job!"
        } else if self.accuracy >= 60 {
            "Good attempt!"
        } else {
            "Keep improving!"
        }
    }

    pub fn avg_time_label(&self) -> String {
        format!("{:.1}s", self.avg_time_secs)
    }

    pub fn accuracy_ratio(&self) -> f64 {
        self.accuracy as f64 / 100.0
    }
}

pub const EMPTY_REPORT_MESSAGE: &str = "You didn't answer any questions.";

#[cfg(test)]
mod tests {
    use super::*;

    fn record(correct: bool, secs: u64) -> AnswerRecord {
        AnswerRecord {
            topic: "Percentages".into(),
            question: "q".into(),
            user_answer: Some("a".into()),
            correct_answer: if correct { "a".into() } else { "b".into() },
            is_correct: correct,
            time_taken_seconds: secs,
        }
    }

    #[test]
    fn empty_session_has_no_report() {
        assert!(SessionReport::from_records("Percentages", &[]).is_none());
    }

    #[test]
    fn two_of_three_correct() {
        let records = vec![record(true, 5), record(false, 10), record(true, 8)];
        let report = SessionReport::from_records("Percentages", &records).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.correct, 2);
        assert_eq!(report.accuracy, 67);
        assert!((report.avg_time_secs - 7.6667).abs() < 0.001);
        assert_eq!(report.avg_time_label(), "7.7s");
        assert_eq!(report.headline(), "Good attempt!");
    }

    #[test]
    fn accuracy_rounds_half_up() {
        let records = vec![record(true, 1), record(false, 1)];
        let report = SessionReport::from_records("t", &records).unwrap();
        assert_eq!(report.accuracy, 50);

        let mut records: Vec<AnswerRecord> = (0..7).map(|_| record(true, 1)).collect();
        records.push(record(false, 1));
        let report = SessionReport::from_records("t", &records).unwrap();
        // 87.5 -> 88
        assert_eq!(report.accuracy, 88);
        assert_eq!(report.headline(), "Great job!");
    }

    #[test]
    fn all_wrong_keeps_improving() {
        let records = vec![record(false, 30)];
        let report = SessionReport::from_records("t", &records).unwrap();
        assert_eq!(report.accuracy, 0);
        assert_eq!(report.avg_time_label(), "30.0s");
        assert_eq!(report.headline(), "Keep improving!");
    }
}
