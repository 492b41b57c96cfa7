use serde::{Deserialize, Serialize};

/// A multiple-choice question as served by the generation backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub solution: String,
}

impl Question {
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_answer
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| self.is_correct(o))
    }
}

/// One answered question. Field names match the feedback endpoint's wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub topic: String,
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub time_taken_seconds: u64,
}

impl AnswerRecord {
    pub fn new(
        topic: &str,
        question: &Question,
        user_answer: Option<&str>,
        time_taken_seconds: u64,
    ) -> Self {
        let is_correct = user_answer.is_some_and(|a| question.is_correct(a));
        Self {
            topic: topic.to_string(),
            question: question.prompt.clone(),
            user_answer: user_answer.map(str::to_string),
            correct_answer: question.correct_answer.clone(),
            is_correct,
            time_taken_seconds,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_question(prompt: &str) -> Question {
    Question {
        prompt: prompt.to_string(),
        options: vec!["10%".into(), "20%".into(), "25%".into(), "30%".into()],
        correct_answer: "25%".into(),
        solution: "1/4 of the total is 25%.".into(),
    }
}
