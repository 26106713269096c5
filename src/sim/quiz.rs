//! Quiz gate: a fixed question pool walked in order
//!
//! The cursor only moves forward and wraps, so the question shown after N
//! failures is always the same for a given pool.

use serde::{Deserialize, Serialize};

/// Built-in question bank (prompt, correct answer)
pub const DEFAULT_QUESTIONS: &[(&str, bool)] = &[
    ("Is it acceptable to copy a classmate's homework if you change a few words?", false),
    ("Should you cite a source when you paraphrase its ideas?", true),
    ("Can you submit the same essay for two different courses without permission?", false),
    ("Is it fine to share your exam answers with a friend taking the test later?", false),
    ("Should group work list every member who actually contributed?", true),
    ("Is using an unauthorized device during an exam a breach of academic integrity?", true),
    ("Can you make up data when an experiment does not go as planned?", false),
    ("Is it your responsibility to know your course's collaboration policy?", true),
    ("Is buying an essay online acceptable if you read it before submitting?", false),
    ("Should direct quotes be placed in quotation marks and cited?", true),
    ("Is it okay to let someone else log in and take your online quiz?", false),
    ("Can you ask your instructor when you are unsure whether something is allowed?", true),
    ("Is altering a graded test and asking for a regrade acceptable?", false),
    ("Does academic integrity apply to take-home assignments too?", true),
    ("Is it acceptable to list a source you never actually consulted?", false),
];

/// An immutable true/false question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answer: bool,
    /// Shown after a wrong answer; a generic line is used when absent
    #[serde(default)]
    pub feedback: Option<String>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, answer: bool) -> Self {
        Self {
            prompt: prompt.into(),
            answer,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Feedback text for a wrong answer
    pub fn feedback_text(&self) -> String {
        match &self.feedback {
            Some(text) => text.clone(),
            None => format!(
                "Wrong! Correct answer: {}",
                if self.answer { "Yes" } else { "No" }
            ),
        }
    }
}

/// Outcome of answering the current question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Correct; play resumes with invincibility
    Pass,
    /// Wrong; an attempt is spent and the feedback is shown
    Fail { feedback: String },
}

/// Ordered question pool with a cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizGate {
    questions: Vec<Question>,
    cursor: usize,
}

impl Default for QuizGate {
    fn default() -> Self {
        Self::new(
            DEFAULT_QUESTIONS
                .iter()
                .map(|(prompt, answer)| Question::new(*prompt, *answer))
                .collect(),
        )
    }
}

impl QuizGate {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: 0,
        }
    }

    /// Load a question bank from a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move to the next question, wrapping at the end of the pool
    pub fn advance(&mut self) {
        if self.questions.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.questions.len();
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Check an answer against the current question.
    ///
    /// An empty pool has nothing to get wrong and always passes.
    pub fn evaluate(&self, answer: bool) -> Verdict {
        match self.current() {
            Some(q) if q.answer != answer => Verdict::Fail {
                feedback: q.feedback_text(),
            },
            _ => Verdict::Pass,
        }
    }
}
