pub mod animator;
pub mod controller;
pub mod questions;
pub mod session;

pub use animator::{AnimationConfig, AnimationState, ScoreAnimator};
pub use controller::{Phase, QuizController};
pub use session::QuizSession;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

impl Question {
    pub fn new(
        id: u32,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, QuestionError> {
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                count: options.len(),
            });
        }
        if correct_option >= options.len() {
            return Err(QuestionError::CorrectOptionOutOfRange {
                id,
                index: correct_option,
                count: options.len(),
            });
        }
        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            correct_option,
        })
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        self.correct_option == option_index
    }
}

/// Mutable progress through a quiz. Only [`QuizController`] changes it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    pub current_index: usize,
    pub selections: Vec<Option<usize>>,
    pub completed: bool,
}

impl QuizState {
    pub fn new(question_count: usize) -> Self {
        Self {
            current_index: 0,
            selections: vec![None; question_count],
            completed: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question {id} has {count} option(s), at least 2 are required")]
    TooFewOptions { id: u32, count: usize },

    #[error("question {id} marks option {index} as correct but only has {count} options")]
    CorrectOptionOutOfRange { id: u32, index: usize, count: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    NoQuestions,
}
