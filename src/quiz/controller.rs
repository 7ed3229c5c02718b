use log::debug;

use crate::quiz::{Question, QuizError, QuizState};

/// Where the quiz currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress { index: usize },
    Results,
}

/// Navigation and scoring over a fixed question list.
///
/// Invalid calls are ignored instead of reported: the front end is expected to
/// disable them (see [`QuizController::can_advance`] and
/// [`QuizController::can_retreat`]), but calling them anyway never corrupts the
/// state or indexes out of bounds.
#[derive(Debug, Clone)]
pub struct QuizController {
    questions: Vec<Question>,
    state: QuizState,
}

impl QuizController {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        let state = QuizState::new(questions.len());
        Ok(Self { questions, state })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.state.current_index]
    }

    pub fn selections(&self) -> &[Option<usize>] {
        &self.state.selections
    }

    /// The option chosen for the current question, if any.
    pub fn selection(&self) -> Option<usize> {
        self.state.selections[self.state.current_index]
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    pub fn phase(&self) -> Phase {
        if self.state.completed {
            Phase::Results
        } else {
            Phase::InProgress {
                index: self.state.current_index,
            }
        }
    }

    pub fn can_advance(&self) -> bool {
        !self.state.completed && self.selection().is_some()
    }

    pub fn can_retreat(&self) -> bool {
        !self.state.completed && self.state.current_index > 0
    }

    pub fn answered_count(&self) -> usize {
        self.state.selections.iter().filter(|s| s.is_some()).count()
    }

    /// One flag per question, set for every question up to and including
    /// the current one.
    pub fn progress(&self) -> Vec<bool> {
        (0..self.questions.len())
            .map(|i| i <= self.state.current_index)
            .collect()
    }

    pub fn select_option(&mut self, option_index: usize) {
        if self.state.completed {
            return;
        }
        if option_index >= self.current_question().options.len() {
            debug!(
                "Ignoring option {} for question {}: out of range",
                option_index,
                self.current_question().id
            );
            return;
        }
        let index = self.state.current_index;
        self.state.selections[index] = Some(option_index);
        debug!("Question {} answered with option {}", index, option_index);
    }

    /// Moves to the next question, or into results from the last one.
    /// Does nothing until the current question has an answer.
    pub fn advance(&mut self) {
        if !self.can_advance() {
            return;
        }
        if self.state.current_index < self.questions.len() - 1 {
            self.state.current_index += 1;
            debug!("Advanced to question {}", self.state.current_index);
        } else {
            self.state.completed = true;
            debug!("Last question answered, quiz completed");
        }
        self.check_invariants();
    }

    pub fn retreat(&mut self) {
        if !self.can_retreat() {
            return;
        }
        self.state.current_index -= 1;
        debug!("Went back to question {}", self.state.current_index);
        self.check_invariants();
    }

    /// Percentage of correctly answered questions, rounded half away from
    /// zero. Unanswered questions count as wrong.
    pub fn score(&self) -> u32 {
        let correct = self
            .questions
            .iter()
            .zip(&self.state.selections)
            .filter(|(question, selection)| selection.is_some_and(|s| question.is_correct(s)))
            .count();
        let total = self.questions.len();
        ((200 * correct + total) / (2 * total)) as u32
    }

    pub fn restart(&mut self) {
        self.state = QuizState::new(self.questions.len());
        debug!("Quiz state reset");
    }

    fn check_invariants(&self) {
        debug_assert!(self.state.current_index < self.questions.len());
        debug_assert_eq!(self.state.selections.len(), self.questions.len());
    }
}
