use log::info;
use tokio::sync::watch;

use crate::quiz::{AnimationConfig, AnimationState, Phase, QuizController, ScoreAnimator};

/// A quiz together with its score reveal.
///
/// Entering results starts the count-up; restarting stops and clears it.
pub struct QuizSession {
    controller: QuizController,
    animator: ScoreAnimator,
}

impl QuizSession {
    pub fn new(controller: QuizController, config: AnimationConfig) -> Self {
        Self {
            controller,
            animator: ScoreAnimator::new(config),
        }
    }

    pub fn controller(&self) -> &QuizController {
        &self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn animation(&self) -> AnimationState {
        self.animator.state()
    }

    pub fn displayed_score(&self) -> u32 {
        self.animator.displayed()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.animator.subscribe()
    }

    pub fn select_option(&mut self, option_index: usize) {
        self.controller.select_option(option_index);
    }

    /// Must be called from within a tokio runtime: finishing the last
    /// question starts the score animation.
    pub fn advance(&mut self) {
        let was_completed = self.controller.is_completed();
        self.controller.advance();
        if !was_completed && self.controller.is_completed() {
            let score = self.controller.score();
            info!(
                "Quiz finished: {} of {} answered, score {}%",
                self.controller.answered_count(),
                self.controller.questions().len(),
                score
            );
            self.animator.start(score);
        }
    }

    pub fn retreat(&mut self) {
        self.controller.retreat();
    }

    pub fn restart(&mut self) {
        self.controller.restart();
        self.animator.reset();
        info!("Quiz restarted");
    }
}
