//! Animated reveal of the final score.
//!
//! [`AnimationState`] holds the frame arithmetic and can be stepped by hand;
//! [`ScoreAnimator`] drives it from a periodic tokio timer and publishes every
//! frame through a `watch` channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3500);
pub const DEFAULT_FRAME_RATE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    pub duration: Duration,
    /// Frames per second, never zero.
    pub frame_rate: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl AnimationConfig {
    pub fn total_frames(&self) -> u32 {
        (self.duration.as_secs_f64() * self.frame_rate as f64).round() as u32
    }

    /// Time between frames, never zero.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64).max(Duration::from_nanos(1))
    }
}

/// Cubic ease-out: fast at first, zero velocity at `progress == 1`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationState {
    pub target: u32,
    pub displayed: u32,
    pub frame: u32,
    pub total_frames: u32,
}

impl AnimationState {
    pub fn new(target: u32, total_frames: u32) -> Self {
        Self {
            target,
            displayed: 0,
            frame: 0,
            total_frames,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame > 0 && self.frame >= self.total_frames
    }

    /// Advances one frame and returns the value to display.
    ///
    /// The last frame always shows `target` exactly. Ticking a finished
    /// animation changes nothing.
    pub fn tick(&mut self) -> u32 {
        if self.is_finished() {
            return self.displayed;
        }
        self.frame += 1;
        if self.frame >= self.total_frames {
            self.displayed = self.target;
        } else {
            let progress = self.frame as f64 / self.total_frames as f64;
            let eased = ease_out_cubic(progress);
            self.displayed = (self.target as f64 * eased).round() as u32;
        }
        self.displayed
    }
}

/// Owns at most one running timer task. Dropping the animator stops it.
pub struct ScoreAnimator {
    config: AnimationConfig,
    sender: Arc<watch::Sender<AnimationState>>,
    // Bumped on every start/cancel; a task only publishes while it still
    // holds the current value.
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl ScoreAnimator {
    pub fn new(config: AnimationConfig) -> Self {
        let (sender, _) = watch::channel(AnimationState::default());
        Self {
            config,
            sender: Arc::new(sender),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    pub fn config(&self) -> AnimationConfig {
        self.config
    }

    pub fn state(&self) -> AnimationState {
        *self.sender.borrow()
    }

    pub fn displayed(&self) -> u32 {
        self.sender.borrow().displayed
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.sender.subscribe()
    }

    /// Starts counting from 0 up to `target`, replacing any running animation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, target: u32) {
        debug_assert!(target <= 100, "score {} out of range", target);
        self.cancel();

        let generation = self.generation.load(Ordering::SeqCst);
        let mut animation = AnimationState::new(target, self.config.total_frames());
        self.sender.send_replace(animation);
        debug!(
            "Score animation to {} started ({} frames)",
            target, animation.total_frames
        );

        let sender = self.sender.clone();
        let current = self.generation.clone();
        let period = self.config.frame_period();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                animation.tick();
                let published = sender.send_if_modified(|state| {
                    if current.load(Ordering::SeqCst) != generation {
                        return false;
                    }
                    *state = animation;
                    true
                });
                if !published {
                    return;
                }
                if animation.is_finished() {
                    debug!("Score animation finished at {}", animation.displayed);
                    return;
                }
            }
        }));
    }

    /// Stops the timer and keeps the value shown so far.
    pub fn cancel(&mut self) {
        // Invalidate under the channel lock: a task already inside
        // `send_if_modified` finishes before this returns, later ones see
        // the new generation.
        self.sender.send_if_modified(|_| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            false
        });
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!("Score animation cancelled");
            }
            task.abort();
        }
    }

    pub fn reset(&mut self) {
        self.cancel();
        self.sender.send_replace(AnimationState::default());
    }
}

impl Default for ScoreAnimator {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl Drop for ScoreAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(target: u32) -> Vec<u32> {
        let mut animation = AnimationState::new(target, AnimationConfig::default().total_frames());
        let mut shown = vec![animation.displayed];
        while !animation.is_finished() {
            shown.push(animation.tick());
        }
        shown
    }

    #[test]
    fn default_timing_is_210_frames() {
        let config = AnimationConfig::default();
        assert_eq!(config.total_frames(), 210);
        assert_eq!(config.frame_period().as_micros(), 16_666);
    }

    #[test]
    fn counts_up_to_100_without_going_backwards() {
        let shown = run_to_end(100);
        assert_eq!(shown.len(), 211);
        assert_eq!(shown[0], 0);
        assert_eq!(*shown.last().unwrap(), 100);
        assert!(shown.windows(2).all(|w| w[0] <= w[1]));
        assert!(shown.iter().all(|&v| v <= 100));
    }

    #[test]
    fn zero_target_stays_zero() {
        assert!(run_to_end(0).iter().all(|&v| v == 0));
    }

    #[test]
    fn every_target_lands_exactly() {
        for target in 0..=100 {
            let shown = run_to_end(target);
            assert_eq!(*shown.last().unwrap(), target);
            assert!(shown.iter().all(|&v| v <= target));
        }
    }

    #[test]
    fn eases_out() {
        let mut animation = AnimationState::new(100, 210);
        // frame 1: 1 - (209/210)^3 = 0.01423...
        assert_eq!(animation.tick(), 1);
        for _ in 1..105 {
            animation.tick();
        }
        // halfway through, 87.5% of the way there
        assert_eq!(animation.frame, 105);
        assert_eq!(animation.displayed, 88);
    }

    #[test]
    fn ticking_a_finished_animation_is_a_no_op() {
        let mut animation = AnimationState::new(42, 3);
        for _ in 0..3 {
            animation.tick();
        }
        assert!(animation.is_finished());
        assert_eq!(animation.tick(), 42);
        assert_eq!(animation.frame, 3);
    }

    #[test]
    fn zero_frame_animation_finishes_on_first_tick() {
        let mut animation = AnimationState::new(75, 0);
        assert!(!animation.is_finished());
        assert_eq!(animation.tick(), 75);
        assert!(animation.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_reaches_target_and_releases_itself() {
        let mut animator = ScoreAnimator::default();
        animator.start(100);
        assert!(animator.is_running());
        assert_eq!(animator.displayed(), 0);

        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(animator.displayed(), 100);
        assert_eq!(animator.state().frame, 210);
        assert!(!animator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_a_non_decreasing_count() {
        let mut animator = ScoreAnimator::default();
        let mut frames = animator.subscribe();
        animator.start(75);

        let mut seen = Vec::new();
        while frames.changed().await.is_ok() {
            let state = *frames.borrow_and_update();
            seen.push(state.displayed);
            if state.is_finished() {
                break;
            }
        }
        assert_eq!(seen.last(), Some(&75));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_freezes_the_count() {
        let mut animator = ScoreAnimator::default();
        animator.start(100);
        time::sleep(Duration::from_millis(500)).await;
        animator.cancel();

        let frozen = animator.state();
        assert!(frozen.displayed > 0 && frozen.displayed < 100);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(animator.state(), frozen);
        assert!(!animator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_the_display() {
        let mut animator = ScoreAnimator::default();
        animator.start(100);
        time::sleep(Duration::from_secs(1)).await;
        animator.reset();
        assert_eq!(animator.state(), AnimationState::default());

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(animator.displayed(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_replaces_the_running_timer() {
        let mut animator = ScoreAnimator::default();
        animator.start(100);
        time::sleep(Duration::from_secs(1)).await;

        animator.start(50);
        assert_eq!(animator.displayed(), 0);
        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(animator.displayed(), 50);
        assert!(!animator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_animator_stops_updates() {
        let mut animator = ScoreAnimator::default();
        let mut frames = animator.subscribe();
        animator.start(100);
        time::sleep(Duration::from_millis(200)).await;
        drop(animator);

        frames.borrow_and_update();
        // The sender goes away with the aborted task, nothing more arrives.
        assert!(frames.changed().await.is_err());
        assert!(frames.borrow().displayed < 100);
    }

    #[test]
    fn frame_period_never_reaches_zero() {
        let config = AnimationConfig {
            duration: DEFAULT_DURATION,
            frame_rate: u32::MAX,
        };
        assert_eq!(config.frame_period(), Duration::from_nanos(1));
    }

    #[tokio::test(start_paused = true)]
    async fn maximal_frame_rate_still_reaches_target() {
        let mut animator = ScoreAnimator::new(AnimationConfig {
            duration: Duration::from_nanos(1),
            frame_rate: u32::MAX,
        });
        assert_eq!(animator.config().total_frames(), 4);
        animator.start(50);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(animator.displayed(), 50);
        assert!(animator.state().is_finished());
        assert!(!animator.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn nothing_lands_after_cancel_on_worker_threads() {
        for _ in 0..20 {
            let mut animator = ScoreAnimator::new(AnimationConfig {
                duration: Duration::from_millis(200),
                frame_rate: 1000,
            });
            animator.start(100);
            time::sleep(Duration::from_millis(20)).await;
            animator.cancel();

            let frozen = animator.state();
            time::sleep(Duration::from_millis(10)).await;
            assert_eq!(animator.state(), frozen);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn custom_timing() {
        let mut animator = ScoreAnimator::new(AnimationConfig {
            duration: Duration::from_millis(100),
            frame_rate: 10,
        });
        animator.start(30);
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(animator.displayed(), 0);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(animator.state().frame, 1);
        assert_eq!(animator.displayed(), 30);
    }
}
