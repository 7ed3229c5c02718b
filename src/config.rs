use std::time::Duration;

use thiserror::Error;

use crate::quiz::AnimationConfig;

pub const DURATION_VAR: &str = "QUIZ_SCORE_DURATION_MS";
pub const FRAME_RATE_VAR: &str = "QUIZ_SCORE_FRAME_RATE";
pub const MAX_FRAME_RATE: u64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a whole number, got {value:?}")]
    NotANumber { key: &'static str, value: String },

    #[error("QUIZ_SCORE_FRAME_RATE must be greater than zero")]
    ZeroFrameRate,

    #[error("QUIZ_SCORE_FRAME_RATE must be at most 1000, got {0}")]
    FrameRateTooHigh(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub animation: AnimationConfig,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut animation = AnimationConfig::default();

        if let Some(ms) = parse(&lookup, DURATION_VAR)? {
            animation.duration = Duration::from_millis(ms);
        }
        if let Some(rate) = parse(&lookup, FRAME_RATE_VAR)? {
            animation.frame_rate = match rate {
                0 => return Err(ConfigError::ZeroFrameRate),
                1..=MAX_FRAME_RATE => rate as u32,
                _ => return Err(ConfigError::FrameRateTooHigh(rate)),
            };
        }

        Ok(Self { animation })
    }
}

fn parse(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::NotANumber { key, value }),
    }
}
