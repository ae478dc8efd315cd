use std::{cmp::max, ops::RangeInclusive, time::Duration};

use crate::error::{GameError, Result};
use crate::geometry::Arena;
use crate::placement::Budget;

/// Tick durations cycled by the speed key, slowest first.
pub const SPEED_PRESETS_MS: [u64; 4] = [60, 50, 40, 30];
pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

pub fn speed_presets() -> Vec<Duration> {
    SPEED_PRESETS_MS.iter().map(|&ms| Duration::from_millis(ms)).collect()
}

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub use_barrier: bool,
    pub barrier_count: RangeInclusive<usize>,
    /// `None` derives the range from the arena's shorter side.
    pub barrier_len: Option<RangeInclusive<usize>>,
    pub barrier_margin: i32,
    pub apples: RangeInclusive<usize>,
    pub body_len: usize,
    pub seed: Option<u64>,
    pub budget: Budget,
    pub initial_speed: Option<Duration>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            use_barrier: true,
            barrier_count: 3..=5,
            barrier_len: None,
            barrier_margin: 1,
            apples: 1..=3,
            body_len: 5,
            seed: None,
            budget: Budget::Attempts(DEFAULT_MAX_ATTEMPTS),
            initial_speed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.body_len == 0 {
            return Err(invalid("snake body length must be at least 1"));
        }
        check_range("barrier count", &self.barrier_count)?;
        check_range("apple count", &self.apples)?;

        if let Some(len) = &self.barrier_len {
            check_range("barrier length", len)?;
            if *len.start() == 0 {
                return Err(invalid("barrier length must be at least 1"));
            }
        }

        Ok(())
    }

    pub fn barrier_len_for(&self, arena: &Arena) -> RangeInclusive<usize> {
        if let Some(len) = &self.barrier_len {
            return len.clone();
        }

        let shorter = max(arena.width().min(arena.height()), 0) as usize;
        max(shorter / 4, 1)..=max(shorter / 2, 1)
    }
}

fn check_range(name: &str, range: &RangeInclusive<usize>) -> Result<()> {
    if range.start() > range.end() {
        return Err(invalid(&format!(
            "{} minimum {} exceeds maximum {}",
            name,
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

fn invalid(msg: &str) -> GameError {
    GameError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_body_and_inverted_ranges() {
        let cfg = GameConfig { body_len: 0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));

        let cfg = GameConfig { apples: 4..=2, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));

        let cfg = GameConfig { barrier_len: Some(0..=3), ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn barrier_len_follows_shorter_side() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.barrier_len_for(&Arena::from_size(80, 24)), 6..=12);
        assert_eq!(cfg.barrier_len_for(&Arena::from_size(3, 3)), 1..=1);

        let tiny = Arena::new(Point::new(0, 0), Point::new(-1, -1));
        assert_eq!(cfg.barrier_len_for(&tiny), 1..=1);
    }

    #[test]
    fn explicit_barrier_len_wins() {
        let cfg = GameConfig { barrier_len: Some(2..=4), ..GameConfig::default() };
        assert_eq!(cfg.barrier_len_for(&Arena::from_size(80, 24)), 2..=4);
    }
}
