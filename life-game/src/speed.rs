use crate::config::ConfigError;
use log::debug;
use std::time::Duration;

pub const DEFAULT_SPEED_LEVELS: [SpeedLevel; 5] = [
    SpeedLevel::from_millis(1000, "very slow"),
    SpeedLevel::from_millis(500, "slow"),
    SpeedLevel::from_millis(200, "normal"),
    SpeedLevel::from_millis(100, "fast"),
    SpeedLevel::from_millis(50, "very fast"),
];

/// Time between generations, with the name shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedLevel {
    pub interval: Duration,
    pub label: &'static str,
}

impl SpeedLevel {
    pub const fn from_millis(millis: u64, label: &'static str) -> Self {
        Self {
            interval: Duration::from_millis(millis),
            label,
        }
    }
}

/// Index into an ordered, non-empty list of speed levels, slowest first.
/// The index never leaves `[0, len - 1]`.
#[derive(Clone, Debug)]
pub struct SpeedSetting {
    levels: Vec<SpeedLevel>,
    index: usize,
}

impl SpeedSetting {
    pub fn new(levels: Vec<SpeedLevel>, index: usize) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoSpeedLevels);
        }
        if let Some(zero) = levels.iter().position(|level| level.interval.is_zero()) {
            return Err(ConfigError::ZeroInterval { index: zero });
        }
        if index >= levels.len() {
            return Err(ConfigError::SpeedIndexOutOfRange {
                index,
                len: levels.len(),
            });
        }
        Ok(Self { levels, index })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn level(&self) -> SpeedLevel {
        self.levels[self.index]
    }

    pub fn interval(&self) -> Duration {
        self.level().interval
    }

    pub fn label(&self) -> &'static str {
        self.level().label
    }

    /// Returns whether the index moved.
    pub fn speed_up(&mut self) -> bool {
        self.select(self.index.saturating_add(1).min(self.levels.len() - 1))
    }

    /// Returns whether the index moved.
    pub fn speed_down(&mut self) -> bool {
        self.select(self.index.saturating_sub(1))
    }

    fn select(&mut self, index: usize) -> bool {
        if index == self.index {
            return false;
        }
        self.index = index;
        debug!("Speed {} ({:?} per generation)", self.label(), self.interval());
        true
    }
}
