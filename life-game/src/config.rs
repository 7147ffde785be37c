use crate::speed::{SpeedLevel, SpeedSetting, DEFAULT_SPEED_LEVELS};
use life_grid::{GridSize, DEFAULT_ALIVE_PROBABILITY};
use std::error::Error;
use std::fmt;

pub const DEFAULT_GRID_SIZE: GridSize = GridSize {
    width: 40,
    height: 30,
};
pub const DEFAULT_SPEED_INDEX: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub grid_size: GridSize,
    pub alive_probability: f64,
    pub speed_levels: Vec<SpeedLevel>,
    pub default_speed_index: usize,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size.width == 0 || self.grid_size.height == 0 {
            return Err(ConfigError::EmptyGrid(self.grid_size));
        }
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(ConfigError::AliveProbability(self.alive_probability));
        }
        SpeedSetting::new(self.speed_levels.clone(), self.default_speed_index).map(|_| ())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            alive_probability: DEFAULT_ALIVE_PROBABILITY,
            speed_levels: DEFAULT_SPEED_LEVELS.to_vec(),
            default_speed_index: DEFAULT_SPEED_INDEX,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    EmptyGrid(GridSize),
    AliveProbability(f64),
    NoSpeedLevels,
    ZeroInterval { index: usize },
    SpeedIndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGrid(size) => {
                write!(f, "grid size {}x{} has no cells", size.width, size.height)
            }
            ConfigError::AliveProbability(p) => {
                write!(f, "alive probability {p} is outside [0, 1]")
            }
            ConfigError::NoSpeedLevels => write!(f, "at least one speed level is required"),
            ConfigError::ZeroInterval { index } => {
                write!(f, "speed level {index} has a zero step interval")
            }
            ConfigError::SpeedIndexOutOfRange { index, len } => {
                write!(f, "default speed index {index} is out of range for {len} levels")
            }
        }
    }
}

impl Error for ConfigError {}
