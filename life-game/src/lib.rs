#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod event;
mod run_tracker;
mod snapshot;
mod sound;
mod speed;
mod state;

pub use app::{Flow, LifeApp};
pub use config::{ConfigError, GameConfig};
pub use event::InputEvent;
pub use run_tracker::{RunTracker, Verdict, STAGNATION_WINDOW};
pub use snapshot::Snapshot;
pub use sound::SoundCue;
pub use speed::{SpeedLevel, SpeedSetting, DEFAULT_SPEED_LEVELS};
pub use state::AppState;
