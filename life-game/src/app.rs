use crate::config::{ConfigError, GameConfig};
use crate::event::InputEvent;
use crate::run_tracker::{RunTracker, Verdict};
use crate::snapshot::Snapshot;
use crate::sound::SoundCue;
use crate::speed::SpeedSetting;
use crate::state::AppState;
use life_grid::{CellGrid, Loc, Random};
use log::{debug, info};
use std::mem;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The whole game: board, run bookkeeping, pacing and the menu/setup/run
/// state machine. Events that do not apply to the current state are
/// ignored.
#[derive(Debug)]
pub struct LifeApp {
    grid: CellGrid,
    rand: Random,
    alive_probability: f64,
    state: AppState,
    tracker: RunTracker,
    speed: SpeedSetting,
    step_accumulator: Duration,
    cues: Vec<SoundCue>,
    terminated: bool,
}

impl LifeApp {
    pub fn new(config: GameConfig, rand: Random) -> Result<Self, ConfigError> {
        config.validate()?;
        let speed = SpeedSetting::new(config.speed_levels, config.default_speed_index)?;
        Ok(Self {
            grid: CellGrid::new(config.grid_size),
            rand,
            alive_probability: config.alive_probability,
            state: AppState::Menu,
            tracker: RunTracker::new(),
            speed,
            step_accumulator: Duration::ZERO,
            cues: vec![],
            terminated: false,
        })
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }

    pub fn speed_index(&self) -> usize {
        self.speed.index()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            state: self.state,
            generation: self.grid.generation(),
            alive_count: self.grid.alive_count(),
            score: self.tracker.current_score(),
            best_score: self.tracker.best_score(),
            speed_index: self.speed.index(),
            speed_label: self.speed.label(),
        }
    }

    /// Sound cues queued since the last call, oldest first.
    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        mem::take(&mut self.cues)
    }

    pub fn handle(&mut self, event: InputEvent) -> Flow {
        if self.terminated {
            return Flow::Exit;
        }

        match event {
            InputEvent::Quit | InputEvent::Escape => self.terminate(),
            InputEvent::Advance => self.advance(),
            InputEvent::Randomize => self.randomize(),
            InputEvent::ClearBoard => self.clear_board(),
            InputEvent::SpeedUp => self.change_speed(SpeedSetting::speed_up),
            InputEvent::SpeedDown => self.change_speed(SpeedSetting::speed_down),
            InputEvent::PointerClick(loc) => self.toggle_at(loc),
            InputEvent::Tick(dt) => self.tick(dt),
        }

        if self.terminated {
            Flow::Exit
        } else {
            Flow::Continue
        }
    }

    fn terminate(&mut self) {
        info!("Quitting from {}", self.state.label());
        self.terminated = true;
    }

    fn advance(&mut self) {
        let next = match self.state {
            AppState::Menu => AppState::Controls,
            AppState::Controls => {
                self.tracker.clear_history();
                AppState::Setup
            }
            AppState::Setup => {
                self.grid.reset_generation();
                self.tracker.reset_run();
                self.step_accumulator = Duration::ZERO;
                AppState::Running
            }
            AppState::Running => AppState::Paused,
            AppState::Paused => AppState::Running,
            AppState::GameOver => {
                self.tracker.reset_run();
                AppState::Setup
            }
        };
        self.enter(next);
        self.cue(SoundCue::Click);
    }

    fn randomize(&mut self) {
        if !self.state.is_editable() {
            return;
        }
        self.grid.randomize(self.alive_probability, &mut self.rand);
        self.tracker.reset_run();
        debug!("Randomized board: {} alive", self.grid.alive_count());
        self.cue(SoundCue::Click);
    }

    fn clear_board(&mut self) {
        if !self.state.is_editable() {
            return;
        }
        self.grid.clear();
        self.tracker.reset_run();
        debug!("Cleared board");
        self.cue(SoundCue::Clear);
    }

    fn change_speed(&mut self, change: fn(&mut SpeedSetting) -> bool) {
        if self.state.is_editable() && change(&mut self.speed) {
            self.cue(SoundCue::Click);
        }
    }

    fn toggle_at(&mut self, loc: Loc) {
        if self.state.is_editable() && self.grid.toggle_cell(loc) {
            self.tracker.clear_history();
            debug!("Toggled cell {}, {}", loc.row, loc.col);
            self.cue(SoundCue::Click);
        }
    }

    /// Runs as many generations as fit in the accumulated time, keeping the
    /// remainder for the next tick.
    fn tick(&mut self, dt: Duration) {
        if self.state != AppState::Running {
            return;
        }

        self.step_accumulator = self.step_accumulator.saturating_add(dt);
        let interval = self.speed.interval();
        while self.step_accumulator >= interval {
            self.step_accumulator -= interval;
            if self.step_generation() == Verdict::Stagnant {
                self.game_over();
                break;
            }
        }
    }

    fn step_generation(&mut self) -> Verdict {
        self.grid.step();
        self.cue(SoundCue::Step);
        self.tracker
            .record(self.grid.generation(), self.grid.alive_count())
    }

    fn game_over(&mut self) {
        self.step_accumulator = Duration::ZERO;
        info!(
            "Population stagnant at {} after {} generations (best {})",
            self.grid.alive_count(),
            self.tracker.current_score(),
            self.tracker.best_score()
        );
        self.enter(AppState::GameOver);
        self.cue(SoundCue::Clear);
    }

    fn enter(&mut self, state: AppState) {
        info!("{} -> {}", self.state.label(), state.label());
        self.state = state;
    }

    fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speed::SpeedLevel;
    use life_grid::GridSize;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn test_config() -> GameConfig {
        GameConfig {
            grid_size: GridSize::new(8, 8),
            alive_probability: 0.5,
            speed_levels: vec![
                SpeedLevel::from_millis(200, "slow"),
                SpeedLevel::from_millis(100, "normal"),
                SpeedLevel::from_millis(50, "fast"),
            ],
            default_speed_index: 1,
        }
    }

    fn new_app() -> LifeApp {
        LifeApp::new(test_config(), Random::from_seed(3)).unwrap()
    }

    fn app_in(state: AppState) -> LifeApp {
        let mut app = new_app();
        let advances = match state {
            AppState::Menu => 0,
            AppState::Controls => 1,
            AppState::Setup => 2,
            AppState::Running => 3,
            AppState::Paused => 4,
            AppState::GameOver => {
                // An empty board is stagnant after a full window of steps.
                for _ in 0..3 {
                    app.handle(InputEvent::Advance);
                }
                app.handle(InputEvent::Tick(INTERVAL * 5));
                assert_eq!(app.state(), AppState::GameOver);
                app.take_cues();
                return app;
            }
        };
        for _ in 0..advances {
            app.handle(InputEvent::Advance);
        }
        assert_eq!(app.state(), state);
        app.take_cues();
        app
    }

    fn place_blinker(app: &mut LifeApp) {
        for col in 2..5 {
            app.handle(InputEvent::PointerClick(Loc::new(3, col)));
        }
    }

    #[test]
    fn advance_walks_through_states() {
        let mut app = new_app();
        let expected = [
            AppState::Controls,
            AppState::Setup,
            AppState::Running,
            AppState::Paused,
            AppState::Running,
        ];
        for state in expected {
            assert_eq!(app.handle(InputEvent::Advance), Flow::Continue);
            assert_eq!(app.state(), state);
        }
        assert_eq!(app.take_cues(), vec![SoundCue::Click; 5]);
    }

    #[test]
    fn starting_a_run_resets_generation_and_score() {
        let mut app = app_in(AppState::Setup);
        place_blinker(&mut app);
        app.handle(InputEvent::Advance);
        app.handle(InputEvent::Tick(INTERVAL * 3));
        assert_eq!(app.snapshot().score, 3);

        app.handle(InputEvent::Advance);
        app.handle(InputEvent::Advance);
        assert_eq!(app.state(), AppState::Running);
        assert_eq!(app.snapshot().generation, 3);

        let mut app = app_in(AppState::GameOver);
        app.handle(InputEvent::Advance);
        assert_eq!(app.state(), AppState::Setup);
        assert_eq!(app.snapshot().score, 0);
        assert!(app.tracker().history().is_empty());
        assert_eq!(app.snapshot().generation, 5);
        app.handle(InputEvent::Advance);
        assert_eq!(app.snapshot().generation, 0);
    }

    #[test]
    fn tick_keeps_leftover_time() {
        let mut app = app_in(AppState::Running);
        place_blinker(&mut app);
        app.take_cues();

        app.handle(InputEvent::Tick(Duration::from_millis(250)));
        assert_eq!(app.grid().generation(), 2);
        app.handle(InputEvent::Tick(Duration::from_millis(40)));
        assert_eq!(app.grid().generation(), 2);
        app.handle(InputEvent::Tick(Duration::from_millis(10)));
        assert_eq!(app.grid().generation(), 3);
        assert_eq!(app.take_cues(), vec![SoundCue::Step; 3]);
    }

    #[test]
    fn stagnation_ends_run_mid_tick() {
        let mut app = app_in(AppState::Running);
        app.handle(InputEvent::Tick(INTERVAL * 20));
        assert_eq!(app.state(), AppState::GameOver);
        assert_eq!(app.grid().generation(), 5);
        assert_eq!(app.snapshot().best_score, 5);

        let mut cues = vec![SoundCue::Step; 5];
        cues.push(SoundCue::Clear);
        assert_eq!(app.take_cues(), cues);
    }

    #[test]
    fn blinker_ends_run_on_constant_population() {
        let mut app = app_in(AppState::Setup);
        place_blinker(&mut app);
        app.handle(InputEvent::Advance);
        app.handle(InputEvent::Tick(INTERVAL * 4));
        assert_eq!(app.state(), AppState::Running);
        app.handle(InputEvent::Tick(INTERVAL));
        assert_eq!(app.state(), AppState::GameOver);
        assert_eq!(app.grid().alive_count(), 3);
    }

    #[test]
    fn editing_clears_stagnation_history() {
        let mut app = app_in(AppState::Running);
        app.handle(InputEvent::Tick(INTERVAL * 4));
        assert_eq!(app.tracker().history().len(), 4);

        app.handle(InputEvent::Advance);
        app.handle(InputEvent::PointerClick(Loc::new(0, 0)));
        assert!(app.tracker().history().is_empty());
        assert_eq!(app.snapshot().generation, 4);

        app.handle(InputEvent::PointerClick(Loc::new(0, 0)));
        app.handle(InputEvent::Advance);
        app.handle(InputEvent::Tick(INTERVAL * 4));
        assert_eq!(app.state(), AppState::Running);
    }

    #[test]
    fn randomize_and_clear_reset_the_run() {
        let mut app = app_in(AppState::Running);
        app.handle(InputEvent::Tick(INTERVAL * 3));

        app.handle(InputEvent::Randomize);
        assert_eq!(app.state(), AppState::Running);
        assert_eq!(app.snapshot().generation, 0);
        assert_eq!(app.snapshot().score, 0);
        assert!(app.tracker().history().is_empty());
        assert!(app.grid().alive_count() > 0);

        app.handle(InputEvent::Tick(INTERVAL * 2));
        app.handle(InputEvent::ClearBoard);
        assert_eq!(app.snapshot().generation, 0);
        assert_eq!(app.snapshot().alive_count, 0);
        assert!(app.tracker().history().is_empty());
        assert_eq!(app.take_cues().last(), Some(&SoundCue::Clear));
    }

    #[test]
    fn out_of_bounds_click_is_ignored() {
        let mut app = app_in(AppState::Setup);
        app.handle(InputEvent::PointerClick(Loc::new(8, 0)));
        app.handle(InputEvent::PointerClick(Loc::new(0, 100)));
        assert_eq!(app.grid().alive_count(), 0);
        assert!(app.take_cues().is_empty());
    }

    #[test]
    fn speed_changes_stay_in_bounds() {
        let mut app = app_in(AppState::Paused);
        for _ in 0..5 {
            app.handle(InputEvent::SpeedUp);
        }
        assert_eq!(app.speed_index(), 2);
        assert_eq!(app.snapshot().speed_label, "fast");
        for _ in 0..5 {
            app.handle(InputEvent::SpeedDown);
        }
        assert_eq!(app.speed_index(), 0);
        assert_eq!(app.take_cues(), vec![SoundCue::Click; 3]);
    }

    #[test]
    fn unlisted_events_are_no_ops() {
        let events = [
            InputEvent::Randomize,
            InputEvent::ClearBoard,
            InputEvent::SpeedUp,
            InputEvent::SpeedDown,
            InputEvent::PointerClick(Loc::new(1, 1)),
            InputEvent::Tick(INTERVAL * 3),
        ];
        for state in AppState::ALL {
            for event in events {
                let editable = state.is_editable();
                let steps = state == AppState::Running;
                if matches!(event, InputEvent::Tick(_)) && steps {
                    continue;
                }
                if !matches!(event, InputEvent::Tick(_)) && editable {
                    continue;
                }

                let mut app = app_in(state);
                let before = app.snapshot();
                let (generation, alive, score, best, speed) = (
                    before.generation,
                    before.alive_count,
                    before.score,
                    before.best_score,
                    before.speed_index,
                );
                let history = app.tracker().history().to_vec();

                assert_eq!(app.handle(event), Flow::Continue);
                let after = app.snapshot();
                assert_eq!(after.state, state, "{event:?} in {state:?}");
                assert_eq!(after.generation, generation);
                assert_eq!(after.alive_count, alive);
                assert_eq!(after.score, score);
                assert_eq!(after.best_score, best);
                assert_eq!(after.speed_index, speed);
                assert_eq!(app.tracker().history(), history.as_slice());
                assert!(app.take_cues().is_empty(), "{event:?} in {state:?}");
            }
        }
    }

    #[test]
    fn quit_and_escape_terminate_from_any_state() {
        for state in AppState::ALL {
            for event in [InputEvent::Quit, InputEvent::Escape] {
                let mut app = app_in(state);
                assert_eq!(app.handle(event), Flow::Exit);
                assert!(app.is_terminated());
                assert_eq!(app.handle(InputEvent::Advance), Flow::Exit);
                assert_eq!(app.state(), state);
            }
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig {
            speed_levels: vec![],
            ..test_config()
        };
        assert_eq!(
            LifeApp::new(config, Random::from_seed(0)).unwrap_err(),
            ConfigError::NoSpeedLevels
        );

        let config = GameConfig {
            alive_probability: -0.1,
            ..test_config()
        };
        assert_eq!(
            LifeApp::new(config, Random::from_seed(0)).unwrap_err(),
            ConfigError::AliveProbability(-0.1)
        );
    }
}
