#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod render;
mod sound;

use life_game::{AppState, Flow, GameConfig, InputEvent, LifeApp};
use life_grid::{GridSize, Loc, Random};
use log::info;
use pixels_main_support::{animate, PixelsApp};
use render::Renderer;
use sound::SoundManager;
use std::time::Duration;
use winit::keyboard::KeyCode;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const CELL_PIXEL_WIDTH: u32 = 20;
const FRAMES_PER_SECOND: u32 = 60;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = GameConfig {
        grid_size: GridSize::new(
            WINDOW_WIDTH / CELL_PIXEL_WIDTH,
            WINDOW_HEIGHT / CELL_PIXEL_WIDTH,
        ),
        ..GameConfig::default()
    };
    let app = LifeApp::new(config, Random::new())?;
    animate(
        ConwayFrontend::new(app, SoundManager::new()),
        FRAMES_PER_SECOND,
    )
}

struct ConwayFrontend {
    app: LifeApp,
    renderer: Renderer,
    sounds: SoundManager,
}

impl ConwayFrontend {
    fn new(app: LifeApp, sounds: SoundManager) -> Self {
        Self {
            renderer: Renderer::new(app.grid().size(), CELL_PIXEL_WIDTH),
            app,
            sounds,
        }
    }

    fn send(&mut self, event: InputEvent) -> Flow {
        let flow = self.app.handle(event);
        for cue in self.app.take_cues() {
            self.sounds.play(cue);
        }
        flow
    }
}

impl PixelsApp for ConwayFrontend {
    fn buffer_size(&self) -> (u32, u32) {
        self.renderer.buffer_size()
    }

    fn title(&self) -> String {
        let snapshot = self.app.snapshot();
        format!(
            "Game of Life - {} | generation {} | alive {} | score {} | best {} | speed {} | {}",
            snapshot.state.label(),
            snapshot.generation,
            snapshot.alive_count,
            snapshot.score,
            snapshot.best_score,
            snapshot.speed_label,
            key_help(snapshot.state),
        )
    }

    fn on_key(&mut self, code: KeyCode) -> Flow {
        match key_event(code) {
            Some(event) => self.send(event),
            None => Flow::Continue,
        }
    }

    fn on_click(&mut self, x: usize, y: usize) -> Flow {
        match pixel_to_loc(x, y, CELL_PIXEL_WIDTH) {
            Some(loc) => self.send(InputEvent::PointerClick(loc)),
            None => Flow::Continue,
        }
    }

    fn on_frame(&mut self, dt: Duration) -> Flow {
        self.send(InputEvent::Tick(dt))
    }

    fn render(&self, frame: &mut [u8]) {
        self.renderer.draw(&self.app.snapshot(), frame);
    }

    fn on_close(&mut self) {
        self.send(InputEvent::Quit);
        info!(
            "Best score this session: {} ({} sound cues)",
            self.app.tracker().best_score(),
            self.sounds.num_played()
        );
    }
}

fn key_event(code: KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => Some(InputEvent::Advance),
        KeyCode::KeyR => Some(InputEvent::Randomize),
        KeyCode::KeyC => Some(InputEvent::ClearBoard),
        KeyCode::ArrowUp | KeyCode::Equal | KeyCode::NumpadAdd => Some(InputEvent::SpeedUp),
        KeyCode::ArrowDown | KeyCode::Minus | KeyCode::NumpadSubtract => {
            Some(InputEvent::SpeedDown)
        }
        KeyCode::KeyQ => Some(InputEvent::Quit),
        KeyCode::Escape => Some(InputEvent::Escape),
        _ => None,
    }
}

fn pixel_to_loc(x: usize, y: usize, cell_pixel_width: u32) -> Option<Loc> {
    let cell_pixel_width = cell_pixel_width as usize;
    let row = u32::try_from(y / cell_pixel_width).ok()?;
    let col = u32::try_from(x / cell_pixel_width).ok()?;
    Some(Loc::new(row, col))
}

fn key_help(state: AppState) -> &'static str {
    match state {
        AppState::Menu => "Enter: controls, Q: quit",
        AppState::Controls => {
            "Enter: start/pause, R: random, C: clear, Up/Down: speed, click: toggle cell"
        }
        AppState::Setup => "click cells, R: random, Enter: run",
        AppState::Running => "Enter: pause",
        AppState::Paused => "Enter: resume",
        AppState::GameOver => "Enter: new run",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_events() {
        assert_eq!(key_event(KeyCode::Space), Some(InputEvent::Advance));
        assert_eq!(key_event(KeyCode::KeyR), Some(InputEvent::Randomize));
        assert_eq!(key_event(KeyCode::Minus), Some(InputEvent::SpeedDown));
        assert_eq!(key_event(KeyCode::Escape), Some(InputEvent::Escape));
        assert_eq!(key_event(KeyCode::KeyZ), None);
    }

    #[test]
    fn pixels_map_to_cells() {
        assert_eq!(pixel_to_loc(0, 0, 20), Some(Loc::new(0, 0)));
        assert_eq!(pixel_to_loc(19, 39, 20), Some(Loc::new(1, 0)));
        assert_eq!(pixel_to_loc(799, 599, 20), Some(Loc::new(29, 39)));
    }

    #[test]
    fn frontend_forwards_cues_and_quits() {
        let config = GameConfig {
            grid_size: GridSize::new(10, 10),
            ..GameConfig::default()
        };
        let app = LifeApp::new(config, Random::from_seed(5)).unwrap();
        let mut frontend = ConwayFrontend::new(app, SoundManager::muted());
        assert_eq!(frontend.buffer_size(), (200, 200));

        frontend.on_key(KeyCode::Enter);
        frontend.on_key(KeyCode::Enter);
        assert_eq!(frontend.on_click(45, 25), Flow::Continue);
        assert!(frontend.app.grid().is_alive(Loc::new(1, 2)));
        assert!(frontend.app.take_cues().is_empty());
        assert_eq!(frontend.sounds.num_played(), 0);
        assert!(frontend.title().starts_with("Game of Life - setup"));

        assert_eq!(frontend.on_key(KeyCode::KeyQ), Flow::Exit);
    }
}
