use life_game::{AppState, Snapshot};
use life_grid::{GridSize, Loc};
use log::warn;

const BACKGROUND_COLOR: [u8; 4] = [10, 10, 40, 0xff];
const GRID_LINE_COLOR: [u8; 4] = [40, 40, 40, 0xff];
const CELL_FALLBACK_COLOR: [u8; 4] = [0xff, 0, 0, 0xff];
const OUTLINE_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const MENU_SHADE: [u8; 4] = [0, 0, 0, 0xc0];
const GAME_OVER_SHADE: [u8; 4] = [0x80, 0, 0, 0x80];
const PAUSED_BORDER_COLOR: [u8; 4] = [0xff, 0xd0, 0x40, 0xff];
const PAUSED_BORDER_WIDTH: u32 = 3;

// Fill color and radius of each animation frame, designed for 20 px cells.
const CELL_FRAMES: [([u8; 3], f32); 4] = [
    ([255, 50, 50], 7.0),
    ([200, 0, 0], 6.0),
    ([255, 100, 100], 8.0),
    ([180, 0, 0], 7.0),
];
const SPRITE_DESIGN_WIDTH: f32 = 20.0;
const MIN_SPRITE_WIDTH: u32 = 6;

pub struct Renderer {
    grid_size: GridSize,
    cell_pixel_width: u32,
    sprites: Option<CellSprites>,
}

impl Renderer {
    pub fn new(grid_size: GridSize, cell_pixel_width: u32) -> Self {
        let sprites = CellSprites::new(cell_pixel_width);
        if sprites.is_none() {
            warn!(
                "{} px cells are too small for sprites, drawing squares",
                cell_pixel_width
            );
        }
        Self {
            grid_size,
            cell_pixel_width,
            sprites,
        }
    }

    pub fn buffer_size(&self) -> (u32, u32) {
        (
            self.grid_size.width * self.cell_pixel_width,
            self.grid_size.height * self.cell_pixel_width,
        )
    }

    pub fn draw(&self, snapshot: &Snapshot, frame: &mut [u8]) {
        let (width, height) = self.buffer_size();
        debug_assert_eq!(frame.len(), 4 * width as usize * height as usize);

        for (index, pixel) in frame.chunks_exact_mut(4).enumerate() {
            let x = (index % width as usize) as u32;
            let y = (index / width as usize) as u32;
            pixel.copy_from_slice(&self.pixel_color(snapshot, x, y));
        }
    }

    fn pixel_color(&self, snapshot: &Snapshot, x: u32, y: u32) -> [u8; 4] {
        let loc = Loc::new(y / self.cell_pixel_width, x / self.cell_pixel_width);
        let cell_x = x % self.cell_pixel_width;
        let cell_y = y % self.cell_pixel_width;

        let mut color = if cell_x == 0 || cell_y == 0 {
            GRID_LINE_COLOR
        } else {
            BACKGROUND_COLOR
        };
        if snapshot.grid.is_alive(loc) {
            let cell_color = self.cell_color(snapshot.generation, loc, cell_x, cell_y);
            color = alpha_blend_with_background(cell_color, color);
        }
        self.overlay(snapshot.state, x, y, color)
    }

    fn cell_color(&self, generation: u64, loc: Loc, cell_x: u32, cell_y: u32) -> [u8; 4] {
        match &self.sprites {
            Some(sprites) => sprites.pixel(frame_index(generation, loc), cell_x, cell_y),
            None => CELL_FALLBACK_COLOR,
        }
    }

    fn overlay(&self, state: AppState, x: u32, y: u32, color: [u8; 4]) -> [u8; 4] {
        match state {
            AppState::Menu | AppState::Controls => {
                alpha_blend_with_background(MENU_SHADE, color)
            }
            AppState::GameOver => alpha_blend_with_background(GAME_OVER_SHADE, color),
            AppState::Paused if self.on_border(x, y) => PAUSED_BORDER_COLOR,
            _ => color,
        }
    }

    fn on_border(&self, x: u32, y: u32) -> bool {
        let (width, height) = self.buffer_size();
        x < PAUSED_BORDER_WIDTH
            || y < PAUSED_BORDER_WIDTH
            || x >= width.saturating_sub(PAUSED_BORDER_WIDTH)
            || y >= height.saturating_sub(PAUSED_BORDER_WIDTH)
    }
}

/// Staggers the animation across the board so neighbors differ.
fn frame_index(generation: u64, loc: Loc) -> usize {
    let phase = generation + loc.row as u64 + loc.col as u64;
    (phase % CELL_FRAMES.len() as u64) as usize
}

/// Pre-rendered outlined discs, one per animation frame.
struct CellSprites {
    width: u32,
    frames: Vec<Vec<[u8; 4]>>,
}

impl CellSprites {
    fn new(width: u32) -> Option<Self> {
        if width < MIN_SPRITE_WIDTH {
            return None;
        }
        let frames = CELL_FRAMES
            .iter()
            .map(|&(fill, radius)| {
                Self::disc(width, fill, radius * width as f32 / SPRITE_DESIGN_WIDTH)
            })
            .collect();
        Some(Self { width, frames })
    }

    fn disc(width: u32, fill: [u8; 3], radius: f32) -> Vec<[u8; 4]> {
        let center = width as f32 / 2.0;
        let mut result = Vec::with_capacity(width as usize * width as usize);
        for y in 0..width {
            for x in 0..width {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let distance = (dx * dx + dy * dy).sqrt();
                result.push(if distance > radius {
                    [0, 0, 0, 0]
                } else if distance > radius - 1.0 {
                    OUTLINE_COLOR
                } else {
                    [fill[0], fill[1], fill[2], 0xff]
                });
            }
        }
        result
    }

    fn pixel(&self, frame: usize, x: u32, y: u32) -> [u8; 4] {
        self.frames[frame][(y * self.width + x) as usize]
    }
}

// alpha_blend with below_alpha set to 1.0
fn alpha_blend_with_background(above: [u8; 4], below: [u8; 4]) -> [u8; 4] {
    if above[3] == 0xff {
        return above;
    }
    if above[3] == 0x00 {
        return below;
    }

    let above_alpha = above[3] as f32 / 0xff as f32;
    let mut result: [u8; 4] = [0, 0, 0, 0xff];
    for ((channel, &top), &bottom) in result.iter_mut().zip(&above).zip(&below).take(3) {
        let blended = top as f32 * above_alpha + bottom as f32 * (1.0 - above_alpha);
        *channel = blended.round() as u8;
    }
    result
}
