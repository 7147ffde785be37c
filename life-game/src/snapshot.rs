use crate::state::AppState;
use life_grid::CellGrid;

/// Read-only view of everything the front end draws in one frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a CellGrid,
    pub state: AppState,
    pub generation: u64,
    pub alive_count: usize,
    pub score: u64,
    pub best_score: u64,
    pub speed_index: usize,
    pub speed_label: &'static str,
}
