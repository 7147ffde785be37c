#![deny(clippy::all)]
#![forbid(unsafe_code)]

use log::{trace, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::mem;
use std::ops::{Index, IndexMut};

pub const DEFAULT_ALIVE_PROBABILITY: f64 = 0.25;

/// Fixed-size Game of Life board. Cells outside the board are treated as
/// permanently dead; there is no wraparound.
#[derive(Clone, Debug)]
pub struct CellGrid {
    size: GridSize,
    cells: GridCells,
    next_cells: GridCells,
    generation: u64,
}

impl CellGrid {
    pub fn new(size: GridSize) -> Self {
        assert!(size.width > 0 && size.height > 0);
        Self {
            size,
            cells: GridCells::new(size),
            next_cells: GridCells::new(size),
            generation: 0,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reset_generation(&mut self) {
        self.generation = 0;
    }

    /// Row-major, top-left first.
    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &LifeCell> + Clone {
        self.cells.cells_iter()
    }

    pub fn is_alive(&self, loc: Loc) -> bool {
        self.cells.cell(loc).is_some_and(|cell| cell.alive)
    }

    /// Out-of-bounds locations are ignored.
    pub fn set_alive(&mut self, loc: Loc, alive: bool) {
        if let Some(cell) = self.cells.cell_mut(loc) {
            cell.alive = alive;
        }
    }

    /// Flips one cell. Out-of-bounds locations are ignored; the return value
    /// says whether a cell was actually flipped.
    pub fn toggle_cell(&mut self, loc: Loc) -> bool {
        match self.cells.cell_mut(loc) {
            Some(cell) => {
                *cell = cell.toggled();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(LifeCell::DEAD);
        self.generation = 0;
    }

    /// Sets each cell alive independently with the given probability.
    /// Probabilities outside `[0, 1]` are clamped into it and NaN counts as 0.
    pub fn randomize(&mut self, probability: f64, rand: &mut Random) {
        let probability = clamp_probability(probability);
        for cell in self.cells.cells_iter_mut() {
            cell.alive = rand.next_bool(probability);
        }
        self.generation = 0;
    }

    /// Counts live cells among the eight neighbors of `loc`. Neighbors that
    /// fall off the board count as dead, and so does everything around a
    /// `loc` that is itself off the board, except for the board cells
    /// touching it.
    pub fn count_alive_neighbors(&self, loc: Loc) -> u32 {
        Neighborhood::new(&self.cells, loc).num_live_neighbors()
    }

    /// Advances one generation. The next generation is computed entirely
    /// from the current one before it replaces it. Returns whether any cell
    /// changed state.
    pub fn step(&mut self) -> bool {
        let mut changed = false;
        for row in 0..self.size.height {
            for col in 0..self.size.width {
                changed |= self.update_cell(Loc::new(row, col));
            }
        }
        mem::swap(&mut self.next_cells, &mut self.cells);
        self.generation += 1;
        trace!(
            "generation {} ({})",
            self.generation,
            if changed { "changed" } else { "unchanged" }
        );
        changed
    }

    fn update_cell(&mut self, loc: Loc) -> bool {
        let cell = self.cells[loc];
        let neighborhood = Neighborhood::new(&self.cells, loc);
        let next_cell = cell.next(neighborhood.num_live_neighbors());
        self.next_cells[loc] = next_cell;
        next_cell != cell
    }

    pub fn alive_count(&self) -> usize {
        self.cells_iter().filter(|cell| cell.alive).count()
    }
}

fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        warn!("Alive probability is NaN, using 0");
        0.0
    } else if !(0.0..=1.0).contains(&probability) {
        warn!("Alive probability {} outside [0, 1], clamping", probability);
        probability.clamp(0.0, 1.0)
    } else {
        probability
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LifeCell {
    pub alive: bool,
}

impl LifeCell {
    pub const DEAD: LifeCell = LifeCell { alive: false };

    pub fn toggled(self) -> Self {
        Self { alive: !self.alive }
    }

    /// Standard B3/S23 rule.
    pub fn next(self, live_neighbors: u32) -> Self {
        let alive = if self.alive {
            (2..=3).contains(&live_neighbors)
        } else {
            live_neighbors == 3
        };
        Self { alive }
    }
}

#[derive(Clone, Debug)]
pub struct GridCells {
    cells: Vec<LifeCell>,
    size: GridSize,
}

impl GridCells {
    pub fn new(size: GridSize) -> Self {
        assert!(size.width != 0 && size.height != 0);
        Self {
            cells: vec![LifeCell::default(); size.num_cells()],
            size,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &LifeCell> + Clone {
        self.cells.iter()
    }

    pub fn cells_iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut LifeCell> {
        self.cells.iter_mut()
    }

    pub fn cell(&self, loc: Loc) -> Option<&LifeCell> {
        loc.grid_index(self.size).map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut LifeCell> {
        loc.grid_index(self.size).map(|index| &mut self.cells[index])
    }

    pub fn fill(&mut self, cell: LifeCell) {
        self.cells.fill(cell);
    }
}

impl Index<Loc> for GridCells {
    type Output = LifeCell;

    fn index(&self, loc: Loc) -> &Self::Output {
        self.cell(loc)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl IndexMut<Loc> for GridCells {
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.cell_mut(loc)
            .unwrap_or_else(|| panic!("Index_mut indices {}, {} out of bounds", loc.row, loc.col))
    }
}

/// The Moore neighborhood of one location, clipped to the board.
pub struct Neighborhood<'a> {
    cells: &'a GridCells,
    rows: [Option<u32>; 3],
    cols: [Option<u32>; 3],
}

impl<'a> Neighborhood<'a> {
    pub fn new(cells: &'a GridCells, center: Loc) -> Self {
        let size = cells.size();
        Self {
            cells,
            rows: Self::adjacent_indexes(center.row, size.height),
            cols: Self::adjacent_indexes(center.col, size.width),
        }
    }

    pub fn num_live_neighbors(&self) -> u32 {
        let mut result = 0;
        self.for_neighbor_cells(|neighbor| {
            if neighbor.alive {
                result += 1;
            }
        });
        result
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&LifeCell),
    {
        self.for_cell(0, 0, &mut f);
        self.for_cell(0, 1, &mut f);
        self.for_cell(0, 2, &mut f);

        self.for_cell(1, 0, &mut f);
        self.for_cell(1, 2, &mut f);

        self.for_cell(2, 0, &mut f);
        self.for_cell(2, 1, &mut f);
        self.for_cell(2, 2, &mut f);
    }

    fn for_cell<F>(&self, row: usize, col: usize, f: &mut F)
    where
        F: FnMut(&LifeCell),
    {
        if let (Some(row), Some(col)) = (self.rows[row], self.cols[col]) {
            f(&self.cells[Loc::new(row, col)]);
        }
    }

    fn adjacent_indexes(index: u32, max: u32) -> [Option<u32>; 3] {
        [index.checked_sub(1), Some(index), index.checked_add(1)]
            .map(|adjacent| adjacent.filter(|&adjacent| adjacent < max))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn grid_index(&self, size: GridSize) -> Option<usize> {
        if self.row < size.height && self.col < size.width {
            Some(self.row as usize * size.width as usize + self.col as usize)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
