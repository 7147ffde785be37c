use arrayvec::ArrayVec;

/// Number of consecutive equal live-cell counts that ends a run.
pub const STAGNATION_WINDOW: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Stagnant,
}

/// Score bookkeeping and end-of-run detection for one session.
///
/// A run ends once the last [`STAGNATION_WINDOW`] population counts are all
/// equal. Only the count is compared, not the configuration, so an
/// oscillator with a constant population (a blinker, say) also ends the run.
#[derive(Clone, Debug, Default)]
pub struct RunTracker {
    history: ArrayVec<usize, STAGNATION_WINDOW>,
    current_score: u64,
    best_score: u64,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_score(&self) -> u64 {
        self.current_score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Oldest first.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Zeroes the current score and forgets the population history. The
    /// best score is kept.
    pub fn reset_run(&mut self) {
        self.current_score = 0;
        self.clear_history();
    }

    /// Records the outcome of one generation step.
    pub fn record(&mut self, generation: u64, alive_count: usize) -> Verdict {
        self.current_score = generation;
        if self.history.is_full() {
            self.history.remove(0);
        }
        self.history.push(alive_count);

        if self.is_stagnant() {
            self.best_score = self.best_score.max(self.current_score);
            Verdict::Stagnant
        } else {
            Verdict::Continue
        }
    }

    pub fn is_stagnant(&self) -> bool {
        self.history.is_full() && self.history.iter().all(|&count| count == self.history[0])
    }
}
