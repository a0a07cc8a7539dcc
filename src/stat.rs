use serde::Serialize;
use tracing::info;

use crate::common::CellArena;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub nodes_expanded: usize,
    pub frontier_peak: usize,
    pub cells_allocated: usize,
    pub cells_released: usize,
    /// Cells handed back by the frontier as rejected or displaced.
    pub cells_abandoned: usize,
    pub time_us: usize,
}

impl Stats {
    pub(crate) fn record_arena(&mut self, cells: &CellArena) {
        self.cells_allocated += cells.allocated();
        self.cells_released += cells.released();
    }

    pub fn leaked(&self) -> usize {
        self.cells_allocated.saturating_sub(self.cells_released)
    }

    pub fn print(&self, solver: &str) {
        info!(
            "{solver}: Time(microseconds) {:?} Expanded nodes {:?} Frontier peak {:?} Cells allocated {:?} released {:?} abandoned {:?}",
            self.time_us,
            self.nodes_expanded,
            self.frontier_peak,
            self.cells_allocated,
            self.cells_released,
            self.cells_abandoned
        );
    }
}
