use super::{check_endpoints, expand, OpenList};
use crate::common::{Cell, CellId, Coord, SearchResult};
use crate::error::SearchError;
use crate::frontier::{Fifo, Lifo};
use crate::map::{CellState, Map};
use crate::stat::Stats;

use tracing::instrument;

// First-seen wins: a cell already marked frontier or expanded is never offered again.
fn unseen(state: CellState) -> bool {
    matches!(state, CellState::Free | CellState::Goal)
}

impl OpenList for Fifo<CellId> {
    fn admits(&self, state: CellState) -> bool {
        unseen(state)
    }

    fn is_empty(&self) -> bool {
        Fifo::is_empty(self)
    }

    fn len(&self) -> usize {
        Fifo::len(self)
    }

    fn pop(&mut self) -> Result<CellId, SearchError> {
        Fifo::pop(self)
    }

    fn offer(&mut self, id: CellId, _cell: &Cell) -> Option<CellId> {
        self.push(id);
        None
    }

    fn drain(&mut self) -> Vec<CellId> {
        Fifo::drain(self)
    }
}

impl OpenList for Lifo<CellId> {
    fn admits(&self, state: CellState) -> bool {
        unseen(state)
    }

    fn is_empty(&self) -> bool {
        Lifo::is_empty(self)
    }

    fn len(&self) -> usize {
        Lifo::len(self)
    }

    fn pop(&mut self) -> Result<CellId, SearchError> {
        Lifo::pop(self)
    }

    fn offer(&mut self, id: CellId, _cell: &Cell) -> Option<CellId> {
        self.push(id);
        None
    }

    fn drain(&mut self) -> Vec<CellId> {
        Lifo::drain(self)
    }
}

/// Breadth-first search. Shortest in number of steps, not in distance.
#[instrument(skip_all, name = "bfs", fields(start = %start, goal = %goal), level = "debug")]
pub fn breadth_first_search(
    map: &mut Map,
    start: Coord,
    goal: Coord,
    stats: &mut Stats,
) -> Result<SearchResult, SearchError> {
    check_endpoints(map, start, goal)?;
    expand(map, start, goal, &mut Fifo::new(), |_| 0.0, stats)
}

/// Depth-first search. Finds a path if one exists, with no length guarantee.
#[instrument(skip_all, name = "dfs", fields(start = %start, goal = %goal), level = "debug")]
pub fn depth_first_search(
    map: &mut Map,
    start: Coord,
    goal: Coord,
    stats: &mut Stats,
) -> Result<SearchResult, SearchError> {
    check_endpoints(map, start, goal)?;
    expand(map, start, goal, &mut Lifo::new(), |_| 0.0, stats)
}
