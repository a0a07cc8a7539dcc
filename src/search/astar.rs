use super::{check_endpoints, distance, expand, OpenList};
use crate::common::{Cell, CellId, Coord, SearchResult};
use crate::error::SearchError;
use crate::frontier::{IndexedPriorityQueue, PositionIndex, PushOutcome};
use crate::map::{CellState, Map};
use crate::stat::Stats;

use tracing::{instrument, trace};

impl OpenList for IndexedPriorityQueue<Coord, CellId> {
    // Frontier cells stay eligible so a cheaper route can replace them.
    fn admits(&self, state: CellState) -> bool {
        !matches!(state, CellState::Blocked | CellState::Expanded)
    }

    fn is_empty(&self) -> bool {
        IndexedPriorityQueue::is_empty(self)
    }

    fn len(&self) -> usize {
        IndexedPriorityQueue::len(self)
    }

    fn pop(&mut self) -> Result<CellId, SearchError> {
        self.pop_min()
    }

    fn offer(&mut self, id: CellId, cell: &Cell) -> Option<CellId> {
        match self.push_or_improve(cell.coord, id, cell.f()) {
            PushOutcome::Accepted => None,
            PushOutcome::Displaced(old) => {
                trace!("improve node {} to g {:.3}", cell.coord, cell.g);
                Some(old)
            }
            PushOutcome::Rejected(new) => Some(new),
        }
    }

    fn drain(&mut self) -> Vec<CellId> {
        IndexedPriorityQueue::drain(self)
    }
}

/// A* with the straight-line distance to `goal` as heuristic.
///
/// `index_buckets` sizes the coordinate index behind the open list; it is
/// fixed for the whole search.
#[instrument(skip_all, name = "a_star", fields(start = %start, goal = %goal), level = "debug")]
pub fn a_star_search(
    map: &mut Map,
    start: Coord,
    goal: Coord,
    index_buckets: usize,
    stats: &mut Stats,
) -> Result<SearchResult, SearchError> {
    check_endpoints(map, start, goal)?;

    let mut open = IndexedPriorityQueue::new(PositionIndex::for_coords(index_buckets)?);
    expand(map, start, goal, &mut open, |coord| distance(coord, goal), stats)
}
