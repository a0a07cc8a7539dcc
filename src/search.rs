mod astar;
mod greedy;
mod path;
mod uninformed;

pub use astar::a_star_search;
pub use greedy::greedy_search;
pub use uninformed::{breadth_first_search, depth_first_search};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, trace};

use crate::common::{Cell, CellArena, CellId, Coord, SearchResult};
use crate::error::SearchError;
use crate::map::{CellState, Map};
use crate::stat::Stats;

/// Bucket count used by A* for its coordinate index unless told otherwise.
pub const DEFAULT_INDEX_BUCKETS: usize = 101;

/// Neighbour offsets as `(dx, dy)` with `y` growing downwards:
/// N, NE, E, SE, S, SW, W, NW. Tie-breaking depends on this order.
const DIRECTIONS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum Strategy {
    #[value(name = "astar")]
    #[serde(rename = "astar")]
    AStar,
    #[value(name = "bfs")]
    #[serde(rename = "bfs")]
    BreadthFirst,
    #[value(name = "dfs")]
    #[serde(rename = "dfs")]
    DepthFirst,
    #[value(name = "greedy")]
    #[serde(rename = "greedy")]
    Greedy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::AStar => "astar",
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
            Strategy::Greedy => "greedy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub index_buckets: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            index_buckets: DEFAULT_INDEX_BUCKETS,
        }
    }
}

/// Runs `strategy` from `start` to `goal`, marking expanded and frontier
/// cells on `map`.
pub fn search(
    map: &mut Map,
    start: Coord,
    goal: Coord,
    strategy: Strategy,
    options: &SearchOptions,
    stats: &mut Stats,
) -> Result<SearchResult, SearchError> {
    match strategy {
        Strategy::AStar => a_star_search(map, start, goal, options.index_buckets, stats),
        Strategy::BreadthFirst => breadth_first_search(map, start, goal, stats),
        Strategy::DepthFirst => depth_first_search(map, start, goal, stats),
        Strategy::Greedy => greedy_search(map, start, goal, stats),
    }
}

/// Straight-line distance between two cells.
pub fn distance(a: Coord, b: Coord) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

fn check_endpoints(map: &Map, start: Coord, goal: Coord) -> Result<(), SearchError> {
    map.state_at(start)?;
    map.state_at(goal)?;
    Ok(())
}

/// A frontier the shared expansion loop can drive.
trait OpenList {
    /// Whether a neighbour currently in `state` may be offered.
    fn admits(&self, state: CellState) -> bool;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;

    fn pop(&mut self) -> Result<CellId, SearchError>;

    /// Hands `id` to the frontier. A returned id is one the frontier gave up
    /// on; the caller releases it.
    fn offer(&mut self, id: CellId, cell: &Cell) -> Option<CellId>;

    fn drain(&mut self) -> Vec<CellId>;
}

/// Expansion loop shared by A*, BFS and DFS.
///
/// Every cell allocated here is released exactly once before returning:
/// abandoned offers right away, frontier leftovers and expanded cells at the end.
fn expand<O, H>(
    map: &mut Map,
    start: Coord,
    goal: Coord,
    open: &mut O,
    heuristic: H,
    stats: &mut Stats,
) -> Result<SearchResult, SearchError>
where
    O: OpenList,
    H: Fn(Coord) -> f64,
{
    let started = Instant::now();
    let mut result = SearchResult::default();
    let mut cells = CellArena::default();
    let mut visited = Vec::new();
    let mut reached = None;

    let start_id = cells.alloc(start, None, 0.0, heuristic(start));
    if let Some(dropped) = open.offer(start_id, cells.get(start_id)?) {
        cells.release(dropped)?;
    }

    while !open.is_empty() {
        stats.frontier_peak = stats.frontier_peak.max(open.len());

        let current_id = open.pop()?;
        let current = *cells.get(current_id)?;
        trace!("expand node: {current:?}");

        map.mark(current.coord, CellState::Expanded)?;
        result.nodes_expanded += 1;
        visited.push(current_id);

        if current.coord == goal {
            reached = Some(current_id);
            break;
        }

        for direction in DIRECTIONS {
            let Some(next) = current.coord.offset(direction, map.dimensions()) else {
                continue;
            };
            if !open.admits(map.state_at(next)?) {
                continue;
            }

            map.mark(next, CellState::Frontier)?;
            let g = current.g + distance(current.coord, next);
            let id = cells.alloc(next, Some(current_id), g, heuristic(next));

            if let Some(dropped) = open.offer(id, cells.get(id)?) {
                cells.release(dropped)?;
                stats.cells_abandoned += 1;
            }
        }
    }

    match reached {
        Some(goal_id) => path::reconstruct(&cells, goal_id, &mut result)?,
        None => debug!(
            "cannot find solution after {} expansions",
            result.nodes_expanded
        ),
    }

    for id in open.drain() {
        cells.release(id)?;
    }
    for id in visited {
        cells.release(id)?;
    }
    debug_assert_eq!(cells.live(), 0);

    stats.nodes_expanded += result.nodes_expanded;
    stats.record_arena(&cells);
    stats.time_us += started.elapsed().as_micros() as usize;
    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub(crate) const EPS: f64 = 1e-9;

    // Helper function to setup tracing
    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    /// Checks the shape every successful result must have.
    pub(crate) fn assert_valid_path(map: &Map, result: &SearchResult, start: Coord, goal: Coord) {
        assert!(result.success);
        let path = result.path.as_ref().expect("successful search keeps its path");
        assert_eq!(result.path_length, path.len());
        assert_eq!(path.first().unwrap().coord, start);
        assert_eq!(path.last().unwrap().coord, goal);

        let mut cost = 0.0;
        for pair in path.windows(2) {
            let (a, b) = (pair[0].coord, pair[1].coord);
            assert!(a.x.abs_diff(b.x) <= 1 && a.y.abs_diff(b.y) <= 1 && a != b);
            assert_ne!(map.state_at(b).unwrap(), CellState::Blocked);
            cost += distance(a, b);
        }
        assert!((cost - result.path_cost).abs() < EPS);
    }

    fn all_strategies() -> [Strategy; 3] {
        [Strategy::AStar, Strategy::BreadthFirst, Strategy::DepthFirst]
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Coord::new(0, 0), Coord::new(3, 4)), 5.0);
        assert!((distance(Coord::new(1, 1), Coord::new(2, 2)) - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::AStar.to_string(), "astar");
        assert_eq!(Strategy::from_str("bfs", true).unwrap(), Strategy::BreadthFirst);
        let parsed: Vec<Strategy> = serde_yaml::from_str("[astar, dfs, greedy]").unwrap();
        assert_eq!(
            parsed,
            vec![Strategy::AStar, Strategy::DepthFirst, Strategy::Greedy]
        );
    }

    #[test]
    fn test_endpoints_out_of_bounds() {
        let mut map = Map::new(3, 3);
        for strategy in [
            Strategy::AStar,
            Strategy::BreadthFirst,
            Strategy::DepthFirst,
            Strategy::Greedy,
        ] {
            let result = search(
                &mut map,
                Coord::new(0, 0),
                Coord::new(3, 0),
                strategy,
                &SearchOptions::default(),
                &mut Stats::default(),
            );
            assert!(matches!(result, Err(SearchError::OutOfBounds { .. })));
        }
    }

    #[test]
    fn test_start_equals_goal() {
        for strategy in all_strategies() {
            let mut map = Map::new(3, 3);
            let result = search(
                &mut map,
                Coord::new(1, 1),
                Coord::new(1, 1),
                strategy,
                &SearchOptions::default(),
                &mut Stats::default(),
            )
            .unwrap();
            assert_valid_path(&map, &result, Coord::new(1, 1), Coord::new(1, 1));
            assert_eq!(result.path_length, 1);
            assert_eq!(result.path_cost, 0.0);
            assert_eq!(result.nodes_expanded, 1);
        }
    }

    #[test]
    fn test_unreachable_goal_releases_everything() {
        init_tracing();
        // Goal walled in at the bottom-right corner.
        let rows = ["....", "....", "..##", "..#."];
        for strategy in all_strategies() {
            let mut map = Map::from_rows(&rows);
            let mut stats = Stats::default();
            let result = search(
                &mut map,
                Coord::new(0, 0),
                Coord::new(3, 3),
                strategy,
                &SearchOptions::default(),
                &mut stats,
            )
            .unwrap();

            assert!(!result.success);
            assert!(result.path.is_none());
            assert_eq!(result.path_length, 0);
            assert_eq!(result.nodes_expanded, 12);
            assert_eq!(map.count(CellState::Expanded), 12);
            assert_eq!(map.count(CellState::Frontier), 0);
            assert!(stats.cells_allocated > 0);
            assert_eq!(stats.leaked(), 0);
        }
    }

    #[test]
    fn test_random_maps_release_every_cell() {
        let mut rng = StdRng::seed_from_u64(2024);
        for round in 0..30 {
            let mut base = Map::random(12, 15, 0.3, &mut rng);
            let start = Coord::new(0, 0);
            let goal = Coord::new(14, 11);
            base.mark(start, CellState::Free).unwrap();
            base.mark(goal, CellState::Free).unwrap();

            let mut outcomes = Vec::new();
            for strategy in all_strategies() {
                let mut map = base.clone();
                let mut stats = Stats::default();
                let result = search(
                    &mut map,
                    start,
                    goal,
                    strategy,
                    &SearchOptions::default(),
                    &mut stats,
                )
                .unwrap();

                assert_eq!(stats.cells_allocated, stats.cells_released, "round {round}");
                assert_eq!(stats.nodes_expanded, result.nodes_expanded);
                assert_eq!(map.count(CellState::Expanded), result.nodes_expanded);
                if result.success {
                    assert_valid_path(&base, &result, start, goal);
                } else {
                    assert!(result.path.is_none());
                }
                outcomes.push(result);
            }

            // All complete strategies agree on reachability.
            assert!(outcomes.iter().all(|r| r.success == outcomes[0].success));
            if outcomes[0].success {
                let a_star = outcomes[0].path_cost;
                assert!(a_star <= outcomes[1].path_cost + EPS);
                assert!(a_star <= outcomes[2].path_cost + EPS);
            }
        }
    }
}
