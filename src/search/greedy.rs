use super::{check_endpoints, distance};
use crate::common::{Cell, Coord, SearchResult};
use crate::error::SearchError;
use crate::map::{CellState, Map};
use crate::stat::Stats;

use std::time::Instant;
use tracing::{debug, instrument};

fn step_toward(from: usize, to: usize) -> isize {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}

/// Walks straight at the goal one cell at a time, moving diagonally while
/// both axes differ. Gives up at the first blocked cell; no backtracking.
/// The grid is only read.
#[instrument(skip_all, name = "greedy", fields(start = %start, goal = %goal), level = "debug")]
pub fn greedy_search(
    map: &Map,
    start: Coord,
    goal: Coord,
    stats: &mut Stats,
) -> Result<SearchResult, SearchError> {
    check_endpoints(map, start, goal)?;
    let started = Instant::now();

    let mut result = SearchResult::default();
    let mut path = vec![Cell {
        coord: start,
        g: 0.0,
        h: distance(start, goal),
        parent: None,
    }];
    let mut cost = 0.0;
    let mut current = start;
    result.nodes_expanded += 1;

    let mut success = true;
    while current != goal {
        let direction = (step_toward(current.x, goal.x), step_toward(current.y, goal.y));

        let next = match current.offset(direction, map.dimensions()) {
            Some(next) if map.state_at(next)? != CellState::Blocked => next,
            blocked => {
                debug!("walk stopped at {current}, next step {blocked:?} is not passable");
                success = false;
                break;
            }
        };

        cost += distance(current, next);
        current = next;
        path.push(Cell {
            coord: current,
            g: cost,
            h: distance(current, goal),
            parent: None,
        });
        result.nodes_expanded += 1;
    }

    // Length and cost of the partial walk survive a failure; only the path is dropped.
    result.path_length = path.len();
    result.path_cost = cost;
    if success {
        result.path = Some(path);
        result.success = true;
    }

    stats.nodes_expanded += result.nodes_expanded;
    stats.time_us += started.elapsed().as_micros() as usize;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::a_star_search;
    use crate::search::tests::{assert_valid_path, EPS};
    use crate::search::DEFAULT_INDEX_BUCKETS;

    #[test]
    fn test_greedy_diagonal_then_straight() {
        let map = Map::new(3, 5);
        let result = greedy_search(&map, Coord::new(0, 0), Coord::new(3, 1), &mut Stats::default()).unwrap();

        assert_valid_path(&map, &result, Coord::new(0, 0), Coord::new(3, 1));
        let coords: Vec<Coord> = result.path.as_ref().unwrap().iter().map(|c| c.coord).collect();
        assert_eq!(
            coords,
            vec![Coord::new(0, 0), Coord::new(1, 1), Coord::new(2, 1), Coord::new(3, 1)]
        );
        assert_eq!(result.nodes_expanded, 4);
        assert!((result.path_cost - (2f64.sqrt() + 2.0)).abs() < EPS);
        // Read-only.
        assert_eq!(map.count(CellState::Expanded), 0);
    }

    #[test]
    fn test_greedy_fails_on_blocked_line() {
        // Column x = 0 blocked at y = 3, between (0, 0) and (0, 5).
        let rows = ["...", "...", "...", "#..", "...", "..."];
        let start = Coord::new(0, 0);
        let goal = Coord::new(0, 5);

        let map = Map::from_rows(&rows);
        let mut stats = Stats::default();
        let result = greedy_search(&map, start, goal, &mut stats).unwrap();
        assert!(!result.success);
        assert!(result.path.is_none());
        // Start plus the two steps taken before the wall.
        assert_eq!(result.path_length, 3);
        assert_eq!(result.path_cost, 2.0);
        assert_eq!(result.nodes_expanded, 3);

        let mut map = Map::from_rows(&rows);
        let a_star = a_star_search(&mut map, start, goal, DEFAULT_INDEX_BUCKETS, &mut Stats::default()).unwrap();
        assert!(a_star.success);
        assert_valid_path(&Map::from_rows(&rows), &a_star, start, goal);
    }

    #[test]
    fn test_greedy_in_place() {
        let map = Map::new(2, 2);
        let result = greedy_search(&map, Coord::new(1, 1), Coord::new(1, 1), &mut Stats::default()).unwrap();
        assert!(result.success);
        assert_eq!(result.path_length, 1);
        assert_eq!(result.nodes_expanded, 1);
    }
}
