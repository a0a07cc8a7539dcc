use super::distance;
use crate::common::{CellArena, CellId, SearchResult};
use crate::error::SearchError;

/// Walks parent links back from `goal`, copies the cells into `result` in
/// start-to-goal order and totals the step distances.
pub(super) fn reconstruct(
    cells: &CellArena,
    goal: CellId,
    result: &mut SearchResult,
) -> Result<(), SearchError> {
    let mut path = Vec::new();
    let mut cost = 0.0;
    let mut current = Some(goal);

    while let Some(id) = current {
        let cell = *cells.get(id)?;
        if let Some(parent) = cell.parent {
            cost += distance(cell.coord, cells.get(parent)?.coord);
        }
        path.push(cell);
        current = cell.parent;
    }

    path.reverse();

    result.path_length = path.len();
    result.path_cost = cost;
    result.path = Some(path);
    result.success = true;
    Ok(())
}
