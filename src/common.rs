use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Grid coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    /// Step by `(dx, dy)`, staying inside a `rows` x `cols` grid.
    pub fn offset(&self, (dx, dy): (isize, isize), (rows, cols): (usize, usize)) -> Option<Coord> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        if x < cols && y < rows {
            Some(Coord { x, y })
        } else {
            None
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = String;

    /// Parses `"x,y"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
        let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
        let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
        Ok(Coord { x, y })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CellId(pub(crate) usize);

/// A search node: position plus bookkeeping. `parent` is an arena handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    pub coord: Coord,
    pub g: f64,
    pub h: f64,
    pub parent: Option<CellId>,
}

impl Cell {
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

/// Owns every cell a search allocates.
///
/// Slots are never reused, so a `CellId` stays valid as a parent link even
/// after its cell has been released. Releasing the same cell twice is an error.
#[derive(Debug, Default)]
pub struct CellArena {
    cells: Vec<Cell>,
    live: Vec<bool>,
    released: usize,
}

impl CellArena {
    pub fn alloc(&mut self, coord: Coord, parent: Option<CellId>, g: f64, h: f64) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(Cell {
            coord,
            g,
            h,
            parent,
        });
        self.live.push(true);
        id
    }

    pub fn get(&self, id: CellId) -> Result<&Cell, SearchError> {
        self.cells.get(id.0).ok_or(SearchError::UnknownCell(id))
    }

    pub fn release(&mut self, id: CellId) -> Result<(), SearchError> {
        match self.live.get_mut(id.0) {
            Some(live) if *live => {
                *live = false;
                self.released += 1;
                Ok(())
            }
            Some(_) => Err(SearchError::DoubleRelease(id)),
            None => Err(SearchError::UnknownCell(id)),
        }
    }

    pub fn is_live(&self, id: CellId) -> bool {
        self.live.get(id.0).copied().unwrap_or(false)
    }

    pub fn allocated(&self) -> usize {
        self.cells.len()
    }

    pub fn released(&self) -> usize {
        self.released
    }

    pub fn live(&self) -> usize {
        self.allocated() - self.released
    }
}

/// Outcome of one search run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    /// Copied cells from start to goal; `None` unless `success`.
    pub path: Option<Vec<Cell>>,
    pub path_cost: f64,
    pub nodes_expanded: usize,
    pub path_length: usize,
    pub success: bool,
}
