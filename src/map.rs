use anyhow::{anyhow, Context};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::fs;

use crate::common::{Cell, Coord};
use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellState {
    Free,
    Blocked,
    Start,
    Goal,
    Expanded,
    Frontier,
}

impl CellState {
    fn symbol(self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Blocked => '#',
            CellState::Start => 'S',
            CellState::Goal => 'G',
            CellState::Expanded => 'x',
            CellState::Frontier => 'o',
        }
    }

    fn from_symbol(ch: char) -> Self {
        // Octile maps mark passable terrain with '.', 'G' and 'S'.
        match ch {
            '.' | 'G' | 'S' => CellState::Free,
            _ => CellState::Blocked,
        }
    }
}

/// Fixed-size grid of cell states, indexed by `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    grid: Vec<Vec<CellState>>,
}

impl Map {
    pub fn new(height: usize, width: usize) -> Self {
        Map {
            height,
            width,
            grid: vec![vec![CellState::Free; width]; height],
        }
    }

    /// Builds a map from raw rows. Rows shorter than the first are padded
    /// with blocked cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let grid: Vec<Vec<CellState>> = rows
            .iter()
            .map(|row| {
                let mut line: Vec<CellState> = row
                    .as_ref()
                    .chars()
                    .take(width)
                    .map(CellState::from_symbol)
                    .collect();
                line.resize(width, CellState::Blocked);
                line
            })
            .collect();

        Map {
            height: grid.len(),
            width,
            grid,
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading map {path}"))?;
        Self::parse(&text).with_context(|| format!("parsing map {path}"))
    }

    /// Parses the octile `.map` format, or bare rows when there is no header.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let first = match lines.clone().next() {
            Some(line) => line,
            None => return Err(anyhow!("empty map")),
        };
        if !first.starts_with("type") {
            let rows: Vec<&str> = lines.map(str::trim_end).collect();
            return Ok(Self::from_rows(&rows));
        }

        let _type = lines.next();
        let height = Self::parse_header(lines.next(), "height")?;
        let width = Self::parse_header(lines.next(), "width")?;
        match lines.next() {
            Some(line) if line.trim() == "map" => {}
            other => return Err(anyhow!("expected `map`, got {other:?}")),
        }

        // Anything past the header width is ignored.
        let rows: Vec<String> = lines
            .take(height)
            .map(|row| row.chars().take(width).collect())
            .collect();
        if rows.len() != height {
            return Err(anyhow!("expected {height} rows, found {}", rows.len()));
        }
        if let Some(row) = rows.iter().find(|row| row.chars().count() < width) {
            return Err(anyhow!("row `{row}` shorter than width {width}"));
        }

        Ok(Self::from_rows(&rows))
    }

    fn parse_header(line: Option<&str>, key: &str) -> anyhow::Result<usize> {
        let line = line.ok_or_else(|| anyhow!("missing `{key}` line"))?;
        let mut parts = line.split_whitespace();
        if parts.next() != Some(key) {
            return Err(anyhow!("expected `{key}`, got `{line}`"));
        }
        parts
            .next()
            .ok_or_else(|| anyhow!("missing value for `{key}`"))?
            .parse::<usize>()
            .with_context(|| format!("bad `{key}` value in `{line}`"))
    }

    /// Scatters obstacles with probability `density` per cell.
    pub fn random<R: Rng + ?Sized>(height: usize, width: usize, density: f64, rng: &mut R) -> Self {
        let grid = (0..height)
            .map(|_| {
                (0..width)
                    .map(|_| {
                        if rng.gen_bool(density) {
                            CellState::Blocked
                        } else {
                            CellState::Free
                        }
                    })
                    .collect()
            })
            .collect();

        Map {
            height,
            width,
            grid,
        }
    }

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.y < self.height && coord.x < self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Result<CellState, SearchError> {
        self.check_bounds(row, col)?;
        Ok(self.grid[row][col])
    }

    pub fn set(&mut self, row: usize, col: usize, state: CellState) -> Result<(), SearchError> {
        self.check_bounds(row, col)?;
        self.grid[row][col] = state;
        Ok(())
    }

    pub fn state_at(&self, coord: Coord) -> Result<CellState, SearchError> {
        self.get(coord.y, coord.x)
    }

    pub fn mark(&mut self, coord: Coord, state: CellState) -> Result<(), SearchError> {
        self.set(coord.y, coord.x, state)
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), SearchError> {
        if row < self.height && col < self.width {
            Ok(())
        } else {
            Err(SearchError::OutOfBounds {
                row,
                col,
                rows: self.height,
                cols: self.width,
            })
        }
    }

    /// Stamps start and goal. Both are made passable.
    pub fn mark_endpoints(&mut self, start: Coord, goal: Coord) -> Result<(), SearchError> {
        self.mark(start, CellState::Start)?;
        self.mark(goal, CellState::Goal)
    }

    /// Clears search marks so another strategy can run on the same grid.
    pub fn reset(&mut self) {
        for state in self.grid.iter_mut().flatten() {
            if matches!(state, CellState::Expanded | CellState::Frontier) {
                *state = CellState::Free;
            }
        }
    }

    pub fn count(&self, state: CellState) -> usize {
        self.grid.iter().flatten().filter(|&&s| s == state).count()
    }

    /// Draws the grid with `path` overlaid as `*`.
    pub fn render(&self, path: Option<&[Cell]>) -> String {
        let mut canvas: Vec<Vec<char>> = self
            .grid
            .iter()
            .map(|row| row.iter().map(|state| state.symbol()).collect())
            .collect();

        for cell in path.unwrap_or_default() {
            if let Some(ch) = canvas
                .get_mut(cell.coord.y)
                .and_then(|row| row.get_mut(cell.coord.x))
            {
                *ch = '*';
            }
        }

        canvas
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(None))
    }
}
