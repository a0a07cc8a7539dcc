use thiserror::Error;

use crate::common::CellId;

/// Programmer-error conditions raised by the search core.
///
/// A search that simply cannot reach its goal is not an error; it yields a
/// `SearchResult` with `success == false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("pop from an empty queue")]
    EmptyQueue,

    #[error("coordinate (row {row}, col {col}) outside a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("position index needs at least one bucket")]
    ZeroBuckets,

    #[error("cell {0:?} released twice")]
    DoubleRelease(CellId),

    #[error("cell {0:?} was never allocated")]
    UnknownCell(CellId),
}
