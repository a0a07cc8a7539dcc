//! Frontier containers: the coordinate index, the indexed min-heap built on
//! it, and the plain FIFO/LIFO used by uninformed search.

pub mod heap;
pub mod index;
pub mod queue;

pub use heap::{IndexedPriorityQueue, PushOutcome};
pub use index::{coord_eq, coord_hash, PositionIndex};
pub use queue::{Fifo, Lifo};
