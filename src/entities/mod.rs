//! Snapshot types describing grids and their blocks.

pub mod block;
pub mod grid;

pub use block::{BlockCategory, BlockDetail, BlockSnapshot, Inventory};
pub use grid::GridSnapshot;
