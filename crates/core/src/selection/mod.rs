//! Drag and tap selection over the availability grid

mod grid;
mod mapper;

pub use grid::{coordinate_to_cell, SlotGrid};
pub use mapper::{apply_selection, classify_gesture, SelectionCommit, SelectionMapper};
