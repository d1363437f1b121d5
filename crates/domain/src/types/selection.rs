//! Availability grid geometry and drag-selection state

use serde::{Deserialize, Serialize};

use super::slot::TimeSlotKey;

/// Grid cell; rows are hours, columns are dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    /// Cell at `row`, `column`.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Fixed pixel geometry of the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Width of the hour-label gutter on the left
    pub label_width: f64,
    /// Height of the date header on top
    pub header_height: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub row_count: usize,
    pub column_count: usize,
}

impl GridLayout {
    /// No rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.column_count == 0
    }
}

/// Ephemeral state of an in-progress drag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub is_selecting: bool,
    pub start_position: Option<GridCell>,
    pub current_position: Option<GridCell>,
    pub selected_cells: Vec<TimeSlotKey>,
}

/// How a committed selection is applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Mark every selected slot with the given value
    Set(bool),
    /// Flip each selected slot
    Toggle,
}

/// Classification of a finished pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Movement stayed under the tap threshold
    Tap,
    /// Movement crossed the tap threshold
    Drag,
}
