//! Grid geometry: pointer coordinates to cells, cells to slots

use chrono::NaiveDate;
use huddle_domain::types::slot::{parse_date, validate_date, validate_hour};
use huddle_domain::{GridCell, GridLayout, Result, TimeSlotKey};

/// Map a pointer position to the cell under it.
///
/// Positions outside the grid clamp to the nearest edge cell. Returns `None`
/// only when the grid has no rows or columns.
pub fn coordinate_to_cell(x: f64, y: f64, layout: &GridLayout) -> Option<GridCell> {
    if layout.is_empty() || layout.cell_width <= 0.0 || layout.cell_height <= 0.0 {
        return None;
    }

    let column = ((x - layout.label_width) / layout.cell_width).floor();
    let row = ((y - layout.header_height) / layout.cell_height).floor();

    Some(GridCell {
        row: clamp_index(row, layout.row_count),
        column: clamp_index(column, layout.column_count),
    })
}

fn clamp_index(value: f64, count: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = count.saturating_sub(1);
    if value >= max as f64 {
        max
    } else {
        value as usize
    }
}

/// Cell-to-slot lookup for the rendered range.
///
/// Rows are hour labels, columns are dates. Hidden columns (dates already in
/// the past) stay in the layout but resolve to no slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotGrid {
    hours: Vec<u32>,
    columns: Vec<Option<String>>,
}

impl SlotGrid {
    /// Build a grid after validating every date and hour.
    pub fn new(dates: &[String], hours: &[u32]) -> Result<Self> {
        for date in dates {
            validate_date(date)?;
        }
        for hour in hours {
            validate_hour(*hour)?;
        }

        Ok(Self { hours: hours.to_vec(), columns: dates.iter().cloned().map(Some).collect() })
    }

    /// Hide columns for dates before `today`.
    pub fn hide_dates_before(mut self, today: NaiveDate) -> Self {
        for column in &mut self.columns {
            let is_past = column
                .as_deref()
                .and_then(|date| parse_date(date).ok())
                .is_some_and(|date| date < today);
            if is_past {
                *column = None;
            }
        }
        self
    }

    /// Rendered hour rows.
    pub fn row_count(&self) -> usize {
        self.hours.len()
    }

    /// Rendered date columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// No rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty() || self.columns.is_empty()
    }

    /// Slot rendered at `cell`, if any.
    pub fn slot_at(&self, cell: GridCell) -> Option<TimeSlotKey> {
        let hour = *self.hours.get(cell.row)?;
        let date = self.columns.get(cell.column)?.as_ref()?;
        Some(TimeSlotKey { date: date.clone(), hour })
    }

    /// Slots inside the inclusive rectangle spanned by two corners, in
    /// chronological order. Works for any drag direction.
    ///
    /// Corners outside the grid are clamped to its last row and column.
    pub fn slots_in_rectangle(&self, a: GridCell, b: GridCell) -> Vec<TimeSlotKey> {
        if self.is_empty() {
            return Vec::new();
        }
        let last_row = self.row_count() - 1;
        let last_col = self.column_count() - 1;
        let (min_row, max_row) = (a.row.min(b.row).min(last_row), a.row.max(b.row).min(last_row));
        let (min_col, max_col) =
            (a.column.min(b.column).min(last_col), a.column.max(b.column).min(last_col));

        let mut slots = Vec::with_capacity((max_row - min_row + 1) * (max_col - min_col + 1));
        for column in min_col..=max_col {
            for row in min_row..=max_row {
                if let Some(slot) = self.slot_at(GridCell { row, column }) {
                    slots.push(slot);
                }
            }
        }
        slots
    }
}
