//! Gesture-to-selection state machine
//!
//! The mapper is driven synchronously from pointer callbacks. Updates are
//! throttled because each one recomputes the whole rectangle; the final
//! position is always applied on gesture end.

use std::time::{Duration, Instant};

use huddle_domain::{
    AvailabilityRecord, GestureKind, GridLayout, Result, SelectionConfig, SelectionMode,
    SelectionState, TimeSlotKey,
};
use tracing::trace;

use super::grid::{coordinate_to_cell, SlotGrid};

/// Outcome of a finished gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCommit {
    pub kind: GestureKind,
    pub cells: Vec<TimeSlotKey>,
}

impl SelectionCommit {
    /// Apply to a copy of `record`. Taps toggle their single cell; drags use
    /// `drag_mode`.
    pub fn apply(
        &self,
        record: &AvailabilityRecord,
        drag_mode: SelectionMode,
    ) -> Result<AvailabilityRecord> {
        let mode = match self.kind {
            GestureKind::Tap => SelectionMode::Toggle,
            GestureKind::Drag => drag_mode,
        };
        apply_selection(record, &self.cells, mode)
    }
}

/// Tracks one drag gesture at a time over a rendered grid.
#[derive(Debug)]
pub struct SelectionMapper {
    grid: SlotGrid,
    layout: GridLayout,
    throttle: Duration,
    tap_threshold: f64,
    state: SelectionState,
    origin: Option<(f64, f64)>,
    last_point: Option<(f64, f64)>,
    travel: f64,
    last_recompute: Option<Instant>,
}

impl SelectionMapper {
    /// Mapper over a rendered grid.
    pub fn new(grid: SlotGrid, layout: GridLayout, config: &SelectionConfig) -> Self {
        Self {
            grid,
            layout,
            throttle: config.update_throttle(),
            tap_threshold: config.tap_threshold_px,
            state: SelectionState::default(),
            origin: None,
            last_point: None,
            travel: 0.0,
            last_recompute: None,
        }
    }

    /// Current gesture state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Swap in a re-rendered grid; any gesture in progress is dropped.
    pub fn set_grid(&mut self, grid: SlotGrid, layout: GridLayout) {
        self.grid = grid;
        self.layout = layout;
        self.reset();
    }

    /// Begin a gesture at a pixel position.
    pub fn on_selection_start(&mut self, x: f64, y: f64) {
        self.reset();
        self.state.is_selecting = true;
        self.origin = Some((x, y));
        self.last_point = Some((x, y));

        let cell = coordinate_to_cell(x, y, &self.layout);
        self.state.start_position = cell;
        self.recompute(x, y);
        trace!(?cell, "selection started");
    }

    /// Returns `true` when the selection was recomputed, `false` when the
    /// update was throttled or no gesture is active.
    pub fn on_selection_update(&mut self, x: f64, y: f64, now: Instant) -> bool {
        if !self.state.is_selecting {
            return false;
        }

        self.last_point = Some((x, y));
        if let Some((ox, oy)) = self.origin {
            self.travel = self.travel.max((x - ox).hypot(y - oy));
        }

        if let Some(last) = self.last_recompute {
            if now.saturating_duration_since(last) < self.throttle {
                return false;
            }
        }

        self.recompute(x, y);
        self.last_recompute = Some(now);
        true
    }

    /// Finish the gesture and hand back what it selected.
    ///
    /// A gesture that never travelled past the tap threshold commits only the
    /// cell it started on.
    pub fn on_selection_end(&mut self) -> SelectionCommit {
        if !self.state.is_selecting {
            return SelectionCommit { kind: GestureKind::Drag, cells: Vec::new() };
        }

        if let Some((x, y)) = self.last_point {
            self.recompute(x, y);
        }

        let kind = classify_gesture(self.travel, self.tap_threshold);
        let cells = match kind {
            GestureKind::Tap => self
                .state
                .start_position
                .and_then(|cell| self.grid.slot_at(cell))
                .into_iter()
                .collect(),
            GestureKind::Drag => std::mem::take(&mut self.state.selected_cells),
        };

        trace!(?kind, cells = cells.len(), "selection ended");
        self.reset();
        SelectionCommit { kind, cells }
    }

    /// Resolve the single slot under a tap.
    pub fn on_single_tap(&self, x: f64, y: f64) -> Option<TimeSlotKey> {
        coordinate_to_cell(x, y, &self.layout).and_then(|cell| self.grid.slot_at(cell))
    }

    fn recompute(&mut self, x: f64, y: f64) {
        let current = coordinate_to_cell(x, y, &self.layout);
        self.state.current_position = current;
        self.state.selected_cells = match (self.state.start_position, current) {
            (Some(start), Some(current)) => self.grid.slots_in_rectangle(start, current),
            _ => Vec::new(),
        };
    }

    fn reset(&mut self) {
        self.state = SelectionState::default();
        self.origin = None;
        self.last_point = None;
        self.travel = 0.0;
        self.last_recompute = None;
    }
}

/// `Tap` when the pointer never moved `threshold` pixels from where it
/// went down.
pub fn classify_gesture(travel: f64, threshold: f64) -> GestureKind {
    if travel < threshold {
        GestureKind::Tap
    } else {
        GestureKind::Drag
    }
}

/// Apply a committed selection to a copy of `record`.
///
/// The input record is never mutated, so callers holding the previous value
/// (pending saves, render state) keep seeing it unchanged.
pub fn apply_selection(
    record: &AvailabilityRecord,
    cells: &[TimeSlotKey],
    mode: SelectionMode,
) -> Result<AvailabilityRecord> {
    let mut next = record.clone();
    for cell in cells {
        match mode {
            SelectionMode::Set(available) => next.set_slot(&cell.date, cell.hour, available)?,
            SelectionMode::Toggle => {
                next.toggle_slot(&cell.date, cell.hour)?;
            }
        }
    }
    Ok(next)
}
