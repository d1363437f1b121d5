//! Participation summary and share text

mod engine;
pub mod ports;

pub use engine::SummaryEngine;
pub use ports::{IsoSlotFormatter, SlotFormatter};
