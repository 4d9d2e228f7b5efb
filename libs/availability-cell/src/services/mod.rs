pub mod calculator;
pub mod occupied;

pub use calculator::SlotCalculator;
pub use occupied::{OccupiedSlotsProvider, SupabaseOccupiedSlots};
