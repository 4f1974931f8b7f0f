// =====================
// 当番表のコアロジック (I/O なし)
// =====================

pub mod calendar;
pub mod duty_resolver;
pub mod error;
pub mod roster_entry;
pub mod schedule_view;
pub mod shift_catalog;
pub mod shift_sequence;

pub use calendar::YearMonth;
pub use error::DomainError;
pub use roster_entry::RosterEntry;
pub use shift_catalog::{ClockTime, ShiftCatalog, ShiftWindow};
