//! tally-domain
//!
//! Pure domain models (Counter, SettlementPeriod, FrequencyLimit, EventLog,
//! reminder definitions). No I/O, no CLI, no storage. Only data types and the
//! period/frequency computation engine.

pub mod common;
pub mod counter;
pub mod event_log;
pub mod frequency;
pub mod period;
pub mod reminder;
pub mod settlement;

pub use common::*;
pub use counter::*;
pub use event_log::*;
pub use frequency::*;
pub use period::*;
pub use reminder::*;
pub use settlement::*;
