//!  Storage of logged activities.
//!   - [activity_log::ActivityLog] keeps the records in memory in insertion order.
//!   - [record_storage::CsvActivityStorage] persists them as a single comma separated file,
//!     rewritten in full after every change.
//!   - Rows that can't be read back are skipped, a missing or unreadable file means an empty log.

pub mod activity_log;
pub mod entities;
pub mod error;
pub mod record_storage;
