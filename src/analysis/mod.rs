//! Pure transforms over the records of an activity log: grouped summaries and filters.

pub mod filter;
pub mod summary;
