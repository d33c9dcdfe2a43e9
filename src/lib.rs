//! Personal activity log. Exercise sessions are kept in a plain CSV file that can be edited by
//! hand, and can be summarized per day or per activity type, filtered and charted right in the
//! terminal.
//!

pub mod analysis;
pub mod cli;
pub mod store;
pub mod utils;
pub mod validation;
