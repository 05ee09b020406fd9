//! Shared parsing helpers.

pub mod datetime;

pub use datetime::{local_day_bounds, parse_date, parse_timestamp};
