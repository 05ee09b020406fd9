//! Command implementations for punch.
//!
//! Each handler returns the text to print, already rendered in the
//! requested output format.

mod catalog;
mod completions;
mod config;
mod entries;
mod report;
mod track;

pub use catalog::{projects, tasks};
pub use completions::completions;
pub use config::config;
pub use entries::entries;
pub use report::{invoice, report};
pub use track::track;
