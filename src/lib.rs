//! punch - billable time tracking from the terminal
//!
//! This crate provides a command-line client and interactive timer for a
//! time-tracking REST backend. The [`timer`] module holds the session state
//! machine; [`api`] talks to the server.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod timer;
pub mod tui;

pub use api::ApiClient;
pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::PunchError;
pub use timer::TimerController;
