//! Configuration management for punch.
//!
//! This module handles loading and saving configuration from `~/.punch/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ApiConfig, ColorSetting, Config, GeneralConfig, TimerConfig};
