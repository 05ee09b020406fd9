//! Configuration commands.

use serde_json::json;
use tracing::info;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::PunchError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// `effective` is the configuration after flag and environment overrides;
/// the `set-*` and `init` commands edit the file on disk instead.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
pub fn config(
    paths: &Paths,
    effective: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, PunchError> {
    match cmd {
        ConfigCommands::Show => {
            let mut shown = effective.clone();
            if shown.api.token.is_some() {
                shown.api.token = Some("<redacted>".to_string());
            }
            match format {
                OutputFormat::Json => to_json(&shown),
                OutputFormat::Pretty => serde_yaml::to_string(&shown)
                    .map(|s| s.trim_end().to_string())
                    .map_err(|e| PunchError::Config(format!("Failed to serialize config: {e}"))),
            }
        }

        ConfigCommands::Path => match format {
            OutputFormat::Json => to_json(&json!({ "path": paths.config_file })),
            OutputFormat::Pretty => Ok(paths.config_file.display().to_string()),
        },

        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(PunchError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    paths.config_file.display()
                )));
            }
            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            info!(path = %paths.config_file.display(), "config initialized");
            Ok(format!("Wrote {}", paths.config_file.display()))
        }

        ConfigCommands::SetUrl { url } => {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(PunchError::InvalidInput(format!(
                    "API URL must start with http:// or https://: {url}"
                )));
            }
            update_file(paths, |config| config.api.base_url = url.clone())?;
            Ok(format!("API URL set to {url}"))
        }

        ConfigCommands::SetToken { token } => {
            let token = token.trim().to_string();
            if token.is_empty() {
                return Err(PunchError::InvalidInput("Token must not be empty".to_string()));
            }
            update_file(paths, |config| config.api.token = Some(token))?;
            Ok("API token saved".to_string())
        }
    }
}

fn update_file(paths: &Paths, edit: impl FnOnce(&mut Config)) -> Result<(), PunchError> {
    paths.ensure_dirs()?;
    let mut config = Config::load_from_path(&paths.config_file)?;
    edit(&mut config);
    config.save_to_path(&paths.config_file)?;
    info!(path = %paths.config_file.display(), "config updated");
    Ok(())
}
