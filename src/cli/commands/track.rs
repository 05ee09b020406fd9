//! The interactive tracker command.

use colored::Colorize;
use serde_json::json;

use crate::api::ApiClient;
use crate::cli::args::{OutputFormat, TrackArgs};
use crate::config::TimerConfig;
use crate::error::PunchError;
use crate::output::to_json;
use crate::timer::{format_duration_hms, FlushOutcome};
use crate::tui::{self, TrackOutcome};

/// Execute track command
///
/// Runs the tracker, then summarizes what was saved.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the terminal fails.
pub async fn track(
    client: ApiClient,
    args: TrackArgs,
    timer_config: &TimerConfig,
    format: OutputFormat,
) -> Result<String, PunchError> {
    let outcome = tui::run(client, timer_config, args.project, args.task).await?;
    summarize(&outcome, format)
}

fn summarize(outcome: &TrackOutcome, format: OutputFormat) -> Result<String, PunchError> {
    let total: u64 = outcome.saved.iter().map(|e| e.duration_seconds).sum();
    let unsaved = match &outcome.flush {
        FlushOutcome::Idle | FlushOutcome::Saved(_) => None,
        FlushOutcome::Failed(e) => Some(e.to_string()),
        FlushOutcome::TimedOut => Some("timed out waiting for the server".to_string()),
    };

    match format {
        OutputFormat::Json => to_json(&json!({
            "saved": outcome.saved,
            "total_seconds": total,
            "unsaved_error": unsaved,
        })),
        OutputFormat::Pretty => {
            let mut output = if outcome.saved.is_empty() {
                "No sessions saved".to_string()
            } else {
                format!(
                    "Saved {} session{} ({})",
                    outcome.saved.len(),
                    if outcome.saved.len() == 1 { "" } else { "s" },
                    format_duration_hms(total).bold()
                )
            };
            if let Some(reason) = unsaved {
                output.push_str(&format!(
                    "\n{}: running session was not saved: {reason}",
                    "warning".yellow().bold()
                ));
            }
            Ok(output)
        }
    }
}
