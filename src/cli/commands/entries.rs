//! Time entry commands: list, add, edit, delete.

use serde_json::json;
use tracing::info;

use crate::api::{ApiClient, NewTimeEntry};
use crate::cli::args::{EntryCommands, EntryFields, OutputFormat};
use crate::core::parse_timestamp;
use crate::error::PunchError;
use crate::output::{format_entries, format_entry, to_json};
use crate::timer::parse_duration;

/// Execute entries subcommands.
///
/// # Errors
///
/// Returns an error if the input is invalid, the request fails, or output
/// formatting fails.
pub async fn entries(
    client: &ApiClient,
    cmd: EntryCommands,
    format: OutputFormat,
) -> Result<String, PunchError> {
    match cmd {
        EntryCommands::List { project, limit } => {
            let mut entries = client.list_time_entries(project).await?;
            entries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            format_entries(&entries, format)
        }

        EntryCommands::Add(fields) => {
            let entry = build_entry(&fields)?;
            let saved = client.create_time_entry(&entry).await?;
            info!(id = saved.id, "time entry added");
            format_entry(&saved, "Added time entry", format)
        }

        EntryCommands::Edit { id, fields } => {
            let entry = build_entry(&fields)?;
            let saved = client.update_time_entry(id, &entry).await?;
            info!(id, "time entry updated");
            format_entry(&saved, "Updated time entry", format)
        }

        EntryCommands::Delete { id } => {
            client.delete_time_entry(id).await?;
            info!(id, "time entry deleted");
            match format {
                OutputFormat::Json => to_json(&json!({ "deleted": id })),
                OutputFormat::Pretty => Ok(format!("Deleted time entry {id}")),
            }
        }
    }
}

/// Turn command-line fields into an entry to write.
fn build_entry(fields: &EntryFields) -> Result<NewTimeEntry, PunchError> {
    if fields.project == 0 {
        return Err(PunchError::InvalidInput("Project ID must be non-zero".to_string()));
    }

    let start = parse_timestamp(&fields.start)
        .ok_or_else(|| PunchError::InvalidInput(format!("Unrecognized start time: {}", fields.start)))?;

    let end = match (&fields.end, &fields.duration) {
        (Some(end), _) => parse_timestamp(end)
            .ok_or_else(|| PunchError::InvalidInput(format!("Unrecognized end time: {end}")))?,
        (None, Some(duration)) => {
            let length = parse_duration(duration)
                .ok_or_else(|| PunchError::InvalidInput(format!("Unrecognized duration: {duration}")))?;
            start
                .checked_add_signed(length)
                .ok_or_else(|| PunchError::InvalidInput(format!("Duration out of range: {duration}")))?
        }
        (None, None) => {
            return Err(PunchError::InvalidInput(
                "Either --end or --duration is required".to_string(),
            ))
        }
    };

    if end <= start {
        return Err(PunchError::InvalidInput(
            "End time must be after start time".to_string(),
        ));
    }

    NewTimeEntry::between(fields.project, fields.task, start, end)
        .ok_or_else(|| PunchError::InvalidInput("End time must be after start time".to_string()))
}
