//! JSON output formatting for punch.

use serde::Serialize;
use serde_json::json;

use crate::api::{AnalyticsSummary, Project, Task, TimeEntry};
use crate::error::PunchError;

/// Format time entries as JSON
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_entries_json(entries: &[TimeEntry]) -> Result<String, PunchError> {
    let total: u64 = entries.iter().map(|e| e.duration_seconds).sum();
    let output = json!({
        "count": entries.len(),
        "total_seconds": total,
        "items": entries
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format projects as JSON
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_projects_json(projects: &[Project]) -> Result<String, PunchError> {
    let output = json!({
        "count": projects.len(),
        "items": projects
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task]) -> Result<String, PunchError> {
    let output = json!({
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format an analytics summary as JSON
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_report_json(summary: &AnalyticsSummary) -> Result<String, PunchError> {
    let output = json!({
        "period": summary.period,
        "total_hours": summary.total_hours(),
        "buckets": summary.buckets
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, PunchError> {
    Ok(serde_json::to_string_pretty(value)?)
}
