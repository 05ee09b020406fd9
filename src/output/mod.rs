//! Output formatting for punch.
//!
//! This module renders backend records either as colored text or as JSON.

mod json;
mod pretty;

use crate::api::{AnalyticsSummary, Invoice, Project, Task, TimeEntry};
use crate::cli::args::OutputFormat;
use crate::error::PunchError;

pub use json::*;
pub use pretty::*;

/// Format time entries based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_entries(entries: &[TimeEntry], format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_entries_pretty(entries)),
        OutputFormat::Json => format_entries_json(entries),
    }
}

/// Format a single time entry based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_entry(entry: &TimeEntry, heading: &str, format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_entry_pretty(entry, heading)),
        OutputFormat::Json => to_json(entry),
    }
}

/// Format projects based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_projects(projects: &[Project], format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_projects_pretty(projects)),
        OutputFormat::Json => format_projects_json(projects),
    }
}

/// Format a single project based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_project(project: &Project, heading: &str, format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_project_pretty(project, heading)),
        OutputFormat::Json => to_json(project),
    }
}

/// Format a single task based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_task(task: &Task, heading: &str, format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_pretty(task, heading)),
        OutputFormat::Json => to_json(task),
    }
}

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_tasks(tasks: &[Task], format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks)),
        OutputFormat::Json => format_tasks_json(tasks),
    }
}

/// Format an analytics summary based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_report(summary: &AnalyticsSummary, format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(summary)),
        OutputFormat::Json => format_report_json(summary),
    }
}

/// Format an invoice based on output format
///
/// # Errors
///
/// Returns `PunchError::Parse` if JSON serialization fails.
pub fn format_invoice(invoice: &Invoice, format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Pretty => Ok(format_invoice_pretty(invoice)),
        OutputFormat::Json => to_json(invoice),
    }
}
