//! Project and task commands: list, add, edit, delete.

use serde_json::json;
use tracing::info;

use crate::api::{ApiClient, NewProject, NewTask, Project, Task};
use crate::cli::args::{OutputFormat, ProjectCommands, TaskCommands, TaskStatus};
use crate::error::PunchError;
use crate::output::{format_project, format_projects, format_task, format_tasks, to_json};

/// Execute projects subcommands. Lists when none is given.
///
/// # Errors
///
/// Returns an error if the input is invalid, the request fails, or output
/// formatting fails.
pub async fn projects(
    client: &ApiClient,
    cmd: Option<ProjectCommands>,
    format: OutputFormat,
) -> Result<String, PunchError> {
    match cmd {
        None | Some(ProjectCommands::List) => {
            let projects = client.list_projects().await?;
            format_projects(&projects, format)
        }

        Some(ProjectCommands::Add { name, description, rate }) => {
            let fields = NewProject {
                name,
                description,
                hourly_rate: rate,
            };
            validate_project(&fields)?;
            let saved = client.create_project(&fields).await?;
            info!(id = saved.id, "project added");
            format_project(&saved, "Added project", format)
        }

        Some(ProjectCommands::Edit { id, name, description, rate }) => {
            let projects = client.list_projects().await?;
            let current = projects
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| PunchError::NotFound(format!("project {id}")))?;
            let fields = edit_project(current, name, description, rate);
            validate_project(&fields)?;
            let saved = client.update_project(id, &fields).await?;
            info!(id, "project updated");
            format_project(&saved, "Updated project", format)
        }

        Some(ProjectCommands::Delete { id }) => {
            client.delete_project(id).await?;
            info!(id, "project deleted");
            deleted("project", id, format)
        }
    }
}

/// Execute tasks subcommands. Lists when none is given.
///
/// # Errors
///
/// Returns an error if the input is invalid, the request fails, or output
/// formatting fails.
pub async fn tasks(
    client: &ApiClient,
    project: Option<u64>,
    cmd: Option<TaskCommands>,
    format: OutputFormat,
) -> Result<String, PunchError> {
    match cmd {
        None => {
            let tasks = client.list_tasks(project).await?;
            format_tasks(&tasks, format)
        }

        Some(TaskCommands::List { project }) => {
            let tasks = client.list_tasks(project).await?;
            format_tasks(&tasks, format)
        }

        Some(TaskCommands::Add {
            title,
            project,
            description,
            status,
            tags,
        }) => {
            let fields = NewTask {
                title,
                description,
                status: status.as_str().to_string(),
                tags,
                project_id: project,
            };
            validate_task(&fields)?;
            let saved = client.create_task(&fields).await?;
            info!(id = saved.id, project_id = saved.project_id, "task added");
            format_task(&saved, "Added task", format)
        }

        Some(TaskCommands::Edit {
            id,
            title,
            project,
            description,
            status,
            tags,
            clear_tags,
        }) => {
            let tasks = client.list_tasks(None).await?;
            let current = tasks
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| PunchError::NotFound(format!("task {id}")))?;
            let changes = TaskChanges {
                title,
                project,
                description,
                status,
                tags: if clear_tags { Some(Vec::new()) } else { tags },
            };
            let fields = edit_task(current, changes);
            validate_task(&fields)?;
            let saved = client.update_task(id, &fields).await?;
            info!(id, "task updated");
            format_task(&saved, "Updated task", format)
        }

        Some(TaskCommands::Delete { id }) => {
            client.delete_task(id).await?;
            info!(id, "task deleted");
            deleted("task", id, format)
        }
    }
}

fn deleted(kind: &str, id: u64, format: OutputFormat) -> Result<String, PunchError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "deleted": id })),
        OutputFormat::Pretty => Ok(format!("Deleted {kind} {id}")),
    }
}

/// Overlay the given fields on a stored project.
fn edit_project(
    current: &Project,
    name: Option<String>,
    description: Option<String>,
    rate: Option<f64>,
) -> NewProject {
    let mut fields = NewProject::from(current);
    if let Some(name) = name {
        fields.name = name;
    }
    if let Some(description) = description {
        fields.description = description;
    }
    if let Some(rate) = rate {
        fields.hourly_rate = rate;
    }
    fields
}

/// Requested changes to a task. `None` keeps the stored value.
struct TaskChanges {
    title: Option<String>,
    project: Option<u64>,
    description: Option<String>,
    status: Option<TaskStatus>,
    tags: Option<Vec<String>>,
}

fn edit_task(current: &Task, changes: TaskChanges) -> NewTask {
    let mut fields = NewTask::from(current);
    if let Some(title) = changes.title {
        fields.title = title;
    }
    if let Some(project) = changes.project {
        fields.project_id = project;
    }
    if let Some(description) = changes.description {
        fields.description = description;
    }
    if let Some(status) = changes.status {
        fields.status = status.as_str().to_string();
    }
    if let Some(tags) = changes.tags {
        fields.tags = tags;
    }
    fields
}

fn validate_project(fields: &NewProject) -> Result<(), PunchError> {
    if fields.name.trim().is_empty() {
        return Err(PunchError::InvalidInput("Project name must not be empty".to_string()));
    }
    if !fields.hourly_rate.is_finite() || fields.hourly_rate < 0.0 {
        return Err(PunchError::InvalidInput(format!(
            "Hourly rate must be zero or positive, got {}",
            fields.hourly_rate
        )));
    }
    Ok(())
}

fn validate_task(fields: &NewTask) -> Result<(), PunchError> {
    if fields.title.trim().is_empty() {
        return Err(PunchError::InvalidInput("Task title must not be empty".to_string()));
    }
    if fields.project_id == 0 {
        return Err(PunchError::InvalidInput("Project ID must be non-zero".to_string()));
    }
    Ok(())
}
