use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::api::types::{
    AnalyticsPeriod, AnalyticsSummary, Invoice, InvoiceRecord, InvoiceRequest, NewProject, NewTask,
    NewTimeEntry, Project, ProjectRecord, Task, TaskRecord, TimeEntry, TimeEntryRecord, UpdateBody,
};
use crate::config::ApiConfig;
use crate::error::PunchError;
use crate::timer::TimeEntryStore;

/// HTTP client for the time-tracking backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiClient {
    /// Create a client from API settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be
    /// built.
    pub fn new(config: &ApiConfig) -> Result<Self, PunchError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(PunchError::Config("API base URL is not set".to_string()));
        }

        let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PunchError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            timeout,
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and check the status, without reading the body.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, PunchError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                PunchError::Timeout(self.timeout.as_secs())
            } else {
                PunchError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body.trim(), "api request failed");
        Err(PunchError::from_status(status.as_u16(), &body))
    }

    /// Send a request and decode the JSON body.
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, PunchError> {
        let response = self.send(builder).await?;
        let body = response
            .text()
            .await
            .map_err(|e| PunchError::Transport(format!("Failed to read response: {e}")))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List time entries, optionally for one project.
    ///
    /// The project filter is applied client-side as well, since older
    /// backends ignore the query parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list_time_entries(&self, project_id: Option<u64>) -> Result<Vec<TimeEntry>, PunchError> {
        let mut builder = self.request(Method::GET, "time-entries");
        if let Some(id) = project_id {
            builder = builder.query(&[("project_id", id)]);
        }
        let records: Vec<TimeEntryRecord> = self.send_json(builder).await?;
        Ok(records
            .into_iter()
            .map(TimeEntry::from)
            .filter(|e| project_id.map_or(true, |id| e.project_id == id))
            .collect())
    }

    /// Create a time entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, PunchError> {
        let builder = self.request(Method::POST, "time-entries").json(entry);
        let record: TimeEntryRecord = self.send_json(builder).await?;
        Ok(record.into())
    }

    /// Overwrite an existing time entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn update_time_entry(&self, id: u64, entry: &NewTimeEntry) -> Result<TimeEntry, PunchError> {
        let body = UpdateBody { id, fields: entry };
        let builder = self
            .request(Method::PUT, &format!("time-entries/{id}"))
            .json(&body);
        let record: TimeEntryRecord = self.send_json(builder).await?;
        Ok(record.into())
    }

    /// Delete a time entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_time_entry(&self, id: u64) -> Result<(), PunchError> {
        self.send(self.request(Method::DELETE, &format!("time-entries/{id}")))
            .await?;
        Ok(())
    }

    /// List projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list_projects(&self) -> Result<Vec<Project>, PunchError> {
        let records: Vec<ProjectRecord> = self.send_json(self.request(Method::GET, "projects")).await?;
        Ok(records.into_iter().map(Project::from).collect())
    }

    /// Create a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn create_project(&self, project: &NewProject) -> Result<Project, PunchError> {
        let builder = self.request(Method::POST, "projects").json(project);
        let record: ProjectRecord = self.send_json(builder).await?;
        Ok(record.into())
    }

    /// Overwrite an existing project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn update_project(&self, id: u64, project: &NewProject) -> Result<Project, PunchError> {
        let body = UpdateBody { id, fields: project };
        let builder = self.request(Method::PUT, &format!("projects/{id}")).json(&body);
        let record: ProjectRecord = self.send_json(builder).await?;
        Ok(record.into())
    }

    /// Delete a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_project(&self, id: u64) -> Result<(), PunchError> {
        self.send(self.request(Method::DELETE, &format!("projects/{id}")))
            .await?;
        Ok(())
    }

    /// List tasks, optionally for one project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list_tasks(&self, project_id: Option<u64>) -> Result<Vec<Task>, PunchError> {
        let mut builder = self.request(Method::GET, "tasks");
        if let Some(id) = project_id {
            builder = builder.query(&[("project_id", id)]);
        }
        let records: Vec<TaskRecord> = self.send_json(builder).await?;
        Ok(records
            .into_iter()
            .map(Task::from)
            .filter(|t| project_id.map_or(true, |id| t.project_id == id))
            .collect())
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task, PunchError> {
        let builder = self.request(Method::POST, "tasks").json(task);
        let record: TaskRecord = self.send_json(builder).await?;
        Ok(record.into())
    }

    /// Overwrite an existing task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn update_task(&self, id: u64, task: &NewTask) -> Result<Task, PunchError> {
        let body = UpdateBody { id, fields: task };
        let builder = self.request(Method::PUT, &format!("tasks/{id}")).json(&body);
        let record: TaskRecord = self.send_json(builder).await?;
        Ok(record.into())
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_task(&self, id: u64) -> Result<(), PunchError> {
        self.send(self.request(Method::DELETE, &format!("tasks/{id}")))
            .await?;
        Ok(())
    }

    /// Fetch hours per bucket for an analytics window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn analytics(&self, period: AnalyticsPeriod) -> Result<AnalyticsSummary, PunchError> {
        let totals: HashMap<String, f64> = self.send_json(self.request(Method::GET, period.path())).await?;
        Ok(AnalyticsSummary::from_totals(period, totals))
    }

    /// Compute an invoice for a project over a date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn generate_invoice(&self, request: &InvoiceRequest) -> Result<Invoice, PunchError> {
        let builder = self.request(Method::POST, "invoices/generate").json(request);
        let record: InvoiceRecord = self.send_json(builder).await?;
        Ok(record.into())
    }
}

#[async_trait]
impl TimeEntryStore for ApiClient {
    async fn create_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, PunchError> {
        self.create_time_entry(entry).await
    }
}
