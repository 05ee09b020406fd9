//! Records exchanged with the time-tracking backend.
//!
//! The backend speaks snake_case JSON with an upper-case `ID` key. The
//! `*Record` types mirror that wire shape and are converted into the public
//! types, which use the crate's own field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored time entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: u64,
    pub project_id: u64,
    pub task_id: Option<u64>,
    pub user_id: u64,
}

/// A time entry to be written.
///
/// Serializes directly to the backend's request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTimeEntry {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
    pub project_id: u64,
    pub task_id: Option<u64>,
}

impl NewTimeEntry {
    /// Build an entry from a start and end time, deriving the duration.
    ///
    /// Returns `None` if `end` is before `start`.
    #[must_use]
    pub fn between(
        project_id: u64,
        task_id: Option<u64>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<Self> {
        let duration_seconds = u64::try_from(end.signed_duration_since(start).num_seconds()).ok()?;
        Some(Self {
            start_time: start,
            end_time: end,
            duration_seconds,
            project_id,
            task_id: task_id.filter(|id| *id != 0),
        })
    }
}

/// A billable project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub hourly_rate: f64,
    pub user_id: u64,
}

/// A task within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub tags: Vec<String>,
    pub user_id: u64,
}

/// Project fields to create or overwrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub hourly_rate: f64,
}

impl From<&Project> for NewProject {
    fn from(p: &Project) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            hourly_rate: p.hourly_rate,
        }
    }
}

/// Task fields to create or overwrite.
///
/// `tags` always serializes as an array; the backend rejects `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: String,
    pub tags: Vec<String>,
    pub project_id: u64,
}

impl From<&Task> for NewTask {
    fn from(t: &Task) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone(),
            status: t.status.clone(),
            tags: t.tags.clone(),
            project_id: t.project_id,
        }
    }
}

/// Analytics window served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    /// Last 24 hours, bucketed by date.
    Daily,
    /// Last 7 days, bucketed by weekday.
    Weekly,
    /// Last month, bucketed by month.
    Monthly,
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl AnalyticsPeriod {
    /// Endpoint path, relative to the API base.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Daily => "analytics/daily",
            Self::Weekly => "analytics/weekly",
            Self::Monthly => "analytics/monthly",
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    /// Position of a bucket label in calendar order.
    ///
    /// Dates sort lexically; weekday and month abbreviations sort by their
    /// calendar position. Unknown labels go last.
    fn sort_key(self, label: &str) -> (usize, String) {
        let position = match self {
            Self::Daily => Some(0),
            Self::Weekly => WEEKDAYS.iter().position(|d| *d == label),
            Self::Monthly => MONTHS.iter().position(|m| *m == label),
        };
        (position.unwrap_or(usize::MAX), label.to_string())
    }
}

impl std::fmt::Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Hours tracked in one analytics bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsBucket {
    pub label: String,
    pub hours: f64,
}

/// Hours per bucket for one analytics window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub period: AnalyticsPeriod,
    pub buckets: Vec<AnalyticsBucket>,
}

impl AnalyticsSummary {
    /// Build a summary from the backend's `{label: hours}` map.
    #[must_use]
    pub fn from_totals(
        period: AnalyticsPeriod,
        totals: std::collections::HashMap<String, f64>,
    ) -> Self {
        let mut buckets: Vec<AnalyticsBucket> = totals
            .into_iter()
            .map(|(label, hours)| AnalyticsBucket { label, hours })
            .collect();
        buckets.sort_by_key(|b| period.sort_key(&b.label));
        Self { period, buckets }
    }

    /// Sum of all buckets.
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.buckets.iter().map(|b| b.hours).sum()
    }
}

/// Parameters for an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRequest {
    pub project_id: u64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Billable totals for a project over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub project_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub total_amount: f64,
    pub entries: Vec<TimeEntry>,
}

// Wire shapes

#[derive(Debug, Deserialize)]
pub(crate) struct TimeEntryRecord {
    #[serde(rename = "ID")]
    id: u64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    duration: i64,
    project_id: u64,
    #[serde(default)]
    task_id: Option<u64>,
    #[serde(default)]
    user_id: u64,
}

impl From<TimeEntryRecord> for TimeEntry {
    fn from(r: TimeEntryRecord) -> Self {
        Self {
            id: r.id,
            start_time: r.start_time,
            end_time: r.end_time,
            duration_seconds: u64::try_from(r.duration).unwrap_or(0),
            project_id: r.project_id,
            // The backend stores "no task" as 0.
            task_id: r.task_id.filter(|id| *id != 0),
            user_id: r.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRecord {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    hourly_rate: f64,
    #[serde(default)]
    user_id: u64,
}

impl From<ProjectRecord> for Project {
    fn from(r: ProjectRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            hourly_rate: r.hourly_rate,
            user_id: r.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskRecord {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    project_id: u64,
    #[serde(default)]
    user_id: u64,
}

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        Self {
            id: r.id,
            project_id: r.project_id,
            title: r.title,
            description: r.description,
            status: r.status,
            tags: r.tags.unwrap_or_default(),
            user_id: r.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceRecord {
    project_name: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    total_hours: f64,
    hourly_rate: f64,
    total_amount: f64,
    #[serde(default)]
    entries: Option<Vec<TimeEntryRecord>>,
}

impl From<InvoiceRecord> for Invoice {
    fn from(r: InvoiceRecord) -> Self {
        Self {
            project_name: r.project_name,
            start_date: r.start_date,
            end_date: r.end_date,
            total_hours: r.total_hours,
            hourly_rate: r.hourly_rate,
            total_amount: r.total_amount,
            entries: r
                .entries
                .unwrap_or_default()
                .into_iter()
                .map(TimeEntry::from)
                .collect(),
        }
    }
}

/// Body for an update; the backend needs the id to overwrite in place.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateBody<'a, T> {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(flatten)]
    pub fields: &'a T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[test]
    fn test_time_entry_from_backend_json() {
        let json = r#"{
            "ID": 12,
            "CreatedAt": "2024-05-06T09:35:00.123+02:00",
            "UpdatedAt": "2024-05-06T09:35:00.123+02:00",
            "DeletedAt": null,
            "start_time": "2024-05-06T09:30:00+02:00",
            "end_time": "2024-05-06T09:35:00+02:00",
            "duration": 300,
            "project_id": 7,
            "task_id": 0,
            "user_id": 1
        }"#;
        let entry: TimeEntry = serde_json::from_str::<TimeEntryRecord>(json).unwrap().into();

        assert_eq!(entry.id, 12);
        assert_eq!(entry.start_time, Utc.with_ymd_and_hms(2024, 5, 6, 7, 30, 0).unwrap());
        assert_eq!(entry.duration_seconds, 300);
        assert_eq!(entry.project_id, 7);
        assert_eq!(entry.task_id, None);
    }

    #[test]
    fn test_new_time_entry_wire_shape() {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 5).unwrap();
        let entry = NewTimeEntry::between(7, Some(3), start, end).unwrap();

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["project_id"], 7);
        assert_eq!(value["task_id"], 3);
        assert_eq!(value["duration"], 1805);
        assert_eq!(value["start_time"], "2024-05-06T09:30:00Z");
        assert!(value.get("duration_seconds").is_none());
    }

    #[test]
    fn test_new_time_entry_without_task_sends_null() {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        let entry = NewTimeEntry::between(7, Some(0), start, start).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value["task_id"].is_null());
    }

    #[test]
    fn test_new_time_entry_rejects_reversed_range() {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
        assert!(NewTimeEntry::between(7, None, start, end).is_none());
    }

    #[test]
    fn test_update_body_carries_id() {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        let entry = NewTimeEntry::between(7, None, start, start).unwrap();
        let value = serde_json::to_value(UpdateBody { id: 5, fields: &entry }).unwrap();
        assert_eq!(value["ID"], 5);
        assert_eq!(value["project_id"], 7);
    }

    #[test]
    fn test_new_project_wire_shape() {
        let project = NewProject {
            name: "Acme".to_string(),
            description: "Site rebuild".to_string(),
            hourly_rate: 85.0,
        };
        let value = serde_json::to_value(UpdateBody { id: 7, fields: &project }).unwrap();
        assert_eq!(value["ID"], 7);
        assert_eq!(value["hourly_rate"], 85.0);
        assert!(value.get("hourlyRate").is_none());
    }

    #[test]
    fn test_new_task_sends_empty_tags_as_array() {
        let task = NewTask {
            title: "Design".to_string(),
            description: String::new(),
            status: "todo".to_string(),
            tags: vec![],
            project_id: 7,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["project_id"], 7);
        assert_eq!(value["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_task_null_tags_become_empty() {
        let json = r#"{"ID": 3, "title": "Design", "description": "", "status": "todo",
                       "tags": null, "project_id": 7, "user_id": 1, "time_entries": null}"#;
        let task: Task = serde_json::from_str::<TaskRecord>(json).unwrap().into();
        assert_eq!(task.title, "Design");
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_project_ignores_nested_collections() {
        let json = r#"{"ID": 7, "name": "Acme", "description": "Site rebuild",
                       "hourly_rate": 85.5, "user_id": 1, "time_entries": null, "tasks": []}"#;
        let project: Project = serde_json::from_str::<ProjectRecord>(json).unwrap().into();
        assert_eq!(project.name, "Acme");
        assert!((project.hourly_rate - 85.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_buckets_sort_by_weekday() {
        let totals = HashMap::from([
            ("Fri".to_string(), 2.0),
            ("Mon".to_string(), 1.5),
            ("Wed".to_string(), 3.25),
        ]);
        let summary = AnalyticsSummary::from_totals(AnalyticsPeriod::Weekly, totals);
        let labels: Vec<&str> = summary.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Mon", "Wed", "Fri"]);
        assert!((summary.total_hours() - 6.75).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_buckets_sort_by_month() {
        let totals = HashMap::from([("May".to_string(), 10.0), ("Apr".to_string(), 4.0)]);
        let summary = AnalyticsSummary::from_totals(AnalyticsPeriod::Monthly, totals);
        assert_eq!(summary.buckets[0].label, "Apr");
    }

    #[test]
    fn test_daily_buckets_sort_by_date() {
        let totals = HashMap::from([
            ("2024-05-07".to_string(), 1.0),
            ("2024-05-06".to_string(), 2.0),
        ]);
        let summary = AnalyticsSummary::from_totals(AnalyticsPeriod::Daily, totals);
        assert_eq!(summary.buckets[0].label, "2024-05-06");
    }

    #[test]
    fn test_invoice_from_backend_json() {
        let json = r#"{
            "project_name": "Acme",
            "start_date": "2024-05-01T00:00:00Z",
            "end_date": "2024-05-31T23:59:59Z",
            "total_hours": 2.5,
            "hourly_rate": 80,
            "total_amount": 200,
            "entries": null
        }"#;
        let invoice: Invoice = serde_json::from_str::<InvoiceRecord>(json).unwrap().into();
        assert_eq!(invoice.project_name, "Acme");
        assert!(invoice.entries.is_empty());
        assert!((invoice.total_amount - 200.0).abs() < f64::EPSILON);
    }
}
