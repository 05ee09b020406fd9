//! Client for the time-tracking REST backend.
//!
//! Covers time entries, projects, tasks, analytics, and invoices. Requests
//! carry the configured bearer token; the backend issues it, punch only
//! forwards it.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{
    AnalyticsBucket, AnalyticsPeriod, AnalyticsSummary, Invoice, InvoiceRequest, NewProject, NewTask,
    NewTimeEntry, Project, Task, TimeEntry,
};
