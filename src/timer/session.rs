//! Observable timer state.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::format::format_duration_hms;

/// Lifecycle phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Nothing is being tracked.
    #[default]
    Idle,
    /// A session is running and ticking.
    Running,
    /// The finished session is being written.
    Stopping,
}

impl TimerPhase {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Stopping => "Saving",
        }
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Point-in-time copy of the timer state, handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: u64,
    pub project_id: Option<u64>,
    pub task_id: Option<u64>,
}

impl TimerSnapshot {
    /// Elapsed time as `HH:MM:SS`.
    #[must_use]
    pub fn format_elapsed(&self) -> String {
        format_duration_hms(self.elapsed_seconds)
    }

    /// Start time in the local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> Option<DateTime<Local>> {
        self.started_at.map(|t| t.with_timezone(&Local))
    }

    /// One-line status, e.g. `Running 00:12:04 (project 7, task 3)`.
    #[must_use]
    pub fn format_status(&self) -> String {
        let refs = match (self.project_id, self.task_id) {
            (Some(p), Some(t)) => format!(" (project {p}, task {t})"),
            (Some(p), None) => format!(" (project {p})"),
            _ => String::new(),
        };
        format!("{} {}{refs}", self.phase, self.format_elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_idle() {
        let snapshot = TimerSnapshot::default();
        assert_eq!(snapshot.phase, TimerPhase::Idle);
        assert!(!snapshot.running);
        assert!(snapshot.started_at.is_none());
        assert_eq!(snapshot.elapsed_seconds, 0);
    }

    #[test]
    fn test_format_status() {
        let snapshot = TimerSnapshot {
            phase: TimerPhase::Running,
            running: true,
            started_at: Some(Utc::now()),
            elapsed_seconds: 724,
            project_id: Some(7),
            task_id: Some(3),
        };
        assert_eq!(snapshot.format_status(), "Running 00:12:04 (project 7, task 3)");
        assert_eq!(TimerSnapshot::default().format_status(), "Idle 00:00:00");
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let json = serde_json::to_string(&TimerPhase::Stopping).unwrap();
        assert_eq!(json, "\"stopping\"");
    }
}
