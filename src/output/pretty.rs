use colored::Colorize;

use crate::api::{AnalyticsSummary, Invoice, Project, Task, TimeEntry};
use crate::timer::format::{format_duration, format_duration_hms, format_hours};

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M";

fn local(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.with_timezone(&chrono::Local).format(LOCAL_FORMAT).to_string()
}

/// Format a list of time entries as a pretty table
pub fn format_entries_pretty(entries: &[TimeEntry]) -> String {
    if entries.is_empty() {
        return "Time entries (0)\n  No entries".to_string();
    }

    let total: u64 = entries.iter().map(|e| e.duration_seconds).sum();

    let mut output = format!("Time entries ({})\n", entries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        let mut line = format!(
            "{:>5}  {}  {}",
            entry.id.to_string().dimmed(),
            local(entry.start_time),
            format_duration_hms(entry.duration_seconds).bold()
        );

        line.push_str(&format!("  {}", format!("project {}", entry.project_id).cyan()));

        if let Some(task_id) = entry.task_id {
            line.push_str(&format!("  {}", format!("task {task_id}").dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output.push_str(&"─".repeat(60));
    output.push('\n');
    output.push_str(&format!("Total: {}", format_duration_hms(total).green().bold()));

    output
}

/// Format a single time entry as pretty output
pub fn format_entry_pretty(entry: &TimeEntry, heading: &str) -> String {
    let mut output = format!("{} {}\n", "✓".green(), heading.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), entry.id));
    output.push_str(&format!("  {}: {}\n", "Project".dimmed(), entry.project_id));

    if let Some(task_id) = entry.task_id {
        output.push_str(&format!("  {}: {}\n", "Task".dimmed(), task_id));
    }

    output.push_str(&format!("  {}: {}\n", "Start".dimmed(), local(entry.start_time)));
    output.push_str(&format!("  {}: {}\n", "End".dimmed(), local(entry.end_time)));
    let seconds = i64::try_from(entry.duration_seconds.min(u64::from(u32::MAX))).unwrap_or_default();
    output.push_str(&format!(
        "  {}: {} ({})",
        "Duration".dimmed(),
        format_duration_hms(entry.duration_seconds),
        format_duration(chrono::Duration::seconds(seconds))
    ));

    output
}

/// Format a list of projects as pretty output
pub fn format_projects_pretty(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "Projects (0)\n  No projects".to_string();
    }

    let mut output = format!("Projects ({})\n", projects.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for project in projects {
        let mut line = format!("{:>5}  {}", project.id.to_string().dimmed(), project.name.bold());

        if project.hourly_rate > 0.0 {
            line.push_str(&format!("  {}", format!("{:.2}/h", project.hourly_rate).yellow()));
        }

        if !project.description.is_empty() {
            line.push_str(&format!("  {}", project.description.dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single project as pretty output
pub fn format_project_pretty(project: &Project, heading: &str) -> String {
    let mut output = format!("{} {}\n", "✓".green(), heading.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), project.id));
    output.push_str(&format!("  {}: {}\n", "Name".dimmed(), project.name));
    if !project.description.is_empty() {
        output.push_str(&format!("  {}: {}\n", "Description".dimmed(), project.description));
    }
    output.push_str(&format!("  {}: {:.2}/h", "Rate".dimmed(), project.hourly_rate));

    output
}

fn colored_status(status: &str) -> colored::ColoredString {
    match status.to_ascii_lowercase().as_str() {
        "done" | "completed" => status.green(),
        "in_progress" | "in progress" => status.yellow(),
        "on_hold" => status.dimmed(),
        _ => status.white(),
    }
}

/// Format a single task as pretty output
pub fn format_task_pretty(task: &Task, heading: &str) -> String {
    let mut output = format!("{} {}\n", "✓".green(), heading.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), task.id));
    output.push_str(&format!("  {}: {}\n", "Title".dimmed(), task.title));
    output.push_str(&format!("  {}: {}\n", "Project".dimmed(), task.project_id));
    if !task.description.is_empty() {
        output.push_str(&format!("  {}: {}\n", "Description".dimmed(), task.description));
    }
    if !task.tags.is_empty() {
        output.push_str(&format!("  {}: {}\n", "Tags".dimmed(), task.tags.join(", ")));
    }
    output.push_str(&format!("  {}: {}", "Status".dimmed(), colored_status(&task.status)));

    output
}

/// Format a list of tasks as pretty output
pub fn format_tasks_pretty(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "Tasks (0)\n  No tasks".to_string();
    }

    let mut output = format!("Tasks ({})\n", tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let status = colored_status(&task.status);

        let mut line = format!(
            "{:>5}  {}  [{}]  {}",
            task.id.to_string().dimmed(),
            task.title.bold(),
            status,
            format!("project {}", task.project_id).dimmed()
        );

        if !task.tags.is_empty() {
            let tags_str = task
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ");
            line.push_str(&format!("  {}", tags_str.cyan()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format an analytics summary with a bar per bucket
pub fn format_report_pretty(summary: &AnalyticsSummary) -> String {
    let title = format!("{} report", summary.period);

    if summary.buckets.is_empty() {
        return format!("{title}\n  No time tracked");
    }

    let max = summary
        .buckets
        .iter()
        .map(|b| b.hours)
        .fold(0.0_f64, f64::max);

    let mut output = format!("{title}\n");
    output.push_str(&"─".repeat(40));
    output.push('\n');

    for bucket in &summary.buckets {
        output.push_str(&format!(
            "  {:<12} {:>8}  {}\n",
            bucket.label,
            format_hours(bucket.hours),
            bar(bucket.hours, max, 20).cyan()
        ));
    }

    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "  {:<12} {:>8}",
        "Total",
        format_hours(summary.total_hours()).bold()
    ));

    output
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

/// Format an invoice summary
pub fn format_invoice_pretty(invoice: &Invoice) -> String {
    let mut output = format!("Invoice: {}\n", invoice.project_name.bold());
    output.push_str(&format!(
        "  {}: {} to {}\n",
        "Period".dimmed(),
        invoice.start_date.with_timezone(&chrono::Local).format("%Y-%m-%d"),
        invoice.end_date.with_timezone(&chrono::Local).format("%Y-%m-%d")
    ));
    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(&format!("  {:<12} {}\n", "Entries", invoice.entries.len()));
    output.push_str(&format!("  {:<12} {}\n", "Hours", format_hours(invoice.total_hours)));
    output.push_str(&format!("  {:<12} {:.2}\n", "Rate", invoice.hourly_rate));
    output.push_str(&format!(
        "  {:<12} {}",
        "Amount",
        format!("{:.2}", invoice.total_amount).green().bold()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalyticsBucket, AnalyticsPeriod};
    use chrono::{TimeZone, Utc};

    fn make_entry(id: u64, seconds: u64, task_id: Option<u64>) -> TimeEntry {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        TimeEntry {
            id,
            start_time: start,
            end_time: start + chrono::Duration::seconds(i64::try_from(seconds).unwrap()),
            duration_seconds: seconds,
            project_id: 7,
            task_id,
            user_id: 1,
        }
    }

    fn make_project(name: &str, rate: f64) -> Project {
        Project {
            id: 7,
            name: name.to_string(),
            description: String::new(),
            hourly_rate: rate,
            user_id: 1,
        }
    }

    #[test]
    fn test_format_entries_pretty_empty_list() {
        let output = format_entries_pretty(&[]);
        assert!(output.contains("Time entries (0)"));
        assert!(output.contains("No entries"));
    }

    #[test]
    fn test_format_entries_pretty_totals() {
        let entries = vec![make_entry(1, 3600, Some(3)), make_entry(2, 1800, None)];
        let output = format_entries_pretty(&entries);

        assert!(output.contains("Time entries (2)"));
        assert!(output.contains("01:00:00"));
        assert!(output.contains("00:30:00"));
        assert!(output.contains("task 3"));
        assert!(output.contains("01:30:00"));
    }

    #[test]
    fn test_format_entry_pretty() {
        let output = format_entry_pretty(&make_entry(42, 754, Some(3)), "Saved");
        assert!(output.contains("Saved"));
        assert!(output.contains("42"));
        assert!(output.contains("00:12:34"));
        assert!(output.contains("12 minutes"));
    }

    #[test]
    fn test_format_projects_pretty() {
        assert!(format_projects_pretty(&[]).contains("No projects"));

        let output = format_projects_pretty(&[make_project("Website", 85.0)]);
        assert!(output.contains("Projects (1)"));
        assert!(output.contains("Website"));
        assert!(output.contains("85.00/h"));
    }

    #[test]
    fn test_format_projects_pretty_hides_zero_rate() {
        let output = format_projects_pretty(&[make_project("Internal", 0.0)]);
        assert!(!output.contains("/h"));
    }

    #[test]
    fn test_format_tasks_pretty_with_tags() {
        let task = Task {
            id: 3,
            project_id: 7,
            title: "Landing page".to_string(),
            description: String::new(),
            status: "todo".to_string(),
            tags: vec!["design".to_string(), "web".to_string()],
            user_id: 1,
        };
        let output = format_tasks_pretty(&[task]);
        assert!(output.contains("Landing page"));
        assert!(output.contains("#design #web"));
    }

    #[test]
    fn test_format_project_pretty() {
        let output = format_project_pretty(&make_project("Website", 85.0), "Added project");
        assert!(output.contains("Added project"));
        assert!(output.contains("Website"));
        assert!(output.contains("85.00/h"));
    }

    #[test]
    fn test_format_task_pretty() {
        let task = Task {
            id: 3,
            project_id: 7,
            title: "Landing page".to_string(),
            description: "Hero section".to_string(),
            status: "IN_PROGRESS".to_string(),
            tags: vec!["design".to_string(), "web".to_string()],
            user_id: 1,
        };
        let output = format_task_pretty(&task, "Updated task");
        assert!(output.contains("Updated task"));
        assert!(output.contains("Landing page"));
        assert!(output.contains("Hero section"));
        assert!(output.contains("design, web"));
        assert!(output.contains("IN_PROGRESS"));
    }

    #[test]
    fn test_format_report_pretty() {
        let summary = AnalyticsSummary {
            period: AnalyticsPeriod::Weekly,
            buckets: vec![
                AnalyticsBucket { label: "Mon".to_string(), hours: 2.0 },
                AnalyticsBucket { label: "Tue".to_string(), hours: 0.5 },
            ],
        };
        let output = format_report_pretty(&summary);
        assert!(output.contains("Weekly report"));
        assert!(output.contains("Mon"));
        assert!(output.contains("2.00h"));
        assert!(output.contains("2.50h"));
    }

    #[test]
    fn test_format_report_pretty_empty() {
        let summary = AnalyticsSummary {
            period: AnalyticsPeriod::Daily,
            buckets: vec![],
        };
        assert!(format_report_pretty(&summary).contains("No time tracked"));
    }

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(4.0, 4.0, 10).chars().count(), 10);
        assert_eq!(bar(2.0, 4.0, 10).chars().count(), 5);
        assert_eq!(bar(0.01, 4.0, 10).chars().count(), 1);
        assert!(bar(0.0, 4.0, 10).is_empty());
    }

    #[test]
    fn test_format_invoice_pretty() {
        let invoice = Invoice {
            project_name: "Website".to_string(),
            start_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap(),
            total_hours: 10.5,
            hourly_rate: 80.0,
            total_amount: 840.0,
            entries: vec![make_entry(1, 3600, None)],
        };
        let output = format_invoice_pretty(&invoice);
        assert!(output.contains("Website"));
        assert!(output.contains("10.50h"));
        assert!(output.contains("840.00"));
    }
}
