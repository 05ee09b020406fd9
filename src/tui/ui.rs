//! UI rendering for the tracker.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::timer::{Clock, TimeEntryStore, TimerPhase};
use crate::tui::app::{App, Screen};
use crate::tui::event::help_text;

/// Render the application UI.
pub fn render<S: TimeEntryStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>) {
    // Create layout: header, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.screen {
        Screen::ProjectPicker | Screen::TaskPicker => render_picker(frame, app, chunks[1]),
        Screen::Timer => render_timer(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);
}

/// Render the header.
fn render_header<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let title = match app.screen {
        Screen::ProjectPicker => format!(" Choose a project ({}) ", app.projects.len()),
        Screen::TaskPicker => format!(
            " {} - choose a task ({}) ",
            app.project.as_ref().map_or("Tasks", |p| p.name.as_str()),
            app.tasks.len()
        ),
        Screen::Timer => format!(
            " {} / {} ",
            app.project.as_ref().map_or("-", |p| p.name.as_str()),
            app.task.as_ref().map_or("-", |t| t.title.as_str())
        ),
    };

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// Render the project or task list.
fn render_picker<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let rows: Vec<(String, String)> = match app.screen {
        Screen::ProjectPicker => app
            .projects
            .iter()
            .map(|p| (p.name.clone(), p.description.clone()))
            .collect(),
        _ => app
            .tasks
            .iter()
            .map(|t| (t.title.clone(), t.status.clone()))
            .collect(),
    };

    let items: Vec<ListItem<'_>> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (name, detail))| {
            let is_selected = i == app.selected;
            let mut spans = vec![Span::styled(
                name,
                Style::default().add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
            )];
            if !detail.is_empty() {
                spans.push(Span::styled(
                    format!("  {detail}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    // Create list state for scrolling
    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the clock and session details.
fn render_timer<S: TimeEntryStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let snapshot = app.timer.snapshot();

    let color = match snapshot.phase {
        TimerPhase::Idle => Color::DarkGray,
        TimerPhase::Running => Color::Green,
        TimerPhase::Stopping => Color::Yellow,
    };

    let started = snapshot
        .started_at_local()
        .map_or_else(|| "not started".to_string(), |t| format!("since {}", t.format("%H:%M:%S")));

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            snapshot.format_elapsed(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} ({started})", snapshot.phase),
            Style::default().fg(color),
        )),
    ];

    if !app.saved.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "{} saved this run, {}",
                app.saved.len(),
                crate::timer::format_duration_hms(app.saved_seconds())
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let clock = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(clock, area);
}

/// Render the status bar.
fn render_status_bar<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let status_text = app
        .status
        .as_deref()
        .unwrap_or_else(|| help_text(app.screen));

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::store::MockTimeEntryStore;
    use crate::timer::{ManualClock, TimerController};
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_timer_screen_shows_elapsed() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
        let timer = TimerController::with_clock(MockTimeEntryStore::new(), clock.clone());
        let mut app = App::new(timer);
        app.track_directly(7, 3);
        clock.advance(chrono::Duration::seconds(3725));
        app.tick();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("01:02:05"));
        assert!(text.contains("Project 7 / Task 3"));
        assert!(text.contains("Running"));
    }

    #[test]
    fn test_picker_screen_lists_projects() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
        let mut app = App::new(TimerController::with_clock(MockTimeEntryStore::new(), clock));
        app.show_projects(vec![crate::api::Project {
            id: 7,
            name: "Website".to_string(),
            description: "Redesign".to_string(),
            hourly_rate: 0.0,
            user_id: 1,
        }]);

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Choose a project (1)"));
        assert!(text.contains("Website"));
    }
}
