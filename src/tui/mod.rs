//! Interactive time tracker.
//!
//! Hosts a [`TimerController`] in a full-screen terminal UI built with
//! ratatui and crossterm. The loop multiplexes the tick interval, key events,
//! and shutdown signals (SIGINT, plus SIGTERM and SIGHUP on Unix); on the way
//! out a running session gets one bounded save attempt.

mod app;
mod event;
mod ui;

pub use app::{App, Screen};

use std::io::{self, Stdout};

use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::api::{ApiClient, TimeEntry};
use crate::config::TimerConfig;
use crate::error::PunchError;
use crate::timer::{FlushOutcome, TimerController, TimerPhase};
use event::Action;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// What happened during a tracking run.
#[derive(Debug)]
pub struct TrackOutcome {
    /// Sessions saved, including one saved on the way out.
    pub saved: Vec<TimeEntry>,
    /// Result of the shutdown save.
    pub flush: FlushOutcome,
}

/// Run the tracker until the user quits.
///
/// With both ids the timer starts at once; with only a project the task
/// picker opens; otherwise the project picker opens. A given project must
/// exist on the server.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the terminal fails.
/// A running session is still flushed when the terminal fails.
pub async fn run(
    client: ApiClient,
    timer_config: &TimerConfig,
    project: Option<u64>,
    task: Option<u64>,
) -> Result<TrackOutcome, PunchError> {
    let mut app = App::new(TimerController::new(client));
    prepare(&mut app, project, task).await?;

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app, timer_config).await;

    info!(timer = %app.timer.snapshot().format_status(), "tracker closing");
    if app.timer.phase() == TimerPhase::Running {
        app.status = Some("Saving session...".to_string());
        draw(&mut terminal, &app).ok();
    }
    let flush = app.timer.flush(timer_config.flush_timeout()).await;

    restore_terminal(&mut terminal);
    result?;

    let mut saved = app.saved;
    if let FlushOutcome::Saved(entry) = &flush {
        saved.push(entry.clone());
    }
    info!(saved = saved.len(), "tracker closed");

    Ok(TrackOutcome { saved, flush })
}

/// Load what the first screen needs.
async fn prepare(
    app: &mut App<ApiClient>,
    project: Option<u64>,
    task: Option<u64>,
) -> Result<(), PunchError> {
    let projects = app.timer.store().list_projects().await?;

    match (project, task) {
        (Some(project_id), Some(task_id)) => {
            app.projects = projects;
            app.project_index(project_id)?;
            app.tasks = app.timer.store().list_tasks(Some(project_id)).await?;
            app.track_directly(project_id, task_id);
        }
        (Some(project_id), None) => {
            app.show_projects(projects);
            app.selected = app.project_index(project_id)?;
            app.choose_project();
            let tasks = app.timer.store().list_tasks(Some(project_id)).await?;
            app.show_tasks(tasks);
        }
        (None, task) => {
            if task.is_some() {
                warn!("--task given without --project, ignoring");
            }
            app.show_projects(projects);
        }
    }

    Ok(())
}

/// Run the main application loop.
async fn run_app(
    terminal: &mut Term,
    app: &mut App<ApiClient>,
    timer_config: &TimerConfig,
) -> Result<(), PunchError> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(timer_config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    while !app.should_quit {
        draw(terminal, app)?;

        tokio::select! {
            _ = ticker.tick() => app.tick(),
            signal = &mut shutdown => {
                info!(signal, "shutdown signal received");
                app.interrupt(signal);
            }
            next = events.next() => match next {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = event::action_for(key, app.screen) {
                        handle_action(terminal, app, action).await?;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(PunchError::Terminal(format!("Event read failed: {e}"))),
                None => app.should_quit = true,
            },
        }
    }

    Ok(())
}

/// Resolve with the name of the first shutdown signal received.
///
/// Raw mode turns Ctrl-C into a key event, so SIGINT only arrives from
/// outside. SIGHUP comes from a closing terminal, SIGTERM from `kill`.
async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let listen = |kind: SignalKind| async move {
            match signal(kind) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "cannot listen for signal");
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            () = interrupt => "SIGINT",
            () = listen(SignalKind::terminate()) => "SIGTERM",
            () = listen(SignalKind::hangup()) => "SIGHUP",
        }
    }

    #[cfg(not(unix))]
    {
        interrupt.await;
        "SIGINT"
    }
}

async fn handle_action(
    terminal: &mut Term,
    app: &mut App<ApiClient>,
    action: Action,
) -> Result<(), PunchError> {
    match action {
        Action::Quit => app.should_quit = true,
        Action::Up => app.select_previous(),
        Action::Down => app.select_next(),
        Action::Top => app.select_first(),
        Action::Bottom => app.select_last(),
        Action::Back => app.back(),
        Action::Reset => app.reset(),
        Action::Help => app.status = Some(event::help_text(app.screen).to_string()),
        Action::Select => match app.screen {
            Screen::ProjectPicker => {
                if let Some(project_id) = app.choose_project() {
                    match app.timer.store().list_tasks(Some(project_id)).await {
                        Ok(tasks) => app.show_tasks(tasks),
                        Err(e) => app.status = Some(format!("Could not load tasks: {e}")),
                    }
                }
            }
            Screen::TaskPicker => {
                app.choose_task();
            }
            Screen::Timer => {}
        },
        Action::Toggle => {
            if app.timer.phase() == TimerPhase::Running {
                app.status = Some("Saving...".to_string());
                draw(terminal, app)?;
            }
            app.toggle().await;
        }
    }
    Ok(())
}

fn draw(terminal: &mut Term, app: &App<ApiClient>) -> Result<(), PunchError> {
    terminal
        .draw(|frame| ui::render(frame, app))
        .map(|_| ())
        .map_err(|e| PunchError::Terminal(format!("Failed to draw: {e}")))
}

fn setup_terminal() -> Result<Term, PunchError> {
    enable_raw_mode().map_err(|e| PunchError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(PunchError::Terminal(format!("Failed to setup terminal: {e}")));
    }

    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        disable_raw_mode().ok();
        PunchError::Terminal(format!("Failed to create terminal: {e}"))
    })
}

fn restore_terminal(terminal: &mut Term) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::config::ApiConfig;

    async fn catalog_client() -> ApiClient {
        let app = Router::new()
            .route(
                "/api/projects",
                get(|| async { Json(json!([{"ID": 7, "name": "Acme", "hourly_rate": 90.0, "user_id": 1}])) }),
            )
            .route(
                "/api/tasks",
                get(|| async {
                    Json(json!([{"ID": 3, "title": "Design", "status": "TODO", "tags": null,
                                 "project_id": 7, "user_id": 1}]))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        ApiClient::new(&ApiConfig {
            base_url: format!("http://{addr}/api"),
            token: None,
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_prepare_rejects_unknown_project_with_task() {
        let mut app = App::new(TimerController::new(catalog_client().await));

        let err = prepare(&mut app, Some(99), Some(3)).await.unwrap_err();
        assert!(matches!(err, PunchError::NotFound(m) if m == "project 99"));
        assert!(!app.timer.is_running());
    }

    #[tokio::test]
    async fn test_prepare_with_both_ids_starts_timer() {
        let mut app = App::new(TimerController::new(catalog_client().await));

        prepare(&mut app, Some(7), Some(3)).await.unwrap();
        assert!(app.timer.is_running());
        assert_eq!(app.screen, Screen::Timer);
        assert_eq!(app.project.as_ref().map(|p| p.name.as_str()), Some("Acme"));
        assert_eq!(app.task.as_ref().map(|t| t.title.as_str()), Some("Design"));
    }

    #[tokio::test]
    async fn test_prepare_with_project_opens_task_picker() {
        let mut app = App::new(TimerController::new(catalog_client().await));

        prepare(&mut app, Some(7), None).await.unwrap();
        assert_eq!(app.screen, Screen::TaskPicker);
        assert_eq!(app.tasks.len(), 1);

        let mut app = App::new(TimerController::new(catalog_client().await));
        assert!(prepare(&mut app, Some(99), None).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hangup_resolves_shutdown_signal() {
        let waiter = tokio::spawn(shutdown_signal());
        // Let the handlers install before the signal is sent.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let status = std::process::Command::new("kill")
            .args(["-HUP", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let signal = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signal, "SIGHUP");
    }
}
