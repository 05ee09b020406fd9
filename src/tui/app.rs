//! Application state for the tracker.

use crate::api::{Project, Task, TimeEntry};
use crate::error::PunchError;
use crate::timer::{Clock, SystemClock, TimeEntryStore, TimerController, TimerPhase};

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Choosing a project.
    ProjectPicker,
    /// Choosing a task within the chosen project.
    TaskPicker,
    /// The running (or idle) timer.
    Timer,
}

/// Application state.
pub struct App<S, C = SystemClock> {
    /// The session being tracked.
    pub timer: TimerController<S, C>,
    /// Current screen.
    pub screen: Screen,
    /// Projects offered by the picker.
    pub projects: Vec<Project>,
    /// Tasks offered by the picker.
    pub tasks: Vec<Task>,
    /// Highlighted row in the active picker.
    pub selected: usize,
    /// Project the timer tracks against.
    pub project: Option<Project>,
    /// Task the timer tracks against.
    pub task: Option<Task>,
    /// Status message to display.
    pub status: Option<String>,
    /// Entries saved during this run.
    pub saved: Vec<TimeEntry>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<S: TimeEntryStore, C: Clock> App<S, C> {
    /// Create an app showing the project picker.
    pub fn new(timer: TimerController<S, C>) -> Self {
        Self {
            timer,
            screen: Screen::ProjectPicker,
            projects: Vec::new(),
            tasks: Vec::new(),
            selected: 0,
            project: None,
            task: None,
            status: None,
            saved: Vec::new(),
            should_quit: false,
        }
    }

    /// Number of rows in the active picker.
    fn rows(&self) -> usize {
        match self.screen {
            Screen::ProjectPicker => self.projects.len(),
            Screen::TaskPicker => self.tasks.len(),
            Screen::Timer => 0,
        }
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows() {
            self.selected += 1;
        }
    }

    /// Jump to first row.
    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    /// Jump to last row.
    pub fn select_last(&mut self) {
        self.selected = self.rows().saturating_sub(1);
    }

    /// Show the project picker.
    pub fn show_projects(&mut self, projects: Vec<Project>) {
        self.status = projects
            .is_empty()
            .then(|| "No projects found. Create one with `punch projects add`.".to_string());
        self.projects = projects;
        self.selected = 0;
        self.screen = Screen::ProjectPicker;
    }

    /// Confirm the highlighted project. Returns it so the caller can load
    /// its tasks.
    pub fn choose_project(&mut self) -> Option<u64> {
        if self.screen != Screen::ProjectPicker {
            return None;
        }
        let project = self.projects.get(self.selected)?.clone();
        let id = project.id;
        self.project = Some(project);
        self.task = None;
        Some(id)
    }

    /// Show the task picker for the chosen project.
    ///
    /// Only tasks of that project are offered.
    pub fn show_tasks(&mut self, tasks: Vec<Task>) {
        let project_id = self.project.as_ref().map(|p| p.id);
        self.tasks = tasks
            .into_iter()
            .filter(|t| project_id.map_or(true, |id| t.project_id == id))
            .collect();
        self.status = self
            .tasks
            .is_empty()
            .then(|| "No tasks for this project. Add one with `punch tasks add`, or Backspace to go back.".to_string());
        self.selected = 0;
        self.screen = Screen::TaskPicker;
    }

    /// Confirm the highlighted task and switch to the timer.
    pub fn choose_task(&mut self) -> bool {
        if self.screen != Screen::TaskPicker {
            return false;
        }
        let Some(task) = self.tasks.get(self.selected).cloned() else {
            return false;
        };
        self.task = Some(task);
        self.screen = Screen::Timer;
        self.status = None;
        true
    }

    /// Step back one screen. Not allowed while a session is running.
    pub fn back(&mut self) {
        if self.timer.phase() != TimerPhase::Idle {
            self.status = Some("Stop or reset the timer first".to_string());
            return;
        }
        match self.screen {
            Screen::Timer => {
                self.screen = Screen::TaskPicker;
                self.selected = 0;
                self.status = None;
            }
            Screen::TaskPicker => {
                self.screen = Screen::ProjectPicker;
                self.selected = 0;
                self.status = None;
            }
            Screen::ProjectPicker => {}
        }
    }

    /// Position of a project in the loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns `PunchError::NotFound` if no loaded project has this id.
    pub fn project_index(&self, project_id: u64) -> Result<usize, PunchError> {
        self.projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| PunchError::NotFound(format!("project {project_id}")))
    }

    /// Go straight to the timer for known ids, skipping the pickers.
    ///
    /// Labels come from the loaded catalog when available.
    pub fn track_directly(&mut self, project_id: u64, task_id: u64) {
        self.project = self
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .or_else(|| Some(placeholder_project(project_id)));
        self.task = self
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .or_else(|| Some(placeholder_task(project_id, task_id)));
        self.screen = Screen::Timer;
        self.start();
    }

    /// Start the timer for the chosen project and task.
    pub fn start(&mut self) {
        let project_id = self.project.as_ref().map(|p| p.id);
        let task_id = self.task.as_ref().map(|t| t.id);
        if self.timer.start(project_id, task_id) {
            self.status = Some("Timer started".to_string());
        } else if self.timer.phase() == TimerPhase::Idle {
            self.status = Some("Pick a project and task first".to_string());
        }
    }

    /// Stop the timer and save the session.
    ///
    /// A failed save leaves the timer running and reports the error.
    pub async fn stop(&mut self) {
        match self.timer.stop().await {
            Ok(Some(entry)) => {
                self.status = Some(format!(
                    "Saved entry {} ({})",
                    entry.id,
                    crate::timer::format_duration_hms(entry.duration_seconds)
                ));
                self.saved.push(entry);
            }
            Ok(None) => {}
            Err(e) if e.is_transport() => {
                self.status = Some(format!("Server unreachable, still running: {e}"));
            }
            Err(e) => {
                self.status = Some(format!("Save failed, still running: {e}"));
            }
        }
    }

    /// Start when idle, stop when running.
    pub async fn toggle(&mut self) {
        if self.screen != Screen::Timer {
            return;
        }
        match self.timer.phase() {
            TimerPhase::Idle => self.start(),
            TimerPhase::Running => self.stop().await,
            TimerPhase::Stopping => {}
        }
    }

    /// Discard the running session.
    pub fn reset(&mut self) {
        if self.timer.phase() == TimerPhase::Idle {
            return;
        }
        self.timer.reset();
        self.status = Some("Timer reset, session discarded".to_string());
    }

    /// Quit because the process was told to stop. A running session is
    /// saved on the way out like any other quit.
    pub fn interrupt(&mut self, signal: &str) {
        self.status = Some(format!("Received {signal}, closing"));
        self.should_quit = true;
    }

    /// Advance the displayed elapsed time.
    pub fn tick(&mut self) {
        self.timer.tick();
    }

    /// Total seconds saved during this run.
    pub fn saved_seconds(&self) -> u64 {
        self.saved.iter().map(|e| e.duration_seconds).sum()
    }
}

fn placeholder_project(id: u64) -> Project {
    Project {
        id,
        name: format!("Project {id}"),
        description: String::new(),
        hourly_rate: 0.0,
        user_id: 0,
    }
}

fn placeholder_task(project_id: u64, id: u64) -> Task {
    Task {
        id,
        project_id,
        title: format!("Task {id}"),
        description: String::new(),
        status: String::new(),
        tags: Vec::new(),
        user_id: 0,
    }
}
