use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::api::AnalyticsPeriod;

#[derive(Parser)]
#[command(name = "punch")]
#[command(about = "Track billable time against projects and tasks from the terminal")]
#[command(long_about = "punch - billable time tracking from the terminal

Runs a live timer against a project and task and records each finished
session on your time-tracking server. Also lists and edits entries, and
summarizes hours and invoices.

QUICK START:
  punch config set-url http://localhost:8080/api
  punch config set-token <token>
  punch track                   Pick a project and task, then start the timer
  punch track -p 7 -t 3         Start tracking project 7, task 3 right away
  punch entries list            Show recorded time

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  punch <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to the `general.default_output` config setting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Base URL of the time-tracking API
    #[arg(long, env = "PUNCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for the API
    #[arg(long, env = "PUNCH_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive timer
    ///
    /// Opens a terminal screen with a live timer. Without --project and
    /// --task you pick them from lists fetched from the server; with both,
    /// the timer starts immediately.
    ///
    /// # Keys
    ///
    ///   s / space   Start or stop the timer
    ///   r           Reset (discard the running session without saving)
    ///   q / Esc     Quit; a running session is saved first
    ///
    /// # Examples
    ///
    ///   punch track
    ///   punch track -p 7 -t 3
    #[command(alias = "t")]
    Track(TrackArgs),

    /// Manage recorded time entries
    #[command(alias = "e")]
    Entries(EntriesArgs),

    /// List and manage projects
    ///
    /// Lists projects when no subcommand is given.
    ///
    /// # Examples
    ///
    ///   punch projects
    ///   punch projects add "Website" --rate 85
    ///   punch projects edit 7 --rate 90
    #[command(alias = "p")]
    Projects(ProjectsArgs),

    /// List and manage tasks
    ///
    /// Lists tasks when no subcommand is given.
    ///
    /// # Examples
    ///
    ///   punch tasks
    ///   punch tasks --project 7
    ///   punch tasks add "Landing page" -p 7 --tag design
    ///   punch tasks edit 3 --status completed
    Tasks(TasksArgs),

    /// Show hours tracked per day, weekday, or month
    ///
    /// # Examples
    ///
    ///   punch report daily
    ///   punch report weekly -o json
    Report {
        /// Reporting window
        #[arg(value_enum, default_value = "weekly")]
        period: ReportPeriod,
    },

    /// Summarize billable hours for a project over a date range
    ///
    /// # Examples
    ///
    ///   punch invoice --project 7 --from 2024-05-01 --to 2024-05-31
    Invoice(InvoiceArgs),

    /// Show or change configuration
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   punch completions zsh > ~/.zsh/completions/_punch
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct TrackArgs {
    /// Project to track
    #[arg(short, long)]
    pub project: Option<u64>,

    /// Task to track
    #[arg(short, long)]
    pub task: Option<u64>,
}

#[derive(Args)]
pub struct EntriesArgs {
    #[command(subcommand)]
    pub command: EntryCommands,
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// List time entries, newest first
    #[command(alias = "ls")]
    List {
        /// Only show entries for this project
        #[arg(short, long)]
        project: Option<u64>,

        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record a time entry manually
    ///
    /// Give either --end or --duration.
    ///
    /// # Examples
    ///
    ///   punch entries add -p 7 -t 3 --start 09:00 --end 10:30
    ///   punch entries add -p 7 --start "yesterday 14:00" --duration 1h45m
    Add(EntryFields),

    /// Replace the times or project of an existing entry
    Edit {
        /// Entry ID
        id: u64,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Delete a time entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID
        id: u64,
    },
}

#[derive(Args, Clone)]
pub struct EntryFields {
    /// Project ID
    #[arg(short, long)]
    pub project: u64,

    /// Task ID
    #[arg(short, long)]
    pub task: Option<u64>,

    /// Start time (e.g. "09:00", "yesterday 14:00", "2024-05-06 09:00")
    #[arg(short, long)]
    pub start: String,

    /// End time
    #[arg(short, long, conflicts_with = "duration", required_unless_present = "duration")]
    pub end: Option<String>,

    /// Duration (e.g. "90m", "1h30m")
    #[arg(short, long)]
    pub duration: Option<String>,
}

#[derive(Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: Option<ProjectCommands>,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    #[command(alias = "ls")]
    List,

    /// Create a project
    Add {
        /// Project name
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Hourly rate billed for this project
        #[arg(short, long, default_value_t = 0.0)]
        rate: f64,
    },

    /// Change a project; omitted fields keep their current value
    Edit {
        /// Project ID
        id: u64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New hourly rate
        #[arg(short, long)]
        rate: Option<f64>,
    },

    /// Delete a project
    #[command(alias = "rm")]
    Delete {
        /// Project ID
        id: u64,
    },
}

#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct TasksArgs {
    /// Only show tasks for this project
    #[arg(short, long)]
    pub project: Option<u64>,

    #[command(subcommand)]
    pub command: Option<TaskCommands>,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Only show tasks for this project
        #[arg(short, long)]
        project: Option<u64>,
    },

    /// Create a task in a project
    Add {
        /// Task title
        title: String,

        /// Project ID
        #[arg(short, long)]
        project: u64,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Status
        #[arg(short, long, value_enum, default_value = "todo")]
        status: TaskStatus,

        /// Tag (repeat for several)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Change a task; omitted fields keep their current value
    Edit {
        /// Task ID
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Move to another project
        #[arg(short, long)]
        project: Option<u64>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New status
        #[arg(short, long, value_enum)]
        status: Option<TaskStatus>,

        /// Replace all tags (repeat for several)
        #[arg(long = "tag", conflicts_with = "clear_tags")]
        tags: Option<Vec<String>>,

        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID
        id: u64,
    },
}

/// Task status as stored by the server.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Finished
    Completed,
    /// Paused
    OnHold,
}

impl TaskStatus {
    /// Value sent to the server.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::OnHold => "ON_HOLD",
        }
    }
}

#[derive(Args)]
pub struct InvoiceArgs {
    /// Project ID
    #[arg(short, long)]
    pub project: u64,

    /// First day (YYYY-MM-DD, "today", "yesterday")
    #[arg(long)]
    pub from: String,

    /// Last day, inclusive
    #[arg(long)]
    pub to: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set the API base URL
    SetUrl {
        /// e.g. http://localhost:8080/api
        url: String,
    },
    /// Store the API bearer token
    SetToken {
        /// Token issued by the server
        token: String,
    },
}

/// Reporting window for `punch report`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Last 24 hours, per date
    Daily,
    /// Last 7 days, per weekday
    Weekly,
    /// Last month, per month
    Monthly,
}

impl From<ReportPeriod> for AnalyticsPeriod {
    fn from(p: ReportPeriod) -> Self {
        match p {
            ReportPeriod::Daily => Self::Daily,
            ReportPeriod::Weekly => Self::Weekly,
            ReportPeriod::Monthly => Self::Monthly,
        }
    }
}
