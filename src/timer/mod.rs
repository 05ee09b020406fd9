//! Running-timer session tracking.
//!
//! A single [`TimerController`] owns the lifecycle of the session currently
//! being tracked:
//! - `start` records the start time for a project/task pair
//! - `tick` recomputes elapsed wall-clock time on a one-second cadence
//! - `stop` writes the finished session through a [`TimeEntryStore`]
//! - `reset` discards the session without writing anything
//! - `flush` is the best-effort, time-bounded stop used on shutdown

pub mod clock;
pub mod controller;
pub mod format;
pub mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{FlushOutcome, TimerController};
pub use format::{format_duration, format_duration_hms, parse_duration};
pub use session::{TimerPhase, TimerSnapshot};
pub use store::TimeEntryStore;
