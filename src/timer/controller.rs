//! The timer state machine.
//!
//! ```text
//!   Idle --start--> Running --stop--> Stopping --write ok--> Idle
//!                     ^                   |
//!                     +----write failed---+
//! ```
//!
//! `reset` returns to Idle from any phase. The controller is a plain owned
//! value: whoever drives the UI owns it and calls `tick` on its own interval.

use std::time::Duration as StdDuration;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::session::{TimerPhase, TimerSnapshot};
use super::store::TimeEntryStore;
use crate::api::{NewTimeEntry, TimeEntry};
use crate::error::PunchError;

/// Result of a shutdown flush.
#[derive(Debug)]
pub enum FlushOutcome {
    /// No session was running; nothing was written.
    Idle,
    /// The running session was saved.
    Saved(TimeEntry),
    /// The write failed.
    Failed(PunchError),
    /// The write did not finish within the limit. It may or may not have
    /// reached the server.
    TimedOut,
}

/// Owns the currently tracked session.
pub struct TimerController<S, C = SystemClock> {
    store: S,
    clock: C,
    phase: TimerPhase,
    started_at: Option<DateTime<Utc>>,
    elapsed_seconds: u64,
    project_id: Option<u64>,
    task_id: Option<u64>,
}

impl<S: TimeEntryStore> TimerController<S, SystemClock> {
    /// Create an idle controller on the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: TimeEntryStore, C: Clock> TimerController<S, C> {
    /// Create an idle controller with an explicit clock.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            phase: TimerPhase::Idle,
            started_at: None,
            elapsed_seconds: 0,
            project_id: None,
            task_id: None,
        }
    }

    /// Start tracking time against a project and task.
    ///
    /// Ignored unless the timer is idle and both ids are present and
    /// non-zero. Returns whether a session was started.
    pub fn start(&mut self, project_id: Option<u64>, task_id: Option<u64>) -> bool {
        if self.phase != TimerPhase::Idle {
            debug!(phase = %self.phase, "start ignored, timer not idle");
            return false;
        }

        let (Some(project_id), Some(task_id)) = (
            project_id.filter(|id| *id != 0),
            task_id.filter(|id| *id != 0),
        ) else {
            debug!(?project_id, ?task_id, "start ignored, missing project or task");
            return false;
        };

        // Whole seconds keep the written duration equal to end - start as
        // the server computes it.
        let now = self.clock.now().trunc_subsecs(0);

        self.started_at = Some(now);
        self.elapsed_seconds = 0;
        self.project_id = Some(project_id);
        self.task_id = Some(task_id);
        self.phase = TimerPhase::Running;

        info!(project_id, task_id, started_at = %now, "timer started");
        true
    }

    /// Recompute elapsed time from the clock. No-op unless running.
    ///
    /// Returns the elapsed seconds after the update.
    pub fn tick(&mut self) -> u64 {
        if self.phase == TimerPhase::Running {
            if let Some(started_at) = self.started_at {
                self.elapsed_seconds = whole_seconds_between(started_at, self.clock.now());
            }
        }
        self.elapsed_seconds
    }

    /// Stop the running session and write it to the store.
    ///
    /// Returns `Ok(None)` without writing when nothing is running. On a
    /// successful write the timer resets and the stored entry is returned.
    /// On failure the timer goes back to running with its original start
    /// time, so calling `stop` again retries with the full session.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails. It is not retried.
    pub async fn stop(&mut self) -> Result<Option<TimeEntry>, PunchError> {
        if self.phase != TimerPhase::Running {
            debug!(phase = %self.phase, "stop ignored, timer not running");
            return Ok(None);
        }
        let (Some(started_at), Some(project_id)) = (self.started_at, self.project_id) else {
            return Ok(None);
        };

        let ended_at = self.clock.now();
        self.elapsed_seconds = whole_seconds_between(started_at, ended_at);

        let entry = NewTimeEntry {
            project_id,
            task_id: self.task_id,
            start_time: started_at,
            end_time: ended_at,
            duration_seconds: self.elapsed_seconds,
        };

        self.phase = TimerPhase::Stopping;
        debug!(project_id, duration = entry.duration_seconds, "writing time entry");

        match self.store.create_entry(&entry).await {
            Ok(saved) => {
                info!(id = saved.id, duration = saved.duration_seconds, "time entry saved");
                self.reset();
                Ok(Some(saved))
            }
            Err(e) => {
                warn!(error = %e, "failed to save time entry, timer still running");
                self.phase = TimerPhase::Running;
                Err(e)
            }
        }
    }

    /// Discard the current session, if any, without writing it.
    pub fn reset(&mut self) {
        if self.phase != TimerPhase::Idle {
            debug!(phase = %self.phase, "timer reset");
        }
        self.phase = TimerPhase::Idle;
        self.started_at = None;
        self.elapsed_seconds = 0;
        self.project_id = None;
        self.task_id = None;
    }

    /// Best-effort save of a running session before shutdown.
    ///
    /// Runs `stop` once, giving up after `limit`. Never returns an error:
    /// failures are logged and reported in the outcome. After a timeout the
    /// timer is left running, because the write may not have landed.
    pub async fn flush(&mut self, limit: StdDuration) -> FlushOutcome {
        if self.phase != TimerPhase::Running {
            return FlushOutcome::Idle;
        }

        info!(elapsed = self.elapsed_seconds, "flushing running timer");

        match tokio::time::timeout(limit, self.stop()).await {
            Ok(Ok(Some(entry))) => FlushOutcome::Saved(entry),
            Ok(Ok(None)) => FlushOutcome::Idle,
            Ok(Err(e)) => {
                warn!(error = %e, "flush failed, session not saved");
                FlushOutcome::Failed(e)
            }
            Err(_) => {
                warn!(limit_ms = limit.as_millis(), "flush timed out");
                self.phase = TimerPhase::Running;
                FlushOutcome::TimedOut
            }
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            running: self.is_running(),
            started_at: self.started_at,
            elapsed_seconds: self.elapsed_seconds,
            project_id: self.project_id,
            task_id: self.task_id,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Whether a session is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Elapsed seconds as of the last tick.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// When the current session started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// The store finished sessions are written to.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

fn whole_seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from(end.signed_duration_since(start).num_seconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::timer::clock::ManualClock;
    use crate::timer::store::MockTimeEntryStore;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 9, 30, 0).unwrap()
    }

    fn stored(entry: &NewTimeEntry) -> TimeEntry {
        TimeEntry {
            id: 42,
            start_time: entry.start_time,
            end_time: entry.end_time,
            duration_seconds: entry.duration_seconds,
            project_id: entry.project_id,
            task_id: entry.task_id,
            user_id: 1,
        }
    }

    fn controller_with(store: MockTimeEntryStore) -> (TimerController<MockTimeEntryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new(t0());
        (TimerController::with_clock(store, clock.clone()), clock)
    }

    /// Store that never answers within any reasonable time.
    struct StalledStore {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TimeEntryStore for StalledStore {
        async fn create_entry(&self, _entry: &NewTimeEntry) -> Result<TimeEntry, PunchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(StdDuration::from_secs(3600)).await;
            Err(PunchError::Timeout(3600))
        }
    }

    #[test]
    fn test_new_controller_is_idle() {
        let (timer, _) = controller_with(MockTimeEntryStore::new());
        assert_eq!(timer.snapshot(), TimerSnapshot::default());
    }

    #[test]
    fn test_elapsed_counts_ticks() {
        let (mut timer, clock) = controller_with(MockTimeEntryStore::new());
        assert!(timer.start(Some(7), Some(3)));

        for n in 1..=10 {
            clock.advance(Duration::seconds(1));
            assert_eq!(timer.tick(), n);
        }
        assert_eq!(timer.elapsed_seconds(), 10);
        assert!(timer.is_running());
    }

    #[test]
    fn test_elapsed_truncates_partial_seconds() {
        let (mut timer, clock) = controller_with(MockTimeEntryStore::new());
        clock.set(t0() + Duration::milliseconds(700));
        timer.start(Some(1), Some(2));
        assert_eq!(timer.started_at(), Some(t0()));

        clock.advance(Duration::milliseconds(1999));
        assert_eq!(timer.tick(), 2);
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let (mut timer, clock) = controller_with(MockTimeEntryStore::new());
        timer.start(Some(7), Some(3));
        clock.advance(Duration::seconds(4));
        timer.tick();
        let before = timer.snapshot();

        assert!(!timer.start(Some(8), Some(9)));
        assert_eq!(timer.snapshot(), before);
    }

    #[test]
    fn test_start_requires_both_refs() {
        let (mut timer, _) = controller_with(MockTimeEntryStore::new());

        assert!(!timer.start(Some(0), Some(3)));
        assert!(!timer.start(None, Some(3)));
        assert!(!timer.start(Some(7), None));
        assert!(!timer.start(Some(7), Some(0)));
        assert_eq!(timer.snapshot(), TimerSnapshot::default());
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let (mut timer, clock) = controller_with(MockTimeEntryStore::new());
        clock.advance(Duration::seconds(30));
        assert_eq!(timer.tick(), 0);
        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn test_stop_while_idle_writes_nothing() {
        let mut store = MockTimeEntryStore::new();
        store.expect_create_entry().times(0);
        let (mut timer, _) = controller_with(store);

        assert!(timer.stop().await.unwrap().is_none());
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[tokio::test]
    async fn test_stop_writes_one_entry_and_resets() {
        let mut store = MockTimeEntryStore::new();
        store
            .expect_create_entry()
            .withf(|e: &NewTimeEntry| {
                e.project_id == 7
                    && e.task_id == Some(3)
                    && e.start_time == t0()
                    && e.end_time == t0() + Duration::seconds(5)
                    && e.duration_seconds == 5
            })
            .times(1)
            .returning(|e| Ok(stored(e)));
        let (mut timer, clock) = controller_with(store);

        timer.start(Some(7), Some(3));
        clock.advance(Duration::seconds(5));
        assert_eq!(timer.tick(), 5);

        let saved = timer.stop().await.unwrap().unwrap();
        assert_eq!(saved.id, 42);
        assert_eq!(saved.duration_seconds, 5);
        assert_eq!(timer.snapshot(), TimerSnapshot::default());
    }

    #[tokio::test]
    async fn test_duration_matches_timestamps_between_ticks() {
        let mut store = MockTimeEntryStore::new();
        store
            .expect_create_entry()
            .withf(|e: &NewTimeEntry| {
                let span = e.end_time.signed_duration_since(e.start_time).num_seconds();
                e.duration_seconds == 12 && span == 12
            })
            .times(1)
            .returning(|e| Ok(stored(e)));
        let (mut timer, clock) = controller_with(store);

        timer.start(Some(7), Some(3));
        clock.advance(Duration::seconds(10));
        timer.tick();
        // Stop lands between ticks; the final elapsed value is taken at stop.
        clock.advance(Duration::milliseconds(2400));
        let saved = timer.stop().await.unwrap().unwrap();
        assert_eq!(saved.duration_seconds, 12);
    }

    #[tokio::test]
    async fn test_failed_stop_keeps_session_running() {
        let mut store = MockTimeEntryStore::new();
        store
            .expect_create_entry()
            .times(1)
            .returning(|_| Err(PunchError::Transport("connection refused".to_string())));
        let (mut timer, clock) = controller_with(store);

        timer.start(Some(7), Some(3));
        clock.advance(Duration::seconds(9));

        let err = timer.stop().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.started_at(), Some(t0()));
        assert_eq!(timer.elapsed_seconds(), 9);

        clock.advance(Duration::seconds(1));
        assert_eq!(timer.tick(), 10);
    }

    #[tokio::test]
    async fn test_stop_can_be_retried_after_failure() {
        let mut store = MockTimeEntryStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_create_entry()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(PunchError::from_status(500, r#"{"error":"db down"}"#)));
        store
            .expect_create_entry()
            .withf(|e: &NewTimeEntry| e.start_time == t0() && e.duration_seconds == 20)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|e| Ok(stored(e)));
        let (mut timer, clock) = controller_with(store);

        timer.start(Some(7), Some(3));
        clock.advance(Duration::seconds(15));
        assert!(timer.stop().await.is_err());

        clock.advance(Duration::seconds(5));
        assert!(timer.stop().await.unwrap().is_some());
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_reset_from_any_phase() {
        let (mut timer, clock) = controller_with(MockTimeEntryStore::new());
        timer.reset();
        assert_eq!(timer.snapshot(), TimerSnapshot::default());

        timer.start(Some(7), Some(3));
        clock.advance(Duration::seconds(3));
        timer.tick();
        timer.reset();
        assert_eq!(timer.snapshot(), TimerSnapshot::default());

        // A fresh session can start after an abort.
        assert!(timer.start(Some(1), Some(1)));
    }

    #[tokio::test]
    async fn test_flush_idle_does_nothing() {
        let mut store = MockTimeEntryStore::new();
        store.expect_create_entry().times(0);
        let (mut timer, _) = controller_with(store);

        let outcome = timer.flush(StdDuration::from_secs(1)).await;
        assert!(matches!(outcome, FlushOutcome::Idle));
    }

    #[tokio::test]
    async fn test_flush_saves_running_session() {
        let mut store = MockTimeEntryStore::new();
        store
            .expect_create_entry()
            .times(1)
            .returning(|e| Ok(stored(e)));
        let (mut timer, clock) = controller_with(store);

        timer.start(Some(7), Some(3));
        clock.advance(Duration::seconds(61));

        let outcome = timer.flush(StdDuration::from_secs(1)).await;
        match outcome {
            FlushOutcome::Saved(entry) => assert_eq!(entry.duration_seconds, 61),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[tokio::test]
    async fn test_flush_reports_failure() {
        let mut store = MockTimeEntryStore::new();
        store
            .expect_create_entry()
            .times(1)
            .returning(|_| Err(PunchError::Unauthorized));
        let (mut timer, _) = controller_with(store);

        timer.start(Some(7), Some(3));
        let outcome = timer.flush(StdDuration::from_secs(1)).await;
        assert!(matches!(outcome, FlushOutcome::Failed(PunchError::Unauthorized)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_gives_up_after_limit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = StalledStore { calls: Arc::clone(&calls) };
        let mut timer = TimerController::with_clock(store, ManualClock::new(t0()));

        timer.start(Some(7), Some(3));
        let outcome = timer.flush(StdDuration::from_secs(3)).await;

        assert!(matches!(outcome, FlushOutcome::TimedOut));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(timer.is_running());
        assert_eq!(timer.started_at(), Some(t0()));
    }
}
