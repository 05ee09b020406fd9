//! Persistence port for finished sessions.

use async_trait::async_trait;

use crate::api::{NewTimeEntry, TimeEntry};
use crate::error::PunchError;

/// Durable storage for time entries.
///
/// The timer issues exactly one `create_entry` per stop and never retries;
/// implementations should not retry either.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimeEntryStore: Send + Sync {
    /// Persist a finished session and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the store is unreachable.
    async fn create_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, PunchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_entry_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn TimeEntryStore) {}
    }
}
