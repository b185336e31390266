//! Collaborator boundaries: roster directory, activity store, snapshot store

mod group_file;
mod snapshot;

pub use group_file::{GroupDataStore, GroupRecord};
pub use snapshot::{DirSnapshotStore, SnapshotRecord};

use crate::analysis::Analysis;
use crate::error::{PersistenceError, RosterError, SignalError};
use crate::model::{Event, Habit, Member, Task, TimeWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait RosterDirectory: Send + Sync {
    async fn members(&self, group_id: &str) -> Result<Vec<Member>, RosterError>;
}

/// Reads of outstanding activity. Each call may fail independently.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn open_tasks(&self, group_id: &str) -> Result<Vec<Task>, SignalError>;

    async fn events(&self, group_id: &str, window: TimeWindow) -> Result<Vec<Event>, SignalError>;

    async fn active_habits(&self, group_id: &str) -> Result<Vec<Habit>, SignalError>;
}

/// Write-once history of completed analyses
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(
        &self,
        group_id: &str,
        timestamp: DateTime<Utc>,
        analysis: &Analysis,
    ) -> Result<(), PersistenceError>;
}
