use super::{ActivityStore, RosterDirectory};
use crate::error::{RosterError, SignalError, StoreError};
use crate::model::{Event, Habit, Member, Task, TimeWindow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Everything known about one group in a data file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GroupRecord {
    pub id: String,

    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub events: Vec<Event>,

    #[serde(default)]
    pub habits: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
struct GroupFile {
    #[serde(default)]
    groups: Vec<GroupRecord>,
}

/// Roster directory and activity store backed by a YAML or JSON file
#[derive(Debug, Clone, Default)]
pub struct GroupDataStore {
    groups: HashMap<String, GroupRecord>,
}

impl GroupDataStore {
    pub fn from_groups(groups: impl IntoIterator<Item = GroupRecord>) -> Self {
        Self {
            groups: groups.into_iter().map(|g| (g.id.clone(), g)).collect(),
        }
    }

    /// Load a data file. JSON files parse too, since YAML is a superset.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: GroupFile = serde_yaml::from_str(&content)?;
        Ok(Self::from_groups(file.groups))
    }

    pub fn group_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn group(&self, group_id: &str, source_name: &'static str) -> Result<&GroupRecord, SignalError> {
        self.groups.get(group_id).ok_or_else(|| SignalError::Fetch {
            source_name,
            reason: format!("unknown group '{}'", group_id),
        })
    }
}

#[async_trait]
impl RosterDirectory for GroupDataStore {
    async fn members(&self, group_id: &str) -> Result<Vec<Member>, RosterError> {
        self.groups
            .get(group_id)
            .map(|g| g.members.clone())
            .ok_or_else(|| RosterError::NotFound(group_id.to_string()))
    }
}

#[async_trait]
impl ActivityStore for GroupDataStore {
    async fn open_tasks(&self, group_id: &str) -> Result<Vec<Task>, SignalError> {
        Ok(self.group(group_id, "tasks")?.tasks.clone())
    }

    async fn events(&self, group_id: &str, window: TimeWindow) -> Result<Vec<Event>, SignalError> {
        // Undated events cannot be placed outside the window, so they count
        Ok(self
            .group(group_id, "events")?
            .events
            .iter()
            .filter(|e| e.date.map(|d| window.contains(d)).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn active_habits(&self, group_id: &str) -> Result<Vec<Habit>, SignalError> {
        Ok(self.group(group_id, "habits")?.habits.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    const SAMPLE: &str = r#"
groups:
  - id: rivera
    members:
      - { id: ana, name: Ana, role: parent }
      - { id: ben, name: Ben, role: parent }
      - { id: cam, name: Cam, role: child, age: 9 }
    tasks:
      - { id: t1, title: Laundry, assignee: ana, creator: ana, effort: 2 }
    events:
      - title: Dentist
        organizer: ana
        attendees: [cam]
        date: 2026-10-20T09:00:00Z
      - title: Old recital
        organizer: ana
        date: 2026-09-01T18:00:00Z
      - title: Someday picnic
        organizer: ben
    habits:
      - { name: Reading, creator: ana, participants: [cam] }
"#;

    fn sample_store() -> GroupDataStore {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        GroupDataStore::load(file.path()).unwrap()
    }

    #[tokio::test]
    async fn test_load_yaml_groups() {
        let store = sample_store();
        assert_eq!(store.group_ids(), vec!["rivera"]);

        let members = store.members("rivera").await.unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members[2].age, Some(9));

        let tasks = store.open_tasks("rivera").await.unwrap();
        assert_eq!(tasks[0].effort, Some(2.0));
    }

    #[tokio::test]
    async fn test_events_filtered_by_window() {
        let store = sample_store();
        let window = TimeWindow::week_of(Utc.with_ymd_and_hms(2026, 10, 21, 0, 0, 0).unwrap());

        let events = store.events("rivera", window).await.unwrap();
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Dentist", "Someday picnic"]);
    }

    #[tokio::test]
    async fn test_unknown_group_is_roster_not_found() {
        let store = sample_store();
        let err = store.members("nobody").await.unwrap_err();
        assert!(matches!(err, RosterError::NotFound(ref id) if id == "nobody"));
    }

    #[tokio::test]
    async fn test_json_data_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"groups": [{"id": "g", "members": [{"id": "a", "name": "A", "role": "parent"}]}]}"#,
        )
        .unwrap();
        let store = GroupDataStore::load(file.path()).unwrap();
        assert_eq!(store.members("g").await.unwrap().len(), 1);
        assert!(store.open_tasks("g").await.unwrap().is_empty());
    }
}
