//! Aggregates raw activity signals into per-member load vectors
//!
//! The three activity reads run concurrently and are merged at a join
//! barrier. Contributions are applied in a fixed source order (tasks,
//! events, habits, role baselines) so the result never depends on which
//! read finished first.

use crate::config::Calibration;
use crate::error::{RosterError, SignalError};
use crate::model::{
    validate_roster, Complexity, Degradation, Dimension, Event, Habit, LoadMap, Member, Role,
    SignalSource, SourceType, Task, TimeWindow,
};
use crate::store::{ActivityStore, RosterDirectory};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

const CREATOR_PLANNING: f64 = 1.5;
const RECURRING_REMINDER: f64 = 0.5;
const HIGH_COMPLEXITY_COGNITIVE: f64 = 2.0;

const ORGANIZER_INVISIBLE: f64 = 2.0;
const ORGANIZER_COGNITIVE: f64 = 1.5;
const ORGANIZER_ANTICIPATORY: f64 = 1.0;
const ATTENDEE_VISIBLE: f64 = 0.5;

const HABIT_CREATOR_INVISIBLE: f64 = 0.5;
const HABIT_CREATOR_COGNITIVE: f64 = 0.3;
const HABIT_PARTICIPANT_VISIBLE: f64 = 0.3;

/// Signals fetched for one group, after boundary validation
#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
    pub habits: Vec<Habit>,
}

/// Load vectors plus any sources that could not contribute
#[derive(Debug, Clone)]
pub struct LoadComputation {
    pub load: LoadMap,
    pub degradations: Vec<Degradation>,
}

pub struct LoadCalculator {
    roster: Arc<dyn RosterDirectory>,
    activity: Arc<dyn ActivityStore>,
    calibration: Calibration,
}

impl LoadCalculator {
    pub fn new(
        roster: Arc<dyn RosterDirectory>,
        activity: Arc<dyn ActivityStore>,
        calibration: Calibration,
    ) -> Self {
        Self {
            roster,
            activity,
            calibration,
        }
    }

    /// Compute load vectors for a group, giving up on slow reads at `deadline`.
    ///
    /// Only a missing or malformed roster is returned as an error. A roster
    /// read that misses the deadline yields an empty load map, and a signal
    /// read that fails or misses it contributes nothing. Both are reported as
    /// degradations.
    pub async fn compute(
        &self,
        group_id: &str,
        window: TimeWindow,
        deadline: Instant,
    ) -> Result<LoadComputation, RosterError> {
        // A slow roster is not fatal; the group is reported empty and degraded
        let roster = match timeout_at(deadline, self.roster.members(group_id)).await {
            Ok(members) => members?,
            Err(_) => {
                let reason = "roster fetch missed the analysis deadline".to_string();
                warn!("Group {} degraded: {}", group_id, reason);
                return Ok(LoadComputation {
                    load: LoadMap::default(),
                    degradations: vec![Degradation::Roster { reason }],
                });
            }
        };

        validate_roster(&roster).map_err(|reason| RosterError::Malformed {
            group_id: group_id.to_string(),
            reason,
        })?;

        info!(
            "Computing load for group {} ({} members, window {})",
            group_id,
            roster.len(),
            window
        );

        let (tasks, events, habits) = futures::join!(
            bounded(deadline, "tasks", self.activity.open_tasks(group_id)),
            bounded(deadline, "events", self.activity.events(group_id, window)),
            bounded(deadline, "habits", self.activity.active_habits(group_id)),
        );

        let mut degradations = Vec::new();
        let signals = Signals {
            tasks: accept(SignalSource::Tasks, tasks, Task::validate, &mut degradations),
            events: accept(SignalSource::Events, events, Event::validate, &mut degradations),
            habits: accept(SignalSource::Habits, habits, Habit::validate, &mut degradations),
        };

        let load = build_load_map(&roster, &signals, &self.calibration);
        debug!(
            "Group {} family total {:.1} across {} members",
            group_id,
            load.family_total(),
            load.len()
        );

        Ok(LoadComputation { load, degradations })
    }
}

async fn bounded<T, F>(deadline: Instant, source_name: &'static str, fetch: F) -> Result<T, SignalError>
where
    F: Future<Output = Result<T, SignalError>>,
{
    timeout_at(deadline, fetch)
        .await
        .map_err(|_| SignalError::Deadline(source_name))?
}

/// Keep the valid records of a fetch, recording failures and rejections
fn accept<T>(
    source: SignalSource,
    fetched: Result<Vec<T>, SignalError>,
    validate: fn(&T) -> Result<(), String>,
    degradations: &mut Vec<Degradation>,
) -> Vec<T> {
    let records = match fetched {
        Ok(records) => records,
        Err(e) => {
            warn!("Signal source {} degraded: {}", source, e);
            degradations.push(Degradation::SignalSource {
                source,
                reason: e.to_string(),
            });
            return Vec::new();
        }
    };

    let total = records.len();
    let valid: Vec<T> = records
        .into_iter()
        .filter(|record| match validate(record) {
            Ok(()) => true,
            Err(reason) => {
                warn!("Rejected {} record: {}", source, reason);
                false
            }
        })
        .collect();

    let rejected = total - valid.len();
    if rejected > 0 {
        degradations.push(Degradation::RejectedRecords {
            source,
            count: rejected,
        });
    }
    valid
}

/// Fold signals into a finalized load map. Pure and deterministic.
pub fn build_load_map(roster: &[Member], signals: &Signals, calibration: &Calibration) -> LoadMap {
    let mut load = LoadMap::from_roster(roster);

    apply_tasks(&mut load, &signals.tasks);
    apply_events(&mut load, &signals.events);
    apply_habits(&mut load, &signals.habits);
    apply_baselines(&mut load, calibration);

    load.finalize();
    load
}

fn apply_tasks(load: &mut LoadMap, tasks: &[Task]) {
    for task in tasks {
        let Some(assignee) = task.assignee.as_deref() else {
            continue;
        };
        let Some(member) = load.get_mut(assignee) else {
            continue;
        };

        let label = task.title.as_str();
        member.contribute(
            SourceType::Task,
            label,
            Dimension::Visible,
            task.effort_or_default(),
        );
        if task.creator.as_deref() == Some(assignee) {
            member.contribute(SourceType::Task, label, Dimension::Invisible, CREATOR_PLANNING);
        }
        if task.recurring {
            member.contribute(
                SourceType::Task,
                label,
                Dimension::Invisible,
                RECURRING_REMINDER,
            );
        }
        if task.complexity == Some(Complexity::High) {
            member.contribute(
                SourceType::Task,
                label,
                Dimension::Cognitive,
                HIGH_COMPLEXITY_COGNITIVE,
            );
        }
    }
}

fn apply_events(load: &mut LoadMap, events: &[Event]) {
    for event in events {
        let label = event.title.as_str();
        let organizer = event.organizer.as_deref();

        if let Some(member) = organizer.and_then(|id| load.get_mut(id)) {
            member.contribute(
                SourceType::Event,
                label,
                Dimension::Invisible,
                ORGANIZER_INVISIBLE,
            );
            member.contribute(
                SourceType::Event,
                label,
                Dimension::Cognitive,
                ORGANIZER_COGNITIVE,
            );
            member.contribute(
                SourceType::Event,
                label,
                Dimension::Anticipatory,
                ORGANIZER_ANTICIPATORY,
            );
        }

        for attendee in &event.attendees {
            if Some(attendee.as_str()) == organizer {
                continue;
            }
            if let Some(member) = load.get_mut(attendee) {
                member.contribute(SourceType::Event, label, Dimension::Visible, ATTENDEE_VISIBLE);
            }
        }
    }
}

fn apply_habits(load: &mut LoadMap, habits: &[Habit]) {
    for habit in habits {
        let label = habit.label();

        if let Some(member) = habit.creator.as_deref().and_then(|id| load.get_mut(id)) {
            member.contribute(
                SourceType::Habit,
                label,
                Dimension::Invisible,
                HABIT_CREATOR_INVISIBLE,
            );
            member.contribute(
                SourceType::Habit,
                label,
                Dimension::Cognitive,
                HABIT_CREATOR_COGNITIVE,
            );
        }

        for participant in &habit.participants {
            if let Some(member) = load.get_mut(participant) {
                member.contribute(
                    SourceType::Habit,
                    label,
                    Dimension::Visible,
                    HABIT_PARTICIPANT_VISIBLE,
                );
            }
        }
    }
}

fn apply_baselines(load: &mut LoadMap, calibration: &Calibration) {
    for member in load.iter_mut() {
        match member.role {
            Role::Parent => {
                member.contribute(
                    SourceType::Baseline,
                    "Family emotional regulation",
                    Dimension::Emotional,
                    calibration.parent_emotional,
                );
                member.contribute(
                    SourceType::Baseline,
                    "Family decisions and planning",
                    Dimension::Cognitive,
                    calibration.parent_cognitive,
                );
                member.contribute(
                    SourceType::Baseline,
                    "Preventing problems and planning ahead",
                    Dimension::Anticipatory,
                    calibration.parent_anticipatory,
                );
            }
            Role::Child
                if member
                    .age
                    .is_some_and(|age| age > calibration.child_emotional_min_age) =>
            {
                member.contribute(
                    SourceType::Baseline,
                    "Supporting younger siblings",
                    Dimension::Emotional,
                    calibration.child_emotional,
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::GroupDataStore;
    use crate::store::GroupRecord;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn roster() -> Vec<Member> {
        vec![
            Member::new("ana", "Ana", Role::Parent),
            Member::new("ben", "Ben", Role::Parent),
            Member::new("cam", "Cam", Role::Child).with_age(11),
            Member::new("dee", "Dee", Role::Child).with_age(7),
        ]
    }

    fn task(id: &str, assignee: &str, creator: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            assignee: Some(assignee.to_string()),
            creator: Some(creator.to_string()),
            effort: None,
            complexity: None,
            recurring: false,
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::week_of(Utc.with_ymd_and_hms(2026, 10, 21, 0, 0, 0).unwrap())
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[test]
    fn test_task_rules() {
        let mut t = task("1", "ana", "ana");
        t.effort = Some(3.0);
        t.recurring = true;
        t.complexity = Some(Complexity::High);
        let signals = Signals {
            tasks: vec![t, task("2", "ben", "ana")],
            ..Default::default()
        };

        let load = build_load_map(&roster(), &signals, &Calibration::default());
        let ana = load.get("ana").unwrap();
        assert_eq!(ana.visible(), 3.0);
        assert_eq!(ana.invisible(), 2.0);
        // 8 baseline + 2 for high complexity
        assert_eq!(ana.dimensions.cognitive, 10.0);

        let ben = load.get("ben").unwrap();
        assert_eq!(ben.visible(), 1.0);
        assert_eq!(ben.invisible(), 0.0);
    }

    #[test]
    fn test_event_rules_skip_organizer_as_attendee() {
        let signals = Signals {
            events: vec![Event {
                title: "Dentist".to_string(),
                organizer: Some("ana".to_string()),
                attendees: vec!["ana".to_string(), "cam".to_string(), "ghost".to_string()],
                date: None,
            }],
            ..Default::default()
        };

        let load = build_load_map(&roster(), &signals, &Calibration::default());
        let ana = load.get("ana").unwrap();
        assert_eq!(ana.visible(), 0.0);
        assert_eq!(ana.invisible(), 2.0);
        assert_eq!(ana.dimensions.cognitive, 9.5);
        assert_eq!(ana.dimensions.anticipatory, 7.0);
        assert_eq!(load.get("cam").unwrap().visible(), 0.5);
    }

    #[test]
    fn test_habit_rules() {
        let signals = Signals {
            habits: vec![Habit {
                name: Some("Reading".to_string()),
                creator: Some("ben".to_string()),
                participants: vec!["cam".to_string(), "dee".to_string()],
            }],
            ..Default::default()
        };

        let load = build_load_map(&roster(), &signals, &Calibration::default());
        let ben = load.get("ben").unwrap();
        assert_eq!(ben.invisible(), 0.5);
        assert!((ben.dimensions.cognitive - 8.3).abs() < 1e-9);
        assert!((load.get("dee").unwrap().visible() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_role_baselines() {
        let load = build_load_map(&roster(), &Signals::default(), &Calibration::default());

        let ana = load.get("ana").unwrap();
        assert_eq!(ana.emotional(), 10.0);
        assert_eq!(ana.dimensions.cognitive, 8.0);
        assert_eq!(ana.dimensions.anticipatory, 6.0);
        // 10*2.0 + 8*1.8 + 6*1.6
        assert!((ana.total - 44.0).abs() < 1e-9);

        assert_eq!(load.get("cam").unwrap().emotional(), 2.0);
        assert_eq!(load.get("dee").unwrap().emotional(), 0.0);
    }

    #[test]
    fn test_details_keep_discovery_order() {
        let signals = Signals {
            tasks: vec![task("1", "ana", "ben"), task("2", "ana", "ben")],
            events: vec![Event {
                title: "Recital".to_string(),
                organizer: Some("ben".to_string()),
                attendees: vec!["ana".to_string()],
                date: None,
            }],
            ..Default::default()
        };

        let load = build_load_map(&roster(), &signals, &Calibration::default());
        let labels: Vec<_> = load
            .get("ana")
            .unwrap()
            .details
            .iter()
            .map(|d| d.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Task 1",
                "Task 2",
                "Recital",
                "Family emotional regulation",
                "Family decisions and planning",
                "Preventing problems and planning ahead",
            ]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let signals = Signals {
            tasks: vec![task("1", "ana", "ana"), task("2", "ben", "ben")],
            habits: vec![Habit {
                name: None,
                creator: Some("ana".to_string()),
                participants: vec!["dee".to_string()],
            }],
            ..Default::default()
        };
        let first = build_load_map(&roster(), &signals, &Calibration::default());
        let second = build_load_map(&roster(), &signals, &Calibration::default());
        assert_eq!(first, second);
    }

    fn store_with(tasks: Vec<Task>) -> Arc<GroupDataStore> {
        Arc::new(GroupDataStore::from_groups(vec![GroupRecord {
            id: "g".to_string(),
            members: roster(),
            tasks,
            ..Default::default()
        }]))
    }

    #[tokio::test]
    async fn test_compute_twice_is_identical() {
        let store = store_with(vec![task("1", "ana", "ana")]);
        let calculator = LoadCalculator::new(store.clone(), store, Calibration::default());

        let first = calculator.compute("g", window(), far_deadline()).await.unwrap();
        let second = calculator.compute("g", window(), far_deadline()).await.unwrap();
        assert_eq!(first.load, second.load);
        assert!(first.degradations.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_tasks_are_rejected() {
        let mut bad = task("2", "ana", "ana");
        bad.effort = Some(f64::NAN);
        let store = store_with(vec![task("1", "ana", "ana"), bad]);
        let calculator = LoadCalculator::new(store.clone(), store, Calibration::default());

        let result = calculator.compute("g", window(), far_deadline()).await.unwrap();
        assert_eq!(result.load.get("ana").unwrap().visible(), 1.0);
        assert_eq!(
            result.degradations,
            vec![Degradation::RejectedRecords {
                source: SignalSource::Tasks,
                count: 1
            }]
        );
    }

    struct FlakyActivity {
        tasks: Vec<Task>,
        slow_habits: bool,
    }

    #[async_trait]
    impl ActivityStore for FlakyActivity {
        async fn open_tasks(&self, _group_id: &str) -> Result<Vec<Task>, SignalError> {
            Ok(self.tasks.clone())
        }

        async fn events(
            &self,
            _group_id: &str,
            _window: TimeWindow,
        ) -> Result<Vec<Event>, SignalError> {
            Err(SignalError::Fetch {
                source_name: "events",
                reason: "connection reset".to_string(),
            })
        }

        async fn active_habits(&self, _group_id: &str) -> Result<Vec<Habit>, SignalError> {
            if self.slow_habits {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failed_source_degrades_without_aborting() {
        let roster_store = store_with(Vec::new());
        let activity = Arc::new(FlakyActivity {
            tasks: vec![task("1", "ben", "ben")],
            slow_habits: false,
        });
        let calculator = LoadCalculator::new(roster_store, activity, Calibration::default());

        let result = calculator.compute("g", window(), far_deadline()).await.unwrap();
        assert_eq!(result.load.get("ben").unwrap().visible(), 1.0);
        assert_eq!(result.degradations.len(), 1);
        assert!(matches!(
            result.degradations[0],
            Degradation::SignalSource {
                source: SignalSource::Events,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_load() {
        let roster_store = store_with(Vec::new());
        let activity = Arc::new(FlakyActivity {
            tasks: vec![task("1", "ben", "ben")],
            slow_habits: true,
        });
        let calculator = LoadCalculator::new(roster_store, activity, Calibration::default());

        let deadline = Instant::now() + Duration::from_millis(100);
        let result = calculator.compute("g", window(), deadline).await.unwrap();

        assert_eq!(result.load.get("ben").unwrap().visible(), 1.0);
        let sources: Vec<_> = result
            .degradations
            .iter()
            .filter_map(|d| match d {
                Degradation::SignalSource { source, .. } => Some(*source),
                _ => None,
            })
            .collect();
        assert_eq!(sources, vec![SignalSource::Events, SignalSource::Habits]);
    }

    struct StalledRoster;

    #[async_trait]
    impl RosterDirectory for StalledRoster {
        async fn members(&self, _group_id: &str) -> Result<Vec<Member>, RosterError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(roster())
        }
    }

    #[tokio::test]
    async fn test_stalled_roster_degrades_to_empty_load() {
        let activity = store_with(Vec::new());
        let calculator =
            LoadCalculator::new(Arc::new(StalledRoster), activity, Calibration::default());

        let deadline = Instant::now() + Duration::from_millis(50);
        let result = calculator.compute("g", window(), deadline).await.unwrap();

        assert!(result.load.is_empty());
        assert!(matches!(
            result.degradations.as_slice(),
            [Degradation::Roster { reason }] if reason.contains("deadline")
        ));
    }

    #[tokio::test]
    async fn test_huge_efforts_are_rejected() {
        let mut first = task("1", "ana", "ana");
        first.effort = Some(1e308);
        let mut second = task("2", "ana", "ana");
        second.effort = Some(1e308);
        let store = store_with(vec![first, second, task("3", "ben", "ben")]);
        let calculator = LoadCalculator::new(store.clone(), store, Calibration::default());

        let result = calculator.compute("g", window(), far_deadline()).await.unwrap();
        assert!(result.load.iter().all(|m| m.total.is_finite()));
        let shares: u32 = result.load.iter().map(|m| m.percentage_of_family).sum();
        assert!((96..=104).contains(&shares));
        assert_eq!(
            result.degradations,
            vec![Degradation::RejectedRecords {
                source: SignalSource::Tasks,
                count: 2
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_group_is_fatal() {
        let store = store_with(Vec::new());
        let calculator = LoadCalculator::new(store.clone(), store, Calibration::default());
        let err = calculator
            .compute("missing", window(), far_deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::NotFound(_)));
    }
}
