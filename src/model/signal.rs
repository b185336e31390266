//! Raw activity signals as returned by the activity store

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Largest effort a single task may declare
pub const MAX_TASK_EFFORT: f64 = 1e6;

/// Half-open window `[start, end)` that scopes event signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The Sunday-to-Sunday week containing `now`
    pub fn week_of(now: DateTime<Utc>) -> Self {
        let days_from_sunday = now.weekday().num_days_from_sunday() as i64;
        let sunday = now.date_naive() - Duration::days(days_from_sunday);
        let start = Utc.from_utc_datetime(&sunday.and_time(NaiveTime::default()));
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

/// An outstanding work item
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub assignee: Option<String>,

    #[serde(default)]
    pub creator: Option<String>,

    #[serde(default)]
    pub effort: Option<f64>,

    #[serde(default)]
    pub complexity: Option<Complexity>,

    #[serde(default)]
    pub recurring: bool,
}

impl Task {
    pub fn effort_or_default(&self) -> f64 {
        self.effort.unwrap_or(1.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err(format!("task '{}' has an empty title", self.id));
        }
        if let Some(effort) = self.effort {
            if !(0.0..=MAX_TASK_EFFORT).contains(&effort) {
                return Err(format!("task '{}' has invalid effort {}", self.id, effort));
            }
        }
        Ok(())
    }
}

/// A scheduled event
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Event {
    pub title: String,

    #[serde(default)]
    pub organizer: Option<String>,

    #[serde(default)]
    pub attendees: Vec<String>,

    /// When the event takes place; used by stores to apply the window
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Event {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("event with empty title".to_string());
        }
        Ok(())
    }
}

/// An active tracked habit
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Habit {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub creator: Option<String>,

    #[serde(default)]
    pub participants: Vec<String>,
}

impl Habit {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Tracked habit")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.creator.is_none() && self.participants.is_empty() {
            return Err(format!("habit '{}' has no creator or participants", self.label()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_starts_on_sunday() {
        // 2026-10-21 is a Wednesday
        let now = Utc.with_ymd_and_hms(2026, 10, 21, 15, 30, 0).unwrap();
        let window = TimeWindow::week_of(now);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 10, 25, 0, 0, 0).unwrap());
        assert!(window.contains(now));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn test_task_effort_defaults_to_one() {
        let task: Task = serde_json::from_str(r#"{"id": "t1", "title": "Dishes"}"#).unwrap();
        assert_eq!(task.effort_or_default(), 1.0);
        assert!(!task.recurring);
    }

    #[test]
    fn test_task_rejects_negative_effort() {
        let task = Task {
            id: "t1".to_string(),
            title: "Laundry".to_string(),
            assignee: None,
            creator: None,
            effort: Some(-2.0),
            complexity: None,
            recurring: false,
        };
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_task_effort_is_capped() {
        let mut task: Task = serde_json::from_str(r#"{"id": "t1", "title": "Move house"}"#).unwrap();
        task.effort = Some(MAX_TASK_EFFORT);
        assert!(task.validate().is_ok());
        task.effort = Some(1e308);
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_habit_without_people_is_rejected() {
        let habit = Habit {
            name: Some("Reading".to_string()),
            creator: None,
            participants: vec![],
        };
        assert!(habit.validate().is_err());
    }
}
