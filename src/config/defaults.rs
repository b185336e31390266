use std::path::PathBuf;

use super::types::{SkillBand, SystemicChangeEntry};

pub fn default_version() -> u32 {
    1
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_deadline_ms() -> u64 {
    10_000
}

pub fn default_narrative_timeout_sec() -> u64 {
    30
}

pub fn default_claude_binary() -> PathBuf {
    // Check common install location first
    if let Some(home) = std::env::var_os("HOME") {
        let local_path = PathBuf::from(home).join(".claude/local/claude");
        if local_path.exists() {
            return local_path;
        }
    }
    PathBuf::from("claude")
}

pub fn default_claude_model() -> String {
    "sonnet".to_string()
}

pub fn default_codex_binary() -> PathBuf {
    PathBuf::from("codex")
}

pub fn default_codex_model() -> String {
    "gpt-4.1".to_string()
}

pub fn default_max_attempts() -> u32 {
    2
}

pub fn default_backoff_base_ms() -> u64 {
    500
}

pub fn default_true() -> bool {
    true
}

pub fn default_snapshot_dir() -> PathBuf {
    PathBuf::from(".loadbalance/snapshots")
}

// Role baselines. These stand in for labor no signal measures, so they are
// calibration parameters rather than derived values.

pub fn default_parent_emotional() -> f64 {
    10.0
}

pub fn default_parent_cognitive() -> f64 {
    8.0
}

pub fn default_parent_anticipatory() -> f64 {
    6.0
}

pub fn default_child_emotional() -> f64 {
    2.0
}

pub fn default_child_emotional_min_age() -> u32 {
    10
}

pub fn default_high_capacity_tasks() -> Vec<String> {
    vec![
        "Weekly meal planning".to_string(),
        "Grocery shopping".to_string(),
        "Kids' activity coordination".to_string(),
    ]
}

pub fn default_medium_capacity_tasks() -> Vec<String> {
    vec![
        "Bedtime routine 2x/week".to_string(),
        "Weekend breakfast duty".to_string(),
        "Homework help".to_string(),
    ]
}

pub fn default_low_capacity_tasks() -> Vec<String> {
    vec![
        "Small daily tasks".to_string(),
        "Specific errand runs".to_string(),
    ]
}

pub fn default_skill_bands() -> Vec<SkillBand> {
    fn band(min_age: u32, skills: [&str; 3]) -> SkillBand {
        SkillBand {
            min_age,
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    vec![
        band(6, ["Pack own backpack", "Simple breakfast prep", "Feed pets"]),
        band(8, ["Pack lunch", "Load dishwasher", "Sort laundry"]),
        band(
            10,
            [
                "Prepare simple meals",
                "Manage own schedule",
                "Help with groceries",
            ],
        ),
        band(
            12,
            [
                "Do own laundry",
                "Babysit siblings briefly",
                "Cook one family meal/week",
            ],
        ),
    ]
}

pub fn default_skill_timeline() -> String {
    "2-4 weeks to establish".to_string()
}

pub fn default_systemic_changes() -> Vec<SystemicChangeEntry> {
    vec![
        SystemicChangeEntry {
            change: "Implement family command center".to_string(),
            impact: "Reduces invisible load by 30%".to_string(),
            how_to: "Central calendar, task board, meal plan visible to all".to_string(),
        },
        SystemicChangeEntry {
            change: "Rotate mental load responsibilities".to_string(),
            impact: "Distributes cognitive burden evenly".to_string(),
            how_to: "Each parent owns specific domains completely".to_string(),
        },
    ]
}
