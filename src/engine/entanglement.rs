//! Shared-awareness level and the mechanisms proposed to raise it

use crate::model::LoadMap;
use serde::{Deserialize, Serialize};

const NONE_THRESHOLD: f64 = 10.0;
const WEAK_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntanglementLevel {
    None,
    Weak,
    Moderate,
    Strong,
    Quantum,
}

impl EntanglementLevel {
    /// How synchronized members' information is at this level
    pub fn sync(self) -> f64 {
        match self {
            EntanglementLevel::None => 0.0,
            EntanglementLevel::Weak => 0.3,
            EntanglementLevel::Moderate => 0.6,
            EntanglementLevel::Strong => 0.8,
            EntanglementLevel::Quantum => 1.0,
        }
    }

    /// How aware members are of each other's load at this level
    pub fn awareness(self) -> f64 {
        match self {
            EntanglementLevel::None => 0.0,
            EntanglementLevel::Weak => 0.2,
            EntanglementLevel::Moderate => 0.5,
            EntanglementLevel::Strong => 0.7,
            EntanglementLevel::Quantum => 1.0,
        }
    }
}

impl std::fmt::Display for EntanglementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntanglementLevel::None => write!(f, "none"),
            EntanglementLevel::Weak => write!(f, "weak"),
            EntanglementLevel::Moderate => write!(f, "moderate"),
            EntanglementLevel::Strong => write!(f, "strong"),
            EntanglementLevel::Quantum => write!(f, "quantum"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SyncStep {
    pub step: String,
    pub description: String,
    pub impact: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AwarenessActivity {
    pub activity: String,
    pub frequency: String,
    pub description: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SharedSystem {
    pub system: String,
    pub components: Vec<String>,
    pub location: Option<String>,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntanglementPlan {
    pub current_level: EntanglementLevel,
    pub target_level: EntanglementLevel,
    pub average_invisible: f64,
    pub sync_steps: Vec<SyncStep>,
    pub awareness_activities: Vec<AwarenessActivity>,
    pub shared_systems: Vec<SharedSystem>,
}

pub fn plan(load: &LoadMap) -> EntanglementPlan {
    let average_invisible = if load.is_empty() {
        0.0
    } else {
        load.iter().map(|m| m.invisible()).sum::<f64>() / load.len() as f64
    };

    EntanglementPlan {
        current_level: current_level(average_invisible),
        target_level: EntanglementLevel::Strong,
        average_invisible,
        sync_steps: sync_steps(),
        awareness_activities: awareness_activities(),
        shared_systems: shared_systems(),
    }
}

fn current_level(average_invisible: f64) -> EntanglementLevel {
    if average_invisible > NONE_THRESHOLD {
        EntanglementLevel::None
    } else if average_invisible > WEAK_THRESHOLD {
        EntanglementLevel::Weak
    } else {
        EntanglementLevel::Moderate
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn sync_steps() -> Vec<SyncStep> {
    vec![
        SyncStep {
            step: "Daily 5-minute sync".to_string(),
            description: "Morning check-in on day's mental load".to_string(),
            impact: "Creates shared awareness of the day".to_string(),
            details: strings(&[
                "What's on your mind today?",
                "What do you need help with?",
                "What can I take off your plate?",
            ]),
        },
        SyncStep {
            step: "Shared digital brain".to_string(),
            description: "Use shared apps for collective memory".to_string(),
            impact: "Reduces individual memory burden by 60%".to_string(),
            details: strings(&["Shared calendar", "Shared grocery list", "Task management app"]),
        },
        SyncStep {
            step: "Domain ownership".to_string(),
            description: "Each person fully owns specific areas".to_string(),
            impact: "Eliminates duplicate mental work".to_string(),
            details: strings(&[
                "One parent owns school communication",
                "Other owns medical/health",
                "Kids own their activity prep",
            ]),
        },
    ]
}

fn awareness_activities() -> Vec<AwarenessActivity> {
    vec![
        AwarenessActivity {
            activity: "Mental load audit".to_string(),
            frequency: "Weekly".to_string(),
            description: "Family discusses invisible work done this week".to_string(),
            outcome: "Everyone sees the full picture".to_string(),
        },
        AwarenessActivity {
            activity: "Load swapping day".to_string(),
            frequency: "Monthly".to_string(),
            description: "Family members swap responsibilities for a day".to_string(),
            outcome: "Builds empathy and understanding".to_string(),
        },
    ]
}

fn shared_systems() -> Vec<SharedSystem> {
    vec![
        SharedSystem {
            system: "Family command center".to_string(),
            components: strings(&["Visual calendar", "Task board", "Meal plan", "Important info"]),
            location: Some("Kitchen or high-traffic area".to_string()),
            impact: "Makes invisible visible for all".to_string(),
        },
        SharedSystem {
            system: "Digital family hub".to_string(),
            components: strings(&["Shared calendar app", "Shared notes", "Photo sharing"]),
            location: None,
            impact: "Synchronizes information across all members".to_string(),
        },
    ]
}
