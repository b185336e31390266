//! Heuristic forecasts of how the plan changes the group over time

use crate::model::{LoadMap, Role};
use serde::{Deserialize, Serialize};

use super::plan::RebalancingPlan;

const STRESS_PER_ACTION: usize = 5;
const MAX_COUNTED_ACTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Effect {
    pub metric: String,
    pub change: String,
    pub confidence: f64,
}

impl Effect {
    fn new(metric: impl Into<String>, change: impl Into<String>, confidence: f64) -> Self {
        Self {
            metric: metric.into(),
            change: change.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Horizon {
    pub timeframe: String,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Predictions {
    pub immediate: Horizon,
    pub week1: Horizon,
    pub month1: Horizon,
    pub month3: Horizon,
}

impl Predictions {
    pub fn horizons(&self) -> [&Horizon; 4] {
        [&self.immediate, &self.week1, &self.month1, &self.month3]
    }
}

pub fn predict(load: &LoadMap, plan: &RebalancingPlan) -> Predictions {
    let carrier = plan.focus.as_deref().unwrap_or("Primary carrier");
    let supported = if load.iter().filter(|m| m.role == Role::Parent).count() >= 2 {
        "Both parents report"
    } else {
        "Everyone reports"
    };

    let counted = plan.immediate_actions.len().min(MAX_COUNTED_ACTIONS);
    let stress_drop = counted * STRESS_PER_ACTION;

    Predictions {
        immediate: Horizon {
            timeframe: "24 hours".to_string(),
            effects: vec![
                Effect::new("Primary carrier stress", format!("-{}%", stress_drop), 0.9),
                Effect::new("Family awareness", "+20%", 0.85),
            ],
        },
        week1: Horizon {
            timeframe: "1 week".to_string(),
            effects: vec![
                Effect::new(format!("{}'s mental load", carrier), "-20%", 0.8),
                Effect::new("Family coordination", "+30%", 0.75),
                Effect::new("Morning stress", "-25%", 0.7),
            ],
        },
        month1: Horizon {
            timeframe: "1 month".to_string(),
            effects: vec![
                Effect::new("Load balance", "40% more even distribution", 0.75),
                Effect::new("Family satisfaction", "+35%", 0.7),
                Effect::new("Conflicts", "-40%", 0.65),
                Effect::new("Invisible labor", "60% more visible", 0.8),
            ],
        },
        month3: Horizon {
            timeframe: "3 months".to_string(),
            effects: vec![
                Effect::new("New equilibrium", "Established and stable", 0.8),
                Effect::new("Burnout risk", "-70%", 0.75),
                Effect::new("Family connection", "+45%", 0.7),
                Effect::new(supported, "Feeling seen and supported", 0.85),
            ],
        },
    }
}
