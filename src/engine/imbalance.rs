use crate::model::{LoadMap, Role};
use serde::{Deserialize, Serialize};

const SEVERE_SPREAD: f64 = 100.0;
const MODERATE_SPREAD: f64 = 50.0;
const CARRIER_BURNOUT_LOAD: f64 = 150.0;
const EMOTIONAL_OVERLOAD: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Mild,
    Moderate,
    Severe,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Mild => write!(f, "mild"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// A member with spare capacity relative to the group
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Underutilized {
    pub member_id: String,
    pub name: String,
    pub available_capacity_pct: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ImbalanceReport {
    pub severity: Severity,

    /// Member with the highest total; absent when nobody carries any load
    pub primary_carrier_id: Option<String>,

    pub underutilized: Vec<Underutilized>,

    pub critical_areas: Vec<String>,

    pub average_load: f64,

    /// Spread between the most and least loaded parents
    pub parent_spread: f64,
}

pub fn analyze(load: &LoadMap) -> ImbalanceReport {
    let mut report = ImbalanceReport::default();
    if load.is_empty() {
        return report;
    }

    // Strict comparison keeps the first member in roster order on ties
    let mut max_load = 0.0;
    for member in load {
        if member.total > max_load {
            max_load = member.total;
            report.primary_carrier_id = Some(member.member_id.clone());
        }
    }

    report.average_load = load.family_total() / load.len() as f64;
    report.parent_spread = parent_spread(load);
    report.severity = if report.parent_spread > SEVERE_SPREAD {
        Severity::Severe
    } else if report.parent_spread > MODERATE_SPREAD {
        Severity::Moderate
    } else {
        Severity::Mild
    };

    report.underutilized = load
        .iter()
        .filter(|m| {
            m.total < report.average_load * 0.5 && m.capacity_remaining.percentage > 60
        })
        .map(|m| Underutilized {
            member_id: m.member_id.clone(),
            name: m.name.clone(),
            available_capacity_pct: m.capacity_remaining.percentage,
        })
        .collect();

    if max_load > CARRIER_BURNOUT_LOAD {
        report
            .critical_areas
            .push("burnout risk for primary carrier".to_string());
    }
    for member in load {
        if member.invisible() > member.visible() * 2.0 {
            report
                .critical_areas
                .push(format!("invisible labor burden for {}", member.name));
        }
        if member.emotional() > EMOTIONAL_OVERLOAD {
            report
                .critical_areas
                .push(format!("emotional labor overload for {}", member.name));
        }
    }

    report
}

fn parent_spread(load: &LoadMap) -> f64 {
    let parent_totals: Vec<f64> = load
        .iter()
        .filter(|m| m.role == Role::Parent)
        .map(|m| m.total)
        .collect();

    if parent_totals.len() < 2 {
        return 0.0;
    }

    let max = parent_totals.iter().cloned().fold(f64::MIN, f64::max);
    let min = parent_totals.iter().cloned().fold(f64::MAX, f64::min);
    max - min
}
