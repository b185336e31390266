//! Search for concrete ways to move, expose, or absorb load

use crate::config::Catalogs;
use crate::model::{Dimension, LoadMap, LoadVector, Role};
use serde::{Deserialize, Serialize};

use super::imbalance::ImbalanceReport;

/// Hard cap on shifts emitted across all candidates
pub const MAX_IMMEDIATE_SHIFTS: usize = 3;

/// Visible contributions below this size are small enough to hand off
const TRANSFERABLE_MAGNITUDE: f64 = 5.0;

const INVISIBLE_VISIBILITY_THRESHOLD: f64 = 10.0;
const CAPACITY_MATCH_THRESHOLD: u32 = 50;
const HIGH_CAPACITY_THRESHOLD: u32 = 70;
const MIN_SKILL_AGE: u32 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Readiness::Low => write!(f, "low"),
            Readiness::Moderate => write!(f, "moderate"),
            Readiness::High => write!(f, "high"),
        }
    }
}

/// Hand a small visible task from the primary carrier to someone with room
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImmediateShift {
    pub task_label: String,
    pub from_id: String,
    pub from_name: String,
    pub to_id: String,
    pub to_name: String,
    pub impact: String,
    pub difficulty: Difficulty,
    pub how_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InvisibleToVisible {
    pub member_id: String,
    pub activity: String,
    pub description: String,
    pub impact: String,
    pub how_to: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CapacityMatch {
    pub member_id: String,
    pub name: String,
    pub available_capacity_pct: u32,
    pub suggested_tasks: Vec<String>,
    pub readiness: Readiness,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SkillDevelopment {
    pub member_id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub timeline_estimate: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SystemicChange {
    pub description: String,
    pub impact: String,
    pub how_to: String,
}

/// A single recommendation of any kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Opportunity<'a> {
    ImmediateShift(&'a ImmediateShift),
    InvisibleToVisible(&'a InvisibleToVisible),
    CapacityMatch(&'a CapacityMatch),
    SkillDevelopment(&'a SkillDevelopment),
    SystemicChange(&'a SystemicChange),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Opportunities {
    pub immediate_shifts: Vec<ImmediateShift>,
    pub invisible_to_visible: Vec<InvisibleToVisible>,
    pub capacity_matches: Vec<CapacityMatch>,
    pub skill_development: Vec<SkillDevelopment>,
    pub systemic_changes: Vec<SystemicChange>,
}

impl Opportunities {
    /// Every opportunity, grouped by kind in the order they are presented
    pub fn all(&self) -> Vec<Opportunity<'_>> {
        self.immediate_shifts
            .iter()
            .map(Opportunity::ImmediateShift)
            .chain(
                self.invisible_to_visible
                    .iter()
                    .map(Opportunity::InvisibleToVisible),
            )
            .chain(self.capacity_matches.iter().map(Opportunity::CapacityMatch))
            .chain(
                self.skill_development
                    .iter()
                    .map(Opportunity::SkillDevelopment),
            )
            .chain(self.systemic_changes.iter().map(Opportunity::SystemicChange))
            .collect()
    }
}

pub struct OpportunityFinder<'a> {
    catalogs: &'a Catalogs,
}

impl<'a> OpportunityFinder<'a> {
    pub fn new(catalogs: &'a Catalogs) -> Self {
        Self { catalogs }
    }

    pub fn find(&self, load: &LoadMap, imbalances: &ImbalanceReport) -> Opportunities {
        Opportunities {
            immediate_shifts: immediate_shifts(load, imbalances),
            invisible_to_visible: invisible_to_visible(load),
            capacity_matches: load
                .iter()
                .filter(|m| m.capacity_remaining.percentage > CAPACITY_MATCH_THRESHOLD)
                .map(|m| self.capacity_match(m))
                .collect(),
            skill_development: load
                .iter()
                .filter_map(|m| self.skill_development(m))
                .collect(),
            systemic_changes: self
                .catalogs
                .systemic_changes
                .iter()
                .map(|entry| SystemicChange {
                    description: entry.change.clone(),
                    impact: entry.impact.clone(),
                    how_to: entry.how_to.clone(),
                })
                .collect(),
        }
    }

    fn capacity_match(&self, member: &LoadVector) -> CapacityMatch {
        let pct = member.capacity_remaining.percentage;
        let tiers = &self.catalogs.capacity_tiers;
        let suggested_tasks = if pct > HIGH_CAPACITY_THRESHOLD {
            tiers.high.clone()
        } else if pct > CAPACITY_MATCH_THRESHOLD {
            tiers.medium.clone()
        } else {
            tiers.low.clone()
        };

        CapacityMatch {
            member_id: member.member_id.clone(),
            name: member.name.clone(),
            available_capacity_pct: pct,
            suggested_tasks,
            readiness: readiness(member),
        }
    }

    fn skill_development(&self, member: &LoadVector) -> Option<SkillDevelopment> {
        if member.role != Role::Child {
            return None;
        }
        let age = member.age.filter(|age| *age >= MIN_SKILL_AGE)?;

        let skills: Vec<String> = self
            .catalogs
            .skill_bands
            .iter()
            .filter(|band| age >= band.min_age)
            .flat_map(|band| band.skills.iter().cloned())
            .collect();

        Some(SkillDevelopment {
            member_id: member.member_id.clone(),
            name: member.name.clone(),
            skills,
            timeline_estimate: self.catalogs.skill_timeline.clone(),
        })
    }
}

fn immediate_shifts(load: &LoadMap, imbalances: &ImbalanceReport) -> Vec<ImmediateShift> {
    let mut shifts = Vec::new();

    let Some(carrier) = imbalances
        .primary_carrier_id
        .as_deref()
        .and_then(|id| load.get(id))
    else {
        return shifts;
    };

    'candidates: for candidate in &imbalances.underutilized {
        let Some(recipient) = load.get(&candidate.member_id) else {
            continue;
        };

        for detail in &carrier.details {
            if detail.dimension != Dimension::Visible || detail.magnitude >= TRANSFERABLE_MAGNITUDE
            {
                continue;
            }

            shifts.push(ImmediateShift {
                task_label: detail.label.clone(),
                from_id: carrier.member_id.clone(),
                from_name: carrier.name.clone(),
                to_id: recipient.member_id.clone(),
                to_name: recipient.name.clone(),
                impact: format!(
                    "Reduces {}'s load by {}%",
                    carrier.name,
                    (detail.magnitude * 10.0).round()
                ),
                difficulty: Difficulty::Easy,
                how_to: transfer_instructions(&recipient.name),
            });

            if shifts.len() >= MAX_IMMEDIATE_SHIFTS {
                break 'candidates;
            }
        }
    }

    shifts
}

fn transfer_instructions(recipient: &str) -> Vec<String> {
    vec![
        format!("Explain the task to {}", recipient),
        "Show them how it's done once".to_string(),
        "Provide any necessary access/tools".to_string(),
        "Set a reminder for them".to_string(),
        "Check in after first completion".to_string(),
    ]
}

fn invisible_to_visible(load: &LoadMap) -> Vec<InvisibleToVisible> {
    load.iter()
        .filter(|m| m.invisible() > INVISIBLE_VISIBILITY_THRESHOLD)
        .map(|m| InvisibleToVisible {
            member_id: m.member_id.clone(),
            activity: "Weekly planning session".to_string(),
            description: format!("Make {}'s planning work visible", m.name),
            impact: "Recognizes and shares mental load".to_string(),
            how_to: format!(
                "Schedule 30 minutes Sunday for {} to plan week with family",
                m.name
            ),
        })
        .collect()
}

fn readiness(member: &LoadVector) -> Readiness {
    if member.role == Role::Child && member.age.is_some_and(|age| age < 8) {
        Readiness::Low
    } else if member.capacity_remaining.percentage > 60 {
        Readiness::High
    } else {
        Readiness::Moderate
    }
}
