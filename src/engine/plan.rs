//! Phased rebalancing plan composed from the earlier stages

use crate::model::LoadMap;
use serde::{Deserialize, Serialize};

use super::entanglement::EntanglementPlan;
use super::imbalance::ImbalanceReport;
use super::opportunity::{ImmediateShift, Opportunities};

const MAX_IMMEDIATE_ACTIONS: usize = 3;
const MONTHLY_TIMELINE: &str = "4 weeks to fully establish";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WeeklyAdjustment {
    pub action: String,
    pub description: String,
    pub impact: String,
    pub schedule: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonthlyChange {
    pub change: String,
    pub impact: String,
    pub implementation: String,
    pub timeline: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScheduledSyncStep {
    pub step: String,
    pub description: String,
    pub priority: Priority,
    pub start: String,
}

/// Four consecutive weekly milestone lists
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Rollout {
    pub period1: Vec<String>,
    pub period2: Vec<String>,
    pub period3: Vec<String>,
    pub period4: Vec<String>,
}

impl Rollout {
    pub fn periods(&self) -> [&[String]; 4] {
        [
            self.period1.as_slice(),
            self.period2.as_slice(),
            self.period3.as_slice(),
            self.period4.as_slice(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RebalancingPlan {
    /// Name of the member the plan is relieving, if anyone
    pub focus: Option<String>,
    pub immediate_actions: Vec<ImmediateShift>,
    pub weekly_adjustments: Vec<WeeklyAdjustment>,
    pub monthly_systemic: Vec<MonthlyChange>,
    pub sync_steps: Vec<ScheduledSyncStep>,
    pub rollout: Rollout,
}

pub fn compose(
    load: &LoadMap,
    imbalances: &ImbalanceReport,
    opportunities: &Opportunities,
    entanglement: &EntanglementPlan,
) -> RebalancingPlan {
    let focus = imbalances
        .primary_carrier_id
        .as_deref()
        .and_then(|id| load.get(id))
        .map(|m| m.name.clone());

    let mut weekly_adjustments = Vec::new();
    if let Some(step) = entanglement.sync_steps.first() {
        weekly_adjustments.push(WeeklyAdjustment {
            action: "Implement daily sync meeting".to_string(),
            description: step.description.clone(),
            impact: "Reduces surprises and conflicts by 40%".to_string(),
            schedule: "Every morning at breakfast".to_string(),
        });
    }
    if let Some(item) = opportunities.invisible_to_visible.first() {
        weekly_adjustments.push(WeeklyAdjustment {
            action: "Make planning visible".to_string(),
            description: item.description.clone(),
            impact: "Validates invisible labor".to_string(),
            schedule: "Sunday family planning time".to_string(),
        });
    }

    RebalancingPlan {
        focus,
        immediate_actions: opportunities
            .immediate_shifts
            .iter()
            .take(MAX_IMMEDIATE_ACTIONS)
            .cloned()
            .collect(),
        weekly_adjustments,
        monthly_systemic: opportunities
            .systemic_changes
            .iter()
            .map(|change| MonthlyChange {
                change: change.description.clone(),
                impact: change.impact.clone(),
                implementation: change.how_to.clone(),
                timeline: MONTHLY_TIMELINE.to_string(),
            })
            .collect(),
        sync_steps: entanglement
            .sync_steps
            .iter()
            .map(|step| ScheduledSyncStep {
                step: step.step.clone(),
                description: step.description.clone(),
                priority: Priority::High,
                start: "This week".to_string(),
            })
            .collect(),
        rollout: rollout(),
    }
}

fn rollout() -> Rollout {
    fn milestones(items: [&str; 3]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    Rollout {
        period1: milestones([
            "Start daily 5-minute sync meetings",
            "Transfer first 3 tasks to balance load",
            "Set up shared digital calendar",
        ]),
        period2: milestones([
            "Create family command center",
            "Implement domain ownership for one area",
            "Practice making invisible work visible",
        ]),
        period3: milestones([
            "Expand domain ownership",
            "Start weekly mental load audit",
            "Refine daily sync process",
        ]),
        period4: milestones([
            "Full system implementation",
            "First monthly load swap day",
            "Celebrate progress and adjust",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Catalogs;
    use crate::engine::{entanglement, imbalance, OpportunityFinder};
    use crate::model::{Dimension, LoadVector, Member, Role, SourceType};

    fn scenario() -> LoadMap {
        let mut carrier = LoadVector::for_member(&Member::new("a", "Alex", Role::Parent));
        for idx in 0..5 {
            carrier.contribute(
                SourceType::Task,
                &format!("Chore {}", idx),
                Dimension::Visible,
                1.0,
            );
        }
        carrier.contribute(SourceType::Event, "Planning", Dimension::Invisible, 30.0);
        carrier.contribute(SourceType::Baseline, "Emotional", Dimension::Emotional, 60.0);
        let helper = LoadVector::for_member(&Member::new("b", "Blair", Role::Parent));

        let mut map: LoadMap = vec![carrier, helper].into_iter().collect();
        map.finalize();
        map
    }

    fn compose_for(load: &LoadMap) -> RebalancingPlan {
        let report = imbalance::analyze(load);
        let found = OpportunityFinder::new(&Catalogs::default()).find(load, &report);
        compose(load, &report, &found, &entanglement::plan(load))
    }

    #[test]
    fn test_plan_sections() {
        let load = scenario();
        let plan = compose_for(&load);

        assert_eq!(plan.focus.as_deref(), Some("Alex"));
        assert_eq!(plan.immediate_actions.len(), 3);
        assert_eq!(plan.weekly_adjustments.len(), 2);
        assert_eq!(
            plan.weekly_adjustments[1].description,
            "Make Alex's planning work visible"
        );
        assert_eq!(plan.monthly_systemic.len(), 2);
        assert!(plan
            .monthly_systemic
            .iter()
            .all(|m| m.timeline == MONTHLY_TIMELINE));
        assert_eq!(plan.sync_steps.len(), 3);
        assert!(plan
            .sync_steps
            .iter()
            .all(|s| s.priority == Priority::High && s.start == "This week"));
    }

    #[test]
    fn test_quiet_group_has_only_fixed_sections() {
        let mut load: LoadMap = vec![
            LoadVector::for_member(&Member::new("a", "A", Role::Child)),
            LoadVector::for_member(&Member::new("b", "B", Role::Child)),
        ]
        .into_iter()
        .collect();
        load.finalize();
        let plan = compose_for(&load);

        assert!(plan.focus.is_none());
        assert!(plan.immediate_actions.is_empty());
        assert_eq!(plan.weekly_adjustments.len(), 1);
        assert_eq!(plan.rollout.periods().len(), 4);
        assert!(plan.rollout.periods().iter().all(|p| p.len() == 3));
    }
}
