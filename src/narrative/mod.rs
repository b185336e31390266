//! Human-readable explanation of a finished plan
//!
//! Narrators are best-effort. The orchestrator bounds every call and falls
//! back to [`TemplateNarrator`] when a narrator fails or runs out of time.

mod claude;
mod codex;
mod retry;
mod template;

pub use claude::ClaudeNarrator;
pub use codex::CodexNarrator;
pub use template::TemplateNarrator;

use crate::config::{Config, NarrativeKind};
use crate::engine::{ImbalanceReport, Predictions, RebalancingPlan, Severity};
use crate::error::NarrativeError;
use crate::model::LoadMap;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::process::Command;

/// One member's share of the load, as shown to a narrator
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShare {
    pub name: String,
    pub total: f64,
    pub percentage_of_family: u32,
}

/// Everything a narrator may talk about
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeContext {
    pub group_id: String,
    pub members: Vec<MemberShare>,
    pub primary_carrier: Option<MemberShare>,
    pub severity: Severity,
    pub top_action: Option<String>,
    pub immediate_count: usize,
    pub weekly_count: usize,
    pub systemic_count: usize,
    pub month1_effects: Vec<(String, String)>,
}

impl NarrativeContext {
    pub fn new(
        group_id: &str,
        load: &LoadMap,
        imbalances: &ImbalanceReport,
        plan: &RebalancingPlan,
        predictions: &Predictions,
    ) -> Self {
        let share = |id: &str| {
            load.get(id).map(|m| MemberShare {
                name: m.name.clone(),
                total: m.total,
                percentage_of_family: m.percentage_of_family,
            })
        };

        let top_action = plan
            .immediate_actions
            .first()
            .map(|shift| {
                format!(
                    "hand \"{}\" from {} to {}",
                    shift.task_label, shift.from_name, shift.to_name
                )
            })
            .or_else(|| {
                plan.weekly_adjustments
                    .first()
                    .map(|w| w.action.to_lowercase())
            })
            .or_else(|| plan.monthly_systemic.first().map(|m| m.change.to_lowercase()));

        Self {
            group_id: group_id.to_string(),
            members: load
                .iter()
                .filter_map(|m| share(&m.member_id))
                .collect(),
            primary_carrier: imbalances.primary_carrier_id.as_deref().and_then(share),
            severity: imbalances.severity,
            top_action,
            immediate_count: plan.immediate_actions.len(),
            weekly_count: plan.weekly_adjustments.len(),
            systemic_count: plan.monthly_systemic.len(),
            month1_effects: predictions
                .month1
                .effects
                .iter()
                .map(|e| (e.metric.clone(), e.change.clone()))
                .collect(),
        }
    }

    /// Prompt for text-generating narrators
    pub fn prompt(&self) -> String {
        let situation = self
            .members
            .iter()
            .map(|m| {
                format!(
                    "- {}: {:.1} units ({}% of group load)",
                    m.name, m.total, m.percentage_of_family
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let outcomes = self
            .month1_effects
            .iter()
            .map(|(metric, change)| format!("- {}: {}", metric, change))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an expert in household dynamics and mental load distribution.\n\
             Analyze this rebalancing plan for group {group}.\n\n\
             ## Current situation ({severity} imbalance)\n{situation}\n\n\
             ## Rebalancing plan\n\
             - Immediate: {immediate} task transfers\n\
             - Weekly: {weekly} adjustments\n\
             - Systemic: {systemic} changes\n\n\
             ## Predicted outcome (30 days)\n{outcomes}\n\n\
             Provide 3 key insights:\n\
             1. The most impactful change for this group\n\
             2. Potential resistance points and how to overcome them\n\
             3. The hidden benefit that will surprise them most\n\n\
             Be specific, warm, and encouraging. Reply with plain text only.",
            group = self.group_id,
            severity = self.severity,
            situation = situation,
            immediate = self.immediate_count,
            weekly = self.weekly_count,
            systemic = self.systemic_count,
            outcomes = outcomes,
        )
    }
}

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn summarize(&self, context: &NarrativeContext) -> Result<String, NarrativeError>;
}

/// Create the narrator selected by configuration
pub fn create_provider(config: &Config) -> Arc<dyn NarrativeProvider> {
    let narrative = &config.narrative;
    match narrative.provider {
        NarrativeKind::Template => Arc::new(TemplateNarrator),
        NarrativeKind::ClaudeCli => Arc::new(ClaudeNarrator {
            binary: narrative.claude_cli.binary.clone(),
            model: narrative.claude_cli.model.clone(),
            retry: narrative.retry.clone(),
        }),
        NarrativeKind::CodexCli => Arc::new(CodexNarrator {
            binary: narrative.codex_cli.binary.clone(),
            model: narrative.codex_cli.model.clone(),
            retry: narrative.retry.clone(),
        }),
    }
}

/// Build a command, resolving bare names through PATH
fn command_for(binary: &Path) -> Command {
    let binary_str = binary.to_string_lossy();
    let mut cmd = if binary_str.contains('/') || binary_str.contains('\\') {
        Command::new(binary)
    } else {
        Command::new(binary_str.as_ref())
    };
    // A caller that gives up on the narrative must not leave the process behind
    cmd.kill_on_drop(true);
    cmd
}

fn non_empty(text: String) -> Result<String, NarrativeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(NarrativeError::Empty)
    } else {
        Ok(trimmed.to_string())
    }
}
