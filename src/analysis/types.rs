use super::visualize::Visualizations;
use crate::engine::{
    EntanglementPlan, ImbalanceReport, Opportunities, Predictions, RebalancingPlan,
};
use crate::model::{Degradation, LoadMap, TimeWindow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;

/// The result of one analysis of a group over a time window
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Analysis {
    pub id: String,
    pub group_id: String,
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub current_load: LoadMap,
    pub imbalances: ImbalanceReport,
    pub opportunities: Opportunities,
    pub entanglement_plan: EntanglementPlan,
    pub rebalancing_plan: RebalancingPlan,
    pub predicted_outcomes: Predictions,
    pub insights: String,

    /// Narrator that produced `insights`
    pub narrative_source: String,

    pub visualization_descriptors: Visualizations,

    /// True when any source, record or narrator had to be skipped
    pub degraded: bool,

    #[serde(default)]
    pub degradations: Vec<Degradation>,

    /// Stable hash of the load vectors, for spotting unchanged snapshots
    pub fingerprint: String,
}

impl Analysis {
    pub fn primary_carrier_name(&self) -> Option<&str> {
        self.imbalances
            .primary_carrier_id
            .as_deref()
            .and_then(|id| self.current_load.get(id))
            .map(|m| m.name.as_str())
    }
}

/// Deterministic fingerprint of a load map
/// Uses: member_id | weighted total | each dimension, per member in roster order
pub fn fingerprint(load: &LoadMap) -> String {
    let input = load
        .iter()
        .map(|m| {
            let d = &m.dimensions;
            format!(
                "{}|{:.4}|{:.4}|{:.4}|{:.4}|{:.4}|{:.4}|{:.4}",
                m.member_id,
                m.total,
                d.visible,
                d.invisible,
                d.emotional,
                d.cognitive,
                d.anticipatory,
                d.administrative,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)[..16].to_string()
}

/// An analysis plus its pending snapshot write, if one was started
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub analysis: Analysis,
    pub snapshot: Option<JoinHandle<()>>,
}

impl AnalysisOutcome {
    /// Wait for the snapshot write. Short-lived callers use this before exit.
    pub async fn finish(self) -> Analysis {
        if let Some(handle) = self.snapshot {
            if let Err(e) = handle.await {
                tracing::warn!("Snapshot task did not complete: {}", e);
            }
        }
        self.analysis
    }
}
