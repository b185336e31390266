use super::types::{fingerprint, Analysis, AnalysisOutcome};
use super::visualize;
use crate::config::Config;
use crate::engine::{entanglement, imbalance, outcome, plan, LoadCalculator, OpportunityFinder};
use crate::error::{NarrativeError, RosterError};
use crate::model::{Degradation, TimeWindow};
use crate::narrative::{create_provider, NarrativeContext, NarrativeProvider, TemplateNarrator};
use crate::store::{ActivityStore, RosterDirectory, SnapshotStore};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runs every stage for one group and absorbs recoverable failures
pub struct AnalysisOrchestrator {
    config: Config,
    calculator: LoadCalculator,
    narrator: Arc<dyn NarrativeProvider>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
}

impl AnalysisOrchestrator {
    pub fn new(
        config: Config,
        roster: Arc<dyn RosterDirectory>,
        activity: Arc<dyn ActivityStore>,
    ) -> Self {
        let calculator = LoadCalculator::new(roster, activity, config.calibration.clone());
        let narrator = create_provider(&config);
        Self {
            config,
            calculator,
            narrator,
            snapshots: None,
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeProvider>) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(store);
        self
    }

    /// Analyze a group. Only a missing or malformed roster is returned as an error.
    pub async fn run(
        &self,
        group_id: &str,
        window: TimeWindow,
    ) -> Result<AnalysisOutcome, RosterError> {
        let start = std::time::Instant::now();
        let deadline = Instant::now() + self.config.deadline();

        let computation = self.calculator.compute(group_id, window, deadline).await?;
        let load = computation.load;
        let mut degradations = computation.degradations;

        let imbalances = imbalance::analyze(&load);
        let opportunities = OpportunityFinder::new(&self.config.catalogs).find(&load, &imbalances);
        let entanglement_plan = entanglement::plan(&load);
        let rebalancing_plan =
            plan::compose(&load, &imbalances, &opportunities, &entanglement_plan);
        let predicted_outcomes = outcome::predict(&load, &rebalancing_plan);

        info!(
            "Group {}: {} imbalance, {} immediate actions",
            group_id,
            imbalances.severity,
            rebalancing_plan.immediate_actions.len()
        );

        let context = NarrativeContext::new(
            group_id,
            &load,
            &imbalances,
            &rebalancing_plan,
            &predicted_outcomes,
        );
        let (insights, narrative_source) = self.narrate(&context, &mut degradations).await;

        let visualization_descriptors =
            visualize::describe(&load, &rebalancing_plan, &predicted_outcomes);

        let analysis = Analysis {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            window,
            generated_at: Utc::now(),
            fingerprint: fingerprint(&load),
            current_load: load,
            imbalances,
            opportunities,
            entanglement_plan,
            rebalancing_plan,
            predicted_outcomes,
            insights,
            narrative_source,
            visualization_descriptors,
            degraded: !degradations.is_empty(),
            degradations,
        };

        let snapshot = self.spawn_snapshot(&analysis);

        debug!("Analysis of {} finished in {:?}", group_id, start.elapsed());
        Ok(AnalysisOutcome { analysis, snapshot })
    }

    async fn narrate(
        &self,
        context: &NarrativeContext,
        degradations: &mut Vec<Degradation>,
    ) -> (String, String) {
        let limit = Duration::from_secs(self.config.narrative.timeout_sec);
        let name = self.narrator.name();

        let reason = match timeout(limit, self.narrator.summarize(context)).await {
            Ok(Ok(text)) => return (text, name.to_string()),
            Ok(Err(e)) => e.to_string(),
            Err(_) => NarrativeError::Timeout(limit).to_string(),
        };

        warn!("Narrator {} failed, using template: {}", name, reason);
        degradations.push(Degradation::Narrative { reason });
        (
            TemplateNarrator::render(context),
            TemplateNarrator.name().to_string(),
        )
    }

    fn spawn_snapshot(&self, analysis: &Analysis) -> Option<tokio::task::JoinHandle<()>> {
        let store = self.snapshots.clone()?;
        let analysis = analysis.clone();

        Some(tokio::spawn(async move {
            let group_id = analysis.group_id.clone();
            match store.save(&group_id, analysis.generated_at, &analysis).await {
                Ok(()) => debug!("Saved snapshot for {}", group_id),
                Err(e) => warn!("Failed to save snapshot for {}: {}", group_id, e),
            }
        }))
    }
}
