//! Data-only chart hints for a presentation layer

use crate::engine::{Predictions, RebalancingPlan};
use crate::model::{DimensionValues, LoadMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Pie,
    StackedBar,
    Sankey,
    Line,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Slice {
    pub name: String,
    pub value: f64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DimensionBar {
    pub name: String,
    #[serde(flatten)]
    pub values: DimensionValues,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Flow {
    pub from: String,
    pub to: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectionPoint {
    pub timeframe: String,
    pub metric: String,
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chart<T> {
    pub kind: ChartKind,
    pub description: String,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Visualizations {
    pub current_distribution: Chart<Slice>,
    pub load_by_dimension: Chart<DimensionBar>,
    pub rebalancing_flow: Chart<Flow>,
    pub timeline_projection: Chart<ProjectionPoint>,
}

pub fn describe(load: &LoadMap, plan: &RebalancingPlan, predictions: &Predictions) -> Visualizations {
    Visualizations {
        current_distribution: Chart {
            kind: ChartKind::Pie,
            description: "Current load by member".to_string(),
            data: load
                .iter()
                .map(|m| Slice {
                    name: m.name.clone(),
                    value: m.total,
                    percentage: m.percentage_of_family,
                })
                .collect(),
        },
        load_by_dimension: Chart {
            kind: ChartKind::StackedBar,
            description: "Load by dimension for each member".to_string(),
            data: load
                .iter()
                .map(|m| DimensionBar {
                    name: m.name.clone(),
                    values: m.dimensions,
                })
                .collect(),
        },
        rebalancing_flow: Chart {
            kind: ChartKind::Sankey,
            description: "Task flow from overloaded to underutilized members".to_string(),
            data: plan
                .immediate_actions
                .iter()
                .map(|shift| Flow {
                    from: shift.from_name.clone(),
                    to: shift.to_name.clone(),
                    label: shift.task_label.clone(),
                })
                .collect(),
        },
        timeline_projection: Chart {
            kind: ChartKind::Line,
            description: "Predicted load changes over 90 days".to_string(),
            data: predictions
                .horizons()
                .iter()
                .filter_map(|h| {
                    h.effects.first().map(|e| ProjectionPoint {
                        timeframe: h.timeframe.clone(),
                        metric: e.metric.clone(),
                        change: e.change.clone(),
                    })
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Catalogs;
    use crate::engine::{entanglement, imbalance, outcome, plan, OpportunityFinder};
    use crate::model::{Dimension, LoadVector, Member, Role, SourceType};

    #[test]
    fn test_descriptors_follow_load_and_plan() {
        let mut carrier = LoadVector::for_member(&Member::new("a", "Avery", Role::Parent));
        carrier.contribute(SourceType::Task, "Lunches", Dimension::Visible, 3.0);
        carrier.contribute(SourceType::Baseline, "Emotional", Dimension::Emotional, 50.0);
        let helper = LoadVector::for_member(&Member::new("b", "Blake", Role::Parent));
        let mut load: LoadMap = vec![carrier, helper].into_iter().collect();
        load.finalize();

        let report = imbalance::analyze(&load);
        let found = OpportunityFinder::new(&Catalogs::default()).find(&load, &report);
        let plan = plan::compose(&load, &report, &found, &entanglement::plan(&load));
        let predictions = outcome::predict(&load, &plan);
        let charts = describe(&load, &plan, &predictions);

        assert_eq!(charts.current_distribution.data.len(), 2);
        assert_eq!(charts.current_distribution.data[0].percentage, 100);
        assert_eq!(charts.load_by_dimension.data[0].values.emotional, 50.0);
        assert_eq!(
            charts.rebalancing_flow.data,
            vec![Flow {
                from: "Avery".to_string(),
                to: "Blake".to_string(),
                label: "Lunches".to_string(),
            }]
        );
        assert_eq!(charts.timeline_projection.data.len(), 4);

        let json = serde_json::to_value(&charts).unwrap();
        assert_eq!(json["load_by_dimension"]["kind"], "stacked-bar");
        assert_eq!(json["load_by_dimension"]["data"][0]["visible"], 3.0);
    }
}
