//! One complete analysis: every engine stage, narrative and chart hints

mod orchestrator;
mod types;
mod visualize;

pub use orchestrator::AnalysisOrchestrator;
pub use types::{fingerprint, Analysis, AnalysisOutcome};
pub use visualize::{Chart, ChartKind, Visualizations};
