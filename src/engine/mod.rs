//! Load computation and the analysis stages built on top of it

pub mod calculator;
pub mod entanglement;
pub mod imbalance;
pub mod opportunity;
pub mod outcome;
pub mod plan;

pub use calculator::{build_load_map, LoadCalculator, LoadComputation, Signals};
pub use entanglement::{EntanglementLevel, EntanglementPlan};
pub use imbalance::{ImbalanceReport, Severity, Underutilized};
pub use opportunity::{
    CapacityMatch, ImmediateShift, InvisibleToVisible, Opportunities, Opportunity,
    OpportunityFinder, SkillDevelopment, SystemicChange,
};
pub use outcome::Predictions;
pub use plan::RebalancingPlan;
