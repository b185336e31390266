use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Where `analyze` writes its markdown and JSON reports
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Overall budget for one analysis, in milliseconds
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    #[serde(default)]
    pub narrative: NarrativeConfig,

    #[serde(default)]
    pub snapshots: SnapshotConfig,

    #[serde(default)]
    pub calibration: Calibration,

    #[serde(default)]
    pub catalogs: Catalogs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    /// Deterministic text built from the plan
    #[default]
    Template,
    ClaudeCli,
    CodexCli,
}

impl std::fmt::Display for NarrativeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NarrativeKind::Template => write!(f, "template"),
            NarrativeKind::ClaudeCli => write!(f, "claude_cli"),
            NarrativeKind::CodexCli => write!(f, "codex_cli"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct NarrativeConfig {
    #[serde(default)]
    pub provider: NarrativeKind,

    #[serde(default = "default_narrative_timeout_sec")]
    pub timeout_sec: u64,

    #[serde(default)]
    pub claude_cli: ClaudeCliConfig,

    #[serde(default)]
    pub codex_cli: CodexCliConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            provider: NarrativeKind::default(),
            timeout_sec: default_narrative_timeout_sec(),
            claude_cli: ClaudeCliConfig::default(),
            codex_cli: CodexCliConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ClaudeCliConfig {
    #[serde(default = "default_claude_binary")]
    pub binary: PathBuf,

    #[serde(default = "default_claude_model")]
    pub model: String,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            binary: default_claude_binary(),
            model: default_claude_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CodexCliConfig {
    #[serde(default = "default_codex_binary")]
    pub binary: PathBuf,

    #[serde(default = "default_codex_model")]
    pub model: String,
}

impl Default for CodexCliConfig {
    fn default() -> Self {
        Self {
            binary: default_codex_binary(),
            model: default_codex_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SnapshotConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_snapshot_dir")]
    pub dir: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_snapshot_dir(),
        }
    }
}

/// Baseline load assigned by role, independent of observed signals
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Calibration {
    #[serde(default = "default_parent_emotional")]
    pub parent_emotional: f64,

    #[serde(default = "default_parent_cognitive")]
    pub parent_cognitive: f64,

    #[serde(default = "default_parent_anticipatory")]
    pub parent_anticipatory: f64,

    #[serde(default = "default_child_emotional")]
    pub child_emotional: f64,

    /// Children strictly older than this receive `child_emotional`
    #[serde(default = "default_child_emotional_min_age")]
    pub child_emotional_min_age: u32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            parent_emotional: default_parent_emotional(),
            parent_cognitive: default_parent_cognitive(),
            parent_anticipatory: default_parent_anticipatory(),
            child_emotional: default_child_emotional(),
            child_emotional_min_age: default_child_emotional_min_age(),
        }
    }
}

/// Recommendation catalogs consulted by the opportunity finder
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Catalogs {
    #[serde(default)]
    pub capacity_tiers: CapacityTiers,

    /// Cumulative age bands, sorted by `min_age`
    #[serde(default = "default_skill_bands")]
    pub skill_bands: Vec<SkillBand>,

    #[serde(default = "default_skill_timeline")]
    pub skill_timeline: String,

    #[serde(default = "default_systemic_changes")]
    pub systemic_changes: Vec<SystemicChangeEntry>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            capacity_tiers: CapacityTiers::default(),
            skill_bands: default_skill_bands(),
            skill_timeline: default_skill_timeline(),
            systemic_changes: default_systemic_changes(),
        }
    }
}

/// Tasks to suggest by remaining-capacity band (>70%, >50%, otherwise)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct CapacityTiers {
    #[serde(default = "default_high_capacity_tasks")]
    pub high: Vec<String>,

    #[serde(default = "default_medium_capacity_tasks")]
    pub medium: Vec<String>,

    #[serde(default = "default_low_capacity_tasks")]
    pub low: Vec<String>,
}

impl Default for CapacityTiers {
    fn default() -> Self {
        Self {
            high: default_high_capacity_tasks(),
            medium: default_medium_capacity_tasks(),
            low: default_low_capacity_tasks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SkillBand {
    pub min_age: u32,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SystemicChangeEntry {
    pub change: String,

    #[serde(default)]
    pub impact: String,

    #[serde(default)]
    pub how_to: String,
}
