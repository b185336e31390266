use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadBalanceError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Narrative error: {0}")]
    Narrative(#[from] NarrativeError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Roster failures that abort the analysis
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Group '{0}' not found")]
    NotFound(String),

    #[error("Malformed roster for group '{group_id}': {reason}")]
    Malformed { group_id: String, reason: String },
}

/// Failures of a single activity-store call. Recoverable.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("{source_name} fetch failed: {reason}")]
    Fetch {
        source_name: &'static str,
        reason: String,
    },

    #[error("{0} fetch missed the analysis deadline")]
    Deadline(&'static str),
}

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process failed with exit code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Narrative provider returned no text")]
    Empty,

    #[error("Narrative provider failed: {0}")]
    Provider(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to create snapshot directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write snapshot '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read snapshots: {0}")]
    Read(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Snapshot store rejected write: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures loading a group data file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read data file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse data file: {0}")]
    Parse(#[from] serde_yaml::Error),
}
