use serde::{Deserialize, Serialize};

/// One of the independent activity-store reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Tasks,
    Events,
    Habits,
}

impl SignalSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalSource::Tasks => "tasks",
            SignalSource::Events => "events",
            SignalSource::Habits => "habits",
        }
    }
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable problem absorbed while producing an analysis
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// The roster could not be read in time; the load map is empty
    Roster { reason: String },

    /// A source could not be read; its contribution is zero
    SignalSource {
        source: SignalSource,
        reason: String,
    },

    /// Some records from a source were malformed and skipped
    RejectedRecords { source: SignalSource, count: usize },

    /// The narrative service failed and the template text was used
    Narrative { reason: String },
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degradation::Roster { reason } => write!(f, "roster unavailable: {}", reason),
            Degradation::SignalSource { source, reason } => {
                write!(f, "{} unavailable: {}", source, reason)
            }
            Degradation::RejectedRecords { source, count } => {
                write!(f, "{} malformed {} record(s) skipped", count, source)
            }
            Degradation::Narrative { reason } => write!(f, "narrative fallback: {}", reason),
        }
    }
}
