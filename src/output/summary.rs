use crate::engine::Severity;
use crate::store::SnapshotRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored analysis condensed for trend tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub saved_at: DateTime<Utc>,
    pub severity: Severity,
    pub primary_carrier: Option<String>,
    pub member_totals: Vec<(String, f64)>,
    pub degraded: bool,

    /// Load vectors identical to the previous row
    pub unchanged: bool,
}

pub fn build_history(records: &[SnapshotRecord]) -> Vec<HistoryRow> {
    let mut previous: Option<&str> = None;

    records
        .iter()
        .map(|record| {
            let analysis = &record.analysis;
            let unchanged = previous == Some(analysis.fingerprint.as_str());
            previous = Some(analysis.fingerprint.as_str());

            HistoryRow {
                saved_at: record.saved_at,
                severity: analysis.imbalances.severity,
                primary_carrier: analysis.primary_carrier_name().map(str::to_string),
                member_totals: analysis
                    .current_load
                    .iter()
                    .map(|m| (m.name.clone(), m.total))
                    .collect(),
                degraded: analysis.degraded,
                unchanged,
            }
        })
        .collect()
}

pub fn build_history_markdown(group_id: &str, rows: &[HistoryRow]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# History: {}\n\n", group_id));
    if rows.is_empty() {
        md.push_str("*No snapshots*\n");
        return md;
    }

    md.push_str("| Saved | Severity | Primary Carrier | Totals | Notes |\n");
    md.push_str("|-------|----------|-----------------|--------|-------|\n");

    for row in rows {
        let totals = row
            .member_totals
            .iter()
            .map(|(name, total)| format!("{} {:.1}", name, total))
            .collect::<Vec<_>>()
            .join(", ");

        let mut notes = Vec::new();
        if row.unchanged {
            notes.push("unchanged");
        }
        if row.degraded {
            notes.push("degraded");
        }

        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            row.saved_at.format("%Y-%m-%d %H:%M"),
            row.severity,
            row.primary_carrier.as_deref().unwrap_or("-"),
            totals,
            notes.join(", ")
        ));
    }

    md
}
