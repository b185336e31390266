use crate::analysis::Analysis;
use crate::error::OutputError;
use crate::model::BurnoutRisk;
use std::fs;
use std::path::{Path, PathBuf};

/// Files written for one analysis
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub json: PathBuf,
}

/// Write `<report_dir>/<date>/<group>.md` and `<group>.analysis.json`
pub fn write_analysis_report(
    report_dir: &Path,
    analysis: &Analysis,
) -> Result<ReportPaths, OutputError> {
    let dated_dir = report_dir.join(analysis.generated_at.format("%Y-%m-%d").to_string());
    fs::create_dir_all(&dated_dir).map_err(OutputError::CreateDir)?;

    let stem = file_stem(&analysis.group_id);
    let markdown = dated_dir.join(format!("{}.md", stem));
    fs::write(&markdown, build_markdown(analysis)).map_err(OutputError::WriteReport)?;

    let json = dated_dir.join(format!("{}.analysis.json", stem));
    let content = serde_json::to_string_pretty(analysis)?;
    fs::write(&json, content).map_err(OutputError::WriteReport)?;

    Ok(ReportPaths { markdown, json })
}

fn file_stem(group_id: &str) -> String {
    group_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

pub fn build_markdown(analysis: &Analysis) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Load Balance: {}\n\n", analysis.group_id));
    md.push_str(&format!("**Generated:** {}\n", analysis.generated_at.to_rfc3339()));
    md.push_str(&format!("**Window:** {}\n", analysis.window));
    md.push_str(&format!(
        "**Severity:** {}\n",
        analysis.imbalances.severity
    ));
    if let Some(name) = analysis.primary_carrier_name() {
        md.push_str(&format!("**Primary carrier:** {}\n", name));
    }
    md.push_str(&format!("**Fingerprint:** `{}`\n\n", analysis.fingerprint));

    if analysis.degraded {
        md.push_str("> ⚠️ This analysis is degraded:\n");
        for degradation in &analysis.degradations {
            md.push_str(&format!("> - {}\n", degradation));
        }
        md.push('\n');
    }

    // Load table
    md.push_str("## Current Load\n\n");
    md.push_str("| Member | Role | Total | Share | Burnout Risk | Capacity Left |\n");
    md.push_str("|--------|------|-------|-------|--------------|---------------|\n");
    for member in &analysis.current_load {
        md.push_str(&format!(
            "| {} | {} | {:.1} | {}% | {} {} | {}% ({}) |\n",
            member.name,
            member.role,
            member.total,
            member.percentage_of_family,
            risk_icon(member.burnout_risk),
            member.burnout_risk,
            member.capacity_remaining.percentage,
            member.capacity_remaining.status,
        ));
    }
    md.push('\n');

    if !analysis.imbalances.critical_areas.is_empty() {
        md.push_str("### Critical Areas\n\n");
        for area in &analysis.imbalances.critical_areas {
            md.push_str(&format!("- {}\n", area));
        }
        md.push('\n');
    }

    md.push_str("## Insights\n\n");
    md.push_str(&format!("{}\n\n", analysis.insights));
    md.push_str(&format!("*Source: {}*\n\n", analysis.narrative_source));

    let plan = &analysis.rebalancing_plan;
    md.push_str("## Rebalancing Plan\n\n");

    md.push_str("### Immediate Actions\n\n");
    if plan.immediate_actions.is_empty() {
        md.push_str("*No immediate transfers*\n\n");
    }
    for shift in &plan.immediate_actions {
        md.push_str(&format!(
            "#### {}: {} → {}\n\n{}\n\n",
            shift.task_label, shift.from_name, shift.to_name, shift.impact
        ));
        for step in &shift.how_to {
            md.push_str(&format!("- [ ] {}\n", step));
        }
        md.push('\n');
    }

    md.push_str("### Weekly Adjustments\n\n");
    for adjustment in &plan.weekly_adjustments {
        md.push_str(&format!(
            "- **{}**: {} ({}; {})\n",
            adjustment.action, adjustment.description, adjustment.schedule, adjustment.impact
        ));
    }
    md.push('\n');

    md.push_str("### Monthly Systemic Changes\n\n");
    for change in &plan.monthly_systemic {
        md.push_str(&format!(
            "- **{}**: {}. {} ({})\n",
            change.change, change.implementation, change.impact, change.timeline
        ));
    }
    md.push('\n');

    let opportunities = &analysis.opportunities;
    if !opportunities.capacity_matches.is_empty() || !opportunities.skill_development.is_empty() {
        md.push_str("### Growth Opportunities\n\n");
        for capacity in &opportunities.capacity_matches {
            md.push_str(&format!(
                "- {} has {}% capacity ({} readiness): {}\n",
                capacity.name,
                capacity.available_capacity_pct,
                capacity.readiness,
                capacity.suggested_tasks.join(", ")
            ));
        }
        for skills in &opportunities.skill_development {
            md.push_str(&format!(
                "- {} can learn: {} ({})\n",
                skills.name,
                skills.skills.join(", "),
                skills.timeline_estimate
            ));
        }
        md.push('\n');
    }

    let entanglement = &analysis.entanglement_plan;
    md.push_str("## Shared Awareness\n\n");
    md.push_str(&format!(
        "Current level **{}** (sync {:.1}, awareness {:.1}), target **{}**.\n\n",
        entanglement.current_level,
        entanglement.current_level.sync(),
        entanglement.current_level.awareness(),
        entanglement.target_level
    ));
    for step in &plan.sync_steps {
        md.push_str(&format!(
            "- {} ({} priority, start {}): {}\n",
            step.step,
            step.priority,
            step.start,
            step.description
        ));
    }
    md.push('\n');

    md.push_str("## Rollout\n\n");
    for (idx, period) in plan.rollout.periods().iter().enumerate() {
        md.push_str(&format!("**Week {}:** {}\n\n", idx + 1, period.join("; ")));
    }

    md.push_str("## Predicted Outcomes\n\n");
    md.push_str("| Timeframe | Metric | Change | Confidence |\n");
    md.push_str("|-----------|--------|--------|------------|\n");
    for horizon in analysis.predicted_outcomes.horizons() {
        for effect in &horizon.effects {
            md.push_str(&format!(
                "| {} | {} | {} | {:.0}% |\n",
                horizon.timeframe,
                effect.metric,
                effect.change,
                effect.confidence * 100.0
            ));
        }
    }

    md
}

fn risk_icon(risk: BurnoutRisk) -> &'static str {
    match risk {
        BurnoutRisk::Minimal | BurnoutRisk::Low => "🟢",
        BurnoutRisk::Moderate => "🟡",
        BurnoutRisk::High => "🟠",
        BurnoutRisk::Critical => "🔴",
    }
}
