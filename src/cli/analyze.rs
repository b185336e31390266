use crate::analysis::{Analysis, AnalysisOrchestrator};
use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::engine::Severity;
use crate::error::LoadBalanceError;
use crate::model::TimeWindow;
use crate::output::write_analysis_report;
use crate::store::{DirSnapshotStore, GroupDataStore};
use anyhow::bail;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};

pub async fn execute(args: AnalyzeArgs) -> anyhow::Result<()> {
    let (config, data) = load_inputs(&args)?;
    let window = resolve_window(args.from, args.to, Utc::now())?;
    let data = Arc::new(data);

    let mut orchestrator = AnalysisOrchestrator::new(config.clone(), data.clone(), data);
    if config.snapshots.enabled {
        orchestrator =
            orchestrator.with_snapshot_store(Arc::new(DirSnapshotStore::new(&config.snapshots.dir)));
    }

    let outcome = orchestrator.run(&args.group, window).await?;
    // Wait for the snapshot before the process exits
    let analysis = outcome.finish().await;

    let paths = write_analysis_report(&config.report_dir, &analysis)?;
    info!("Report written to {:?}", paths.markdown);

    print_summary(&analysis);
    println!("Report: {}", paths.markdown.display());

    // Exit with error if the imbalance is severe and flag set
    if args.fail_on_severe && analysis.imbalances.severity == Severity::Severe {
        error!("Exiting with error: severe imbalance in {}", analysis.group_id);
        std::process::exit(1);
    }

    Ok(())
}

fn load_inputs(args: &AnalyzeArgs) -> Result<(Config, GroupDataStore), LoadBalanceError> {
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load_or_default(&args.config)?;

    // Apply CLI overrides
    if let Some(report_dir) = &args.report_dir {
        config.report_dir = report_dir.clone();
    }
    if args.no_snapshot {
        config.snapshots.enabled = false;
    }

    config.validate()?;

    info!("Loading group data from {:?}", args.data);
    let data = GroupDataStore::load(&args.data)?;
    Ok((config, data))
}

/// Window from optional bounds; a missing bound is one week from the other
fn resolve_window(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> anyhow::Result<TimeWindow> {
    let window = match (from, to) {
        (None, None) => TimeWindow::week_of(now),
        (Some(start), None) => TimeWindow::new(start, start + Duration::days(7)),
        (None, Some(end)) => TimeWindow::new(end - Duration::days(7), end),
        (Some(start), Some(end)) => TimeWindow::new(start, end),
    };

    if window.start >= window.end {
        bail!("--from must be before --to (got {})", window);
    }
    Ok(window)
}

fn print_summary(analysis: &Analysis) {
    println!("\n=== {} ({}) ===\n", analysis.group_id, analysis.window);
    println!(
        "Severity: {}   Primary carrier: {}",
        analysis.imbalances.severity,
        analysis.primary_carrier_name().unwrap_or("-")
    );

    println!();
    for member in &analysis.current_load {
        println!(
            "  {:<16} {:>7.1}  {:>3}%  {:<9} capacity {}%",
            member.name,
            member.total,
            member.percentage_of_family,
            member.burnout_risk,
            member.capacity_remaining.percentage
        );
    }

    let actions = &analysis.rebalancing_plan.immediate_actions;
    if !actions.is_empty() {
        println!("\nImmediate actions:");
        for shift in actions {
            println!(
                "  - {}: {} -> {}",
                shift.task_label, shift.from_name, shift.to_name
            );
        }
    }

    println!("\n{}\n", analysis.insights);

    if analysis.degraded {
        println!("Degraded:");
        for degradation in &analysis.degradations {
            println!("  - {}", degradation);
        }
        println!();
    }
}
