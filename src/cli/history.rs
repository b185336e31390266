use crate::cli::HistoryArgs;
use crate::config::Config;
use crate::output::{build_history, build_history_markdown};
use crate::store::DirSnapshotStore;
use tracing::info;

pub fn execute(args: HistoryArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    info!("Reading snapshots from {:?}", config.snapshots.dir);
    let store = DirSnapshotStore::new(&config.snapshots.dir);
    let records = store.list(&args.group)?;
    let rows = build_history(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", build_history_markdown(&args.group, &rows));
    }

    Ok(())
}
