use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use loadbalance::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("loadbalance=debug")
    } else {
        EnvFilter::new("loadbalance=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args).await,
        Commands::History(args) => cli::history::execute(args),
        Commands::Schema => cli::schema::execute(),
    }
}
