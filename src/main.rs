//! hostscrub - hosts-file blocklist cleaner
//!
//! Normalizes, deduplicates and whitelists hosts-file block lists, showing
//! every change as a diff before it is applied and keeping a backup for
//! rollback.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hostscrub::cli::{Cli, Commands};
use hostscrub::commands::transform::Step;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Shell => hostscrub::commands::shell::run(&cli.config).await,
        Commands::Clean { review } => {
            hostscrub::commands::transform::run(Step::Clean, review.mode(), &cli.config).await
        }
        Commands::Dedup { review } => {
            hostscrub::commands::transform::run(Step::Dedup, review.mode(), &cli.config).await
        }
        Commands::Filter { review } => {
            hostscrub::commands::transform::run(Step::Filter, review.mode(), &cli.config).await
        }
        Commands::Remove { keyword, review } => {
            hostscrub::commands::transform::run(Step::Remove(keyword), review.mode(), &cli.config)
                .await
        }
        Commands::ImportUrl { source, review } => {
            hostscrub::commands::import::run_url(&source, review.mode(), &cli.config).await
        }
        Commands::ImportLog { path, review } => {
            hostscrub::commands::import::run_log(&path, review.mode(), &cli.config).await
        }
        Commands::Save { review } => hostscrub::commands::save::run(review.mode(), &cli.config).await,
        Commands::Restore { review } => {
            hostscrub::commands::restore::run(review.mode(), &cli.config).await
        }
        Commands::Status => hostscrub::commands::status::run(&cli.config).await,
        Commands::FlushDns => hostscrub::commands::flush::run().await,
        Commands::Whitelist { action } => {
            hostscrub::commands::whitelist::run(action, &cli.config).await
        }
        Commands::Sources { action } => hostscrub::commands::sources::run(action, &cli.config).await,
        Commands::Version => {
            println!("hostscrub {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
