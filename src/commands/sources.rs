//! Source management command implementation.

use anyhow::Result;
use std::path::Path;

use crate::cli::SourcesAction;
use crate::config::Config;
use crate::format::clip;

/// Run the sources command
pub async fn run(action: SourcesAction, config_path: &Path) -> Result<()> {
    match action {
        SourcesAction::Add { name, url } => add_source(&name, &url, config_path).await,
        SourcesAction::Del { name } => remove_source(&name, config_path).await,
        SourcesAction::List => list_sources(config_path).await,
    }
}

/// Add a named source
async fn add_source(name: &str, url: &str, config_path: &Path) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    config.add_source(name, url)?;
    config.save(config_path)?;

    println!("[OK] Added source '{}'", name);
    println!("     Run 'hostscrub import-url {}' to import it", name);
    Ok(())
}

/// Remove a named source
async fn remove_source(name: &str, config_path: &Path) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    if !config.remove_source(name) {
        println!("Source '{}' not found.", name);
        println!();
        println!("Available sources:");
        for s in &config.sources {
            println!("  - {}", s.name);
        }
        anyhow::bail!("Source not found");
    }
    config.save(config_path)?;

    println!("[OK] Removed source '{}'", name);
    Ok(())
}

/// List configured sources
async fn list_sources(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    println!();
    println!("{:<24} URL", "NAME");
    println!("{}", "-".repeat(80));
    if config.sources.is_empty() {
        println!("  (none)");
    }
    for source in &config.sources {
        println!("{:<24} {}", clip(&source.name, 24), clip(&source.url, 55));
    }
    println!();
    Ok(())
}
