//! Settle-up command line

use anyhow::Context;
use clap::Parser;
use ledger_core::GameResults;
use settlement::{Config, SettlementEngine};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "settle-up")]
#[command(about = "Work out who pays whom after a series of games")]
struct Cli {
    /// Results document (JSON); falls back to the configured input path
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Proxy spec, e.g. `alice,bob;carol,dave` folds alice into bob and carol into dave
    #[arg(long)]
    proxies: Option<String>,

    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// List the games covered by the settlement
    #[arg(long)]
    show_games: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration: file, then environment, then flags
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env();

    if let Some(input) = cli.input {
        config.input_path = Some(input);
    }
    if let Some(proxies) = cli.proxies {
        config.proxies = Some(proxies);
    }
    if cli.show_games {
        config.report.show_games = true;
    }

    tracing::info!("Starting {} {}", config.service_name, config.service_version);

    let input = config
        .input_path
        .clone()
        .context("no results document given (use --input or SETTLE_UP_INPUT)")?;

    let engine = SettlementEngine::new(config)?;
    let results = GameResults::from_file(&input)
        .with_context(|| format!("reading results {}", input.display()))?;
    let report = engine.run(&results)?;

    if cli.json {
        println!("{}", engine.render_json(&report)?);
    } else {
        println!("{}", engine.render(&report));
    }

    Ok(())
}
