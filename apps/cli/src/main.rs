//! sunray entry point.

mod config;
mod select;

use std::path::PathBuf;

use clap::Parser;
use futures_util::{StreamExt, stream};
use sunray_launchers::{Adapter, DiscoveryReport, detect_adapters, discover_all};
use sunray_model::{GameRecord, LauncherKind};
use sunray_steamgriddb::{ArtworkResolver, Client, CoverCache};
use sunray_sunshine::{MergeAction, MergeMode, MergeReport, Store, merge};
use tracing_subscriber::EnvFilter;

/// How many covers are fetched at once.
const ARTWORK_CONCURRENCY: usize = 4;

/// Import installed games from Linux game launchers into Sunshine.
#[derive(Debug, Parser)]
#[command(name = "sunray", version)]
struct Args {
    /// Import every discovered game without prompting.
    #[arg(long)]
    all: bool,

    /// Refresh command, artwork, and working directory of entries sunray
    /// imported before.
    #[arg(long)]
    update: bool,

    /// Skip cover art lookup entirely.
    #[arg(long)]
    no_artwork: bool,

    /// Discover and report, but leave apps.json untouched.
    #[arg(long)]
    dry_run: bool,

    /// Path to Sunshine's apps.json (overrides the config file).
    #[arg(long, value_name = "PATH")]
    apps_json: Option<PathBuf>,

    /// SteamGridDB API key (overrides the config file).
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Only scan these launchers (repeatable; e.g. --launcher steam).
    #[arg(long = "launcher", value_name = "KIND")]
    launchers: Vec<LauncherKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            config::Config::default()
        }
    };

    let home = sunray_launchers::probe::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));

    // Discover.
    let mut adapters = detect_adapters(&home);
    if !args.launchers.is_empty() {
        adapters.retain(|a| args.launchers.contains(&a.kind()));
    }
    if adapters.is_empty() {
        println!("No supported game launchers found.");
        return Ok(());
    }
    tracing::debug!(count = adapters.len(), "launchers detected");

    let (mut records, reports) = discover_all(&adapters);
    print_discovery(&adapters, &reports);

    if records.is_empty() {
        println!("No games discovered.");
        return Ok(());
    }

    // Load the target before any interaction; a corrupt apps.json must
    // abort before the user picks anything.
    let store = Store::new(args.apps_json.unwrap_or_else(|| config.apps_json.clone()));
    let mut apps = store.load()?;

    // Select.
    let selected = if args.all {
        records
    } else {
        match select::prompt(&records)? {
            Some(indices) => {
                let mut picked = Vec::with_capacity(indices.len());
                for i in indices.into_iter().rev() {
                    picked.push(records.swap_remove(i));
                }
                picked.reverse();
                picked
            }
            None => {
                println!("Nothing selected.");
                return Ok(());
            }
        }
    };

    if selected.is_empty() {
        println!("Nothing selected.");
        return Ok(());
    }

    // Artwork.
    let mut api_key = args.api_key;
    if api_key.is_none() && !config.steamgriddb_api_key.is_empty() {
        api_key = Some(config.steamgriddb_api_key.clone());
    }
    let selected = match api_key {
        Some(key) if !args.no_artwork => {
            let resolver =
                ArtworkResolver::new(Client::new(&key)?, CoverCache::new(&config.covers_dir));
            resolve_artwork(&resolver, selected).await
        }
        _ => {
            tracing::debug!("artwork lookup disabled");
            selected
        }
    };

    // Merge and save.
    let mode = if args.update {
        MergeMode::Update
    } else {
        MergeMode::SkipExisting
    };
    let report = merge(&mut apps, &selected, mode);

    if args.dry_run {
        println!("\nDry run, {} not written.", store.path().display());
    } else {
        store.save(&apps)?;
    }
    print_summary(&report, args.dry_run);

    Ok(())
}

/// Fetches covers for the selected games, a few at a time.
async fn resolve_artwork(
    resolver: &ArtworkResolver,
    mut records: Vec<GameRecord>,
) -> Vec<GameRecord> {
    println!("Fetching cover art for {} game(s)...", records.len());

    let resolved: Vec<(usize, Option<PathBuf>)> = stream::iter(records.iter().enumerate())
        .map(|(i, record)| async move { (i, resolver.resolve(record).await) })
        .buffer_unordered(ARTWORK_CONCURRENCY)
        .collect()
        .await;

    for (i, artwork) in resolved {
        records[i].artwork = artwork;
    }
    records
}

fn print_discovery(adapters: &[Box<dyn Adapter>], reports: &[DiscoveryReport]) {
    println!("Scanned {} launcher(s):", adapters.len());
    for report in reports {
        match &report.error {
            Some(error) => println!("  {} ({}): failed: {error}", report.kind, report.variant),
            None if report.skipped > 0 => println!(
                "  {} ({}): {} game(s), {} skipped",
                report.kind, report.variant, report.found, report.skipped
            ),
            None => println!("  {} ({}): {} game(s)", report.kind, report.variant, report.found),
        }
    }
}

fn print_summary(report: &MergeReport, dry_run: bool) {
    let verb = |action| {
        if dry_run {
            match action {
                MergeAction::Added => "would add",
                MergeAction::Updated => "would update",
                MergeAction::Skipped => "would skip",
            }
        } else {
            match action {
                MergeAction::Added => "added",
                MergeAction::Updated => "updated",
                MergeAction::Skipped => "skipped (already present)",
            }
        }
    };

    println!();
    for outcome in &report.outcomes {
        println!("  {}: {}", outcome.name, verb(outcome.action));
    }
    println!(
        "\n{} added, {} updated, {} skipped.",
        report.added(),
        report.updated(),
        report.skipped()
    );
}
