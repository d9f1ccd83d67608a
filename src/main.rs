//! MNIST-style digit collection tool.
//!
//! Headless companion to a browser drawing surface: replays recorded stroke
//! traces through the capture-and-normalization pipeline into the sample
//! store, and aggregates the collected data into leaderboard rankings,
//! admin statistics, charts, and JSON/CSV exports.

mod analysis;
mod canvas;
mod error;
mod model;
mod paths;
mod sequence;
mod session;
mod store;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;

use crate::canvas::StrokeSurface;
use crate::canvas::trace;
use crate::session::Session;
use crate::store::{JsonFileStore, SampleStore};

#[derive(Parser)]
#[command(name = "mnist-collect", version, about = "Collect and export handwritten digit samples")]
struct Cli {
    /// Data directory (defaults to the platform-local app data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay stroke trace files as one contribution session
    Replay {
        /// Contributor name for the session
        #[arg(long)]
        username: String,
        /// Trace files (JSON pointer-event arrays), one drawing each
        #[arg(required = true)]
        traces: Vec<PathBuf>,
    },
    /// Print admin statistics (totals, per-digit histogram)
    Stats,
    /// List stored samples, optionally filtered by username
    List {
        /// Case-insensitive username substring to match
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print the contributor leaderboard
    Leaderboard,
    /// Export the collected data as JSON and CSV
    Export {
        /// Output directory (defaults to `<data_dir>/exports/`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Render the digit distribution chart as a PNG
    Chart {
        /// Output file (defaults to `<data_dir>/digit-distribution.png`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a 28x28 preview PNG of one stored sample
    Inspect {
        /// Sample id
        id: String,
        /// Output file (defaults to `<id>.png`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Recompute per-user counters from the sample log
    Reconcile,
    /// Delete all stored samples and users
    Clear {
        /// Confirm the irreversible delete
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(paths::default_data_dir);
    paths::ensure_directories(&data_dir)
        .context(format!("Failed to create data directory {}", data_dir.display()))?;

    let store = JsonFileStore::open(paths::store_dir(&data_dir))?;

    match cli.command {
        Command::Replay { username, traces } => replay(&store, &username, &traces),
        Command::Stats => stats(&store),
        Command::List { filter } => list(&store, filter.as_deref()),
        Command::Leaderboard => leaderboard(&store),
        Command::Export { out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| paths::exports_dir(&data_dir));
            let exported = analysis::export_all(&store, &out_dir)?;
            println!("JSON: {}", exported.json.display());
            println!("CSV:  {}", exported.csv.display());
            Ok(())
        }
        Command::Chart { out } => {
            let out = out.unwrap_or_else(|| data_dir.join("digit-distribution.png"));
            chart(&store, &out)
        }
        Command::Inspect { id, out } => inspect(&store, &id, out),
        Command::Reconcile => {
            store.reconcile()?;
            println!("Counters reconciled against the sample log.");
            Ok(())
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("Refusing to delete all data without --yes");
            }
            store.clear_all()?;
            println!("All samples and users deleted.");
            Ok(())
        }
    }
}

/// Replays each trace as one submission in a single session.
fn replay(store: &dyn SampleStore, username: &str, traces: &[PathBuf]) -> Result<()> {
    let mut session = Session::start(store, username)?;

    for trace_path in traces {
        let events = trace::load_trace(trace_path)?;
        let mut surface = StrokeSurface::new();
        trace::replay(&mut surface, &events);

        let prompted = session.current_digit();
        let stored = session
            .submit_surface(&surface)
            .context(format!("Failed to submit {}", trace_path.display()))?;
        println!(
            "Prompted {} -> stored sample {} from {}",
            prompted,
            stored.id,
            trace_path.display()
        );
    }

    Ok(())
}

fn stats(store: &dyn SampleStore) -> Result<()> {
    // Display paths degrade to empty on read failure instead of aborting.
    let samples = store.list_samples().unwrap_or_else(|e| {
        warn!("listing samples failed, showing empty stats: {}", e);
        Vec::new()
    });
    let users = store.list_users().unwrap_or_else(|e| {
        warn!("listing users failed, showing empty stats: {}", e);
        Default::default()
    });

    let stats = analysis::compute_admin_stats(&samples, &users);
    println!("Total samples: {}", stats.total_samples);
    println!("Total users:   {}", stats.total_users);
    println!("Avg per user:  {}", stats.avg_per_user);
    println!();
    for (digit, count) in stats.digit_histogram.iter().enumerate() {
        println!("Digit {}: {}", digit, count);
    }
    Ok(())
}

fn list(store: &dyn SampleStore, filter: Option<&str>) -> Result<()> {
    let samples = store.list_samples().unwrap_or_else(|e| {
        warn!("listing samples failed, showing empty table: {}", e);
        Vec::new()
    });

    let rows = match filter {
        Some(needle) => analysis::filter_by_username(&samples, needle),
        None => samples.iter().collect(),
    };
    if rows.is_empty() {
        println!("No entries found.");
        return Ok(());
    }
    for sample in rows {
        println!(
            "{}  {:<24} digit {}  {}",
            sample.id, sample.username, sample.digit, sample.captured_at
        );
    }
    Ok(())
}

fn leaderboard(store: &dyn SampleStore) -> Result<()> {
    let users = store.list_users().unwrap_or_else(|e| {
        warn!("listing users failed, showing empty leaderboard: {}", e);
        Default::default()
    });

    // HashMap order is arbitrary; enumerate alphabetically so tie ranks are
    // deterministic between runs.
    let mut ordered: Vec<_> = users.into_iter().collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let ranked = analysis::rank_leaderboard(&ordered);
    if ranked.is_empty() {
        println!("No entries yet.");
        return Ok(());
    }
    for entry in ranked {
        println!("#{:<3} {:<24} {}", entry.rank, entry.username, entry.count);
    }
    Ok(())
}

fn chart(store: &dyn SampleStore, out: &std::path::Path) -> Result<()> {
    let samples = store.list_samples()?;
    let users = store.list_users()?;
    let stats = analysis::compute_admin_stats(&samples, &users);

    analysis::charts::render_digit_histogram(&stats.digit_histogram, stats.total_samples, out)?;
    println!("Chart: {}", out.display());
    Ok(())
}

fn inspect(store: &dyn SampleStore, id: &str, out: Option<PathBuf>) -> Result<()> {
    let samples = store.list_samples()?;
    let Some(sample) = samples.iter().find(|s| s.id == id) else {
        bail!("No sample with id {}", id);
    };

    let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.png", id)));
    let image = canvas::rasterize::to_image(&sample.pixels)?;
    image
        .save(&out)
        .context(format!("Failed to save preview {}", out.display()))?;

    println!(
        "Sample {}: digit {} by {} at {} -> {}",
        sample.id,
        sample.digit,
        sample.username,
        sample.captured_at,
        out.display()
    );
    Ok(())
}
