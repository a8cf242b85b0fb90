use acmiview_acmi::ReplaySession;
use acmiview_core::config::{AppConfig, LogFormat, LoggingConfig};
use acmiview_track::seconds_between;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// acmiview - ACMI flight recording replay inspector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ACMI file to import
    file: PathBuf,

    /// Path to configuration file
    #[arg(short, long, env = "ACMIVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds after the start of the replay to query positions at
    #[arg(long)]
    at: Option<f64>,

    /// Also print the trail of every entity at the query time
    #[arg(long)]
    trail: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging)?;

    info!(file = %args.file.display(), "Importing replay");
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read replay file: {:?}", args.file))?;

    let mut session = ReplaySession::from_config(&config);
    let report = session
        .import(&text)
        .with_context(|| format!("Failed to import {:?}", args.file))?
        .clone();

    println!("{}: {}", args.file.display(), report);
    for warning in report.warnings.iter().take(10) {
        println!("  skipped {warning}");
    }
    if report.skipped_lines() > 10 {
        println!("  ... {} more", report.skipped_lines() - 10);
    }

    let registry = session.registry();
    let Some((start, end)) = registry.time_range() else {
        println!("No entity has any position");
        return Ok(());
    };
    println!(
        "Time range: {} .. {} ({:.1} s)",
        start,
        end,
        seconds_between(start, end)
    );

    println!("Entities:");
    for entity in registry.iter() {
        println!(
            "  {:<12} {:<24} {:<20} {} samples",
            entity.id(),
            entity.name(),
            entity.classification().to_string(),
            entity.trajectory().len()
        );
    }

    let offset = args.at.unwrap_or(0.0);
    let now = session
        .seek(offset)
        .ok_or_else(|| anyhow!("Cannot seek to {offset} s"))?;

    println!("Positions at {now} (+{offset} s):");
    for (entity, position) in session.registry().entities_now() {
        println!("  {:<12} {}", entity.id(), position);
    }

    if args.trail {
        println!(
            "Trails ({} s window):",
            session.trail_config().length_secs
        );
        for (id, points) in session.trails() {
            println!("  {:<12} {} points", id, points.len());
        }
    }

    Ok(())
}

/// Loads the configuration file (if any) with environment overrides and validates it.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = AppConfig::from_config_builder(path)
        .with_context(|| format!("Failed to load configuration from {path:?}"))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let level = logging.parse_level()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.file_line)
        .with_line_number(logging.file_line)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
