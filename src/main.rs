//! Device Charts - command line entry point
//!
//! Loads hourly device observations from a file or URL, builds the dashboard
//! charts, optionally replays an interaction script, and writes SVG files, an
//! HTML dashboard page and a KPI summary.

use anyhow::{Context, Result};
use clap::Parser;
use device_charts::config::ChartConfig;
use device_charts::data::{catalog, source_for, ChartPropertyReader};
use device_charts::pipeline::{generate_charts, load_interactions, write_results};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "device_charts")]
#[command(about = "Render device observation charts to SVG")]
struct Args {
    /// Observation JSON: file path or http(s) URL
    #[arg(required_unless_present = "list_properties")]
    input: Option<String>,

    /// Box averages JSON for the bar chart: file path or http(s) URL
    #[arg(long)]
    boxes: Option<String>,

    /// Chart properties JSON (`{"heatmap.palette": "GnBu", ...}`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interaction script JSON, replayed before rendering
    #[arg(short, long)]
    interactions: Option<PathBuf>,

    /// Output directory (overrides `output.dir`)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Container width in pixels, or `auto`
    #[arg(long)]
    width: Option<String>,

    /// Container height in pixels, or `auto`
    #[arg(long)]
    height: Option<String>,

    /// Print every chart property with its default and exit
    #[arg(long)]
    list_properties: bool,
}

fn print_properties() {
    for def in catalog().properties() {
        println!("{:<28} {:<20} {}", def.name, def.default_value, def.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_properties {
        print_properties();
        return Ok(());
    }

    info!("Device Charts v{}", env!("CARGO_PKG_VERSION"));

    let mut props = match &args.config {
        Some(path) => ChartPropertyReader::from_json_file(path)
            .with_context(|| format!("reading properties from {}", path.display()))?,
        None => ChartPropertyReader::default(),
    };
    if let Some(width) = &args.width {
        props.set("chart.width", width.as_str());
    }
    if let Some(height) = &args.height {
        props.set("chart.height", height.as_str());
    }
    let config = ChartConfig::from_properties(&props);

    let interactions = match &args.interactions {
        Some(path) => load_interactions(path)
            .await
            .with_context(|| format!("reading interactions from {}", path.display()))?,
        None => Vec::new(),
    };

    let input = args
        .input
        .as_deref()
        .context("an observation source is required")?;
    let source = source_for(input)?;
    let boxes = args.boxes.as_deref().map(source_for).transpose()?;

    let output = generate_charts(source.as_ref(), boxes.as_deref(), &config, &interactions).await?;

    let out_dir = args.out.unwrap_or_else(|| config.output_dir.clone());
    info!("Saving {} file(s) to {}", output.charts.len(), out_dir.display());
    write_results(&output.charts, &out_dir).await?;

    info!("Done");
    Ok(())
}
