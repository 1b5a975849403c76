use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use trident::config::Config;
use trident::export::{build_report, render_table, report_json, write_xlsx};
use trident::load_dataset;
use trident::logging;
use trident::similarity::{Metric, TargetRef, find_similar, locate_target};

#[derive(Parser)]
#[command(name = "similar")]
#[command(about = "Find players with a similar statistical profile", long_about = None)]
struct Cli {
    /// Player name, exactly as in the dataset
    player: String,

    /// Squad, to tell apart players sharing a name
    #[arg(long)]
    squad: Option<String>,

    /// Dataset path (.csv, .tsv or .parquet); defaults to TRIDENT_DATA
    #[arg(long)]
    data: Option<PathBuf>,

    /// cosine or euclidean; defaults to TRIDENT_METRIC
    #[arg(long, short)]
    metric: Option<Metric>,

    /// Number of similar players; defaults to TRIDENT_NEIGHBORS
    #[arg(long, short = 'k')]
    neighbors: Option<usize>,

    /// Print a JSON report instead of a table
    #[arg(long)]
    json: bool,

    /// Also write the results to an xlsx workbook
    #[arg(long)]
    xlsx: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();
    logging::init(&config.log_level)?;

    let path = cli.data.unwrap_or(config.dataset);
    let metric = cli.metric.unwrap_or(config.metric);
    let neighbors = cli.neighbors.unwrap_or(config.neighbors);

    let dataset = load_dataset(&path).with_context(|| format!("load dataset {}", path.display()))?;
    let target = TargetRef::new(cli.player, cli.squad);
    let hits = find_similar(&dataset, &target, metric, neighbors)?;

    let target_row = locate_target(&dataset, &target)
        .and_then(|row| dataset.player(row))
        .context("target vanished from dataset")?;
    let report = build_report(&dataset, target_row, metric, &hits);

    if cli.json {
        println!("{}", report_json(&report)?);
    } else {
        println!(
            "{} ({}) - {} [{}]",
            report.target.name, report.target.squad, report.target.role, metric
        );
        print!("{}", render_table(&report.rows));
    }

    if let Some(out) = cli.xlsx {
        write_xlsx(&out, &report)?;
        eprintln!("workbook written: {}", out.display());
    }
    Ok(())
}
