//! CLI for auditing gridded radar rainfall products.
//!
//! Exit codes: 0 = every checked product passed, 1 = at least one check
//! failed, 2 = operational error (bad arguments, unreadable footprint,
//! broken image directory).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use checker::{CheckConfig, CheckRunner, Footprint, RunSummary, SampleConfig};

#[derive(Parser, Debug)]
#[command(name = "radar-check")]
#[command(about = "Verify gridded radar rainfall products against their source inputs")]
struct Args {
    /// Directory of product netCDF files
    #[arg(value_name = "NETCDF_DIR")]
    products_dir: PathBuf,

    /// Directory of source PNG images
    #[arg(value_name = "PNG_IMG_DIR")]
    images_dir: PathBuf,

    /// Footprint descriptor (YAML)
    #[arg(value_name = "FOOTPRINT_FILE")]
    footprint: PathBuf,

    /// Resampling resolution in seconds; set to the same value the
    /// product pipeline was run with
    #[arg(short, long, value_name = "N_SECONDS")]
    resolution: Option<u64>,

    /// Check remaining files after a failure instead of halting
    #[arg(long)]
    keep_going: bool,

    /// Seed for the sampled coordinate cross-check
    #[arg(long, value_name = "SEED")]
    sample_seed: Option<u64>,

    /// Output format: table (default), json
    #[arg(short, long, default_value = "table")]
    output: String,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(&args) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            std::process::exit(2);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let footprint = Footprint::from_file(&args.footprint)
        .with_context(|| format!("loading footprint {}", args.footprint.display()))?;
    info!(
        rows = footprint.rows(),
        cols = footprint.cols(),
        srs = %footprint.srs(),
        "footprint loaded"
    );

    let mut config = CheckConfig::new(&args.products_dir, &args.images_dir)
        .with_resolution(args.resolution)
        .with_keep_going(args.keep_going);
    if let Some(seed) = args.sample_seed {
        config = config.with_sampling(SampleConfig::with_seed(seed));
    }
    config.validate()?;

    let summary = CheckRunner::new(footprint, config).run()?;

    match args.output.as_str() {
        "json" => println!("{}", summary_json(&summary)),
        _ => {
            for report in &summary.reports {
                match &report.failure {
                    None => println!("PASS  {}", report.path.display()),
                    Some(failure) => println!(
                        "FAIL  {} [{}] {}",
                        report.path.display(),
                        failure.stage,
                        failure.error
                    ),
                }
            }
            println!();
            println!("{}", summary_table(&summary));
        }
    }
    Ok(summary.all_passed())
}

fn summary_json(summary: &RunSummary) -> String {
    let files: Vec<_> = summary
        .reports
        .iter()
        .map(|report| match &report.failure {
            None => serde_json::json!({
                "file": report.path.display().to_string(),
                "status": "pass",
            }),
            Some(failure) => serde_json::json!({
                "file": report.path.display().to_string(),
                "status": "fail",
                "stage": failure.stage.to_string(),
                "error": failure.error.to_string(),
            }),
        })
        .collect();

    serde_json::json!({
        "checked": summary.checked(),
        "passed": summary.passed(),
        "failed": summary.failed(),
        "files": files,
    })
    .to_string()
}

fn summary_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Product checks", ""]);
    table.add_row(vec!["Checked:", &summary.checked().to_string()]);
    table.add_row(vec!["Passed:", &summary.passed().to_string()]);
    table.add_row(vec!["Failed:", &summary.failed().to_string()]);
    table.add_row(vec![
        "Result:",
        if summary.all_passed() { "PASS" } else { "FAIL" },
    ]);
    table
}

fn init_tracing(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok();
}
