//! report-runner: headless market analysis report generator.
//!
//! Usage:
//!   report-runner --data-dir ../data/processed --output-dir ../reports
//!   report-runner --input purchases.xlsx --config analysis.json --json
//!   report-runner --input purchases.csv --events run.jsonl --no-chart

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use market_analysis_core::{
    chart,
    config::AnalysisConfig,
    discovery,
    engine::{AnalysisEngine, AnalysisOutcome},
    event, loader,
    report,
    snapshot::AnalysisSnapshot,
};
use std::env;
use std::path::{Path, PathBuf};

const ANALYSES_PERFORMED: [&str; 6] = [
    "Market Performance",
    "Concentration Analysis",
    "Price Segmentation",
    "Geographical Analysis",
    "Competitive Benchmarking",
    "Quality Assessment",
];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("../data/processed");
    let output_dir = arg_value(&args, "--output-dir").unwrap_or("../reports");
    let write_json = args.iter().any(|a| a == "--json");
    let no_chart = args.iter().any(|a| a == "--no-chart");

    let config = match arg_value(&args, "--config") {
        Some(path) => AnalysisConfig::load(Path::new(path))?,
        None => AnalysisConfig::default(),
    };

    let input: PathBuf = match arg_value(&args, "--input") {
        Some(path) => PathBuf::from(path),
        None => discovery::discover_latest_dataset(
            Path::new(data_dir),
            &config.input.dataset_prefix,
        )?,
    };
    let today = Local::now().date_naive();
    let report_path =
        discovery::report_path(Path::new(output_dir), &config.output.report_prefix, today)?;
    let run_id = format!("run-{}", uuid::Uuid::new_v4());

    println!("Market Analysis report-runner");
    println!("  run_id:  {run_id}");
    println!("  input:   {}", input.display());
    println!("  output:  {}", report_path.display());
    println!();

    let dataset = loader::load_dataset(&input, &config.input)
        .with_context(|| format!("loading {}", input.display()))?;

    let mut engine = AnalysisEngine::new(run_id, config);
    let outcome = engine.run(dataset)?;
    let config = engine.config();

    let dashboard_path = report_path.with_extension("png");
    let dashboard = if no_chart {
        None
    } else {
        let panels = chart::dashboard_panels(
            &outcome.brands,
            &outcome.centers,
            &outcome.price_segments,
            &config.dashboard,
        );
        let size = (config.dashboard.width, config.dashboard.height);
        match chart::render_dashboard(&panels, &dashboard_path, size) {
            Ok(()) => Some(dashboard_path.as_path()),
            Err(e) => {
                log::warn!("dashboard skipped: {e}");
                None
            }
        }
    };

    report::write_report(&outcome, dashboard, &report_path, &config.output)
        .with_context(|| format!("writing {}", report_path.display()))?;

    if write_json {
        let json_path = report_path.with_extension("json");
        AnalysisSnapshot::new(&outcome, Utc::now()).write(&json_path)?;
    }
    if let Some(events_path) = arg_value(&args, "--events") {
        std::fs::write(events_path, event::to_json_lines(engine.events())?)
            .with_context(|| format!("writing {events_path}"))?;
    }

    print_summary(&outcome, &report_path);
    Ok(())
}

fn print_summary(outcome: &AnalysisOutcome, report_path: &Path) {
    let summary = &outcome.cleaned.summary;
    match summary.retention_rate() {
        Some(rate) => println!(
            "Data quality: {}/{} records retained ({rate:.1}%)",
            summary.retained_count, summary.original_count
        ),
        None => println!("Data quality: dataset had no records"),
    }
    println!();
    println!("{}", outcome.insights.render());

    println!();
    println!("{}", "=".repeat(60));
    println!("PROJECT EXECUTION SUMMARY");
    println!("{}", "=".repeat(60));
    println!("  report:          {}", report_path.display());
    println!("  analyses:        {}", ANALYSES_PERFORMED.len());
    for name in ANALYSES_PERFORMED {
        println!("    - {name}");
    }
    println!(
        "  market metrics:  HHI={:.0} ({}), {} brands, {} centers",
        outcome.concentration.hhi,
        outcome.concentration.structure,
        outcome.brands.rows.len(),
        outcome.centers.rows.len()
    );
    println!("  completed at:    {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
