//! recon-runner: headless batch runner for the premium reconciliation engine.
//!
//! Usage:
//!   recon-runner
//!   recon-runner --data-dir data --output-dir output
//!   recon-runner --config recon.json --output-dir /tmp/out

use anyhow::Result;
use premium_recon_core::{
    reconciliation::FlagReason, summary::RunSummary, types::SourceTable, ReconEngine, RunConfig,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match find_arg(&args, "--config") {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(dir) = find_arg(&args, "--data-dir") {
        config.data_dir = dir.into();
    }
    if let Some(dir) = find_arg(&args, "--output-dir") {
        config.output_dir = dir.into();
    }

    println!("Premium reconciliation: recon-runner");
    println!("  data_dir:   {}", config.data_dir.display());
    println!("  output_dir: {}", config.output_dir.display());
    println!();

    let engine = ReconEngine::new(config);
    let summary = engine.run()?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {}", summary.run_id);
    println!("  policies rows:  {}", summary.input_count(SourceTable::Policies));
    println!("  gl rows:        {}", summary.input_count(SourceTable::AccountingGl));
    println!("  claims rows:    {}", summary.input_count(SourceTable::Claims));
    println!();

    println!("=== DATA QUALITY ===");
    println!("  total issues:   {}", summary.total_issues);
    for c in &summary.issues_by_check {
        println!("  {:<14} {:<28} {}", c.table_name, c.check_name, c.issues);
    }
    println!();

    println!("=== RECONCILIATION ===");
    println!("  policy ids:     {}", summary.reconciliation_rows);
    for flag in FlagReason::ALL {
        println!("  {:<20} {}", flag.as_str(), summary.flag_count(flag));
    }
    println!();

    println!("=== REPORTING ===");
    println!("  groups:         {}", summary.reporting_rows);
    println!();

    println!("Outputs:");
    println!("  {}", summary.outputs.data_quality_issues);
    println!("  {}", summary.outputs.reconciliation_results);
    println!("  {}", summary.outputs.reporting_dataset);
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
