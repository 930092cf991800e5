//! Run the calculator over a CSV of household profiles
//!
//! Writes one result row per profile and prints a portfolio summary

use anyhow::{Context, Result};
use clap::Parser;
use heat_pump_incentives::engine::CalculationResult;
use heat_pump_incentives::profile::load_profiles;
use heat_pump_incentives::validation::format_currency;
use heat_pump_incentives::{BatchRunner, CalculatorConfig, HouseholdProfile, PortfolioSnapshot};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Calculate incentives for a CSV of household profiles")]
struct Args {
    /// Input CSV (id,postal_code,home_type,square_feet,heating_system,system_age,income_bracket)
    input: PathBuf,

    /// Output CSV of results
    #[arg(short, long, default_value = "batch_results.csv")]
    output: PathBuf,

    /// Directory of reference CSVs (builtin tables when omitted)
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Year to measure the mandate deadline from
    #[arg(long)]
    as_of_year: Option<i32>,

    /// Also write the portfolio summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let config = match args.as_of_year {
        Some(year) => CalculatorConfig::for_year(year),
        None => CalculatorConfig::default(),
    };
    let runner = match &args.reference_dir {
        Some(dir) => BatchRunner::from_csv_path(dir, config)
            .with_context(|| format!("loading reference tables from {}", dir.display()))?,
        None => BatchRunner::new(config),
    };

    let records = load_profiles(&args.input)
        .with_context(|| format!("loading profiles from {}", args.input.display()))?;
    info!("Loaded {} profiles in {:?}", records.len(), start.elapsed());

    let calc_start = Instant::now();
    let outputs = runner.run_records(&records);
    info!("Calculated {} results in {:?}", outputs.len(), calc_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for (row, _) in &outputs {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Results written to {}", args.output.display());

    let calculations: Vec<(HouseholdProfile, CalculationResult)> = records
        .into_iter()
        .zip(outputs)
        .map(|(record, (_, result))| (record.profile, result))
        .collect();
    let snapshot = PortfolioSnapshot::from_calculations(&calculations, chrono::Utc::now());

    let unresolved = calculations.iter().filter(|(_, r)| !r.location_data.resolved).count();

    println!("\nPortfolio Summary:");
    println!("  Profiles:            {}", snapshot.total_leads);
    println!("  Outside service area: {}", unresolved);
    println!("  Avg risk score:      {:.2}", snapshot.avg_risk_score);
    println!("  High risk (>=7):     {}", snapshot.high_risk_assets);
    println!("  Critical (>=9):      {}", snapshot.critical_assets);
    println!("  Avg coverage:        {:.1}%", snapshot.avg_incentive_coverage);
    println!("  Total incentives:    {}", format_currency(snapshot.total_incentive_value));
    println!("  Avg net cost:        {}", format_currency(snapshot.avg_net_cost));

    println!("\nBy heating type:");
    for (heating, count) in &snapshot.leads_by_heating_type {
        println!("  {:<20} {:>6}", heating, count);
    }

    if let Some(path) = &args.summary_json {
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
