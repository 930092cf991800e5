//! Heat Pump Incentives CLI
//!
//! Runs a single calculation and prints a report, or the raw result as JSON

use anyhow::{Context, Result};
use clap::Parser;
use heat_pump_incentives::reference::{HeatingSystem, HomeType, IncomeBracket, SystemAge};
use heat_pump_incentives::validation::{format_currency, validate_postal_code};
use heat_pump_incentives::{CalculatorConfig, HouseholdProfile, RebateCalculator, ReferenceTables};
use log::warn;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heat_pump_incentives", version, about = "Estimate heat pump incentives for a household")]
struct Args {
    /// 5-digit zip code
    #[arg(short, long)]
    zip: String,

    /// single-family, townhouse, condo or multi-family
    #[arg(long)]
    home_type: Option<HomeType>,

    /// Conditioned floor area in square feet
    #[arg(long)]
    sq_ft: Option<f64>,

    /// gas-furnace, oil-boiler, electric-resistance, propane, heat-pump or other
    #[arg(long)]
    heating: Option<HeatingSystem>,

    /// 0-5, 6-10, 11-15, 16-20, 20+ or unknown
    #[arg(long)]
    age: Option<SystemAge>,

    /// low, moderate, middle, high or prefer-not-say
    #[arg(long)]
    income: Option<IncomeBracket>,

    /// Directory of reference CSVs (builtin tables when omitted)
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Year to measure the mandate deadline from (defaults to the current year)
    #[arg(long)]
    as_of_year: Option<i32>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tables = match &args.reference_dir {
        Some(dir) => ReferenceTables::from_csv_path(dir)
            .with_context(|| format!("loading reference tables from {}", dir.display()))?,
        None => ReferenceTables::builtin(),
    };
    let config = match args.as_of_year {
        Some(year) => CalculatorConfig::for_year(year),
        None => CalculatorConfig::default(),
    };
    let calculator = RebateCalculator::new(tables, config);

    let check = validate_postal_code(&args.zip);
    if let Some(error) = &check.error {
        warn!("{}: {}", args.zip, error);
    }

    let profile = HouseholdProfile {
        postal_code: args.zip.clone(),
        home_type: args.home_type,
        square_feet: args.sq_ft,
        heating_system: args.heating,
        system_age: args.age,
        income_bracket: args.income,
    };
    let result = calculator.compute_rebates(&profile);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let location = &result.location_data;
    println!("Heat Pump Incentive Estimate");
    println!("============================\n");

    println!("Location: {} ({})", location.state_name, args.zip);
    if !location.resolved {
        println!("  Outside the service area; showing {} figures", location.state_name);
    }
    println!("  Utility: {}", location.utility_name);
    if location.ambiguous_utility {
        println!("  (zip prefix is claimed by utilities in more than one jurisdiction)");
    }
    println!();

    let breakdown = &result.incentive_breakdown;
    println!("Incentives:");
    println!("  {:<10} {:>10}", "State", format_currency(breakdown.state));
    println!("  {:<10} {:>10}", "Utility", format_currency(breakdown.utility));
    println!("  {:<10} {:>10}", "Federal", format_currency(breakdown.federal));
    println!("  {}", "-".repeat(21));
    println!("  {:<10} {:>10}  ({}% of cost)", "Total", format_currency(breakdown.total), breakdown.coverage);
    println!();

    println!("Costs and savings:");
    println!("  Estimated install:  {:>10}", format_currency(result.estimated_cost));
    println!("  Net cost:           {:>10}", format_currency(result.net_cost));
    println!("  Annual savings:     {:>10}", format_currency(result.annual_savings));
    println!("  10-year savings:    {:>10}", format_currency(result.ten_year_savings));
    match result.payback_years {
        Some(years) => println!("  Payback:            {:>4} years", years),
        None => println!("  Payback:            never at current savings"),
    }
    println!();

    let risk = &result.risk_assessment;
    println!("Risk:");
    println!("  Stranded asset risk: {}", risk.stranded_asset_risk);
    println!("  Urgency:             {}", risk.urgency_level);
    println!("  Risk score:          {:.1} / 10", result.intelligence.asset_risk_score);
    println!(
        "  Mandate:             {} ({} years away)",
        location.mandate_deadline, risk.years_until_mandate
    );
    println!();
    println!("{}", risk.recommendation);

    Ok(())
}
