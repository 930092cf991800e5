//! Maryland electrification incentive scan for a single property
//!
//! Takes the scan form as flags or as a JSON blob and prints the report

use anyhow::{Context, Result};
use clap::Parser;
use heat_pump_incentives::engine::scan::{AmiBand, BuildingType, ScanFuel, ScanSystemAge, ScanUtility};
use heat_pump_incentives::engine::{scan_incentives, ScanRequest};
use heat_pump_incentives::validation::format_currency;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "incentive_scan", about = "Scan Maryland incentive eligibility for a property")]
struct Args {
    /// Scan form as JSON, e.g. '{"building_type": "nonprofit", "utility": "BGE"}'
    #[arg(long)]
    data: Option<String>,

    /// single_family, 2-4_unit, 5+_multifamily or nonprofit
    #[arg(long)]
    building_type: Option<BuildingType>,

    /// under_80_ami, 80_150_ami or over_150_ami
    #[arg(long)]
    income: Option<AmiBand>,

    /// BGE, Pepco, "Potomac Edison", SMECO or Other
    #[arg(long)]
    utility: Option<ScanUtility>,

    /// gas, oil, propane, electric_resistance, existing_heat_pump or other
    #[arg(long)]
    heating: Option<ScanFuel>,

    /// 20+, 15-20, 10-15, <10 or unknown
    #[arg(long)]
    age: Option<ScanSystemAge>,

    /// Property address shown in the report header
    #[arg(long)]
    address: Option<String>,

    /// Print the scan as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut request = match &args.data {
        Some(data) => serde_json::from_str::<ScanRequest>(data).context("parsing --data")?,
        None => ScanRequest::default(),
    };
    if let Some(building_type) = args.building_type {
        request.building_type = building_type;
    }
    if let Some(income) = args.income {
        request.income_level = income;
    }
    if let Some(utility) = args.utility {
        request.utility = utility;
    }
    if let Some(heating) = args.heating {
        request.heating_system = heating;
    }
    if let Some(age) = args.age {
        request.system_age = age;
    }

    let scan = scan_incentives(&request);
    info!("Scanned {} in {} territory", request.building_type, request.utility);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scan)?);
        return Ok(());
    }

    println!("Maryland Electrification Incentive Scan");
    println!("=======================================\n");
    println!("Property:          {}", args.address.as_deref().unwrap_or("N/A"));
    println!("Building type:     {}", request.building_type);
    println!("Utility territory: {}", request.utility);
    println!();

    println!(
        "Estimated total incentives: {} - {}",
        format_currency(scan.total_low),
        format_currency(scan.total_high)
    );
    println!("Estimated coverage: {} of project costs\n", scan.coverage_band.label());

    println!("{:<45} {:<12} {:<26} Notes", "Program", "Type", "Est. Amount");
    println!("{}", "-".repeat(110));
    for program in &scan.programs {
        println!(
            "{:<45} {:<12} {:<26} {}",
            program.name,
            program.kind.as_str(),
            program.amount,
            program.notes
        );
    }
    println!();

    println!("Financial impact:");
    println!(
        "  Annual energy savings:  {} - {}",
        format_currency(scan.annual_savings.low),
        format_currency(scan.annual_savings.high)
    );
    println!("  Payback with incentives: ~{:.1} years", scan.payback_years);
    println!(
        "  15-year net benefit vs. waiting: {}+",
        format_currency(scan.fifteen_year_net_benefit)
    );
    println!();

    println!("Mandate compliance status: {}", scan.urgency_level);
    println!("  {}", scan.compliance_status);

    Ok(())
}
