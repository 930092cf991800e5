//! Rebate and risk calculation engine

mod location;
mod incentives;
mod assessment;
mod result;
mod calculator;
pub mod scan;

pub use location::{resolve_jurisdiction, resolve_location, zip_prefix, LocationResolution};
pub use incentives::{calculate_incentives, federal_credit, state_rebate, utility_rebate, Incentives};
pub use assessment::{
    annual_savings, coverage_percent, incremental_net_benefit, installation_cost, payback_years,
    risk_score, Recommendation, TimingRisk,
};
pub use result::{
    CalculationResult, IncentiveBreakdown, Intelligence, LocationData, ResultRow, RiskAssessment,
    UtilityProjections,
};
pub use calculator::{CalculatorConfig, RebateCalculator};
pub use scan::{scan_incentives, IncentiveScan, ScanRequest};
