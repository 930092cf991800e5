//! Maryland incentive scan: range-based program eligibility for a property
//!
//! A coarser model than `RebateCalculator`. It works from building type, AMI
//! band and utility name instead of a zip code, and reports low/high ranges per
//! funding source with a coverage band, compliance status and payback.

use crate::validation::format_currency;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cost assumed when the report compares acting now with waiting
pub const REFERENCE_PROJECT_COST: f64 = 15_000.0;

/// Horizon for the net benefit of acting now
pub const SCAN_BENEFIT_YEARS: f64 = 15.0;

/// Coverage percentage is capped here before banding
const MAX_COVERAGE_PERCENT: u32 = 100;

macro_rules! id_enum {
    ($name:ident, $kind:literal, [$($variant:ident => $id:literal),+ $(,)?]) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn id(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.id() == s)
                    .ok_or_else(|| format!("Unknown {}: {}", $kind, s))
            }
        }
    };
}

/// Property being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildingType {
    #[default]
    #[serde(rename = "single_family")]
    SingleFamily,
    #[serde(rename = "2-4_unit")]
    TwoToFourUnit,
    /// Costs and grants are per unit
    #[serde(rename = "5+_multifamily")]
    FivePlusMultifamily,
    #[serde(rename = "nonprofit")]
    Nonprofit,
}

id_enum!(BuildingType, "building type", [
    SingleFamily => "single_family",
    TwoToFourUnit => "2-4_unit",
    FivePlusMultifamily => "5+_multifamily",
    Nonprofit => "nonprofit",
]);

impl BuildingType {
    pub fn project_cost(&self) -> f64 {
        match self {
            BuildingType::SingleFamily => 15_000.0,
            BuildingType::TwoToFourUnit => 35_000.0,
            BuildingType::FivePlusMultifamily => 20_000.0,
            BuildingType::Nonprofit => 50_000.0,
        }
    }
}

/// Household income relative to area median income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AmiBand {
    #[serde(rename = "under_80_ami")]
    Under80,
    #[serde(rename = "80_150_ami")]
    From80To150,
    #[default]
    #[serde(rename = "over_150_ami")]
    Over150,
}

id_enum!(AmiBand, "AMI band", [
    Under80 => "under_80_ami",
    From80To150 => "80_150_ami",
    Over150 => "over_150_ami",
]);

/// Maryland utility named on the scan form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanUtility {
    #[default]
    #[serde(rename = "BGE")]
    Bge,
    #[serde(rename = "Pepco")]
    Pepco,
    #[serde(rename = "Potomac Edison")]
    PotomacEdison,
    #[serde(rename = "SMECO")]
    Smeco,
    #[serde(rename = "Other")]
    Other,
}

id_enum!(ScanUtility, "utility", [
    Bge => "BGE",
    Pepco => "Pepco",
    PotomacEdison => "Potomac Edison",
    Smeco => "SMECO",
    Other => "Other",
]);

/// Current heating fuel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanFuel {
    #[default]
    #[serde(rename = "gas")]
    Gas,
    #[serde(rename = "oil")]
    Oil,
    #[serde(rename = "propane")]
    Propane,
    #[serde(rename = "electric_resistance")]
    ElectricResistance,
    #[serde(rename = "existing_heat_pump")]
    ExistingHeatPump,
    #[serde(rename = "other")]
    Other,
}

id_enum!(ScanFuel, "heating fuel", [
    Gas => "gas",
    Oil => "oil",
    Propane => "propane",
    ElectricResistance => "electric_resistance",
    ExistingHeatPump => "existing_heat_pump",
    Other => "other",
]);

/// Age band of the current system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanSystemAge {
    #[serde(rename = "20+")]
    Over20,
    #[serde(rename = "15-20")]
    From15To20,
    #[default]
    #[serde(rename = "10-15")]
    From10To15,
    #[serde(rename = "<10")]
    Under10,
    #[serde(rename = "unknown")]
    Unknown,
}

id_enum!(ScanSystemAge, "system age", [
    Over20 => "20+",
    From15To20 => "15-20",
    From10To15 => "10-15",
    Under10 => "<10",
    Unknown => "unknown",
]);

/// Scan form answers. Missing fields take the form defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRequest {
    pub building_type: BuildingType,
    pub income_level: AmiBand,
    pub utility: ScanUtility,
    pub heating_system: ScanFuel,
    pub system_age: ScanSystemAge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingKind {
    Utility,
    Federal,
    #[serde(rename = "State Grant")]
    StateGrant,
    State,
}

impl FundingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingKind::Utility => "Utility",
            FundingKind::Federal => "Federal",
            FundingKind::StateGrant => "State Grant",
            FundingKind::State => "State",
        }
    }
}

/// One line of the program eligibility table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProgram {
    pub name: String,
    pub kind: FundingKind,
    /// Display amount, e.g. `"$8,000 - $14,000"`
    pub amount: String,
    pub eligibility: String,
    pub notes: String,
}

impl ScanProgram {
    fn new(name: &str, kind: FundingKind, amount: &str, eligibility: &str, notes: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            amount: amount.to_string(),
            eligibility: eligibility.to_string(),
            notes: notes.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateRange {
    pub name: String,
    pub low: f64,
    pub high: f64,
}

impl RebateRange {
    fn new(name: &str, low: f64, high: f64) -> Self {
        Self {
            name: name.to_string(),
            low,
            high,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsRange {
    pub low: f64,
    pub high: f64,
}

impl SavingsRange {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// Share of project cost the midpoint incentive covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageBand {
    #[serde(rename = "80-100%")]
    From80To100,
    #[serde(rename = "50-80%")]
    From50To80,
    #[serde(rename = "30-50%")]
    From30To50,
    #[serde(rename = "15-30%")]
    From15To30,
}

impl CoverageBand {
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 80 {
            CoverageBand::From80To100
        } else if percent >= 50 {
            CoverageBand::From50To80
        } else if percent >= 30 {
            CoverageBand::From30To50
        } else {
            CoverageBand::From15To30
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoverageBand::From80To100 => "80-100%",
            CoverageBand::From50To80 => "50-80%",
            CoverageBand::From30To50 => "30-50%",
            CoverageBand::From15To30 => "15-30%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanUrgency {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "OPPORTUNITY")]
    Opportunity,
}

impl ScanUrgency {
    /// Urgency by age band; an unknown age is MODERATE
    pub fn from_system_age(age: ScanSystemAge) -> Self {
        match age {
            ScanSystemAge::Over20 => ScanUrgency::High,
            ScanSystemAge::From15To20 | ScanSystemAge::Unknown => ScanUrgency::Moderate,
            ScanSystemAge::From10To15 | ScanSystemAge::Under10 => ScanUrgency::Opportunity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanUrgency::High => "HIGH",
            ScanUrgency::Moderate => "MODERATE",
            ScanUrgency::Opportunity => "OPPORTUNITY",
        }
    }

    pub fn compliance_status(&self) -> &'static str {
        match self {
            ScanUrgency::High => "Your system is likely to require replacement before or during the ZEHES \
                mandate phase-in (2029+). Acting now maximizes incentive capture.",
            ScanUrgency::Moderate => "Your system may reach end-of-life during the mandate transition period. \
                Planning now provides flexibility and incentive optimization.",
            ScanUrgency::Opportunity => "Your system has remaining useful life. Current incentives represent \
                an opportunity for proactive upgrade at reduced cost.",
        }
    }
}

impl fmt::Display for ScanUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveScan {
    pub programs: Vec<ScanProgram>,
    pub utility_rebate: RebateRange,
    pub federal_rebate: RebateRange,
    /// `None` when no state program applies
    pub state_grant: Option<RebateRange>,
    pub total_low: f64,
    pub total_high: f64,
    pub estimated_cost: f64,
    /// Midpoint incentive over project cost, truncated and capped at 100
    pub coverage_percent: u32,
    pub coverage_band: CoverageBand,
    pub annual_savings: SavingsRange,
    /// One decimal place; zero when nothing remains to recover
    pub payback_years: f64,
    pub fifteen_year_net_benefit: f64,
    pub compliance_status: String,
    pub urgency_level: ScanUrgency,
}

fn utility_rebate(utility: ScanUtility) -> (RebateRange, ScanProgram) {
    let (name, low, high) = match utility {
        ScanUtility::Bge => ("BGE EmPOWER", 3_000.0, 8_000.0),
        ScanUtility::Pepco => ("Pepco EmPOWER", 2_500.0, 7_000.0),
        ScanUtility::PotomacEdison => ("Potomac Edison EmPOWER", 2_000.0, 6_000.0),
        ScanUtility::Smeco => ("SMECO EmPOWER", 2_500.0, 5_000.0),
        ScanUtility::Other => ("Utility Rebates", 1_500.0, 4_000.0),
    };
    let program = ScanProgram::new(
        &format!("{} Rebates", name),
        FundingKind::Utility,
        &format!("{} - {}", format_currency(low), format_currency(high)),
        "All Maryland ratepayers",
        "Heat pump and envelope improvement rebates",
    );
    (RebateRange::new(name, low, high), program)
}

fn federal_rebate(income: AmiBand) -> (RebateRange, ScanProgram) {
    match income {
        AmiBand::Under80 => (
            RebateRange::new("IRA HEEHR", 8_000.0, 14_000.0),
            ScanProgram::new(
                "IRA HEEHR (Home Efficiency Rebates)",
                FundingKind::Federal,
                "$8,000 - $14,000",
                "Households under 80% AMI",
                "100% of project costs covered for qualifying measures",
            ),
        ),
        AmiBand::From80To150 => (
            RebateRange::new("IRA HOMES", 2_000.0, 4_000.0),
            ScanProgram::new(
                "IRA HOMES Rebates",
                FundingKind::Federal,
                "$2,000 - $4,000",
                "Households 80-150% AMI",
                "50% of project costs covered, capped amounts",
            ),
        ),
        AmiBand::Over150 => (
            RebateRange::new("25C Tax Credit", 2_000.0, 2_000.0),
            ScanProgram::new(
                "Federal 25C Tax Credit",
                FundingKind::Federal,
                "Up to $2,000",
                "All taxpayers",
                "Annual tax credit for qualifying heat pumps",
            ),
        ),
    }
}

/// State grant and the program lines it contributes
fn state_grant(building: BuildingType, income: AmiBand) -> (Option<RebateRange>, Vec<ScanProgram>) {
    match (building, income) {
        (BuildingType::Nonprofit, _) => (
            Some(RebateRange::new("MEA ECB/EEE Grants", 5_000.0, 25_000.0)),
            vec![
                ScanProgram::new(
                    "MEA Electrifying Community Buildings (ECB)",
                    FundingKind::StateGrant,
                    "$5,000 - $25,000+",
                    "501(c)(3) community-serving facilities",
                    "Heat pumps, HPWH, panel upgrades, envelope",
                ),
                ScanProgram::new(
                    "MEA Energy Efficiency Equity (EEE)",
                    FundingKind::StateGrant,
                    "Additional coverage",
                    "Facilities serving LMI populations",
                    "Insulation, air sealing, efficiency measures",
                ),
            ],
        ),
        (BuildingType::FivePlusMultifamily, AmiBand::Under80 | AmiBand::From80To150) => (
            Some(RebateRange::new("DHCD/MEEHA", 3_000.0, 12_000.0)),
            vec![ScanProgram::new(
                "DHCD MEEHA / Multifamily Programs",
                FundingKind::State,
                "$3,000 - $12,000 per unit",
                "Affordable multifamily properties",
                "Often covers 50-100% of project costs",
            )],
        ),
        // Market-rate multifamily gets no state grant, even under 80% AMI
        (BuildingType::FivePlusMultifamily, _) => (None, Vec::new()),
        (_, AmiBand::Under80) => (
            Some(RebateRange::new("MEA Residential", 2_000.0, 8_000.0)),
            vec![ScanProgram::new(
                "MEA Residential Heat Pump Rebates",
                FundingKind::State,
                "$2,000 - $8,000",
                "LMI Maryland households",
                "Income-qualified rebates for heat pumps",
            )],
        ),
        _ => (None, Vec::new()),
    }
}

fn savings_range(fuel: ScanFuel) -> SavingsRange {
    let (low, high) = match fuel {
        ScanFuel::Gas => (400.0, 600.0),
        ScanFuel::Oil => (800.0, 1_400.0),
        ScanFuel::Propane => (900.0, 1_400.0),
        ScanFuel::ElectricResistance => (700.0, 1_200.0),
        ScanFuel::ExistingHeatPump => (100.0, 300.0),
        ScanFuel::Other => (400.0, 800.0),
    };
    SavingsRange { low, high }
}

/// Run the incentive scan for one property
pub fn scan_incentives(request: &ScanRequest) -> IncentiveScan {
    let (utility_rebate, utility_program) = utility_rebate(request.utility);
    let (federal_rebate, federal_program) = federal_rebate(request.income_level);
    let (state_grant, state_programs) = state_grant(request.building_type, request.income_level);

    let mut programs = vec![utility_program, federal_program];
    programs.extend(state_programs);

    let (state_low, state_high) = state_grant.as_ref().map_or((0.0, 0.0), |g| (g.low, g.high));
    let total_low = utility_rebate.low + federal_rebate.low + state_low;
    let total_high = utility_rebate.high + federal_rebate.high + state_high;

    let estimated_cost = request.building_type.project_cost();
    let avg_incentive = (total_low + total_high) / 2.0;
    let coverage_percent = ((avg_incentive / estimated_cost * 100.0) as u32).min(MAX_COVERAGE_PERCENT);

    let annual_savings = savings_range(request.heating_system);
    let net_cost = estimated_cost - avg_incentive;
    let avg_savings = annual_savings.midpoint();
    let payback_years = if avg_savings > 0.0 && net_cost > 0.0 {
        (net_cost / avg_savings * 10.0).round() / 10.0
    } else {
        0.0
    };

    let urgency_level = ScanUrgency::from_system_age(request.system_age);

    IncentiveScan {
        programs,
        utility_rebate,
        federal_rebate,
        state_grant,
        total_low,
        total_high,
        estimated_cost,
        coverage_percent,
        coverage_band: CoverageBand::from_percent(coverage_percent),
        annual_savings,
        payback_years,
        fifteen_year_net_benefit: annual_savings.low * SCAN_BENEFIT_YEARS - (REFERENCE_PROJECT_COST - total_low),
        compliance_status: urgency_level.compliance_status().to_string(),
        urgency_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_request_matches_form_defaults() {
        let request: ScanRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.building_type, BuildingType::SingleFamily);
        assert_eq!(request.income_level, AmiBand::Over150);
        assert_eq!(request.utility, ScanUtility::Bge);
        assert_eq!(request.heating_system, ScanFuel::Gas);
        assert_eq!(request.system_age, ScanSystemAge::From10To15);
    }

    #[test]
    fn test_default_scan() {
        let scan = scan_incentives(&ScanRequest::default());

        // BGE 3000-8000 + 25C 2000-2000
        assert_relative_eq!(scan.total_low, 5_000.0);
        assert_relative_eq!(scan.total_high, 10_000.0);
        assert!(scan.state_grant.is_none());
        assert_eq!(scan.programs.len(), 2);
        assert_eq!(scan.programs[0].name, "BGE EmPOWER Rebates");
        assert_eq!(scan.programs[0].amount, "$3,000 - $8,000");

        // midpoint 7500 over 15000
        assert_eq!(scan.coverage_percent, 50);
        assert_eq!(scan.coverage_band, CoverageBand::From50To80);

        // (15000 - 7500) / 500
        assert_relative_eq!(scan.payback_years, 15.0);
        assert_eq!(scan.urgency_level, ScanUrgency::Opportunity);
        assert_relative_eq!(scan.fifteen_year_net_benefit, 400.0 * 15.0 - 10_000.0);
    }

    #[test]
    fn test_low_income_single_family_stacks_three_sources() {
        let scan = scan_incentives(&ScanRequest {
            income_level: AmiBand::Under80,
            heating_system: ScanFuel::Oil,
            system_age: ScanSystemAge::Over20,
            ..ScanRequest::default()
        });

        assert_eq!(scan.federal_rebate.name, "IRA HEEHR");
        assert_eq!(scan.state_grant.as_ref().unwrap().name, "MEA Residential");
        assert_relative_eq!(scan.total_low, 3_000.0 + 8_000.0 + 2_000.0);
        assert_relative_eq!(scan.total_high, 8_000.0 + 14_000.0 + 8_000.0);

        // midpoint 21500 exceeds the cost; capped
        assert_eq!(scan.coverage_percent, 100);
        assert_eq!(scan.coverage_band, CoverageBand::From80To100);
        assert_relative_eq!(scan.payback_years, 0.0);

        assert_eq!(scan.urgency_level, ScanUrgency::High);
        assert!(scan.compliance_status.contains("ZEHES"));
    }

    #[test]
    fn test_nonprofit_grants() {
        let scan = scan_incentives(&ScanRequest {
            building_type: BuildingType::Nonprofit,
            utility: ScanUtility::Smeco,
            ..ScanRequest::default()
        });

        let grant = scan.state_grant.as_ref().unwrap();
        assert_relative_eq!(grant.low, 5_000.0);
        assert_relative_eq!(grant.high, 25_000.0);
        assert_eq!(scan.programs.len(), 4);
        assert!(scan.programs.iter().any(|p| p.kind == FundingKind::StateGrant));

        // (9500 + 32000) / 2 = 20750 over 50000 -> 41
        assert_relative_eq!(scan.total_low, 9_500.0);
        assert_eq!(scan.coverage_percent, 41);
        assert_eq!(scan.coverage_band, CoverageBand::From30To50);
    }

    #[test]
    fn test_multifamily_grant_requires_income_qualification() {
        let affordable = scan_incentives(&ScanRequest {
            building_type: BuildingType::FivePlusMultifamily,
            income_level: AmiBand::From80To150,
            ..ScanRequest::default()
        });
        assert_eq!(affordable.state_grant.as_ref().unwrap().name, "DHCD/MEEHA");
        assert_relative_eq!(affordable.estimated_cost, 20_000.0);

        let market_rate = scan_incentives(&ScanRequest {
            building_type: BuildingType::FivePlusMultifamily,
            ..ScanRequest::default()
        });
        assert!(market_rate.state_grant.is_none());
    }

    #[test]
    fn test_payback_rounds_to_one_decimal() {
        // 2-4 unit: 35000 - 7500 = 27500 over (100 + 300) / 2 = 200 -> 137.5
        let scan = scan_incentives(&ScanRequest {
            building_type: BuildingType::TwoToFourUnit,
            heating_system: ScanFuel::ExistingHeatPump,
            ..ScanRequest::default()
        });
        assert_relative_eq!(scan.payback_years, 137.5);

        // 7500 over 1100 = 6.818...
        let scan = scan_incentives(&ScanRequest {
            heating_system: ScanFuel::Oil,
            ..ScanRequest::default()
        });
        assert_relative_eq!(scan.payback_years, 6.8);
    }

    #[test]
    fn test_coverage_bands() {
        assert_eq!(CoverageBand::from_percent(100), CoverageBand::From80To100);
        assert_eq!(CoverageBand::from_percent(80), CoverageBand::From80To100);
        assert_eq!(CoverageBand::from_percent(79), CoverageBand::From50To80);
        assert_eq!(CoverageBand::from_percent(30), CoverageBand::From30To50);
        assert_eq!(CoverageBand::from_percent(0), CoverageBand::From15To30);
    }

    #[test]
    fn test_unknown_age_is_moderate() {
        assert_eq!(ScanUrgency::from_system_age(ScanSystemAge::Unknown), ScanUrgency::Moderate);
        assert_eq!(ScanUrgency::from_system_age(ScanSystemAge::Under10), ScanUrgency::Opportunity);
    }

    #[test]
    fn test_ids_parse() {
        assert_eq!("5+_multifamily".parse(), Ok(BuildingType::FivePlusMultifamily));
        assert_eq!("Potomac Edison".parse(), Ok(ScanUtility::PotomacEdison));
        assert_eq!("<10".parse(), Ok(ScanSystemAge::Under10));
        assert!("condo".parse::<BuildingType>().is_err());

        let request: ScanRequest =
            serde_json::from_str(r#"{"building_type": "2-4_unit", "utility": "Pepco"}"#).unwrap();
        assert_eq!(request.building_type, BuildingType::TwoToFourUnit);
        assert_eq!(request.utility, ScanUtility::Pepco);
    }
}
