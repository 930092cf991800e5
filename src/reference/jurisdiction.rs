//! Jurisdictions, their incentive programs and electrification mandates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported jurisdictions in the DMV region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "MD")]
    Maryland,
    #[serde(rename = "DC")]
    DistrictOfColumbia,
    #[serde(rename = "VA")]
    Virginia,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [
        Jurisdiction::Maryland,
        Jurisdiction::DistrictOfColumbia,
        Jurisdiction::Virginia,
    ];

    /// Resolve a jurisdiction from the numeric 3-digit zip prefix.
    ///
    /// Ranges are disjoint and checked in order: DC 200-205, MD 206-219,
    /// VA 220-246. Anything else is outside the service area.
    pub fn from_zip_prefix(prefix: u16) -> Option<Self> {
        match prefix {
            200..=205 => Some(Jurisdiction::DistrictOfColumbia),
            206..=219 => Some(Jurisdiction::Maryland),
            220..=246 => Some(Jurisdiction::Virginia),
            _ => None,
        }
    }

    /// Two-letter postal abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Jurisdiction::Maryland => "MD",
            Jurisdiction::DistrictOfColumbia => "DC",
            Jurisdiction::Virginia => "VA",
        }
    }

    /// Utility assumed when no territory claims the zip prefix
    pub fn default_utility_id(&self) -> &'static str {
        match self {
            Jurisdiction::Maryland => "bge",
            Jurisdiction::DistrictOfColumbia => "pepco-dc",
            Jurisdiction::Virginia => "dominion-va",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Jurisdiction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MD" => Ok(Jurisdiction::Maryland),
            "DC" => Ok(Jurisdiction::DistrictOfColumbia),
            "VA" => Ok(Jurisdiction::Virginia),
            other => Err(format!("Unknown jurisdiction: {}", other)),
        }
    }
}

/// A named incentive program offered within a jurisdiction
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub description: String,
    pub website: String,
    /// Named dollar amounts (or coverage percentages for HEEHRA)
    pub amounts: Vec<(String, f64)>,
}

impl Program {
    fn new(id: &str, name: &str, description: &str, website: &str, amounts: &[(&str, f64)]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            website: website.to_string(),
            amounts: amounts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Look up one of the program's named amounts
    pub fn amount(&self, key: &str) -> Option<f64> {
        self.amounts.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

/// Regulatory deadline for zero-emission heating replacements
#[derive(Debug, Clone, Serialize)]
pub struct Mandate {
    pub name: String,
    /// Name used inside recommendation text
    pub short_name: String,
    pub target_year: i32,
    pub description: String,
    pub sales_target: String,
}

/// Projected increase in monthly utility bills
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UtilityOutlook {
    pub monthly_increase_min: f64,
    pub monthly_increase_max: f64,
    pub start_year: i32,
    pub source: &'static str,
}

impl UtilityOutlook {
    /// Cumulative increase over `years` at the top of the projected range
    pub fn projected_increase(&self, years: u32) -> f64 {
        self.monthly_increase_max * 12.0 * years as f64
    }
}

/// Everything the calculator knows about one jurisdiction
#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionProfile {
    pub jurisdiction: Jurisdiction,
    pub name: String,
    pub programs: Vec<Program>,
    pub mandate: Mandate,
    pub utility_outlook: UtilityOutlook,
}

impl JurisdictionProfile {
    pub fn abbreviation(&self) -> &'static str {
        self.jurisdiction.abbreviation()
    }

    pub fn program(&self, id: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == id)
    }

    /// Builtin profile for a jurisdiction
    pub fn builtin(jurisdiction: Jurisdiction) -> Self {
        match jurisdiction {
            Jurisdiction::Maryland => Self {
                jurisdiction,
                name: "Maryland".to_string(),
                programs: vec![
                    Program::new(
                        "mea-residential",
                        "Maryland Energy Administration (MEA)",
                        "State rebates for heat pump installation",
                        "https://energy.maryland.gov",
                        &[("low", 8000.0), ("moderate", 4000.0), ("middle", 2000.0), ("standard", 2000.0)],
                    ),
                    Program::new(
                        "empower-md",
                        "EmPOWER Maryland",
                        "Utility-sponsored efficiency incentives",
                        "https://empowermaryland.energy.gov",
                        &[("heatPump", 3000.0), ("hpwh", 1500.0), ("insulation", 2000.0)],
                    ),
                ],
                mandate: Mandate {
                    name: "ZEHES (Zero-Emission Heating Equipment Standard)".to_string(),
                    short_name: "ZEHES".to_string(),
                    target_year: 2029,
                    description: "End-of-life fossil heating replacements must be zero-emission".to_string(),
                    sales_target: "95% heat pump sales by 2030".to_string(),
                },
                utility_outlook: UtilityOutlook {
                    monthly_increase_min: 11.0,
                    monthly_increase_max: 18.0,
                    start_year: 2025,
                    source: "Maryland PSC projections",
                },
            },
            Jurisdiction::DistrictOfColumbia => Self {
                jurisdiction,
                name: "Washington DC".to_string(),
                programs: vec![Program::new(
                    "dcseu",
                    "DC Sustainable Energy Utility (DCSEU)",
                    "District rebates for electrification",
                    "https://www.dcseu.com",
                    &[("heatPumpMin", 250.0), ("heatPumpMax", 5000.0), ("panelUpgrade", 7200.0)],
                )],
                mandate: Mandate {
                    name: "Zero-Emission Buildings MOU".to_string(),
                    short_name: "Zero-Emission Buildings MOU".to_string(),
                    target_year: 2030,
                    description: "65% heat pump market share by 2030".to_string(),
                    sales_target: "65% heat pump market share".to_string(),
                },
                utility_outlook: UtilityOutlook {
                    monthly_increase_min: 12.0,
                    monthly_increase_max: 25.0,
                    start_year: 2025,
                    source: "DCSEU analysis",
                },
            },
            Jurisdiction::Virginia => Self {
                jurisdiction,
                name: "Virginia".to_string(),
                programs: vec![Program::new(
                    "heehra-va",
                    "HEEHRA Program",
                    "Home Electrification and Appliance Rebates",
                    "https://www.energy.virginia.gov",
                    &[("lowIncomeCoverage", 100.0), ("moderateCap", 4000.0), ("moderateCoverage", 50.0)],
                )],
                mandate: Mandate {
                    name: "Zero-Emission Buildings MOU".to_string(),
                    short_name: "Zero-Emission Buildings MOU".to_string(),
                    target_year: 2030,
                    description: "Regional commitment to 65% heat pump adoption".to_string(),
                    sales_target: "65% heat pump market share".to_string(),
                },
                utility_outlook: UtilityOutlook {
                    monthly_increase_min: 12.0,
                    monthly_increase_max: 25.0,
                    start_year: 2025,
                    source: "VA SCC projections",
                },
            },
        }
    }
}

/// Federal incentive programs (IRA)
#[derive(Debug, Clone, Serialize)]
pub struct FederalIncentives {
    pub ira_25c: FederalProgram,
    pub homes: FederalProgram,
    pub heehr: FederalProgram,
}

#[derive(Debug, Clone, Serialize)]
pub struct FederalProgram {
    pub name: String,
    pub description: String,
    pub max_amount: f64,
    pub requirements: String,
    pub expiration_year: Option<i32>,
}

impl Default for FederalIncentives {
    fn default() -> Self {
        Self {
            ira_25c: FederalProgram {
                name: "IRA 25C Tax Credit".to_string(),
                description: "Inflation Reduction Act heat pump tax credit".to_string(),
                max_amount: 2000.0,
                requirements: "Must meet ENERGY STAR Most Efficient criteria".to_string(),
                expiration_year: Some(2032),
            },
            homes: FederalProgram {
                name: "HOMES Rebate Program".to_string(),
                description: "Whole-home efficiency rebates".to_string(),
                max_amount: 8000.0,
                requirements: "Must achieve measured energy savings".to_string(),
                expiration_year: None,
            },
            heehr: FederalProgram {
                name: "HEEHR Rebates".to_string(),
                description: "High-Efficiency Electric Home Rebate".to_string(),
                max_amount: 14000.0,
                requirements: "Low and moderate income households".to_string(),
                expiration_year: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_prefix_partition() {
        for prefix in 0..1000u16 {
            let expected = if (200..=205).contains(&prefix) {
                Some(Jurisdiction::DistrictOfColumbia)
            } else if (206..=219).contains(&prefix) {
                Some(Jurisdiction::Maryland)
            } else if (220..=246).contains(&prefix) {
                Some(Jurisdiction::Virginia)
            } else {
                None
            };
            assert_eq!(Jurisdiction::from_zip_prefix(prefix), expected, "prefix {}", prefix);
        }
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(Jurisdiction::from_zip_prefix(199), None);
        assert_eq!(Jurisdiction::from_zip_prefix(205), Some(Jurisdiction::DistrictOfColumbia));
        assert_eq!(Jurisdiction::from_zip_prefix(206), Some(Jurisdiction::Maryland));
        assert_eq!(Jurisdiction::from_zip_prefix(219), Some(Jurisdiction::Maryland));
        assert_eq!(Jurisdiction::from_zip_prefix(220), Some(Jurisdiction::Virginia));
        assert_eq!(Jurisdiction::from_zip_prefix(246), Some(Jurisdiction::Virginia));
        assert_eq!(Jurisdiction::from_zip_prefix(247), None);
    }

    #[test]
    fn test_builtin_profiles() {
        let md = JurisdictionProfile::builtin(Jurisdiction::Maryland);
        assert_eq!(md.mandate.target_year, 2029);
        assert_eq!(md.program("mea-residential").and_then(|p| p.amount("low")), Some(8000.0));

        let dc = JurisdictionProfile::builtin(Jurisdiction::DistrictOfColumbia);
        assert_eq!(dc.name, "Washington DC");
        assert_eq!(dc.utility_outlook.projected_increase(5), 1500.0);
    }
}
