//! Income brackets and heating-system age brackets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Household income bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IncomeBracket {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "middle")]
    Middle,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "prefer-not-say")]
    PreferNotToSay,
}

impl IncomeBracket {
    pub const ALL: [IncomeBracket; 5] = [
        IncomeBracket::Low,
        IncomeBracket::Moderate,
        IncomeBracket::Middle,
        IncomeBracket::High,
        IncomeBracket::PreferNotToSay,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            IncomeBracket::Low => "low",
            IncomeBracket::Moderate => "moderate",
            IncomeBracket::Middle => "middle",
            IncomeBracket::High => "high",
            IncomeBracket::PreferNotToSay => "prefer-not-say",
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for IncomeBracket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncomeBracket::ALL
            .into_iter()
            .find(|b| b.id() == s)
            .ok_or_else(|| format!("Unknown income bracket: {}", s))
    }
}

/// Rebate terms attached to an income bracket
#[derive(Debug, Clone, Serialize)]
pub struct IncomeArchetype {
    pub bracket: IncomeBracket,
    pub label: String,
    pub percent_ami: String,
    /// Maryland Energy Administration rebate
    pub state_rebate: f64,
    /// Virginia HEEHRA share of project cost covered (0, 50 or 100)
    pub heehra_coverage_pct: u8,
    pub description: String,
}

impl IncomeArchetype {
    pub fn new(
        bracket: IncomeBracket,
        label: &str,
        percent_ami: &str,
        state_rebate: f64,
        heehra_coverage_pct: u8,
        description: &str,
    ) -> Self {
        Self {
            bracket,
            label: label.to_string(),
            percent_ami: percent_ami.to_string(),
            state_rebate,
            heehra_coverage_pct,
            description: description.to_string(),
        }
    }

    pub fn builtin_table() -> Vec<Self> {
        vec![
            Self::new(IncomeBracket::Low, "Under $50,000", "<80%", 8000.0, 100, "Maximum incentives available"),
            Self::new(IncomeBracket::Moderate, "$50,000 - $100,000", "80-120%", 4000.0, 50, "Significant incentives available"),
            Self::new(IncomeBracket::Middle, "$100,000 - $150,000", "120-150%", 2000.0, 0, "Standard rebates available"),
            Self::new(IncomeBracket::High, "Over $150,000", ">150%", 2000.0, 0, "Federal tax credits available"),
            Self::new(IncomeBracket::PreferNotToSay, "Prefer not to say", "Unknown", 2000.0, 0, "Conservative estimate shown"),
        ]
    }
}

/// Age of the currently installed heating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemAge {
    #[serde(rename = "0-5")]
    UpTo5,
    #[serde(rename = "6-10")]
    From6To10,
    #[serde(rename = "11-15")]
    From11To15,
    #[serde(rename = "16-20")]
    From16To20,
    #[serde(rename = "20+")]
    Over20,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SystemAge {
    pub const ALL: [SystemAge; 6] = [
        SystemAge::UpTo5,
        SystemAge::From6To10,
        SystemAge::From11To15,
        SystemAge::From16To20,
        SystemAge::Over20,
        SystemAge::Unknown,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SystemAge::UpTo5 => "0-5",
            SystemAge::From6To10 => "6-10",
            SystemAge::From11To15 => "11-15",
            SystemAge::From16To20 => "16-20",
            SystemAge::Over20 => "20+",
            SystemAge::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SystemAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SystemAge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemAge::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| format!("Unknown system age: {}", s))
    }
}

/// Replacement urgency implied by system age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "LOW",
            Urgency::Moderate => "MODERATE",
            Urgency::High => "HIGH",
            Urgency::VeryHigh => "VERY HIGH",
            Urgency::Critical => "CRITICAL",
            Urgency::Unknown => "UNKNOWN",
        }
    }

    /// Adjustment applied to the baseline asset risk score
    pub fn score_adjustment(&self) -> f64 {
        match self {
            Urgency::Critical => 2.0,
            Urgency::VeryHigh => 1.5,
            Urgency::High => 1.0,
            Urgency::Low => -1.0,
            Urgency::Moderate | Urgency::Unknown => 0.0,
        }
    }

    /// System is at or near end of life
    pub fn is_end_of_life(&self) -> bool {
        matches!(self, Urgency::Critical | Urgency::VeryHigh)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Urgency::Low),
            "MODERATE" => Ok(Urgency::Moderate),
            "HIGH" => Ok(Urgency::High),
            "VERY HIGH" => Ok(Urgency::VeryHigh),
            "CRITICAL" => Ok(Urgency::Critical),
            "UNKNOWN" => Ok(Urgency::Unknown),
            other => Err(format!("Unknown urgency: {}", other)),
        }
    }
}

/// Urgency and remaining life for an age bracket
#[derive(Debug, Clone, Serialize)]
pub struct AgeArchetype {
    pub age: SystemAge,
    pub label: String,
    pub urgency: Urgency,
    /// Estimated years of useful life left
    pub years_remaining: u32,
}

impl AgeArchetype {
    pub fn new(age: SystemAge, label: &str, urgency: Urgency, years_remaining: u32) -> Self {
        Self {
            age,
            label: label.to_string(),
            urgency,
            years_remaining,
        }
    }

    pub fn builtin_table() -> Vec<Self> {
        vec![
            Self::new(SystemAge::UpTo5, "0-5 years", Urgency::Low, 15),
            Self::new(SystemAge::From6To10, "6-10 years", Urgency::Moderate, 10),
            Self::new(SystemAge::From11To15, "11-15 years", Urgency::High, 5),
            Self::new(SystemAge::From16To20, "16-20 years", Urgency::VeryHigh, 2),
            Self::new(SystemAge::Over20, "Over 20 years", Urgency::Critical, 0),
            Self::new(SystemAge::Unknown, "Not sure", Urgency::Unknown, 10),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_ids() {
        for bracket in IncomeBracket::ALL {
            assert_eq!(bracket.id().parse::<IncomeBracket>(), Ok(bracket));
        }
        assert!("rich".parse::<IncomeBracket>().is_err());
    }

    #[test]
    fn test_age_ids() {
        assert_eq!("20+".parse::<SystemAge>(), Ok(SystemAge::Over20));
        assert_eq!("unknown".parse::<SystemAge>(), Ok(SystemAge::Unknown));
    }

    #[test]
    fn test_urgency_adjustments() {
        assert_eq!(Urgency::Critical.score_adjustment(), 2.0);
        assert_eq!(Urgency::VeryHigh.score_adjustment(), 1.5);
        assert_eq!(Urgency::Moderate.score_adjustment(), 0.0);
        assert!(Urgency::VeryHigh.is_end_of_life());
        assert!(!Urgency::High.is_end_of_life());
    }

    #[test]
    fn test_state_rebate_descends_with_income() {
        let table = IncomeArchetype::builtin_table();
        let rebates: Vec<f64> = [
            IncomeBracket::Low,
            IncomeBracket::Moderate,
            IncomeBracket::Middle,
            IncomeBracket::High,
        ]
        .iter()
        .map(|b| table.iter().find(|a| a.bracket == *b).unwrap().state_rebate)
        .collect();

        assert!(rebates.windows(2).all(|w| w[0] >= w[1]));
    }
}
