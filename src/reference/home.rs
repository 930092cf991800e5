//! Home archetypes used to scale installation cost

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of home being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HomeType {
    #[serde(rename = "single-family")]
    SingleFamily,
    #[serde(rename = "townhouse")]
    Townhouse,
    #[serde(rename = "condo")]
    Condo,
    #[serde(rename = "multi-family")]
    MultiFamily,
}

impl HomeType {
    pub const ALL: [HomeType; 4] = [
        HomeType::SingleFamily,
        HomeType::Townhouse,
        HomeType::Condo,
        HomeType::MultiFamily,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            HomeType::SingleFamily => "single-family",
            HomeType::Townhouse => "townhouse",
            HomeType::Condo => "condo",
            HomeType::MultiFamily => "multi-family",
        }
    }
}

impl fmt::Display for HomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HomeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeType::ALL
            .into_iter()
            .find(|h| h.id() == s)
            .ok_or_else(|| format!("Unknown home type: {}", s))
    }
}

/// Default installation cost assumptions for a home type
#[derive(Debug, Clone, Serialize)]
pub struct HomeArchetype {
    pub home_type: HomeType,
    pub label: String,
    pub base_install_cost: f64,
    pub avg_sq_ft: f64,
}

impl HomeArchetype {
    pub fn new(home_type: HomeType, label: &str, base_install_cost: f64, avg_sq_ft: f64) -> Self {
        Self {
            home_type,
            label: label.to_string(),
            base_install_cost,
            avg_sq_ft,
        }
    }

    /// Builtin archetype table
    pub fn builtin_table() -> Vec<Self> {
        vec![
            Self::new(HomeType::SingleFamily, "Single Family Home", 15_000.0, 2_000.0),
            Self::new(HomeType::Townhouse, "Townhouse", 12_000.0, 1_600.0),
            Self::new(HomeType::Condo, "Condo/Apartment", 10_000.0, 1_200.0),
            Self::new(HomeType::MultiFamily, "Multi-Family (2-4 units)", 18_000.0, 3_000.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_type_ids_round_trip() {
        for home in HomeType::ALL {
            assert_eq!(home.id().parse::<HomeType>(), Ok(home));
        }
        assert!("mansion".parse::<HomeType>().is_err());
    }

    #[test]
    fn test_builtin_table_covers_every_type() {
        let table = HomeArchetype::builtin_table();
        for home in HomeType::ALL {
            assert!(table.iter().any(|a| a.home_type == home));
        }
    }
}
