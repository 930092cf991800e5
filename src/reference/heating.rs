//! Current heating system archetypes and stranded-asset exposure

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Heating system currently installed in the home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeatingSystem {
    #[serde(rename = "gas-furnace")]
    GasFurnace,
    #[serde(rename = "oil-boiler")]
    OilBoiler,
    #[serde(rename = "electric-resistance")]
    ElectricResistance,
    #[serde(rename = "propane")]
    Propane,
    #[serde(rename = "heat-pump")]
    HeatPump,
    #[serde(rename = "other")]
    Other,
}

impl HeatingSystem {
    pub const ALL: [HeatingSystem; 6] = [
        HeatingSystem::GasFurnace,
        HeatingSystem::OilBoiler,
        HeatingSystem::ElectricResistance,
        HeatingSystem::Propane,
        HeatingSystem::HeatPump,
        HeatingSystem::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            HeatingSystem::GasFurnace => "gas-furnace",
            HeatingSystem::OilBoiler => "oil-boiler",
            HeatingSystem::ElectricResistance => "electric-resistance",
            HeatingSystem::Propane => "propane",
            HeatingSystem::HeatPump => "heat-pump",
            HeatingSystem::Other => "other",
        }
    }
}

impl fmt::Display for HeatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HeatingSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeatingSystem::ALL
            .into_iter()
            .find(|h| h.id() == s)
            .ok_or_else(|| format!("Unknown heating system: {}", s))
    }
}

/// Exposure of a heating system to forced early replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrandedAssetRisk {
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl StrandedAssetRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrandedAssetRisk::None => "NONE",
            StrandedAssetRisk::Low => "LOW",
            StrandedAssetRisk::High => "HIGH",
            StrandedAssetRisk::VeryHigh => "VERY HIGH",
            StrandedAssetRisk::Unknown => "UNKNOWN",
        }
    }

    /// Adjustment applied to the baseline asset risk score
    pub fn score_adjustment(&self) -> f64 {
        match self {
            StrandedAssetRisk::VeryHigh => 3.0,
            StrandedAssetRisk::High => 2.0,
            StrandedAssetRisk::Low => -2.0,
            StrandedAssetRisk::None => -4.0,
            StrandedAssetRisk::Unknown => 0.0,
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, StrandedAssetRisk::VeryHigh | StrandedAssetRisk::High)
    }
}

impl fmt::Display for StrandedAssetRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrandedAssetRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(StrandedAssetRisk::None),
            "LOW" => Ok(StrandedAssetRisk::Low),
            "HIGH" => Ok(StrandedAssetRisk::High),
            "VERY HIGH" => Ok(StrandedAssetRisk::VeryHigh),
            "UNKNOWN" => Ok(StrandedAssetRisk::Unknown),
            other => Err(format!("Unknown stranded asset risk: {}", other)),
        }
    }
}

/// Operating cost and mandate exposure of a heating system
#[derive(Debug, Clone, Serialize)]
pub struct HeatingArchetype {
    pub system: HeatingSystem,
    pub label: String,
    pub stranded_asset_risk: StrandedAssetRisk,
    pub avg_annual_cost: f64,
    pub mandate_impact: String,
}

impl HeatingArchetype {
    pub fn new(
        system: HeatingSystem,
        label: &str,
        stranded_asset_risk: StrandedAssetRisk,
        avg_annual_cost: f64,
        mandate_impact: &str,
    ) -> Self {
        Self {
            system,
            label: label.to_string(),
            stranded_asset_risk,
            avg_annual_cost,
            mandate_impact: mandate_impact.to_string(),
        }
    }

    /// Builtin archetype table
    pub fn builtin_table() -> Vec<Self> {
        use StrandedAssetRisk::*;
        vec![
            Self::new(HeatingSystem::GasFurnace, "Gas Furnace", High, 1800.0, "Must replace with heat pump by 2029"),
            Self::new(HeatingSystem::OilBoiler, "Oil Boiler", VeryHigh, 2400.0, "Priority replacement recommended"),
            Self::new(HeatingSystem::ElectricResistance, "Electric Baseboard/Resistance", Low, 2200.0, "High savings opportunity"),
            Self::new(HeatingSystem::Propane, "Propane Furnace", High, 2100.0, "Must replace with heat pump by 2029"),
            Self::new(HeatingSystem::HeatPump, "Existing Heat Pump", None, 1200.0, "Already compliant - upgrade opportunity"),
            Self::new(HeatingSystem::Other, "Other / Not Sure", Unknown, 1800.0, "Assessment recommended"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_labels() {
        assert_eq!(StrandedAssetRisk::VeryHigh.as_str(), "VERY HIGH");
        assert_eq!("VERY HIGH".parse::<StrandedAssetRisk>(), Ok(StrandedAssetRisk::VeryHigh));
        assert_eq!(
            serde_json::to_string(&StrandedAssetRisk::VeryHigh).unwrap(),
            "\"VERY HIGH\""
        );
    }

    #[test]
    fn test_score_adjustments() {
        assert_eq!(StrandedAssetRisk::VeryHigh.score_adjustment(), 3.0);
        assert_eq!(StrandedAssetRisk::None.score_adjustment(), -4.0);
        assert_eq!(StrandedAssetRisk::Unknown.score_adjustment(), 0.0);
    }

    #[test]
    fn test_heating_ids() {
        assert_eq!("heat-pump".parse::<HeatingSystem>(), Ok(HeatingSystem::HeatPump));
        assert!("wood-stove".parse::<HeatingSystem>().is_err());
    }
}
