//! Installation cost, savings, payback and stranded-asset risk

use crate::reference::{HeatingSystem, HomeArchetype, Jurisdiction, JurisdictionProfile, StrandedAssetRisk, Urgency};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base install cost when the home type is unknown
pub const DEFAULT_BASE_INSTALL_COST: f64 = 15_000.0;

/// Floor on a square-footage adjusted estimate
pub const MIN_INSTALL_COST: f64 = 8_000.0;

/// $1,000 per 500 sq ft of deviation from the archetype
pub const SQ_FT_STEP: f64 = 500.0;
pub const COST_PER_SQ_FT_STEP: f64 = 1_000.0;

/// Annual heating cost when the heating system is unknown
pub const DEFAULT_ANNUAL_HEATING_COST: f64 = 1_800.0;

pub const HEAT_PUMP_UPGRADE_SAVINGS: f64 = 200.0;
pub const MIN_ANNUAL_SAVINGS: f64 = 400.0;

pub const BASELINE_RISK_SCORE: f64 = 5.0;
pub const MIN_RISK_SCORE: f64 = 1.0;
pub const MAX_RISK_SCORE: f64 = 10.0;

/// Horizon for the incremental net benefit metric
pub const BENEFIT_HORIZON_YEARS: f64 = 15.0;

/// Horizon for utility cost projections
pub const PROJECTION_YEARS: u32 = 5;

/// Remaining useful life at or below which mandate timing risk is high
pub const TIMING_RISK_YEARS: u32 = 4;

/// Estimated installation cost.
///
/// Square footage only adjusts the estimate when the home archetype is known
/// and the figure is finite; the $8,000 floor applies only to adjusted estimates.
pub fn installation_cost(home: Option<&HomeArchetype>, square_feet: Option<f64>) -> f64 {
    match (home, square_feet) {
        (Some(home), Some(sq_ft)) if sq_ft.is_finite() => {
            let adjustment = (sq_ft - home.avg_sq_ft) / SQ_FT_STEP * COST_PER_SQ_FT_STEP;
            (home.base_install_cost + adjustment).max(MIN_INSTALL_COST)
        }
        (Some(home), _) => home.base_install_cost,
        (None, _) => DEFAULT_BASE_INSTALL_COST,
    }
}

/// Expected annual operating savings after switching to a heat pump
pub fn annual_savings(system: Option<HeatingSystem>, current_cost: f64, heat_pump_cost: f64) -> f64 {
    let base = current_cost - heat_pump_cost;

    match system {
        Some(HeatingSystem::OilBoiler) | Some(HeatingSystem::Propane) => base * 1.3,
        Some(HeatingSystem::ElectricResistance) => base * 1.5,
        Some(HeatingSystem::HeatPump) => HEAT_PUMP_UPGRADE_SAVINGS,
        _ => base.max(MIN_ANNUAL_SAVINGS),
    }
}

/// Whole years to recover the net cost.
///
/// Zero when nothing is owed; `None` when savings never recover a positive net cost.
pub fn payback_years(net_cost: f64, annual_savings: f64) -> Option<u32> {
    if net_cost <= 0.0 {
        Some(0)
    } else if annual_savings <= 0.0 {
        None
    } else {
        Some((net_cost / annual_savings).ceil() as u32)
    }
}

/// Stranded-asset risk score in [1, 10]
pub fn risk_score(risk: StrandedAssetRisk, urgency: Urgency) -> f64 {
    let score = BASELINE_RISK_SCORE + risk.score_adjustment() + urgency.score_adjustment();
    score.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE)
}

/// Simplified 15-year value capture, floored at zero
pub fn incremental_net_benefit(annual_savings: f64, net_cost: f64) -> f64 {
    (annual_savings * BENEFIT_HORIZON_YEARS - net_cost).max(0.0)
}

/// Incentives as a whole percentage of the estimated cost (not clamped)
pub fn coverage_percent(total_incentives: f64, estimated_cost: f64) -> f64 {
    if estimated_cost <= 0.0 {
        return 0.0;
    }
    (total_incentives / estimated_cost * 100.0).round()
}

/// Risk that the mandate arrives before the system is due for replacement anyway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingRisk {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MODERATE")]
    Moderate,
}

impl TimingRisk {
    /// HIGH when the remaining useful life is at most four years.
    /// An unknown age bracket is MODERATE.
    pub fn from_years_remaining(years_remaining: Option<u32>) -> Self {
        match years_remaining {
            Some(years) if years <= TIMING_RISK_YEARS => TimingRisk::High,
            _ => TimingRisk::Moderate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimingRisk::High => "HIGH",
            TimingRisk::Moderate => "MODERATE",
        }
    }
}

impl fmt::Display for TimingRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation category, selected from a first-match decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    HeatPumpUpgrade,
    EndOfLife,
    StrandedAsset,
    MarylandIncentives,
    OptimalTiming,
}

impl Recommendation {
    /// Evaluated top-down; reordering the arms changes results
    pub fn select(
        system: Option<HeatingSystem>,
        risk: StrandedAssetRisk,
        urgency: Urgency,
        jurisdiction: Jurisdiction,
    ) -> Self {
        if system == Some(HeatingSystem::HeatPump) {
            Recommendation::HeatPumpUpgrade
        } else if urgency.is_end_of_life() {
            Recommendation::EndOfLife
        } else if risk.is_elevated() {
            Recommendation::StrandedAsset
        } else if jurisdiction == Jurisdiction::Maryland {
            Recommendation::MarylandIncentives
        } else {
            Recommendation::OptimalTiming
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Recommendation::HeatPumpUpgrade => "heat-pump-upgrade",
            Recommendation::EndOfLife => "end-of-life",
            Recommendation::StrandedAsset => "stranded-asset",
            Recommendation::MarylandIncentives => "maryland-incentives",
            Recommendation::OptimalTiming => "optimal-timing",
        }
    }

    /// Message shown to the household, referencing the jurisdiction's mandate
    pub fn message(&self, profile: &JurisdictionProfile) -> String {
        let mandate = &profile.mandate;
        match self {
            Recommendation::HeatPumpUpgrade => "Your current heat pump may qualify for upgrade incentives. \
                Consider cold-climate models for improved performance."
                .to_string(),
            Recommendation::EndOfLife => format!(
                "URGENT: Your system is near end-of-life. Act now to maximize incentives before the \
                 {} {} mandate increases demand and costs.",
                profile.name, mandate.target_year
            ),
            Recommendation::StrandedAsset => format!(
                "Your fossil fuel system faces stranded asset risk under the {} {} mandate. \
                 Early conversion maximizes incentive capture and avoids emergency replacement costs.",
                mandate.target_year, mandate.short_name
            ),
            Recommendation::MarylandIncentives => format!(
                "{} offers the highest incentives in the DMV. With the {} {} mandate approaching, \
                 early adopters benefit from maximum rebates and contractor availability.",
                profile.name, mandate.target_year, mandate.short_name
            ),
            Recommendation::OptimalTiming => "Now is an optimal time to convert. Current incentives cover \
                a significant portion of installation costs, and acting early ensures contractor availability."
                .to_string(),
        }
    }
}
