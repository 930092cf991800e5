//! Calculation output structures

use super::assessment::{Recommendation, TimingRisk};
use crate::reference::{Jurisdiction, StrandedAssetRisk, Urgency};
use serde::{Deserialize, Serialize};

/// Full result of one calculation.
///
/// Serialized in camelCase so the JSON matches what the report and lead
/// storage consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    // Financial summary
    pub total_incentives: f64,
    pub estimated_cost: f64,
    pub net_cost: f64,
    pub annual_savings: f64,
    pub ten_year_savings: f64,
    /// `None` when savings never recover the net cost
    pub payback_years: Option<u32>,

    pub incentive_breakdown: IncentiveBreakdown,
    pub location_data: LocationData,
    pub risk_assessment: RiskAssessment,
    /// Internal lead-scoring metrics
    pub intelligence: Intelligence,
    pub utility_projections: UtilityProjections,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveBreakdown {
    pub state: f64,
    pub utility: f64,
    pub federal: f64,
    pub total: f64,
    /// Whole percent of estimated cost; may exceed 100
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    /// Resolved jurisdiction, or the fallback when `resolved` is false
    pub state: Jurisdiction,
    pub state_name: String,
    /// Utility id, `"unknown"` when none resolved
    pub utility: String,
    pub utility_name: String,
    pub mandate_deadline: i32,
    pub mandate_description: String,
    pub resolved: bool,
    /// Utility territories from different jurisdictions claimed the zip prefix
    pub ambiguous_utility: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub stranded_asset_risk: StrandedAssetRisk,
    pub urgency_level: Urgency,
    pub years_until_mandate: u32,
    pub recommendation: String,
    pub recommendation_kind: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intelligence {
    pub incremental_net_benefit: f64,
    pub incentive_coverage_percent: f64,
    /// 1-10
    pub asset_risk_score: f64,
    pub mandate_timing_risk: TimingRisk,
    pub projected_utility_increase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityProjections {
    pub current_annual_cost: f64,
    /// Five-year cumulative increase
    pub projected_increase: f64,
    pub heat_pump_annual_cost: f64,
    pub savings_vs_projected: f64,
}

/// Flat record for CSV output of batch runs
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub id: String,
    pub postal_code: String,
    pub state: String,
    pub utility: String,
    pub resolved: bool,
    pub state_rebate: f64,
    pub utility_rebate: f64,
    pub federal_credit: f64,
    pub total_incentives: f64,
    pub estimated_cost: f64,
    pub net_cost: f64,
    pub annual_savings: f64,
    pub payback_years: Option<u32>,
    pub coverage_pct: f64,
    pub asset_risk_score: f64,
    pub mandate_timing_risk: String,
    pub recommendation: String,
}

impl ResultRow {
    pub fn from_result(id: &str, postal_code: &str, result: &CalculationResult) -> Self {
        Self {
            id: id.to_string(),
            postal_code: postal_code.to_string(),
            state: result.location_data.state.abbreviation().to_string(),
            utility: result.location_data.utility.clone(),
            resolved: result.location_data.resolved,
            state_rebate: result.incentive_breakdown.state,
            utility_rebate: result.incentive_breakdown.utility,
            federal_credit: result.incentive_breakdown.federal,
            total_incentives: result.total_incentives,
            estimated_cost: result.estimated_cost,
            net_cost: result.net_cost,
            annual_savings: result.annual_savings,
            payback_years: result.payback_years,
            coverage_pct: result.incentive_breakdown.coverage,
            asset_risk_score: result.intelligence.asset_risk_score,
            mandate_timing_risk: result.intelligence.mandate_timing_risk.as_str().to_string(),
            recommendation: result.risk_assessment.recommendation_kind.id().to_string(),
        }
    }
}
