//! Rebate calculator: profile in, full assessment out

use super::assessment::{
    annual_savings, coverage_percent, incremental_net_benefit, installation_cost, payback_years,
    risk_score, Recommendation, TimingRisk, DEFAULT_ANNUAL_HEATING_COST, PROJECTION_YEARS,
};
use super::incentives::calculate_incentives;
use super::location::{resolve_location, LocationResolution};
use super::result::{
    CalculationResult, IncentiveBreakdown, Intelligence, LocationData, RiskAssessment,
    UtilityProjections,
};
use crate::profile::HouseholdProfile;
use crate::reference::{
    Jurisdiction, JurisdictionProfile, ReferenceTables, StrandedAssetRisk, Urgency,
};
use chrono::Datelike;
use log::debug;
use std::borrow::Cow;

/// Configuration for a calculator instance
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    /// Year `years_until_mandate` is measured from
    pub as_of_year: i32,

    /// Assumed annual operating cost of a heat pump
    pub heat_pump_annual_cost: f64,

    /// Jurisdiction used for totals when a zip is outside the service area
    pub fallback_jurisdiction: Jurisdiction,
}

impl CalculatorConfig {
    /// Default configuration pinned to a specific year
    pub fn for_year(as_of_year: i32) -> Self {
        Self {
            as_of_year,
            ..Self::default()
        }
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            as_of_year: chrono::Local::now().year(),
            heat_pump_annual_cost: 1200.0,
            fallback_jurisdiction: Jurisdiction::Maryland,
        }
    }
}

/// Main calculation engine.
///
/// Holds read-only tables and config, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct RebateCalculator {
    tables: ReferenceTables,
    config: CalculatorConfig,
}

impl RebateCalculator {
    pub fn new(tables: ReferenceTables, config: CalculatorConfig) -> Self {
        Self { tables, config }
    }

    /// Calculator over the builtin tables
    pub fn builtin(config: CalculatorConfig) -> Self {
        Self::new(ReferenceTables::builtin(), config)
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Resolve a zip code to jurisdiction and utility
    pub fn resolve_location(&self, postal_code: &str) -> LocationResolution<'_> {
        resolve_location(&self.tables, postal_code)
    }

    fn jurisdiction_profile(&self, jurisdiction: Jurisdiction) -> Cow<'_, JurisdictionProfile> {
        match self.tables.jurisdiction(jurisdiction) {
            Some(profile) => Cow::Borrowed(profile),
            None => {
                debug!("No table entry for {}, using builtin profile", jurisdiction);
                Cow::Owned(JurisdictionProfile::builtin(jurisdiction))
            }
        }
    }

    /// Compute incentives, costs, savings and risk for a household.
    ///
    /// Never fails: unknown ids and unsupported zips degrade to the
    /// documented defaults.
    pub fn compute_rebates(&self, profile: &HouseholdProfile) -> CalculationResult {
        let location = self.resolve_location(&profile.postal_code);
        let jurisdiction = location.jurisdiction.unwrap_or_else(|| {
            debug!(
                "Zip {} outside service area, falling back to {}",
                profile.postal_code, self.config.fallback_jurisdiction
            );
            self.config.fallback_jurisdiction
        });
        let state = self.jurisdiction_profile(jurisdiction);

        let home = profile.home_type.and_then(|h| self.tables.home(h));
        let heating = profile.heating_system.and_then(|h| self.tables.heating(h));
        let age = profile.system_age.and_then(|a| self.tables.age(a));

        // Incentives
        let incentives = calculate_incentives(
            &self.tables,
            jurisdiction,
            location.utility,
            profile.income_bracket,
            profile.home_type,
        );
        let total_incentives = incentives.total();

        // Costs
        let estimated_cost = installation_cost(home, profile.usable_square_feet());
        let net_cost = (estimated_cost - total_incentives).max(0.0);

        // Savings
        let heat_pump_cost = self.config.heat_pump_annual_cost;
        let current_annual_cost = heating.map_or(DEFAULT_ANNUAL_HEATING_COST, |h| h.avg_annual_cost);
        let annual = annual_savings(profile.heating_system, current_annual_cost, heat_pump_cost);

        // Risk
        let stranded_asset_risk = heating.map_or(StrandedAssetRisk::Unknown, |h| h.stranded_asset_risk);
        let urgency = age.map_or(Urgency::Unknown, |a| a.urgency);
        let recommendation = Recommendation::select(
            profile.heating_system,
            stranded_asset_risk,
            urgency,
            jurisdiction,
        );
        let years_until_mandate = (state.mandate.target_year - self.config.as_of_year).max(0) as u32;

        // Projections
        let projected_increase = state.utility_outlook.projected_increase(PROJECTION_YEARS);
        let coverage = coverage_percent(total_incentives, estimated_cost);

        CalculationResult {
            total_incentives,
            estimated_cost,
            net_cost,
            annual_savings: annual,
            ten_year_savings: annual * 10.0,
            payback_years: payback_years(net_cost, annual),
            incentive_breakdown: IncentiveBreakdown {
                state: incentives.state,
                utility: incentives.utility,
                federal: incentives.federal,
                total: total_incentives,
                coverage,
            },
            location_data: LocationData {
                state: jurisdiction,
                state_name: state.name.clone(),
                utility: location.utility.map_or_else(|| "unknown".to_string(), |u| u.id.clone()),
                utility_name: location
                    .utility
                    .map_or_else(|| "Unknown Utility".to_string(), |u| u.name.clone()),
                mandate_deadline: state.mandate.target_year,
                mandate_description: state.mandate.description.clone(),
                resolved: location.is_supported(),
                ambiguous_utility: location.ambiguous,
            },
            risk_assessment: RiskAssessment {
                stranded_asset_risk,
                urgency_level: urgency,
                years_until_mandate,
                recommendation: recommendation.message(&state),
                recommendation_kind: recommendation,
            },
            intelligence: Intelligence {
                incremental_net_benefit: incremental_net_benefit(annual, net_cost),
                incentive_coverage_percent: coverage,
                asset_risk_score: risk_score(stranded_asset_risk, urgency),
                mandate_timing_risk: TimingRisk::from_years_remaining(age.map(|a| a.years_remaining)),
                projected_utility_increase: projected_increase,
            },
            utility_projections: UtilityProjections {
                current_annual_cost,
                projected_increase,
                heat_pump_annual_cost: heat_pump_cost,
                savings_vs_projected: current_annual_cost + projected_increase
                    - heat_pump_cost * PROJECTION_YEARS as f64,
            },
        }
    }
}
