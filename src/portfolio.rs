//! Aggregate demand and risk signals across captured leads

use crate::engine::{zip_prefix, CalculationResult};
use crate::lead::{LeadIndex, LeadRecord, LeadStatus};
use crate::profile::HouseholdProfile;
use crate::reference::Jurisdiction;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Risk score at or above which an asset counts as high risk
pub const HIGH_RISK_SCORE: f64 = 7.0;

/// Risk score at or above which an asset counts as critical
pub const CRITICAL_RISK_SCORE: f64 = 9.0;

/// Key used when a profile answer is missing
const UNKNOWN_KEY: &str = "unknown";

/// Point-in-time summary over a set of leads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Jurisdiction filter, `None` for the whole region
    pub region: Option<Jurisdiction>,

    // Demand
    pub total_leads: usize,
    pub leads_by_zip_prefix: BTreeMap<String, usize>,
    pub leads_by_heating_type: BTreeMap<String, usize>,
    pub leads_by_income_level: BTreeMap<String, usize>,

    // Risk
    pub avg_risk_score: f64,
    pub high_risk_assets: usize,
    pub critical_assets: usize,

    // Incentives
    pub avg_incentive_coverage: f64,
    pub total_incentive_value: f64,
    pub avg_net_cost: f64,

    // Conversion
    pub leads_to_consultation: usize,
    pub conversion_rate: f64,
}

impl PortfolioSnapshot {
    /// Summarize every lead. Empty input yields zero averages.
    pub fn from_leads(leads: &[LeadRecord], timestamp: DateTime<Utc>) -> Self {
        Self::build(leads.iter().map(Self::entry), None, timestamp)
    }

    /// Summarize raw calculations, e.g. a batch run, as if each were a new lead
    pub fn from_calculations(
        calculations: &[(HouseholdProfile, CalculationResult)],
        timestamp: DateTime<Utc>,
    ) -> Self {
        let indexes: Vec<LeadIndex> = calculations
            .iter()
            .map(|(_, result)| LeadIndex::from_result(result))
            .collect();
        let entries = calculations
            .iter()
            .zip(&indexes)
            .map(|((profile, _), index)| (profile, index, LeadStatus::New));
        Self::build(entries, None, timestamp)
    }

    /// Summarize the leads whose result landed in one jurisdiction
    pub fn for_region(leads: &[LeadRecord], region: Jurisdiction, timestamp: DateTime<Utc>) -> Self {
        let filtered = leads
            .iter()
            .filter(|l| l.index.state == region)
            .map(Self::entry);
        Self::build(filtered, Some(region), timestamp)
    }

    fn entry(lead: &LeadRecord) -> (&HouseholdProfile, &LeadIndex, LeadStatus) {
        (&lead.profile, &lead.index, lead.status)
    }

    fn build<'a>(
        entries: impl Iterator<Item = (&'a HouseholdProfile, &'a LeadIndex, LeadStatus)>,
        region: Option<Jurisdiction>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut snapshot = Self {
            timestamp,
            region,
            total_leads: 0,
            leads_by_zip_prefix: BTreeMap::new(),
            leads_by_heating_type: BTreeMap::new(),
            leads_by_income_level: BTreeMap::new(),
            avg_risk_score: 0.0,
            high_risk_assets: 0,
            critical_assets: 0,
            avg_incentive_coverage: 0.0,
            total_incentive_value: 0.0,
            avg_net_cost: 0.0,
            leads_to_consultation: 0,
            conversion_rate: 0.0,
        };

        let mut risk_sum = 0.0;
        let mut coverage_sum = 0.0;
        let mut net_cost_sum = 0.0;

        for (profile, index, status) in entries {
            snapshot.total_leads += 1;

            let prefix = zip_prefix(&profile.postal_code).unwrap_or(UNKNOWN_KEY);
            *snapshot.leads_by_zip_prefix.entry(prefix.to_string()).or_default() += 1;

            let heating = profile.heating_system.map_or(UNKNOWN_KEY, |h| h.id());
            *snapshot.leads_by_heating_type.entry(heating.to_string()).or_default() += 1;

            let income = profile.income_bracket.map_or(UNKNOWN_KEY, |b| b.id());
            *snapshot.leads_by_income_level.entry(income.to_string()).or_default() += 1;

            risk_sum += index.risk_score;
            if index.risk_score >= HIGH_RISK_SCORE {
                snapshot.high_risk_assets += 1;
            }
            if index.risk_score >= CRITICAL_RISK_SCORE {
                snapshot.critical_assets += 1;
            }

            coverage_sum += index.incentive_coverage;
            net_cost_sum += index.net_cost;
            snapshot.total_incentive_value += index.total_incentives;

            if matches!(status, LeadStatus::ConsultationRequested | LeadStatus::Converted) {
                snapshot.leads_to_consultation += 1;
            }
        }

        if snapshot.total_leads > 0 {
            let n = snapshot.total_leads as f64;
            snapshot.avg_risk_score = risk_sum / n;
            snapshot.avg_incentive_coverage = coverage_sum / n;
            snapshot.avg_net_cost = net_cost_sum / n;
            snapshot.conversion_rate = snapshot.leads_to_consultation as f64 / n;
        }

        snapshot
    }
}
