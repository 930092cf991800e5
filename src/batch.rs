//! Batch runner for many household profiles
//!
//! Loads reference tables once and reuses them across calculations. Batches
//! run in parallel; results keep input order.

use crate::engine::{CalculationResult, CalculatorConfig, RebateCalculator, ResultRow};
use crate::profile::{HouseholdProfile, ProfileRecord};
use crate::reference::{ReferenceLoadError, ReferenceTables};
use rayon::prelude::*;
use std::path::Path;

/// Pre-loaded runner for batches of calculations
///
/// # Example
/// ```ignore
/// let runner = BatchRunner::from_csv(CalculatorConfig::default())?;
/// let results = runner.run_batch(&profiles);
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    calculator: RebateCalculator,
}

impl BatchRunner {
    /// Runner over builtin tables
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            calculator: RebateCalculator::builtin(config),
        }
    }

    /// Runner over tables loaded from data/reference/
    pub fn from_csv(config: CalculatorConfig) -> Result<Self, ReferenceLoadError> {
        Ok(Self::with_tables(ReferenceTables::from_csv()?, config))
    }

    /// Runner over tables loaded from a specific directory
    pub fn from_csv_path(path: &Path, config: CalculatorConfig) -> Result<Self, ReferenceLoadError> {
        Ok(Self::with_tables(ReferenceTables::from_csv_path(path)?, config))
    }

    pub fn with_tables(tables: ReferenceTables, config: CalculatorConfig) -> Self {
        Self {
            calculator: RebateCalculator::new(tables, config),
        }
    }

    pub fn calculator(&self) -> &RebateCalculator {
        &self.calculator
    }

    pub fn run(&self, profile: &HouseholdProfile) -> CalculationResult {
        self.calculator.compute_rebates(profile)
    }

    /// Calculate every profile in parallel, preserving input order
    pub fn run_batch(&self, profiles: &[HouseholdProfile]) -> Vec<CalculationResult> {
        profiles
            .par_iter()
            .map(|p| self.calculator.compute_rebates(p))
            .collect()
    }

    /// Calculate identified profiles into flat output rows
    pub fn run_records(&self, records: &[ProfileRecord]) -> Vec<(ResultRow, CalculationResult)> {
        records
            .par_iter()
            .map(|record| {
                let result = self.calculator.compute_rebates(&record.profile);
                let row = ResultRow::from_result(&record.id, &record.profile.postal_code, &result);
                (row, result)
            })
            .collect()
    }

    /// Run one profile under several configurations (e.g. different as-of years)
    pub fn run_scenarios(&self, profile: &HouseholdProfile, configs: &[CalculatorConfig]) -> Vec<CalculationResult> {
        configs
            .iter()
            .map(|config| {
                RebateCalculator::new(self.calculator.tables().clone(), config.clone()).compute_rebates(profile)
            })
            .collect()
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::load_profiles_from_reader;
    use crate::reference::{HeatingSystem, HomeType, IncomeBracket, SystemAge};

    fn profiles() -> Vec<HouseholdProfile> {
        let mut profiles = Vec::new();
        for zip in ["21201", "20001", "22201", "00000"] {
            for heating in HeatingSystem::ALL {
                profiles.push(HouseholdProfile::new(
                    zip,
                    HomeType::Townhouse,
                    heating,
                    SystemAge::From11To15,
                    IncomeBracket::Moderate,
                ));
            }
        }
        profiles
    }

    #[test]
    fn test_batch_matches_sequential() {
        let runner = BatchRunner::new(CalculatorConfig::for_year(2025));
        let profiles = profiles();

        let parallel = runner.run_batch(&profiles);
        let sequential: Vec<_> = profiles.iter().map(|p| runner.run(p)).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_run_records_keeps_ids() {
        let csv = "\
id,postal_code,home_type,square_feet,heating_system,system_age,income_bracket
h1,21201,single-family,3000,gas-furnace,20+,low
h2,99999,condo,,oil-boiler,6-10,high
";
        let records = load_profiles_from_reader(csv.as_bytes()).unwrap();
        let runner = BatchRunner::new(CalculatorConfig::for_year(2025));
        let rows = runner.run_records(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0.id, "h1");
        assert_eq!(rows[0].0.estimated_cost, 17_000.0);
        assert!(rows[0].0.resolved);
        assert_eq!(rows[1].0.id, "h2");
        assert!(!rows[1].0.resolved);
        assert_eq!(rows[1].0.utility, "unknown");
    }

    #[test]
    fn test_scenarios_by_year() {
        let runner = BatchRunner::default();
        let profile = HouseholdProfile::new(
            "21201",
            HomeType::SingleFamily,
            HeatingSystem::GasFurnace,
            SystemAge::Over20,
            IncomeBracket::Low,
        );
        let configs: Vec<_> = [2025, 2027, 2031].into_iter().map(CalculatorConfig::for_year).collect();
        let years: Vec<u32> = runner
            .run_scenarios(&profile, &configs)
            .iter()
            .map(|r| r.risk_assessment.years_until_mandate)
            .collect();

        assert_eq!(years, vec![4, 2, 0]);
    }
}
