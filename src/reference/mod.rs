//! Reference data tables: jurisdictions, programs, utilities and archetypes
//!
//! Every lookup returns an `Option`; the engine applies a documented
//! conservative default on a miss instead of failing.

mod jurisdiction;
mod utility;
mod home;
mod heating;
mod household;
pub mod loader;

pub use jurisdiction::{
    FederalIncentives, FederalProgram, Jurisdiction, JurisdictionProfile, Mandate, Program,
    UtilityOutlook,
};
pub use utility::{ProgramParticipation, UtilityTable, UtilityTerritory};
pub use home::{HomeArchetype, HomeType};
pub use heating::{HeatingArchetype, HeatingSystem, StrandedAssetRisk};
pub use household::{AgeArchetype, IncomeArchetype, IncomeBracket, SystemAge, Urgency};
pub use loader::{LoadedReference, ReferenceLoadError};

use std::path::Path;

/// Container for all reference tables the calculator reads
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub jurisdictions: Vec<JurisdictionProfile>,
    pub federal: FederalIncentives,
    pub utilities: UtilityTable,
    pub home_types: Vec<HomeArchetype>,
    pub heating_systems: Vec<HeatingArchetype>,
    pub income_brackets: Vec<IncomeArchetype>,
    pub system_ages: Vec<AgeArchetype>,
}

impl ReferenceTables {
    /// Compiled-in tables
    pub fn builtin() -> Self {
        Self {
            jurisdictions: Jurisdiction::ALL
                .into_iter()
                .map(JurisdictionProfile::builtin)
                .collect(),
            federal: FederalIncentives::default(),
            utilities: UtilityTable::builtin(),
            home_types: HomeArchetype::builtin_table(),
            heating_systems: HeatingArchetype::builtin_table(),
            income_brackets: IncomeArchetype::builtin_table(),
            system_ages: AgeArchetype::builtin_table(),
        }
    }

    /// Load archetype and utility tables from CSV files in the default location (data/reference/)
    pub fn from_csv() -> Result<Self, ReferenceLoadError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_REFERENCE_PATH))
    }

    /// Load archetype and utility tables from CSV files in a specific directory.
    /// Jurisdiction and federal program data stay builtin.
    pub fn from_csv_path(path: &Path) -> Result<Self, ReferenceLoadError> {
        let loaded = LoadedReference::load_from(path)?;
        Ok(Self::from_loaded(loaded))
    }

    pub fn from_loaded(loaded: LoadedReference) -> Self {
        Self {
            utilities: UtilityTable::new(loaded.utility_territories),
            home_types: loaded.home_types,
            heating_systems: loaded.heating_systems,
            income_brackets: loaded.income_brackets,
            system_ages: loaded.system_ages,
            ..Self::builtin()
        }
    }

    pub fn jurisdiction(&self, jurisdiction: Jurisdiction) -> Option<&JurisdictionProfile> {
        self.jurisdictions.iter().find(|j| j.jurisdiction == jurisdiction)
    }

    pub fn home(&self, home_type: HomeType) -> Option<&HomeArchetype> {
        self.home_types.iter().find(|h| h.home_type == home_type)
    }

    pub fn heating(&self, system: HeatingSystem) -> Option<&HeatingArchetype> {
        self.heating_systems.iter().find(|h| h.system == system)
    }

    pub fn income(&self, bracket: IncomeBracket) -> Option<&IncomeArchetype> {
        self.income_brackets.iter().find(|b| b.bracket == bracket)
    }

    pub fn age(&self, age: SystemAge) -> Option<&AgeArchetype> {
        self.system_ages.iter().find(|a| a.age == age)
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let tables = ReferenceTables::builtin();

        assert_eq!(tables.home(HomeType::SingleFamily).unwrap().base_install_cost, 15_000.0);
        assert_eq!(
            tables.heating(HeatingSystem::OilBoiler).unwrap().stranded_asset_risk,
            StrandedAssetRisk::VeryHigh
        );
        assert_eq!(tables.income(IncomeBracket::Moderate).unwrap().heehra_coverage_pct, 50);
        assert_eq!(tables.age(SystemAge::Over20).unwrap().urgency, Urgency::Critical);
        assert_eq!(tables.federal.ira_25c.max_amount, 2000.0);
        for j in Jurisdiction::ALL {
            assert!(tables.jurisdiction(j).is_some());
        }
    }

    #[test]
    fn test_csv_tables_match_builtin() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(loader::DEFAULT_REFERENCE_PATH);
        let from_csv = ReferenceTables::from_csv_path(&dir).unwrap();
        let builtin = ReferenceTables::builtin();

        for home in HomeType::ALL {
            assert_eq!(
                from_csv.home(home).unwrap().base_install_cost,
                builtin.home(home).unwrap().base_install_cost
            );
        }
        for bracket in IncomeBracket::ALL {
            assert_eq!(
                from_csv.income(bracket).unwrap().state_rebate,
                builtin.income(bracket).unwrap().state_rebate
            );
        }
        let csv_ids: Vec<_> = from_csv.utilities.iter().map(|u| u.id.clone()).collect();
        let builtin_ids: Vec<_> = builtin.utilities.iter().map(|u| u.id.clone()).collect();
        assert_eq!(csv_ids, builtin_ids);
    }

    #[test]
    fn test_partial_table_lookup_misses() {
        let mut tables = ReferenceTables::builtin();
        tables.home_types.retain(|h| h.home_type != HomeType::Condo);
        assert!(tables.home(HomeType::Condo).is_none());
    }
}
