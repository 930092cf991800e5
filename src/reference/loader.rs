//! CSV-based reference table loader
//!
//! Loads archetype and utility territory tables from CSV files in data/reference/

use super::heating::{HeatingArchetype, HeatingSystem, StrandedAssetRisk};
use super::home::{HomeArchetype, HomeType};
use super::household::{AgeArchetype, IncomeArchetype, IncomeBracket, SystemAge, Urgency};
use super::jurisdiction::Jurisdiction;
use super::utility::{ProgramParticipation, UtilityTerritory};
use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default path to reference data directory
pub const DEFAULT_REFERENCE_PATH: &str = "data/reference";

#[derive(Debug, Error)]
pub enum ReferenceLoadError {
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} row {row}: {message}")]
    InvalidRow {
        path: PathBuf,
        row: usize,
        message: String,
    },
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ReferenceLoadError> {
    let csv_error = |source| ReferenceLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result.map_err(csv_error)?);
    }
    Ok(rows)
}

/// Parse each raw row, tagging failures with file and 1-based data row
fn convert_rows<R, T>(
    path: &Path,
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, String>,
) -> Result<Vec<T>, ReferenceLoadError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            convert(row).map_err(|message| ReferenceLoadError::InvalidRow {
                path: path.to_path_buf(),
                row: i + 1,
                message,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct HomeRow {
    id: String,
    label: String,
    base_install_cost: f64,
    avg_sq_ft: f64,
}

/// Load home archetypes from home_types.csv
pub fn load_home_types(dir: &Path) -> Result<Vec<HomeArchetype>, ReferenceLoadError> {
    let path = dir.join("home_types.csv");
    let rows: Vec<HomeRow> = read_rows(&path)?;
    convert_rows(&path, rows, |row| {
        let home_type: HomeType = row.id.parse()?;
        Ok(HomeArchetype::new(home_type, &row.label, row.base_install_cost, row.avg_sq_ft))
    })
}

#[derive(Debug, Deserialize)]
struct HeatingRow {
    id: String,
    label: String,
    stranded_asset_risk: String,
    avg_annual_cost: f64,
    mandate_impact: String,
}

/// Load heating archetypes from heating_systems.csv
pub fn load_heating_systems(dir: &Path) -> Result<Vec<HeatingArchetype>, ReferenceLoadError> {
    let path = dir.join("heating_systems.csv");
    let rows: Vec<HeatingRow> = read_rows(&path)?;
    convert_rows(&path, rows, |row| {
        let system: HeatingSystem = row.id.parse()?;
        let risk: StrandedAssetRisk = row.stranded_asset_risk.parse()?;
        Ok(HeatingArchetype::new(system, &row.label, risk, row.avg_annual_cost, &row.mandate_impact))
    })
}

#[derive(Debug, Deserialize)]
struct IncomeRow {
    id: String,
    label: String,
    percent_ami: String,
    state_rebate: f64,
    heehra_coverage_pct: u8,
    description: String,
}

/// Load income brackets from income_brackets.csv
pub fn load_income_brackets(dir: &Path) -> Result<Vec<IncomeArchetype>, ReferenceLoadError> {
    let path = dir.join("income_brackets.csv");
    let rows: Vec<IncomeRow> = read_rows(&path)?;
    convert_rows(&path, rows, |row| {
        let bracket: IncomeBracket = row.id.parse()?;
        if row.heehra_coverage_pct > 100 {
            return Err(format!("coverage {}% exceeds 100%", row.heehra_coverage_pct));
        }
        Ok(IncomeArchetype::new(
            bracket,
            &row.label,
            &row.percent_ami,
            row.state_rebate,
            row.heehra_coverage_pct,
            &row.description,
        ))
    })
}

#[derive(Debug, Deserialize)]
struct AgeRow {
    id: String,
    label: String,
    urgency: String,
    years_remaining: u32,
}

/// Load system age brackets from system_ages.csv
pub fn load_system_ages(dir: &Path) -> Result<Vec<AgeArchetype>, ReferenceLoadError> {
    let path = dir.join("system_ages.csv");
    let rows: Vec<AgeRow> = read_rows(&path)?;
    convert_rows(&path, rows, |row| {
        let age: SystemAge = row.id.parse()?;
        let urgency: Urgency = row.urgency.parse()?;
        Ok(AgeArchetype::new(age, &row.label, urgency, row.years_remaining))
    })
}

#[derive(Debug, Deserialize)]
struct UtilityRow {
    id: String,
    name: String,
    abbreviation: String,
    jurisdiction: String,
    /// Semicolon separated, e.g. "210;211;212"
    zip_prefixes: String,
    empower: bool,
    dcseu: bool,
    heehra: bool,
}

/// Load utility territories from utility_territories.csv, keeping file order
pub fn load_utility_territories(dir: &Path) -> Result<Vec<UtilityTerritory>, ReferenceLoadError> {
    let path = dir.join("utility_territories.csv");
    let rows: Vec<UtilityRow> = read_rows(&path)?;
    convert_rows(&path, rows, |row| {
        let jurisdiction: Jurisdiction = row.jurisdiction.parse()?;
        let zip_prefixes: Vec<String> = row
            .zip_prefixes
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(bad) = zip_prefixes
            .iter()
            .find(|p| p.len() != 3 || !p.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(format!("zip prefix '{}' is not 3 digits", bad));
        }

        Ok(UtilityTerritory {
            id: row.id,
            name: row.name,
            abbreviation: row.abbreviation,
            jurisdiction,
            zip_prefixes,
            participation: ProgramParticipation {
                empower: row.empower,
                dcseu: row.dcseu,
                heehra: row.heehra,
            },
        })
    })
}

/// All CSV-backed reference tables
pub struct LoadedReference {
    pub home_types: Vec<HomeArchetype>,
    pub heating_systems: Vec<HeatingArchetype>,
    pub income_brackets: Vec<IncomeArchetype>,
    pub system_ages: Vec<AgeArchetype>,
    pub utility_territories: Vec<UtilityTerritory>,
}

impl LoadedReference {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, ReferenceLoadError> {
        Self::load_from(Path::new(DEFAULT_REFERENCE_PATH))
    }

    /// Load all tables from a specific directory
    pub fn load_from(dir: &Path) -> Result<Self, ReferenceLoadError> {
        let loaded = Self {
            home_types: load_home_types(dir)?,
            heating_systems: load_heating_systems(dir)?,
            income_brackets: load_income_brackets(dir)?,
            system_ages: load_system_ages(dir)?,
            utility_territories: load_utility_territories(dir)?,
        };

        info!(
            "Loaded reference tables from {}: {} home types, {} heating systems, {} income brackets, {} age brackets, {} utilities",
            dir.display(),
            loaded.home_types.len(),
            loaded.heating_systems.len(),
            loaded.income_brackets.len(),
            loaded.system_ages.len(),
            loaded.utility_territories.len(),
        );

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn reference_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_REFERENCE_PATH)
    }

    #[test]
    fn test_load_shipped_reference_tables() {
        let result = LoadedReference::load_from(&reference_dir());
        assert!(result.is_ok(), "Failed to load reference tables: {:?}", result.err());

        let loaded = result.unwrap();
        assert_eq!(loaded.home_types.len(), 4);
        assert_eq!(loaded.heating_systems.len(), 6);
        assert_eq!(loaded.income_brackets.len(), 5);
        assert_eq!(loaded.system_ages.len(), 6);
        assert_eq!(loaded.utility_territories.len(), 7);

        // File order is table order
        assert_eq!(loaded.utility_territories[0].id, "bge");
        assert_eq!(loaded.utility_territories[0].zip_prefixes, vec!["210", "211", "212"]);
        assert!(loaded.utility_territories[0].participation.empower);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let dir = std::env::temp_dir().join(format!("hpi-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("home_types.csv"),
            "id,label,base_install_cost,avg_sq_ft\nyurt,Yurt,9000,400\n",
        )
        .unwrap();

        let err = load_home_types(&dir).unwrap_err();
        match err {
            ReferenceLoadError::InvalidRow { row, message, .. } => {
                assert_eq!(row, 1);
                assert!(message.contains("yurt"));
            }
            other => panic!("unexpected error: {other}"),
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = std::env::temp_dir().join("hpi-loader-does-not-exist");
        assert!(matches!(
            load_system_ages(&dir),
            Err(ReferenceLoadError::Csv { .. })
        ));
    }
}
