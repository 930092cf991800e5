//! Load household profiles from CSV for batch runs

use super::HouseholdProfile;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("failed to read profiles: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Raw CSV row; categorical columns stay strings so unknown ids degrade to defaults
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(alias = "zip_code")]
    postal_code: String,
    home_type: String,
    #[serde(default)]
    square_feet: Option<f64>,
    heating_system: String,
    system_age: String,
    income_bracket: String,
}

/// A profile with the caller's identifier for it
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub id: String,
    pub profile: HouseholdProfile,
}

impl CsvRow {
    fn to_record(self) -> Result<ProfileRecord, String> {
        if self.id.is_empty() {
            return Err("missing id".to_string());
        }

        let mut profile = HouseholdProfile::from_ids(
            &self.postal_code,
            &self.home_type,
            &self.heating_system,
            &self.system_age,
            &self.income_bracket,
        );
        profile.square_feet = self.square_feet;

        Ok(ProfileRecord { id: self.id, profile })
    }
}

/// Load profiles from a CSV file
pub fn load_profiles(path: &Path) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_records(reader)
}

/// Load profiles from any reader producing CSV text
pub fn load_profiles_from_reader<R: Read>(reader: R) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect_records(reader)
}

fn collect_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
    let mut records = Vec::new();

    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let record = row
            .to_record()
            .map_err(|message| ProfileLoadError::InvalidRow { row: i + 1, message })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{HeatingSystem, HomeType};

    const CSV: &str = "\
id,postal_code,home_type,square_feet,heating_system,system_age,income_bracket
a1,21201,single-family,3000,gas-furnace,20+,low
a2,02134,condo,,oil-boiler,6-10,middle
a3,22030,igloo,,heat-pump,unknown,moderate
";

    #[test]
    fn test_load_profiles_from_reader() {
        let records = load_profiles_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, "a1");
        assert_eq!(records[0].profile.square_feet, Some(3000.0));
        assert_eq!(records[0].profile.heating_system, Some(HeatingSystem::GasFurnace));

        // Leading zeros survive
        assert_eq!(records[1].profile.postal_code, "02134");
        assert_eq!(records[1].profile.square_feet, None);

        assert_eq!(records[2].profile.home_type, None::<HomeType>);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let csv = "id,postal_code,home_type,square_feet,heating_system,system_age,income_bracket\n,21201,condo,,other,0-5,low\n";
        let err = load_profiles_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ProfileLoadError::InvalidRow { row: 1, .. }));
    }
}
