//! The household profile the calculator consumes

use crate::reference::{HeatingSystem, HomeType, IncomeBracket, SystemAge};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Deserialize an id, mapping anything unrecognised (or missing) to `None`
fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// A household's answers to the calculator questionnaire.
///
/// Categorical fields are `None` when the answer was missing or not a known
/// id; the calculator falls back to conservative defaults for those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdProfile {
    /// 5-digit zip code
    #[serde(alias = "zipCode")]
    pub postal_code: String,

    #[serde(default, deserialize_with = "lenient_id")]
    pub home_type: Option<HomeType>,

    /// Conditioned floor area, when the household supplied one
    #[serde(default, alias = "homeSqFt")]
    pub square_feet: Option<f64>,

    #[serde(default, alias = "currentHeating", deserialize_with = "lenient_id")]
    pub heating_system: Option<HeatingSystem>,

    #[serde(default, deserialize_with = "lenient_id")]
    pub system_age: Option<SystemAge>,

    #[serde(default, deserialize_with = "lenient_id")]
    pub income_bracket: Option<IncomeBracket>,
}

impl HouseholdProfile {
    /// Create a profile with every questionnaire answer supplied
    pub fn new(
        postal_code: &str,
        home_type: HomeType,
        heating_system: HeatingSystem,
        system_age: SystemAge,
        income_bracket: IncomeBracket,
    ) -> Self {
        Self {
            postal_code: postal_code.to_string(),
            home_type: Some(home_type),
            square_feet: None,
            heating_system: Some(heating_system),
            system_age: Some(system_age),
            income_bracket: Some(income_bracket),
        }
    }

    /// Build a profile from raw string ids; unknown ids become `None`
    pub fn from_ids(
        postal_code: &str,
        home_type: &str,
        heating_system: &str,
        system_age: &str,
        income_bracket: &str,
    ) -> Self {
        Self {
            postal_code: postal_code.trim().to_string(),
            home_type: home_type.parse().ok(),
            square_feet: None,
            heating_system: heating_system.parse().ok(),
            system_age: system_age.parse().ok(),
            income_bracket: income_bracket.parse().ok(),
        }
    }

    pub fn with_square_feet(mut self, square_feet: f64) -> Self {
        self.square_feet = Some(square_feet);
        self
    }

    /// Square footage usable for cost scaling. Zero and non-finite values are
    /// treated as absent; a negative figure still scales down to the cost floor.
    pub fn usable_square_feet(&self) -> Option<f64> {
        self.square_feet.filter(|sq| sq.is_finite() && *sq != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ids_maps_unknowns_to_none() {
        let profile = HouseholdProfile::from_ids("21201", "castle", "gas-furnace", "20+", "low");

        assert_eq!(profile.home_type, None);
        assert_eq!(profile.heating_system, Some(HeatingSystem::GasFurnace));
        assert_eq!(profile.system_age, Some(SystemAge::Over20));
        assert_eq!(profile.income_bracket, Some(IncomeBracket::Low));
    }

    #[test]
    fn test_json_uses_questionnaire_names() {
        let json = r#"{
            "zipCode": "22201",
            "homeType": "townhouse",
            "homeSqFt": 1800,
            "currentHeating": "heat-pump",
            "systemAge": "6-10",
            "incomeBracket": "not-a-bracket"
        }"#;

        let profile: HouseholdProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.postal_code, "22201");
        assert_eq!(profile.home_type, Some(HomeType::Townhouse));
        assert_eq!(profile.square_feet, Some(1800.0));
        assert_eq!(profile.heating_system, Some(HeatingSystem::HeatPump));
        assert_eq!(profile.income_bracket, None);
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let profile: HouseholdProfile = serde_json::from_str(r#"{"postalCode": "20001"}"#).unwrap();
        assert_eq!(profile.home_type, None);
        assert_eq!(profile.square_feet, None);
        assert_eq!(profile.system_age, None);
    }

    #[test]
    fn test_usable_square_feet() {
        let profile = HouseholdProfile::new(
            "21201",
            HomeType::Condo,
            HeatingSystem::Other,
            SystemAge::Unknown,
            IncomeBracket::High,
        );
        assert_eq!(profile.usable_square_feet(), None);
        assert_eq!(profile.clone().with_square_feet(0.0).usable_square_feet(), None);
        assert_eq!(profile.clone().with_square_feet(f64::INFINITY).usable_square_feet(), None);
        assert_eq!(profile.clone().with_square_feet(f64::NEG_INFINITY).usable_square_feet(), None);
        assert_eq!(profile.clone().with_square_feet(f64::NAN).usable_square_feet(), None);
        assert_eq!(profile.clone().with_square_feet(-100.0).usable_square_feet(), Some(-100.0));
        assert_eq!(profile.with_square_feet(900.0).usable_square_feet(), Some(900.0));
    }
}
