//! Zip code to jurisdiction and utility territory resolution

use crate::reference::{Jurisdiction, ReferenceTables, UtilityTerritory};
use log::debug;

/// Outcome of resolving a zip code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationResolution<'a> {
    /// `None` when the zip is outside the service area
    pub jurisdiction: Option<Jurisdiction>,
    pub utility: Option<&'a UtilityTerritory>,
    /// Territories from more than one jurisdiction claim the zip prefix;
    /// table order picked the winner
    pub ambiguous: bool,
}

impl<'a> LocationResolution<'a> {
    const UNSUPPORTED: Self = Self {
        jurisdiction: None,
        utility: None,
        ambiguous: false,
    };

    pub fn is_supported(&self) -> bool {
        self.jurisdiction.is_some()
    }
}

/// First three characters of the zip, if they are ASCII digits
pub fn zip_prefix(postal_code: &str) -> Option<&str> {
    let prefix = postal_code.get(..3)?;
    prefix.bytes().all(|b| b.is_ascii_digit()).then_some(prefix)
}

/// Jurisdiction for a zip code, or `None` for an unsupported region
pub fn resolve_jurisdiction(postal_code: &str) -> Option<Jurisdiction> {
    let prefix: u16 = zip_prefix(postal_code)?.parse().ok()?;
    Jurisdiction::from_zip_prefix(prefix)
}

/// Resolve a zip code to its jurisdiction and electric utility.
///
/// The utility is the first territory in table order claiming the prefix,
/// falling back to the jurisdiction's default utility. Unsupported zips
/// resolve to neither.
pub fn resolve_location<'a>(tables: &'a ReferenceTables, postal_code: &str) -> LocationResolution<'a> {
    let (prefix, jurisdiction) = match zip_prefix(postal_code).zip(resolve_jurisdiction(postal_code)) {
        Some(found) => found,
        None => return LocationResolution::UNSUPPORTED,
    };

    let claimants: Vec<&UtilityTerritory> = tables.utilities.claimants(prefix).collect();
    let utility = match claimants.first() {
        Some(territory) => Some(*territory),
        None => {
            debug!("No utility claims prefix {}, using {} default", prefix, jurisdiction);
            tables.utilities.get(jurisdiction.default_utility_id())
        }
    };

    // Territories within one jurisdiction share a rebate program
    let ambiguous = match claimants.first() {
        Some(first) => claimants.iter().any(|t| t.jurisdiction != first.jurisdiction),
        None => false,
    };

    if ambiguous {
        debug!(
            "Zip prefix {} claimed across jurisdictions by {} territories, using {}",
            prefix,
            claimants.len(),
            utility.map(|u| u.id.as_str()).unwrap_or("none"),
        );
    }

    LocationResolution {
        jurisdiction: Some(jurisdiction),
        utility,
        ambiguous,
    }
}
