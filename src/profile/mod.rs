//! Household profile input and batch loading

mod data;
pub mod loader;

pub use data::HouseholdProfile;
pub use loader::{load_profiles, load_profiles_from_reader, ProfileLoadError, ProfileRecord};
