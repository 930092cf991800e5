//! Heat Pump Incentives - rebate, payback and stranded-asset risk engine for
//! Maryland, DC and Northern Virginia households
//!
//! This library provides:
//! - Reference tables for jurisdictions, programs, utilities and home archetypes
//! - Zip code to jurisdiction and utility resolution
//! - State, utility and federal incentive calculation
//! - Installation cost, savings, payback and risk assessment
//! - Range-based Maryland incentive scans by building type and AMI band
//! - Questionnaire sessions, lead records and portfolio summaries
//! - Parallel batch runs over many profiles

pub mod reference;
pub mod profile;
pub mod engine;
pub mod validation;
pub mod session;
pub mod lead;
pub mod portfolio;
pub mod batch;

// Re-export commonly used types
pub use reference::{Jurisdiction, ReferenceTables, UtilityTerritory};
pub use profile::HouseholdProfile;
pub use engine::{CalculationResult, CalculatorConfig, LocationResolution, RebateCalculator};
pub use session::CalculatorSession;
pub use lead::LeadRecord;
pub use portfolio::PortfolioSnapshot;
pub use batch::BatchRunner;
