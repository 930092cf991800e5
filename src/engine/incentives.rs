//! State, utility and federal incentive amounts

use crate::reference::{HomeType, IncomeBracket, Jurisdiction, ReferenceTables, UtilityTerritory};

/// Maryland MEA rebate when the income bracket is unknown
pub const MD_DEFAULT_STATE_REBATE: f64 = 2_000.0;

/// DC flat estimate (midpoint of the DCSEU range, no income tiering)
pub const DC_STATE_REBATE: f64 = 3_000.0;

/// Virginia HEEHRA estimate at 100% coverage
pub const VA_FULL_COVERAGE_REBATE: f64 = 8_000.0;

/// Virginia HEEHRA estimate at 50% coverage
pub const VA_HALF_COVERAGE_REBATE: f64 = 4_000.0;

pub const EMPOWER_UTILITY_REBATE: f64 = 3_000.0;
pub const DCSEU_UTILITY_REBATE: f64 = 2_500.0;
pub const HEEHRA_UTILITY_REBATE: f64 = 1_500.0;
pub const DEFAULT_UTILITY_REBATE: f64 = 1_000.0;

/// The three independent incentive components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incentives {
    pub state: f64,
    pub utility: f64,
    pub federal: f64,
}

impl Incentives {
    /// Sum of all components; deliberately uncapped
    pub fn total(&self) -> f64 {
        self.state + self.utility + self.federal
    }
}

/// State-level rebate keyed by jurisdiction and income bracket
pub fn state_rebate(
    tables: &ReferenceTables,
    jurisdiction: Jurisdiction,
    income: Option<IncomeBracket>,
) -> f64 {
    let bracket = income.and_then(|b| tables.income(b));

    match jurisdiction {
        Jurisdiction::Maryland => bracket.map_or(MD_DEFAULT_STATE_REBATE, |b| b.state_rebate),
        Jurisdiction::DistrictOfColumbia => DC_STATE_REBATE,
        Jurisdiction::Virginia => match bracket.map_or(0, |b| b.heehra_coverage_pct) {
            100 => VA_FULL_COVERAGE_REBATE,
            50 => VA_HALF_COVERAGE_REBATE,
            _ => 0.0,
        },
    }
}

/// Utility rebate by program participation.
///
/// Checked in fixed priority order: EmPOWER, DCSEU, HEEHRA, then a flat default.
pub fn utility_rebate(utility: Option<&UtilityTerritory>) -> f64 {
    let Some(utility) = utility else {
        return 0.0;
    };

    let participation = utility.participation;
    if participation.empower {
        EMPOWER_UTILITY_REBATE
    } else if participation.dcseu {
        DCSEU_UTILITY_REBATE
    } else if participation.heehra {
        HEEHRA_UTILITY_REBATE
    } else {
        DEFAULT_UTILITY_REBATE
    }
}

/// Federal 25C credit. Home type does not vary the amount yet.
pub fn federal_credit(tables: &ReferenceTables, _home_type: Option<HomeType>) -> f64 {
    tables.federal.ira_25c.max_amount
}

/// Compute all incentive components for a resolved location
pub fn calculate_incentives(
    tables: &ReferenceTables,
    jurisdiction: Jurisdiction,
    utility: Option<&UtilityTerritory>,
    income: Option<IncomeBracket>,
    home_type: Option<HomeType>,
) -> Incentives {
    Incentives {
        state: state_rebate(tables, jurisdiction, income),
        utility: utility_rebate(utility),
        federal: federal_credit(tables, home_type),
    }
}
