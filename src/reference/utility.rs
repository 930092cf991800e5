//! Electric utility service territories

use super::jurisdiction::Jurisdiction;
use serde::Serialize;

/// Jurisdiction-specific efficiency programs a utility may take part in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgramParticipation {
    pub empower: bool,
    pub dcseu: bool,
    pub heehra: bool,
}

/// An electric utility service area
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityTerritory {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub jurisdiction: Jurisdiction,
    /// 3-digit zip prefixes claimed by the territory
    pub zip_prefixes: Vec<String>,
    pub participation: ProgramParticipation,
}

impl UtilityTerritory {
    /// Whether the territory claims a 3-digit zip prefix.
    ///
    /// Matches on the exact prefix, or loosely on the first two digits of any
    /// registered prefix. The loose rule lets neighbouring territories claim the
    /// same zips, so table order decides the winner.
    pub fn claims(&self, prefix: &str) -> bool {
        self.zip_prefixes.iter().any(|p| {
            p == prefix
                || match (p.get(..2), prefix.get(..2)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
        })
    }
}

fn territory(
    id: &str,
    name: &str,
    abbreviation: &str,
    jurisdiction: Jurisdiction,
    prefixes: &[&str],
    participation: ProgramParticipation,
) -> UtilityTerritory {
    UtilityTerritory {
        id: id.to_string(),
        name: name.to_string(),
        abbreviation: abbreviation.to_string(),
        jurisdiction,
        zip_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        participation,
    }
}

/// Ordered utility territory table
#[derive(Debug, Clone)]
pub struct UtilityTable {
    territories: Vec<UtilityTerritory>,
}

impl UtilityTable {
    pub fn new(territories: Vec<UtilityTerritory>) -> Self {
        Self { territories }
    }

    /// Builtin DMV territories in declaration order
    pub fn builtin() -> Self {
        let empower = ProgramParticipation { empower: true, ..Default::default() };
        let dcseu = ProgramParticipation { dcseu: true, ..Default::default() };
        let heehra = ProgramParticipation { heehra: true, ..Default::default() };

        Self::new(vec![
            // Maryland
            territory("bge", "Baltimore Gas & Electric", "BGE", Jurisdiction::Maryland, &["210", "211", "212"], empower),
            territory("pepco-md", "Pepco (Maryland)", "Pepco", Jurisdiction::Maryland, &["207", "208", "209"], empower),
            territory("smeco", "SMECO", "SMECO", Jurisdiction::Maryland, &["206", "254", "256"], empower),
            territory("potomac-edison", "Potomac Edison", "PE", Jurisdiction::Maryland, &["217", "218", "219"], empower),
            // DC
            territory("pepco-dc", "Pepco (DC)", "Pepco", Jurisdiction::DistrictOfColumbia, &["200", "202", "203", "204", "205"], dcseu),
            // Virginia
            territory("dominion-va", "Dominion Energy Virginia", "Dominion", Jurisdiction::Virginia, &["220", "221", "222", "223", "224"], heehra),
            territory("nova-electric", "NOVEC", "NOVEC", Jurisdiction::Virginia, &["201", "220"], heehra),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &UtilityTerritory> {
        self.territories.iter()
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&UtilityTerritory> {
        self.territories.iter().find(|t| t.id == id)
    }

    /// Territories claiming the prefix, in declaration order
    pub fn claimants<'a, 'p>(&'a self, prefix: &'p str) -> impl Iterator<Item = &'a UtilityTerritory> + use<'a, 'p> {
        self.territories.iter().filter(move |t| t.claims(prefix))
    }

    /// First territory, in declaration order, that claims the prefix
    pub fn first_claiming(&self, prefix: &str) -> Option<&UtilityTerritory> {
        self.claimants(prefix).next()
    }

    /// Number of territories claiming the prefix
    pub fn claim_count(&self, prefix: &str) -> usize {
        self.claimants(prefix).count()
    }
}

impl Default for UtilityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_loose_claims() {
        let table = UtilityTable::builtin();
        let bge = table.get("bge").unwrap();

        assert!(bge.claims("212"));
        // Loose match on the first two digits
        assert!(bge.claims("215"));
        assert!(!bge.claims("220"));
    }

    #[test]
    fn test_declaration_order_wins() {
        let table = UtilityTable::builtin();

        assert_eq!(table.first_claiming("212").unwrap().id, "bge");
        // Pepco MD's 207 loosely claims the whole 20x block ahead of Pepco DC
        assert_eq!(table.first_claiming("200").unwrap().id, "pepco-md");
        // Dominion is declared before NOVEC, both claim 220
        assert_eq!(table.first_claiming("220").unwrap().id, "dominion-va");
        assert!(table.claim_count("220") > 1);
    }

    #[test]
    fn test_unclaimed_prefix() {
        let table = UtilityTable::builtin();
        assert!(table.first_claiming("000").is_none());
        assert!(table.first_claiming("230").is_none());
        assert_eq!(table.claim_count("000"), 0);
    }
}
