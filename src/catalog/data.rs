//! Built-in prize tables for the two General Vault variants.
//!
//! Both vaults share the same purchase limits and acquisition chances; only
//! the prize labels differ. The last four slots (no purchase limit) are the
//! mementos.

use super::types::{CatalogTemplate, TemplateEntry};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VaultKind {
    /// General Vault - C.T.P. of Veteran
    Ctp,
    /// General Vault - 6* Exclusive Passive Skill Artifact
    Artifact,
}

impl VaultKind {
    pub fn name(&self) -> &'static str {
        match self {
            VaultKind::Ctp => "General Vault - C.T.P. of Veteran",
            VaultKind::Artifact => "General Vault - 6* Exclusive Passive Skill Artifact",
        }
    }

    pub fn template(&self) -> Result<CatalogTemplate> {
        match self {
            VaultKind::Ctp => ctp_vault(),
            VaultKind::Artifact => artifact_vault(),
        }
    }
}

// (purchase limit, acquisition chance); None = no limit
const VAULT_ODDS: [(Option<u64>, f64); 12] = [
    (Some(110_000), 0.236280),
    (Some(110_000), 0.157520),
    (Some(110_000), 0.157520),
    (Some(110_000), 0.118140),
    (Some(110_000), 0.118140),
    (Some(110_000), 0.146996),
    (Some(110_000), 0.062999),
    (Some(5), 0.000005),
    (None, 0.001248),
    (None, 0.000720),
    (None, 0.000360),
    (None, 0.000072),
];

const CTP_LABELS: [&str; 12] = [
    "Norn Stone of each type x15",
    "Rank 1 Black Anti-Matter x5",
    "Norn Stone of Chaos x5",
    "Gear Up Kit x25",
    "Dimension Debris x30",
    "3* Type Enhancement Kit x3",
    "3* Enchanted Uru x1",
    "Tier-2 Mega Advancement Ticket x1",
    "Titan Component Pack x40",
    "Essence of Dimension x50",
    "Cosmic Cube Fragment x60",
    "Extreme Obelisk x1",
];

const ARTIFACT_LABELS: [&str; 12] = [
    "Gear Up Kit x20",
    "Dimension Debris x20",
    "Norn Stone of each type x15",
    "Rank 1 Black Anti-Matter x5",
    "Norn Stone of Chaos x5",
    "3* ISO-8 x1",
    "Lv. 2 Artifact x1",
    "Mega Uniform Upgrade Ticket: Mythic x1",
    "Essence of Dimension x40",
    "Cosmic Cube Fragment x50",
    "Titan Component Pack x60",
    "6* Rank Up Ticket x1",
];

pub fn ctp_vault() -> Result<CatalogTemplate> {
    build(VaultKind::Ctp.name(), &CTP_LABELS)
}

pub fn artifact_vault() -> Result<CatalogTemplate> {
    build(VaultKind::Artifact.name(), &ARTIFACT_LABELS)
}

fn build(name: &str, labels: &[&str; 12]) -> Result<CatalogTemplate> {
    let entries = labels
        .iter()
        .zip(VAULT_ODDS.iter())
        .map(|(label, &(limit, probability))| match limit {
            Some(limit) => TemplateEntry::limited(label, limit, probability),
            None => TemplateEntry::unlimited(label, probability),
        })
        .collect();
    CatalogTemplate::new(name, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_vaults_validate() {
        for kind in [VaultKind::Ctp, VaultKind::Artifact] {
            let template = kind.template().unwrap();
            assert_eq!(template.len(), 12);
            assert_eq!(template.name(), kind.name());
        }
    }

    #[test]
    fn test_last_four_slots_are_mementos() {
        let template = ctp_vault().unwrap();
        let mementos: Vec<usize> = template.mementos().iter().collect();
        assert_eq!(mementos, vec![8, 9, 10, 11]);
    }

    #[test]
    fn test_vaults_share_odds() {
        let ctp = ctp_vault().unwrap();
        let artifact = artifact_vault().unwrap();
        for (a, b) in ctp.slots().iter().zip(artifact.slots()) {
            assert_eq!(a.quantity, b.quantity);
            assert_eq!(a.probability, b.probability);
        }
        assert_eq!(artifact.label(11), Some("6* Rank Up Ticket x1"));
    }
}
