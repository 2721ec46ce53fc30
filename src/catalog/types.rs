//! Prize table data: quantities, template entries, and the memento set.

use crate::core::constants::{MAX_CATALOG_SLOTS, PROBABILITY_TOLERANCE};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remaining supply of a prize slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuantity", into = "RawQuantity")]
pub enum Quantity {
    Limited(u64),
    Unlimited,
}

impl Quantity {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Quantity::Unlimited)
    }

    /// A slot stays drawable until a limited supply reaches zero.
    pub fn is_eligible(&self) -> bool {
        !matches!(self, Quantity::Limited(0))
    }

    /// Takes one unit. Returns true when this emptied a limited supply.
    pub fn take_one(&mut self) -> bool {
        match self {
            Quantity::Limited(n) if *n > 0 => {
                *n -= 1;
                *n == 0
            }
            _ => false,
        }
    }
}

/// On-disk form: a count or a keyword such as `"unlimited"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Count(i64),
    Keyword(String),
}

impl TryFrom<RawQuantity> for Quantity {
    type Error = ConfigError;

    fn try_from(raw: RawQuantity) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawQuantity::Count(n) if n < 0 => Err(ConfigError::NegativeQuantity(n)),
            RawQuantity::Count(n) => Ok(Quantity::Limited(n as u64)),
            RawQuantity::Keyword(word) => match word.trim().to_ascii_lowercase().as_str() {
                "unlimited" | "inf" | "infinite" | "none" | "no limit" => Ok(Quantity::Unlimited),
                _ => Err(ConfigError::UnknownQuantity(word)),
            },
        }
    }
}

impl From<Quantity> for RawQuantity {
    fn from(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Limited(n) => RawQuantity::Count(i64::try_from(n).unwrap_or(i64::MAX)),
            Quantity::Unlimited => RawQuantity::Keyword("unlimited".to_string()),
        }
    }
}

/// One row of a vault's prize table. The label is carried for reporting only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub label: String,
    pub quantity: Quantity,
    pub probability: f64,
}

impl TemplateEntry {
    pub fn limited(label: &str, limit: u64, probability: f64) -> Self {
        Self {
            label: label.to_string(),
            quantity: Quantity::Limited(limit),
            probability,
        }
    }

    pub fn unlimited(label: &str, probability: f64) -> Self {
        Self {
            label: label.to_string(),
            quantity: Quantity::Unlimited,
            probability,
        }
    }
}

/// Slots with no purchase limit. Collecting all of them wins the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MementoSet {
    mask: u64,
}

impl MementoSet {
    pub fn from_entries(entries: &[TemplateEntry]) -> Self {
        let mask = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.quantity.is_unlimited())
            .fold(0u64, |mask, (slot, _)| mask | slot_bit(slot));
        Self { mask }
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < MAX_CATALOG_SLOTS && self.mask & slot_bit(slot) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// True when `holdings` covers every memento. An empty set is never
    /// satisfied, so a catalog without mementos cannot be won.
    pub fn satisfied_by(&self, holdings: u64) -> bool {
        !self.is_empty() && holdings & self.mask == self.mask
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_CATALOG_SLOTS).filter(move |&slot| self.contains(slot))
    }
}

pub fn slot_bit(slot: usize) -> u64 {
    1u64 << slot
}

/// Immutable, validated prize table that every round starts from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogTemplate {
    name: String,
    slots: Vec<TemplateEntry>,
    #[serde(skip)]
    mementos: MementoSet,
}

#[derive(Deserialize)]
struct TemplateFile {
    #[serde(default)]
    name: String,
    slots: Vec<TemplateEntry>,
}

impl CatalogTemplate {
    pub fn new(name: impl Into<String>, slots: Vec<TemplateEntry>) -> Result<Self> {
        validate_entries(&slots)?;
        let mementos = MementoSet::from_entries(&slots);
        Ok(Self {
            name: name.into(),
            slots,
            mementos,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: TemplateFile = serde_json::from_str(json)?;
        Self::new(file.name, file.slots)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[TemplateEntry] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn label(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).map(|e| e.label.as_str())
    }

    pub fn mementos(&self) -> MementoSet {
        self.mementos
    }

    pub fn validate(&self) -> Result<()> {
        validate_entries(&self.slots)
    }
}

fn validate_entries(entries: &[TemplateEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(ConfigError::EmptyCatalog.into());
    }
    if entries.len() > MAX_CATALOG_SLOTS {
        return Err(ConfigError::TooManySlots {
            count: entries.len(),
            max: MAX_CATALOG_SLOTS,
        }
        .into());
    }

    for (slot, entry) in entries.iter().enumerate() {
        if !(entry.probability > 0.0 && entry.probability <= 1.0) {
            return Err(ConfigError::InvalidProbability {
                slot,
                label: entry.label.clone(),
                value: entry.probability,
            }
            .into());
        }
        if entry.quantity == Quantity::Limited(0) {
            return Err(ConfigError::NonPositiveQuantity {
                slot,
                label: entry.label.clone(),
            }
            .into());
        }
    }

    let sum: f64 = entries.iter().map(|e| e.probability).sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ConfigError::ProbabilitySum { sum }.into());
    }

    Ok(())
}
