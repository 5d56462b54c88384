//! Dimension and tier value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of tiers (paliers) inside each dimension.
pub const TIER_COUNT: usize = 4;

/// One of the six top-level assessment categories (Value Object)
///
/// Serialized with its French label, which is also the key used in
/// `dimension_results` of a results report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "Stratégie")]
    Strategy,
    #[serde(rename = "Culture & Humain")]
    CultureAndPeople,
    #[serde(rename = "Relation Client")]
    CustomerRelations,
    #[serde(rename = "Processus")]
    Process,
    #[serde(rename = "Technologie")]
    Technology,
    #[serde(rename = "Sécurité")]
    Security,
}

impl Dimension {
    /// All dimensions in catalog order.
    pub const ALL: [Dimension; 6] = [
        Dimension::Strategy,
        Dimension::CultureAndPeople,
        Dimension::CustomerRelations,
        Dimension::Process,
        Dimension::Technology,
        Dimension::Security,
    ];

    /// Display label (French, as shown in reports).
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Strategy => "Stratégie",
            Dimension::CultureAndPeople => "Culture & Humain",
            Dimension::CustomerRelations => "Relation Client",
            Dimension::Process => "Processus",
            Dimension::Technology => "Technologie",
            Dimension::Security => "Sécurité",
        }
    }

    /// 1-based number used in criterion ids (`D<number>-...`).
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// 0-based position in [`Dimension::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Dimension::Strategy => 0,
            Dimension::CultureAndPeople => 1,
            Dimension::CustomerRelations => 2,
            Dimension::Process => 3,
            Dimension::Technology => 4,
            Dimension::Security => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=6 => Some(Self::ALL[number as usize - 1]),
            _ => None,
        }
    }

    /// The dimension that follows this one, if any.
    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Dimension {
    type Err = DomainError;

    /// Accepts the French label or a short English alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Self::ALL
            .iter()
            .find(|d| d.label().eq_ignore_ascii_case(normalized))
            .copied()
            .or_else(|| match normalized.to_lowercase().as_str() {
                "strategy" => Some(Dimension::Strategy),
                "culture" | "people" => Some(Dimension::CultureAndPeople),
                "customer" | "customers" => Some(Dimension::CustomerRelations),
                "process" | "processes" => Some(Dimension::Process),
                "technology" => Some(Dimension::Technology),
                "security" => Some(Dimension::Security),
                _ => None,
            })
            .ok_or_else(|| DomainError::UnknownDimension(s.to_string()))
    }
}

/// Maturity level inside a dimension, 1..=4 (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const FIRST: Tier = Tier(1);
    pub const LAST: Tier = Tier(TIER_COUNT as u8);

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (1..=TIER_COUNT as u8).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidTier(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 0-based slot in per-tier arrays.
    pub fn slot(&self) -> usize {
        self.0 as usize - 1
    }

    /// All tiers from 1 upward.
    pub fn all() -> impl Iterator<Item = Tier> {
        (1..=TIER_COUNT as u8).map(Tier)
    }
}

impl TryFrom<u8> for Tier {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_numbers_follow_catalog_order() {
        for (i, dim) in Dimension::ALL.iter().enumerate() {
            assert_eq!(dim.number() as usize, i + 1);
            assert_eq!(Dimension::from_number(dim.number()), Some(*dim));
        }
        assert_eq!(Dimension::from_number(0), None);
        assert_eq!(Dimension::from_number(7), None);
    }

    #[test]
    fn test_dimension_next() {
        assert_eq!(Dimension::Strategy.next(), Some(Dimension::CultureAndPeople));
        assert_eq!(Dimension::Security.next(), None);
    }

    #[test]
    fn test_dimension_from_str() {
        assert_eq!("Sécurité".parse::<Dimension>().unwrap(), Dimension::Security);
        assert_eq!(
            "relation client".parse::<Dimension>().unwrap(),
            Dimension::CustomerRelations
        );
        assert_eq!("process".parse::<Dimension>().unwrap(), Dimension::Process);
        assert!("marketing".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_dimension_serializes_as_label() {
        let json = serde_json::to_string(&Dimension::CultureAndPeople).unwrap();
        assert_eq!(json, "\"Culture & Humain\"");
        let back: Dimension = serde_json::from_str("\"Technologie\"").unwrap();
        assert_eq!(back, Dimension::Technology);
    }

    #[test]
    fn test_tier_bounds() {
        assert!(Tier::new(0).is_err());
        assert!(Tier::new(5).is_err());
        assert_eq!(Tier::new(3).unwrap().slot(), 2);
        assert_eq!(Tier::all().count(), TIER_COUNT);
    }

    #[test]
    fn test_tier_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Tier>("2").is_ok());
        assert!(serde_json::from_str::<Tier>("9").is_err());
    }
}
