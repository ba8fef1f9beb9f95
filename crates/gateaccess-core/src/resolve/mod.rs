//! Gate phone resolution for contacts
//!
//! Two strategies share the [`LocationResolver`] interface:
//! - [`TextAddressResolver`]: matches the free-text storage location against
//!   location addresses and names
//! - [`PositionalIndexResolver`]: uses the numeric storage number as a
//!   position in the location list
//!
//! Both fall back to the inline gate phone columns of the contact.

mod positional;
mod text;

pub use positional::PositionalIndexResolver;
pub use text::TextAddressResolver;

use crate::contact::{ColumnMap, ContactRecord};
use crate::location::{build_index, build_table, CollisionPolicy, LocationRecord};
use crate::phone::PhoneNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution strategy, chosen per run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Address-text matching
    #[default]
    Text,
    /// Positional index matching
    Positional,
}

impl Strategy {
    /// Spelling used in the config file and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Positional => "positional",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "address text",
            Self::Positional => "positional index",
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "address" => Ok(Self::Text),
            "positional" | "index" => Ok(Self::Positional),
            _ => Err(format!("unknown strategy '{}' (expected text or positional)", s)),
        }
    }
}

/// Which lookup step produced the gate phone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSource {
    /// Whole normalized location text
    FullAddress,
    /// Location text up to the first comma
    ShortAddress,
    /// Storage number used as a text index key
    StorageNumber,
    /// Storage number used as a 1-based position
    Position(i64),
    /// Inline gate phone column on the contact
    InlineGatePhone,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullAddress => f.write_str("full address"),
            Self::ShortAddress => f.write_str("short address"),
            Self::StorageNumber => f.write_str("storage number"),
            Self::Position(index) => write!(f, "position {}", index),
            Self::InlineGatePhone => f.write_str("inline gate phone"),
        }
    }
}

/// A resolved gate phone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub gate_phone: PhoneNumber,
    pub matched_by: MatchSource,
}

/// Why a contact has no gate phone. Each case skips the contact only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unresolved {
    #[error("no storage location")]
    MissingLocation,

    #[error("no storage number")]
    MissingIndex,

    #[error("storage number '{raw}' is not a number")]
    InvalidIndex { raw: String },

    #[error("storage number {index} out of range (1..={len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("no gate phone for location '{location}'")]
    NoGatePhone { location: String },
}

/// Maps a contact to the gate phone it may open
pub trait LocationResolver {
    fn resolve(&self, contact: &ContactRecord) -> Result<Resolution, Unresolved>;

    /// Number of location records behind this resolver
    fn locations(&self) -> usize;

    /// Number of lookup keys or slots the resolver matches against
    fn keys(&self) -> usize;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Build the resolver for a strategy from loaded location records
pub fn build_resolver(
    strategy: Strategy,
    records: &[LocationRecord],
    policy: CollisionPolicy,
    columns: &ColumnMap,
) -> Box<dyn LocationResolver> {
    match strategy {
        Strategy::Text => Box::new(TextAddressResolver::new(
            build_index(records, policy),
            columns.clone(),
        )),
        Strategy::Positional => Box::new(PositionalIndexResolver::new(
            build_table(records),
            columns.clone(),
        )),
    }
}

/// Inline gate phone fallback shared by both strategies
fn inline_fallback(columns: &ColumnMap, contact: &ContactRecord) -> Option<Resolution> {
    columns.inline_gate_phone(contact).map(|gate_phone| Resolution {
        gate_phone,
        matched_by: MatchSource::InlineGatePhone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("text".parse::<Strategy>(), Ok(Strategy::Text));
        assert_eq!("Positional".parse::<Strategy>(), Ok(Strategy::Positional));
        assert!("fuzzy".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_spelling_parses_back() {
        for strategy in [Strategy::Text, Strategy::Positional] {
            assert_eq!(strategy.as_str().parse::<Strategy>(), Ok(strategy));
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.as_str()));
        }
    }

    #[test]
    fn test_build_resolver_by_strategy() {
        let records = vec![LocationRecord::new("Depot (Brivibas 10, Riga)", "111", 1)];
        let columns = ColumnMap::default();

        let text = build_resolver(Strategy::Text, &records, CollisionPolicy::default(), &columns);
        assert_eq!(text.name(), "text");
        assert_eq!(text.locations(), 1);
        assert_eq!(text.keys(), 4);

        let positional =
            build_resolver(Strategy::Positional, &records, CollisionPolicy::default(), &columns);
        assert_eq!(positional.name(), "positional");
        assert_eq!(positional.keys(), 1);
    }

    #[test]
    fn test_unresolved_messages() {
        assert_eq!(
            Unresolved::IndexOutOfRange { index: 0, len: 3 }.to_string(),
            "storage number 0 out of range (1..=3)"
        );
        assert_eq!(
            Unresolved::NoGatePhone { location: "Nowhere 1".into() }.to_string(),
            "no gate phone for location 'Nowhere 1'"
        );
    }
}
