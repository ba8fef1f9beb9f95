//! Text lookup index over location names and addresses

use super::{extract_address, normalize_location_key, short_location_key, LocationRecord};
use crate::phone::PhoneNumber;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What happens when two locations register the same key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The location processed last owns the key
    #[default]
    LastWriteWins,
    /// The location processed first keeps the key
    FirstWriteWins,
}

impl CollisionPolicy {
    /// Spelling used in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWriteWins => "last-write-wins",
            Self::FirstWriteWins => "first-write-wins",
        }
    }
}

/// Immutable key → gate phone mapping. A key may map to an absent phone
/// when its location had none.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    keys: IndexMap<String, Option<PhoneNumber>>,
    entries: usize,
    loaded: usize,
    missing_phone: usize,
}

impl LocationIndex {
    /// Look up a key. The outer `Option` is the key hit, the inner one the
    /// phone registered for it.
    pub fn get(&self, key: &str) -> Option<Option<&PhoneNumber>> {
        self.keys.get(key).map(Option::as_ref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Keys in first-registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&PhoneNumber>)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of records the index was built from
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Number of records that registered keys
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Number of records without a gate phone
    pub fn missing_phone(&self) -> usize {
        self.missing_phone
    }

    fn register(&mut self, key: String, phone: &Option<PhoneNumber>, policy: CollisionPolicy) {
        match policy {
            CollisionPolicy::LastWriteWins => {
                self.keys.insert(key, phone.clone());
            }
            CollisionPolicy::FirstWriteWins => {
                self.keys.entry(key).or_insert_with(|| phone.clone());
            }
        }
    }
}

/// Build the text index.
///
/// Each named location registers, in order: its address in parentheses,
/// the address up to the first comma, its lower-cased name and its 1-based
/// position. Locations without a name register nothing.
pub fn build_index(records: &[LocationRecord], policy: CollisionPolicy) -> LocationIndex {
    let mut index = LocationIndex {
        entries: records.len(),
        ..LocationIndex::default()
    };

    for record in records {
        let position = record.ordinal_position;
        let phone = PhoneNumber::parse(&record.raw_phone).non_empty();
        if phone.is_none() {
            tracing::warn!("Location #{}: no gate phone (phone)", position);
            index.missing_phone += 1;
        }

        let name = record.display_name.trim();
        if name.is_empty() {
            tracing::warn!("Location #{}: no name", position);
            continue;
        }

        if let Some(address) = extract_address(name) {
            let address_key = normalize_location_key(address);
            let short_key = short_location_key(&address_key).to_string();
            let has_short = short_key != address_key;
            index.register(address_key, &phone, policy);
            if has_short {
                index.register(short_key, &phone, policy);
            }
        }

        index.register(name.to_lowercase(), &phone, policy);
        index.register(position.to_string(), &phone, policy);
        index.loaded += 1;
    }

    tracing::info!(
        "Loaded {} location keys from {} of {} locations",
        index.len(),
        index.loaded,
        index.entries
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone_of<'a>(index: &'a LocationIndex, key: &str) -> Option<&'a str> {
        index.get(key).flatten().map(PhoneNumber::as_str)
    }

    fn riga() -> LocationRecord {
        LocationRecord::new("Riga Central (Maskavas iela 1, Riga)", "+371 20000001", 1)
    }

    #[test]
    fn test_policy_config_spelling() {
        for policy in [CollisionPolicy::LastWriteWins, CollisionPolicy::FirstWriteWins] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.as_str()));
        }
    }

    #[test]
    fn test_registers_all_keys() {
        let index = build_index(&[riga()], CollisionPolicy::default());
        let keys: Vec<&str> = index.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "maskavas iela 1, riga",
                "maskavas iela 1",
                "riga central (maskavas iela 1, riga)",
                "1",
            ]
        );
        assert_eq!(phone_of(&index, "maskavas iela 1"), Some("37120000001"));
        assert_eq!(index.loaded(), 1);
    }

    #[test]
    fn test_no_short_key_without_comma() {
        let record = LocationRecord::new("Depot (Brivibas 10)", "1", 1);
        let index = build_index(&[record], CollisionPolicy::default());
        assert_eq!(index.len(), 3);
        assert!(index.contains_key("brivibas 10"));
    }

    #[test]
    fn test_name_without_address() {
        let record = LocationRecord::new("  Jelgava Depot ", "2", 1);
        let index = build_index(&[record], CollisionPolicy::default());
        assert!(index.contains_key("jelgava depot"));
        assert!(index.contains_key("1"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_unnamed_location_skipped() {
        let records = vec![LocationRecord::new("  ", "3", 2), riga()];
        let index = build_index(&records, CollisionPolicy::default());
        // only the named location registered its ordinal
        assert!(!index.contains_key("2"));
        assert_eq!(index.entries(), 2);
        assert_eq!(index.loaded(), 1);
    }

    #[test]
    fn test_missing_phone_registers_absent() {
        let record = LocationRecord::new("Ogre (Rigas iela 5)", "", 1);
        let index = build_index(&[record], CollisionPolicy::default());
        assert_eq!(index.get("rigas iela 5"), Some(None));
        assert_eq!(index.missing_phone(), 1);
    }

    #[test]
    fn test_last_write_wins_on_shared_short_address() {
        let records = vec![
            LocationRecord::new("A (Skolas iela 1, Riga)", "111", 1),
            LocationRecord::new("B (Skolas iela 1, Jurmala)", "222", 2),
        ];
        let index = build_index(&records, CollisionPolicy::LastWriteWins);
        assert_eq!(phone_of(&index, "skolas iela 1"), Some("222"));
        assert_eq!(phone_of(&index, "skolas iela 1, riga"), Some("111"));
    }

    #[test]
    fn test_first_write_wins_on_shared_short_address() {
        let records = vec![
            LocationRecord::new("A (Skolas iela 1, Riga)", "111", 1),
            LocationRecord::new("B (Skolas iela 1, Jurmala)", "222", 2),
        ];
        let index = build_index(&records, CollisionPolicy::FirstWriteWins);
        assert_eq!(phone_of(&index, "skolas iela 1"), Some("111"));
    }

    #[test]
    fn test_name_can_shadow_ordinal_key() {
        // A location literally named "2" collides with the ordinal of the
        // second location; the second one registers later and wins.
        let records = vec![
            LocationRecord::new("2", "111", 1),
            LocationRecord::new("Other", "222", 2),
        ];
        let index = build_index(&records, CollisionPolicy::LastWriteWins);
        assert_eq!(phone_of(&index, "2"), Some("222"));
    }
}
