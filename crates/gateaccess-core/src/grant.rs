//! Grant deduplication and statement rendering

use crate::phone::PhoneNumber;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Deduplication identity of a grant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrantKey {
    pub client_phone: PhoneNumber,
    pub gate_phone: PhoneNumber,
}

/// A client phone allowed to open a gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRecord {
    pub client_phone: PhoneNumber,
    pub gate_phone: PhoneNumber,
    /// Informational only, never part of the identity
    pub client_name: Option<String>,
}

/// How the client name is quoted in the statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameQuoting {
    /// Wrap in single quotes as-is. Embedded quotes break the statement.
    #[default]
    Verbatim,
    /// Double embedded single quotes
    Escaped,
}

impl NameQuoting {
    /// Spelling used in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verbatim => "verbatim",
            Self::Escaped => "escaped",
        }
    }
}

/// Run-wide set of grants in first-seen order
#[derive(Debug, Clone, Default)]
pub struct GrantSet {
    grants: IndexMap<GrantKey, Option<String>>,
    duplicates: usize,
}

impl GrantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate grant. Returns `false` when the pair was already
    /// granted; the first occurrence keeps its client name.
    pub fn insert(
        &mut self,
        client_phone: PhoneNumber,
        gate_phone: PhoneNumber,
        client_name: Option<String>,
    ) -> bool {
        let key = GrantKey {
            client_phone,
            gate_phone,
        };
        match self.grants.entry(key) {
            Entry::Occupied(_) => {
                self.duplicates += 1;
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(client_name);
                true
            }
        }
    }

    pub fn contains(&self, client_phone: &PhoneNumber, gate_phone: &PhoneNumber) -> bool {
        self.grants.contains_key(&GrantKey {
            client_phone: client_phone.clone(),
            gate_phone: gate_phone.clone(),
        })
    }

    /// Number of distinct grants
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Number of candidates discarded as duplicates
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Grants in emission order
    pub fn iter(&self) -> impl Iterator<Item = GrantRecord> + '_ {
        self.grants.iter().map(|(key, name)| GrantRecord {
            client_phone: key.client_phone.clone(),
            gate_phone: key.gate_phone.clone(),
            client_name: name.clone(),
        })
    }

    pub fn into_records(self) -> Vec<GrantRecord> {
        self.grants
            .into_iter()
            .map(|(key, client_name)| GrantRecord {
                client_phone: key.client_phone,
                gate_phone: key.gate_phone,
                client_name,
            })
            .collect()
    }
}

/// Render one grant as an `access` table INSERT statement
pub fn render_statement(grant: &GrantRecord, quoting: NameQuoting) -> String {
    let client = match &grant.client_name {
        Some(name) => match quoting {
            NameQuoting::Verbatim => format!("'{}'", name),
            NameQuoting::Escaped => format!("'{}'", name.replace('\'', "''")),
        },
        None => "NULL".to_string(),
    };
    format!(
        "INSERT INTO access (cid, did, client) VALUES ('{}', '{}', {});",
        grant.client_phone, grant.gate_phone, client
    )
}

/// Render grants as newline-separated statements, no trailing newline
pub fn render_statements<'a, I>(grants: I, quoting: NameQuoting) -> String
where
    I: IntoIterator<Item = &'a GrantRecord>,
{
    grants
        .into_iter()
        .map(|grant| render_statement(grant, quoting))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(digits: &str) -> PhoneNumber {
        PhoneNumber::parse(digits)
    }

    fn grant(name: Option<&str>) -> GrantRecord {
        GrantRecord {
            client_phone: p("37129999999"),
            gate_phone: p("37120000001"),
            client_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_quoting_config_spelling() {
        for quoting in [NameQuoting::Verbatim, NameQuoting::Escaped] {
            let json = serde_json::to_string(&quoting).unwrap();
            assert_eq!(json, format!("\"{}\"", quoting.as_str()));
        }
    }

    #[test]
    fn test_render_with_name() {
        assert_eq!(
            render_statement(&grant(Some("Jan Berzins")), NameQuoting::Verbatim),
            "INSERT INTO access (cid, did, client) VALUES ('37129999999', '37120000001', 'Jan Berzins');"
        );
    }

    #[test]
    fn test_render_null_name() {
        assert_eq!(
            render_statement(&grant(None), NameQuoting::Verbatim),
            "INSERT INTO access (cid, did, client) VALUES ('37129999999', '37120000001', NULL);"
        );
    }

    #[test]
    fn test_verbatim_keeps_quotes() {
        let line = render_statement(&grant(Some("O'Brien")), NameQuoting::Verbatim);
        assert!(line.ends_with("'O'Brien');"));
    }

    #[test]
    fn test_escaped_doubles_quotes() {
        let line = render_statement(&grant(Some("O'Brien")), NameQuoting::Escaped);
        assert!(line.ends_with("'O''Brien');"));
    }

    #[test]
    fn test_render_statements_join() {
        let grants = vec![grant(None), grant(Some("A"))];
        let sql = render_statements(&grants, NameQuoting::Verbatim);
        assert_eq!(sql.lines().count(), 2);
        assert!(!sql.ends_with('\n'));
        assert_eq!(render_statements(&Vec::new(), NameQuoting::Verbatim), "");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut set = GrantSet::new();
        assert!(set.insert(p("1"), p("10"), Some("First".into())));
        assert!(set.insert(p("2"), p("10"), None));
        assert!(!set.insert(p("1"), p("10"), Some("Second".into())));
        assert!(set.insert(p("1"), p("11"), None));

        let records: Vec<GrantRecord> = set.iter().collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].client_name.as_deref(), Some("First"));
        assert_eq!(records[1].client_phone, p("2"));
        assert_eq!(records[2].gate_phone, p("11"));
        assert_eq!(set.duplicates(), 1);
    }

    #[test]
    fn test_dedup_counts_distinct_pairs() {
        let pairs = [("1", "10"), ("2", "10"), ("1", "10"), ("1", "20"), ("2", "10"), ("1", "10")];
        let mut set = GrantSet::new();
        for (client, gate) in pairs {
            set.insert(p(client), p(gate), None);
        }
        assert_eq!(set.len(), 3);
        assert_eq!(set.duplicates(), 3);
        assert!(set.contains(&p("1"), &p("20")));
    }

    #[test]
    fn test_into_records_order() {
        let mut set = GrantSet::new();
        set.insert(p("3"), p("9"), None);
        set.insert(p("1"), p("9"), None);
        let records = set.into_records();
        assert_eq!(records[0].client_phone, p("3"));
        assert_eq!(records[1].client_phone, p("1"));
    }
}
