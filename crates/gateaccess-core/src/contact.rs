//! Contact rows and the column lookups performed on them
//!
//! A contact is a header-keyed row from a CRM export. Concepts that may live
//! under several column spellings (client phone, storage location, gate
//! phone override) are read through a [`FieldChain`], an ordered list of
//! column names tried in sequence.

use crate::phone::PhoneNumber;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One input row from a contact source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    source: String,
    row: usize,
    fields: HashMap<String, String>,
}

impl ContactRecord {
    /// Create an empty record. `row` is the 1-based line in the source,
    /// counting the header as line 1.
    pub fn new(source: impl Into<String>, row: usize) -> Self {
        Self {
            source: source.into(),
            row,
            fields: HashMap::new(),
        }
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Raw value of a column, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Trimmed value of a column, empty when the column is missing
    pub fn get_trimmed(&self, column: &str) -> &str {
        self.get(column).map(str::trim).unwrap_or("")
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// `source:row`, used as the prefix of every per-contact log line
    pub fn position(&self) -> String {
        format!("{}:{}", self.source, self.row)
    }
}

/// Ordered list of column names that hold the same concept.
///
/// Earlier names take precedence; a column counts only when its value is
/// not blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldChain(Vec<String>);

impl FieldChain {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw value of the first column with a non-blank value
    pub fn first_value<'a>(&self, contact: &'a ContactRecord) -> Option<&'a str> {
        self.0
            .iter()
            .filter_map(|column| contact.get(column))
            .find(|value| !value.trim().is_empty())
    }

    /// First column whose value normalizes to a non-empty phone number
    pub fn first_phone(&self, contact: &ContactRecord) -> Option<PhoneNumber> {
        self.0
            .iter()
            .filter_map(|column| contact.get(column))
            .map(PhoneNumber::parse)
            .find(|phone| !phone.is_empty())
    }
}

/// Column names of a contact source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub display_name: String,
    /// Client phone: primary first, mobile second
    pub client_phone: FieldChain,
    /// Free-text storage location (address matching)
    pub storage_location: FieldChain,
    /// Numeric storage index (1-based position in the location list)
    pub storage_number: FieldChain,
    /// Inline gate phone override, consulted last
    pub gate_phone: FieldChain,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            first_name: "First Name".to_string(),
            last_name: "Last Name".to_string(),
            company_name: "Company Name".to_string(),
            display_name: "Display Name".to_string(),
            client_phone: FieldChain::new(["Phone", "MobilePhone"]),
            storage_location: FieldChain::new(["CF.Storage location", "CF.Noliktavas lokācija"]),
            storage_number: FieldChain::new(["CF.Noliktavas numurs", "CF.Storage number"]),
            gate_phone: FieldChain::new([
                "GatePhone",
                "Gate Phone",
                "CF.Gate number",
                "CF.Gate phone 1",
            ]),
        }
    }
}

impl ColumnMap {
    /// Columns every source is expected to carry. A source missing any of
    /// them is still processed, with a warning.
    pub fn expected_headers(&self) -> Vec<&str> {
        let mut headers = vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.company_name.as_str(),
            self.display_name.as_str(),
        ];
        headers.extend(self.client_phone.columns().iter().map(String::as_str));
        headers
    }

    /// Client phone of a contact, empty when no phone column has digits
    pub fn client_phone(&self, contact: &ContactRecord) -> Option<PhoneNumber> {
        self.client_phone.first_phone(contact)
    }

    /// Inline gate phone override of a contact
    pub fn inline_gate_phone(&self, contact: &ContactRecord) -> Option<PhoneNumber> {
        self.gate_phone.first_phone(contact)
    }

    /// Informational client name for a grant.
    ///
    /// First and last name win over company, company over display name.
    pub fn client_name(&self, contact: &ContactRecord) -> Option<String> {
        let first = contact.get_trimmed(&self.first_name);
        let last = contact.get_trimmed(&self.last_name);
        if !first.is_empty() || !last.is_empty() {
            return Some(format!("{} {}", first, last).trim().to_string());
        }

        [&self.company_name, &self.display_name]
            .into_iter()
            .map(|column| contact.get_trimmed(column))
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}
