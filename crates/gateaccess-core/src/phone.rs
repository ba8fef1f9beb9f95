//! Phone number normalization
//!
//! Every phone value in the pipeline (client phones, gate phones, inline
//! overrides) goes through [`normalize`] before it is compared or emitted.

use std::fmt;

/// A phone number reduced to its ASCII digits.
///
/// The empty value is legal and means "no phone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize arbitrary input into a phone number.
    pub fn parse(raw: &str) -> Self {
        Self(raw.chars().filter(|c| c.is_ascii_digit()).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Some(self)` unless the number is empty
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip everything but digits. Absent input yields the empty number.
pub fn normalize(raw: Option<&str>) -> PhoneNumber {
    raw.map(PhoneNumber::parse).unwrap_or_default()
}
