//! Positional index matching

use super::{inline_fallback, LocationResolver, MatchSource, Resolution, Unresolved};
use crate::contact::{ColumnMap, ContactRecord};
use crate::location::LocationPhoneTable;

/// Resolves the numeric storage number as a 1-based position in the
/// location list.
pub struct PositionalIndexResolver {
    table: LocationPhoneTable,
    columns: ColumnMap,
}

impl PositionalIndexResolver {
    pub fn new(table: LocationPhoneTable, columns: ColumnMap) -> Self {
        Self { table, columns }
    }
}

/// Parse a storage number. Whole-valued decimals such as `3.0` are
/// accepted since spreadsheet exports write numbers that way.
fn parse_storage_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl LocationResolver for PositionalIndexResolver {
    fn resolve(&self, contact: &ContactRecord) -> Result<Resolution, Unresolved> {
        let raw = self
            .columns
            .storage_number
            .first_value(contact)
            .ok_or(Unresolved::MissingIndex)?;

        let index = parse_storage_number(raw).ok_or_else(|| Unresolved::InvalidIndex {
            raw: raw.trim().to_string(),
        })?;

        let slot = self.table.get(index).ok_or(Unresolved::IndexOutOfRange {
            index,
            len: self.table.len(),
        })?;

        if let Some(phone) = slot {
            return Ok(Resolution {
                gate_phone: phone.clone(),
                matched_by: MatchSource::Position(index),
            });
        }

        tracing::debug!(
            "{}: location #{} has no gate phone, trying inline columns",
            contact.position(),
            index
        );
        inline_fallback(&self.columns, contact).ok_or_else(|| Unresolved::NoGatePhone {
            location: format!("#{}", index),
        })
    }

    fn locations(&self) -> usize {
        self.table.len()
    }

    fn keys(&self) -> usize {
        self.table.len()
    }

    fn name(&self) -> &'static str {
        "positional"
    }
}
