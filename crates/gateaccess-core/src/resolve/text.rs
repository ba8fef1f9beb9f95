//! Address-text matching

use super::{inline_fallback, LocationResolver, MatchSource, Resolution, Unresolved};
use crate::contact::{ColumnMap, ContactRecord};
use crate::location::{normalize_location_key, short_location_key, LocationIndex};
use crate::phone::PhoneNumber;

/// Resolves the free-text storage location through a [`LocationIndex`].
///
/// Lookup order, first key hit wins:
/// 1. full normalized location text
/// 2. location text up to the first comma
/// 3. storage number, verbatim
///
/// A key hit with no phone stops the lookup; the inline gate phone columns
/// are consulted after that.
pub struct TextAddressResolver {
    index: LocationIndex,
    columns: ColumnMap,
}

impl TextAddressResolver {
    pub fn new(index: LocationIndex, columns: ColumnMap) -> Self {
        Self { index, columns }
    }

    /// Index lookup without the inline fallback. `None` means no key hit.
    fn lookup(
        &self,
        location_key: &str,
        contact: &ContactRecord,
    ) -> Option<(Option<&PhoneNumber>, MatchSource)> {
        if let Some(phone) = self.index.get(location_key) {
            return Some((phone, MatchSource::FullAddress));
        }

        if let Some(phone) = self.index.get(short_location_key(location_key)) {
            return Some((phone, MatchSource::ShortAddress));
        }

        let number = self.columns.storage_number.first_value(contact)?;
        self.index
            .get(number)
            .map(|phone| (phone, MatchSource::StorageNumber))
    }
}

impl LocationResolver for TextAddressResolver {
    fn resolve(&self, contact: &ContactRecord) -> Result<Resolution, Unresolved> {
        let location = self
            .columns
            .storage_location
            .first_value(contact)
            .map(str::trim)
            .ok_or(Unresolved::MissingLocation)?;

        let location_key = normalize_location_key(location);

        match self.lookup(&location_key, contact) {
            Some((Some(phone), matched_by)) => {
                return Ok(Resolution {
                    gate_phone: phone.clone(),
                    matched_by,
                });
            }
            Some((None, matched_by)) => {
                tracing::debug!(
                    "{}: '{}' matched by {} but the location has no gate phone",
                    contact.position(),
                    location,
                    matched_by
                );
            }
            None => {}
        }

        inline_fallback(&self.columns, contact).ok_or_else(|| Unresolved::NoGatePhone {
            location: location.to_string(),
        })
    }

    fn locations(&self) -> usize {
        self.index.entries()
    }

    fn keys(&self) -> usize {
        self.index.len()
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
