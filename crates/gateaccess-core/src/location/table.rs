//! Positional gate phone table

use super::LocationRecord;
use crate::phone::PhoneNumber;

/// Gate phones in dataset order; slot `i` belongs to ordinal `i + 1`
#[derive(Debug, Clone, Default)]
pub struct LocationPhoneTable {
    phones: Vec<Option<PhoneNumber>>,
}

impl LocationPhoneTable {
    /// Phone at a 1-based ordinal. `None` when the ordinal is out of range,
    /// `Some(None)` when the slot exists but has no phone.
    pub fn get(&self, ordinal: i64) -> Option<Option<&PhoneNumber>> {
        let offset = usize::try_from(ordinal.checked_sub(1)?).ok()?;
        self.phones.get(offset).map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    pub fn missing_phone(&self) -> usize {
        self.phones.iter().filter(|p| p.is_none()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&PhoneNumber>> {
        self.phones.iter().map(Option::as_ref)
    }
}

/// Build the positional table. Every record keeps its slot, named or not.
pub fn build_table(records: &[LocationRecord]) -> LocationPhoneTable {
    let phones: Vec<Option<PhoneNumber>> = records
        .iter()
        .map(|record| {
            let phone = PhoneNumber::parse(&record.raw_phone).non_empty();
            if phone.is_none() {
                tracing::warn!("Location #{}: no gate phone (phone)", record.ordinal_position);
            }
            phone
        })
        .collect();

    tracing::info!("Loaded {} gate phones by position", phones.len());
    LocationPhoneTable { phones }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LocationPhoneTable {
        build_table(&[
            LocationRecord::new("A", "+371 111", 1),
            LocationRecord::new("", "", 2),
            LocationRecord::new("C", "333", 3),
        ])
    }

    #[test]
    fn test_positions() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).flatten().map(PhoneNumber::as_str), Some("371111"));
        assert_eq!(table.get(3).flatten().map(PhoneNumber::as_str), Some("333"));
    }

    #[test]
    fn test_empty_slot_kept() {
        let table = table();
        assert_eq!(table.get(2), Some(None));
        assert_eq!(table.missing_phone(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let table = table();
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(-5), None);
        assert_eq!(table.get(4), None);
        assert_eq!(table.get(i64::MIN), None);
    }
}
