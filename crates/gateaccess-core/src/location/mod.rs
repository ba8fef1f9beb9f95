//! Facility locations and the lookup structures built from them
//!
//! Locations come from a JSON document of the form
//! `{"locations": [{"name": "...", "phone": "..."}, ...]}`. Two lookup
//! structures can be built from the loaded records:
//! - [`LocationIndex`]: address/name/ordinal keys for text matching
//! - [`LocationPhoneTable`]: gate phones by position for index matching

mod index;
mod table;

pub use index::{build_index, CollisionPolicy, LocationIndex};
pub use table::{build_table, LocationPhoneTable};

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Key under which the location list is stored by default
pub const DEFAULT_LOCATIONS_KEY: &str = "locations";

/// Structural problems with the location dataset. All of them are fatal:
/// no contact can be resolved without locations.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Failed to read locations from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Locations in {origin} are not valid JSON: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    #[error("Locations in {origin} must be a JSON object at the top level")]
    NotAnObject { origin: String },

    #[error("Locations in {origin} have no '{key}' key")]
    MissingKey { origin: String, key: String },

    #[error("'{key}' in {origin} is not a list")]
    NotAList { origin: String, key: String },
}

/// One facility from the location dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRecord {
    /// Name as written in the dataset, usually `Title (street, city)`
    pub display_name: String,
    /// Gate phone as written in the dataset
    pub raw_phone: String,
    /// 1-based position in the dataset
    pub ordinal_position: usize,
}

impl LocationRecord {
    pub fn new(
        display_name: impl Into<String>,
        raw_phone: impl Into<String>,
        ordinal_position: usize,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            raw_phone: raw_phone.into(),
            ordinal_position,
        }
    }

    fn from_json(entry: &Value, ordinal_position: usize) -> Self {
        Self {
            display_name: scalar_field(entry, "name"),
            raw_phone: scalar_field(entry, "phone"),
            ordinal_position,
        }
    }
}

/// String or number field of a JSON entry; anything else reads as empty
fn scalar_field(entry: &Value, field: &str) -> String {
    match entry.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Load location records from a JSON file
pub fn load_locations(path: &Path, key: &str) -> Result<Vec<LocationRecord>, LocationError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LocationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_locations(&contents, &path.display().to_string(), key)
}

/// Parse location records from JSON text. `origin` names the document in
/// error messages.
pub fn parse_locations(
    json: &str,
    origin: &str,
    key: &str,
) -> Result<Vec<LocationRecord>, LocationError> {
    let document: Value = serde_json::from_str(json).map_err(|source| LocationError::Json {
        origin: origin.to_string(),
        source,
    })?;

    let object = document.as_object().ok_or_else(|| LocationError::NotAnObject {
        origin: origin.to_string(),
    })?;

    let entries = match object.get(key) {
        None => {
            return Err(LocationError::MissingKey {
                origin: origin.to_string(),
                key: key.to_string(),
            })
        }
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(LocationError::NotAList {
                origin: origin.to_string(),
                key: key.to_string(),
            })
        }
    };

    Ok(entries
        .iter()
        .enumerate()
        .map(|(i, entry)| LocationRecord::from_json(entry, i + 1))
        .collect())
}

/// Normalize free text for key comparison: lower-case, then each doubled
/// space becomes one space (a single left-to-right pass).
pub fn normalize_location_key(text: &str) -> String {
    text.to_lowercase().replace("  ", " ")
}

/// The part of a normalized key before its first comma
pub fn short_location_key(key: &str) -> &str {
    key.split(',').next().unwrap_or(key).trim()
}

/// Address between the first `(` and the first `)` of a location name
fn extract_address(name: &str) -> Option<&str> {
    let open = name.find('(')?;
    let close = name.find(')')?;
    let inner = name.get(open + 1..close)?.trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}
