//! gateaccess core - contacts and locations to gate access grants
//!
//! This library provides the core functionality for:
//! - Phone number normalization
//! - Location lookup structures (address text index, positional table)
//! - Gate phone resolution for CRM contacts
//! - Grant deduplication and INSERT statement rendering

pub mod config;
pub mod contact;
pub mod grant;
pub mod location;
pub mod phone;
pub mod resolve;
pub mod source;

mod pipeline;

pub use config::{Config, ConfigError};
pub use contact::{ColumnMap, ContactRecord, FieldChain};
pub use grant::{GrantKey, GrantRecord, GrantSet, NameQuoting};
pub use location::{CollisionPolicy, LocationError, LocationRecord};
pub use phone::{normalize, PhoneNumber};
pub use pipeline::{ContactOutcome, Pipeline, PipelineResult, RunSummary};
pub use resolve::{LocationResolver, Strategy, Unresolved};

use std::path::Path;

/// Run the whole batch: load locations, process every contact source in
/// order and render the grants.
///
/// This is the main entry point for the library. Only a broken locations
/// file is an error; unreadable contact sources are logged and skipped.
pub fn generate_access_sql<P: AsRef<Path>>(
    config: &Config,
    locations_path: &Path,
    sources: &[P],
) -> anyhow::Result<PipelineResult> {
    let mut pipeline = Pipeline::from_locations_file(config, locations_path)?;
    for source in sources {
        pipeline.process_file(source.as_ref());
    }
    Ok(pipeline.finish())
}
