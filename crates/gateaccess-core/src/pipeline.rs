//! Main processing pipeline: Locations → Contacts → Grants

use crate::{
    config::Config,
    contact::{ColumnMap, ContactRecord},
    grant::{render_statements, GrantRecord, GrantSet, NameQuoting},
    location::{load_locations, LocationError, LocationRecord},
    resolve::{build_resolver, LocationResolver, Unresolved},
    source::{read_contacts, ContactSource},
};
use std::path::Path;

/// What happened to a single contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// A new grant was recorded
    Granted,
    /// The (client, gate) pair was already granted
    Duplicate,
    /// Neither the primary nor the mobile phone had digits
    MissingClientPhone,
    /// No gate phone could be found
    Unresolved(Unresolved),
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub locations: usize,
    pub location_keys: usize,
    pub sources_processed: usize,
    pub sources_failed: usize,
    pub contacts: usize,
    pub grants: usize,
    pub duplicates: usize,
    pub missing_client_phone: usize,
    pub missing_location: usize,
    pub invalid_index: usize,
    pub index_out_of_range: usize,
    pub no_gate_phone: usize,
}

impl RunSummary {
    /// Contacts skipped for any reason other than duplication
    pub fn skipped(&self) -> usize {
        self.missing_client_phone
            + self.missing_location
            + self.invalid_index
            + self.index_out_of_range
            + self.no_gate_phone
    }

    fn record(&mut self, outcome: &ContactOutcome) {
        self.contacts += 1;
        match outcome {
            ContactOutcome::Granted => self.grants += 1,
            ContactOutcome::Duplicate => self.duplicates += 1,
            ContactOutcome::MissingClientPhone => self.missing_client_phone += 1,
            ContactOutcome::Unresolved(reason) => match reason {
                Unresolved::MissingLocation | Unresolved::MissingIndex => {
                    self.missing_location += 1
                }
                Unresolved::InvalidIndex { .. } => self.invalid_index += 1,
                Unresolved::IndexOutOfRange { .. } => self.index_out_of_range += 1,
                Unresolved::NoGatePhone { .. } => self.no_gate_phone += 1,
            },
        }
    }
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Grants in emission order
    pub grants: Vec<GrantRecord>,
    /// Newline-joined INSERT statements
    pub statements: String,
    pub summary: RunSummary,
}

/// The grant pipeline for one run.
///
/// Locations are resolved once at construction; contact sources are then
/// fed one after another and share a single deduplication set.
pub struct Pipeline {
    resolver: Box<dyn LocationResolver>,
    columns: ColumnMap,
    quoting: NameQuoting,
    grants: GrantSet,
    summary: RunSummary,
    /// Log the lookup step behind every grant
    trace_matches: bool,
}

impl Pipeline {
    /// Create a pipeline from already loaded location records
    pub fn new(config: &Config, locations: &[LocationRecord]) -> Self {
        tracing::info!("Initializing gate access pipeline");
        tracing::info!("  Strategy: {}", config.strategy.display_name());

        let resolver = build_resolver(
            config.strategy,
            locations,
            config.collision_policy,
            &config.columns,
        );

        let summary = RunSummary {
            locations: resolver.locations(),
            location_keys: resolver.keys(),
            ..RunSummary::default()
        };

        Self {
            resolver,
            columns: config.columns.clone(),
            quoting: config.client_name_quoting,
            grants: GrantSet::new(),
            summary,
            trace_matches: false,
        }
    }

    /// Create a pipeline from a locations JSON file. Any structural problem
    /// with the file is fatal.
    pub fn from_locations_file(config: &Config, path: &Path) -> Result<Self, LocationError> {
        let locations = load_locations(path, &config.locations_key)?;
        tracing::info!("Read {} locations from {}", locations.len(), path.display());
        Ok(Self::new(config, &locations))
    }

    /// Log which lookup step resolved each contact
    pub fn with_match_tracing(mut self, enabled: bool) -> Self {
        self.trace_matches = enabled;
        self
    }

    /// Read and process one CSV source. A source that cannot be read is
    /// logged and skipped; it never stops the run.
    pub fn process_file(&mut self, path: &Path) -> bool {
        match read_contacts(path) {
            Ok(source) => {
                self.process_source(&source);
                true
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.summary.sources_failed += 1;
                false
            }
        }
    }

    /// Process every contact of an already read source
    pub fn process_source(&mut self, source: &ContactSource) {
        let missing = source.missing_columns(&self.columns.expected_headers());
        if !missing.is_empty() {
            tracing::warn!("{}: missing fields: {}", source.label, missing.join(", "));
        }

        let before = self.summary.grants;
        for contact in &source.contacts {
            self.process_contact(contact);
        }
        self.summary.sources_processed += 1;

        tracing::info!(
            "{}: {} contacts, {} new grants",
            source.label,
            source.contacts.len(),
            self.summary.grants - before
        );
    }

    /// Resolve one contact and record its grant
    pub fn process_contact(&mut self, contact: &ContactRecord) -> ContactOutcome {
        let outcome = self.resolve_contact(contact);
        self.summary.record(&outcome);
        outcome
    }

    fn resolve_contact(&mut self, contact: &ContactRecord) -> ContactOutcome {
        let Some(client_phone) = self.columns.client_phone(contact) else {
            tracing::warn!("{}: no client phone", contact.position());
            return ContactOutcome::MissingClientPhone;
        };

        let resolution = match self.resolver.resolve(contact) {
            Ok(resolution) => resolution,
            Err(reason) => {
                tracing::warn!("{}: {}", contact.position(), reason);
                return ContactOutcome::Unresolved(reason);
            }
        };

        if self.trace_matches {
            tracing::debug!(
                "{}: {} -> {} ({})",
                contact.position(),
                client_phone,
                resolution.gate_phone,
                resolution.matched_by
            );
        }

        let client_name = self.columns.client_name(contact);
        if self
            .grants
            .insert(client_phone, resolution.gate_phone, client_name)
        {
            ContactOutcome::Granted
        } else {
            ContactOutcome::Duplicate
        }
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Finish the run and render the statements
    pub fn finish(self) -> PipelineResult {
        let grants = self.grants.into_records();
        let statements = render_statements(&grants, self.quoting);
        tracing::info!(
            "Generated {} grants ({} duplicates collapsed, {} contacts skipped)",
            grants.len(),
            self.summary.duplicates,
            self.summary.skipped()
        );
        PipelineResult {
            grants,
            statements,
            summary: self.summary,
        }
    }
}
