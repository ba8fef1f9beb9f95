//! Contact sources (CRM CSV exports)

use crate::contact::ContactRecord;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A contact source that could not be read. Only that source is skipped.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Error reading CSV {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error reading CSV {label}: {source}")]
    Csv { label: String, source: csv::Error },
}

/// Fully read contact source
#[derive(Debug, Clone, Default)]
pub struct ContactSource {
    /// Identifier used in log lines, normally the file path
    pub label: String,
    pub headers: Vec<String>,
    pub contacts: Vec<ContactRecord>,
}

impl ContactSource {
    /// Expected columns this source lacks
    pub fn missing_columns<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|column| !self.headers.iter().any(|h| h == column))
            .collect()
    }
}

/// Read a CSV file with a header row
pub fn read_contacts(path: &Path) -> Result<ContactSource, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_contacts_from(file, &path.display().to_string())
}

/// Read CSV contacts from any reader. The whole source is read before it
/// is returned, so a malformed row rejects the source as a unit.
pub fn read_contacts_from<R: Read>(reader: R, label: &str) -> Result<ContactSource, SourceError> {
    let csv_err = |source| SourceError::Csv {
        label: label.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut contacts = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        // header is line 1
        let mut contact = ContactRecord::new(label, i + 2);
        for (header, value) in headers.iter().zip(record.iter()) {
            contact.insert(header.as_str(), value);
        }
        contacts.push(contact);
    }

    tracing::debug!("Read {} contacts from {}", contacts.len(), label);

    Ok(ContactSource {
        label: label.to_string(),
        headers,
        contacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "First Name,Last Name,Phone,CF.Storage location\n\
                       Jan,Berzins,+371 29999999,\"Maskavas iela 1, Riga\"\n\
                       Anna,,+371 28888888\n";

    #[test]
    fn test_reads_rows_by_header() {
        let source = read_contacts_from(CSV.as_bytes(), "region1.csv").unwrap();
        assert_eq!(source.contacts.len(), 2);

        let jan = &source.contacts[0];
        assert_eq!(jan.row(), 2);
        assert_eq!(jan.get("CF.Storage location"), Some("Maskavas iela 1, Riga"));
        assert_eq!(jan.position(), "region1.csv:2");
    }

    #[test]
    fn test_short_rows_are_kept() {
        let source = read_contacts_from(CSV.as_bytes(), "region1.csv").unwrap();
        let anna = &source.contacts[1];
        assert_eq!(anna.row(), 3);
        assert_eq!(anna.get("Phone"), Some("+371 28888888"));
        assert_eq!(anna.get("CF.Storage location"), None);
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let csv = "\u{feff}First Name,Phone\nJan,1\n";
        let source = read_contacts_from(csv.as_bytes(), "bom.csv").unwrap();
        assert_eq!(source.headers[0], "First Name");
        assert_eq!(source.contacts[0].get("First Name"), Some("Jan"));
    }

    #[test]
    fn test_missing_columns() {
        let source = read_contacts_from(CSV.as_bytes(), "region1.csv").unwrap();
        assert_eq!(
            source.missing_columns(&["First Name", "MobilePhone", "Phone"]),
            vec!["MobilePhone"]
        );
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let source = read_contacts(file.path()).unwrap();
        assert_eq!(source.contacts.len(), 2);
        assert_eq!(source.label, file.path().display().to_string());
    }

    #[test]
    fn test_missing_file() {
        let err = read_contacts(Path::new("/nonexistent/contacts.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }

    #[test]
    fn test_invalid_utf8_rejects_source() {
        let bytes: &[u8] = b"First Name,Phone\n\xff\xfe,1\n";
        let err = read_contacts_from(bytes, "broken.csv").unwrap_err();
        assert!(matches!(err, SourceError::Csv { .. }));
    }
}
