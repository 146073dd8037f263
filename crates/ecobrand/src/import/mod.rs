//! Reader for CSV exports of the legacy product catalog.

mod normalizer;
mod parser;

pub use parser::LegacyExport;

use std::io::Read;
use std::path::Path;

use tracing::debug;

#[derive(Debug)]
pub enum LegacyImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for LegacyImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegacyImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            LegacyImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
        }
    }
}

impl std::error::Error for LegacyImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LegacyImportError::Io(err) => Some(err),
            LegacyImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LegacyImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LegacyImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Converts legacy export rows into unscored product drafts. Rows without a product name are
/// dropped and counted in [`LegacyExport::nameless_rows`].
pub struct LegacyCatalogImporter;

impl LegacyCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<LegacyExport, LegacyImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<LegacyExport, LegacyImportError> {
        let export = parser::parse_drafts(reader)?;
        debug!(
            drafts = export.drafts.len(),
            nameless_rows = export.nameless_rows,
            "parsed legacy catalog export"
        );
        Ok(export)
    }
}
