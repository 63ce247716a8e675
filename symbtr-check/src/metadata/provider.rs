//! Metadata provider collaborators
//!
//! The attribute validator does not talk to the external metadata service
//! itself. It asks a [`MetadataProvider`] for the record of an identifier;
//! providers answer with an empty record when they know nothing about it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use symbtr_common::Result;
use tracing::debug;

use super::MetadataRecord;

/// Source of external metadata records
pub trait MetadataProvider {
    /// Record for `mbid`; `None` or an unknown identifier yields an empty record
    fn fetch(&self, mbid: Option<&str>) -> Result<MetadataRecord>;
}

/// Provider that never has metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProvider for NoMetadata {
    fn fetch(&self, _mbid: Option<&str>) -> Result<MetadataRecord> {
        Ok(MetadataRecord::default())
    }
}

/// Records held in memory, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: HashMap<String, MetadataRecord>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, mbid: impl Into<String>, record: MetadataRecord) -> Self {
        self.records.insert(mbid.into(), record);
        self
    }
}

impl MetadataProvider for StaticProvider {
    fn fetch(&self, mbid: Option<&str>) -> Result<MetadataRecord> {
        Ok(mbid
            .and_then(|id| self.records.get(id))
            .cloned()
            .unwrap_or_default())
    }
}

/// Pre-fetched records stored as `<dir>/<mbid>.json`
#[derive(Debug, Clone)]
pub struct JsonDirectoryProvider {
    dir: PathBuf,
}

impl JsonDirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MetadataProvider for JsonDirectoryProvider {
    fn fetch(&self, mbid: Option<&str>) -> Result<MetadataRecord> {
        let Some(mbid) = mbid.filter(|id| !id.is_empty()) else {
            return Ok(MetadataRecord::default());
        };

        let path = self.dir.join(format!("{}.json", mbid));
        if !path.exists() {
            debug!("No metadata record for {} in {}", mbid, self.dir.display());
            return Ok(MetadataRecord::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let record = serde_json::from_str(&content)?;
        debug!("Loaded metadata record {}", path.display());
        Ok(record)
    }
}
