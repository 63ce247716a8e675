//! Reference dictionary loading
//!
//! Reference data lives in one JSON file per category (`makam.json`,
//! `form.json`, `usul.json`) mapping an attribute key to its record. Key
//! order in the file is kept so that first-match-wins slug lookups are
//! deterministic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::attributes::{AttributeDictionary, AttributeKind, AttributeRecord};
use crate::{Error, Result};

/// Source of canonical reference dictionaries
pub trait ReferenceSource {
    /// Load the dictionary of one attribute category
    fn load(&self, kind: AttributeKind) -> Result<AttributeDictionary>;
}

/// Loads `<data_dir>/<category>.json`
#[derive(Debug, Clone)]
pub struct JsonReferenceLoader {
    data_dir: PathBuf,
}

impl JsonReferenceLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file holding one category
    pub fn file_path(&self, kind: AttributeKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind))
    }
}

impl ReferenceSource for JsonReferenceLoader {
    fn load(&self, kind: AttributeKind) -> Result<AttributeDictionary> {
        let path = self.file_path(kind);
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Reference data for {} not found: {}",
                kind,
                path.display()
            )));
        }

        debug!("Loading {} reference data from {}", kind, path.display());
        let content = std::fs::read_to_string(&path)?;
        let dictionary = parse_dictionary(kind, &content)?;

        info!(category = %kind, entries = dictionary.len(), "Reference data loaded");
        Ok(dictionary)
    }
}

/// Parse a JSON object of `attribute key -> record` into a dictionary
pub fn parse_dictionary(kind: AttributeKind, content: &str) -> Result<AttributeDictionary> {
    // serde_json is built with preserve_order, so the map iterates in file order
    let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;

    let mut entries = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let record: AttributeRecord = serde_json::from_value(value).map_err(|e| {
            Error::Config(format!("Invalid {} record '{}': {}", kind, key, e))
        })?;
        entries.push((key, record));
    }

    Ok(AttributeDictionary::from_entries(kind, entries))
}

/// Reference dictionaries held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryReference {
    entries: HashMap<AttributeKind, Vec<(String, AttributeRecord)>>,
}

impl InMemoryReference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, keeping insertion order within its category
    pub fn with_record(
        mut self,
        kind: AttributeKind,
        key: impl Into<String>,
        record: AttributeRecord,
    ) -> Self {
        self.entries
            .entry(kind)
            .or_default()
            .push((key.into(), record));
        self
    }
}

impl ReferenceSource for InMemoryReference {
    fn load(&self, kind: AttributeKind) -> Result<AttributeDictionary> {
        Ok(match self.entries.get(&kind) {
            Some(entries) => AttributeDictionary::from_entries(kind, entries.clone()),
            None => AttributeDictionary::empty(kind),
        })
    }
}
