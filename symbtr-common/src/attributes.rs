//! Canonical attribute records
//!
//! A score is described by three categorical attributes (makam, form and
//! usul). Each category has a reference dictionary mapping a stable
//! attribute key to an [`AttributeRecord`]. Records carry the SymbTr slug
//! used as a join key, the Mu2 naming-convention name, the name used by the
//! external metadata source and the set of tags that source may use.
//!
//! Makam records additionally carry the tonic (karar) symbol and the key
//! signature; usul records carry their variants.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Attribute category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Makam,
    Form,
    Usul,
}

impl AttributeKind {
    /// All categories in validation order
    pub const ALL: [AttributeKind; 3] = [AttributeKind::Makam, AttributeKind::Form, AttributeKind::Usul];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::Makam => "makam",
            AttributeKind::Form => "form",
            AttributeKind::Usul => "usul",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "makam" => Ok(AttributeKind::Makam),
            "form" => Ok(AttributeKind::Form),
            "usul" => Ok(AttributeKind::Usul),
            other => Err(Error::InvalidInput(format!("Unknown attribute category: {}", other))),
        }
    }
}

/// A named usul variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsulVariant {
    /// Mu2 name of the variant
    pub mu2_name: String,
    /// Pulse grouping (the note value of one pulse)
    #[serde(default)]
    pub mertebe: Option<u32>,
    /// Number of pulses in one cycle
    #[serde(default)]
    pub num_pulses: Option<u32>,
}

/// Canonical entry for one makam, form or usul
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// SymbTr slug (join key against score names)
    pub symbtr_slug: String,

    /// Mu2 name (makam and form only, usul names live in `variants`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu2_name: Option<String>,

    /// Name used by the external metadata source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dunya_name: Option<String>,

    /// Tags the external metadata source may use for this value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mb_tag: Vec<String>,

    /// Tonic symbol (makam only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karar_symbol: Option<String>,

    /// Ordered accidental tokens of the key signature (makam only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_signature: Vec<String>,

    /// Usul variants (usul only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<UsulVariant>,
}

impl AttributeRecord {
    /// Record with only the slug set
    pub fn new(symbtr_slug: impl Into<String>) -> Self {
        Self {
            symbtr_slug: symbtr_slug.into(),
            ..Default::default()
        }
    }

    /// Whether `tag` is one of the external-source tags of this record
    pub fn has_tag(&self, tag: &str) -> bool {
        self.mb_tag.iter().any(|t| t == tag)
    }
}

/// Reference dictionary for one attribute category
///
/// Entries keep their source order. Slug lookups scan linearly and the first
/// entry with a matching slug wins.
#[derive(Debug, Clone)]
pub struct AttributeDictionary {
    kind: AttributeKind,
    entries: Vec<(String, AttributeRecord)>,
}

impl AttributeDictionary {
    /// Build a dictionary from ordered `(attribute key, record)` pairs
    ///
    /// Duplicate slugs are reported but kept; lookups return the first one.
    pub fn from_entries(kind: AttributeKind, entries: Vec<(String, AttributeRecord)>) -> Self {
        let mut seen = HashSet::new();
        for (key, record) in &entries {
            if !seen.insert(record.symbtr_slug.as_str()) {
                warn!(
                    category = %kind,
                    key = %key,
                    slug = %record.symbtr_slug,
                    "Duplicate slug in reference data, the first entry wins"
                );
            }
        }

        Self { kind, entries }
    }

    /// Empty dictionary
    pub fn empty(kind: AttributeKind) -> Self {
        Self { kind, entries: Vec::new() }
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record stored under an attribute key
    pub fn get(&self, key: &str) -> Option<&AttributeRecord> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    /// First record whose slug equals `slug`
    pub fn find_by_slug(&self, slug: &str) -> Option<&AttributeRecord> {
        self.iter().find(|(_, r)| r.symbtr_slug == slug).map(|(_, r)| r)
    }

    /// Attribute key of the first record whose slug equals `slug`
    pub fn key_for_slug(&self, slug: &str) -> Option<&str> {
        self.iter().find(|(_, r)| r.symbtr_slug == slug).map(|(k, _)| k)
    }

    /// Iterate over `(attribute key, record)` pairs in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }
}

/// The three reference dictionaries used during one validation run
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub makam: AttributeDictionary,
    pub form: AttributeDictionary,
    pub usul: AttributeDictionary,
}

impl ReferenceData {
    /// Load all three categories from a reference source
    pub fn load(source: &dyn crate::ReferenceSource) -> Result<Self> {
        let reference = Self {
            makam: source.load(AttributeKind::Makam)?,
            form: source.load(AttributeKind::Form)?,
            usul: source.load(AttributeKind::Usul)?,
        };
        for dict in [&reference.makam, &reference.form, &reference.usul] {
            debug!("Loaded {} {} records", dict.len(), dict.kind());
        }
        Ok(reference)
    }

    pub fn get(&self, kind: AttributeKind) -> &AttributeDictionary {
        match kind {
            AttributeKind::Makam => &self.makam,
            AttributeKind::Form => &self.form,
            AttributeKind::Usul => &self.usul,
        }
    }
}
