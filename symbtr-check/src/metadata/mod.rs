//! Score metadata records
//!
//! [`MetadataRecord`] is what the external metadata provider returns for an
//! identifier. [`ScoreMetadata`] is the enriched record produced by the
//! attribute validator: the provider data plus the slugs and attribute keys
//! decomposed from the score name and the tonic of the makam.

pub mod provider;

pub use provider::{JsonDirectoryProvider, MetadataProvider, NoMetadata, StaticProvider};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use symbtr_common::AttributeKind;

/// A work, recording or composer entry of the metadata record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbid: Option<String>,

    /// Slug taken from the score name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbtr_slug: Option<String>,

    /// Provider fields this crate does not interpret (title, name, dates...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Observed value of one categorical attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeObservation {
    /// Slug taken from the score name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbtr_slug: Option<String>,

    /// Key of the canonical record with the same slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_key: Option<String>,

    /// Name in the Mu2 naming convention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu2_name: Option<String>,

    /// Attribute value stored by the external metadata source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mb_attribute: Option<String>,

    /// Tag used by the external metadata source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mb_tag: Option<String>,

    /// Pulse grouping (usul only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mertebe: Option<u32>,

    /// Pulses per cycle (usul only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pulses: Option<u32>,
}

/// Raw record returned by a [`MetadataProvider`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<Entity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<Entity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<Entity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makam: Option<AttributeObservation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<AttributeObservation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usul: Option<AttributeObservation>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    pub fn is_empty(&self) -> bool {
        *self == MetadataRecord::default()
    }
}

/// What the score transcribes: a work or a recording
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreContainer {
    Work(Entity),
    Recording(Entity),
}

impl ScoreContainer {
    /// Pick the container from the provider record; a work wins over a recording
    pub fn resolve(work: Option<Entity>, recording: Option<Entity>) -> Option<Self> {
        match (work, recording) {
            (Some(work), _) => Some(ScoreContainer::Work(work)),
            (None, Some(recording)) => Some(ScoreContainer::Recording(recording)),
            (None, None) => None,
        }
    }

    pub fn entity(&self) -> &Entity {
        match self {
            ScoreContainer::Work(e) | ScoreContainer::Recording(e) => e,
        }
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        match self {
            ScoreContainer::Work(e) | ScoreContainer::Recording(e) => e,
        }
    }
}

/// Enriched score metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMetadata {
    /// Full score name
    pub symbtr: String,

    #[serde(flatten)]
    pub container: Option<ScoreContainer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<Entity>,

    pub makam: AttributeObservation,
    pub form: AttributeObservation,
    pub usul: AttributeObservation,

    /// Tonic symbol of the makam, when the makam is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tonic: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScoreMetadata {
    /// Start an enriched record from the provider record
    pub fn from_record(score_name: &str, record: MetadataRecord) -> Self {
        Self {
            symbtr: score_name.to_string(),
            container: ScoreContainer::resolve(record.work, record.recording),
            composer: record.composer,
            makam: record.makam.unwrap_or_default(),
            form: record.form.unwrap_or_default(),
            usul: record.usul.unwrap_or_default(),
            tonic: None,
            extra: record.extra,
        }
    }

    pub fn observation(&self, kind: AttributeKind) -> &AttributeObservation {
        match kind {
            AttributeKind::Makam => &self.makam,
            AttributeKind::Form => &self.form,
            AttributeKind::Usul => &self.usul,
        }
    }

    pub fn observation_mut(&mut self, kind: AttributeKind) -> &mut AttributeObservation {
        match kind {
            AttributeKind::Makam => &mut self.makam,
            AttributeKind::Form => &mut self.form,
            AttributeKind::Usul => &mut self.usul,
        }
    }
}
