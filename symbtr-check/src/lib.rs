//! symbtr-check library interface
//!
//! Consistency checks for SymbTr makam music scores:
//! - attribute metadata (makam, form, usul, composer) against the canonical
//!   reference dictionaries and the external metadata record
//! - key signatures against the canonical makam key signature
//! - measure boundaries in a score's cumulative offset sequence

pub mod diagnostics;
pub mod identity;
pub mod metadata;
pub mod validators;

pub use diagnostics::{Diagnostic, DiagnosticCategory, Severity, ValidationReport};
pub use identity::ScoreIdentity;
pub use metadata::{MetadataProvider, MetadataRecord, ScoreContainer, ScoreMetadata};
pub use validators::{AttributeValidator, OffsetValidator};
