//! Validation layer
//!
//! # Validators
//! 1. **attribute** - makam/form/usul metadata against the reference dictionaries
//! 2. **key_signature** - key signature against the canonical makam key signature
//! 3. **offset** - measure boundaries in cumulative offset sequences
//!
//! All validators are stateless apart from immutable reference data and
//! report soft inconsistencies through a [`crate::ValidationReport`].

pub mod attribute;
pub mod key_signature;
pub mod offset;

pub use attribute::AttributeValidator;
pub use key_signature::{check_key_signature, compare_accidentals};
pub use offset::OffsetValidator;
