//! # SymbTr Common Library
//!
//! Shared code for the SymbTr consistency tools including:
//! - Error types
//! - Configuration loading and data folder resolution
//! - Canonical attribute records (makam, form, usul)
//! - Reference dictionary loading

pub mod attributes;
pub mod config;
pub mod error;
pub mod reference;

pub use attributes::{AttributeDictionary, AttributeKind, AttributeRecord, ReferenceData, UsulVariant};
pub use error::{Error, Result};
pub use reference::{InMemoryReference, JsonReferenceLoader, ReferenceSource};
