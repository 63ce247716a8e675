//! Test Helper Utilities
//!
//! Shared fixtures for testing symbtr-check

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::{capture_logs, LogCapture};

use symbtr_common::{AttributeKind, AttributeRecord, InMemoryReference, ReferenceData, UsulVariant};

/// Reference data with a handful of real makam, form and usul entries
pub fn reference_data() -> ReferenceData {
    let source = InMemoryReference::new()
        .with_record(
            AttributeKind::Makam,
            "Hicaz",
            AttributeRecord {
                mu2_name: Some("Hicaz".to_string()),
                dunya_name: Some("Hicaz".to_string()),
                mb_tag: vec!["hicaz".to_string(), "makam:hicaz".to_string()],
                karar_symbol: Some("A4".to_string()),
                key_signature: vec!["B4b1".to_string(), "C5#4".to_string(), "F5#3".to_string()],
                ..AttributeRecord::new("hicaz")
            },
        )
        .with_record(
            AttributeKind::Makam,
            "Rast",
            AttributeRecord {
                mu2_name: Some("Rast".to_string()),
                dunya_name: Some("Rast".to_string()),
                mb_tag: vec!["rast".to_string()],
                karar_symbol: Some("G4".to_string()),
                key_signature: vec!["B4b1".to_string(), "F5#4".to_string()],
                ..AttributeRecord::new("rast")
            },
        )
        .with_record(
            AttributeKind::Form,
            "Sarki",
            AttributeRecord {
                mu2_name: Some("Şarkı".to_string()),
                dunya_name: Some("Şarkı".to_string()),
                mb_tag: vec!["sarki".to_string(), "form:sarki".to_string()],
                ..AttributeRecord::new("sarki")
            },
        )
        .with_record(
            AttributeKind::Usul,
            "Aksak",
            AttributeRecord {
                dunya_name: Some("Aksak".to_string()),
                mb_tag: vec!["aksak".to_string()],
                variants: vec![
                    UsulVariant {
                        mu2_name: "Aksak".to_string(),
                        mertebe: Some(8),
                        num_pulses: Some(9),
                    },
                    UsulVariant {
                        mu2_name: "Ağır Aksak".to_string(),
                        mertebe: Some(4),
                        num_pulses: Some(9),
                    },
                ],
                ..AttributeRecord::new("aksak")
            },
        )
        .with_record(
            AttributeKind::Usul,
            "Aksak 223",
            AttributeRecord {
                mb_tag: vec!["223".to_string()],
                ..AttributeRecord::new("223")
            },
        );

    ReferenceData::load(&source).unwrap()
}
