//! Integration tests for the attribute metadata validator

mod helpers;

use helpers::{capture_logs, reference_data};
use symbtr_check::metadata::{AttributeObservation, Entity, NoMetadata, StaticProvider};
use symbtr_check::{AttributeValidator, DiagnosticCategory, MetadataRecord, ScoreContainer, Severity};
use symbtr_common::config::ValidationConfig;
use symbtr_common::Error;
use tracing::Level;

const SCORE: &str = "hicaz--sarki--aksak--gel_ey_peri--dede_efendi";

fn observation(mu2_name: &str, mb_attribute: &str, mb_tag: &str) -> AttributeObservation {
    AttributeObservation {
        mu2_name: Some(mu2_name.to_string()),
        mb_attribute: Some(mb_attribute.to_string()),
        mb_tag: Some(mb_tag.to_string()),
        ..Default::default()
    }
}

fn consistent_record() -> MetadataRecord {
    MetadataRecord {
        work: Some(Entity {
            mbid: Some("work-1".to_string()),
            ..Default::default()
        }),
        composer: Some(Entity {
            mbid: Some("composer-1".to_string()),
            ..Default::default()
        }),
        makam: Some(observation("Hicaz", "Hicaz", "makam:hicaz")),
        form: Some(observation("Şarkı", "Şarkı", "sarki")),
        usul: Some(AttributeObservation {
            mertebe: Some(8),
            num_pulses: Some(9),
            ..observation("Aksak", "Aksak", "aksak")
        }),
        ..Default::default()
    }
}

fn validator_with(record: MetadataRecord) -> AttributeValidator<StaticProvider> {
    AttributeValidator::new(reference_data(), StaticProvider::new().with_record("work-1", record))
}

#[test]
fn test_consistent_metadata_is_valid_and_enriched() {
    let validator = validator_with(consistent_record());
    let (data, report) = validator.get_metadata(SCORE, Some("work-1")).unwrap();

    assert!(report.is_valid(), "unexpected diagnostics: {:?}", report.diagnostics());
    assert!(report.diagnostics().is_empty());

    assert_eq!(data.symbtr, SCORE);
    assert_eq!(data.makam.symbtr_slug.as_deref(), Some("hicaz"));
    assert_eq!(data.makam.attribute_key.as_deref(), Some("Hicaz"));
    assert_eq!(data.form.attribute_key.as_deref(), Some("Sarki"));
    assert_eq!(data.usul.attribute_key.as_deref(), Some("Aksak"));
    assert_eq!(data.tonic.as_deref(), Some("A4"));

    match data.container.as_ref().unwrap() {
        ScoreContainer::Work(work) => assert_eq!(work.symbtr_slug.as_deref(), Some("gel_ey_peri")),
        other => panic!("expected a work, got {other:?}"),
    }
    assert_eq!(data.composer.unwrap().symbtr_slug.as_deref(), Some("dede_efendi"));
}

#[test]
fn test_without_metadata_slugs_are_still_attached() {
    let validator = AttributeValidator::new(reference_data(), NoMetadata);
    let (data, report) = validator.get_metadata(SCORE, None).unwrap();

    assert!(report.is_valid());
    assert!(data.container.is_none());
    assert!(data.composer.is_none());
    assert_eq!(data.form.symbtr_slug.as_deref(), Some("sarki"));
    assert_eq!(data.usul.symbtr_slug.as_deref(), Some("aksak"));
}

#[test]
fn test_recording_receives_title_slug() {
    let record = MetadataRecord {
        recording: Some(Entity::default()),
        ..Default::default()
    };
    let (data, _) = validator_with(record).get_metadata(SCORE, Some("work-1")).unwrap();

    match data.container.unwrap() {
        ScoreContainer::Recording(recording) => {
            assert_eq!(recording.symbtr_slug.as_deref(), Some("gel_ey_peri"))
        }
        other => panic!("expected a recording, got {other:?}"),
    }
}

#[test]
fn test_unknown_slug_is_invalid_but_enriched() {
    let validator = AttributeValidator::new(reference_data(), NoMetadata);
    let (data, report) = validator
        .get_metadata("xyz--sarki--aksak--title--composer", None)
        .unwrap();

    assert!(!report.is_valid());
    assert_eq!(data.makam.symbtr_slug.as_deref(), Some("xyz"));
    assert!(data.makam.attribute_key.is_none());
    assert!(data.tonic.is_none());

    let slug_warnings: Vec<_> = report
        .warnings()
        .filter(|d| d.category == DiagnosticCategory::Slug)
        .collect();
    assert_eq!(slug_warnings.len(), 1);
    assert_eq!(slug_warnings[0].field, "makam.symbtr_slug");
    assert_eq!(slug_warnings[0].observed.as_deref(), Some("xyz"));
}

#[test]
fn test_malformed_score_name_is_error() {
    let validator = AttributeValidator::new(reference_data(), NoMetadata);
    let err = validator.get_metadata("hicaz--sarki--aksak", None).unwrap_err();
    assert!(matches!(err, Error::MalformedIdentifier { parts: 3, .. }));
}

#[test]
fn test_extra_name_parts_are_ignored() {
    let validator = AttributeValidator::new(reference_data(), NoMetadata);
    let (data, report) = validator
        .get_metadata("hicaz--sarki--aksak--title--composer--extra", None)
        .unwrap();

    assert!(report.is_valid());
    assert_eq!(data.makam.symbtr_slug.as_deref(), Some("hicaz"));
    assert_eq!(data.usul.attribute_key.as_deref(), Some("Aksak"));
    assert_eq!(data.tonic.as_deref(), Some("A4"));
}

#[test]
fn test_usul_pulse_mismatch_invalidates_matching_variant() {
    let mut record = consistent_record();
    record.usul = Some(AttributeObservation {
        mertebe: Some(4),
        num_pulses: Some(9),
        ..observation("Aksak", "Aksak", "aksak")
    });

    let (_, report) = validator_with(record).get_metadata(SCORE, Some("work-1")).unwrap();
    assert!(!report.is_valid());

    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category, DiagnosticCategory::UsulVariant);
    assert_eq!(warnings[0].field, "usul.mertebe");
    assert_eq!(warnings[0].observed.as_deref(), Some("4"));
    assert_eq!(warnings[0].expected.as_deref(), Some("8"));
}

#[test]
fn test_usul_second_variant_matches() {
    let mut record = consistent_record();
    record.usul = Some(AttributeObservation {
        mertebe: Some(4),
        num_pulses: Some(9),
        ..observation("Ağır Aksak", "Aksak", "aksak")
    });

    let (_, report) = validator_with(record).get_metadata(SCORE, Some("work-1")).unwrap();
    assert!(report.is_valid());
}

#[test]
fn test_usul_without_matching_variant_is_invalid() {
    let mut record = consistent_record();
    record.usul = Some(observation("Sofyan", "Aksak", "aksak"));

    let (_, report) = validator_with(record).get_metadata(SCORE, Some("work-1")).unwrap();
    assert!(!report.is_valid());
    assert!(report
        .warnings()
        .any(|d| d.category == DiagnosticCategory::NamingConvention && d.field == "usul.mu2_name"));
}

#[test]
fn test_form_mu2_mismatch_only_affects_form() {
    let mut record = consistent_record();
    record.form = Some(observation("Sarki", "Şarkı", "sarki"));

    let (_, report) = validator_with(record).get_metadata(SCORE, Some("work-1")).unwrap();
    assert!(!report.is_valid());

    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "form.mu2_name");
    assert_eq!(warnings[0].expected.as_deref(), Some("Şarkı"));
}

#[test]
fn test_external_name_differs_vs_missing() {
    let mut record = consistent_record();
    record.makam = Some(observation("Hicaz", "Hicazkar", "hicaz"));
    record.form = Some(observation("Şarkı", "", "sarki"));

    let (_, report) = validator_with(record).get_metadata(SCORE, Some("work-1")).unwrap();
    assert!(!report.is_valid());

    let external: Vec<_> = report
        .warnings()
        .filter(|d| d.category == DiagnosticCategory::ExternalName)
        .collect();
    assert_eq!(external.len(), 2);
    assert!(external[0].message.contains("does not match"));
    assert_eq!(external[0].observed.as_deref(), Some("Hicazkar"));
    assert!(external[1].message.contains("does not exist"));
}

#[test]
fn test_unlisted_usul_skips_external_name_check() {
    let record = MetadataRecord {
        usul: Some(AttributeObservation {
            mb_attribute: Some("Anything".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let validator = validator_with(record);

    let ((_, report), logs) =
        capture_logs(|| validator.get_metadata("hicaz--sarki--223--title--composer", Some("work-1")).unwrap());

    assert!(report.is_valid());
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].severity, Severity::Info);
    assert!(logs.contains("not stored in MusicBrainz"));
    assert_eq!(logs.count_level(Level::WARN), 0);
}

#[test]
fn test_unlisted_usul_list_comes_from_config() {
    let record = MetadataRecord {
        usul: Some(AttributeObservation {
            mb_attribute: Some("Anything".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let config = ValidationConfig {
        unlisted_usul_slugs: Vec::new(),
        ..Default::default()
    };
    let validator = AttributeValidator::with_config(
        reference_data(),
        StaticProvider::new().with_record("work-1", record),
        &config,
    );

    let (_, report) = validator
        .get_metadata("hicaz--sarki--223--title--composer", Some("work-1"))
        .unwrap();
    assert!(!report.is_valid());
}

#[test]
fn test_external_tag_must_be_member() {
    let mut record = consistent_record();
    record.makam = Some(observation("Hicaz", "Hicaz", "makam:huzzam"));

    let (_, report) = validator_with(record).get_metadata(SCORE, Some("work-1")).unwrap();
    assert!(!report.is_valid());
    assert!(report
        .warnings()
        .any(|d| d.category == DiagnosticCategory::ExternalTag && d.observed.as_deref() == Some("makam:huzzam")));
}

#[test]
fn test_warnings_are_logged() {
    let validator = AttributeValidator::new(reference_data(), NoMetadata);
    let (_, logs) = capture_logs(|| {
        validator
            .get_metadata("xyz--sarki--aksak--title--composer", None)
            .unwrap()
    });

    assert_eq!(logs.count_level(Level::WARN), 1);
    assert!(logs.contains("The slug does not match"));
}

#[test]
fn test_key_signature_through_validator() {
    let validator = AttributeValidator::new(reference_data(), NoMetadata);

    assert!(validator
        .validate_key_signature(&["B4b2", "C5#4", "F5#3"], "Hicaz", SCORE)
        .is_valid());
    assert!(validator
        .validate_key_signature(&["B4b1", "F5#4"], "rast", SCORE)
        .is_valid());

    let (report, logs) =
        capture_logs(|| validator.validate_key_signature(&["B4b3", "C5#4", "F5#3"], "Hicaz", SCORE));
    assert!(!report.is_valid());
    assert!(logs.contains("Key signature is different!"));
    assert!(logs.contains("B4b3 C5#4 F5#3 -> B4b1 C5#4 F5#3"));
}

#[test]
fn test_key_signature_length_difference_is_invalid() {
    let validator = AttributeValidator::new(reference_data(), NoMetadata);
    let report = validator.validate_key_signature(&["B4b1", "C5#4", "F5#3", "G5b1"], "Hicaz", SCORE);
    assert!(!report.is_valid());
}
