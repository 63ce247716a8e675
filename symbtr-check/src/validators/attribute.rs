//! Attribute metadata validator
//!
//! Decomposes a score name into its slugs, attaches them to the metadata
//! fetched from the external provider and cross-checks every categorical
//! attribute (makam, form, usul) against the canonical reference record with
//! the same slug. Each attribute passes four independent checks:
//! 1. **Slug**: the slug resolves to a canonical record
//! 2. **Naming convention**: the Mu2 name (and for usul the variant's pulse
//!    grouping and pulse count) matches the canonical record
//! 3. **External name**: the external-source attribute equals the canonical name
//! 4. **External tag**: the external-source tag is one of the canonical tags
//!
//! Mismatches never abort; they are collected in the returned report.

use symbtr_common::config::ValidationConfig;
use symbtr_common::{AttributeKind, AttributeRecord, ReferenceData, Result, UsulVariant};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCategory, ValidationReport};
use crate::identity::ScoreIdentity;
use crate::metadata::{AttributeObservation, MetadataProvider, ScoreMetadata};
use crate::validators::key_signature::check_key_signature;

/// Outcome of looking up an observed Mu2 name among the usul variants
#[derive(Debug, Clone, PartialEq)]
pub enum VariantMatch<'a> {
    /// A variant with the same name exists
    Matched(&'a UsulVariant),
    /// No variant carries the observed name
    NoMatch,
}

/// Find the first usul variant whose Mu2 name equals `mu2_name`
pub fn match_usul_variant<'a>(record: Option<&'a AttributeRecord>, mu2_name: &str) -> VariantMatch<'a> {
    record
        .and_then(|r| r.variants.iter().find(|v| v.mu2_name == mu2_name))
        .map_or(VariantMatch::NoMatch, VariantMatch::Matched)
}

/// Validates score attribute metadata against canonical reference data
pub struct AttributeValidator<P> {
    reference: ReferenceData,
    provider: P,
    unlisted_usul_slugs: Vec<String>,
}

impl<P: MetadataProvider> AttributeValidator<P> {
    /// Create validator with the default validation settings
    pub fn new(reference: ReferenceData, provider: P) -> Self {
        Self::with_config(reference, provider, &ValidationConfig::default())
    }

    /// Create validator with explicit validation settings
    pub fn with_config(reference: ReferenceData, provider: P, config: &ValidationConfig) -> Self {
        Self {
            reference,
            provider,
            unlisted_usul_slugs: config.unlisted_usul_slugs.clone(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Fetch, enrich and validate the metadata of a score
    ///
    /// Returns the enriched record together with the verdict; the record is
    /// complete even when the verdict is invalid. Only a malformed score
    /// name (or a failing collaborator) is an error.
    pub fn get_metadata(
        &self,
        score_name: &str,
        mbid: Option<&str>,
    ) -> Result<(ScoreMetadata, ValidationReport)> {
        let record = self.provider.fetch(mbid)?;
        let identity = ScoreIdentity::parse(score_name)?;

        let mut data = ScoreMetadata::from_record(score_name, record);

        for kind in AttributeKind::ALL {
            self.add_attribute_slug(&mut data, &identity, kind);
        }

        if let Some(container) = data.container.as_mut() {
            container.entity_mut().symbtr_slug = Some(identity.title.clone());
        }

        if let Some(composer) = data.composer.as_mut() {
            composer.symbtr_slug = Some(identity.composer.clone());
        }

        let report = self.validate_makam_form_usul(&data, score_name);

        data.tonic = data
            .makam
            .symbtr_slug
            .as_deref()
            .and_then(|slug| self.reference.makam.find_by_slug(slug))
            .and_then(|makam| makam.karar_symbol.clone());

        report.emit();
        Ok((data, report))
    }

    /// Attach the identity slug and the resolved attribute key
    fn add_attribute_slug(&self, data: &mut ScoreMetadata, identity: &ScoreIdentity, kind: AttributeKind) {
        let slug = identity.slug(kind);
        let attribute_key = self.reference.get(kind).key_for_slug(slug).map(str::to_string);

        debug!(category = %kind, slug = slug, key = ?attribute_key, "Resolved attribute key");

        let observation = data.observation_mut(kind);
        observation.symbtr_slug = Some(slug.to_string());
        observation.attribute_key = attribute_key;
    }

    /// Validate makam, form and usul; the verdict is the AND of the three
    pub fn validate_makam_form_usul(&self, data: &ScoreMetadata, score_name: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        for kind in AttributeKind::ALL {
            report.merge(self.validate_attribute(data.observation(kind), kind, score_name));
        }
        report
    }

    /// Run the four checks for one attribute
    pub fn validate_attribute(
        &self,
        observation: &AttributeObservation,
        kind: AttributeKind,
        score_name: &str,
    ) -> ValidationReport {
        let canonical = observation
            .symbtr_slug
            .as_deref()
            .and_then(|slug| self.reference.get(kind).find_by_slug(slug));

        let mut report = ValidationReport::new();
        report.merge(validate_slug(observation, canonical, kind, score_name));
        report.merge(validate_mu2_attribute(observation, canonical, kind, score_name));
        report.merge(self.validate_external_attribute(observation, canonical, kind, score_name));
        report.merge(validate_external_tag(observation, canonical, kind, score_name));
        report
    }

    /// Check a key signature against the canonical makam key signature
    pub fn validate_key_signature<S: AsRef<str>>(
        &self,
        key_signature: &[S],
        makam: &str,
        score_name: &str,
    ) -> ValidationReport {
        let report = check_key_signature(&self.reference.makam, key_signature, makam, score_name);
        report.emit();
        report
    }

    fn validate_external_attribute(
        &self,
        observation: &AttributeObservation,
        canonical: Option<&AttributeRecord>,
        kind: AttributeKind,
        score_name: &str,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let Some(mb_attribute) = observation.mb_attribute.as_deref() else {
            return report;
        };
        let field = format!("{}.mb_attribute", kind);

        let unlisted = kind == AttributeKind::Usul
            && observation
                .symbtr_slug
                .as_deref()
                .is_some_and(|slug| self.unlisted_usul_slugs.iter().any(|s| s == slug));

        if unlisted {
            report.push(Diagnostic::info(
                DiagnosticCategory::ExternalName,
                score_name,
                field,
                "The usul attribute is not stored in MusicBrainz",
            ));
            return report;
        }

        let expected = canonical.and_then(|r| r.dunya_name.as_deref());
        if Some(mb_attribute) != expected {
            let diagnostic = if mb_attribute.is_empty() {
                Diagnostic::warning(
                    DiagnosticCategory::ExternalName,
                    score_name,
                    field,
                    "The MusicBrainz attribute does not exist",
                )
            } else {
                Diagnostic::warning(
                    DiagnosticCategory::ExternalName,
                    score_name,
                    field,
                    "The MusicBrainz attribute does not match",
                )
                .observed(mb_attribute)
            };
            report.push(diagnostic.expected(expected.unwrap_or("<none>")));
        }

        report
    }
}

fn validate_slug(
    observation: &AttributeObservation,
    canonical: Option<&AttributeRecord>,
    kind: AttributeKind,
    score_name: &str,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    if let Some(slug) = observation.symbtr_slug.as_deref() {
        let expected = canonical.map(|r| r.symbtr_slug.as_str());
        if Some(slug) != expected {
            report.push(
                Diagnostic::warning(
                    DiagnosticCategory::Slug,
                    score_name,
                    format!("{}.symbtr_slug", kind),
                    "The slug does not match",
                )
                .observed(slug)
                .expected(expected.unwrap_or("<none>")),
            );
        }
    }
    report
}

fn validate_mu2_attribute(
    observation: &AttributeObservation,
    canonical: Option<&AttributeRecord>,
    kind: AttributeKind,
    score_name: &str,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let Some(mu2_name) = observation.mu2_name.as_deref() else {
        return report;
    };

    if kind == AttributeKind::Usul {
        match match_usul_variant(canonical, mu2_name) {
            VariantMatch::Matched(variant) => {
                check_pulse_field(&mut report, score_name, variant, "mertebe", variant.mertebe, observation.mertebe);
                check_pulse_field(
                    &mut report,
                    score_name,
                    variant,
                    "num_pulses",
                    variant.num_pulses,
                    observation.num_pulses,
                );
            }
            VariantMatch::NoMatch => report.push(
                Diagnostic::warning(
                    DiagnosticCategory::NamingConvention,
                    score_name,
                    "usul.mu2_name",
                    "The Mu2 attribute does not match any usul variant",
                )
                .observed(mu2_name),
            ),
        }
        return report;
    }

    let expected = canonical.and_then(|r| r.mu2_name.as_deref());
    if Some(mu2_name) != expected {
        report.push(
            Diagnostic::warning(
                DiagnosticCategory::NamingConvention,
                score_name,
                format!("{}.mu2_name", kind),
                "The Mu2 attribute does not match",
            )
            .observed(mu2_name)
            .expected(expected.unwrap_or("<none>")),
        );
    }
    report
}

fn check_pulse_field(
    report: &mut ValidationReport,
    score_name: &str,
    variant: &UsulVariant,
    name: &str,
    expected: Option<u32>,
    observed: Option<u32>,
) {
    if expected != observed {
        report.push(
            Diagnostic::warning(
                DiagnosticCategory::UsulVariant,
                score_name,
                format!("usul.{}", name),
                format!("The {} of the usul in the score does not match {}", name, variant.mu2_name),
            )
            .observed(format_pulse(observed))
            .expected(format_pulse(expected)),
        );
    }
}

fn format_pulse(value: Option<u32>) -> String {
    value.map_or_else(|| "<none>".to_string(), |v| v.to_string())
}

fn validate_external_tag(
    observation: &AttributeObservation,
    canonical: Option<&AttributeRecord>,
    kind: AttributeKind,
    score_name: &str,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    if let Some(tag) = observation.mb_tag.as_deref() {
        if !canonical.is_some_and(|r| r.has_tag(tag)) {
            report.push(
                Diagnostic::warning(
                    DiagnosticCategory::ExternalTag,
                    score_name,
                    format!("{}.mb_tag", kind),
                    "The MusicBrainz tag does not match",
                )
                .observed(tag),
            );
        }
    }
    report
}
