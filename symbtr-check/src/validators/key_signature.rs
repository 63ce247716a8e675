//! Key signature comparison
//!
//! Accidental tokens encode a note and a comma deviation, e.g. `B4b1` is
//! B4 flattened by one comma. Theory (AEU) and practice disagree by a comma
//! for some accidentals, so two tokens on the same note are equivalent when
//! their comma counts differ by at most one.

use symbtr_common::AttributeDictionary;

use crate::diagnostics::{Diagnostic, DiagnosticCategory, ValidationReport};

/// Split an accidental token into its note part and trailing comma count
///
/// `B4b1` -> (`B4b`, Some("1")). The count is kept as its decimal digits
/// without leading zeros, so counts of any length compare exactly. A token
/// without trailing digits has no count.
pub fn split_accidental(token: &str) -> (&str, Option<&str>) {
    let note_len = token.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (note, digits) = token.split_at(note_len);
    if digits.is_empty() {
        return (note, None);
    }

    let trimmed = digits.trim_start_matches('0');
    (note, Some(if trimmed.is_empty() { "0" } else { trimmed }))
}

/// Whether two normalized decimal counts differ by at most one
fn within_one_comma(commas1: &str, commas2: &str) -> bool {
    if commas1 == commas2 {
        return true;
    }

    let (lower, higher) = if (commas1.len(), commas1) < (commas2.len(), commas2) {
        (commas1, commas2)
    } else {
        (commas2, commas1)
    };
    increment_decimal(lower) == higher
}

/// `n + 1` for a decimal digit string
fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

/// Whether two accidental tokens are equivalent
pub fn compare_accidentals(acc1: &str, acc2: &str) -> bool {
    if acc1 == acc2 {
        return true;
    }

    match (split_accidental(acc1), split_accidental(acc2)) {
        ((note1, Some(commas1)), (note2, Some(commas2))) if !note1.is_empty() && note1 == note2 => {
            within_one_comma(commas1, commas2)
        }
        _ => false,
    }
}

/// Compare a score's key signature with the canonical makam key signature
///
/// `makam` is looked up by attribute key first, then by slug. An unknown
/// makam or a different number of accidentals invalidates the report, as
/// does any position whose accidentals are not equivalent.
pub fn check_key_signature<S: AsRef<str>>(
    makam_dict: &AttributeDictionary,
    key_signature: &[S],
    makam: &str,
    score_name: &str,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let observed = join_tokens(key_signature.iter().map(|s| s.as_ref()));

    let Some(record) = makam_dict.get(makam).or_else(|| makam_dict.find_by_slug(makam)) else {
        report.push(
            Diagnostic::warning(
                DiagnosticCategory::KeySignature,
                score_name,
                "key_signature",
                "The makam has no key signature in the reference data",
            )
            .observed(makam),
        );
        return report;
    };

    let canonical = &record.key_signature;
    let same_length = key_signature.len() == canonical.len();
    let same_accidentals = key_signature
        .iter()
        .zip(canonical)
        .all(|(k1, k2)| compare_accidentals(k1.as_ref(), k2));

    if !(same_length && same_accidentals) {
        report.push(
            Diagnostic::warning(
                DiagnosticCategory::KeySignature,
                score_name,
                "key_signature",
                "Key signature is different!",
            )
            .observed(observed)
            .expected(join_tokens(canonical.iter().map(String::as_str))),
        );
    }

    report
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}
