//! The fixed rule set applied to every import row.
//!
//! Each rule is a pure function of the row and the reference snapshot that
//! returns its message when the row violates it. [`RULES`] lists them in the
//! order their messages appear in a rejection.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::reference::ReferenceSnapshot;
use super::row::{is_blank, ImportRow, TestResultEntry};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_INVALID_SUBCENTER: &str = "Invalid Subcenter code.";
pub const MSG_REGISTRATION_REQUIRED: &str = "Registration Number is mandatory.";
pub const MSG_REGISTRATION_NOT_NUMBER: &str = "Registration number should be a number.";
pub const MSG_INVALID_SAMPLE_SOURCE: &str = "Invalid Sample source.";
pub const MSG_INVALID_TEST_NAMES_PREFIX: &str = "Invalid test names: ";
pub const MSG_NO_TEST_RESULT: &str = "There should be atleast one Test with a Result.";
pub const MSG_INVALID_TEST_RESULT: &str = "All Tests should have a result.";
pub const MSG_ACCESSION_REQUIRED: &str = "AccessionNumber should not be blank.";
pub const MSG_ACCESSION_FORMAT: &str = "AccessionNumber format is invalid.";
pub const MSG_INVALID_DATE: &str =
    "Date should be in dd-mm-yyyy format and should be a valid date.";

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// `chrono` format of the sample date column.
pub const SAMPLE_DATE_FORMAT: &str = "%d-%m-%Y";

static ACCESSION_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9-]+$").expect("valid regex"));

static SAMPLE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").expect("valid regex"));

/// Parse a `dd-mm-yyyy` sample date.
///
/// Exactly two day digits, two month digits and four year digits are
/// required, and the result must be a real calendar date. Year `0000`
/// does not exist in the Gregorian calendar and is rejected.
pub fn parse_sample_date(value: &str) -> Option<NaiveDate> {
    if !SAMPLE_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, SAMPLE_DATE_FORMAT)
        .ok()
        .filter(|date| date.year() >= 1)
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A single check. Returns the violation message, if any.
pub type Rule = fn(&ImportRow, &ReferenceSnapshot<'_>) -> Option<String>;

/// Every rule, in reporting order.
pub const RULES: [Rule; 10] = [
    subcenter_is_known,
    registration_number_present,
    registration_number_is_numeric,
    sample_source_is_known,
    test_names_are_active,
    has_at_least_one_result,
    all_results_are_valid,
    accession_number_present,
    accession_number_format,
    sample_date_is_valid,
];

fn violation(failed: bool, message: &str) -> Option<String> {
    failed.then(|| message.to_string())
}

pub fn subcenter_is_known(row: &ImportRow, refs: &ReferenceSnapshot<'_>) -> Option<String> {
    let code = &row.subcenter_code;
    violation(
        is_blank(code) || !refs.subcenters.contains(code),
        MSG_INVALID_SUBCENTER,
    )
}

pub fn registration_number_present(row: &ImportRow, _: &ReferenceSnapshot<'_>) -> Option<String> {
    violation(
        is_blank(&row.patient_registration_number),
        MSG_REGISTRATION_REQUIRED,
    )
}

/// Independent of [`registration_number_present`]: a blank value fails both.
pub fn registration_number_is_numeric(
    row: &ImportRow,
    _: &ReferenceSnapshot<'_>,
) -> Option<String> {
    violation(
        row.patient_registration_number.parse::<i32>().is_err(),
        MSG_REGISTRATION_NOT_NUMBER,
    )
}

pub fn sample_source_is_known(row: &ImportRow, refs: &ReferenceSnapshot<'_>) -> Option<String> {
    let source = &row.sample_source;
    violation(
        is_blank(source) || !refs.sample_sources.contains(source),
        MSG_INVALID_SAMPLE_SOURCE,
    )
}

/// Reports every populated entry whose test is not in the active catalog,
/// in row order and original casing. Entries without a result are skipped.
pub fn test_names_are_active(row: &ImportRow, refs: &ReferenceSnapshot<'_>) -> Option<String> {
    let unknown: Vec<&str> = row
        .test_results
        .iter()
        .filter(|entry| !entry.is_empty())
        .filter(|entry| !refs.test_names.contains(&entry.test_name.to_lowercase()))
        .map(|entry| entry.test_name.as_str())
        .collect();

    if unknown.is_empty() {
        None
    } else {
        Some(format!("{MSG_INVALID_TEST_NAMES_PREFIX}{}.", unknown.join(",")))
    }
}

/// Also fails a row with no entries at all.
pub fn has_at_least_one_result(row: &ImportRow, _: &ReferenceSnapshot<'_>) -> Option<String> {
    violation(
        row.test_results.iter().all(TestResultEntry::is_empty),
        MSG_NO_TEST_RESULT,
    )
}

pub fn all_results_are_valid(row: &ImportRow, _: &ReferenceSnapshot<'_>) -> Option<String> {
    violation(
        row.test_results
            .iter()
            .any(|entry| !entry.is_empty() && !entry.is_valid()),
        MSG_INVALID_TEST_RESULT,
    )
}

pub fn accession_number_present(row: &ImportRow, _: &ReferenceSnapshot<'_>) -> Option<String> {
    violation(is_blank(&row.accession_number), MSG_ACCESSION_REQUIRED)
}

/// A blank accession number fails here as well as in
/// [`accession_number_present`].
pub fn accession_number_format(row: &ImportRow, _: &ReferenceSnapshot<'_>) -> Option<String> {
    violation(
        !ACCESSION_NUMBER_RE.is_match(&row.accession_number),
        MSG_ACCESSION_FORMAT,
    )
}

pub fn sample_date_is_valid(row: &ImportRow, _: &ReferenceSnapshot<'_>) -> Option<String> {
    violation(parse_sample_date(&row.sample_date).is_none(), MSG_INVALID_DATE)
}
