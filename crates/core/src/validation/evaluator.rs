//! Rule evaluator. Pure logic, no store access.

use super::reference::ReferenceSnapshot;
use super::row::{AcceptedRow, ImportRow, ValidationOutcome};
use super::rules::RULES;

/// Run every rule against `row` and collect the messages of those that
/// fail, in rule order. Never stops at the first failure.
pub fn collect_violations(row: &ImportRow, refs: &ReferenceSnapshot<'_>) -> Vec<String> {
    RULES.iter().filter_map(|rule| rule(row, refs)).collect()
}

/// Validate one row against the reference snapshot.
///
/// The row is returned untouched inside the outcome. A rejection carries
/// every message, each terminated by a newline.
pub fn evaluate_row(row: ImportRow, refs: &ReferenceSnapshot<'_>) -> ValidationOutcome {
    let violations = collect_violations(&row, refs);
    if violations.is_empty() {
        return ValidationOutcome::Accepted {
            row: AcceptedRow::new(row),
        };
    }

    let errors = violations.iter().fold(String::new(), |mut text, message| {
        text.push_str(message);
        text.push('\n');
        text
    });
    ValidationOutcome::Rejected { row, errors }
}
