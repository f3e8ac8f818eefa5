//! # FORM VALIDATION ENGINE
//!
//! Evaluates every field of a `RuleSet` against a `DataRecord`.
//!
//! 1. **REQUIRED** - a required field that is empty gets "This field is
//!    required" and nothing else is checked for it.
//! 2. **OPTIONAL** - an empty optional field is valid.
//! 3. **CHECKS** - every configured check runs in order; each failure
//!    overwrites the field's message, so the last failing check is reported.

use super::rules::RuleSet;
use super::validators::is_empty;
use super::FieldViolation;
use crate::types::DataRecord;
use serde::Serialize;
use std::collections::BTreeMap;

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// **VALIDATION RESULT**
///
/// `is_valid` is derived from `errors` at construction and never diverges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(BTreeMap::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn into_errors(self) -> BTreeMap<String, String> {
        self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// `field: message` pairs joined on one line, in field order.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validates `record` against `rules`. Field violations never surface as
/// errors; a panicking custom predicate propagates to the caller.
pub fn validate_form(record: &DataRecord, rules: &RuleSet) -> ValidationResult {
    let mut errors = BTreeMap::new();

    for (field, rule) in rules.iter() {
        let value = record.get(field);

        if is_empty(value) {
            if rule.required {
                errors.insert(field.to_string(), REQUIRED_MESSAGE.to_string());
            }
            continue;
        }
        let Some(value) = value else {
            continue;
        };

        let mut last: Option<FieldViolation> = None;
        for check in rule.checks() {
            if let Err(violation) = check.check(value, record) {
                last = Some(violation);
            }
        }
        if let Some(violation) = last {
            errors.insert(field.to_string(), violation.message);
        }
    }

    ValidationResult::from_errors(errors)
}
