//! # FIELD CHECKS AND CONCRETE VALIDATORS
//!
//! **CHECKS**: one type per constraint a `FieldRule` can carry, each
//! implementing `FieldCheck`. The engine runs them in a fixed order.
//! **VALIDATORS**: typed `Validator` implementations for whole records, email
//! addresses and password strength.

use super::engine::validate_form;
use super::password::{validate_password_strength, PasswordStrength};
use super::rules::{CustomValidator, RuleSet, ValidationOutcome};
use super::{error_codes, FieldViolation, Validator};
use crate::errors::VelixaError;
use crate::types::{
    display_string, format_number, strict_equals, to_number, trim_blank, DataRecord,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// True for absent values, `null`, blank strings and empty arrays.
pub fn is_empty(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => trim_blank(s).is_empty(),
        Some(JsonValue::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Basic `local@domain.tld` shape test.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Length of a value in characters; only strings and arrays have one.
fn value_length(value: &JsonValue) -> Option<usize> {
    match value {
        JsonValue::String(s) => Some(s.chars().count()),
        JsonValue::Array(items) => Some(items.len()),
        _ => None,
    }
}

// ================================================================================================
// FIELD CHECKS
// ================================================================================================

/// One constraint evaluated against a non-empty field value.
pub trait FieldCheck {
    fn check(&self, value: &JsonValue, record: &DataRecord) -> Result<(), FieldViolation>;
}

pub struct MinLengthCheck(pub usize);

impl FieldCheck for MinLengthCheck {
    fn check(&self, value: &JsonValue, _record: &DataRecord) -> Result<(), FieldViolation> {
        match value_length(value) {
            Some(len) if len < self.0 => Err(FieldViolation::new(
                error_codes::MIN_LENGTH,
                format!("Minimum length is {} characters", self.0),
            )),
            _ => Ok(()),
        }
    }
}

pub struct MaxLengthCheck(pub usize);

impl FieldCheck for MaxLengthCheck {
    fn check(&self, value: &JsonValue, _record: &DataRecord) -> Result<(), FieldViolation> {
        match value_length(value) {
            Some(len) if len > self.0 => Err(FieldViolation::new(
                error_codes::MAX_LENGTH,
                format!("Maximum length is {} characters", self.0),
            )),
            _ => Ok(()),
        }
    }
}

pub struct PatternCheck<'a> {
    pub pattern: &'a Regex,
    pub message: Option<&'a str>,
}

impl FieldCheck for PatternCheck<'_> {
    fn check(&self, value: &JsonValue, _record: &DataRecord) -> Result<(), FieldViolation> {
        if self.pattern.is_match(&display_string(value)) {
            Ok(())
        } else {
            Err(FieldViolation::new(
                error_codes::PATTERN,
                self.message.unwrap_or("Invalid format"),
            ))
        }
    }
}

pub struct EmailCheck;

impl FieldCheck for EmailCheck {
    fn check(&self, value: &JsonValue, _record: &DataRecord) -> Result<(), FieldViolation> {
        if is_valid_email(&display_string(value)) {
            Ok(())
        } else {
            Err(FieldViolation::new(
                error_codes::EMAIL,
                "Please enter a valid email address",
            ))
        }
    }
}

pub struct MatchesCheck<'a> {
    pub other: &'a str,
    pub message: Option<&'a str>,
}

impl FieldCheck for MatchesCheck<'_> {
    fn check(&self, value: &JsonValue, record: &DataRecord) -> Result<(), FieldViolation> {
        if strict_equals(value, record.get(self.other)) {
            return Ok(());
        }
        let message = match self.message {
            Some(message) => message.to_string(),
            None => format!("Must match {}", self.other),
        };
        Err(FieldViolation::new(error_codes::MATCHES, message))
    }
}

pub struct MinValueCheck(pub f64);

impl FieldCheck for MinValueCheck {
    fn check(&self, value: &JsonValue, _record: &DataRecord) -> Result<(), FieldViolation> {
        // NaN compares false, so non-numeric input passes.
        if to_number(value) < self.0 {
            Err(FieldViolation::new(
                error_codes::MIN_VALUE,
                format!("Minimum value is {}", format_number(self.0)),
            ))
        } else {
            Ok(())
        }
    }
}

pub struct MaxValueCheck(pub f64);

impl FieldCheck for MaxValueCheck {
    fn check(&self, value: &JsonValue, _record: &DataRecord) -> Result<(), FieldViolation> {
        if to_number(value) > self.0 {
            Err(FieldViolation::new(
                error_codes::MAX_VALUE,
                format!("Maximum value is {}", format_number(self.0)),
            ))
        } else {
            Ok(())
        }
    }
}

pub struct CustomCheck<'a>(pub &'a CustomValidator);

impl FieldCheck for CustomCheck<'_> {
    fn check(&self, value: &JsonValue, record: &DataRecord) -> Result<(), FieldViolation> {
        match (self.0)(value, record) {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(message) if message.is_empty() => {
                Err(FieldViolation::new(error_codes::CUSTOM, "Invalid value"))
            }
            ValidationOutcome::Invalid(message) => {
                Err(FieldViolation::new(error_codes::CUSTOM, message))
            }
        }
    }
}

// ================================================================================================
// FORM VALIDATOR - whole-record validation with a Result surface
// ================================================================================================

/// **FORM VALIDATOR**
///
/// Wraps a `RuleSet` so a record can be validated with `?`. The record is
/// handed back untouched on success.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    rules: RuleSet,
}

impl FormValidator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Validator for FormValidator {
    type Input = DataRecord;
    type Output = DataRecord;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, VelixaError> {
        let result = validate_form(&input, &self.rules);
        if result.is_valid() {
            Ok(input)
        } else {
            Err(VelixaError::InvalidForm(result))
        }
    }
}

// ================================================================================================
// EMAIL VALIDATOR
// ================================================================================================

#[derive(Debug, Clone, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    type Input = String;
    type Output = String;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, VelixaError> {
        if is_valid_email(&input) {
            Ok(input)
        } else {
            Err(FieldViolation::new(error_codes::EMAIL, "Please enter a valid email address").into())
        }
    }
}

// ================================================================================================
// PASSWORD STRENGTH VALIDATOR
// ================================================================================================

/// Rejects passwords scoring below `min_score`.
#[derive(Debug, Clone)]
pub struct PasswordStrengthValidator {
    min_score: u8,
}

impl PasswordStrengthValidator {
    pub fn new(min_score: u8) -> Self {
        Self { min_score }
    }

    pub fn min_score(&self) -> u8 {
        self.min_score
    }
}

impl Default for PasswordStrengthValidator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Validator for PasswordStrengthValidator {
    type Input = String;
    type Output = PasswordStrength;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, VelixaError> {
        let strength = validate_password_strength(&input);
        if strength.score >= self.min_score {
            Ok(strength)
        } else {
            Err(FieldViolation::new(error_codes::WEAK_PASSWORD, strength.message).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_record() -> DataRecord {
        DataRecord::new()
    }

    mod emptiness_tests {
        use super::*;

        #[test]
        fn test_is_empty_true_cases() {
            assert!(is_empty(None));
            assert!(is_empty(Some(&json!(null))));
            assert!(is_empty(Some(&json!(""))));
            assert!(is_empty(Some(&json!("   "))));
            assert!(is_empty(Some(&json!("\u{FEFF}"))));
            assert!(is_empty(Some(&json!([]))));
        }

        #[test]
        fn test_is_empty_false_cases() {
            assert!(!is_empty(Some(&json!("a"))));
            assert!(!is_empty(Some(&json!(0))));
            assert!(!is_empty(Some(&json!(false))));
            assert!(!is_empty(Some(&json!([1]))));
            assert!(!is_empty(Some(&json!({}))));
        }
    }

    mod email_tests {
        use super::*;

        #[test]
        fn test_valid_addresses() {
            assert!(is_valid_email("user@example.com"));
            assert!(is_valid_email("first.last+tag@sub.example.co"));
        }

        #[test]
        fn test_invalid_addresses() {
            assert!(!is_valid_email("a@b"));
            assert!(!is_valid_email("no-at-sign.com"));
            assert!(!is_valid_email("two@@example.com"));
            assert!(!is_valid_email("space in@example.com"));
            assert!(!is_valid_email(""));
        }

        #[test]
        fn test_email_validator_trait() {
            let validator = EmailValidator;
            assert_eq!(
                validator.validate("ada@example.org".to_string()).unwrap(),
                "ada@example.org"
            );

            match validator.validate("ada".to_string()) {
                Err(VelixaError::Validation { code, message }) => {
                    assert_eq!(code, error_codes::EMAIL);
                    assert_eq!(message, "Please enter a valid email address");
                }
                other => panic!("Expected validation error, got {:?}", other),
            }
        }
    }

    mod check_tests {
        use super::*;

        #[test]
        fn test_length_checks_count_characters() {
            assert!(MinLengthCheck(3).check(&json!("héé"), &empty_record()).is_ok());
            let violation = MinLengthCheck(4).check(&json!("héé"), &empty_record()).unwrap_err();
            assert_eq!(violation.message, "Minimum length is 4 characters");

            let violation = MaxLengthCheck(2).check(&json!([1, 2, 3]), &empty_record()).unwrap_err();
            assert_eq!(violation.code, error_codes::MAX_LENGTH);
            assert_eq!(violation.message, "Maximum length is 2 characters");
        }

        #[test]
        fn test_length_checks_ignore_numbers() {
            assert!(MinLengthCheck(10).check(&json!(5), &empty_record()).is_ok());
            assert!(MaxLengthCheck(1).check(&json!(12345), &empty_record()).is_ok());
        }

        #[test]
        fn test_pattern_check_uses_string_form() {
            let pattern = Regex::new(r"^\d+$").unwrap();
            let check = PatternCheck { pattern: &pattern, message: None };
            assert!(check.check(&json!(42), &empty_record()).is_ok());

            let violation = check.check(&json!("4a"), &empty_record()).unwrap_err();
            assert_eq!(violation.message, "Invalid format");

            let custom = PatternCheck { pattern: &pattern, message: Some("Digits only") };
            assert_eq!(
                custom.check(&json!("x"), &empty_record()).unwrap_err().message,
                "Digits only"
            );
        }

        #[test]
        fn test_matches_check() {
            let record = json!({"password": "secret1"}).as_object().cloned().unwrap();
            let check = MatchesCheck { other: "password", message: None };
            assert!(check.check(&json!("secret1"), &record).is_ok());
            assert_eq!(
                check.check(&json!("secret2"), &record).unwrap_err().message,
                "Must match password"
            );

            let missing = MatchesCheck { other: "nothing", message: Some("No partner") };
            assert_eq!(
                missing.check(&json!("x"), &record).unwrap_err().message,
                "No partner"
            );
        }

        #[test]
        fn test_numeric_checks_coerce() {
            assert!(MinValueCheck(18.0).check(&json!("21"), &empty_record()).is_ok());
            assert_eq!(
                MinValueCheck(18.0).check(&json!("17"), &empty_record()).unwrap_err().message,
                "Minimum value is 18"
            );
            assert_eq!(
                MaxValueCheck(2.5).check(&json!(3), &empty_record()).unwrap_err().message,
                "Maximum value is 2.5"
            );
        }

        #[test]
        fn test_numeric_checks_pass_nan() {
            assert!(MinValueCheck(1.0).check(&json!("abc"), &empty_record()).is_ok());
            assert!(MaxValueCheck(1.0).check(&json!("abc"), &empty_record()).is_ok());
        }

        #[test]
        fn test_custom_check_empty_message_falls_back() {
            let predicate: CustomValidator =
                std::sync::Arc::new(|_, _| ValidationOutcome::Invalid(String::new()));
            let violation = CustomCheck(&predicate)
                .check(&json!("x"), &empty_record())
                .unwrap_err();
            assert_eq!(violation.code, error_codes::CUSTOM);
            assert_eq!(violation.message, "Invalid value");
        }
    }

    mod validator_tests {
        use super::*;
        use crate::validation::FieldRule;

        #[test]
        fn test_form_validator_returns_record() {
            let validator = FormValidator::new(
                RuleSet::new().field("username", FieldRule::new().required()),
            );
            let record = json!({"username": "ada"}).as_object().cloned().unwrap();
            assert_eq!(validator.validate(record.clone()).unwrap(), record);
        }

        #[test]
        fn test_form_validator_rejects_record() {
            let validator = FormValidator::new(
                RuleSet::new().field("username", FieldRule::new().required()),
            );
            match validator.validate(DataRecord::new()) {
                Err(VelixaError::InvalidForm(result)) => {
                    assert_eq!(result.error("username"), Some("This field is required"));
                }
                other => panic!("Expected form rejection, got {:?}", other),
            }
        }

        #[test]
        fn test_password_strength_validator() {
            let validator = PasswordStrengthValidator::new(4);
            let strength = validator.validate("Abc123!@".to_string()).unwrap();
            assert_eq!(strength.score, 5);

            match validator.validate("abcdef".to_string()) {
                Err(VelixaError::Validation { code, message }) => {
                    assert_eq!(code, error_codes::WEAK_PASSWORD);
                    assert_eq!(message, "Weak password");
                }
                other => panic!("Expected validation error, got {:?}", other),
            }
        }
    }
}
