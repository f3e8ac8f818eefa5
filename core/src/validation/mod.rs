//! # VELIXA VALIDATION MODULE
//!
//! **CLIENT-SIDE FORM VALIDATION WITH TRAIT-BASED CHECKS**
//!
//! A form-submit handler builds a `DataRecord` and a `RuleSet`, calls
//! [`validate_form`], and either renders the per-field messages inline or
//! forwards a summary to a notification sink.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **EMPTINESS** - absent, `null`, blank and `[]` values are empty
//! 2. **REQUIRED** - required-and-empty short-circuits the field
//! 3. **CHECKS** - length, pattern, email, matches, numeric bounds, custom
//! 4. **RESULT** - `is_valid` holds exactly when no field has a message
//!
//! ## USAGE
//!
//! ```rust
//! use velixa::validation::{validate_form, FieldRule, RuleSet};
//! use serde_json::json;
//!
//! let rules = RuleSet::new().field("password", FieldRule::new().min_length(6));
//! let record = json!({"password": "abc"}).as_object().cloned().unwrap();
//! let result = validate_form(&record, &rules);
//! assert_eq!(result.error("password"), Some("Minimum length is 6 characters"));
//! ```

use crate::errors::VelixaError;

pub mod engine;
pub mod password;
pub mod presets;
pub mod rules;
pub mod validators;

pub use engine::{validate_form, ValidationResult, REQUIRED_MESSAGE};
pub use password::{validate_password_strength, PasswordStrength, StrengthLevel};
pub use presets::{login_rules, profile_rules, registration_rules};
pub use rules::{CustomValidator, FieldRule, FieldRuleSpec, RuleSet, ValidationOutcome};
pub use validators::{
    is_empty, is_valid_email, EmailValidator, FieldCheck, FormValidator,
    PasswordStrengthValidator,
};

/// **CORE VALIDATOR TRAIT**
///
/// Typed input and output with a `VelixaError` on rejection. Implementations
/// must not panic on any input.
pub trait Validator {
    type Input;
    type Output;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, VelixaError>;
}

/// A single failed check on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub code: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<FieldViolation> for VelixaError {
    fn from(violation: FieldViolation) -> Self {
        VelixaError::Validation {
            code: violation.code.to_string(),
            message: violation.message,
        }
    }
}

/// **VALIDATION ERROR CODES**
pub mod error_codes {
    pub const REQUIRED: &str = "VELIXA_VALIDATION_REQUIRED";
    pub const MIN_LENGTH: &str = "VELIXA_VALIDATION_MIN_LENGTH";
    pub const MAX_LENGTH: &str = "VELIXA_VALIDATION_MAX_LENGTH";
    pub const PATTERN: &str = "VELIXA_VALIDATION_PATTERN";
    pub const EMAIL: &str = "VELIXA_VALIDATION_EMAIL";
    pub const MATCHES: &str = "VELIXA_VALIDATION_MATCHES";
    pub const MIN_VALUE: &str = "VELIXA_VALIDATION_MIN_VALUE";
    pub const MAX_VALUE: &str = "VELIXA_VALIDATION_MAX_VALUE";
    pub const CUSTOM: &str = "VELIXA_VALIDATION_CUSTOM";
    pub const WEAK_PASSWORD: &str = "VELIXA_VALIDATION_WEAK_PASSWORD";
    pub const INVALID_RULE: &str = "VELIXA_VALIDATION_INVALID_RULE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_into_error() {
        let err: VelixaError = FieldViolation::new(error_codes::EMAIL, "bad").into();
        match err {
            VelixaError::Validation { code, message } => {
                assert_eq!(code, error_codes::EMAIL);
                assert_eq!(message, "bad");
            }
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_error_codes_exist() {
        for code in [
            error_codes::REQUIRED,
            error_codes::MIN_LENGTH,
            error_codes::MAX_LENGTH,
            error_codes::PATTERN,
            error_codes::EMAIL,
            error_codes::MATCHES,
            error_codes::MIN_VALUE,
            error_codes::MAX_VALUE,
            error_codes::CUSTOM,
            error_codes::WEAK_PASSWORD,
            error_codes::INVALID_RULE,
        ] {
            assert!(code.starts_with("VELIXA_VALIDATION_"));
        }
    }
}
