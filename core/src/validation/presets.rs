//! Rule sets for the account forms.

use super::password::validate_password_strength;
use super::rules::{FieldRule, RuleSet, ValidationOutcome};
use crate::config::ValidationConfig;

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// Login form: `username`, `password`.
pub fn login_rules() -> RuleSet {
    RuleSet::new()
        .field("username", FieldRule::new().required())
        .field("password", FieldRule::new().required().min_length(6))
}

/// Registration form: `username`, `email`, `password`, `confirmPassword`.
pub fn registration_rules(config: &ValidationConfig) -> RuleSet {
    let min_score = config.min_password_score;

    RuleSet::new()
        .field(
            "username",
            FieldRule::new()
                .required()
                .min_length(config.username_min_length)
                .max_length(config.username_max_length),
        )
        .field("email", FieldRule::new().required().email())
        .field(
            "password",
            FieldRule::new()
                .required()
                .min_length(6)
                .custom(move |value, _| {
                    let strength = validate_password_strength(value.as_str().unwrap_or_default());
                    if strength.score >= min_score {
                        ValidationOutcome::Valid
                    } else {
                        ValidationOutcome::Invalid(strength.message)
                    }
                }),
        )
        .field(
            "confirmPassword",
            FieldRule::new()
                .required()
                .matches_with_message("password", PASSWORD_MISMATCH_MESSAGE),
        )
}

/// Profile update form: every field optional.
pub fn profile_rules(config: &ValidationConfig) -> RuleSet {
    RuleSet::new()
        .field(
            "username",
            FieldRule::new()
                .min_length(config.username_min_length)
                .max_length(config.username_max_length),
        )
        .field("email", FieldRule::new().email())
}
