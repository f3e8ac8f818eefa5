//! # PASSWORD STRENGTH SCORING
//!
//! Passwords shorter than six characters score zero. Otherwise one point
//! each for: eight or more characters, a lowercase letter, an uppercase
//! letter, a digit, any other character.

use serde::Serialize;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const TOO_SHORT_MESSAGE: &str = "Password is too short (minimum 6 characters)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    TooShort,
    Weak,
    Moderate,
    Strong,
}

impl StrengthLevel {
    fn from_score(score: u8) -> Self {
        match score {
            0..=1 => Self::Weak,
            2..=3 => Self::Moderate,
            _ => Self::Strong,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::TooShort => TOO_SHORT_MESSAGE,
            Self::Weak => "Weak password",
            Self::Moderate => "Moderate password",
            Self::Strong => "Strong password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0..=5
    pub score: u8,
    pub message: String,
    pub level: StrengthLevel,
}

impl PasswordStrength {
    fn new(score: u8, level: StrengthLevel) -> Self {
        Self {
            score,
            message: level.message().to_string(),
            level,
        }
    }
}

pub fn validate_password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return PasswordStrength::new(0, StrengthLevel::TooShort);
    }

    let criteria = [
        length >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = criteria.iter().filter(|met| **met).count() as u8;

    PasswordStrength::new(score, StrengthLevel::from_score(score))
}
