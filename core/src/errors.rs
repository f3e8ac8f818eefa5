use crate::validation::ValidationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VelixaError {
    #[error("VALIDATION ERROR: {code} - {message}")]
    Validation { code: String, message: String },

    #[error("FORM REJECTED: {}", .0.summary())]
    InvalidForm(ValidationResult),

    #[error("PRESENTATION ERROR: {code} - {message}")]
    Presentation { code: String, message: String },

    #[error("SESSION ERROR: {code} - {message}")]
    Session { code: String, message: String },

    #[error("CONFIG ERROR: {code} - {message}")]
    Config { code: String, message: String },

    #[error("BACKEND ERROR: {code} - {message}")]
    Backend { code: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl VelixaError {
    pub fn presentation(code: &str, message: impl Into<String>) -> Self {
        Self::Presentation {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn session(code: &str, message: impl Into<String>) -> Self {
        Self::Session {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn config(code: &str, message: impl Into<String>) -> Self {
        Self::Config {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn backend(code: &str, message: impl Into<String>) -> Self {
        Self::Backend {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Human-facing message without the category prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. }
            | Self::Presentation { message, .. }
            | Self::Session { message, .. }
            | Self::Config { message, .. }
            | Self::Backend { message, .. } => message.clone(),
            Self::InvalidForm(result) => result.summary(),
            Self::Io(err) => err.to_string(),
            Self::Json(err) => err.to_string(),
        }
    }
}
