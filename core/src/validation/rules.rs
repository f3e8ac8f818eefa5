//! # FIELD RULES AND RULE SETS
//!
//! Declarative constraints for one field (`FieldRule`) and the per-form
//! mapping of field name to rule (`RuleSet`). Rule sets are built in code with
//! the builder methods, or read from their camelCase JSON form.

use super::error_codes;
use super::validators::{
    CustomCheck, EmailCheck, FieldCheck, MatchesCheck, MaxLengthCheck, MaxValueCheck,
    MinLengthCheck, MinValueCheck, PatternCheck,
};
use crate::errors::VelixaError;
use crate::types::DataRecord;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Result of a caller-supplied predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// An empty message falls back to "Invalid value".
    Invalid(String),
}

impl ValidationOutcome {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<bool> for ValidationOutcome {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid(String::new())
        }
    }
}

/// Custom predicate over `(value, whole record)`.
pub type CustomValidator = Arc<dyn Fn(&JsonValue, &DataRecord) -> ValidationOutcome + Send + Sync>;

/// **FIELD RULE** - constraints for one named field.
#[derive(Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub pattern_message: Option<String>,
    pub email: bool,
    pub matches: Option<String>,
    pub matches_message: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub validate: Option<CustomValidator>,
}

impl FieldRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn pattern_with_message(mut self, pattern: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some(pattern);
        self.pattern_message = Some(message.into());
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn matches(mut self, other_field: impl Into<String>) -> Self {
        self.matches = Some(other_field.into());
        self
    }

    pub fn matches_with_message(
        mut self,
        other_field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.matches = Some(other_field.into());
        self.matches_message = Some(message.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&JsonValue, &DataRecord) -> ValidationOutcome + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(predicate));
        self
    }

    /// Configured checks in evaluation order. Length bounds of zero count as
    /// unset.
    pub(crate) fn checks(&self) -> Vec<Box<dyn FieldCheck + '_>> {
        let mut checks: Vec<Box<dyn FieldCheck + '_>> = Vec::new();

        if let Some(min) = self.min_length.filter(|n| *n > 0) {
            checks.push(Box::new(MinLengthCheck(min)));
        }
        if let Some(max) = self.max_length.filter(|n| *n > 0) {
            checks.push(Box::new(MaxLengthCheck(max)));
        }
        if let Some(pattern) = &self.pattern {
            checks.push(Box::new(PatternCheck {
                pattern,
                message: self.pattern_message.as_deref(),
            }));
        }
        if self.email {
            checks.push(Box::new(EmailCheck));
        }
        if let Some(other) = &self.matches {
            checks.push(Box::new(MatchesCheck {
                other,
                message: self.matches_message.as_deref(),
            }));
        }
        if let Some(min) = self.min {
            checks.push(Box::new(MinValueCheck(min)));
        }
        if let Some(max) = self.max {
            checks.push(Box::new(MaxValueCheck(max)));
        }
        if let Some(predicate) = &self.validate {
            checks.push(Box::new(CustomCheck(predicate)));
        }

        checks
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("pattern_message", &self.pattern_message)
            .field("email", &self.email)
            .field("matches", &self.matches)
            .field("matches_message", &self.matches_message)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// JSON form of a field rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FieldRuleSpec {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub pattern_message: Option<String>,
    pub email: bool,
    pub matches: Option<String>,
    pub matches_message: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl TryFrom<FieldRuleSpec> for FieldRule {
    type Error = VelixaError;

    fn try_from(spec: FieldRuleSpec) -> Result<Self, Self::Error> {
        let pattern = spec
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| {
                VelixaError::config(
                    error_codes::INVALID_RULE,
                    format!("Invalid pattern: {}", e),
                )
            })?;

        Ok(Self {
            required: spec.required,
            min_length: spec.min_length,
            max_length: spec.max_length,
            pattern,
            pattern_message: spec.pattern_message,
            email: spec.email,
            matches: spec.matches,
            matches_message: spec.matches_message,
            min: spec.min,
            max: spec.max,
            validate: None,
        })
    }
}

/// **RULE SET** - field name to rule, keys unique.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: BTreeMap<String, FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RuleSet::insert`].
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(name, rule);
        self
    }

    /// Replaces any rule already registered under `name`.
    pub fn insert(&mut self, name: impl Into<String>, rule: FieldRule) -> Option<FieldRule> {
        self.fields.insert(name.into(), rule)
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldRule> {
        self.fields.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, VelixaError> {
        let specs: BTreeMap<String, FieldRuleSpec> = serde_json::from_str(raw).map_err(|e| {
            VelixaError::config(error_codes::INVALID_RULE, format!("Invalid rule set: {}", e))
        })?;
        Self::from_specs(specs)
    }

    pub fn from_json_value(value: JsonValue) -> Result<Self, VelixaError> {
        let specs: BTreeMap<String, FieldRuleSpec> =
            serde_json::from_value(value).map_err(|e| {
                VelixaError::config(error_codes::INVALID_RULE, format!("Invalid rule set: {}", e))
            })?;
        Self::from_specs(specs)
    }

    fn from_specs(specs: BTreeMap<String, FieldRuleSpec>) -> Result<Self, VelixaError> {
        let mut rules = Self::new();
        for (name, spec) in specs {
            let rule = FieldRule::try_from(spec).map_err(|err| match err {
                VelixaError::Config { code, message } => VelixaError::Config {
                    code,
                    message: format!("Field '{}': {}", name, message),
                },
                other => other,
            })?;
            rules.insert(name, rule);
        }
        Ok(rules)
    }
}
