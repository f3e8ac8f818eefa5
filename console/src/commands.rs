//! Subcommand implementations.
//!
//! Each command writes its report to `out` and raises notifications through
//! the given sink. The returned flag says whether the input passed.

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use velixa::config::ValidationConfig;
use velixa::notification::{NotificationKind, NotificationSink};
use velixa::types::record_from_json;
use velixa::validation::{
    is_valid_email, validate_form, validate_password_strength, RuleSet, StrengthLevel,
};

/// Validates the record in `record_path` against the rules in `rules_path`.
///
/// Prints the result as JSON and raises one error notification per failing
/// field.
pub fn validate(
    rules_path: &Path,
    record_path: &Path,
    out: &mut impl Write,
    notifier: &impl NotificationSink,
) -> anyhow::Result<bool> {
    let raw_rules = std::fs::read_to_string(rules_path)
        .with_context(|| format!("Cannot read rules from {}", rules_path.display()))?;
    let rules = RuleSet::from_json_str(&raw_rules)?;

    let raw_record = std::fs::read_to_string(record_path)
        .with_context(|| format!("Cannot read record from {}", record_path.display()))?;
    let record = record_from_json(
        serde_json::from_str(&raw_record)
            .with_context(|| format!("{} is not valid JSON", record_path.display()))?,
    )?;

    let result = validate_form(&record, &rules);
    log::debug!(
        "Validated {} field rule(s), {} error(s)",
        rules.len(),
        result.errors().len()
    );

    writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    for (field, message) in result.errors() {
        notifier.error(&format!("{}: {}", field, message));
    }
    Ok(result.is_valid())
}

fn strength_kind(level: StrengthLevel) -> NotificationKind {
    match level {
        StrengthLevel::TooShort => NotificationKind::Error,
        StrengthLevel::Weak => NotificationKind::Warning,
        StrengthLevel::Moderate => NotificationKind::Info,
        StrengthLevel::Strong => NotificationKind::Success,
    }
}

/// Scores `password`. Passes when the score reaches the configured minimum.
pub fn password(
    password: &str,
    config: &ValidationConfig,
    out: &mut impl Write,
    notifier: &impl NotificationSink,
) -> anyhow::Result<bool> {
    let strength = validate_password_strength(password);
    writeln!(out, "score: {}/5", strength.score)?;
    writeln!(out, "message: {}", strength.message)?;

    notifier.show(
        strength_kind(strength.level),
        &strength.message,
        notifier.default_options(),
    );
    Ok(strength.score >= config.min_password_score)
}

/// Checks the shape of an email address.
pub fn email(address: &str, out: &mut impl Write) -> anyhow::Result<bool> {
    let valid = is_valid_email(address);
    let verdict = if valid { "valid" } else { "invalid" };
    writeln!(out, "{}: {}", address, verdict)?;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use velixa::notification::{MemorySurface, NotificationCenter, NotificationOptions};

    fn center() -> (NotificationCenter, MemorySurface) {
        let surface = MemorySurface::new();
        let center =
            NotificationCenter::with_defaults(surface.clone(), NotificationOptions::persistent());
        (center, surface)
    }

    fn write_inputs(dir: &TempDir, rules: &str, record: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let rules_path = dir.path().join("rules.json");
        let record_path = dir.path().join("record.json");
        std::fs::write(&rules_path, rules).unwrap();
        std::fs::write(&record_path, record).unwrap();
        (rules_path, record_path)
    }

    #[test]
    fn test_validate_reports_errors() {
        let dir = TempDir::new().unwrap();
        let (rules, record) = write_inputs(
            &dir,
            r#"{"username": {"required": true}, "email": {"email": true}}"#,
            r#"{"username": "", "email": "broken"}"#,
        );
        let (center, surface) = center();
        let mut out = Vec::new();

        let passed = validate(&rules, &record, &mut out, &center).unwrap();
        assert!(!passed);

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["isValid"], serde_json::json!(false));
        assert_eq!(
            surface.messages(),
            vec![
                "email: Please enter a valid email address".to_string(),
                "username: This field is required".to_string()
            ]
        );
    }

    #[test]
    fn test_validate_passes_clean_record() {
        let dir = TempDir::new().unwrap();
        let (rules, record) = write_inputs(
            &dir,
            r#"{"username": {"required": true, "minLength": 3}}"#,
            r#"{"username": "alice"}"#,
        );
        let (center, surface) = center();
        let mut out = Vec::new();

        assert!(validate(&rules, &record, &mut out, &center).unwrap());
        assert!(surface.visible().is_empty());
    }

    #[test]
    fn test_validate_rejects_non_object_record() {
        let dir = TempDir::new().unwrap();
        let (rules, record) = write_inputs(&dir, "{}", "[1, 2, 3]");
        let (center, _) = center();
        assert!(validate(&rules, &record, &mut Vec::new(), &center).is_err());
    }

    #[test]
    fn test_validate_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let (center, _) = center();
        let missing = dir.path().join("missing.json");
        assert!(validate(&missing, &missing, &mut Vec::new(), &center).is_err());
    }

    #[test]
    fn test_password_levels() {
        let (center, surface) = center();
        let config = ValidationConfig::default();
        let mut out = Vec::new();

        assert!(!password("abc", &config, &mut out, &center).unwrap());
        assert!(password("Password1", &config, &mut out, &center).unwrap());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("score: 0/5"));
        assert!(text.contains("score: 4/5"));

        let kinds: Vec<NotificationKind> = surface.visible().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Error, NotificationKind::Success]);
    }

    #[test]
    fn test_email_verdict() {
        let mut out = Vec::new();
        assert!(email("a@b.co", &mut out).unwrap());
        assert!(!email("a@b", &mut out).unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a@b.co: valid\na@b: invalid\n"
        );
    }
}
