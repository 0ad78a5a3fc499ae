//! Safe automatic fixes.
//!
//! A fix only ever replaces a value that breaks a rule, and only with a
//! value known to satisfy it: the clamped number, the canonical spelling
//! of a choice, or the rule's fallback.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::debug;

use crate::format::{scalar_text, ConfigFormat, JsonDocument, LineDocument, LineKind};
use crate::issues::{detect_config_issues, ConfigIssue};
use crate::rules::{Constraint, RuleSet};

/// One value rewritten by [`apply_safe_fixes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFix {
    /// Key or JSON path.
    pub key: String,
    /// 1-based line, for line formats.
    pub line: Option<usize>,
    /// Previous value.
    pub from: String,
    /// New value.
    pub to: String,
}

/// Result of [`apply_safe_fixes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutcome {
    /// The fixed text.
    pub text: String,
    /// Fixes that were applied, in document order.
    pub applied: Vec<AppliedFix>,
    /// Issues still present after fixing.
    pub remaining: Vec<ConfigIssue>,
}

impl FixOutcome {
    /// Returns true if the text changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Applies every safe fix available for `text`.
///
/// For line formats every untouched line is kept byte for byte. JSON
/// documents are re-rendered only when something changed.
#[must_use]
pub fn apply_safe_fixes(text: &str, format: ConfigFormat, rules: &RuleSet) -> FixOutcome {
    let (fixed, applied) = match format {
        ConfigFormat::Properties | ConfigFormat::Options => fix_lines(text, format, rules),
        ConfigFormat::Json => fix_json(text, rules),
    };
    let remaining = detect_config_issues(&fixed, format, rules);
    debug!(
        %format,
        applied = applied.len(),
        remaining = remaining.len(),
        "applied safe fixes"
    );
    FixOutcome {
        text: fixed,
        applied,
        remaining,
    }
}

fn fix_lines(text: &str, format: ConfigFormat, rules: &RuleSet) -> (String, Vec<AppliedFix>) {
    let mut doc = LineDocument::parse(text, format);
    let mut applied = Vec::new();
    for index in 0..doc.len() {
        let LineKind::Entry { key, value, .. } = doc.classify(index) else {
            continue;
        };
        let Some(rule) = rules.get(key) else {
            continue;
        };
        let Some(to) = rule.check(value).and_then(|v| v.suggestion) else {
            continue;
        };
        applied.push(AppliedFix {
            key: key.to_string(),
            line: Some(index + 1),
            from: value.to_string(),
            to,
        });
    }
    if applied.is_empty() {
        return (text.to_string(), applied);
    }
    for fix in &applied {
        if let Some(line) = fix.line {
            doc.set_value(line - 1, &fix.to);
        }
    }
    (doc.render(), applied)
}

fn fix_json(text: &str, rules: &RuleSet) -> (String, Vec<AppliedFix>) {
    let Ok(mut doc) = JsonDocument::parse(text) else {
        return (text.to_string(), Vec::new());
    };
    let mut applied = Vec::new();
    for rule in rules.rules() {
        let Some(current) = doc.get(&rule.key).map(scalar_text) else {
            continue;
        };
        let Some(to) = rule.check(&current).and_then(|v| v.suggestion) else {
            continue;
        };
        doc.set(&rule.key, typed_value(&rule.constraint, &to));
        applied.push(AppliedFix {
            key: rule.key.clone(),
            line: None,
            from: current,
            to,
        });
    }
    if applied.is_empty() {
        return (text.to_string(), applied);
    }
    (doc.render(), applied)
}

/// Converts a textual value into the JSON type its constraint expects.
pub(crate) fn typed_value(constraint: &Constraint, text: &str) -> Value {
    match constraint {
        Constraint::IntRange { .. } => text
            .parse::<i64>()
            .map_or_else(|_| Value::String(text.to_string()), Value::from),
        Constraint::FloatRange { .. } => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(text.to_string()), Value::Number),
        Constraint::Bool => Value::Bool(text.eq_ignore_ascii_case("true")),
        Constraint::OneOf(_) | Constraint::Pattern(_) => Value::String(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ConfigRule;

    #[test]
    fn clamps_and_keeps_other_lines() {
        let text = "# comment\r\nview-distance = 64\r\nmotd=A \u{a7}6Server\r\npvp=maybe\r\n";
        let outcome = apply_safe_fixes(text, ConfigFormat::Properties, RuleSet::server_properties());
        assert_eq!(
            outcome.text,
            "# comment\r\nview-distance = 32\r\nmotd=A \u{a7}6Server\r\npvp=true\r\n"
        );
        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.applied[0].from, "64");
        assert_eq!(outcome.applied[0].to, "32");
        assert_eq!(outcome.applied[0].line, Some(2));
        assert!(outcome.remaining.is_empty());
        assert!(outcome.changed());
    }

    #[test]
    fn unfixable_issues_remain() {
        let text = "level-name=my/world\nbroken line\n";
        let outcome = apply_safe_fixes(text, ConfigFormat::Properties, RuleSet::server_properties());
        assert_eq!(outcome.text, text);
        assert!(!outcome.changed());
        assert_eq!(outcome.remaining.len(), 2);
    }

    #[test]
    fn fixes_are_idempotent() {
        let text = "renderDistance:99\ngamma:-1\nlang:xx\n";
        let once = apply_safe_fixes(text, ConfigFormat::Options, RuleSet::options_txt());
        let twice = apply_safe_fixes(&once.text, ConfigFormat::Options, RuleSet::options_txt());
        assert_eq!(once.text, "renderDistance:32\ngamma:0.0\nlang:en_us\n");
        assert_eq!(twice.text, once.text);
        assert!(!twice.changed());
    }

    #[test]
    fn fixes_json_with_types() {
        let rules = RuleSet::new(vec![
            ConfigRule::int_range("quality.cloud_height", 0, 320),
            ConfigRule::float_range("quality.brightness", 0.0, 1.0),
            ConfigRule::boolean("advanced.use_fog").with_fallback("true"),
        ])
        .unwrap();
        let text = r#"{"quality": {"cloud_height": 900, "brightness": 3}, "advanced": {"use_fog": "eh"}}"#;
        let outcome = apply_safe_fixes(text, ConfigFormat::Json, &rules);
        let value: Value = serde_json::from_str(&outcome.text).unwrap();
        assert_eq!(value["quality"]["cloud_height"], Value::from(320));
        assert_eq!(value["quality"]["brightness"], Value::from(1.0));
        assert_eq!(value["advanced"]["use_fog"], Value::Bool(true));
        assert_eq!(outcome.applied.len(), 3);
        assert!(outcome.remaining.is_empty());
    }

    #[test]
    fn broken_json_is_left_alone() {
        let outcome = apply_safe_fixes("{oops", ConfigFormat::Json, RuleSet::empty());
        assert_eq!(outcome.text, "{oops");
        assert_eq!(outcome.remaining.len(), 1);
    }

    #[test]
    fn clean_json_is_not_reformatted() {
        let text = r#"{"a":1}"#;
        let outcome = apply_safe_fixes(text, ConfigFormat::Json, RuleSet::empty());
        assert_eq!(outcome.text, text);
    }
}
