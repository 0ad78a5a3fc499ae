//! Issue detection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::format::{scalar_text, ConfigFormat, JsonDocument, LineDocument, LineKind};
use crate::rules::{ConfigRule, IssueKind, IssueSeverity, RuleSet};

/// One problem found in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigIssue {
    /// Key (or JSON path) involved, if any.
    pub key: Option<String>,
    /// 1-based line number, when known.
    pub line: Option<usize>,
    /// What went wrong.
    pub kind: IssueKind,
    /// How serious it is.
    pub severity: IssueSeverity,
    /// Human-readable explanation.
    pub message: String,
    /// The offending value.
    pub current: Option<String>,
    /// A safe replacement, if one exists.
    pub suggested: Option<String>,
}

impl ConfigIssue {
    /// Returns true if a safe fix exists.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.suggested.is_some()
    }

    fn from_rule(rule: &ConfigRule, line: Option<usize>, value: &str) -> Option<Self> {
        let violation = rule.check(value)?;
        Some(Self {
            key: Some(rule.key.clone()),
            line,
            kind: violation.kind,
            severity: rule.severity,
            message: format!("{} = '{}': {}", rule.key, value.trim(), rule.message),
            current: Some(value.trim().to_string()),
            suggested: violation.suggestion,
        })
    }
}

/// Checks a config text against `rules`.
///
/// Never fails: unparsable input is reported as issues. Keys without a
/// rule are not checked.
#[must_use]
pub fn detect_config_issues(text: &str, format: ConfigFormat, rules: &RuleSet) -> Vec<ConfigIssue> {
    let issues = match format {
        ConfigFormat::Properties | ConfigFormat::Options => {
            detect_in_lines(&LineDocument::parse(text, format), rules)
        }
        ConfigFormat::Json => detect_in_json(text, rules),
    };
    debug!(%format, issues = issues.len(), "checked config");
    issues
}

fn detect_in_lines(doc: &LineDocument, rules: &RuleSet) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for index in 0..doc.len() {
        let line = index + 1;
        match doc.classify(index) {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Malformed => issues.push(ConfigIssue {
                key: None,
                line: Some(line),
                kind: IssueKind::MalformedLine,
                severity: IssueSeverity::Warning,
                message: format!("line {line} is not a key/value entry"),
                current: None,
                suggested: None,
            }),
            LineKind::Entry { key, value, .. } => {
                if let Some(first) = first_seen.get(key) {
                    issues.push(ConfigIssue {
                        key: Some(key.to_string()),
                        line: Some(line),
                        kind: IssueKind::DuplicateKey,
                        severity: IssueSeverity::Warning,
                        message: format!("{key} is already set on line {first}; the last value wins"),
                        current: Some(value.to_string()),
                        suggested: None,
                    });
                } else {
                    first_seen.insert(key, line);
                }
                if let Some(rule) = rules.get(key) {
                    issues.extend(ConfigIssue::from_rule(rule, Some(line), value));
                }
            }
        }
    }
    issues
}

fn detect_in_json(text: &str, rules: &RuleSet) -> Vec<ConfigIssue> {
    let doc = match JsonDocument::parse(text) {
        Ok(doc) => doc,
        Err(failure) => {
            return vec![ConfigIssue {
                key: None,
                line: failure.line,
                kind: IssueKind::ParseError,
                severity: IssueSeverity::Error,
                message: failure.message,
                current: None,
                suggested: None,
            }];
        }
    };
    rules
        .rules()
        .iter()
        .filter_map(|rule| {
            let value = doc.get(&rule.key)?;
            ConfigIssue::from_rule(rule, None, &scalar_text(value))
        })
        .collect()
}
