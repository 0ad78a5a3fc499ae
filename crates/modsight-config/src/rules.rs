//! Per-key config rules and the builtin rule sets.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How serious a rule violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Worth knowing about.
    Info,
    /// Likely to cause odd behaviour.
    Warning,
    /// Likely to stop the game or server from starting.
    Error,
}

impl IssueSeverity {
    /// Returns the severity's name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// What went wrong with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// Number outside the allowed range.
    OutOfRange,
    /// Value should be a number.
    NotANumber,
    /// Value should be `true` or `false`.
    NotABoolean,
    /// Value is not one of the allowed choices.
    UnknownChoice,
    /// Value does not match the expected shape.
    PatternMismatch,
    /// Key appears more than once.
    DuplicateKey,
    /// Line is neither an entry nor a comment.
    MalformedLine,
    /// Document could not be parsed at all.
    ParseError,
}

/// A failed check with an optional safe replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Kind of failure.
    pub kind: IssueKind,
    /// Human-readable detail.
    pub detail: String,
    /// A replacement value that is known to be valid.
    pub suggestion: Option<String>,
}

/// The check a rule applies to a value.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Integer within `min..=max`.
    IntRange {
        /// Smallest allowed value.
        min: i64,
        /// Largest allowed value.
        max: i64,
    },
    /// Finite float within `min..=max`.
    FloatRange {
        /// Smallest allowed value.
        min: f64,
        /// Largest allowed value.
        max: f64,
    },
    /// `true` or `false`, any case.
    Bool,
    /// One of a fixed set of values.
    OneOf(Vec<String>),
    /// Must match the whole regex.
    Pattern(Regex),
}

impl Constraint {
    /// Builds a pattern constraint, anchoring the regex to the whole value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRule`] if the regex does not compile.
    pub fn pattern(key: &str, pattern: &str) -> Result<Self> {
        Regex::new(&format!("^(?:{pattern})$"))
            .map(Self::Pattern)
            .map_err(|e| ConfigError::invalid_rule(key, e.to_string()))
    }

    /// Describes what the constraint accepts.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::IntRange { min, max } => format!("must be a whole number between {min} and {max}"),
            Self::FloatRange { min, max } => format!("must be a number between {min} and {max}"),
            Self::Bool => "must be true or false".to_string(),
            Self::OneOf(choices) => format!("must be one of: {}", choices.join(", ")),
            Self::Pattern(re) => format!("must match {}", re.as_str()),
        }
    }

    /// Checks `value`, returning the violation if it fails.
    ///
    /// Out-of-range numbers suggest the clamped value. A choice that only
    /// differs in case suggests the canonical spelling.
    #[must_use]
    pub fn check(&self, value: &str) -> Option<Violation> {
        let value = value.trim();
        match self {
            Self::IntRange { min, max } => match value.parse::<i64>() {
                Err(_) => Some(self.violation(IssueKind::NotANumber, value, None)),
                Ok(n) if n < *min || n > *max => Some(self.violation(
                    IssueKind::OutOfRange,
                    value,
                    Some(n.clamp(*min, *max).to_string()),
                )),
                Ok(_) => None,
            },
            Self::FloatRange { min, max } => match value.parse::<f64>() {
                Ok(n) if !n.is_finite() => Some(self.violation(IssueKind::NotANumber, value, None)),
                Err(_) => Some(self.violation(IssueKind::NotANumber, value, None)),
                Ok(n) if n < *min || n > *max => Some(self.violation(
                    IssueKind::OutOfRange,
                    value,
                    Some(format_float(n.clamp(*min, *max))),
                )),
                Ok(_) => None,
            },
            Self::Bool => (!value.eq_ignore_ascii_case("true")
                && !value.eq_ignore_ascii_case("false"))
            .then(|| self.violation(IssueKind::NotABoolean, value, None)),
            Self::OneOf(choices) => {
                if choices.iter().any(|c| c == value) {
                    return None;
                }
                let canonical = choices.iter().find(|c| c.eq_ignore_ascii_case(value)).cloned();
                Some(self.violation(IssueKind::UnknownChoice, value, canonical))
            }
            Self::Pattern(re) => (!re.is_match(value))
                .then(|| self.violation(IssueKind::PatternMismatch, value, None)),
        }
    }

    fn violation(&self, kind: IssueKind, value: &str, suggestion: Option<String>) -> Violation {
        Violation {
            kind,
            detail: format!("'{value}' {}", self.describe()),
            suggestion,
        }
    }
}

/// Formats a float with at least one decimal place.
pub(crate) fn format_float(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// A rule for one config key.
#[derive(Debug, Clone)]
pub struct ConfigRule {
    /// The key, or dotted path for JSON.
    pub key: String,
    /// The check applied to the value.
    pub constraint: Constraint,
    /// Severity of a violation.
    pub severity: IssueSeverity,
    /// Explanation shown with issues.
    pub message: String,
    /// Safe value used when the current one cannot be repaired.
    pub fallback: Option<String>,
}

impl ConfigRule {
    /// Creates a warning-level rule with a generated message.
    #[must_use]
    pub fn new(key: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            key: key.into(),
            message: constraint.describe(),
            constraint,
            severity: IssueSeverity::Warning,
            fallback: None,
        }
    }

    /// Integer range rule.
    #[must_use]
    pub fn int_range(key: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(key, Constraint::IntRange { min, max })
    }

    /// Float range rule.
    #[must_use]
    pub fn float_range(key: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(key, Constraint::FloatRange { min, max })
    }

    /// Boolean rule.
    #[must_use]
    pub fn boolean(key: impl Into<String>) -> Self {
        Self::new(key, Constraint::Bool)
    }

    /// Choice rule.
    #[must_use]
    pub fn one_of(key: impl Into<String>, choices: &[&str]) -> Self {
        Self::new(
            key,
            Constraint::OneOf(choices.iter().map(|c| (*c).to_string()).collect()),
        )
    }

    /// Sets the severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: IssueSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the explanation.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the fallback value.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Checks a value against the rule.
    ///
    /// When the constraint has no targeted suggestion, the fallback is
    /// offered instead.
    #[must_use]
    pub fn check(&self, value: &str) -> Option<Violation> {
        let mut violation = self.constraint.check(value)?;
        if violation.suggestion.is_none() {
            violation.suggestion.clone_from(&self.fallback);
        }
        Some(violation)
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(ConfigError::invalid_rule(&self.key, "key must not be empty"));
        }
        match &self.constraint {
            Constraint::IntRange { min, max } if min > max => {
                return Err(ConfigError::invalid_rule(&self.key, "min is greater than max"));
            }
            Constraint::FloatRange { min, max } if !(min.is_finite() && max.is_finite()) || min > max => {
                return Err(ConfigError::invalid_rule(&self.key, "range must be finite and ordered"));
            }
            Constraint::OneOf(choices) if choices.is_empty() => {
                return Err(ConfigError::invalid_rule(&self.key, "empty choice list"));
            }
            _ => {}
        }
        if let Some(fallback) = &self.fallback {
            if let Some(violation) = self.constraint.check(fallback) {
                return Err(ConfigError::invalid_rule(
                    &self.key,
                    format!("fallback {}", violation.detail),
                ));
            }
        }
        Ok(())
    }
}

/// An ordered set of rules with unique keys.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ConfigRule>,
}

impl RuleSet {
    /// Builds a rule set, validating every rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRule`] for a malformed rule, a fallback
    /// that breaks its own rule, or a repeated key.
    pub fn new(rules: Vec<ConfigRule>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.key.as_str()) {
                return Err(ConfigError::invalid_rule(&rule.key, "duplicate key"));
            }
        }
        Ok(Self { rules })
    }

    /// A rule set that checks nothing.
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY
    }

    /// Builtin rules for `server.properties`.
    #[must_use]
    pub fn server_properties() -> &'static Self {
        &SERVER_PROPERTIES
    }

    /// Builtin rules for `options.txt`.
    #[must_use]
    pub fn options_txt() -> &'static Self {
        &OPTIONS_TXT
    }

    /// Picks the builtin rules for a file name; unknown files get none.
    #[must_use]
    pub fn for_file(name: &str) -> &'static Self {
        match builtin_file_name(name).as_str() {
            "server.properties" => Self::server_properties(),
            "options.txt" => Self::options_txt(),
            _ => Self::empty(),
        }
    }

    /// Looks up the rule for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigRule> {
        self.rules.iter().find(|r| r.key == key)
    }

    /// All rules in order.
    #[must_use]
    pub fn rules(&self) -> &[ConfigRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Lowercased final path component.
pub(crate) fn builtin_file_name(name: &str) -> String {
    std::path::Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
        .to_lowercase()
}

static EMPTY: Lazy<RuleSet> = Lazy::new(RuleSet::default);

static SERVER_PROPERTIES: Lazy<RuleSet> = Lazy::new(|| {
    use IssueSeverity::{Error, Info};
    let level_type = Constraint::pattern("level-type", r"(?:[a-z0-9_.-]+:)?[a-z0-9_./-]+")
        .unwrap_or_else(|_| unreachable!());
    let level_name = Constraint::pattern("level-name", r#"[^/\\:*?"<>|]+"#)
        .unwrap_or_else(|_| unreachable!());
    RuleSet::new(vec![
        ConfigRule::int_range("server-port", 1, 65535)
            .with_severity(Error)
            .with_fallback("25565"),
        ConfigRule::int_range("max-players", 1, 1000).with_fallback("20"),
        ConfigRule::int_range("view-distance", 2, 32)
            .with_message("view distance must be between 2 and 32 chunks")
            .with_fallback("10"),
        ConfigRule::int_range("simulation-distance", 2, 32)
            .with_message("simulation distance must be between 2 and 32 chunks")
            .with_fallback("10"),
        ConfigRule::int_range("spawn-protection", 0, 1000).with_fallback("16"),
        ConfigRule::int_range("max-world-size", 1, 29_999_984).with_fallback("29999984"),
        ConfigRule::int_range("network-compression-threshold", -1, 65535).with_fallback("256"),
        ConfigRule::int_range("max-tick-time", -1, 86_400_000).with_fallback("60000"),
        ConfigRule::int_range("op-permission-level", 1, 4).with_fallback("4"),
        ConfigRule::int_range("function-permission-level", 1, 4).with_fallback("2"),
        ConfigRule::int_range("entity-broadcast-range-percentage", 10, 1000).with_fallback("100"),
        ConfigRule::int_range("rate-limit", 0, 1_000_000).with_fallback("0"),
        ConfigRule::boolean("online-mode")
            .with_severity(Error)
            .with_fallback("true"),
        ConfigRule::boolean("pvp").with_fallback("true"),
        ConfigRule::boolean("white-list").with_fallback("false"),
        ConfigRule::boolean("enforce-whitelist").with_fallback("false"),
        ConfigRule::boolean("allow-flight").with_fallback("false"),
        ConfigRule::boolean("allow-nether").with_fallback("true"),
        ConfigRule::boolean("hardcore").with_fallback("false"),
        ConfigRule::boolean("enable-command-block").with_fallback("false"),
        ConfigRule::boolean("spawn-monsters").with_fallback("true"),
        ConfigRule::boolean("sync-chunk-writes").with_fallback("true"),
        ConfigRule::one_of("difficulty", &["peaceful", "easy", "normal", "hard"]).with_fallback("easy"),
        ConfigRule::one_of("gamemode", &["survival", "creative", "adventure", "spectator"])
            .with_fallback("survival"),
        ConfigRule::new("level-type", level_type).with_severity(Info),
        ConfigRule::new("level-name", level_name)
            .with_severity(Error)
            .with_message("level name must not contain path separators or reserved characters"),
    ])
    .unwrap_or_else(|_| unreachable!())
});

static OPTIONS_TXT: Lazy<RuleSet> = Lazy::new(|| {
    let lang = Constraint::pattern("lang", r"[a-z]{2,3}_[a-z]{2,3}").unwrap_or_else(|_| unreachable!());
    RuleSet::new(vec![
        ConfigRule::int_range("renderDistance", 2, 32)
            .with_message("render distance must be between 2 and 32 chunks")
            .with_fallback("12"),
        ConfigRule::int_range("simulationDistance", 5, 32).with_fallback("12"),
        ConfigRule::int_range("maxFps", 10, 260).with_fallback("120"),
        ConfigRule::int_range("guiScale", 0, 8).with_fallback("0"),
        ConfigRule::int_range("graphicsMode", 0, 2).with_fallback("1"),
        ConfigRule::int_range("particles", 0, 2).with_fallback("0"),
        ConfigRule::int_range("mipmapLevels", 0, 4).with_fallback("4"),
        ConfigRule::int_range("biomeBlendRadius", 0, 7).with_fallback("2"),
        ConfigRule::float_range("fov", -1.0, 1.0).with_fallback("0.0"),
        ConfigRule::float_range("gamma", 0.0, 1.0).with_fallback("0.5"),
        ConfigRule::float_range("entityDistanceScaling", 0.5, 5.0).with_fallback("1.0"),
        ConfigRule::float_range("soundCategory_master", 0.0, 1.0).with_fallback("1.0"),
        ConfigRule::float_range("chatOpacity", 0.0, 1.0).with_fallback("1.0"),
        ConfigRule::boolean("enableVsync").with_fallback("true"),
        ConfigRule::boolean("entityShadows").with_fallback("true"),
        ConfigRule::boolean("ao").with_fallback("true"),
        ConfigRule::boolean("fullscreen").with_fallback("false"),
        ConfigRule::new("lang", lang).with_fallback("en_us"),
    ])
    .unwrap_or_else(|_| unreachable!())
});
