//! Named bundles of settings.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::fix::typed_value;
use crate::format::{ConfigFormat, JsonDocument, LineDocument};
use crate::rules::{builtin_file_name, RuleSet};

/// A named set of values applied in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Stable identifier.
    pub id: String,
    /// Short display name.
    pub title: String,
    /// What the preset is for.
    pub description: String,
    /// Keys and the values the preset sets.
    pub values: BTreeMap<String, String>,
}

impl Preset {
    /// Creates a preset.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        values: &[(&str, &str)],
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Checks every value against `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPreset`] for the first value a rule rejects.
    pub fn validate(&self, rules: &RuleSet) -> Result<()> {
        for (key, value) in &self.values {
            let Some(violation) = rules.get(key).and_then(|rule| rule.check(value)) else {
                continue;
            };
            return Err(ConfigError::InvalidPreset {
                preset: self.id.clone(),
                key: key.clone(),
                reason: violation.detail,
            });
        }
        Ok(())
    }
}

/// Result of [`apply_preset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetOutcome {
    /// The updated text.
    pub text: String,
    /// Keys that already existed and were overwritten.
    pub updated: Vec<String>,
    /// Keys that were appended.
    pub added: Vec<String>,
}

/// Applies `preset` to `text`.
///
/// Existing keys are overwritten in place; missing keys are appended.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPreset`] if a value breaks a rule, or
/// [`ConfigError::MalformedDocument`] if a JSON document does not parse.
pub fn apply_preset(
    text: &str,
    format: ConfigFormat,
    preset: &Preset,
    rules: &RuleSet,
) -> Result<PresetOutcome> {
    preset.validate(rules)?;

    let mut updated = Vec::new();
    let mut added = Vec::new();
    let text = match format {
        ConfigFormat::Properties | ConfigFormat::Options => {
            let mut doc = LineDocument::parse(text, format);
            for (key, value) in &preset.values {
                if doc.upsert(key, value) {
                    updated.push(key.clone());
                } else {
                    added.push(key.clone());
                }
            }
            doc.render()
        }
        ConfigFormat::Json => {
            let mut doc = JsonDocument::parse(text)?;
            for (key, value) in &preset.values {
                let typed = rules
                    .get(key)
                    .map_or_else(|| infer_value(value), |rule| typed_value(&rule.constraint, value));
                if doc.set(key, typed) {
                    updated.push(key.clone());
                } else {
                    added.push(key.clone());
                }
            }
            doc.render()
        }
    };

    debug!(
        preset = %preset.id,
        updated = updated.len(),
        added = added.len(),
        "applied preset"
    );
    Ok(PresetOutcome {
        text,
        updated,
        added,
    })
}

fn infer_value(text: &str) -> Value {
    if let Ok(b) = text.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::from(n);
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::String(text.to_string()), Value::Number)
}

static SERVER_PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        Preset::new(
            "performance",
            "Performance",
            "Shorter view and simulation distances for modded servers on modest hardware.",
            &[
                ("view-distance", "8"),
                ("simulation-distance", "6"),
                ("network-compression-threshold", "256"),
                ("entity-broadcast-range-percentage", "75"),
                ("sync-chunk-writes", "false"),
            ],
        ),
        Preset::new(
            "friends",
            "Private friends server",
            "Whitelisted, authenticated server for a small group.",
            &[
                ("max-players", "10"),
                ("online-mode", "true"),
                ("white-list", "true"),
                ("enforce-whitelist", "true"),
                ("spawn-protection", "0"),
            ],
        ),
        Preset::new(
            "creative-build",
            "Creative build",
            "Peaceful creative world for building.",
            &[
                ("gamemode", "creative"),
                ("difficulty", "peaceful"),
                ("spawn-monsters", "false"),
                ("pvp", "false"),
                ("allow-flight", "true"),
            ],
        ),
    ]
});

static OPTIONS_PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        Preset::new(
            "low-end",
            "Low-end PC",
            "Lowest settings that keep large modpacks playable.",
            &[
                ("renderDistance", "6"),
                ("simulationDistance", "5"),
                ("maxFps", "60"),
                ("graphicsMode", "0"),
                ("particles", "2"),
                ("entityShadows", "false"),
                ("ao", "false"),
                ("mipmapLevels", "0"),
                ("biomeBlendRadius", "0"),
                ("entityDistanceScaling", "0.5"),
            ],
        ),
        Preset::new(
            "balanced",
            "Balanced",
            "Reasonable defaults for mid-range hardware.",
            &[
                ("renderDistance", "12"),
                ("simulationDistance", "8"),
                ("maxFps", "120"),
                ("graphicsMode", "1"),
                ("particles", "1"),
                ("entityShadows", "true"),
                ("ao", "true"),
                ("mipmapLevels", "2"),
                ("biomeBlendRadius", "2"),
            ],
        ),
        Preset::new(
            "high-quality",
            "High quality",
            "Long view distance and full visual effects.",
            &[
                ("renderDistance", "24"),
                ("simulationDistance", "12"),
                ("maxFps", "260"),
                ("graphicsMode", "2"),
                ("particles", "0"),
                ("entityShadows", "true"),
                ("ao", "true"),
                ("mipmapLevels", "4"),
                ("biomeBlendRadius", "5"),
                ("enableVsync", "true"),
            ],
        ),
    ]
});

/// Builtin presets for a file name; unknown files have none.
#[must_use]
pub fn presets_for(file_name: &str) -> &'static [Preset] {
    match builtin_file_name(file_name).as_str() {
        "server.properties" => SERVER_PRESETS.as_slice(),
        "options.txt" => OPTIONS_PRESETS.as_slice(),
        _ => &[],
    }
}

/// Finds a builtin preset by id.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] if the file has no such preset.
pub fn find_preset(file_name: &str, id: &str) -> Result<&'static Preset> {
    presets_for(file_name)
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ConfigError::UnknownPreset(id.to_string()))
}
