//! Config file formats and an editable document model.
//!
//! Line formats are kept as the original lines so that edits touch only
//! the lines they change. JSON documents are edited as a value tree and
//! re-rendered with key order preserved.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// `key=value` with `#` and `!` comments (`server.properties`).
    Properties,
    /// `key:value` lines (`options.txt`).
    Options,
    /// A top-level JSON object addressed by dotted paths.
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file name or path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let file_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name)
            .to_lowercase();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match extension {
            "properties" => Ok(Self::Properties),
            "txt" => Ok(Self::Options),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(file_name)),
        }
    }

    /// Returns the format's name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Options => "options",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified line of a line-oriented document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Blank,
    Comment,
    Entry {
        key: &'a str,
        value: &'a str,
        /// Byte offset where the value starts.
        value_start: usize,
    },
    Malformed,
}

/// A `key=value` / `key:value` document kept line by line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineDocument {
    format: ConfigFormat,
    lines: Vec<String>,
    newline: &'static str,
    trailing_newline: bool,
}

impl LineDocument {
    pub(crate) fn parse(text: &str, format: ConfigFormat) -> Self {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        Self {
            format,
            lines: text.lines().map(str::to_string).collect(),
            newline,
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn classify(&self, index: usize) -> LineKind<'_> {
        self.lines
            .get(index)
            .map_or(LineKind::Blank, |line| classify_line(line, self.format))
    }

    /// Replaces the value of the entry on line `index`, keeping the key
    /// and separator exactly as written.
    pub(crate) fn set_value(&mut self, index: usize, value: &str) -> bool {
        let LineKind::Entry { value_start, .. } = self.classify(index) else {
            return false;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return false;
        };
        line.truncate(value_start);
        line.push_str(value);
        true
    }

    /// Sets every entry for `key`, appending a new line if there is none.
    /// Returns true if the key already existed.
    pub(crate) fn upsert(&mut self, key: &str, value: &str) -> bool {
        let matching: Vec<usize> = (0..self.lines.len())
            .filter(|&i| matches!(self.classify(i), LineKind::Entry { key: k, .. } if k == key))
            .collect();
        for &index in &matching {
            self.set_value(index, value);
        }
        if matching.is_empty() {
            self.lines.push(format!("{key}{}{value}", self.separator()));
        }
        !matching.is_empty()
    }

    const fn separator(&self) -> char {
        match self.format {
            ConfigFormat::Options => ':',
            _ => '=',
        }
    }

    pub(crate) fn render(&self) -> String {
        let mut out = self.lines.join(self.newline);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.newline);
        }
        out
    }
}

fn classify_line(line: &str, format: ConfigFormat) -> LineKind<'_> {
    let trimmed = line.trim_start();
    if trimmed.trim_end().is_empty() {
        return LineKind::Blank;
    }
    if format == ConfigFormat::Properties && (trimmed.starts_with('#') || trimmed.starts_with('!'))
    {
        return LineKind::Comment;
    }

    let separator = match format {
        ConfigFormat::Properties => line.find(['=', ':']),
        _ => line.find(':'),
    };
    let Some(sep) = separator else {
        return LineKind::Malformed;
    };
    let key = line[..sep].trim();
    if key.is_empty() {
        return LineKind::Malformed;
    }
    let rest = &line[sep + 1..];
    let value_start = sep + 1 + (rest.len() - rest.trim_start().len());
    LineKind::Entry {
        key,
        value: line[value_start..].trim_end(),
        value_start,
    }
}

/// Why a JSON document could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JsonParseFailure {
    pub(crate) line: Option<usize>,
    pub(crate) message: String,
}

impl From<JsonParseFailure> for ConfigError {
    fn from(failure: JsonParseFailure) -> Self {
        Self::MalformedDocument(failure.message)
    }
}

/// A JSON document whose root is an object.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JsonDocument {
    root: Map<String, Value>,
}

impl JsonDocument {
    pub(crate) fn parse(text: &str) -> std::result::Result<Self, JsonParseFailure> {
        if text.trim().is_empty() {
            return Ok(Self { root: Map::new() });
        }
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(root)) => Ok(Self { root }),
            Ok(_) => Err(JsonParseFailure {
                line: None,
                message: "top level is not an object".to_string(),
            }),
            Err(err) => Err(JsonParseFailure {
                line: Some(err.line()),
                message: err.to_string(),
            }),
        }
    }

    pub(crate) fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Sets `path`, creating intermediate objects. Returns true if a value
    /// was already present.
    pub(crate) fn set(&mut self, path: &str, value: Value) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        let mut map = &mut self.root;
        for segment in parents {
            let entry = map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                return false;
            };
            map = next;
        }
        map.insert((*last).to_string(), value).is_some()
    }

    pub(crate) fn render(&self) -> String {
        let mut out = serde_json::to_string_pretty(&self.root).unwrap_or_default();
        out.push('\n');
        out
    }
}

/// Renders a scalar JSON value the way a line format would hold it.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("server.properties", ConfigFormat::Properties ; "properties")]
    #[test_case("/srv/mc/Server.Properties", ConfigFormat::Properties ; "path and case")]
    #[test_case("options.txt", ConfigFormat::Options ; "options")]
    #[test_case("optionsof.txt", ConfigFormat::Options ; "optifine options")]
    #[test_case("config/sodium-options.json", ConfigFormat::Json ; "json")]
    fn detects_format(name: &str, expected: ConfigFormat) {
        assert_eq!(ConfigFormat::from_file_name(name).unwrap(), expected);
    }

    #[test_case("mods.toml" ; "toml")]
    #[test_case("README" ; "no extension")]
    fn rejects_unknown_format(name: &str) {
        assert!(matches!(
            ConfigFormat::from_file_name(name),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    mod line_document_tests {
        use super::*;

        #[test]
        fn classifies_properties_lines() {
            let doc = LineDocument::parse(
                "#comment\n! bang\n\nmotd = Hello: world\nbroken\n=novalue",
                ConfigFormat::Properties,
            );
            assert_eq!(doc.classify(0), LineKind::Comment);
            assert_eq!(doc.classify(1), LineKind::Comment);
            assert_eq!(doc.classify(2), LineKind::Blank);
            assert!(matches!(
                doc.classify(3),
                LineKind::Entry { key: "motd", value: "Hello: world", value_start: 7 }
            ));
            assert_eq!(doc.classify(4), LineKind::Malformed);
            assert_eq!(doc.classify(5), LineKind::Malformed);
        }

        #[test]
        fn options_split_on_first_colon() {
            let doc = LineDocument::parse("key_key.attack:key.mouse.left", ConfigFormat::Options);
            assert!(matches!(
                doc.classify(0),
                LineKind::Entry { key: "key_key.attack", value: "key.mouse.left", .. }
            ));
        }

        #[test]
        fn hash_is_not_a_comment_in_options() {
            let doc = LineDocument::parse("#x", ConfigFormat::Options);
            assert_eq!(doc.classify(0), LineKind::Malformed);
        }

        #[test]
        fn set_value_keeps_spacing() {
            let mut doc = LineDocument::parse("view-distance = 64\n", ConfigFormat::Properties);
            assert!(doc.set_value(0, "32"));
            assert_eq!(doc.render(), "view-distance = 32\n");
        }

        #[test]
        fn upsert_appends_missing_keys() {
            let mut doc = LineDocument::parse("a=1\r\nb=2", ConfigFormat::Properties);
            assert!(doc.upsert("a", "3"));
            assert!(!doc.upsert("c", "4"));
            assert_eq!(doc.render(), "a=3\r\nb=2\r\nc=4");
        }

        #[test]
        fn upsert_into_empty_options() {
            let mut doc = LineDocument::parse("", ConfigFormat::Options);
            doc.upsert("renderDistance", "8");
            assert_eq!(doc.render(), "renderDistance:8\n");
        }

        #[test]
        fn render_round_trips_untouched_text() {
            let text = "# header\nlevel-name=world\n\nmotd=A Minecraft Server\n";
            assert_eq!(LineDocument::parse(text, ConfigFormat::Properties).render(), text);
        }
    }

    mod json_document_tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn get_and_set_dotted_paths() {
            let mut doc = JsonDocument::parse(r#"{"quality": {"weather": true}, "fps": 60}"#).unwrap();
            assert_eq!(doc.get("quality.weather"), Some(&json!(true)));
            assert_eq!(doc.get("quality.missing"), None);
            assert!(doc.set("fps", json!(120)));
            assert!(!doc.set("advanced.cpu_frames", json!(3)));
            assert_eq!(doc.get("advanced.cpu_frames"), Some(&json!(3)));
        }

        #[test]
        fn preserves_key_order() {
            let doc = JsonDocument::parse(r#"{"z": 1, "a": 2}"#).unwrap();
            assert_eq!(doc.render(), "{\n  \"z\": 1,\n  \"a\": 2\n}\n");
        }

        #[test]
        fn rejects_non_objects() {
            assert_eq!(JsonDocument::parse("[1, 2]").unwrap_err().line, None);
            assert_eq!(JsonDocument::parse("{\n\"a\": }").unwrap_err().line, Some(2));
            assert!(JsonDocument::parse("  ").is_ok());
        }

        #[test]
        fn scalar_text_strips_string_quotes() {
            assert_eq!(scalar_text(&json!("fast")), "fast");
            assert_eq!(scalar_text(&json!(2.5)), "2.5");
            assert_eq!(scalar_text(&json!(false)), "false");
        }
    }
}
