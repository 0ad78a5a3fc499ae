//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use modsight_analyze::{format_report, format_summary, LogAnalyzeResult};
use modsight_config::{AppliedFix, ConfigFormat, ConfigIssue, Preset};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

const BANNER: &str = "══════════════════════════════════";

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a value in the selected format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => value.write_table(writer)?,
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as human-readable text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TableDisplay for LogAnalyzeResult {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        write!(writer, "{}", format_report(self))?;
        Ok(())
    }
}

/// One-line digest of an analysis, for `analyze --summary`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// The summary line.
    pub summary: String,
    /// Total lines analysed.
    pub total_lines: usize,
    /// Lines at error severity.
    pub error_count: usize,
    /// Id of the top likely cause, if any.
    pub top_cause: Option<String>,
    /// Id of the top suspect, if any.
    pub top_suspect: Option<String>,
}

impl From<&LogAnalyzeResult> for AnalysisSummary {
    fn from(result: &LogAnalyzeResult) -> Self {
        Self {
            summary: format_summary(result),
            total_lines: result.total_lines,
            error_count: result.error_count,
            top_cause: result.top_cause().map(|c| c.id.clone()),
            top_suspect: result.suspects.first().map(|s| s.id.clone()),
        }
    }
}

impl TableDisplay for AnalysisSummary {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.summary)?;
        Ok(())
    }
}

/// Result of `modsight lint`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    /// File that was checked.
    pub file: String,
    /// Detected format.
    pub format: ConfigFormat,
    /// Issues found in the original text.
    pub issues: Vec<ConfigIssue>,
    /// Safe fixes applied.
    pub applied: Vec<AppliedFix>,
    /// Preset applied, if any.
    pub preset: Option<String>,
    /// Keys the preset overwrote.
    pub updated: Vec<String>,
    /// Keys the preset appended.
    pub added: Vec<String>,
    /// Issues left in the final text.
    pub remaining: Vec<ConfigIssue>,
    /// Whether the file was rewritten.
    pub written: bool,
    /// The new text, when it changed and was not written back.
    pub text: Option<String>,
}

impl TableDisplay for LintReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Config: {} ({})", self.file, self.format)?;
        writeln!(writer, "{BANNER}")?;
        if self.issues.is_empty() {
            writeln!(writer, "No issues found.")?;
        } else {
            writeln!(writer, "Issues ({})", self.issues.len())?;
            for issue in &self.issues {
                let line = issue.line.map_or_else(|| "-".to_string(), |l| l.to_string());
                write!(writer, "  {line:>5}  {:<8} {}", issue.severity, issue.message)?;
                if let Some(suggested) = &issue.suggested {
                    write!(writer, " (fix: {suggested})")?;
                }
                writeln!(writer)?;
            }
        }
        if !self.applied.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Fixes applied ({})", self.applied.len())?;
            for fix in &self.applied {
                writeln!(writer, "  {}: {} -> {}", fix.key, fix.from, fix.to)?;
            }
        }
        if let Some(preset) = &self.preset {
            writeln!(writer)?;
            writeln!(
                writer,
                "Preset {preset}: {} updated, {} added",
                self.updated.len(),
                self.added.len()
            )?;
        }
        if !self.remaining.is_empty() && (self.preset.is_some() || !self.applied.is_empty()) {
            writeln!(writer, "{} issue(s) remain", self.remaining.len())?;
        }
        if self.written {
            writeln!(writer, "Wrote {}", self.file)?;
        } else if let Some(text) = &self.text {
            writeln!(writer)?;
            write!(writer, "{text}")?;
        }
        Ok(())
    }
}

/// Builtin presets for one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetList {
    /// The file name the presets apply to.
    pub file_name: String,
    /// The presets.
    pub presets: Vec<Preset>,
}

impl TableDisplay for PresetList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.presets.is_empty() {
            writeln!(writer, "No builtin presets for {}", self.file_name)?;
            return Ok(());
        }
        writeln!(writer, "Presets for {}", self.file_name)?;
        writeln!(writer, "{BANNER}")?;
        for preset in &self.presets {
            writeln!(writer, "{:<16} {}", preset.id, preset.title)?;
            writeln!(writer, "{:<16} {}", "", preset.description)?;
            for (key, value) in &preset.values {
                writeln!(writer, "{:<16}   {key} = {value}", "")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<T: Serialize + TableDisplay>(format: Format, value: &T) -> String {
        let mut buf = Vec::new();
        OutputFormat::new(format).write(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn analysis_table_uses_report() {
        let result = modsight_analyze::analyze_log_text("java.lang.OutOfMemoryError: Java heap space");
        let out = render(Format::Table, &result);
        assert!(out.contains("MODSIGHT CRASH REPORT"));
        assert!(out.contains("Out of memory"));
    }

    #[test]
    fn analysis_json() {
        let out = render(Format::Json, &LogAnalyzeResult::default());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["totalLines"], 0);
        assert!(OutputFormat::new(Format::Json).is_json());
    }

    #[test]
    fn summary_table_and_json() {
        let result = modsight_analyze::analyze_log_text("java.lang.OutOfMemoryError: Java heap space");
        let summary = AnalysisSummary::from(&result);
        let table = render(Format::Table, &summary);
        assert!(table.starts_with("[ERROR] Out of memory ("));
        assert_eq!(table.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(&render(Format::Json, &summary)).unwrap();
        assert_eq!(value["topCause"], "memory_oom");
        assert_eq!(value["totalLines"], 1);
    }

    #[test]
    fn preset_list_table() {
        let list = PresetList {
            file_name: "options.txt".into(),
            presets: modsight_config::presets_for("options.txt").to_vec(),
        };
        let out = render(Format::Table, &list);
        assert!(out.contains("Presets for options.txt"));
        assert!(out.contains("low-end"));
        assert!(out.contains("renderDistance = 6"));
    }

    #[test]
    fn empty_preset_list() {
        let list = PresetList {
            file_name: "mods.toml".into(),
            presets: Vec::new(),
        };
        assert_eq!(render(Format::Table, &list), "No builtin presets for mods.toml\n");
    }
}
