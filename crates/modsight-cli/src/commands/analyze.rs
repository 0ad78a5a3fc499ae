//! Analyze command implementation.
//!
//! Reads a log from a file or stdin and prints the diagnosis.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use modsight_analyze::{Analyzer, AnalyzerConfig, LogAnalyzeResult};
use tracing::debug;

use crate::cli::{AnalyzeArgs, InputKind};
use crate::error::CliError;
use crate::output::{AnalysisSummary, OutputFormat};

/// Handler for the analyze command.
#[derive(Debug, Default)]
pub struct AnalyzeCommand;

impl AnalyzeCommand {
    /// Creates a new analyze command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the analyze command.
    ///
    /// # Errors
    ///
    /// Returns error if the input or config cannot be read, the config is
    /// invalid, or JSON input does not decode.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &AnalyzeArgs,
    ) -> Result<(), CliError> {
        let input = read_input(&args.file)?;
        let result = self.analyze(&input, args)?;
        if args.summary {
            format.write(out, &AnalysisSummary::from(&result))
        } else {
            format.write(out, &result)
        }
    }

    /// Runs the analysis on already-read input.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid or JSON input does not decode.
    pub fn analyze(&self, input: &str, args: &AnalyzeArgs) -> Result<LogAnalyzeResult, CliError> {
        let config = match &args.config {
            Some(path) => load_config(path)?,
            None => AnalyzerConfig::default(),
        };
        let mut analyzer = Analyzer::with_config(config)?;
        if let Some(source) = &args.source {
            analyzer = analyzer.with_default_source(source.as_str());
        }
        debug!(file = %args.file, input = ?args.input, bytes = input.len(), "analyzing log");

        let result = match args.input {
            InputKind::Text => analyzer.analyze_text(input),
            InputKind::Json => analyzer.analyze_json(input)?,
        };
        Ok(result)
    }
}

fn read_input(file: &str) -> Result<String, CliError> {
    let bytes = if file == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(file)?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn load_config(path: &Path) -> Result<AnalyzerConfig, CliError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        CliError::InvalidArgument(format!("analyzer config {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(input: InputKind) -> AnalyzeArgs {
        AnalyzeArgs {
            file: "-".into(),
            input,
            config: None,
            source: None,
            summary: false,
        }
    }

    #[test]
    fn analyzes_text() {
        let result = AnalyzeCommand::new()
            .analyze("java.lang.OutOfMemoryError: Java heap space", &args(InputKind::Text))
            .unwrap();
        assert_eq!(result.total_lines, 1);
        assert_eq!(result.likely_causes[0].id, "memory_oom");
    }

    #[test]
    fn analyzes_json_lines() {
        let result = AnalyzeCommand::new()
            .analyze(r#"["[12:00:00] [main/ERROR]: boom", "ok"]"#, &args(InputKind::Json))
            .unwrap();
        assert_eq!(result.total_lines, 2);
        assert_eq!(result.error_count, 1);
    }

    #[test]
    fn malformed_json_is_an_analysis_error() {
        let err = AnalyzeCommand::new()
            .analyze("{not json", &args(InputKind::Json))
            .unwrap_err();
        assert!(matches!(err, CliError::Analyze(_)));
    }

    #[test]
    fn config_file_caps_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyzer.json");
        fs::write(&path, r#"{"maxKeyErrors": 1}"#).unwrap();
        let mut a = args(InputKind::Text);
        a.config = Some(path);
        let result = AnalyzeCommand::new()
            .analyze("first error here\nsecond error there\n", &a)
            .unwrap();
        assert_eq!(result.key_errors.len(), 1);
    }

    #[test]
    fn zero_cap_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyzer.json");
        fs::write(&path, r#"{"maxCauses": 0}"#).unwrap();
        let mut a = args(InputKind::Text);
        a.config = Some(path);
        let err = AnalyzeCommand::new().analyze("x", &a).unwrap_err();
        assert!(err.to_string().contains("maxCauses"));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let mut a = args(InputKind::Text);
        a.config = Some(PathBuf::from("/nonexistent/analyzer.json"));
        let err = AnalyzeCommand::new().analyze("x", &a).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
