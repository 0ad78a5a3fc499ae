//! Lint command implementation.
//!
//! Checks a config file against the builtin rules, then optionally applies
//! safe fixes and a preset, in that order.

use std::fs;
use std::io::Write;

use modsight_config::{
    apply_preset, apply_safe_fixes, detect_config_issues, find_preset, ConfigFormat, RuleSet,
};
use tracing::{debug, info};

use crate::cli::LintArgs;
use crate::error::CliError;
use crate::output::{LintReport, OutputFormat};

/// Handler for the lint command.
#[derive(Debug, Default)]
pub struct LintCommand;

impl LintCommand {
    /// Creates a new lint command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the lint command.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or written, its format is
    /// unsupported, the preset is unknown or invalid, or `--write` is given
    /// without anything to write.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &LintArgs,
    ) -> Result<(), CliError> {
        if args.write && !args.fix && args.preset.is_none() {
            return Err(CliError::InvalidArgument(
                "--write needs --fix or --preset".to_string(),
            ));
        }

        let name = args.file.to_string_lossy().into_owned();
        let text = fs::read_to_string(&args.file)?;
        let mut report = self.lint(&name, &text, args.fix, args.preset.as_deref())?;

        if args.write {
            if let Some(new_text) = report.text.take() {
                fs::write(&args.file, new_text)?;
                report.written = true;
                info!(file = %name, "config rewritten");
            }
        }
        format.write(out, &report)
    }

    /// Lints already-read text.
    ///
    /// # Errors
    ///
    /// Returns error if the format is unsupported or the preset is unknown or
    /// invalid.
    pub fn lint(
        &self,
        name: &str,
        text: &str,
        fix: bool,
        preset: Option<&str>,
    ) -> Result<LintReport, CliError> {
        let config_format = ConfigFormat::from_file_name(name)?;
        let rules = RuleSet::for_file(name);
        let issues = detect_config_issues(text, config_format, rules);
        debug!(file = %name, format = %config_format, issues = issues.len(), "config checked");

        let mut current = text.to_string();
        let mut applied = Vec::new();
        if fix {
            let outcome = apply_safe_fixes(&current, config_format, rules);
            applied = outcome.applied;
            current = outcome.text;
        }

        let (mut updated, mut added) = (Vec::new(), Vec::new());
        if let Some(id) = preset {
            let preset = find_preset(name, id)?;
            let outcome = apply_preset(&current, config_format, preset, rules)?;
            updated = outcome.updated;
            added = outcome.added;
            current = outcome.text;
        }

        let remaining = if fix || preset.is_some() {
            detect_config_issues(&current, config_format, rules)
        } else {
            Vec::new()
        };

        Ok(LintReport {
            file: name.to_string(),
            format: config_format,
            issues,
            applied,
            preset: preset.map(str::to_string),
            updated,
            added,
            remaining,
            written: false,
            text: (current != text).then_some(current),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use std::path::PathBuf;

    #[test]
    fn reports_issues_without_changing_text() {
        let report = LintCommand::new()
            .lint("server.properties", "max-players=0\n", false, None)
            .unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].key.as_deref(), Some("max-players"));
        assert!(report.applied.is_empty());
        assert!(report.text.is_none());
    }

    #[test]
    fn fix_produces_new_text() {
        let report = LintCommand::new()
            .lint("options.txt", "renderDistance:99\n", true, None)
            .unwrap();
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.text.as_deref(), Some("renderDistance:32\n"));
        assert!(report.remaining.is_empty());
    }

    #[test]
    fn preset_is_applied_after_fixes() {
        let report = LintCommand::new()
            .lint("options.txt", "renderDistance:99\n", true, Some("low-end"))
            .unwrap();
        let text = report.text.unwrap();
        assert!(text.starts_with("renderDistance:6\n"));
        assert_eq!(report.updated, vec!["renderDistance".to_string()]);
        assert!(!report.added.is_empty());
    }

    #[test]
    fn unknown_preset_fails() {
        let err = LintCommand::new()
            .lint("options.txt", "", false, Some("ultra"))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn unsupported_file_fails() {
        let err = LintCommand::new().lint("mods.toml", "", false, None).unwrap_err();
        assert!(err.to_string().contains("mods.toml"));
    }

    #[test]
    fn write_without_change_flag_is_rejected() {
        let args = LintArgs {
            file: PathBuf::from("server.properties"),
            fix: false,
            preset: None,
            write: true,
        };
        let mut out = Vec::new();
        let err = LintCommand::new()
            .execute(&mut out, &OutputFormat::new(Format::Table), &args)
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn write_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.properties");
        fs::write(&path, "max-players=0\nmotd=hi\n").unwrap();
        let args = LintArgs {
            file: path.clone(),
            fix: true,
            preset: None,
            write: true,
        };
        let mut out = Vec::new();
        LintCommand::new()
            .execute(&mut out, &OutputFormat::new(Format::Table), &args)
            .unwrap();
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.starts_with("max-players=1\n"));
        assert!(rewritten.ends_with("motd=hi\n"));
        assert!(String::from_utf8(out).unwrap().contains("Wrote"));
    }
}
