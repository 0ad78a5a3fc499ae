//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// modsight - crash log diagnosis and config linting for Minecraft modpacks.
#[derive(Parser, Debug, Clone)]
#[command(name = "modsight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, env = "MODSIGHT_FORMAT", default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable report.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// How the analyze input is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputKind {
    /// Raw log text.
    #[default]
    Text,
    /// A JSON array of lines or a log-source payload.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Diagnose a game or launcher log.
    Analyze(AnalyzeArgs),

    /// Check a config file, optionally fixing it or applying a preset.
    Lint(LintArgs),

    /// List builtin presets for a config file.
    Presets(PresetsArgs),
}

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Log file to read, or `-` for stdin.
    pub file: String,

    /// Input encoding.
    #[arg(short, long, value_enum, default_value_t = InputKind::Text)]
    pub input: InputKind,

    /// Analyzer config (JSON) overriding the default caps.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source name stamped on lines that carry none.
    #[arg(long)]
    pub source: Option<String>,

    /// Print a one-line summary instead of the full report.
    #[arg(long)]
    pub summary: bool,
}

/// Arguments for the lint command.
#[derive(Args, Debug, Clone)]
pub struct LintArgs {
    /// Config file to check.
    pub file: PathBuf,

    /// Apply safe fixes.
    #[arg(long)]
    pub fix: bool,

    /// Apply a builtin preset by id.
    #[arg(long, value_name = "ID")]
    pub preset: Option<String>,

    /// Write the result back to the file instead of printing it.
    #[arg(long)]
    pub write: bool,
}

/// Arguments for the presets command.
#[derive(Args, Debug, Clone)]
pub struct PresetsArgs {
    /// Config file name, e.g. `server.properties`.
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_default_is_table() {
        let cli = Cli::parse_from(["modsight", "presets", "options.txt"]);
        assert_eq!(cli.format, Format::Table);
    }

    #[test]
    fn parses_analyze() {
        let cli = Cli::parse_from([
            "modsight", "--format", "json", "analyze", "-", "--input", "json", "--source", "latest.log",
        ]);
        assert_eq!(cli.format, Format::Json);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.file, "-");
        assert_eq!(args.input, InputKind::Json);
        assert_eq!(args.source.as_deref(), Some("latest.log"));
        assert!(args.config.is_none());
        assert!(!args.summary);
    }

    #[test]
    fn parses_analyze_summary() {
        let cli = Cli::parse_from(["modsight", "analyze", "latest.log", "--summary"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert!(args.summary);
    }

    #[test]
    fn parses_lint_flags() {
        let cli = Cli::parse_from([
            "modsight", "lint", "server.properties", "--fix", "--preset", "performance", "--write",
        ]);
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        assert!(args.fix);
        assert!(args.write);
        assert_eq!(args.preset.as_deref(), Some("performance"));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["modsight", "--format", "xml", "presets", "x"]).is_err());
    }
}
