//! modsight binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use modsight_cli::cli::{Cli, Commands};
use modsight_cli::commands::{AnalyzeCommand, LintCommand, PresetsCommand};
use modsight_cli::output::OutputFormat;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), modsight_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Analyze(args) => AnalyzeCommand::new().execute(&mut stdout, &format, &args)?,
        Commands::Lint(args) => LintCommand::new().execute(&mut stdout, &format, &args)?,
        Commands::Presets(args) => PresetsCommand::new().execute(&mut stdout, &format, &args)?,
    }

    Ok(())
}
