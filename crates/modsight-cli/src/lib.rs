//! modsight command-line interface.
//!
//! Wraps the log analyzer and the config rule engine in three subcommands:
//!
//! - `analyze` diagnoses a launcher or game log (text or JSON lines)
//! - `lint` checks `server.properties`, `options.txt` or JSON configs, and
//!   can apply safe fixes and builtin presets
//! - `presets` lists the builtin presets for a config file
//!
//! Every command writes either a human-readable report or JSON, selected
//! with `--format`.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
