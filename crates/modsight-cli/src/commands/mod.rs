//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`analyze`] - Log diagnosis
//! - [`lint`] - Config checks, safe fixes and presets
//! - [`presets`] - Builtin preset listing

pub mod analyze;
pub mod lint;
pub mod presets;

pub use analyze::AnalyzeCommand;
pub use lint::LintCommand;
pub use presets::PresetsCommand;
