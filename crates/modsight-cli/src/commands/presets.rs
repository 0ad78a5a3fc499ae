//! Presets command implementation.

use std::io::Write;

use modsight_config::presets_for;

use crate::cli::PresetsArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, PresetList};

/// Handler for the presets command.
#[derive(Debug, Default)]
pub struct PresetsCommand;

impl PresetsCommand {
    /// Creates a new presets command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the presets command.
    ///
    /// # Errors
    ///
    /// Returns error if writing the output fails.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &PresetsArgs,
    ) -> Result<(), CliError> {
        let list = PresetList {
            file_name: args.file_name.clone(),
            presets: presets_for(&args.file_name).to_vec(),
        };
        format.write(out, &list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;

    #[test]
    fn lists_server_presets_as_json() {
        let args = PresetsArgs {
            file_name: "server.properties".into(),
        };
        let mut out = Vec::new();
        PresetsCommand::new()
            .execute(&mut out, &OutputFormat::new(Format::Json), &args)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let ids: Vec<&str> = value["presets"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["performance", "friends", "creative-build"]);
        assert_eq!(value["fileName"], "server.properties");
    }
}
