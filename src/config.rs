// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use kdl::KdlDocument;
use miette::{IntoDiagnostic, Result, miette};
use std::path::{Path, PathBuf};
use tokio::fs::read_to_string;

pub const DEFAULT_CHANNELS_FILE: &str = "channels.json";
pub const DEFAULT_COMMAND_PREFIX: &str = "!";

pub async fn parse_config(config_path: &Path) -> Result<ConfigDocument> {
	let config_file_contents = read_to_string(config_path).await.into_diagnostic()?;
	parse_config_str(&config_file_contents)
}

/// Parses the contents of a KDL configuration document.
pub fn parse_config_str(config_file_contents: &str) -> Result<ConfigDocument> {
	let document: KdlDocument = config_file_contents.parse()?;

	let discord_token = string_arg(&document, "discord_token")?
		.ok_or_else(|| miette!("The configuration is missing `discord_token`"))?;
	let channels_file = string_arg(&document, "channels_file")?.unwrap_or(DEFAULT_CHANNELS_FILE);
	let command_prefix = string_arg(&document, "command_prefix")?.unwrap_or(DEFAULT_COMMAND_PREFIX);

	if command_prefix.trim().is_empty() {
		return Err(miette!("`command_prefix` must not be empty"));
	}

	Ok(ConfigDocument {
		discord_token: discord_token.to_string(),
		channels_file: PathBuf::from(channels_file),
		command_prefix: command_prefix.trim().to_string(),
	})
}

fn string_arg<'a>(document: &'a KdlDocument, name: &str) -> Result<Option<&'a str>> {
	match document.get_arg(name) {
		Some(value) => match value.as_string() {
			Some(value) => Ok(Some(value)),
			None => Err(miette!("`{}` must be a string", name)),
		},
		None => Ok(None),
	}
}

#[derive(Debug)]
pub struct ConfigDocument {
	pub discord_token: String,
	/// Where the mail channel IDs are persisted
	pub channels_file: PathBuf,
	pub command_prefix: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_all_settings() {
		let config = parse_config_str(
			"discord_token \"abc.def\"\nchannels_file \"data/channels.json\"\ncommand_prefix \"?\"\n",
		)
		.unwrap();
		assert_eq!(config.discord_token, "abc.def");
		assert_eq!(config.channels_file, PathBuf::from("data/channels.json"));
		assert_eq!(config.command_prefix, "?");
	}

	#[test]
	fn optional_settings_have_defaults() {
		let config = parse_config_str("discord_token \"abc.def\"\n").unwrap();
		assert_eq!(config.channels_file, PathBuf::from(DEFAULT_CHANNELS_FILE));
		assert_eq!(config.command_prefix, DEFAULT_COMMAND_PREFIX);
	}

	#[test]
	fn token_is_required() {
		assert!(parse_config_str("command_prefix \"!\"\n").is_err());
	}

	#[test]
	fn token_must_be_a_string() {
		assert!(parse_config_str("discord_token 12345\n").is_err());
	}

	#[test]
	fn blank_prefix_is_rejected() {
		assert!(parse_config_str("discord_token \"abc\"\ncommand_prefix \" \"\n").is_err());
	}
}
