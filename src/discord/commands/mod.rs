// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::handler::{IncomingMessage, MailHandler};
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

mod help;
mod setup;

/// A text command, split into its lowercased name and its arguments
#[derive(Debug, Eq, PartialEq)]
pub struct ParsedCommand<'a> {
	pub name: String,
	pub arguments: Vec<&'a str>,
}

/// Splits a message into a command if it starts with the command prefix.
pub fn parse_command<'a>(content: &'a str, command_prefix: &str) -> Option<ParsedCommand<'a>> {
	let rest = content.trim_start().strip_prefix(command_prefix)?;
	let mut parts = rest.split_whitespace();
	let name = parts.next()?.to_lowercase();
	Some(ParsedCommand {
		name,
		arguments: parts.collect(),
	})
}

pub async fn route_command(
	handler: &MailHandler,
	guild_id: Id<GuildMarker>,
	message: &IncomingMessage,
) -> miette::Result<()> {
	let Some(command) = parse_command(&message.content, &handler.command_prefix) else {
		return Ok(());
	};

	match command.name.as_str() {
		"help" => help::handle_command(handler, message).await,
		"setup" => setup::handle_command(handler, guild_id, message, &command.arguments).await,
		_ => {
			tracing::debug!(command = %command.name, "Ignoring unknown command");
			Ok(())
		}
	}
}
