// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::handler::{IncomingMessage, MailHandler};
use crate::discord::utils::notices::{
	BAD_CHANNEL_DESCRIPTION, MISSING_ARGUMENT_DESCRIPTION, NoticeMessage, SAME_CHANNEL_DESCRIPTION,
	setup_success_notice, usage_notice,
};
use crate::discord::utils::permissions::{mail_channel_permissions, missing_permissions_message};
use crate::model::MailChannels;
use twilight_mention::fmt::Mention;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};

pub const NOT_ALLOWED_REPLY: &str = "You need the Manage Server permission to set up mod mail.";

/// Reads a channel argument given either as a channel mention or as a raw channel ID.
pub fn parse_channel_argument(argument: &str) -> Option<Id<ChannelMarker>> {
	let raw_id = argument
		.strip_prefix("<#")
		.and_then(|rest| rest.strip_suffix('>'))
		.unwrap_or(argument);
	let id: u64 = raw_id.parse().ok()?;
	Id::new_checked(id)
}

pub async fn handle_command(
	handler: &MailHandler,
	guild_id: Id<GuildMarker>,
	message: &IncomingMessage,
	arguments: &[&str],
) -> miette::Result<()> {
	let platform = &handler.platform;

	if !platform.member_can_manage_guild(guild_id, message.author.id).await? {
		platform
			.send_message(message.channel_id, &NoticeMessage::text(NOT_ALLOWED_REPLY))
			.await?;
		return Ok(());
	}

	let [open_argument, resolved_argument, ..] = arguments else {
		return reply_with_usage(handler, message, MISSING_ARGUMENT_DESCRIPTION).await;
	};
	let (Some(open), Some(resolved)) = (
		parse_channel_argument(open_argument),
		parse_channel_argument(resolved_argument),
	) else {
		return reply_with_usage(handler, message, BAD_CHANNEL_DESCRIPTION).await;
	};
	let Ok(channels) = MailChannels::new(open, resolved) else {
		return reply_with_usage(handler, message, SAME_CHANNEL_DESCRIPTION).await;
	};

	for channel_id in [channels.open, channels.resolved] {
		let Some(permissions) = platform.bot_channel_permissions(guild_id, channel_id).await? else {
			return reply_with_usage(handler, message, BAD_CHANNEL_DESCRIPTION).await;
		};
		let missing = mail_channel_permissions() - permissions;
		if !missing.is_empty() {
			let reply = NoticeMessage::text(missing_permissions_message(channel_id.mention(), missing));
			platform.send_message(message.channel_id, &reply).await?;
			return Ok(());
		}
	}

	handler.channels.set(channels).await?;
	tracing::info!(
		open = %channels.open,
		resolved = %channels.resolved,
		set_by = %message.author.id,
		"Mail channels set up"
	);

	platform
		.send_message(message.channel_id, &setup_success_notice(channels.open, channels.resolved))
		.await?;
	Ok(())
}

async fn reply_with_usage(handler: &MailHandler, message: &IncomingMessage, description: &str) -> miette::Result<()> {
	let notice = usage_notice(
		description,
		&handler.command_prefix,
		&message.author.name,
		&message.author.avatar_url,
	);
	handler.platform.send_message(message.channel_id, &notice).await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn channel_arguments() {
		assert_eq!(parse_channel_argument("<#123>"), Some(Id::new(123)));
		assert_eq!(parse_channel_argument("456"), Some(Id::new(456)));
		assert_eq!(parse_channel_argument("<#0>"), None);
		assert_eq!(parse_channel_argument("<@123>"), None);
		assert_eq!(parse_channel_argument("general"), None);
		assert_eq!(parse_channel_argument("<#12a>"), None);
	}
}
