// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::utils::notices::NoticeMessage;
use crate::model::MailReaction;
use async_trait::async_trait;
use twilight_model::channel::message::embed::Embed;
use twilight_model::channel::message::{EmojiReactionType, Message};
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker};

/// Everything the mail handler needs from Discord.
///
/// The gateway side (receiving events) stays in the connection loop; this covers the REST calls made while handling
/// an event.
#[async_trait]
pub trait MailPlatform: Send + Sync + 'static {
	/// The bot's own user ID
	fn bot_user_id(&self) -> Id<UserMarker>;

	/// Looks up a channel in a guild and returns the bot's permissions in it.
	///
	/// Returns `None` if the channel doesn't exist, can't be seen, or belongs to a different guild.
	async fn bot_channel_permissions(
		&self,
		guild_id: Id<GuildMarker>,
		channel_id: Id<ChannelMarker>,
	) -> miette::Result<Option<Permissions>>;

	/// Whether the member may manage the guild (and so may configure mod mail)
	async fn member_can_manage_guild(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> miette::Result<bool>;

	/// The name to show for a user, preferring their name in the guild if one is given.
	async fn display_name(&self, guild_id: Option<Id<GuildMarker>>, user_id: Id<UserMarker>) -> miette::Result<String>;

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &NoticeMessage,
	) -> miette::Result<Id<MessageMarker>>;

	async fn add_reaction(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
		reaction: MailReaction,
	) -> miette::Result<()>;

	/// Fetches a message. Returns `None` if the message no longer exists.
	async fn fetch_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> miette::Result<Option<PostedMessage>>;

	async fn delete_message(&self, channel_id: Id<ChannelMarker>, message_id: Id<MessageMarker>) -> miette::Result<()>;
}

/// The parts of a posted message that matter for moving a ticket
#[derive(Clone, Debug, PartialEq)]
pub struct PostedMessage {
	pub author_id: Id<UserMarker>,
	pub embeds: Vec<Embed>,
	pub reactions: Vec<ReactionTally>,
}

impl PostedMessage {
	/// How many users other than the bot have added the reaction
	pub fn reactions_from_others(&self, reaction: MailReaction) -> u64 {
		self.reactions
			.iter()
			.filter(|tally| MailReaction::from_name(&tally.emoji) == Some(reaction))
			.map(|tally| tally.count.saturating_sub(u64::from(tally.me)))
			.sum()
	}
}

impl From<Message> for PostedMessage {
	fn from(message: Message) -> Self {
		let reactions = message
			.reactions
			.into_iter()
			.filter_map(|reaction| match reaction.emoji {
				EmojiReactionType::Unicode { name } => Some(ReactionTally {
					emoji: name,
					count: reaction.count,
					me: reaction.me,
				}),
				EmojiReactionType::Custom { .. } => None,
			})
			.collect();
		Self {
			author_id: message.author.id,
			embeds: message.embeds,
			reactions,
		}
	}
}

/// A unicode reaction on a message and how many users added it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReactionTally {
	pub emoji: String,
	pub count: u64,
	/// Whether the bot is one of the users counted
	pub me: bool,
}
