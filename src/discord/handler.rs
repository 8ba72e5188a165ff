// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::commands::route_command;
use super::incoming_messages::relay_direct_message;
use super::platform::MailPlatform;
use super::reactions::handle_reaction_add;
use super::utils::users::{avatar_url, member_display_name};
use crate::channels::ChannelStore;
use std::sync::Arc;
use twilight_model::channel::message::{EmojiReactionType, Message};
use twilight_model::gateway::GatewayReaction;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker};

/// Handles mod mail events. Cheap to clone; one clone is handed to each event task.
#[derive(Clone)]
pub struct MailHandler {
	pub platform: Arc<dyn MailPlatform>,
	pub channels: ChannelStore,
	pub command_prefix: String,
}

impl MailHandler {
	pub fn new(platform: Arc<dyn MailPlatform>, channels: ChannelStore, command_prefix: impl Into<String>) -> Self {
		Self {
			platform,
			channels,
			command_prefix: command_prefix.into(),
		}
	}

	pub async fn handle_message(&self, message: &IncomingMessage) -> miette::Result<()> {
		if message.author.bot || message.author.id == self.platform.bot_user_id() {
			return Ok(());
		}

		match message.guild_id {
			None => relay_direct_message(self, message).await,
			Some(guild_id) => route_command(self, guild_id, message).await,
		}
	}

	pub async fn handle_reaction(&self, reaction: &ReactionEvent) -> miette::Result<()> {
		handle_reaction_add(self, reaction).await
	}
}

/// Author of an incoming message
#[derive(Clone, Debug)]
pub struct MessageAuthor {
	pub id: Id<UserMarker>,
	pub name: String,
	pub avatar_url: String,
	pub bot: bool,
}

/// A message received over the gateway, reduced to what mod mail uses
#[derive(Clone, Debug)]
pub struct IncomingMessage {
	pub id: Id<MessageMarker>,
	pub channel_id: Id<ChannelMarker>,
	pub guild_id: Option<Id<GuildMarker>>,
	pub author: MessageAuthor,
	pub content: String,
	pub attachment_urls: Vec<String>,
}

impl From<&Message> for IncomingMessage {
	fn from(message: &Message) -> Self {
		Self {
			id: message.id,
			channel_id: message.channel_id,
			guild_id: message.guild_id,
			author: MessageAuthor {
				id: message.author.id,
				name: message.author.name.clone(),
				avatar_url: avatar_url(&message.author),
				bot: message.author.bot,
			},
			content: message.content.clone(),
			attachment_urls: message
				.attachments
				.iter()
				.map(|attachment| attachment.url.clone())
				.collect(),
		}
	}
}

/// A reaction added to a message, as received over the gateway
#[derive(Clone, Debug)]
pub struct ReactionEvent {
	pub channel_id: Id<ChannelMarker>,
	pub message_id: Id<MessageMarker>,
	pub guild_id: Option<Id<GuildMarker>>,
	pub user_id: Id<UserMarker>,
	pub emoji: EmojiReactionType,
	/// Display name of the reacting member, when the event carried member data
	pub member_name: Option<String>,
}

impl From<&GatewayReaction> for ReactionEvent {
	fn from(reaction: &GatewayReaction) -> Self {
		Self {
			channel_id: reaction.channel_id,
			message_id: reaction.message_id,
			guild_id: reaction.guild_id,
			user_id: reaction.user_id,
			emoji: reaction.emoji.clone(),
			member_name: reaction.member.as_ref().map(member_display_name),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::MailReaction;
	use serde_json::{Value, json};

	fn author() -> Value {
		json!({
			"id": "3000",
			"username": "wanderer",
			"discriminator": "0",
			"avatar": "a1b2c3d4e5f60718293a4b5c6d7e8f90",
		})
	}

	#[test]
	fn incoming_message_keeps_author_and_attachments() {
		let message: Message = serde_json::from_value(json!({
			"id": "77",
			"channel_id": "30",
			"type": 0,
			"author": author(),
			"content": "please help",
			"timestamp": "2024-05-01T12:30:00.000000+00:00",
			"edited_timestamp": null,
			"tts": false,
			"mention_everyone": false,
			"mentions": [],
			"mention_roles": [],
			"pinned": false,
			"embeds": [],
			"attachments": [
				{
					"id": "5",
					"filename": "log.txt",
					"size": 12,
					"url": "https://cdn.discordapp.com/attachments/30/5/log.txt",
					"proxy_url": "https://media.discordapp.net/attachments/30/5/log.txt",
				},
				{
					"id": "6",
					"filename": "shot.png",
					"size": 34,
					"url": "https://cdn.discordapp.com/attachments/30/6/shot.png",
					"proxy_url": "https://media.discordapp.net/attachments/30/6/shot.png",
				},
			],
		}))
		.unwrap();

		let incoming = IncomingMessage::from(&message);
		assert_eq!(incoming.id, Id::new(77));
		assert_eq!(incoming.channel_id, Id::new(30));
		assert_eq!(incoming.guild_id, None);
		assert_eq!(incoming.author.id, Id::new(3000));
		assert_eq!(incoming.author.name, "wanderer");
		assert_eq!(
			incoming.author.avatar_url,
			"https://cdn.discordapp.com/avatars/3000/a1b2c3d4e5f60718293a4b5c6d7e8f90.png?size=1024"
		);
		assert!(!incoming.author.bot);
		assert_eq!(incoming.content, "please help");
		assert_eq!(
			incoming.attachment_urls,
			[
				"https://cdn.discordapp.com/attachments/30/5/log.txt",
				"https://cdn.discordapp.com/attachments/30/6/shot.png",
			]
		);
	}

	fn gateway_reaction(member: Value) -> GatewayReaction {
		serde_json::from_value(json!({
			"burst": false,
			"channel_id": "10",
			"message_id": "500",
			"guild_id": "4000",
			"user_id": "2000",
			"emoji": { "name": "\u{2705}" },
			"member": member,
		}))
		.unwrap()
	}

	#[test]
	fn reaction_event_takes_member_display_name() {
		let reaction = gateway_reaction(json!({
			"deaf": false,
			"mute": false,
			"flags": 0,
			"roles": [],
			"nick": null,
			"user": {
				"id": "2000",
				"username": "mira_staff",
				"global_name": "Mira",
				"discriminator": "0",
			},
		}));

		let event = ReactionEvent::from(&reaction);
		assert_eq!(event.channel_id, Id::new(10));
		assert_eq!(event.message_id, Id::new(500));
		assert_eq!(event.guild_id, Some(Id::new(4000)));
		assert_eq!(event.user_id, Id::new(2000));
		assert_eq!(MailReaction::from_emoji(&event.emoji), Some(MailReaction::CheckMark));
		assert_eq!(event.member_name.as_deref(), Some("Mira"));
	}

	#[test]
	fn reaction_event_without_member_has_no_name() {
		let event = ReactionEvent::from(&gateway_reaction(Value::Null));
		assert_eq!(event.member_name, None);
	}
}
