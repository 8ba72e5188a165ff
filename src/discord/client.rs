// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::platform::{MailPlatform, PostedMessage};
use super::utils::notices::NoticeMessage;
use super::utils::permissions::{channel_permissions, guild_permissions};
use super::utils::users::get_display_name;
use crate::model::MailReaction;
use async_trait::async_trait;
use miette::IntoDiagnostic;
use std::sync::Arc;
use twilight_http::client::Client;
use twilight_http::error::ErrorType;
use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker};

/// [MailPlatform] backed by the Discord REST API
pub struct DiscordPlatform {
	http_client: Arc<Client>,
	bot_user_id: Id<UserMarker>,
}

impl DiscordPlatform {
	/// Creates the platform, looking up the bot's own user.
	pub async fn new(http_client: Arc<Client>) -> miette::Result<Self> {
		let bot_user = http_client
			.current_user()
			.await
			.into_diagnostic()?
			.model()
			.await
			.into_diagnostic()?;
		tracing::info!(user_id = %bot_user.id, name = %bot_user.name, "Logged in");
		Ok(Self {
			http_client,
			bot_user_id: bot_user.id,
		})
	}
}

#[async_trait]
impl MailPlatform for DiscordPlatform {
	fn bot_user_id(&self) -> Id<UserMarker> {
		self.bot_user_id
	}

	async fn bot_channel_permissions(
		&self,
		guild_id: Id<GuildMarker>,
		channel_id: Id<ChannelMarker>,
	) -> miette::Result<Option<Permissions>> {
		channel_permissions(&self.http_client, guild_id, channel_id, self.bot_user_id).await
	}

	async fn member_can_manage_guild(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> miette::Result<bool> {
		let permissions = guild_permissions(&self.http_client, guild_id, user_id).await?;
		Ok(permissions.contains(Permissions::MANAGE_GUILD))
	}

	async fn display_name(&self, guild_id: Option<Id<GuildMarker>>, user_id: Id<UserMarker>) -> miette::Result<String> {
		Ok(get_display_name(&self.http_client, guild_id, user_id).await?)
	}

	async fn send_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message: &NoticeMessage,
	) -> miette::Result<Id<MessageMarker>> {
		let create_message = message.set_create_message_data(self.http_client.create_message(channel_id));
		let posted = create_message.await.into_diagnostic()?.model().await.into_diagnostic()?;
		Ok(posted.id)
	}

	async fn add_reaction(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
		reaction: MailReaction,
	) -> miette::Result<()> {
		let emoji = RequestReactionType::Unicode { name: reaction.emoji() };
		self.http_client
			.create_reaction(channel_id, message_id, &emoji)
			.await
			.into_diagnostic()?;
		Ok(())
	}

	async fn fetch_message(
		&self,
		channel_id: Id<ChannelMarker>,
		message_id: Id<MessageMarker>,
	) -> miette::Result<Option<PostedMessage>> {
		let response = match self.http_client.message(channel_id, message_id).await {
			Ok(response) => response,
			Err(error) => {
				if let ErrorType::Response { status, .. } = error.kind() {
					if status.get() == 404 {
						return Ok(None);
					}
				}
				return Err(error).into_diagnostic();
			}
		};
		let message = response.model().await.into_diagnostic()?;
		Ok(Some(PostedMessage::from(message)))
	}

	async fn delete_message(&self, channel_id: Id<ChannelMarker>, message_id: Id<MessageMarker>) -> miette::Result<()> {
		self.http_client
			.delete_message(channel_id, message_id)
			.await
			.into_diagnostic()?;
		Ok(())
	}
}
