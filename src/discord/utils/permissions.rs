// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::IntoDiagnostic;
use std::collections::HashMap;
use std::future::IntoFuture;
use twilight_http::client::Client;
use twilight_http::error::ErrorType;
use twilight_model::guild::{Member, Permissions, Role};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker};
use twilight_util::permission_calculator::PermissionCalculator;

const PERMISSION_NAMES: [(Permissions, &str); 5] = [
	(Permissions::VIEW_CHANNEL, "View Channel"),
	(Permissions::SEND_MESSAGES, "Send Messages"),
	(Permissions::EMBED_LINKS, "Embed Links"),
	(Permissions::ADD_REACTIONS, "Add Reactions"),
	(Permissions::READ_MESSAGE_HISTORY, "Read Message History"),
];

// This permission list is reported to the user by `missing_permissions_message` below; keep the names in
// `PERMISSION_NAMES` in sync.
pub fn mail_channel_permissions() -> Permissions {
	Permissions::VIEW_CHANNEL
		| Permissions::SEND_MESSAGES
		| Permissions::EMBED_LINKS
		| Permissions::ADD_REACTIONS
		| Permissions::READ_MESSAGE_HISTORY
}

/// Generates the message to send when setting up a channel the bot can't post and manage mail in.
pub fn missing_permissions_message(channel_mention: impl std::fmt::Display, missing: Permissions) -> String {
	let names: Vec<&str> = PERMISSION_NAMES
		.iter()
		.filter(|(permission, _)| missing.contains(*permission))
		.map(|(_, name)| *name)
		.collect();
	format!(
		"I'm missing permissions in {} to post and manage mail there: {}.",
		channel_mention,
		names.join(", ")
	)
}

/// Gets the permissions a user has in a channel of the passed-in guild.
///
/// Returns `None` if the channel doesn't exist, the bot can't see it, or it belongs to another guild.
pub async fn channel_permissions(
	http_client: &Client,
	guild_id: Id<GuildMarker>,
	channel_id: Id<ChannelMarker>,
	user_id: Id<UserMarker>,
) -> miette::Result<Option<Permissions>> {
	let member_future = http_client.guild_member(guild_id, user_id).into_future();
	let channel_data_future = http_client.channel(channel_id).into_future();
	let guild_roles_future = http_client.roles(guild_id).into_future();
	let (member, channel_data, guild_roles) = tokio::join!(member_future, channel_data_future, guild_roles_future);

	let channel_data = match channel_data {
		Ok(response) => response.model().await.into_diagnostic()?,
		Err(error) => {
			if let ErrorType::Response { status, .. } = error.kind() {
				if matches!(status.get(), 403 | 404) {
					return Ok(None);
				}
			}
			return Err(error).into_diagnostic();
		}
	};
	if channel_data.guild_id != Some(guild_id) {
		return Ok(None);
	}

	let member = member.into_diagnostic()?.model().await.into_diagnostic()?;
	let guild_roles = guild_roles.into_diagnostic()?.models().await.into_diagnostic()?;

	let channel_permission_overwrites = channel_data.permission_overwrites.unwrap_or_default();
	let (everyone_role_permissions, member_roles) = role_permissions(guild_id, &member, &guild_roles);
	let calculator = PermissionCalculator::new(guild_id, user_id, everyone_role_permissions, &member_roles);
	Ok(Some(calculator.in_channel(channel_data.kind, &channel_permission_overwrites)))
}

/// Gets the guild-level permissions a member has, accounting for guild ownership.
pub async fn guild_permissions(
	http_client: &Client,
	guild_id: Id<GuildMarker>,
	user_id: Id<UserMarker>,
) -> miette::Result<Permissions> {
	let member_future = http_client.guild_member(guild_id, user_id).into_future();
	let guild_future = http_client.guild(guild_id).into_future();
	let (member, guild) = tokio::join!(member_future, guild_future);

	let member = member.into_diagnostic()?.model().await.into_diagnostic()?;
	let guild = guild.into_diagnostic()?.model().await.into_diagnostic()?;

	let (everyone_role_permissions, member_roles) = role_permissions(guild_id, &member, &guild.roles);
	let calculator = PermissionCalculator::new(guild_id, user_id, everyone_role_permissions, &member_roles)
		.owner_id(guild.owner_id);
	Ok(calculator.root())
}

fn role_permissions(
	guild_id: Id<GuildMarker>,
	member: &Member,
	guild_roles: &[Role],
) -> (Permissions, Vec<(Id<RoleMarker>, Permissions)>) {
	let guild_everyone_role_id: Id<RoleMarker> = guild_id.cast();
	let role_permissions: HashMap<Id<RoleMarker>, Permissions> =
		guild_roles.iter().map(|role| (role.id, role.permissions)).collect();
	let everyone_role_permissions = role_permissions
		.get(&guild_everyone_role_id)
		.copied()
		.unwrap_or_else(Permissions::empty);
	let member_roles = member
		.roles
		.iter()
		.map(|role_id| {
			(
				*role_id,
				role_permissions
					.get(role_id)
					.copied()
					.unwrap_or_else(Permissions::empty),
			)
		})
		.collect();
	(everyone_role_permissions, member_roles)
}
