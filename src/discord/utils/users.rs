// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Diagnostic;
use std::fmt;
use twilight_http::client::Client;
use twilight_http::error::Error;
use twilight_http::response::DeserializeBodyError;
use twilight_model::guild::Member;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};
use twilight_model::user::User;

/// Error data for looking up a user's display name
#[derive(Debug, Diagnostic)]
pub enum DisplayNameError {
	Http(Error),
	Deserialize(DeserializeBodyError),
}

impl From<Error> for DisplayNameError {
	fn from(error: Error) -> Self {
		Self::Http(error)
	}
}

impl From<DeserializeBodyError> for DisplayNameError {
	fn from(error: DeserializeBodyError) -> Self {
		Self::Deserialize(error)
	}
}

impl std::error::Error for DisplayNameError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Http(error) => Some(error),
			Self::Deserialize(error) => Some(error),
		}
	}
}

impl fmt::Display for DisplayNameError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Http(error) => write!(f, "HTTP error: {}", error),
			Self::Deserialize(error) => write!(f, "deserialization error: {}", error),
		}
	}
}

/// The name shown for a guild member: server nickname, then global name, then username
pub fn member_display_name(member: &Member) -> String {
	member.nick.clone().unwrap_or_else(|| user_display_name(&member.user))
}

pub fn user_display_name(user: &User) -> String {
	user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

/// The user's avatar as a PNG, or Discord's default avatar for users who haven't set one
pub fn avatar_url(user: &User) -> String {
	match &user.avatar {
		Some(hash) => format!("https://cdn.discordapp.com/avatars/{}/{}.png?size=1024", user.id, hash),
		None => {
			let index = if user.discriminator == 0 {
				(user.id.get() >> 22) % 6
			} else {
				u64::from(user.discriminator % 5)
			};
			format!("https://cdn.discordapp.com/embed/avatars/{}.png", index)
		}
	}
}

/// Gets a display name from guild member data, falling back to the user data if the guild member data is not available
pub async fn get_display_name(
	http_client: &Client,
	guild_id: Option<Id<GuildMarker>>,
	user_id: Id<UserMarker>,
) -> Result<String, DisplayNameError> {
	if let Some(guild_id) = guild_id {
		if let Ok(name) = get_member_display_name(http_client, guild_id, user_id).await {
			return Ok(name);
		}
	}
	get_user_display_name(http_client, user_id).await
}

async fn get_member_display_name(
	http_client: &Client,
	guild_id: Id<GuildMarker>,
	user_id: Id<UserMarker>,
) -> Result<String, DisplayNameError> {
	let member_response = http_client.guild_member(guild_id, user_id).await?;
	let member = member_response.model().await?;
	Ok(member_display_name(&member))
}

async fn get_user_display_name(http_client: &Client, user_id: Id<UserMarker>) -> Result<String, DisplayNameError> {
	let user_response = http_client.user(user_id).await?;
	let user = user_response.model().await?;
	Ok(user_display_name(&user))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{Value, json};

	fn user_json(global_name: Option<&str>, avatar: Option<&str>) -> Value {
		json!({
			"id": "175928847299117063",
			"username": "traveler",
			"global_name": global_name,
			"discriminator": "0",
			"avatar": avatar,
		})
	}

	fn member(nick: Option<&str>, global_name: Option<&str>) -> Member {
		serde_json::from_value(json!({
			"deaf": false,
			"mute": false,
			"flags": 0,
			"roles": [],
			"nick": nick,
			"user": user_json(global_name, None),
		}))
		.unwrap()
	}

	#[test]
	fn member_name_prefers_nick_then_global_name_then_username() {
		assert_eq!(member_display_name(&member(Some("Aether"), Some("Sky Traveler"))), "Aether");
		assert_eq!(member_display_name(&member(None, Some("Sky Traveler"))), "Sky Traveler");
		assert_eq!(member_display_name(&member(None, None)), "traveler");
	}

	#[test]
	fn user_name_prefers_global_name() {
		let user: User = serde_json::from_value(user_json(Some("Sky Traveler"), None)).unwrap();
		assert_eq!(user_display_name(&user), "Sky Traveler");
		let user: User = serde_json::from_value(user_json(None, None)).unwrap();
		assert_eq!(user_display_name(&user), "traveler");
	}

	#[test]
	fn avatar_urls() {
		let hash = "a1b2c3d4e5f60718293a4b5c6d7e8f90";
		let user: User = serde_json::from_value(user_json(None, Some(hash))).unwrap();
		assert_eq!(
			avatar_url(&user),
			format!("https://cdn.discordapp.com/avatars/175928847299117063/{}.png?size=1024", hash)
		);

		let user: User = serde_json::from_value(user_json(None, None)).unwrap();
		let index = (175928847299117063_u64 >> 22) % 6;
		assert_eq!(
			avatar_url(&user),
			format!("https://cdn.discordapp.com/embed/avatars/{}.png", index)
		);
	}
}
