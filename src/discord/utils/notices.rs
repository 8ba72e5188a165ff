// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use twilight_http::request::channel::message::create_message::CreateMessage;
use twilight_mention::fmt::Mention;
use twilight_model::channel::message::AllowedMentions;
use twilight_model::channel::message::embed::{Embed, EmbedField};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, UserMarker};
use twilight_model::util::datetime::Timestamp;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource};
use twilight_validate::embed::{EMBED_TOTAL_LENGTH, EmbedValidationError, FIELD_COUNT, FIELD_VALUE_LENGTH};

pub const NOTICE_COLOR: u32 = 0xE74C3C;
pub const NEW_MAIL_TITLE: &str = "\u{1F4E7} New DM to Bot";
pub const SENDER_FIELD_NAME: &str = "__Message from:__";
pub const MESSAGE_FIELD_NAME: &str = "__Message__";
pub const ATTACHMENTS_FIELD_NAME: &str = "__Attachments__";
pub const STATUS_FIELD_NAME: &str = "Status";
pub const EMPTY_MESSAGE_TEXT: &str = "*(no text content)*";

pub const MAIL_SENT_REPLY: &str = "Your Mail was sent! Server mod will contact you soon";
pub const NOT_SET_UP_REPLY: &str = "Mod mail isn't set up yet, please try again later.";

pub const MISSING_ARGUMENT_DESCRIPTION: &str = "You are missing a required argument.";
pub const BAD_CHANNEL_DESCRIPTION: &str = "One of the channels you entered does not exist.";
pub const SAME_CHANNEL_DESCRIPTION: &str = "The open and resolved mail channels must be different.";

/// Contains data necessary to post a notice
#[derive(Clone, Debug, PartialEq)]
pub struct NoticeMessage {
	pub content: Option<String>,
	pub embeds: Vec<Embed>,
	pub allowed_mentions: AllowedMentions,
}

impl NoticeMessage {
	pub fn text(content: impl Into<String>) -> Self {
		Self {
			content: Some(content.into()),
			embeds: Vec::new(),
			allowed_mentions: AllowedMentions::default(),
		}
	}

	pub fn embed(embed: Embed) -> Self {
		Self {
			content: None,
			embeds: vec![embed],
			allowed_mentions: AllowedMentions::default(),
		}
	}

	/// Adds all of the notice data to a [CreateMessage] builder
	pub fn set_create_message_data<'a>(&'a self, mut create_message: CreateMessage<'a>) -> CreateMessage<'a> {
		if let Some(content) = &self.content {
			create_message = create_message.content(content);
		}
		create_message
			.embeds(&self.embeds)
			.allowed_mentions(Some(&self.allowed_mentions))
	}
}

/// The sender of a direct message, as shown on the notice
pub struct MailSender<'a> {
	pub id: Id<UserMarker>,
	pub name: &'a str,
}

/// Generates the notice posted to the mod mail channel for a new direct message
pub fn new_mail_notice(
	sender: MailSender<'_>,
	text: &str,
	attachment_urls: &[String],
	timestamp: Timestamp,
) -> Result<NoticeMessage, EmbedValidationError> {
	let text = if text.trim().is_empty() {
		EMPTY_MESSAGE_TEXT.to_string()
	} else {
		truncate_field_value(text)
	};
	let mut embed = EmbedBuilder::new()
		.title(NEW_MAIL_TITLE)
		.color(NOTICE_COLOR)
		.timestamp(timestamp)
		.field(EmbedFieldBuilder::new(
			SENDER_FIELD_NAME,
			format!("{} ({})", sender.name, sender.id.mention()),
		))
		.field(EmbedFieldBuilder::new(MESSAGE_FIELD_NAME, text));
	if !attachment_urls.is_empty() {
		embed = embed.field(EmbedFieldBuilder::new(
			ATTACHMENTS_FIELD_NAME,
			truncate_field_value(&attachment_urls.join("\n")),
		));
	}
	let embed = embed.validate()?.build();

	Ok(NoticeMessage {
		content: Some(format!("Message by: {}", sender.id.mention())),
		embeds: vec![embed],
		allowed_mentions: AllowedMentions::default(),
	})
}

/// Generates a repost of a ticket notice with a status line added to its history.
///
/// The oldest status lines are dropped when the history no longer fits in an embed.
pub fn notice_with_status(mut embed: Embed, status: &str) -> Result<NoticeMessage, EmbedValidationError> {
	embed.fields.push(EmbedField {
		inline: false,
		name: STATUS_FIELD_NAME.to_string(),
		value: truncate_field_value(status),
	});
	while embed.fields.len() > FIELD_COUNT || twilight_validate::embed::chars(&embed) > EMBED_TOTAL_LENGTH {
		let newest = embed.fields.len() - 1;
		let Some(oldest) = embed.fields[..newest]
			.iter()
			.position(|field| field.name == STATUS_FIELD_NAME)
		else {
			break;
		};
		embed.fields.remove(oldest);
	}
	twilight_validate::embed::embed(&embed)?;
	Ok(NoticeMessage::embed(embed))
}

/// Generates the notice sent when the setup command is used incorrectly
pub fn usage_notice(
	description: &str,
	command_prefix: &str,
	invoked_by: &str,
	invoker_avatar_url: &str,
) -> NoticeMessage {
	let mut footer = EmbedFooterBuilder::new(invoked_by);
	if let Ok(icon) = ImageSource::url(invoker_avatar_url) {
		footer = footer.icon_url(icon);
	}
	let embed = EmbedBuilder::new()
		.title("\u{274C} Oops!")
		.description(description)
		.color(NOTICE_COLOR)
		.field(EmbedFieldBuilder::new("\u{2754} Syntax", setup_syntax(command_prefix)))
		.footer(footer)
		.build();
	NoticeMessage::embed(embed)
}

pub fn setup_success_notice(open: Id<ChannelMarker>, resolved: Id<ChannelMarker>) -> NoticeMessage {
	let embed = EmbedBuilder::new()
		.title("Setup Successful")
		.description(format!(
			"Mail Channel: {}\nResolved Channel: {}",
			open.mention(),
			resolved.mention()
		))
		.color(NOTICE_COLOR)
		.build();
	NoticeMessage::embed(embed)
}

pub fn setup_syntax(command_prefix: &str) -> String {
	format!("`{}setup <open mail channel> <resolved mail channel>`", command_prefix)
}

pub fn help_text(command_prefix: &str) -> String {
	format!(
		"**Mod Mail**\n\
		Send me a direct message to reach the server staff. Your message is posted to the staff mail channel and I'll \
		confirm it was sent.\n\n\
		**For staff**\n\
		React with \u{2705} on a new mail to mark it resolved, or \u{274C} to cancel it. Both move it to the resolved \
		channel. React with \u{274C} on a resolved or cancelled mail to reopen it.\n\n\
		**Commands**\n\
		{setup} \u{2013} choose the open and resolved mail channels (requires Manage Server)\n\
		`{prefix}help` \u{2013} show this message",
		setup = setup_syntax(command_prefix),
		prefix = command_prefix,
	)
}

fn truncate_field_value(value: &str) -> String {
	if value.chars().count() <= FIELD_VALUE_LENGTH {
		return value.to_string();
	}
	let mut truncated: String = value.chars().take(FIELD_VALUE_LENGTH - 1).collect();
	truncated.push('\u{2026}');
	truncated
}

#[cfg(test)]
mod tests {
	use super::*;

	fn timestamp() -> Timestamp {
		Timestamp::from_secs(1_700_000_000).unwrap()
	}

	fn sender() -> MailSender<'static> {
		MailSender {
			id: Id::new(77),
			name: "wanderer",
		}
	}

	#[test]
	fn new_mail_notice_has_sender_and_text() {
		let notice = new_mail_notice(sender(), "hello staff", &[], timestamp()).unwrap();
		assert_eq!(notice.content.as_deref(), Some("Message by: <@77>"));
		let embed = &notice.embeds[0];
		assert_eq!(embed.title.as_deref(), Some(NEW_MAIL_TITLE));
		assert_eq!(embed.color, Some(NOTICE_COLOR));
		assert_eq!(embed.timestamp, Some(timestamp()));
		assert_eq!(embed.fields.len(), 2);
		assert_eq!(embed.fields[0].name, SENDER_FIELD_NAME);
		assert_eq!(embed.fields[0].value, "wanderer (<@77>)");
		assert!(!embed.fields[0].inline);
		assert_eq!(embed.fields[1].value, "hello staff");
		assert!(notice.allowed_mentions.users.is_empty());
	}

	#[test]
	fn empty_text_gets_placeholder_and_attachments_are_listed() {
		let urls = vec![String::from("https://cdn.example/a.png")];
		let notice = new_mail_notice(sender(), "  ", &urls, timestamp()).unwrap();
		let embed = &notice.embeds[0];
		assert_eq!(embed.fields[1].value, EMPTY_MESSAGE_TEXT);
		assert_eq!(embed.fields[2].name, ATTACHMENTS_FIELD_NAME);
		assert_eq!(embed.fields[2].value, "https://cdn.example/a.png");
	}

	#[test]
	fn long_text_is_truncated_to_field_limit() {
		let text = "a".repeat(3000);
		let notice = new_mail_notice(sender(), &text, &[], timestamp()).unwrap();
		let value = &notice.embeds[0].fields[1].value;
		assert_eq!(value.chars().count(), FIELD_VALUE_LENGTH);
		assert!(value.ends_with('\u{2026}'));
	}

	#[test]
	fn status_is_appended_after_existing_fields() {
		let notice = new_mail_notice(sender(), "hi", &[], timestamp()).unwrap();
		let resolved = notice_with_status(notice.embeds[0].clone(), "Resolved by mira").unwrap();
		let reopened = notice_with_status(resolved.embeds[0].clone(), "Reopened by kaz").unwrap();

		assert_eq!(resolved.content, None);
		let fields = &reopened.embeds[0].fields;
		assert_eq!(fields.len(), 4);
		assert_eq!(fields[2].name, STATUS_FIELD_NAME);
		assert_eq!(fields[2].value, "Resolved by mira");
		assert_eq!(fields[3].value, "Reopened by kaz");
		assert_eq!(reopened.embeds[0].title.as_deref(), Some(NEW_MAIL_TITLE));
	}

	#[test]
	fn usage_notice_shows_syntax_with_prefix() {
		let avatar = "https://cdn.discordapp.com/embed/avatars/2.png";
		let notice = usage_notice(MISSING_ARGUMENT_DESCRIPTION, "?", "admin", avatar);
		let embed = &notice.embeds[0];
		assert_eq!(embed.description.as_deref(), Some(MISSING_ARGUMENT_DESCRIPTION));
		assert_eq!(embed.fields[0].value, "`?setup <open mail channel> <resolved mail channel>`");
		let footer = embed.footer.as_ref().unwrap();
		assert_eq!(footer.text, "admin");
		assert_eq!(footer.icon_url.as_deref(), Some(avatar));
	}

	#[test]
	fn long_status_history_drops_oldest_entries() {
		let mut embed = new_mail_notice(sender(), "hi", &[], timestamp()).unwrap().embeds.remove(0);
		for transition in 1..=30 {
			let notice = notice_with_status(embed, &format!("Transition {} by mira", transition)).unwrap();
			embed = notice.embeds.into_iter().next().unwrap();
		}

		assert_eq!(embed.fields.len(), FIELD_COUNT);
		assert_eq!(embed.fields[0].name, SENDER_FIELD_NAME);
		assert_eq!(embed.fields[1].name, MESSAGE_FIELD_NAME);
		let statuses: Vec<&str> = embed.fields[2..].iter().map(|field| field.value.as_str()).collect();
		assert_eq!(statuses.first(), Some(&"Transition 8 by mira"));
		assert_eq!(statuses.last(), Some(&"Transition 30 by mira"));
	}

	#[test]
	fn status_history_stays_within_total_embed_length() {
		let text = "a".repeat(FIELD_VALUE_LENGTH);
		let urls: Vec<String> = (0..20)
			.map(|index| format!("https://cdn.discordapp.com/attachments/30/{}/{}.png", index, "b".repeat(30)))
			.collect();
		let mut embed = new_mail_notice(sender(), &text, &urls, timestamp()).unwrap().embeds.remove(0);
		let long_name = "n".repeat(200);
		for _ in 0..22 {
			let notice = notice_with_status(embed, &format!("Resolved by {}", long_name)).unwrap();
			embed = notice.embeds.into_iter().next().unwrap();
		}
		assert!(twilight_validate::embed::chars(&embed) <= EMBED_TOTAL_LENGTH);
		assert_eq!(embed.fields[1].value, text);
	}

	#[test]
	fn setup_success_mentions_both_channels() {
		let notice = setup_success_notice(Id::new(10), Id::new(20));
		assert_eq!(
			notice.embeds[0].description.as_deref(),
			Some("Mail Channel: <#10>\nResolved Channel: <#20>")
		);
	}
}
