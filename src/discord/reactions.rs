// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::handler::{MailHandler, ReactionEvent};
use super::utils::notices::{NEW_MAIL_TITLE, notice_with_status};
use crate::model::{MailReaction, TicketTransition};
use miette::IntoDiagnostic;

/// Moves a ticket notice between the mail channels when staff react to it.
///
/// The notice is reposted with a status line in the destination channel, reseeded with that channel's reactions, and
/// the original is deleted.
pub async fn handle_reaction_add(handler: &MailHandler, reaction: &ReactionEvent) -> miette::Result<()> {
	let platform = &handler.platform;

	if reaction.user_id == platform.bot_user_id() {
		return Ok(());
	}
	let Some(channels) = handler.channels.get().await else {
		return Ok(());
	};
	let Some(queue) = channels.queue_of(reaction.channel_id) else {
		return Ok(());
	};
	let Some(mail_reaction) = MailReaction::from_emoji(&reaction.emoji) else {
		return Ok(());
	};
	let Some(transition) = TicketTransition::for_reaction(queue, mail_reaction) else {
		tracing::debug!(?queue, reaction = %mail_reaction, "Reaction has no transition in this channel");
		return Ok(());
	};

	let Some(notice) = platform.fetch_message(reaction.channel_id, reaction.message_id).await? else {
		tracing::debug!(message_id = %reaction.message_id, "Reacted notice is already gone");
		return Ok(());
	};
	if notice.author_id != platform.bot_user_id() {
		return Ok(());
	}
	if notice.reactions_from_others(mail_reaction) == 0 {
		tracing::debug!(message_id = %reaction.message_id, "Reaction is no longer on the notice");
		return Ok(());
	}
	let Some(embed) = notice.embeds.into_iter().next() else {
		return Ok(());
	};
	if embed.title.as_deref() != Some(NEW_MAIL_TITLE) {
		tracing::debug!(message_id = %reaction.message_id, "Reacted bot message is not a mail notice");
		return Ok(());
	}

	let staff_name = match &reaction.member_name {
		Some(name) => name.clone(),
		None => platform.display_name(reaction.guild_id, reaction.user_id).await?,
	};
	let repost = notice_with_status(embed, &transition.status_line(&staff_name)).into_diagnostic()?;

	let destination = transition.destination();
	let destination_channel = channels.channel_of(destination);
	let repost_id = platform.send_message(destination_channel, &repost).await?;
	for seed in destination.seed_reactions() {
		platform.add_reaction(destination_channel, repost_id, *seed).await?;
	}
	platform
		.delete_message(reaction.channel_id, reaction.message_id)
		.await?;

	tracing::info!(
		?transition,
		staff = %staff_name,
		from = %reaction.message_id,
		to = %repost_id,
		"Moved mail ticket"
	);
	Ok(())
}
