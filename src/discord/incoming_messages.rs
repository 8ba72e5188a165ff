// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::handler::{IncomingMessage, MailHandler};
use super::utils::notices::{MAIL_SENT_REPLY, MailSender, NOT_SET_UP_REPLY, NoticeMessage, new_mail_notice};
use super::utils::timestamp::timestamp_now;
use crate::model::{MailReaction, TicketQueue};
use miette::IntoDiagnostic;

/// Posts a direct message to the mod mail channel as a new ticket and lets the sender know it arrived.
pub async fn relay_direct_message(handler: &MailHandler, message: &IncomingMessage) -> miette::Result<()> {
	let platform = &handler.platform;

	let Some(channels) = handler.channels.get().await else {
		tracing::warn!(user_id = %message.author.id, "Received mail before mod mail was set up");
		platform
			.send_message(message.channel_id, &NoticeMessage::text(NOT_SET_UP_REPLY))
			.await?;
		return Ok(());
	};

	let sender = MailSender {
		id: message.author.id,
		name: &message.author.name,
	};
	let notice = new_mail_notice(
		sender,
		&message.content,
		&message.attachment_urls,
		timestamp_now().into_diagnostic()?,
	)
	.into_diagnostic()?;

	let notice_id = platform.send_message(channels.open, &notice).await?;
	for reaction in TicketQueue::Open.seed_reactions() {
		platform.add_reaction(channels.open, notice_id, *reaction).await?;
	}

	platform
		.add_reaction(message.channel_id, message.id, MailReaction::CheckMark)
		.await?;
	platform
		.send_message(message.channel_id, &NoticeMessage::text(MAIL_SENT_REPLY))
		.await?;

	tracing::info!(user_id = %message.author.id, notice_id = %notice_id, "Relayed new mail");
	Ok(())
}
