// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::handler::{IncomingMessage, MailHandler};
use crate::discord::utils::notices::{NoticeMessage, help_text};

pub async fn handle_command(handler: &MailHandler, message: &IncomingMessage) -> miette::Result<()> {
	let help = NoticeMessage::text(help_text(&handler.command_prefix));
	handler.platform.send_message(message.channel_id, &help).await?;
	Ok(())
}
