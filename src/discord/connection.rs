// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::handler::{IncomingMessage, MailHandler, ReactionEvent};
use crate::config::ConfigDocument;
use std::sync::Arc;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt};
use twilight_http::client::Client;
use twilight_model::gateway::event::Event;

pub fn set_up_client(config: &ConfigDocument) -> Arc<Client> {
	Arc::new(Client::new(config.discord_token.clone()))
}

pub fn gateway_intents() -> Intents {
	Intents::GUILDS
		| Intents::GUILD_MESSAGES
		| Intents::GUILD_MESSAGE_REACTIONS
		| Intents::DIRECT_MESSAGES
		| Intents::MESSAGE_CONTENT
}

/// Runs the gateway connection until the shard closes, handing each relevant event to its own task.
pub async fn run_bot(config: &ConfigDocument, handler: MailHandler) -> miette::Result<()> {
	let mut shard = Shard::new(ShardId::ONE, config.discord_token.clone(), gateway_intents());
	let wanted_events = EventTypeFlags::READY | EventTypeFlags::MESSAGE_CREATE | EventTypeFlags::REACTION_ADD;

	while let Some(event) = shard.next_event(wanted_events).await {
		let event = match event {
			Ok(event) => event,
			Err(error) => {
				tracing::warn!(source = ?error, "error receiving event");
				continue;
			}
		};

		tokio::spawn(handle_event(event, handler.clone()));
	}

	Ok(())
}

async fn handle_event(event: Event, handler: MailHandler) {
	let event_result = handle_event_route(event, &handler).await;
	if let Err(error) = event_result {
		tracing::error!(source = ?error, "An error occurred handling a gateway event");
	}
}

async fn handle_event_route(event: Event, handler: &MailHandler) -> miette::Result<()> {
	tracing::trace!("Incoming gateway message: {:?}", event);
	match event {
		Event::MessageCreate(message) => {
			handler.handle_message(&IncomingMessage::from(&message.0)).await?;
		}
		Event::ReactionAdd(reaction) => {
			handler.handle_reaction(&ReactionEvent::from(&reaction.0)).await?;
		}
		Event::Ready(_) => {
			tracing::info!("Discord gateway is ready");
		}
		_ => (),
	}
	Ok(())
}
