// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod client;
pub mod commands;
mod connection;
pub mod handler;
mod incoming_messages;
pub mod platform;
mod reactions;
pub mod utils;

pub use client::DiscordPlatform;
pub use connection::{gateway_intents, run_bot, set_up_client};
pub use handler::{IncomingMessage, MailHandler, MessageAuthor, ReactionEvent};
pub use platform::{MailPlatform, PostedMessage, ReactionTally};
