// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::{Diagnostic, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use twilight_model::channel::message::EmojiReactionType;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// A reaction the bot understands on a ticket notice
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MailReaction {
	CheckMark,
	CrossMark,
}

impl MailReaction {
	pub const fn emoji(self) -> &'static str {
		match self {
			Self::CheckMark => "\u{2705}",
			Self::CrossMark => "\u{274C}",
		}
	}

	/// Matches a unicode emoji name. Custom emoji never match.
	pub fn from_name(name: &str) -> Option<Self> {
		let name = name.trim_end_matches(VARIATION_SELECTOR_16);
		[Self::CheckMark, Self::CrossMark]
			.into_iter()
			.find(|reaction| reaction.emoji() == name)
	}

	pub fn from_emoji(emoji: &EmojiReactionType) -> Option<Self> {
		match emoji {
			EmojiReactionType::Unicode { name } => Self::from_name(name),
			EmojiReactionType::Custom { .. } => None,
		}
	}
}

impl fmt::Display for MailReaction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.emoji())
	}
}

/// The channel a ticket notice currently lives in
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketQueue {
	Open,
	Resolved,
}

impl TicketQueue {
	/// Reactions the bot adds to a notice posted in this queue, in posting order.
	pub fn seed_reactions(self) -> &'static [MailReaction] {
		match self {
			Self::Open => &[MailReaction::CheckMark, MailReaction::CrossMark],
			Self::Resolved => &[MailReaction::CrossMark],
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketTransition {
	Resolve,
	Cancel,
	Reopen,
}

impl TicketTransition {
	/// The transition table: which reaction in which queue moves a ticket where.
	pub fn for_reaction(queue: TicketQueue, reaction: MailReaction) -> Option<Self> {
		match (queue, reaction) {
			(TicketQueue::Open, MailReaction::CheckMark) => Some(Self::Resolve),
			(TicketQueue::Open, MailReaction::CrossMark) => Some(Self::Cancel),
			(TicketQueue::Resolved, MailReaction::CrossMark) => Some(Self::Reopen),
			(TicketQueue::Resolved, MailReaction::CheckMark) => None,
		}
	}

	pub fn destination(self) -> TicketQueue {
		match self {
			Self::Resolve | Self::Cancel => TicketQueue::Resolved,
			Self::Reopen => TicketQueue::Open,
		}
	}

	pub fn status_line(self, staff_name: &str) -> String {
		let verb = match self {
			Self::Resolve => "Resolved",
			Self::Cancel => "Cancelled",
			Self::Reopen => "Reopened",
		};
		format!("{} by {}", verb, staff_name)
	}
}

/// The two channels mod mail is posted to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MailChannels {
	pub open: Id<ChannelMarker>,
	pub resolved: Id<ChannelMarker>,
}

impl MailChannels {
	pub fn new(open: Id<ChannelMarker>, resolved: Id<ChannelMarker>) -> Result<Self, SameChannelError> {
		if open == resolved {
			return Err(SameChannelError(open));
		}
		Ok(Self { open, resolved })
	}

	pub fn queue_of(&self, channel_id: Id<ChannelMarker>) -> Option<TicketQueue> {
		if channel_id == self.open {
			Some(TicketQueue::Open)
		} else if channel_id == self.resolved {
			Some(TicketQueue::Resolved)
		} else {
			None
		}
	}

	pub fn channel_of(&self, queue: TicketQueue) -> Id<ChannelMarker> {
		match queue {
			TicketQueue::Open => self.open,
			TicketQueue::Resolved => self.resolved,
		}
	}
}

#[derive(Debug, Diagnostic)]
pub struct SameChannelError(pub Id<ChannelMarker>);

impl fmt::Display for SameChannelError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "channel {} cannot be both the open and resolved mail channel", self.0)
	}
}

impl std::error::Error for SameChannelError {}

/// On-disk shape of the mail channel configuration
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChannelsFile {
	pub open: u64,
	pub resolved: u64,
}

impl From<MailChannels> for ChannelsFile {
	fn from(channels: MailChannels) -> Self {
		Self {
			open: channels.open.get(),
			resolved: channels.resolved.get(),
		}
	}
}

impl TryFrom<ChannelsFile> for MailChannels {
	type Error = miette::Report;

	fn try_from(file: ChannelsFile) -> miette::Result<Self> {
		let (Some(open), Some(resolved)) = (Id::new_checked(file.open), Id::new_checked(file.resolved)) else {
			bail!("Channel IDs must be nonzero: {:?}", file);
		};
		Ok(Self::new(open, resolved)?)
	}
}
