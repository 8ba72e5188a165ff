// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relays direct messages sent to the bot into a staff mail channel, where staff move each mail between the open and
//! resolved channels by reacting to it.

pub mod channels;
pub mod config;
pub mod discord;
pub mod model;
