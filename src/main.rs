// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use clap::Parser;
use mod_mail::channels::ChannelStore;
use mod_mail::config::parse_config;
use mod_mail::discord::{DiscordPlatform, MailHandler, run_bot, set_up_client};
use std::path::PathBuf;
use std::sync::Arc;

/// Mod mail bot: relays direct messages to a staff channel.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
	/// Path to the KDL configuration file
	#[arg(short, long, default_value = "config.kdl")]
	config: PathBuf,
	/// Increase log verbosity (-v for debug, -vv for trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
	let args = Args::parse();

	let level = match args.verbose {
		0 => tracing::Level::INFO,
		1 => tracing::Level::DEBUG,
		_ => tracing::Level::TRACE,
	};
	tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

	let config = parse_config(&args.config).await?;
	let channels = ChannelStore::load(&config.channels_file).await;

	let http_client = set_up_client(&config);
	let platform = DiscordPlatform::new(Arc::clone(&http_client)).await?;
	let handler = MailHandler::new(Arc::new(platform), channels, config.command_prefix.clone());

	tokio::select! {
		result = run_bot(&config, handler) => result?,
		_ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
	}

	Ok(())
}
