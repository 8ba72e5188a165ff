// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::{ChannelsFile, MailChannels};
use miette::IntoDiagnostic;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the configured mail channels and keeps the channel file in sync with them.
///
/// Cloning is cheap; all clones share the same state.
#[derive(Clone, Debug)]
pub struct ChannelStore {
	path: PathBuf,
	channels: Arc<RwLock<Option<MailChannels>>>,
}

impl ChannelStore {
	/// Loads the channel file. Problems with the file are logged and leave the store unconfigured.
	pub async fn load(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let channels = match read_channels_file(&path).await {
			Ok(Some(channels)) => {
				tracing::info!(open = %channels.open, resolved = %channels.resolved, "Loaded mail channels");
				Some(channels)
			}
			Ok(None) => {
				tracing::info!(path = %path.display(), "No channel file found; mod mail needs to be set up");
				None
			}
			Err(error) => {
				tracing::error!(source = ?error, path = %path.display(), "Failed to load the channel file");
				None
			}
		};
		Self {
			path,
			channels: Arc::new(RwLock::new(channels)),
		}
	}

	pub async fn get(&self) -> Option<MailChannels> {
		*self.channels.read().await
	}

	/// Writes new channels to the channel file and makes them current.
	///
	/// The file is replaced by renaming a fully written temporary file over it, so an interrupted write leaves the
	/// previous channels in place.
	pub async fn set(&self, channels: MailChannels) -> miette::Result<()> {
		let mut current = self.channels.write().await;
		let contents = serde_json::to_vec(&ChannelsFile::from(channels)).into_diagnostic()?;
		let temp_path = temp_path_for(&self.path);
		tokio::fs::write(&temp_path, contents).await.into_diagnostic()?;
		tokio::fs::rename(&temp_path, &self.path).await.into_diagnostic()?;
		*current = Some(channels);
		Ok(())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

fn temp_path_for(path: &Path) -> PathBuf {
	let mut temp_path = path.as_os_str().to_owned();
	temp_path.push(".tmp");
	PathBuf::from(temp_path)
}

async fn read_channels_file(path: &Path) -> miette::Result<Option<MailChannels>> {
	let contents = match tokio::fs::read(path).await {
		Ok(contents) => contents,
		Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
		Err(error) => return Err(error).into_diagnostic(),
	};
	let file: ChannelsFile = serde_json::from_slice(&contents).into_diagnostic()?;
	Ok(Some(MailChannels::try_from(file)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use twilight_model::id::Id;

	#[tokio::test]
	async fn missing_file_is_unconfigured() {
		let dir = tempfile::tempdir().unwrap();
		let store = ChannelStore::load(dir.path().join("channels.json")).await;
		assert_eq!(store.get().await, None);
	}

	#[tokio::test]
	async fn set_persists_and_reloads() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("channels.json");
		let channels = MailChannels::new(Id::new(111), Id::new(222)).unwrap();

		let store = ChannelStore::load(&path).await;
		store.set(channels).await.unwrap();
		assert_eq!(store.get().await, Some(channels));

		let written: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
		assert_eq!(written, serde_json::json!({ "open": 111, "resolved": 222 }));

		let reloaded = ChannelStore::load(&path).await;
		assert_eq!(reloaded.get().await, Some(channels));
	}

	#[tokio::test]
	async fn clones_share_state() {
		let dir = tempfile::tempdir().unwrap();
		let store = ChannelStore::load(dir.path().join("channels.json")).await;
		let other = store.clone();
		let channels = MailChannels::new(Id::new(1), Id::new(2)).unwrap();
		store.set(channels).await.unwrap();
		assert_eq!(other.get().await, Some(channels));
	}

	#[tokio::test]
	async fn missing_key_is_unconfigured() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("channels.json");
		std::fs::write(&path, r#"{"open": 123}"#).unwrap();
		let store = ChannelStore::load(&path).await;
		assert_eq!(store.get().await, None);
	}

	#[tokio::test]
	async fn garbage_is_unconfigured() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("channels.json");
		std::fs::write(&path, "not json").unwrap();
		let store = ChannelStore::load(&path).await;
		assert_eq!(store.get().await, None);
	}

	#[tokio::test]
	async fn set_replaces_existing_file_without_leftovers() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("channels.json");
		std::fs::write(&path, r#"{"open": 5, "resolved": 6}"#).unwrap();
		let store = ChannelStore::load(&path).await;

		let channels = MailChannels::new(Id::new(7), Id::new(8)).unwrap();
		store.set(channels).await.unwrap();

		assert_eq!(ChannelStore::load(&path).await.get().await, Some(channels));
		assert!(!temp_path_for(&path).exists());
	}

	#[tokio::test]
	async fn interrupted_write_leaves_channel_file_intact() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("channels.json");
		std::fs::write(&path, r#"{"open": 5, "resolved": 6}"#).unwrap();
		let previous = MailChannels::new(Id::new(5), Id::new(6)).unwrap();
		let store = ChannelStore::load(&path).await;

		// A directory in the temporary file's place makes the write fail before the rename.
		std::fs::create_dir(temp_path_for(&path)).unwrap();
		let channels = MailChannels::new(Id::new(7), Id::new(8)).unwrap();
		assert!(store.set(channels).await.is_err());

		assert_eq!(store.get().await, Some(previous));
		assert_eq!(ChannelStore::load(&path).await.get().await, Some(previous));
	}

	#[tokio::test]
	async fn failed_write_keeps_previous_channels() {
		let dir = tempfile::tempdir().unwrap();
		let store = ChannelStore::load(dir.path().join("missing_dir").join("channels.json")).await;
		let channels = MailChannels::new(Id::new(1), Id::new(2)).unwrap();
		assert!(store.set(channels).await.is_err());
		assert_eq!(store.get().await, None);
	}
}
