//! Key/value save store backed by one JSON file per key.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_state::Session;

pub const GAME_DATA_KEY: &str = "gameData";
pub const SETTINGS_KEY: &str = "gameSettings";

/// Saves written before this build timestamp are discarded.
pub const EXPIRED_TIMESTAMP: u64 = 1_646_115_265;

#[derive(Debug, Error)]
pub enum SaveStoreError {
    #[error("failed to access save store entry {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize save store entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, SaveStoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SaveStoreError::Io { path, source }),
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), SaveStoreError> {
        fs::create_dir_all(&self.root).map_err(|source| SaveStoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| SaveStoreError::Io { path, source })
    }

    pub fn remove_item(&self, key: &str) -> Result<(), SaveStoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SaveStoreError::Io { path, source }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub state: Session,
    pub version: String,
    pub version_timestamp: u64,
    /// Opaque engine save blob.
    pub game: String,
}

impl SaveData {
    pub fn is_expired(&self) -> bool {
        self.version_timestamp < EXPIRED_TIMESTAMP
    }
}

/// The saved run, if one exists and is still loadable.
pub fn load_game(store: &SaveStore) -> Option<SaveData> {
    let raw = match store.get_item(GAME_DATA_KEY) {
        Ok(raw) => raw?,
        Err(err) => {
            tracing::warn!(target: "factors::persist", error = %err, "save.read_failed");
            return None;
        }
    };
    let save: SaveData = match serde_json::from_str(&raw) {
        Ok(save) => save,
        Err(err) => {
            tracing::warn!(target: "factors::persist", error = %err, "save.corrupt");
            return None;
        }
    };
    if save.is_expired() {
        tracing::info!(
            target: "factors::persist",
            version_timestamp = save.version_timestamp,
            "save.expired"
        );
        return None;
    }
    Some(save)
}

pub fn save_game(store: &SaveStore, save: &SaveData) -> Result<(), SaveStoreError> {
    let json = serde_json::to_string(save)?;
    store.set_item(GAME_DATA_KEY, &json)?;
    tracing::debug!(target: "factors::persist", bytes = json.len(), "save.written");
    Ok(())
}

pub fn clear_save(store: &SaveStore) -> Result<(), SaveStoreError> {
    store.remove_item(GAME_DATA_KEY)
}

pub fn has_save(store: &SaveStore) -> bool {
    load_game(store).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub hide_help: bool,
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hide_help: false,
            sound: true,
        }
    }
}

pub fn load_settings(store: &SaveStore) -> Settings {
    store
        .get_item(SETTINGS_KEY)
        .ok()
        .flatten()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save_settings(store: &SaveStore, settings: &Settings) -> Result<(), SaveStoreError> {
    store.set_item(SETTINGS_KEY, &serde_json::to_string(settings)?)
}
