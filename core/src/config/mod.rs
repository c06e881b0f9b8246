//! Settings storage
//!
//! The router only reads trigger flags; the settings UI and the `vol` command
//! write through a [`ConfigStore`]. [`FileConfigStore`] persists the document
//! with confy (TOML), [`MemoryConfigStore`] keeps it in memory only.

mod paths;

pub use paths::{ASSET_DIR_NAME, resolve_asset_dir};

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use erfx_types::{Settings, TriggerConfig};

/// Application name used for the confy config location
pub const APP_NAME: &str = "erfx";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to persist settings: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("volume {0} is outside 0.0 - 1.0")]
    InvalidVolume(f32),
}

/// Snapshot access to the current settings.
pub trait ConfigStore: Send + Sync {
    /// Current settings snapshot
    fn settings(&self) -> Settings;

    /// Current trigger flags
    fn triggers(&self) -> TriggerConfig {
        self.settings().triggers
    }

    /// Replace the whole document (settings UI). Persisted by file-backed stores.
    fn update(&self, settings: Settings) -> Result<(), ConfigError>;

    /// Edit the current document in place.
    ///
    /// The store stays locked from read to write, so concurrent edits of
    /// different fields never overwrite each other.
    fn modify(&self, edit: &mut dyn FnMut(&mut Settings)) -> Result<(), ConfigError>;

    /// Store a new volume (0.0 - 1.0). Persisted by file-backed stores.
    fn set_volume(&self, volume: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::InvalidVolume(volume));
        }
        self.modify(&mut |settings| settings.volume = volume)
    }
}

fn read(lock: &RwLock<Settings>) -> RwLockReadGuard<'_, Settings> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write(lock: &RwLock<Settings>) -> RwLockWriteGuard<'_, Settings> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Settings held in memory only
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    settings: RwLock<Settings>,
}

impl MemoryConfigStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    pub fn with_triggers(triggers: TriggerConfig) -> Self {
        Self::new(Settings {
            triggers,
            ..Default::default()
        })
    }
}

impl ConfigStore for MemoryConfigStore {
    fn settings(&self) -> Settings {
        read(&self.settings).clone()
    }

    fn update(&self, settings: Settings) -> Result<(), ConfigError> {
        *write(&self.settings) = settings;
        Ok(())
    }

    fn modify(&self, edit: &mut dyn FnMut(&mut Settings)) -> Result<(), ConfigError> {
        edit(&mut write(&self.settings));
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Location {
    /// Platform config dir, resolved by confy
    AppDefault,
    Path(PathBuf),
}

/// Settings persisted to a TOML file via confy.
#[derive(Debug)]
pub struct FileConfigStore {
    location: Location,
    settings: RwLock<Settings>,
}

impl FileConfigStore {
    /// Load from the platform config directory (`<config>/erfx/default-config.toml`).
    ///
    /// A missing file is created with defaults; an unreadable one falls back to
    /// defaults without overwriting it.
    pub fn open_default() -> Self {
        let settings = confy::load(APP_NAME, None).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load settings, using defaults");
            Settings::default()
        });
        if let Ok(path) = confy::get_configuration_file_path(APP_NAME, None) {
            tracing::info!(path = %path.display(), "Settings loaded");
        }
        Self {
            location: Location::AppDefault,
            settings: RwLock::new(settings),
        }
    }

    /// Load from an explicit file path.
    pub fn open_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = confy::load_path(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
            Settings::default()
        });
        tracing::info!(path = %path.display(), "Settings loaded");
        Self {
            location: Location::Path(path),
            settings: RwLock::new(settings),
        }
    }

    /// File path when opened with [`FileConfigStore::open_path`]
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::AppDefault => None,
            Location::Path(p) => Some(p),
        }
    }

    fn persist(&self, settings: &Settings) -> Result<(), ConfigError> {
        match &self.location {
            Location::AppDefault => confy::store(APP_NAME, None, settings)?,
            Location::Path(path) => confy::store_path(path, settings)?,
        }
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn settings(&self) -> Settings {
        read(&self.settings).clone()
    }

    fn update(&self, settings: Settings) -> Result<(), ConfigError> {
        let mut current = write(&self.settings);
        // Persist first so a failed write leaves the in-memory state untouched
        self.persist(&settings)?;
        *current = settings;
        Ok(())
    }

    fn modify(&self, edit: &mut dyn FnMut(&mut Settings)) -> Result<(), ConfigError> {
        let mut current = write(&self.settings);
        let mut settings = current.clone();
        edit(&mut settings);
        self.persist(&settings)?;
        *current = settings;
        Ok(())
    }
}
