//! JSON persistence for favourites and settings.
//!
//! Both files live in the data directory. Loading is tolerant: a missing,
//! corrupt or mistyped file loads as the empty/default value and the next
//! save overwrites it.

mod error;
mod favourites;
mod settings;

use std::path::Path;

use serde::Serialize;

pub use error::StoreError;
pub use favourites::FavouriteStore;
pub use settings::{DEFAULT_REFRESH_SECS, Settings, SettingsStore};

/// Write `value` as pretty JSON, creating parent directories.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            message: format!("failed to create data directory: {}", e),
        })?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize {
        message: e.to_string(),
    })?;

    std::fs::write(path, json).map_err(|e| StoreError::Io {
        message: format!("failed to write {}: {}", path.display(), e),
    })
}
