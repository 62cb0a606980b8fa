//! Ordered favourites file.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{StoreError, write_json};
use crate::domain::Favourite;

/// File name inside the data directory.
const FILE_NAME: &str = "favourites.json";

/// Favourites persisted as a JSON array, in the order they were added.
#[derive(Debug, Clone)]
pub struct FavouriteStore {
    path: PathBuf,
}

impl FavouriteStore {
    /// Store backed by `favourites.json` in `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(FILE_NAME))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load all favourites.
    ///
    /// A missing file, invalid JSON or a value that is not an array of
    /// favourites all load as an empty list.
    pub fn load(&self) -> Vec<Favourite> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no favourites file");
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(favourites) => favourites,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable favourites");
                Vec::new()
            }
        }
    }

    pub fn save(&self, favourites: &[Favourite]) -> Result<(), StoreError> {
        write_json(&self.path, favourites)
    }

    /// Append a favourite unless one with the same stop, line and
    /// destination is already saved.
    ///
    /// Returns whether it was added.
    pub fn add(&self, favourite: Favourite) -> Result<bool, StoreError> {
        let mut favourites = self.load();
        if favourites.iter().any(|f| f.same_target(&favourite)) {
            return Ok(false);
        }
        favourites.push(favourite);
        self.save(&favourites)?;
        Ok(true)
    }

    /// Remove every favourite with the same stop, line and destination.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, favourite: &Favourite) -> Result<bool, StoreError> {
        let mut favourites = self.load();
        let before = favourites.len();
        favourites.retain(|f| !f.same_target(favourite));
        if favourites.len() == before {
            return Ok(false);
        }
        self.save(&favourites)?;
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn auber(direction: &str, destination: &str) -> Favourite {
        Favourite::new("50980", "Auber", "C01742", "A")
            .with_colors("E2231A", "FFFFFF")
            .with_direction(direction, destination)
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = FavouriteStore::new("/nonexistent/path/favourites.json");
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_or_mistyped_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = FavouriteStore::in_dir(dir.path());

        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());

        std::fs::write(store.path(), r#"{"stop_area_id": "1"}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn add_keeps_order_and_persists() {
        let dir = tempdir().unwrap();
        let store = FavouriteStore::in_dir(dir.path());

        assert!(store.add(auber("1", "Saint-Germain")).unwrap());
        assert!(store.add(auber("2", "Nanterre")).unwrap());

        let reopened = FavouriteStore::in_dir(dir.path());
        let loaded = reopened.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].destination_name, "Saint-Germain");
        assert_eq!(loaded[1].destination_name, "Nanterre");
        assert_eq!(loaded[0].line_color, "E2231A");
    }

    #[test]
    fn duplicate_target_is_ignored() {
        let dir = tempdir().unwrap();
        let store = FavouriteStore::in_dir(dir.path());

        assert!(store.add(auber("1", "Saint-Germain")).unwrap());
        // Same stop, line and destination; direction is not part of identity.
        assert!(!store.add(auber("2", "Saint-Germain")).unwrap());
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn remove_by_target() {
        let dir = tempdir().unwrap();
        let store = FavouriteStore::in_dir(dir.path());
        store.add(auber("1", "Saint-Germain")).unwrap();
        store.add(auber("2", "Nanterre")).unwrap();

        assert!(store.remove(&auber("", "Saint-Germain")).unwrap());
        assert!(!store.remove(&auber("", "Saint-Germain")).unwrap());

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].destination_name, "Nanterre");
    }

    #[test]
    fn older_files_without_optional_fields_load() {
        let dir = tempdir().unwrap();
        let store = FavouriteStore::in_dir(dir.path());
        std::fs::write(
            store.path(),
            r#"[{"stop_area_id": "1", "stop_name": "S", "line_id": "L", "line_name": "1"}]"#,
        )
        .unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].line_color, "FFFFFF");
        assert_eq!(loaded[0].direction, "");
    }

    #[test]
    fn creates_data_directory() {
        let dir = tempdir().unwrap();
        let store = FavouriteStore::in_dir(dir.path().join("nested").join("data"));

        store.add(auber("1", "X")).unwrap();
        assert!(store.path().exists());
    }
}
