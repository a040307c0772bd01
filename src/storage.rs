use crate::core::store::Catalog;
use crate::error::{BotError, BotResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Backing state of the run store. Every save replaces the whole document.
pub trait Persistence: Send {
    /// `Ok(None)` when there is no prior state to load.
    fn load(&self) -> BotResult<Option<Catalog>>;
    fn save(&self, catalog: &Catalog) -> BotResult<()>;
}

/// Pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStorage {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temporary_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for JsonFileStorage {
    fn load(&self) -> BotResult<Option<Catalog>> {
        if !self.path.exists() {
            debug!("No storage file at {}", self.path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| BotError::StorageUnreadable(format!("{}: {}", self.path.display(), e)))?;
        let catalog = serde_json::from_str::<Catalog>(&content)
            .map_err(|e| BotError::StorageUnreadable(format!("{}: {}", self.path.display(), e)))?;

        Ok(Some(catalog))
    }

    fn save(&self, catalog: &Catalog) -> BotResult<()> {
        let content = serde_json::to_string_pretty(catalog)
            .map_err(|e| BotError::StorageUnwritable(e.to_string()))?;

        // Write aside then rename, so the document on disk is always a complete one.
        let temporary = self.temporary_path();
        fs::write(&temporary, content)
            .map_err(|e| BotError::StorageUnwritable(format!("{}: {}", temporary.display(), e)))?;
        fs::rename(&temporary, &self.path)
            .map_err(|e| BotError::StorageUnwritable(format!("{}: {}", self.path.display(), e)))?;

        debug!("Catalog saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("speedruns.json"));
        assert_eq!(storage.load(), Ok(None));
    }

    #[test]
    fn garbage_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speedruns.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(
            storage.load(),
            Err(BotError::StorageUnreadable(_))
        ));
    }

    #[test]
    fn saves_pretty_printed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speedruns.json");
        let storage = JsonFileStorage::new(&path);

        storage.save(&Catalog::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!storage.temporary_path().exists());
    }

    #[test]
    fn unwritable_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("missing").join("speedruns.json"));
        assert!(matches!(
            storage.save(&Catalog::default()),
            Err(BotError::StorageUnwritable(_))
        ));
    }
}
