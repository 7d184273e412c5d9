use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use super::models::StoreSettings;

/// File-backed settings store, one JSON document per gateway instance.
///
/// Mutations are load-modify-save with no locking: the gateway assumes a
/// single admin at a time, the same way the original settings screen did.
#[derive(Clone)]
pub struct Storage {
    base_path: PathBuf,
}

impl Storage {
    /// Create a new storage instance with the default base directory ("./data")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./data"),
        }
    }

    /// Create storage with custom base directory (for testing)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the base directory path for gateway data
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn settings_path(&self) -> PathBuf {
        self.base_path.join("settings.json")
    }

    /// Load store settings from disk, or return defaults if nothing was
    /// saved yet (fresh install).
    pub fn load_settings(&self) -> Result<StoreSettings, crate::error::StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(StoreSettings::default());
        }
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Save store settings to disk, stamping the update time.
    pub fn save_settings(
        &self,
        settings: &mut StoreSettings,
    ) -> Result<(), crate::error::StorageError> {
        fs::create_dir_all(&self.base_path)?;
        settings.updated_at = Utc::now();
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(self.settings_path(), json)?;
        Ok(())
    }

    /// Reset the gateway to its fresh-install state (permanent store delete).
    pub fn reset(&self) -> Result<(), crate::error::StorageError> {
        let path = self.settings_path();
        if path.exists() {
            log::warn!("Resetting store settings: {:?}", path);
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());
        let settings = storage.load_settings().unwrap();
        assert!(!settings.has_credentials());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());

        let mut settings = StoreSettings::default();
        settings.store_id = Some("S1".to_string());
        settings.api_secret = Some("sek".to_string());
        settings.payout_threshold = 25;
        storage.save_settings(&mut settings).unwrap();

        let loaded = storage.load_settings().unwrap();
        assert_eq!(loaded.store_id.as_deref(), Some("S1"));
        assert_eq!(loaded.payout_threshold, 25);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());

        let mut settings = StoreSettings::default();
        storage.save_settings(&mut settings).unwrap();
        storage.reset().unwrap();
        storage.reset().unwrap();
        assert!(!storage.load_settings().unwrap().has_credentials());
    }
}
