//! Saved user preferences, kept as a small JSON file in the data directory.

use govdash_types::WalletAddress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::DashboardError;

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Address looked up on start.
    #[serde(default)]
    pub default_address: Option<WalletAddress>,
}

/// Reads and writes [`Preferences`] under a data directory.
#[derive(Clone, Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as empty preferences.
    pub fn load(&self) -> Result<Preferences, DashboardError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), DashboardError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }

    pub fn default_address(&self) -> Result<Option<WalletAddress>, DashboardError> {
        Ok(self.load()?.default_address)
    }

    pub fn set_default_address(&self, address: WalletAddress) -> Result<(), DashboardError> {
        let mut prefs = self.load()?;
        prefs.default_address = Some(address);
        self.save(&prefs)
    }

    pub fn clear_default_address(&self) -> Result<(), DashboardError> {
        let mut prefs = self.load()?;
        if prefs.default_address.take().is_none() {
            return Ok(());
        }
        self.save(&prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = PreferenceStore::new(dir.path());
        assert_eq!(store.load().unwrap(), Preferences::default());
        assert_eq!(store.default_address().unwrap(), None);
    }

    #[test]
    fn default_address_persists_across_stores() {
        let dir = tempfile::tempdir().expect("temp dir");
        PreferenceStore::new(dir.path())
            .set_default_address(WalletAddress::new("0xABCdef"))
            .unwrap();

        let reopened = PreferenceStore::new(dir.path());
        assert_eq!(
            reopened.default_address().unwrap(),
            Some(WalletAddress::new("0xabcdef"))
        );
    }

    #[test]
    fn clear_removes_the_address() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = PreferenceStore::new(dir.path());
        store.set_default_address(WalletAddress::new("0xabc")).unwrap();
        store.clear_default_address().unwrap();
        assert_eq!(store.default_address().unwrap(), None);

        // Clearing twice is fine.
        store.clear_default_address().unwrap();
    }

    #[test]
    fn creates_missing_data_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = PreferenceStore::new(dir.path().join("nested").join("data"));
        store.set_default_address(WalletAddress::new("0xabc")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = PreferenceStore::new(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(DashboardError::Preferences(_))));
    }
}
