//! Key store service - encryption key lifecycle
//!
//! Owns the symmetric key that encrypts the user store. The key lives as
//! raw bytes at `<data_dir>/secrets/secret.key`; older installs kept it
//! at `<data_dir>/secret.key` and are migrated (copied, original left in
//! place) on first load. Failure to obtain a key is fatal to startup.

use std::fs;
use std::path::PathBuf;

use rand::RngCore;
use tracing::info;

use crate::domain::result::{Error, Result};

/// AES-256 key length in bytes
pub const KEY_LENGTH: usize = 32;

/// Manages the on-disk encryption key
pub struct KeyStore {
    canonical_path: PathBuf,
    legacy_path: PathBuf,
}

impl KeyStore {
    pub fn new(canonical_path: PathBuf, legacy_path: PathBuf) -> Self {
        Self {
            canonical_path,
            legacy_path,
        }
    }

    /// Load the key, migrating or generating it as needed
    ///
    /// Order of precedence: legacy file (migrated to the canonical path),
    /// then canonical file, then a freshly generated key.
    pub fn load_or_create(&self) -> Result<[u8; KEY_LENGTH]> {
        if self.legacy_path.exists() && !self.canonical_path.exists() {
            let bytes = fs::read(&self.legacy_path)
                .map_err(|e| Error::key_store(format!("cannot read legacy key file: {e}")))?;
            self.persist(&bytes)?;
            info!(
                from = %self.legacy_path.display(),
                to = %self.canonical_path.display(),
                "migrated legacy key file"
            );
            return Self::into_key(bytes);
        }

        if self.canonical_path.exists() {
            let bytes = fs::read(&self.canonical_path)
                .map_err(|e| Error::key_store(format!("cannot read key file: {e}")))?;
            return Self::into_key(bytes);
        }

        let mut key = [0u8; KEY_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut key);
        self.persist(&key)?;
        info!(path = %self.canonical_path.display(), "generated new encryption key");
        Ok(key)
    }

    fn persist(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.canonical_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::key_store(format!("cannot create secrets directory: {e}")))?;
        }
        fs::write(&self.canonical_path, bytes)
            .map_err(|e| Error::key_store(format!("cannot write key file: {e}")))
    }

    fn into_key(bytes: Vec<u8>) -> Result<[u8; KEY_LENGTH]> {
        bytes.try_into().map_err(|bytes: Vec<u8>| {
            Error::key_store(format!(
                "key file has wrong length: expected {KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &std::path::Path) -> KeyStore {
        KeyStore::new(
            dir.join("secrets").join("secret.key"),
            dir.join("secret.key"),
        )
    }

    #[test]
    fn test_generates_and_persists_key() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let key = store.load_or_create().unwrap();
        assert!(dir.path().join("secrets").join("secret.key").exists());

        // Second load returns the same key
        let again = store.load_or_create().unwrap();
        assert_eq!(key, again);
    }

    #[test]
    fn test_migrates_legacy_key() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("secret.key");
        let legacy_key = [7u8; KEY_LENGTH];
        fs::write(&legacy, legacy_key).unwrap();

        let store = store_in(dir.path());
        let key = store.load_or_create().unwrap();

        assert_eq!(key, legacy_key);
        // Migration is non-destructive
        assert!(legacy.exists());
        assert!(dir.path().join("secrets").join("secret.key").exists());
    }

    #[test]
    fn test_canonical_wins_over_legacy() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("secrets")).unwrap();
        fs::write(dir.path().join("secrets").join("secret.key"), [1u8; KEY_LENGTH]).unwrap();
        fs::write(dir.path().join("secret.key"), [2u8; KEY_LENGTH]).unwrap();

        let store = store_in(dir.path());
        assert_eq!(store.load_or_create().unwrap(), [1u8; KEY_LENGTH]);
    }

    #[test]
    fn test_rejects_truncated_key_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("secrets")).unwrap();
        fs::write(dir.path().join("secrets").join("secret.key"), [0u8; 5]).unwrap();

        let store = store_in(dir.path());
        assert!(store.load_or_create().is_err());
    }
}
