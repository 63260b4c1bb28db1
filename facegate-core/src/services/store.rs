//! Encrypted user store - the user collection at rest
//!
//! The full user collection is serialized to JSON and encrypted as a
//! single AES-256-GCM ciphertext. On disk the file holds
//! base64(nonce || ciphertext) as text. Every save is a whole-file
//! rewrite; per-record encryption is not worth the format complexity at
//! the expected scale (tens to low thousands of local users).

use std::fs;
use std::path::PathBuf;

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{error, warn};

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::services::key_store::KEY_LENGTH;

/// Nonce length for AES-GCM (12 bytes standard)
const NONCE_LENGTH: usize = 12;

/// Reads and writes the encrypted user collection
pub struct EncryptedUserStore {
    path: PathBuf,
    cipher: Aes256Gcm,
}

impl EncryptedUserStore {
    pub fn new(path: PathBuf, key: &[u8; KEY_LENGTH]) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
        Self { path, cipher }
    }

    /// Load the user collection from disk
    ///
    /// A missing or empty file yields an empty collection. A ciphertext
    /// that fails to authenticate or decode is unrecoverable: the store
    /// is reset to a valid empty encrypted file and an empty collection
    /// is returned, so a wrong or corrupted key never prevents startup.
    /// Other read errors are logged and also yield an empty collection.
    pub fn load(&self) -> Vec<User> {
        if !self.path.exists() {
            return Vec::new();
        }

        let encoded = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "cannot read user store");
                return Vec::new();
            }
        };

        if encoded.trim().is_empty() {
            return Vec::new();
        }

        match self.decrypt(encoded.trim()) {
            Ok(users) => users,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "user store cannot be decrypted, resetting to an empty store"
                );
                if let Err(e) = self.save(&[]) {
                    error!(error = %e, "failed to reset user store");
                }
                Vec::new()
            }
        }
    }

    /// Serialize, encrypt and write the user collection, replacing prior
    /// contents
    pub fn save(&self, users: &[User]) -> Result<()> {
        let payload = serde_json::to_vec(users)?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, payload.as_slice())
            .map_err(|e| Error::encryption(format!("store encryption failed: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, BASE64.encode(&blob))?;
        Ok(())
    }

    fn decrypt(&self, encoded: &str) -> Result<Vec<User>> {
        let blob = BASE64
            .decode(encoded)
            .map_err(|e| Error::encryption(format!("store is not valid base64: {e}")))?;

        if blob.len() < NONCE_LENGTH {
            return Err(Error::encryption("store blob shorter than nonce"));
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LENGTH);

        let payload = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::encryption("store ciphertext failed to authenticate"))?;

        // A payload that authenticated but does not parse is equally
        // unrecoverable; callers treat both the same way.
        Ok(serde_json::from_slice(&payload)?)
    }
}
