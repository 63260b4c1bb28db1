//! Configuration management
//!
//! Compatible with the desktop app's settings.json format:
//! ```json
//! {
//!   "app": { "faceLoginEnabled": true, ... }
//! }
//! ```
//! Unmanaged fields are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

/// Raw settings.json structure (matching the desktop app format)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_true")]
    face_login_enabled: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            face_login_enabled: true,
            other: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// FaceGate configuration and data-directory layout
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    pub face_login_enabled: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the data directory
    ///
    /// Face login can be disabled via:
    /// 1. Settings file
    /// 2. Environment variable FACEGATE_FACE_LOGIN (for CI/testing)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let face_login_enabled = match std::env::var("FACEGATE_FACE_LOGIN").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.face_login_enabled,
        };

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            face_login_enabled,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory, preserving unmanaged fields
    pub fn save(&self) -> Result<()> {
        let settings_path = self.data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.face_login_enabled = self.face_login_enabled;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Root data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Canonical encryption key location
    pub fn key_path(&self) -> PathBuf {
        self.data_dir.join("secrets").join("secret.key")
    }

    /// Pre-migration key location, read once and left in place
    pub fn legacy_key_path(&self) -> PathBuf {
        self.data_dir.join("secret.key")
    }

    /// Encrypted user store location
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("data").join("users.dat")
    }
}
