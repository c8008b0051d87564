use dirs_next as dirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::import::MergeStrategy;
use crate::storage::FileBlobStore;
use crate::store::DEFAULT_WARN_THRESHOLD_MB;

/// Persisted tool settings.
///
/// Every field is `#[serde(default)]` so files written by older versions keep
/// loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Where workout blobs live. `None` means the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_storage_limit_mb")]
    pub storage_limit_mb: f64,
    #[serde(default = "default_warn_threshold_mb")]
    pub warn_threshold_mb: f64,
    #[serde(default)]
    pub default_import_strategy: MergeStrategy,
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_storage_limit_mb() -> f64 {
    10.0
}

fn default_warn_threshold_mb() -> f64 {
    DEFAULT_WARN_THRESHOLD_MB
}

fn default_user() -> String {
    "chris".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_limit_mb: default_storage_limit_mb(),
            warn_threshold_mb: default_warn_threshold_mb(),
            default_import_strategy: MergeStrategy::default(),
            default_user: default_user(),
        }
    }
}

impl Config {
    const DIR: &'static str = "duo_workout_tracker";
    const FILE: &'static str = "config.json";

    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::DIR).join(Self::FILE))
    }

    /// Load the config file, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable config {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::other("no config directory available"));
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, data)
    }

    pub fn storage_limit_bytes(&self) -> Option<usize> {
        (self.storage_limit_mb > 0.0).then(|| (self.storage_limit_mb * 1024.0 * 1024.0) as usize)
    }

    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(FileBlobStore::default_dir)
    }

    /// File-backed medium at the configured location with the configured limit.
    pub fn blob_store(&self) -> Option<FileBlobStore> {
        self.resolved_data_dir()
            .map(|dir| FileBlobStore::new(dir).with_limit(self.storage_limit_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::env;
    use std::fs;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn with_config_home(f: impl FnOnce(&std::path::Path)) {
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let prev_config = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        f(dir.path());

        if let Some(val) = prev_config {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.default_user, "chris");
        assert_eq!(c.default_import_strategy, MergeStrategy::Smart);
        assert!((c.storage_limit_mb - 10.0).abs() < 1e-6);
        assert!((c.warn_threshold_mb - 8.0).abs() < 1e-6);
        assert_eq!(c.storage_limit_bytes(), Some(10 * 1024 * 1024));
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let c = Config {
            storage_limit_mb: 0.0,
            ..Config::default()
        };
        assert_eq!(c.storage_limit_bytes(), None);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn save_and_load_roundtrip() {
        with_config_home(|home| {
            let c = Config {
                data_dir: Some(home.join("blobs")),
                default_import_strategy: MergeStrategy::Replace,
                default_user: "denis".into(),
                ..Config::default()
            };
            c.save().unwrap();
            assert_eq!(Config::load(), c);
            assert!(home.join("duo_workout_tracker").join("config.json").exists());

            let store = c.blob_store().unwrap();
            assert_eq!(store.dir(), home.join("blobs"));
        });
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn missing_fields_and_garbage_fall_back() {
        with_config_home(|_| {
            let path = Config::path().unwrap();
            fs::create_dir_all(path.parent().unwrap()).unwrap();

            fs::write(&path, r#"{"default_user": "denis"}"#).unwrap();
            let partial = Config::load();
            assert_eq!(partial.default_user, "denis");
            assert_eq!(partial.default_import_strategy, MergeStrategy::Smart);

            fs::write(&path, "not json").unwrap();
            assert_eq!(Config::load(), Config::default());
        });
    }
}
