use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::machine::{
    TimingConfig, DEFAULT_DISPLAY_MS, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub display_ms: u64,
    pub burst: bool,
    pub history_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            display_ms: DEFAULT_DISPLAY_MS,
            burst: true,
            history_len: 5,
        }
    }
}

impl Config {
    /// Replace an empty delay window with the default one
    pub fn sanitized(mut self) -> Self {
        if self.min_delay_ms >= self.max_delay_ms {
            warn!(
                min_delay_ms = self.min_delay_ms,
                max_delay_ms = self.max_delay_ms,
                "invalid cue delay window, falling back to defaults"
            );
            self.min_delay_ms = DEFAULT_MIN_DELAY_MS;
            self.max_delay_ms = DEFAULT_MAX_DELAY_MS;
        }
        self
    }

    pub fn timing(&self) -> TimingConfig {
        TimingConfig::from_millis(self.min_delay_ms, self.max_delay_ms, self.display_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "flinch") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("flinch_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg.sanitized(),
                Err(e) => {
                    warn!(path = ?self.path, error = %e, "malformed config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            min_delay_ms: 500,
            max_delay_ms: 1_500,
            display_ms: 800,
            burst: false,
            history_len: 10,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn malformed_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "display_ms": 1200 }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.display_ms, 1_200);
        assert_eq!(cfg.min_delay_ms, DEFAULT_MIN_DELAY_MS);
        assert!(cfg.burst);
    }

    #[test]
    fn empty_delay_window_is_sanitized() {
        let cfg = Config {
            min_delay_ms: 4_000,
            max_delay_ms: 2_000,
            ..Config::default()
        }
        .sanitized();

        assert_eq!(cfg.min_delay_ms, DEFAULT_MIN_DELAY_MS);
        assert_eq!(cfg.max_delay_ms, DEFAULT_MAX_DELAY_MS);
    }

    #[test]
    fn timing_maps_millis() {
        let timing = Config::default().timing();
        assert_eq!(timing.min_delay, Duration::from_millis(1_000));
        assert_eq!(timing.max_delay, Duration::from_millis(5_000));
        assert_eq!(timing.display, Duration::from_millis(2_000));
    }
}
