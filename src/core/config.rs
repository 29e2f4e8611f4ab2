//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the per-directory config
pub const LOCAL_CONFIG_FILE: &str = ".ecotag.yaml";

/// Ecotag configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Training CSV the summary constants are derived from
    pub training_data: Option<PathBuf>,

    /// Seed for use-location sampling
    pub seed: Option<u64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let global = Self::global_config_path();
        let local = Self::local_config_path();
        let mut config = Self::load_from(global.as_deref(), Some(&local));
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Merge the global and local config files (local takes precedence)
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Self {
        let mut config = Config::default();

        for path in [global, local].into_iter().flatten() {
            if let Some(layer) = Self::read_file(path) {
                config.merge(layer);
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Apply `ECOTAG_*` environment overrides
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var("ECOTAG_TRAINING_DATA") {
            self.training_data = Some(PathBuf::from(path));
        }
        if let Some(seed) = var("ECOTAG_SEED") {
            match seed.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => tracing::warn!(%seed, "ignoring non-numeric ECOTAG_SEED"),
            }
        }
        if let Some(format) = var("ECOTAG_FORMAT") {
            self.default_format = Some(format);
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ecotag")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the config file in the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.training_data.is_some() {
            self.training_data = other.training_data;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_nothing() {
        let config = Config::load_from(None, Some(Path::new("/nonexistent/.ecotag.yaml")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_local_overrides_global() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.yaml");
        let local = dir.path().join("local.yaml");
        fs::write(&global, "training_data: /data/full.csv\nseed: 1\ndefault_format: json\n").unwrap();
        fs::write(&local, "seed: 42\n").unwrap();

        let config = Config::load_from(Some(&global), Some(&local));
        assert_eq!(config.training_data, Some(PathBuf::from("/data/full.csv")));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("local.yaml");
        fs::write(&local, "seed: [not, a, number\n").unwrap();

        let config = Config::load_from(None, Some(&local));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config {
            seed: Some(1),
            ..Config::default()
        };
        config.apply_env(|key| match key {
            "ECOTAG_TRAINING_DATA" => Some("train.csv".to_string()),
            "ECOTAG_SEED" => Some(" 7 ".to_string()),
            _ => None,
        });
        assert_eq!(config.training_data, Some(PathBuf::from("train.csv")));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_format, None);

        config.apply_env(|key| (key == "ECOTAG_SEED").then(|| "seven".to_string()));
        assert_eq!(config.seed, Some(7));
    }
}
