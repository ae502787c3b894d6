// ============================================================
// Layer 6 — Loader Config Store
// ============================================================
// Saves and restores the LoaderConfig of an inspection run as
// JSON, so the same corpus split and batch layout can be
// reproduced later.
//
//   stats/
//     loader_config.json   ← corpus path, batch size, seed, device
//     batch_stats.csv      ← written by metrics::BatchStatsLogger
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::inspect_use_case::LoaderConfig;

const CONFIG_FILE: &str = "loader_config.json";

/// Reads and writes `loader_config.json` in one directory.
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Create the store, creating its directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn save(&self, cfg: &LoaderConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved loader config to '{}'", path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<LoaderConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed loader config '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested")).unwrap();

        let cfg = LoaderConfig {
            batch_size: 3,
            shuffle_seed: 9,
            ..LoaderConfig::default()
        };
        store.save(&cfg).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.batch_size, 3);
        assert_eq!(loaded.shuffle_seed, 9);
        assert_eq!(loaded.device, cfg.device);
    }

    #[test]
    fn test_load_without_save_fails() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path()).unwrap();
        assert!(store.load().is_err());
    }
}
