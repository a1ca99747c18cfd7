//! `garage.toml` loading.
//!
//! Every key is optional. A missing file means defaults. `GARAGE_PLATES_PATH`
//! overrides `registry.path` after the file is read.

use crate::core::error::GarageError;
use crate::core::registry::{DEFAULT_PLATES_FILE, JsonFilePlateStore};
use crate::core::store::check_garage_size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "garage.toml";
pub const PLATES_PATH_ENV: &str = "GARAGE_PLATES_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Plate file; relative paths resolve against the config's base directory.
    pub path: PathBuf,
    /// Write the `.events.jsonl` ledger next to the plate file.
    pub audit: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PLATES_FILE),
            audit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GarageDefaults {
    /// Size used by the console `create` command when none is given.
    pub default_size: usize,
    /// Seed the sample catalog into every garage the console creates.
    pub seed_samples: bool,
}

impl Default for GarageDefaults {
    fn default() -> Self {
        Self {
            default_size: 10,
            seed_samples: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GarageConfig {
    pub registry: RegistryConfig,
    pub garage: GarageDefaults,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl GarageConfig {
    pub fn parse(content: &str) -> Result<Self, GarageError> {
        let config: GarageConfig =
            toml::from_str(content).map_err(|e| GarageError::ConfigError(e.to_string()))?;
        check_garage_size(config.garage.default_size)
            .map_err(|e| GarageError::ConfigError(format!("garage.default_size: {}", e)))?;
        Ok(config)
    }

    /// Reads `path`, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, GarageError> {
        let content = fs::read_to_string(path).map_err(|e| {
            GarageError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Reads `<dir>/garage.toml` if present, defaults otherwise.
    pub fn load(dir: &Path) -> Result<Self, GarageError> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            return Self::load_from(&path);
        }
        Ok(Self {
            base_dir: dir.to_path_buf(),
            ..Self::default()
        })
    }

    /// Explicit `--config` wins over the working-directory file; the
    /// environment override applies to either.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self, GarageError> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => Self::load(cwd)?,
        };
        Ok(config.with_env_override(std::env::var(PLATES_PATH_ENV).ok()))
    }

    pub fn with_env_override(mut self, plates_path: Option<String>) -> Self {
        if let Some(p) = plates_path.filter(|p| !p.trim().is_empty()) {
            self.registry.path = PathBuf::from(p);
        }
        self
    }

    pub fn plates_path(&self) -> PathBuf {
        if self.registry.path.is_absolute() {
            self.registry.path.clone()
        } else {
            self.base_dir.join(&self.registry.path)
        }
    }

    pub fn plate_store(&self) -> JsonFilePlateStore {
        let store = JsonFilePlateStore::new(self.plates_path());
        if self.registry.audit {
            store
        } else {
            store.without_audit()
        }
    }
}
