use super::types::InventoryConfig;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads and writes an `InventoryConfig` at a path chosen by the host,
/// usually somewhere under its own config directory
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the config. A missing file is replaced by the
    /// defaults, which are written back so the host has something to edit.
    pub fn load(&self) -> Result<InventoryConfig> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No inventory config at {:?}, writing defaults", self.path);
                let config = InventoryConfig::default();
                self.save(&config)?;
                return Ok(config);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };

        let config: InventoryConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {:?}", self.path))?;
        config
            .validate()
            .with_context(|| format!("Invalid inventory config in {:?}", self.path))?;

        info!(
            "Loaded inventory config from {:?} (stack limit {}, ghost hotbar {})",
            self.path, config.stack_limit, config.ghost_hotbar_slots
        );
        Ok(config)
    }

    /// Write `config`, refusing values `load` would reject
    pub fn save(&self, config: &InventoryConfig) -> Result<()> {
        config.validate().context("Refusing to save invalid inventory config")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let contents = toml::to_string_pretty(config).context("Failed to serialize inventory config")?;
        fs::write(&self.path, contents).with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }

    /// Load, change and save in one step. Nothing is written when the
    /// change leaves the config invalid.
    pub fn update<F>(&self, updater: F) -> Result<InventoryConfig>
    where
        F: FnOnce(&mut InventoryConfig),
    {
        let mut config = self.load()?;
        updater(&mut config);
        if let Err(e) = self.save(&config) {
            warn!("Inventory config update at {:?} discarded: {:#}", self.path, e);
            return Err(e);
        }
        Ok(config)
    }
}
