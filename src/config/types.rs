use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::inventory::GHOST_HOTBAR_SLOTS;
use crate::types::DEFAULT_MAX_STACK_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Ghost-input slots below this index hold a single item
    #[serde(default = "default_ghost_hotbar_slots")]
    pub ghost_hotbar_slots: usize,

    /// Per-slot limit for stores written through the `Container` interface
    #[serde(default = "default_stack_limit")]
    pub stack_limit: u32,

    /// Infusion level shown as 100% by the probe driver
    #[serde(default = "default_max_infuse")]
    pub max_infuse: u32,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write a daily-rotated log file here as well as to stdout
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_log_file_name")]
    pub file_name: String,
}

/// Settings a store or logger cannot work with
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("stack_limit must be at least 1")]
    ZeroStackLimit,

    #[error("max_infuse must be at least 1")]
    ZeroMaxInfuse,

    #[error("logging.file_name is empty but logging.directory is set")]
    EmptyLogFileName,
}

impl InventoryConfig {
    /// Reject values that would make every normal slot unusable or the
    /// probe report nonsense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_limit == 0 {
            return Err(ConfigError::ZeroStackLimit);
        }
        if self.max_infuse == 0 {
            return Err(ConfigError::ZeroMaxInfuse);
        }
        if self.logging.directory.is_some() && self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::EmptyLogFileName);
        }
        Ok(())
    }
}

// Default values
fn default_ghost_hotbar_slots() -> usize {
    GHOST_HOTBAR_SLOTS
}

fn default_stack_limit() -> u32 {
    DEFAULT_MAX_STACK_SIZE
}

fn default_max_infuse() -> u32 {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file_name() -> String {
    "inventory.log".to_string()
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            ghost_hotbar_slots: default_ghost_hotbar_slots(),
            stack_limit: default_stack_limit(),
            max_infuse: default_max_infuse(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            file_name: default_log_file_name(),
        }
    }
}
