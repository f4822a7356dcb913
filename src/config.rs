//! User configuration and preferences

use crate::error::{PickerError, Result};
use crate::host::PopupSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How a chosen file is launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenWith {
    /// `$VISUAL` / `$EDITOR`
    #[default]
    Editor,
    /// The desktop's default handler
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Wall-clock budget of one scan step in milliseconds
    pub scan_budget_ms: u64,
    /// Pause between scan steps in milliseconds
    pub scan_interval_ms: u64,
    /// Extra name suffixes to hide, on top of dotfiles and object files
    pub ignore_suffixes: Vec<String>,
    pub open_with: OpenWith,
    pub popup_min_width: u16,
    pub popup_max_width: u16,
    pub popup_min_height: u16,
    pub popup_max_height: u16,
}

impl Default for UserConfig {
    fn default() -> Self {
        let popup = PopupSpec::default();
        Self {
            scan_budget_ms: 100,
            scan_interval_ms: 500,
            ignore_suffixes: Vec::new(),
            open_with: OpenWith::Editor,
            popup_min_width: popup.min_width,
            popup_max_width: popup.max_width,
            popup_min_height: popup.min_height,
            popup_max_height: popup.max_height,
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/fpick/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fpick").join("config.json"))
    }

    /// Load config from the default location, writing the defaults there on
    /// first run
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            PickerError::Config("Could not determine config directory".to_string())
        })?;
        Self::load_or_init(&path)
    }

    /// Like [`UserConfig::load_from`], but a missing file is created with the
    /// defaults so users have something to edit
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| PickerError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| PickerError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PickerError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan_interval_ms == 0 {
            return Err(PickerError::Config(
                "scan_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.popup_min_width > self.popup_max_width
            || self.popup_min_height > self.popup_max_height
        {
            return Err(PickerError::Config(
                "popup minimum size exceeds its maximum".to_string(),
            ));
        }
        Ok(())
    }

    pub fn popup_spec(&self) -> PopupSpec {
        PopupSpec {
            min_width: self.popup_min_width,
            max_width: self.popup_max_width,
            min_height: self.popup_min_height,
            max_height: self.popup_max_height,
            ..PopupSpec::default()
        }
    }
}
