//! Configuration file handling: device ids and the last applied lighting

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use ite8291::consts::{ITE8291_PRODUCT_ID, ITE8291_VENDOR_ID};
use serde::{Deserialize, Serialize};
use xmg_kb_core::BoardInfo;

use crate::lighting::LightingState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    /// Last lighting applied, restored with `--restore`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingState>,
}

impl Config {
    /// Get the default config file path for this platform
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "xmg-kb").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load config from file, or create default if it doesn't exist
    pub fn load_or_create(path: &Path) -> Result<Self, Box<dyn Error>> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Config::default();
            config.save_with_header(path)?;
            eprintln!("created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Load config if the file exists, defaults otherwise. Never writes.
    pub fn load_or_default(path: &Path) -> Result<Self, Box<dyn Error>> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load config from an existing file
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Save config with header comments for new files
    pub fn save_with_header(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let header = r#"# xmg-kb configuration file
# https://github.com/Gerald-Ha/xmg-kb

"#;
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, format!("{header}{contents}"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// USB vendor id of the keyboard
    pub vendor_id: u16,
    /// USB product id of the keyboard
    pub product_id: u16,
    /// Timeout for a single usb transfer
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl DeviceConfig {
    /// Board info carrying the configured ids
    pub fn board_info(&self) -> BoardInfo {
        ite8291::INFO.with_ids(self.vendor_id, self.product_id)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: ITE8291_VENDOR_ID,
            product_id: ITE8291_PRODUCT_ID,
            timeout: ite8291::DEFAULT_TIMEOUT,
        }
    }
}
