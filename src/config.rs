//! Driver configuration
//!
//! Stored as TOML. Every field is optional in the file; missing fields take
//! the defaults for the Air's MCU interface.

use std::path::{Path, PathBuf};

use air_transport::{PollConfig, MCU_INTERFACE, MCU_PIDS, VENDOR_ID};
use serde::{Deserialize, Serialize};

/// Settings for opening and polling the MCU interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// USB vendor ID to look for
    pub vendor_id: u16,
    /// USB product ID to look for
    pub product_id: u16,
    /// HID interface number carrying status reports
    pub interface: i32,
    /// Read timeout per poll in milliseconds
    pub poll_timeout_ms: i32,
    /// Flush one pending report before polling
    pub drain_before_poll: bool,
    /// Write the init command after opening
    pub send_init: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: MCU_PIDS[0],
            interface: MCU_INTERFACE,
            poll_timeout_ms: 1000,
            drain_before_poll: true,
            send_init: true,
        }
    }
}

impl DriverConfig {
    /// Default config path (~/.config/air-driver/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("air-driver").join("config.toml"))
    }

    /// Load config from a file, or defaults if it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DriverConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from `path` if given, else from the default location
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) if !p.exists() => anyhow::bail!("Config file not found: {}", p.display()),
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Some(p) => Self::load(&p),
                None => Ok(Self::default()),
            },
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Poll loop settings derived from this config
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            read_timeout_ms: self.poll_timeout_ms,
            drain_first: self.drain_before_poll,
            ..PollConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_registry() {
        let config = DriverConfig::default();
        assert_eq!(config.vendor_id, 0x3318);
        assert_eq!(config.product_id, 0x0424);
        assert_eq!(config.interface, 3);
        assert!(config.send_init);
    }

    #[test]
    fn test_partial_toml() {
        let config: DriverConfig = toml::from_str("poll_timeout_ms = 250\nsend_init = false\n").unwrap();
        assert_eq!(config.poll_timeout_ms, 250);
        assert!(!config.send_init);
        assert_eq!(config.interface, 3);
    }

    #[test]
    fn test_poll_config() {
        let config = DriverConfig {
            poll_timeout_ms: 50,
            drain_before_poll: false,
            ..Default::default()
        };
        let poll = config.poll_config();
        assert_eq!(poll.read_timeout_ms, 50);
        assert!(!poll.drain_first);
    }
}
