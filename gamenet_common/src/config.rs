//! Appliance configuration loading.
//!
//! The appliance reads a single TOML file (`appliance.toml`) supplying
//! the HAL mode, optional device-path overrides and the GPIO pin
//! assignment. Every field has a compiled-in default so a missing file
//! or a partial file is usable.

use crate::hal::consts::{
    DEFAULT_PIN_BUTTON, DEFAULT_PIN_LED_B, DEFAULT_PIN_LED_G, DEFAULT_PIN_LED_R, MAX_GPIO_PINS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {reason}")]
    Read {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error text.
        reason: String,
    },

    /// Config file is not valid TOML.
    #[error("failed to parse config file {path}: {reason}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Parser error text.
        reason: String,
    },

    /// Config content failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// HAL section of the appliance configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HalConfig {
    /// Backend mode: "real" or "mock".
    #[serde(default = "default_mode")]
    pub mode: String,
    /// ADC device path override.
    #[serde(default)]
    pub adc_device: Option<PathBuf>,
    /// GPIO sysfs root override (real backend only).
    #[serde(default)]
    pub sysfs_root: Option<PathBuf>,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            adc_device: None,
            sysfs_root: None,
        }
    }
}

fn default_mode() -> String {
    "real".to_string()
}

/// GPIO pin assignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinConfig {
    /// Front-panel button input pin.
    #[serde(default = "default_pin_button")]
    pub button: u32,
    /// Red LED channel pin.
    #[serde(default = "default_pin_led_r")]
    pub led_r: u32,
    /// Green LED channel pin.
    #[serde(default = "default_pin_led_g")]
    pub led_g: u32,
    /// Blue LED channel pin.
    #[serde(default = "default_pin_led_b")]
    pub led_b: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            button: DEFAULT_PIN_BUTTON,
            led_r: DEFAULT_PIN_LED_R,
            led_g: DEFAULT_PIN_LED_G,
            led_b: DEFAULT_PIN_LED_B,
        }
    }
}

fn default_pin_button() -> u32 {
    DEFAULT_PIN_BUTTON
}
fn default_pin_led_r() -> u32 {
    DEFAULT_PIN_LED_R
}
fn default_pin_led_g() -> u32 {
    DEFAULT_PIN_LED_G
}
fn default_pin_led_b() -> u32 {
    DEFAULT_PIN_LED_B
}

/// Top-level appliance configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplianceConfig {
    /// HAL backend selection.
    #[serde(default)]
    pub hal: HalConfig,
    /// GPIO pin assignment.
    #[serde(default)]
    pub pins: PinConfig,
}

impl ApplianceConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading configuration from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: ApplianceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate pin assignment and mode string.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hal.mode != "real" && self.hal.mode != "mock" {
            return Err(ConfigError::Invalid(format!(
                "unknown HAL mode '{}' (expected \"real\" or \"mock\")",
                self.hal.mode
            )));
        }

        for (name, pin) in [
            ("button", self.pins.button),
            ("led_r", self.pins.led_r),
            ("led_g", self.pins.led_g),
            ("led_b", self.pins.led_b),
        ] {
            if pin >= MAX_GPIO_PINS {
                return Err(ConfigError::Invalid(format!(
                    "pin '{name}' = {pin} out of range (max {})",
                    MAX_GPIO_PINS - 1
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ApplianceConfig::default();
        assert_eq!(config.hal.mode, "real");
        assert!(config.hal.adc_device.is_none());
        assert_eq!(config.pins.button, DEFAULT_PIN_BUTTON);
        assert_eq!(config.pins.led_b, DEFAULT_PIN_LED_B);
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[hal]\nmode = \"mock\"\n\n[pins]\nbutton = 5").unwrap();

        let config = ApplianceConfig::load(file.path()).unwrap();
        assert_eq!(config.hal.mode, "mock");
        assert_eq!(config.pins.button, 5);
        assert_eq!(config.pins.led_r, DEFAULT_PIN_LED_R);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ApplianceConfig::load(Path::new("/nonexistent/appliance.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [[[").unwrap();

        let result = ApplianceConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_unknown_mode() {
        let mut config = ApplianceConfig::default();
        config.hal.mode = "simulation".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_pin() {
        let mut config = ApplianceConfig::default();
        config.pins.led_g = MAX_GPIO_PINS;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("led_g"));
    }
}
