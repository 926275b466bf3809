//! HAL hardware value types.
//!
//! This module defines the data types exchanged with HAL backends:
//! - `GpioDirection` / `GpioLevel` - GPIO pin configuration and state
//! - `DeviceRole` - appliance role decided by the ADC voltage divider
//! - `ConsoleState` - observed state of the attached game console
//! - `LedColor` - RGB color triple for the status LED

use std::fmt;

/// GPIO pin direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GpioDirection {
    /// Pin reads an external signal.
    #[default]
    Input,
    /// Pin drives an external signal.
    Output,
}

impl GpioDirection {
    /// The sysfs direction string ("in" / "out").
    pub fn as_sysfs_str(&self) -> &'static str {
        match self {
            GpioDirection::Input => "in",
            GpioDirection::Output => "out",
        }
    }
}

/// GPIO pin level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GpioLevel {
    /// Logic low.
    #[default]
    Low,
    /// Logic high.
    High,
}

impl GpioLevel {
    /// The sysfs value byte (b'0' / b'1').
    pub fn as_sysfs_byte(&self) -> u8 {
        match self {
            GpioLevel::Low => b'0',
            GpioLevel::High => b'1',
        }
    }

    /// Map a boolean to a level (true → High).
    pub fn from_bool(high: bool) -> Self {
        if high { GpioLevel::High } else { GpioLevel::Low }
    }

    /// The opposite level.
    pub fn toggled(&self) -> Self {
        match self {
            GpioLevel::Low => GpioLevel::High,
            GpioLevel::High => GpioLevel::Low,
        }
    }
}

/// Appliance role decided at boot from the ADC voltage divider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceRole {
    /// Role not yet detected, or detection failed.
    #[default]
    Unknown,
    /// Client appliance (travels with the console).
    Client,
    /// Server appliance (stays on the home network).
    Server,
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceRole::Client => "Client",
            DeviceRole::Server => "Server",
            DeviceRole::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Observed power state of the attached game console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleState {
    /// State not known.
    #[default]
    Unknown,
    /// Console is powered on.
    On,
    /// Console is in standby.
    Standby,
    /// Console is powered off.
    Off,
}

/// RGB color triple for the status LED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedColor {
    /// Red channel, 0-255.
    pub r: u8,
    /// Green channel, 0-255.
    pub g: u8,
    /// Blue channel, 0-255.
    pub b: u8,
}

impl LedColor {
    /// White (Client: console on).
    pub const WHITE: LedColor = LedColor { r: 255, g: 255, b: 255 };
    /// Orange (Client: console standby).
    pub const ORANGE: LedColor = LedColor { r: 255, g: 165, b: 0 };
    /// Black / off.
    pub const BLACK: LedColor = LedColor { r: 0, g: 0, b: 0 };
    /// Red (role unknown / error).
    pub const RED: LedColor = LedColor { r: 255, g: 0, b: 0 };
    /// Green (Server: console on).
    pub const GREEN: LedColor = LedColor { r: 0, g: 255, b: 0 };
    /// Blue (Server: console standby).
    pub const BLUE: LedColor = LedColor { r: 0, g: 0, b: 255 };
}
