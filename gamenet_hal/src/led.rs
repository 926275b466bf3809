//! Status LED controller.
//!
//! Drives the RGB status LED over three GPIO output pins and maps
//! (device role, console state) pairs onto the appliance color scheme.
//! Channel values above 127 drive the pin High, everything else Low -
//! a binary approximation of the 0-255 color space, matching the
//! on/off GPIO hardware.

use crate::core::Hal;
use gamenet_common::config::PinConfig;
use gamenet_common::error::ApplianceError;
use gamenet_common::hal::types::{ConsoleState, DeviceRole, GpioDirection, GpioLevel, LedColor};
use tracing::{debug, warn};

/// RGB pin assignment for the status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPins {
    /// Red channel pin.
    pub r: u32,
    /// Green channel pin.
    pub g: u32,
    /// Blue channel pin.
    pub b: u32,
}

impl From<&PinConfig> for LedPins {
    fn from(pins: &PinConfig) -> Self {
        Self {
            r: pins.led_r,
            g: pins.led_g,
            b: pins.led_b,
        }
    }
}

/// Controller for the RGB status LED.
pub struct LedController {
    pins: LedPins,
}

impl LedController {
    /// Initialize the three LED pins as outputs, driven Low (LED off).
    pub fn init(hal: &mut Hal, pins: LedPins) -> Result<Self, ApplianceError> {
        for (name, pin) in [("R", pins.r), ("G", pins.g), ("B", pins.b)] {
            hal.gpio_init(pin, GpioDirection::Output).map_err(|e| {
                warn!("LED controller: failed to init {name} pin {pin}: {e}");
                ApplianceError::from(e)
            })?;
        }

        let controller = Self { pins };
        controller.set_color(hal, LedColor::BLACK)?;

        debug!(
            "LED controller initialized: R={}, G={}, B={}",
            pins.r, pins.g, pins.b
        );
        Ok(controller)
    }

    /// Set the LED to an arbitrary RGB color.
    pub fn set_color(&self, hal: &mut Hal, color: LedColor) -> Result<(), ApplianceError> {
        self.set_channel(hal, self.pins.r, color.r)?;
        self.set_channel(hal, self.pins.g, color.g)?;
        self.set_channel(hal, self.pins.b, color.b)?;
        debug!("LED color set: R={}, G={}, B={}", color.r, color.g, color.b);
        Ok(())
    }

    /// Turn the LED off.
    pub fn off(&self, hal: &mut Hal) -> Result<(), ApplianceError> {
        self.set_color(hal, LedColor::BLACK)
    }

    /// Map a (role, console state) pair onto the status color scheme
    /// and apply it.
    pub fn set_status(
        &self,
        hal: &mut Hal,
        role: DeviceRole,
        console: ConsoleState,
    ) -> Result<(), ApplianceError> {
        self.set_color(hal, status_color(role, console))
    }

    /// Turn the LED off and release its pins.
    pub fn shutdown(self, hal: &mut Hal) -> Result<(), ApplianceError> {
        self.off(hal)?;
        for pin in [self.pins.r, self.pins.g, self.pins.b] {
            if let Err(e) = hal.gpio_deinit(pin) {
                warn!("LED controller: failed to release pin {pin}: {e}");
            }
        }
        Ok(())
    }

    fn set_channel(&self, hal: &mut Hal, pin: u32, value: u8) -> Result<(), ApplianceError> {
        let level = GpioLevel::from_bool(value > 127);
        hal.gpio_write(pin, level).map_err(|e| {
            warn!("LED controller: failed to write pin {pin}: {e}");
            ApplianceError::from(e)
        })
    }
}

/// Status color scheme.
///
/// Client: console on → white, standby → orange, otherwise off.
/// Server: console on → green, standby → blue, otherwise off.
/// Unknown role → red.
pub fn status_color(role: DeviceRole, console: ConsoleState) -> LedColor {
    match role {
        DeviceRole::Client => match console {
            ConsoleState::On => LedColor::WHITE,
            ConsoleState::Standby => LedColor::ORANGE,
            ConsoleState::Off | ConsoleState::Unknown => LedColor::BLACK,
        },
        DeviceRole::Server => match console {
            ConsoleState::On => LedColor::GREEN,
            ConsoleState::Standby => LedColor::BLUE,
            ConsoleState::Off | ConsoleState::Unknown => LedColor::BLACK,
        },
        DeviceRole::Unknown => LedColor::RED,
    }
}
