//! HAL backend trait and error types.
//!
//! This module defines:
//! - `HalBackend` trait - the ten-operation dispatch surface every
//!   backend fills in completely (a trait object cannot be partially
//!   populated, unlike a function-pointer table)
//! - `HalError` enum - backend-level error causes
//!
//! Two backends exist in the workspace: the sysfs-backed real backend
//! and the in-memory mock used for deterministic testing.

use crate::hal::types::{GpioDirection, GpioLevel};
use std::any::Any;
use std::path::Path;
use thiserror::Error;

/// Error causes for HAL backend operations.
///
/// Each precondition violation gets its own variant so that callers
/// and tests can discriminate failure causes instead of collapsing
/// everything into a single generic error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HalError {
    /// No backend is active on the HAL context.
    #[error("HAL not initialized")]
    NotInitialized,

    /// Backend mode string is not recognized.
    #[error("unknown HAL mode '{0}'")]
    UnknownMode(String),

    /// Backend cannot be brought up (e.g. sysfs root missing).
    #[error("HAL backend unavailable: {0}")]
    Unavailable(String),

    /// GPIO pin number out of range.
    #[error("invalid GPIO pin {0}")]
    InvalidPin(u32),

    /// GPIO pin has not been initialized.
    #[error("GPIO pin {0} not initialized")]
    PinNotInitialized(u32),

    /// GPIO pin is not configured as an output.
    #[error("GPIO pin {0} not configured as output")]
    NotOutput(u32),

    /// Edge string is not one of none/rising/falling/both.
    #[error("invalid GPIO edge '{0}'")]
    InvalidEdge(String),

    /// PWM channel number out of range.
    #[error("invalid PWM channel {0}")]
    InvalidChannel(u32),

    /// PWM channel has not been initialized.
    #[error("PWM channel {0} not initialized")]
    ChannelNotInitialized(u32),

    /// PWM frequency must be greater than zero.
    #[error("invalid PWM frequency {0} Hz")]
    InvalidFrequency(u32),

    /// PWM duty cycle outside 0-100%.
    #[error("invalid PWM duty cycle {0}%")]
    InvalidDuty(u8),

    /// ADC is disabled (mock only).
    #[error("ADC disabled")]
    AdcDisabled,

    /// Underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Trait defining the dispatch surface of a HAL backend.
///
/// Exactly one backend is active per HAL context at any time; the
/// context selects it once at startup from a mode string and routes
/// every GPIO/ADC/PWM call through this trait.
///
/// # Failure semantics
///
/// Every operation returns a `HalError` on failure and logs a
/// diagnostic; no operation panics or aborts the process.
pub trait HalBackend: Send {
    /// Returns a fixed descriptive name for the backend.
    fn name(&self) -> &'static str;

    /// Initialize a GPIO pin with the given direction.
    fn gpio_init(&mut self, pin: u32, direction: GpioDirection) -> Result<(), HalError>;

    /// Release a GPIO pin.
    fn gpio_deinit(&mut self, pin: u32) -> Result<(), HalError>;

    /// Read the current level of a GPIO pin.
    fn gpio_read(&mut self, pin: u32) -> Result<GpioLevel, HalError>;

    /// Drive a GPIO output pin to the given level.
    fn gpio_write(&mut self, pin: u32, level: GpioLevel) -> Result<(), HalError>;

    /// Configure the interrupt edge of a GPIO pin.
    ///
    /// The conventional values are "none", "rising", "falling" and
    /// "both". The real backend passes the string through to sysfs
    /// verbatim and trusts the caller; the mock validates strictly.
    fn gpio_set_edge(&mut self, pin: u32, edge: &str) -> Result<(), HalError>;

    /// Read one fixed-width (16-bit) ADC sample.
    ///
    /// `device` overrides the backend's default ADC device path.
    fn adc_read(&mut self, device: Option<&Path>) -> Result<u16, HalError>;

    /// Initialize a PWM channel at the given frequency.
    fn pwm_init(&mut self, channel: u32, frequency_hz: u32) -> Result<(), HalError>;

    /// Set the duty cycle of a PWM channel (0-100%).
    fn pwm_set_duty(&mut self, channel: u32, duty_percent: u8) -> Result<(), HalError>;

    /// Release a PWM channel.
    fn pwm_deinit(&mut self, channel: u32) -> Result<(), HalError>;

    /// Returns the backend as `Any` for test-only downcasting to a
    /// concrete backend type (e.g. the mock's introspection surface).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
