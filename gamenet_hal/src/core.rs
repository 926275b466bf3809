//! HAL context and dispatch.
//!
//! The `Hal` struct is the entry point for all hardware operations.
//! It owns the active backend (exactly one at a time) and routes every
//! GPIO/ADC/PWM call through it. It replaces a process-wide mutable
//! operations-table pointer with an explicitly passed handle: callers
//! own the context and thread it through all HAL-consuming calls.

use crate::backends::create_backend;
use crate::backends::mock::MockBackend;
use gamenet_common::hal::backend::{HalBackend, HalError};
use gamenet_common::hal::types::{GpioDirection, GpioLevel};
use std::path::Path;
use tracing::{info, warn};

/// HAL context owning the active backend.
///
/// Freshly constructed contexts have no backend; every operation fails
/// with `HalError::NotInitialized` until `init()` succeeds. `cleanup()`
/// drops the backend again and is idempotent.
#[derive(Default)]
pub struct Hal {
    /// Active backend instance, `None` until `init()`.
    backend: Option<Box<dyn HalBackend>>,
}

impl Hal {
    /// Create a context with no active backend.
    pub fn new() -> Self {
        Self { backend: None }
    }

    /// Select and activate a backend from a mode string
    /// ("real" | "mock").
    ///
    /// On failure (unknown mode, backend unavailable) the currently
    /// active backend - if any - is left untouched.
    pub fn init(&mut self, mode: &str) -> Result<(), HalError> {
        let backend = create_backend(mode).inspect_err(|e| {
            warn!("HAL init failed: {e}");
        })?;
        info!("HAL initialized: {}", backend.name());
        self.backend = Some(backend);
        Ok(())
    }

    /// Activate a caller-constructed backend directly.
    ///
    /// Used when the backend needs non-default paths (the binary wires
    /// config overrides through this) and by tests injecting a mock.
    pub fn init_with(&mut self, backend: Box<dyn HalBackend>) {
        info!("HAL initialized: {}", backend.name());
        self.backend = Some(backend);
    }

    /// Drop the active backend. Idempotent.
    pub fn cleanup(&mut self) {
        if self.backend.take().is_some() {
            info!("HAL cleaned up");
        }
    }

    /// Whether a backend is active.
    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    /// Descriptive name of the active backend.
    pub fn impl_name(&self) -> Result<&'static str, HalError> {
        self.backend
            .as_deref()
            .map(|b| b.name())
            .ok_or(HalError::NotInitialized)
    }

    /// Test-only access to the mock backend's introspection surface.
    ///
    /// Returns `None` when no backend is active or the active backend
    /// is not the mock.
    pub fn mock_mut(&mut self) -> Option<&mut MockBackend> {
        self.backend
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<MockBackend>()
    }

    fn backend_mut(&mut self) -> Result<&mut (dyn HalBackend + 'static), HalError> {
        self.backend.as_deref_mut().ok_or(HalError::NotInitialized)
    }

    // ─── Dispatch surface ───────────────────────────────────────

    /// Initialize a GPIO pin with the given direction.
    pub fn gpio_init(&mut self, pin: u32, direction: GpioDirection) -> Result<(), HalError> {
        self.backend_mut()?.gpio_init(pin, direction)
    }

    /// Release a GPIO pin.
    pub fn gpio_deinit(&mut self, pin: u32) -> Result<(), HalError> {
        self.backend_mut()?.gpio_deinit(pin)
    }

    /// Read the current level of a GPIO pin.
    pub fn gpio_read(&mut self, pin: u32) -> Result<GpioLevel, HalError> {
        self.backend_mut()?.gpio_read(pin)
    }

    /// Drive a GPIO output pin to the given level.
    pub fn gpio_write(&mut self, pin: u32, level: GpioLevel) -> Result<(), HalError> {
        self.backend_mut()?.gpio_write(pin, level)
    }

    /// Configure the interrupt edge of a GPIO pin.
    pub fn gpio_set_edge(&mut self, pin: u32, edge: &str) -> Result<(), HalError> {
        self.backend_mut()?.gpio_set_edge(pin, edge)
    }

    /// Read one fixed-width ADC sample, optionally from a non-default
    /// device path.
    pub fn adc_read(&mut self, device: Option<&Path>) -> Result<u16, HalError> {
        self.backend_mut()?.adc_read(device)
    }

    /// Initialize a PWM channel at the given frequency.
    pub fn pwm_init(&mut self, channel: u32, frequency_hz: u32) -> Result<(), HalError> {
        self.backend_mut()?.pwm_init(channel, frequency_hz)
    }

    /// Set the duty cycle of a PWM channel (0-100%).
    pub fn pwm_set_duty(&mut self, channel: u32, duty_percent: u8) -> Result<(), HalError> {
        self.backend_mut()?.pwm_set_duty(channel, duty_percent)
    }

    /// Release a PWM channel.
    pub fn pwm_deinit(&mut self, channel: u32) -> Result<(), HalError> {
        self.backend_mut()?.pwm_deinit(channel)
    }
}
