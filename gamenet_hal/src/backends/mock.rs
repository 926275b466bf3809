//! In-memory mock backend for deterministic testing.
//!
//! Simulates GPIO, ADC and PWM state with bounded arrays so tests can
//! run without hardware. Every operation validates bounds first, then
//! state preconditions, then arguments - tests rely on being able to
//! tell these failure causes apart, so the ordering is contractual.
//!
//! The mock additionally exposes an introspection surface (force-set
//! simulated inputs, read back pin state, call counters, atomic reset)
//! that is not part of the `HalBackend` trait.

use gamenet_common::hal::backend::{HalBackend, HalError};
use gamenet_common::hal::consts::{MAX_GPIO_PINS, MAX_PWM_CHANNELS};
use gamenet_common::hal::types::{GpioDirection, GpioLevel};
use std::any::Any;
use std::path::Path;
use tracing::{debug, warn};

/// Simulated per-pin GPIO state.
#[derive(Debug, Clone, Copy)]
struct PinState {
    initialized: bool,
    direction: GpioDirection,
    level: GpioLevel,
    edge: &'static str,
}

impl Default for PinState {
    fn default() -> Self {
        Self {
            initialized: false,
            direction: GpioDirection::Input,
            level: GpioLevel::Low,
            edge: "none",
        }
    }
}

/// Simulated ADC state, settable by test code.
#[derive(Debug, Clone, Copy)]
struct AdcState {
    value: u16,
    enabled: bool,
}

impl Default for AdcState {
    fn default() -> Self {
        Self {
            value: 0,
            enabled: true,
        }
    }
}

/// Simulated per-channel PWM state.
#[derive(Debug, Clone, Copy, Default)]
struct PwmState {
    initialized: bool,
    frequency_hz: u32,
    duty_percent: u8,
}

/// Call counters for verifying interaction counts in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounters {
    /// Number of `gpio_init` calls that reached the mock.
    pub gpio_init: u32,
    /// Number of successful `gpio_read` calls.
    pub gpio_read: u32,
    /// Number of successful `gpio_write` calls.
    pub gpio_write: u32,
    /// Number of successful `adc_read` calls.
    pub adc_read: u32,
    /// Number of `pwm_init` calls that reached the mock.
    pub pwm_init: u32,
}

/// In-memory HAL backend simulating pin/channel state.
#[derive(Debug)]
pub struct MockBackend {
    pins: [PinState; MAX_GPIO_PINS as usize],
    adc: AdcState,
    pwm: [PwmState; MAX_PWM_CHANNELS as usize],
    counters: CallCounters,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a mock backend with all pins/channels uninitialized,
    /// ADC at 0 and enabled, and all counters zeroed.
    pub fn new() -> Self {
        Self {
            pins: [PinState::default(); MAX_GPIO_PINS as usize],
            adc: AdcState::default(),
            pwm: [PwmState::default(); MAX_PWM_CHANNELS as usize],
            counters: CallCounters::default(),
        }
    }

    fn check_pin(pin: u32) -> Result<usize, HalError> {
        if pin < MAX_GPIO_PINS {
            Ok(pin as usize)
        } else {
            warn!("Mock GPIO: invalid pin {pin}");
            Err(HalError::InvalidPin(pin))
        }
    }

    fn check_channel(channel: u32) -> Result<usize, HalError> {
        if channel < MAX_PWM_CHANNELS {
            Ok(channel as usize)
        } else {
            warn!("Mock PWM: invalid channel {channel}");
            Err(HalError::InvalidChannel(channel))
        }
    }

    // ─── Test-only introspection ────────────────────────────────

    /// Force-set the simulated ADC sample returned by `adc_read`.
    pub fn set_adc_value(&mut self, value: u16) {
        debug!("Mock ADC value set to {value}");
        self.adc.value = value;
    }

    /// Enable or disable the simulated ADC.
    pub fn set_adc_enabled(&mut self, enabled: bool) {
        self.adc.enabled = enabled;
    }

    /// Force-set a pin's simulated level, bypassing direction checks.
    ///
    /// Models an external signal arriving at an input pin.
    pub fn inject_pin_level(&mut self, pin: u32, level: GpioLevel) -> Result<(), HalError> {
        let idx = Self::check_pin(pin)?;
        self.pins[idx].level = level;
        debug!("Mock GPIO{pin} level injected: {level:?}");
        Ok(())
    }

    /// Current level of a pin, regardless of its initialization state.
    pub fn pin_level(&self, pin: u32) -> Result<GpioLevel, HalError> {
        let idx = Self::check_pin(pin)?;
        Ok(self.pins[idx].level)
    }

    /// Current direction of a pin.
    pub fn pin_direction(&self, pin: u32) -> Result<GpioDirection, HalError> {
        let idx = Self::check_pin(pin)?;
        Ok(self.pins[idx].direction)
    }

    /// Whether a pin has been initialized. Out-of-range pins report false.
    pub fn pin_initialized(&self, pin: u32) -> bool {
        Self::check_pin(pin)
            .map(|idx| self.pins[idx].initialized)
            .unwrap_or(false)
    }

    /// Configured edge string of a pin.
    pub fn pin_edge(&self, pin: u32) -> Result<&'static str, HalError> {
        let idx = Self::check_pin(pin)?;
        Ok(self.pins[idx].edge)
    }

    /// Duty cycle of an initialized PWM channel.
    pub fn pwm_duty(&self, channel: u32) -> Result<u8, HalError> {
        let idx = Self::check_channel(channel)?;
        if !self.pwm[idx].initialized {
            return Err(HalError::ChannelNotInitialized(channel));
        }
        Ok(self.pwm[idx].duty_percent)
    }

    /// Frequency of an initialized PWM channel.
    pub fn pwm_frequency(&self, channel: u32) -> Result<u32, HalError> {
        let idx = Self::check_channel(channel)?;
        if !self.pwm[idx].initialized {
            return Err(HalError::ChannelNotInitialized(channel));
        }
        Ok(self.pwm[idx].frequency_hz)
    }

    /// Snapshot of the call counters.
    pub fn counters(&self) -> CallCounters {
        self.counters
    }

    /// Restore every pin, the ADC, every PWM channel and all counters
    /// to their initial values in one step. Intended to run between
    /// test cases.
    pub fn reset(&mut self) {
        debug!("Mock HAL reset");
        self.pins = [PinState::default(); MAX_GPIO_PINS as usize];
        self.adc = AdcState::default();
        self.pwm = [PwmState::default(); MAX_PWM_CHANNELS as usize];
        self.counters = CallCounters::default();
    }
}

impl HalBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn gpio_init(&mut self, pin: u32, direction: GpioDirection) -> Result<(), HalError> {
        let idx = Self::check_pin(pin)?;

        self.pins[idx] = PinState {
            initialized: true,
            direction,
            level: GpioLevel::Low,
            edge: "none",
        };
        self.counters.gpio_init += 1;

        debug!("Mock GPIO{pin} initialized as {direction:?}");
        Ok(())
    }

    fn gpio_deinit(&mut self, pin: u32) -> Result<(), HalError> {
        let idx = Self::check_pin(pin)?;
        if !self.pins[idx].initialized {
            warn!("Mock GPIO: pin {pin} not initialized");
            return Err(HalError::PinNotInitialized(pin));
        }

        self.pins[idx] = PinState::default();
        debug!("Mock GPIO{pin} deinitialized");
        Ok(())
    }

    fn gpio_read(&mut self, pin: u32) -> Result<GpioLevel, HalError> {
        let idx = Self::check_pin(pin)?;
        if !self.pins[idx].initialized {
            warn!("Mock GPIO: pin {pin} not initialized");
            return Err(HalError::PinNotInitialized(pin));
        }

        self.counters.gpio_read += 1;
        debug!("Mock GPIO{pin} read: {:?}", self.pins[idx].level);
        Ok(self.pins[idx].level)
    }

    fn gpio_write(&mut self, pin: u32, level: GpioLevel) -> Result<(), HalError> {
        let idx = Self::check_pin(pin)?;
        if !self.pins[idx].initialized {
            warn!("Mock GPIO: pin {pin} not initialized");
            return Err(HalError::PinNotInitialized(pin));
        }
        if self.pins[idx].direction != GpioDirection::Output {
            warn!("Mock GPIO: pin {pin} not configured as output");
            return Err(HalError::NotOutput(pin));
        }

        self.pins[idx].level = level;
        self.counters.gpio_write += 1;
        debug!("Mock GPIO{pin} write: {level:?}");
        Ok(())
    }

    fn gpio_set_edge(&mut self, pin: u32, edge: &str) -> Result<(), HalError> {
        let idx = Self::check_pin(pin)?;
        if !self.pins[idx].initialized {
            warn!("Mock GPIO: pin {pin} not initialized");
            return Err(HalError::PinNotInitialized(pin));
        }

        // Exactly the four sysfs literals, case-sensitive. Stricter
        // than the real backend, which trusts the caller.
        let edge_static = match edge {
            "none" => "none",
            "rising" => "rising",
            "falling" => "falling",
            "both" => "both",
            other => {
                warn!("Mock GPIO: invalid edge type '{other}'");
                return Err(HalError::InvalidEdge(other.to_string()));
            }
        };

        self.pins[idx].edge = edge_static;
        debug!("Mock GPIO{pin} edge set to {edge_static}");
        Ok(())
    }

    fn adc_read(&mut self, _device: Option<&Path>) -> Result<u16, HalError> {
        if !self.adc.enabled {
            warn!("Mock ADC: disabled");
            return Err(HalError::AdcDisabled);
        }

        self.counters.adc_read += 1;
        debug!("Mock ADC read: {}", self.adc.value);
        Ok(self.adc.value)
    }

    fn pwm_init(&mut self, channel: u32, frequency_hz: u32) -> Result<(), HalError> {
        let idx = Self::check_channel(channel)?;
        if frequency_hz == 0 {
            warn!("Mock PWM: invalid frequency {frequency_hz}");
            return Err(HalError::InvalidFrequency(frequency_hz));
        }

        self.pwm[idx] = PwmState {
            initialized: true,
            frequency_hz,
            duty_percent: 0,
        };
        self.counters.pwm_init += 1;

        debug!("Mock PWM{channel} initialized at {frequency_hz} Hz");
        Ok(())
    }

    fn pwm_set_duty(&mut self, channel: u32, duty_percent: u8) -> Result<(), HalError> {
        let idx = Self::check_channel(channel)?;
        if !self.pwm[idx].initialized {
            warn!("Mock PWM: channel {channel} not initialized");
            return Err(HalError::ChannelNotInitialized(channel));
        }
        if duty_percent > 100 {
            warn!("Mock PWM: invalid duty cycle {duty_percent}%");
            return Err(HalError::InvalidDuty(duty_percent));
        }

        self.pwm[idx].duty_percent = duty_percent;
        debug!("Mock PWM{channel} duty set to {duty_percent}%");
        Ok(())
    }

    fn pwm_deinit(&mut self, channel: u32) -> Result<(), HalError> {
        let idx = Self::check_channel(channel)?;
        if !self.pwm[idx].initialized {
            warn!("Mock PWM: channel {channel} not initialized");
            return Err(HalError::ChannelNotInitialized(channel));
        }

        self.pwm[idx] = PwmState::default();
        debug!("Mock PWM{channel} deinitialized");
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
