//! HAL (Hardware Abstraction Layer) constants.
//!
//! This module contains constants for the hardware abstraction layer,
//! including pin/channel bounds, device paths and the role threshold.

/// Maximum number of GPIO pins addressable through the HAL.
pub const MAX_GPIO_PINS: u32 = 64;

/// Maximum number of PWM channels addressable through the HAL.
pub const MAX_PWM_CHANNELS: u32 = 8;

/// Default ADC character device path.
pub const DEFAULT_ADC_DEVICE: &str = "/dev/ADC";

/// Default GPIO sysfs root used by the real backend.
pub const GPIO_SYSFS_ROOT: &str = "/sys/class/gpio";

/// ADC threshold separating Client from Server hardware.
///
/// Samples strictly below this value identify a Client appliance,
/// samples at or above it a Server appliance. Not configurable at
/// runtime.
pub const ROLE_ADC_THRESHOLD: u16 = 512;

/// Default button input pin.
pub const DEFAULT_PIN_BUTTON: u32 = 16;

/// Default red LED channel pin.
pub const DEFAULT_PIN_LED_R: u32 = 17;

/// Default green LED channel pin.
pub const DEFAULT_PIN_LED_G: u32 = 18;

/// Default blue LED channel pin.
pub const DEFAULT_PIN_LED_B: u32 = 19;
