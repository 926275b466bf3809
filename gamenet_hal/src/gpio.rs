//! GPIO convenience wrapper over the HAL contract.
//!
//! Thin helpers for the common pin setups (plain output, plain input,
//! input with an interrupt edge) and read/write/toggle access. Backend
//! error causes are collapsed into the appliance taxonomy; a
//! diagnostic is logged at the point of failure and the error is
//! returned, never retried.

use crate::core::Hal;
use gamenet_common::error::ApplianceError;
use gamenet_common::hal::types::{GpioDirection, GpioLevel};
use tracing::warn;

/// Configure a pin as an output.
pub fn init_output(hal: &mut Hal, pin: u32) -> Result<(), ApplianceError> {
    hal.gpio_init(pin, GpioDirection::Output).map_err(|e| {
        warn!("Failed to init GPIO{pin} as output: {e}");
        e.into()
    })
}

/// Configure a pin as an input.
pub fn init_input(hal: &mut Hal, pin: u32) -> Result<(), ApplianceError> {
    hal.gpio_init(pin, GpioDirection::Input).map_err(|e| {
        warn!("Failed to init GPIO{pin} as input: {e}");
        e.into()
    })
}

/// Configure a pin as an input with an interrupt edge
/// ("none" | "rising" | "falling" | "both").
pub fn init_input_with_edge(hal: &mut Hal, pin: u32, edge: &str) -> Result<(), ApplianceError> {
    init_input(hal, pin)?;

    hal.gpio_set_edge(pin, edge).map_err(|e| {
        warn!("Failed to set GPIO{pin} edge: {e}");
        e.into()
    })
}

/// Read a pin, mapping the level to a boolean (High → true).
pub fn read(hal: &mut Hal, pin: u32) -> Result<bool, ApplianceError> {
    let level = hal.gpio_read(pin).map_err(|e| {
        warn!("Failed to read GPIO{pin}: {e}");
        ApplianceError::from(e)
    })?;
    Ok(level == GpioLevel::High)
}

/// Drive a pin from a boolean (true → High).
pub fn write(hal: &mut Hal, pin: u32, high: bool) -> Result<(), ApplianceError> {
    hal.gpio_write(pin, GpioLevel::from_bool(high)).map_err(|e| {
        warn!("Failed to write GPIO{pin}: {e}");
        e.into()
    })
}

/// Invert the current level of a pin (read-modify-write).
pub fn toggle(hal: &mut Hal, pin: u32) -> Result<(), ApplianceError> {
    let current = read(hal, pin)?;
    write(hal, pin, !current)
}

/// Release a pin.
pub fn release(hal: &mut Hal, pin: u32) -> Result<(), ApplianceError> {
    hal.gpio_deinit(pin).map_err(|e| {
        warn!("Failed to release GPIO{pin}: {e}");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamenet_common::hal::backend::HalError;

    fn mock_hal() -> Hal {
        let mut hal = Hal::new();
        hal.init("mock").unwrap();
        hal
    }

    #[test]
    fn test_output_write_read_round_trip() {
        let mut hal = mock_hal();
        init_output(&mut hal, 5).unwrap();

        write(&mut hal, 5, true).unwrap();
        assert!(read(&mut hal, 5).unwrap());

        write(&mut hal, 5, false).unwrap();
        assert!(!read(&mut hal, 5).unwrap());
    }

    #[test]
    fn test_toggle() {
        let mut hal = mock_hal();
        init_output(&mut hal, 6).unwrap();

        toggle(&mut hal, 6).unwrap();
        assert!(read(&mut hal, 6).unwrap());
        toggle(&mut hal, 6).unwrap();
        assert!(!read(&mut hal, 6).unwrap());
    }

    #[test]
    fn test_input_with_edge() {
        let mut hal = mock_hal();
        init_input_with_edge(&mut hal, 7, "falling").unwrap();
        assert_eq!(hal.mock_mut().unwrap().pin_edge(7).unwrap(), "falling");
    }

    #[test]
    fn test_bad_edge_collapses_to_hal_failure() {
        let mut hal = mock_hal();
        let result = init_input_with_edge(&mut hal, 7, "sideways");
        assert_eq!(
            result,
            Err(ApplianceError::HalFailure(HalError::InvalidEdge(
                "sideways".to_string()
            )))
        );
    }

    #[test]
    fn test_uninitialized_hal_fails_fast() {
        let mut hal = Hal::new();
        assert_eq!(
            init_output(&mut hal, 1),
            Err(ApplianceError::NotInitialized)
        );
        assert_eq!(read(&mut hal, 1), Err(ApplianceError::NotInitialized));
        assert_eq!(
            write(&mut hal, 1, true),
            Err(ApplianceError::NotInitialized)
        );
    }

    #[test]
    fn test_release() {
        let mut hal = mock_hal();
        init_output(&mut hal, 8).unwrap();
        release(&mut hal, 8).unwrap();
        assert!(!hal.mock_mut().unwrap().pin_initialized(8));
    }
}
