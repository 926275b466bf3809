//! HAL backend implementations.
//!
//! This module contains all HAL backend implementations:
//!
//! - [`sysfs`] - Real hardware backend over the kernel GPIO sysfs
//!   interface and an ADC character device
//! - [`mock`] - In-memory simulation backend for deterministic testing
//!
//! # Adding New Backends
//!
//! 1. Create a new submodule under `backends/`
//! 2. Implement the `HalBackend` trait from `gamenet_common::hal::backend`
//! 3. Map a mode string onto it in `create_backend()`

pub mod mock;
pub mod sysfs;

use gamenet_common::hal::backend::{HalBackend, HalError};
use tracing::info;

/// Create a backend instance from a mode string.
///
/// `"real"` binds to the sysfs backend and fails with
/// `HalError::Unavailable` when the GPIO sysfs root is inaccessible;
/// `"mock"` binds to the in-memory simulation. Any other mode fails
/// with `HalError::UnknownMode`.
pub fn create_backend(mode: &str) -> Result<Box<dyn HalBackend>, HalError> {
    match mode {
        "real" => {
            let backend = sysfs::SysfsBackend::new()?;
            info!("HAL backend selected: {}", backend.name());
            Ok(Box::new(backend))
        }
        "mock" => {
            let backend = mock::MockBackend::new();
            info!("HAL backend selected: {}", backend.name());
            Ok(Box::new(backend))
        }
        other => Err(HalError::UnknownMode(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_backend() {
        let backend = create_backend("mock").expect("mock backend always available");
        assert_eq!(backend.name(), "mock");
    }

    #[test]
    fn test_create_unknown_mode() {
        let result = create_backend("simulation");
        assert_eq!(
            result.err(),
            Some(HalError::UnknownMode("simulation".to_string()))
        );
    }

    #[test]
    fn test_create_empty_mode() {
        let result = create_backend("");
        assert_eq!(result.err(), Some(HalError::UnknownMode(String::new())));
    }
}
