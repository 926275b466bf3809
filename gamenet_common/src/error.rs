//! Appliance-level error taxonomy.
//!
//! Mid-level components (role detector, GPIO wrapper, LED controller)
//! collapse backend-specific `HalError` causes into this small stable
//! set. They log a human-readable diagnostic at the point of failure
//! and never retry; failure is always a returned value.

use crate::hal::backend::HalError;
use thiserror::Error;

/// Appliance-level error conditions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplianceError {
    /// The component (or the HAL beneath it) has not been initialized.
    #[error("not initialized")]
    NotInitialized,

    /// A caller-supplied parameter is invalid.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The HAL backend rejected or failed the operation.
    #[error("HAL backend failure: {0}")]
    HalFailure(HalError),

    /// An I/O operation failed.
    #[error("I/O failure: {0}")]
    IoFailure(String),
}

impl From<HalError> for ApplianceError {
    /// Collapse a backend error into the appliance taxonomy.
    ///
    /// `NotInitialized` and I/O causes keep their identity; every
    /// other backend cause becomes `HalFailure`.
    fn from(err: HalError) -> Self {
        match err {
            HalError::NotInitialized => ApplianceError::NotInitialized,
            HalError::Io(msg) => ApplianceError::IoFailure(msg),
            other => ApplianceError::HalFailure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_not_initialized() {
        let err: ApplianceError = HalError::NotInitialized.into();
        assert_eq!(err, ApplianceError::NotInitialized);
    }

    #[test]
    fn test_collapse_io() {
        let err: ApplianceError = HalError::Io("short read".to_string()).into();
        assert_eq!(err, ApplianceError::IoFailure("short read".to_string()));
    }

    #[test]
    fn test_collapse_backend_cause() {
        let err: ApplianceError = HalError::InvalidPin(77).into();
        assert_eq!(err, ApplianceError::HalFailure(HalError::InvalidPin(77)));
    }
}
