//! ADC-based device-role detection.
//!
//! The appliance boots as Client or Server depending on an analog
//! voltage sampled at startup: samples strictly below
//! `ROLE_ADC_THRESHOLD` (512) identify a Client, samples at or above
//! it a Server. The detected role is cached in a single in-memory
//! slot so consumers can query it repeatedly without re-triggering
//! ADC traffic. The cache is lost on process restart.

use crate::core::Hal;
use gamenet_common::error::ApplianceError;
use gamenet_common::hal::backend::HalError;
use gamenet_common::hal::consts::{DEFAULT_ADC_DEVICE, ROLE_ADC_THRESHOLD};
use gamenet_common::hal::types::DeviceRole;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Device-role detector with a single-slot role cache.
///
/// Must be initialized against an active HAL context before use;
/// "detector not initialized" is reported distinctly from
/// "initialized but cache empty" (the latter reads as `Unknown`).
#[derive(Debug)]
pub struct RoleDetector {
    initialized: bool,
    cache: DeviceRole,
    default_device: PathBuf,
}

impl Default for RoleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleDetector {
    /// Create an uninitialized detector using the compiled-in default
    /// ADC device path.
    pub fn new() -> Self {
        Self::with_device(DEFAULT_ADC_DEVICE)
    }

    /// Create an uninitialized detector with an explicit default ADC
    /// device path.
    pub fn with_device(device: impl Into<PathBuf>) -> Self {
        Self {
            initialized: false,
            cache: DeviceRole::Unknown,
            default_device: device.into(),
        }
    }

    /// Initialize the detector. Requires an active HAL context.
    ///
    /// Calling init on an already-initialized detector is a no-op.
    pub fn init(&mut self, hal: &Hal) -> Result<(), ApplianceError> {
        if self.initialized {
            debug!("Role detector already initialized");
            return Ok(());
        }
        if !hal.is_initialized() {
            warn!("Role detector init: HAL not initialized");
            return Err(ApplianceError::HalFailure(HalError::NotInitialized));
        }

        self.initialized = true;
        self.cache = DeviceRole::Unknown;
        debug!("Role detector initialized");
        Ok(())
    }

    /// Clear the cache and mark the detector uninitialized.
    pub fn cleanup(&mut self) {
        if !self.initialized {
            return;
        }
        self.cache = DeviceRole::Unknown;
        self.initialized = false;
        debug!("Role detector cleaned up");
    }

    /// Read a raw ADC sample (expected range 0-1023).
    ///
    /// Uses `device` when supplied, the detector's default path
    /// otherwise. Errors distinguish "detector not initialized" from
    /// "HAL not initialized" from "I/O failure".
    pub fn read_raw(
        &self,
        hal: &mut Hal,
        device: Option<&Path>,
    ) -> Result<u16, ApplianceError> {
        if !self.initialized {
            warn!("Role detector not initialized");
            return Err(ApplianceError::NotInitialized);
        }

        let adc_device = device.unwrap_or(&self.default_device);
        match hal.adc_read(Some(adc_device)) {
            Ok(sample) => {
                debug!("ADC sample {sample} from {:?}", adc_device);
                Ok(sample)
            }
            Err(HalError::NotInitialized) => {
                warn!("Role detector: HAL not initialized");
                Err(ApplianceError::HalFailure(HalError::NotInitialized))
            }
            Err(e) => {
                warn!("Role detector: ADC read from {:?} failed: {e}", adc_device);
                Err(ApplianceError::IoFailure(e.to_string()))
            }
        }
    }

    /// Detect the device role from a fresh ADC sample and cache it.
    ///
    /// Samples strictly below the threshold map to Client, samples at
    /// or above it to Server. On read failure the detector reports
    /// `Unknown` and leaves the cache untouched; the underlying error
    /// cause is deliberately not propagated at this layer.
    pub fn detect(&mut self, hal: &mut Hal) -> DeviceRole {
        let sample = match self.read_raw(hal, None) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Role detection failed: {e}");
                return DeviceRole::Unknown;
            }
        };

        let role = if sample < ROLE_ADC_THRESHOLD {
            DeviceRole::Client
        } else {
            DeviceRole::Server
        };
        info!("Detected {role} device (ADC={sample}, threshold={ROLE_ADC_THRESHOLD})");

        self.cache = role;
        role
    }

    /// Cache a role explicitly. Only Client and Server are accepted;
    /// the cache never knowingly stores Unknown as a measurement.
    pub fn cache_role(&mut self, hal: &Hal, role: DeviceRole) -> Result<(), ApplianceError> {
        if !self.initialized {
            warn!("Role detector not initialized");
            return Err(ApplianceError::NotInitialized);
        }
        if !hal.is_initialized() {
            warn!("Role detector: HAL not initialized");
            return Err(ApplianceError::HalFailure(HalError::NotInitialized));
        }
        if role == DeviceRole::Unknown {
            warn!("Refusing to cache Unknown role");
            return Err(ApplianceError::InvalidParameter(
                "cannot cache Unknown role".to_string(),
            ));
        }

        self.cache = role;
        debug!("Cached device role: {role}");
        Ok(())
    }

    /// Cached role without touching hardware.
    ///
    /// Returns `Unknown` when the cache is empty, cleared, or the
    /// detector is not initialized. This is the fast-path query
    /// expected to be called repeatedly.
    pub fn cached_role(&self) -> DeviceRole {
        if !self.initialized {
            debug!("Role detector not initialized, reporting Unknown");
            return DeviceRole::Unknown;
        }
        self.cache
    }

    /// Reset the cache slot to `Unknown`.
    pub fn clear_cache(&mut self) {
        if !self.initialized {
            return;
        }
        self.cache = DeviceRole::Unknown;
        debug!("Role cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// HAL context with an active mock backend at the given ADC value.
    fn mock_hal(adc_value: u16) -> Hal {
        let mut hal = Hal::new();
        hal.init("mock").unwrap();
        hal.mock_mut().unwrap().set_adc_value(adc_value);
        hal
    }

    fn initialized_detector(hal: &Hal) -> RoleDetector {
        let mut detector = RoleDetector::new();
        detector.init(hal).unwrap();
        detector
    }

    #[test]
    fn test_detect_below_threshold_is_client() {
        for sample in [0u16, 1, 256, 511] {
            let mut hal = mock_hal(sample);
            let mut detector = initialized_detector(&hal);
            assert_eq!(
                detector.detect(&mut hal),
                DeviceRole::Client,
                "sample {sample} must detect Client"
            );
        }
    }

    #[test]
    fn test_detect_at_or_above_threshold_is_server() {
        for sample in [512u16, 513, 768, 1023] {
            let mut hal = mock_hal(sample);
            let mut detector = initialized_detector(&hal);
            assert_eq!(
                detector.detect(&mut hal),
                DeviceRole::Server,
                "sample {sample} must detect Server"
            );
        }
    }

    #[test]
    fn test_detect_caches_result() {
        let mut hal = mock_hal(256);
        let mut detector = initialized_detector(&hal);

        assert_eq!(detector.cached_role(), DeviceRole::Unknown);
        detector.detect(&mut hal);
        assert_eq!(detector.cached_role(), DeviceRole::Client);

        // Cache query does not touch hardware.
        let reads_before = hal.mock_mut().unwrap().counters().adc_read;
        detector.cached_role();
        detector.cached_role();
        assert_eq!(hal.mock_mut().unwrap().counters().adc_read, reads_before);
    }

    #[test]
    fn test_detect_overwrites_previous_cache() {
        let mut hal = mock_hal(256);
        let mut detector = initialized_detector(&hal);
        detector.detect(&mut hal);
        assert_eq!(detector.cached_role(), DeviceRole::Client);

        hal.mock_mut().unwrap().set_adc_value(900);
        assert_eq!(detector.detect(&mut hal), DeviceRole::Server);
        assert_eq!(detector.cached_role(), DeviceRole::Server);
    }

    #[test]
    fn test_detect_failure_returns_unknown_and_keeps_cache() {
        let mut hal = mock_hal(256);
        let mut detector = initialized_detector(&hal);
        detector.detect(&mut hal);
        assert_eq!(detector.cached_role(), DeviceRole::Client);

        hal.mock_mut().unwrap().set_adc_enabled(false);
        assert_eq!(detector.detect(&mut hal), DeviceRole::Unknown);
        // Prior cache value untouched: cache is written only on success.
        assert_eq!(detector.cached_role(), DeviceRole::Client);
    }

    #[test]
    fn test_read_raw_error_causes_are_distinct() {
        // Detector not initialized.
        let mut hal = mock_hal(100);
        let detector = RoleDetector::new();
        assert_eq!(
            detector.read_raw(&mut hal, None),
            Err(ApplianceError::NotInitialized)
        );

        // HAL not initialized.
        let mut empty_hal = Hal::new();
        let detector = initialized_detector(&hal);
        assert_eq!(
            detector.read_raw(&mut empty_hal, None),
            Err(ApplianceError::HalFailure(HalError::NotInitialized))
        );

        // I/O failure.
        hal.mock_mut().unwrap().set_adc_enabled(false);
        assert!(matches!(
            detector.read_raw(&mut hal, None),
            Err(ApplianceError::IoFailure(_))
        ));
    }

    #[test]
    fn test_cache_role_round_trip() {
        let hal = mock_hal(0);
        let mut detector = initialized_detector(&hal);

        detector.cache_role(&hal, DeviceRole::Client).unwrap();
        assert_eq!(detector.cached_role(), DeviceRole::Client);

        detector.cache_role(&hal, DeviceRole::Server).unwrap();
        assert_eq!(detector.cached_role(), DeviceRole::Server);
    }

    #[test]
    fn test_cache_role_rejects_unknown() {
        let hal = mock_hal(0);
        let mut detector = initialized_detector(&hal);
        detector.cache_role(&hal, DeviceRole::Server).unwrap();

        let result = detector.cache_role(&hal, DeviceRole::Unknown);
        assert!(matches!(result, Err(ApplianceError::InvalidParameter(_))));
        // Prior cached value unaltered.
        assert_eq!(detector.cached_role(), DeviceRole::Server);
    }

    #[test]
    fn test_cache_role_requires_active_hal() {
        let mut hal = mock_hal(0);
        let mut detector = initialized_detector(&hal);

        hal.cleanup();
        assert_eq!(
            detector.cache_role(&hal, DeviceRole::Client),
            Err(ApplianceError::HalFailure(HalError::NotInitialized))
        );
    }

    #[test]
    fn test_clear_cache() {
        let mut hal = mock_hal(700);
        let mut detector = initialized_detector(&hal);
        detector.detect(&mut hal);
        assert_eq!(detector.cached_role(), DeviceRole::Server);

        detector.clear_cache();
        assert_eq!(detector.cached_role(), DeviceRole::Unknown);
    }

    #[test]
    fn test_uninitialized_detector_reports_unknown() {
        let detector = RoleDetector::new();
        assert_eq!(detector.cached_role(), DeviceRole::Unknown);
    }

    #[test]
    fn test_init_requires_active_hal() {
        let hal = Hal::new();
        let mut detector = RoleDetector::new();
        assert_eq!(
            detector.init(&hal),
            Err(ApplianceError::HalFailure(HalError::NotInitialized))
        );
    }

    #[test]
    fn test_cleanup_clears_cache_and_init_state() {
        let mut hal = mock_hal(100);
        let mut detector = initialized_detector(&hal);
        detector.detect(&mut hal);

        detector.cleanup();
        assert_eq!(detector.cached_role(), DeviceRole::Unknown);
        assert_eq!(
            detector.read_raw(&mut hal, None),
            Err(ApplianceError::NotInitialized)
        );
    }
}
