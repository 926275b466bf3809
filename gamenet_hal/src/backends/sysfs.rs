//! Real hardware backend over the kernel GPIO sysfs interface.
//!
//! GPIO pins are driven through the export/direction/value/edge
//! pseudo-files under the sysfs root; the ADC is a character device
//! yielding one fixed-width 16-bit sample per read.
//!
//! PWM is a documented simplification: there is no waveform
//! generation. `pwm_init` configures the pin as a plain GPIO output
//! and `pwm_set_duty` maps duty cycles above 50% to High and
//! everything else to Low.
//!
//! The sysfs root, ADC device and export settle delay are
//! constructor-injectable so tests can point the backend at a
//! tempdir.

use gamenet_common::hal::backend::{HalBackend, HalError};
use gamenet_common::hal::consts::{DEFAULT_ADC_DEVICE, GPIO_SYSFS_ROOT};
use gamenet_common::hal::types::{GpioDirection, GpioLevel};
use std::any::Any;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Delay between exporting a pin and touching its pseudo-files,
/// giving the kernel time to populate the pin directory.
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Sysfs-backed HAL backend for real hardware.
#[derive(Debug)]
pub struct SysfsBackend {
    sysfs_root: PathBuf,
    adc_device: PathBuf,
    settle_delay: Duration,
}

impl SysfsBackend {
    /// Create a backend bound to the default sysfs root and ADC device.
    ///
    /// # Errors
    /// Returns `HalError::Unavailable` if the GPIO sysfs root is not
    /// mounted or accessible.
    pub fn new() -> Result<Self, HalError> {
        Self::with_paths(GPIO_SYSFS_ROOT, DEFAULT_ADC_DEVICE)
    }

    /// Create a backend bound to explicit sysfs root and ADC device
    /// paths.
    ///
    /// # Errors
    /// Returns `HalError::Unavailable` if `sysfs_root` is not an
    /// accessible directory.
    pub fn with_paths(
        sysfs_root: impl Into<PathBuf>,
        adc_device: impl Into<PathBuf>,
    ) -> Result<Self, HalError> {
        let sysfs_root = sysfs_root.into();
        if !sysfs_root.is_dir() {
            warn!("GPIO sysfs root {:?} not accessible", sysfs_root);
            return Err(HalError::Unavailable(format!(
                "GPIO sysfs root {sysfs_root:?} not accessible"
            )));
        }

        Ok(Self {
            sysfs_root,
            adc_device: adc_device.into(),
            settle_delay: EXPORT_SETTLE_DELAY,
        })
    }

    /// Override the export settle delay (tests use zero).
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    fn pin_dir(&self, pin: u32) -> PathBuf {
        self.sysfs_root.join(format!("gpio{pin}"))
    }

    fn pin_file(&self, pin: u32, name: &str) -> PathBuf {
        self.pin_dir(pin).join(name)
    }

    fn export(&self, pin: u32) -> Result<(), HalError> {
        let export_path = self.sysfs_root.join("export");
        if let Err(e) = fs::write(&export_path, pin.to_string()) {
            // An already-exported pin makes the export write fail;
            // that is not an error as long as the pin directory is
            // there.
            if self.pin_dir(pin).is_dir() {
                debug!("GPIO {pin} already exported");
                return Ok(());
            }
            warn!("Failed to export GPIO {pin}: {e}");
            return Err(HalError::Io(format!("export GPIO {pin}: {e}")));
        }
        Ok(())
    }

    fn unexport(&self, pin: u32) -> Result<(), HalError> {
        let unexport_path = self.sysfs_root.join("unexport");
        fs::write(&unexport_path, pin.to_string()).map_err(|e| {
            warn!("Failed to unexport GPIO {pin}: {e}");
            HalError::Io(format!("unexport GPIO {pin}: {e}"))
        })
    }
}

impl HalBackend for SysfsBackend {
    fn name(&self) -> &'static str {
        "real-sysfs"
    }

    fn gpio_init(&mut self, pin: u32, direction: GpioDirection) -> Result<(), HalError> {
        debug!("Initializing GPIO {pin} as {direction:?}");

        self.export(pin)?;

        // Give sysfs time to create the pin's pseudo-files.
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }

        let direction_path = self.pin_file(pin, "direction");
        if let Err(e) = fs::write(&direction_path, direction.as_sysfs_str()) {
            warn!("Failed to set GPIO {pin} direction: {e}");
            // Cleanup on partial failure.
            let _ = self.unexport(pin);
            return Err(HalError::Io(format!("set GPIO {pin} direction: {e}")));
        }

        Ok(())
    }

    fn gpio_deinit(&mut self, pin: u32) -> Result<(), HalError> {
        debug!("Deinitializing GPIO {pin}");
        self.unexport(pin)
    }

    fn gpio_read(&mut self, pin: u32) -> Result<GpioLevel, HalError> {
        let value_path = self.pin_file(pin, "value");
        let content = fs::read(&value_path).map_err(|e| {
            warn!("Failed to read GPIO {pin}: {e}");
            HalError::Io(format!("read GPIO {pin}: {e}"))
        })?;

        let level = match content.first() {
            Some(b'0') => GpioLevel::Low,
            Some(_) => GpioLevel::High,
            None => {
                warn!("Empty read from GPIO {pin} value file");
                return Err(HalError::Io(format!("empty read from GPIO {pin}")));
            }
        };

        debug!("GPIO {pin} read: {level:?}");
        Ok(level)
    }

    fn gpio_write(&mut self, pin: u32, level: GpioLevel) -> Result<(), HalError> {
        let value_path = self.pin_file(pin, "value");
        fs::write(&value_path, [level.as_sysfs_byte()]).map_err(|e| {
            warn!("Failed to write GPIO {pin}: {e}");
            HalError::Io(format!("write GPIO {pin}: {e}"))
        })?;

        debug!("GPIO {pin} write: {level:?}");
        Ok(())
    }

    fn gpio_set_edge(&mut self, pin: u32, edge: &str) -> Result<(), HalError> {
        // Written verbatim; the kernel rejects bad values itself.
        let edge_path = self.pin_file(pin, "edge");
        fs::write(&edge_path, edge).map_err(|e| {
            warn!("Failed to set GPIO {pin} edge: {e}");
            HalError::Io(format!("set GPIO {pin} edge: {e}"))
        })?;

        debug!("GPIO {pin} edge set to {edge}");
        Ok(())
    }

    fn adc_read(&mut self, device: Option<&Path>) -> Result<u16, HalError> {
        let adc_path = device.unwrap_or(&self.adc_device);
        debug!("Reading ADC from {:?}", adc_path);

        let mut file = File::open(adc_path).map_err(|e| {
            warn!("Failed to open ADC device {:?}: {e}", adc_path);
            HalError::Io(format!("open ADC device {adc_path:?}: {e}"))
        })?;

        let mut sample = [0u8; 2];
        file.read_exact(&mut sample).map_err(|e| {
            warn!("Failed to read ADC sample: {e}");
            HalError::Io(format!("read ADC sample: {e}"))
        })?;

        let value = u16::from_ne_bytes(sample);
        debug!("ADC value read: {value}");
        Ok(value)
    }

    fn pwm_init(&mut self, channel: u32, frequency_hz: u32) -> Result<(), HalError> {
        debug!("Initializing PWM on GPIO {channel} ({frequency_hz} Hz)");

        // Software PWM is not implemented; the pin becomes a plain
        // on/off output and the requested frequency is ignored.
        self.gpio_init(channel, GpioDirection::Output)?;
        warn!("Software PWM not implemented; GPIO {channel} uses on/off control");
        Ok(())
    }

    fn pwm_set_duty(&mut self, channel: u32, duty_percent: u8) -> Result<(), HalError> {
        let duty = duty_percent.min(100);
        debug!("Setting PWM duty on GPIO {channel} to {duty}%");

        // Binary approximation: above 50% the pin is High, otherwise Low.
        let level = if duty > 50 {
            GpioLevel::High
        } else {
            GpioLevel::Low
        };
        self.gpio_write(channel, level)
    }

    fn pwm_deinit(&mut self, channel: u32) -> Result<(), HalError> {
        debug!("Deinitializing PWM on GPIO {channel}");

        if let Err(e) = self.gpio_write(channel, GpioLevel::Low) {
            debug!("Could not drive GPIO {channel} low before release: {e}");
        }
        self.gpio_deinit(channel)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Build a fake sysfs tree with export/unexport pseudo-files.
    fn fake_sysfs() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("export"), "").unwrap();
        fs::write(dir.path().join("unexport"), "").unwrap();
        dir
    }

    /// Create the pin directory with empty pseudo-files, as the
    /// kernel would after an export.
    fn fake_pin(dir: &TempDir, pin: u32) {
        let pin_dir = dir.path().join(format!("gpio{pin}"));
        fs::create_dir(&pin_dir).unwrap();
        for name in ["direction", "value", "edge"] {
            fs::write(pin_dir.join(name), "").unwrap();
        }
    }

    fn backend(dir: &TempDir) -> SysfsBackend {
        SysfsBackend::with_paths(dir.path(), dir.path().join("adc"))
            .unwrap()
            .with_settle_delay(Duration::ZERO)
    }

    #[test]
    fn test_missing_root_is_unavailable() {
        let result = SysfsBackend::with_paths("/nonexistent/gpio/root", "/dev/ADC");
        assert!(matches!(result, Err(HalError::Unavailable(_))));
    }

    #[test]
    fn test_gpio_init_writes_direction() {
        let dir = fake_sysfs();
        fake_pin(&dir, 5);
        let mut backend = backend(&dir);

        backend.gpio_init(5, GpioDirection::Output).unwrap();
        let direction = fs::read_to_string(dir.path().join("gpio5/direction")).unwrap();
        assert_eq!(direction, "out");

        backend.gpio_init(5, GpioDirection::Input).unwrap();
        let direction = fs::read_to_string(dir.path().join("gpio5/direction")).unwrap();
        assert_eq!(direction, "in");
    }

    #[test]
    fn test_gpio_init_tolerates_already_exported() {
        let dir = fake_sysfs();
        fake_pin(&dir, 5);
        // Make the export write fail: the pin directory already
        // exists, so init proceeds anyway.
        fs::remove_file(dir.path().join("export")).unwrap();
        fs::create_dir(dir.path().join("export")).unwrap();

        let mut backend = backend(&dir);
        backend.gpio_init(5, GpioDirection::Output).unwrap();
    }

    #[test]
    fn test_gpio_init_unexports_on_direction_failure() {
        let dir = fake_sysfs();
        // Pin directory never appears, so the direction write fails.
        let mut backend = backend(&dir);

        let result = backend.gpio_init(9, GpioDirection::Output);
        assert!(matches!(result, Err(HalError::Io(_))));

        // Cleanup on partial failure: the pin was unexported.
        let unexported = fs::read_to_string(dir.path().join("unexport")).unwrap();
        assert_eq!(unexported, "9");
    }

    #[test]
    fn test_gpio_read_maps_value_byte() {
        let dir = fake_sysfs();
        fake_pin(&dir, 3);
        let mut backend = backend(&dir);

        fs::write(dir.path().join("gpio3/value"), "0\n").unwrap();
        assert_eq!(backend.gpio_read(3).unwrap(), GpioLevel::Low);

        fs::write(dir.path().join("gpio3/value"), "1\n").unwrap();
        assert_eq!(backend.gpio_read(3).unwrap(), GpioLevel::High);
    }

    #[test]
    fn test_gpio_read_missing_pin_fails() {
        let dir = fake_sysfs();
        let mut backend = backend(&dir);
        assert!(matches!(backend.gpio_read(42), Err(HalError::Io(_))));
    }

    #[test]
    fn test_gpio_write_value_byte() {
        let dir = fake_sysfs();
        fake_pin(&dir, 3);
        let mut backend = backend(&dir);

        backend.gpio_write(3, GpioLevel::High).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("gpio3/value")).unwrap(),
            "1"
        );

        backend.gpio_write(3, GpioLevel::Low).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("gpio3/value")).unwrap(),
            "0"
        );
    }

    #[test]
    fn test_edge_written_verbatim() {
        let dir = fake_sysfs();
        fake_pin(&dir, 7);
        let mut backend = backend(&dir);

        backend.gpio_set_edge(7, "rising").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("gpio7/edge")).unwrap(),
            "rising"
        );

        // The real backend trusts the caller; no validation.
        backend.gpio_set_edge(7, "Rising or whatever").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("gpio7/edge")).unwrap(),
            "Rising or whatever"
        );
    }

    #[test]
    fn test_adc_reads_fixed_width_sample() {
        let dir = fake_sysfs();
        let mut backend = backend(&dir);

        fs::write(dir.path().join("adc"), 300u16.to_ne_bytes()).unwrap();
        assert_eq!(backend.adc_read(None).unwrap(), 300);

        // Caller-supplied path overrides the default.
        let other = dir.path().join("adc2");
        fs::write(&other, 768u16.to_ne_bytes()).unwrap();
        assert_eq!(backend.adc_read(Some(&other)).unwrap(), 768);
    }

    #[test]
    fn test_adc_short_read_fails() {
        let dir = fake_sysfs();
        let mut backend = backend(&dir);

        fs::write(dir.path().join("adc"), [0x01u8]).unwrap();
        assert!(matches!(backend.adc_read(None), Err(HalError::Io(_))));
    }

    #[test]
    fn test_adc_missing_device_fails() {
        let dir = fake_sysfs();
        let mut backend = backend(&dir);
        assert!(matches!(backend.adc_read(None), Err(HalError::Io(_))));
    }

    #[test]
    fn test_pwm_duty_threshold_maps_to_level() {
        let dir = fake_sysfs();
        fake_pin(&dir, 2);
        let mut backend = backend(&dir);
        backend.pwm_init(2, 1000).unwrap();

        let value_path = dir.path().join("gpio2/value");
        backend.pwm_set_duty(2, 51).unwrap();
        assert_eq!(fs::read_to_string(&value_path).unwrap(), "1");

        // Exactly 50% is Low: only strictly-above-50 maps High.
        backend.pwm_set_duty(2, 50).unwrap();
        assert_eq!(fs::read_to_string(&value_path).unwrap(), "0");

        backend.pwm_set_duty(2, 100).unwrap();
        assert_eq!(fs::read_to_string(&value_path).unwrap(), "1");

        // Out-of-range duty clamps rather than failing.
        backend.pwm_set_duty(2, 255).unwrap();
        assert_eq!(fs::read_to_string(&value_path).unwrap(), "1");
    }

    #[test]
    fn test_pwm_deinit_drives_low_and_unexports() {
        let dir = fake_sysfs();
        fake_pin(&dir, 2);
        let mut backend = backend(&dir);
        backend.pwm_init(2, 1000).unwrap();
        backend.pwm_set_duty(2, 90).unwrap();

        backend.pwm_deinit(2).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("gpio2/value")).unwrap(),
            "0"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("unexport")).unwrap(),
            "2"
        );
    }

    #[test]
    fn test_name() {
        let dir = fake_sysfs();
        let backend = backend(&dir);
        assert_eq!(backend.name(), "real-sysfs");
    }
}
