//! # Gamenet HAL Binary
//!
//! Boot-time role probe for the gaming-network appliance. Selects a
//! HAL backend, samples the ADC voltage divider to decide whether this
//! unit is the Client or the Server, lights the status LED accordingly
//! and prints the detected role.
//!
//! # Usage
//!
//! ```bash
//! # Probe real hardware
//! gamenet_hal --mode real
//!
//! # Deterministic run against the in-memory mock
//! gamenet_hal --mode mock
//!
//! # Custom config and ADC device, verbose logging
//! gamenet_hal --config /etc/gamenet/appliance.toml --adc-device /dev/ADC -v
//! ```

#![deny(warnings)]

use clap::Parser;
use gamenet_common::config::ApplianceConfig;
use gamenet_common::hal::consts::{DEFAULT_ADC_DEVICE, GPIO_SYSFS_ROOT};
use gamenet_common::hal::types::{ConsoleState, DeviceRole};
use gamenet_hal::led::{LedController, LedPins};
use gamenet_hal::{Hal, RoleDetector, SysfsBackend};
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Gamenet HAL - device-role probe with swappable real/mock backends
#[derive(Parser, Debug)]
#[command(name = "gamenet_hal")]
#[command(version)]
#[command(about = "HAL role probe for the gamenet appliance")]
#[command(long_about = None)]
struct Args {
    /// Path to the appliance configuration file (appliance.toml).
    /// Compiled-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HAL backend mode ("real" or "mock"); overrides the config file
    #[arg(short, long)]
    mode: Option<String>,

    /// ADC device path; overrides the config file
    #[arg(long, value_name = "DEV")]
    adc_device: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    match run(&args) {
        Ok(DeviceRole::Unknown) => {
            warn!("Device role could not be determined");
            std::process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            error!("HAL probe failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<DeviceRole, Box<dyn std::error::Error>> {
    info!("Gamenet HAL v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => ApplianceConfig::load(path)?,
        None => {
            info!("No config file given, using compiled-in defaults");
            ApplianceConfig::default()
        }
    };

    let mode = args.mode.as_deref().unwrap_or(&config.hal.mode);
    let adc_device = args
        .adc_device
        .clone()
        .or_else(|| config.hal.adc_device.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ADC_DEVICE));

    let mut hal = Hal::new();
    if mode == "real" {
        // Wire path overrides from the config through the constructor.
        let sysfs_root = config
            .hal
            .sysfs_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(GPIO_SYSFS_ROOT));
        let backend = SysfsBackend::with_paths(sysfs_root, adc_device.clone())?;
        hal.init_with(Box::new(backend));
    } else {
        hal.init(mode)?;
    }

    let mut detector = RoleDetector::with_device(adc_device);
    detector.init(&hal)?;

    let role = detector.detect(&mut hal);
    info!("Device role: {role} (backend: {})", hal.impl_name()?);

    // Boot indication on the status LED: white for Client, green for
    // Server, red when detection failed.
    let led = LedController::init(&mut hal, LedPins::from(&config.pins))?;
    led.set_status(&mut hal, role, ConsoleState::On)?;

    println!("{role}");

    detector.cleanup();
    hal.cleanup();
    Ok(role)
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
