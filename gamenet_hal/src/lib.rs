//! # Gamenet HAL Library
//!
//! Hardware Abstraction Layer for the gamenet appliance with swappable
//! real/mock backends and ADC-based device-role detection.
//!
//! Backends implement the `HalBackend` trait defined in
//! `gamenet_common::hal::backend`.
//!
//! # Module Structure
//!
//! - [`core`] - `Hal` context struct, backend selection and dispatch
//! - [`backends`] - HAL backend implementations (sysfs, mock)
//! - [`role`] - ADC-based device-role detector with role cache
//! - [`gpio`] - GPIO convenience wrapper over the HAL contract
//! - [`led`] - Status LED controller (role/console-state to color)
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       gamenet_hal                         │
//! │  ┌────────────┐  ┌────────────┐  ┌─────────────────────┐  │
//! │  │ RoleDetect │  │ gpio / led │  │  Hal (context)      │  │
//! │  │            ├─►│  wrappers  ├─►│  mode: real | mock  │  │
//! │  └────────────┘  └────────────┘  └─────────┬───────────┘  │
//! │                                            ▼              │
//! │                                  ┌──────────────────┐     │
//! │                                  │  HalBackend      │     │
//! │                                  │  trait object    │     │
//! │                                  └──────────────────┘     │
//! └───────────────────────────────────────────────────────────┘
//! ```

#![deny(warnings)]
#![deny(missing_docs)]

pub mod backends;
pub mod core;
pub mod gpio;
pub mod led;
pub mod role;

// Re-export key types for convenience
pub use crate::backends::mock::MockBackend;
pub use crate::backends::sysfs::SysfsBackend;
pub use crate::core::Hal;
pub use crate::role::RoleDetector;
