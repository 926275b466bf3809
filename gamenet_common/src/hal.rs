//! Hardware abstraction layer contract.
//!
//! This module contains the backend trait, error types, hardware
//! value types and constants shared by every HAL consumer.

pub mod backend;
pub mod consts;
pub mod types;
