//! Gamenet Common Library
//!
//! This crate provides the shared types, constants, error taxonomy and
//! configuration loading utilities for the gamenet workspace crates.
//!
//! # Module Structure
//!
//! - [`hal`] - HAL backend trait, errors and hardware types
//! - [`config`] - Appliance configuration loading (TOML)
//! - [`error`] - Appliance-level error taxonomy

#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod hal;
