//! Board-agnostic action scheduling core for autonomous routines
//!
//! This crate contains everything the autonomous routine needs that does
//! not depend on a specific board:
//!
//! - Hardware boundary traits (motor, servo, telemetry)
//! - Cooperative actions and combinators (sequential, parallel, sleep)
//! - Device controllers (shooter, intake, feed)
//! - Routine builder and trajectory boundary
//! - Driver loop with safe-state shutdown
//! - Configuration types and TOML loading

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod action;
pub mod config;
pub mod device;
pub mod mission;
pub mod motion;
pub mod runner;
pub mod safety;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
