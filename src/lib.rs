//! VoiceHat firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;

pub mod pins;

// Hardware-facing layers; the ESP-IDF calls inside are cfg-guarded and
// fall back to simulation stubs on the host.
pub mod adapters;
pub mod drivers;

pub use error::{Error, Result};
