//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules of the assistant controller:
//! event dispatch, indicator state, start gating, and device-action
//! extraction.  All interaction with hardware and the remote session
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod device_actions;
pub mod events;
pub mod gate;
pub mod ports;
pub mod service;
