//! Unified error types for the VoiceHat firmware.
//!
//! `Error` covers what can stop the firmware from coming up: bad
//! configuration and failed peripheral init.  Runtime failures stay in
//! their port error types and never cross the controller's per-event
//! boundary (see [`AssistantController::handle`]).
//!
//! [`AssistantController::handle`]: crate::app::service::AssistantController::handle

use core::fmt;

use crate::app::ports::ConfigError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Startup failures surfaced to the binary entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Failure to turn a transport record into a [`RawEvent`](crate::events::RawEvent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The record is not valid JSON or lacks the `type` field.
    Malformed { line: usize, column: usize },
    /// `args` is present but not a JSON object.
    ArgsNotObject,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { line, column } => {
                write!(f, "malformed event record at {line}:{column}")
            }
            Self::ArgsNotObject => write!(f, "event args is not an object"),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed {
            line: e.line(),
            column: e.column(),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
