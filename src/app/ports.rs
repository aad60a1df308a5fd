//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AssistantController (domain)
//! ```
//!
//! Driven adapters (status LED, button input, command executor, event
//! sinks, the assistant session bridge) implement these traits.  The
//! [`AssistantController`](super::service::AssistantController) consumes
//! them via generics, so the domain core never touches hardware or the
//! transport directly.

use crate::fsm::ConversationState;

use super::commands::DeviceCommand;
use super::events::AppEvent;
use super::service::ButtonHandler;

// ───────────────────────────────────────────────────────────────
// Status port (domain → indicator)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget indicator sink.  Receives one call per transition-table
/// hit; `state.name()` is the literal the indicator renders.
pub trait StatusSink {
    fn set_status(&mut self, state: ConversationState);
}

// ───────────────────────────────────────────────────────────────
// Button port (domain → physical button)
// ───────────────────────────────────────────────────────────────

/// Where the controller hands its press handler once the assistant is ready.
pub trait ButtonPort {
    /// Install `handler` for future presses.
    ///
    /// Returns `false` if a handler was already installed; the existing one
    /// is kept.
    fn register_press_handler(&mut self, handler: ButtonHandler) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Command executor port (domain → actuation)
// ───────────────────────────────────────────────────────────────

/// Delivers one extracted device command for execution.
pub trait CommandExecutor {
    fn execute(&mut self, command: &DeviceCommand) -> Result<(), ExecError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (serial log, a test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Assistant session port (domain → remote assistant)
// ───────────────────────────────────────────────────────────────

/// The part of the external assistant session the controller may call.
///
/// Shared between the event worker and the button context, hence
/// `Send + Sync` and `&self` receivers.
pub trait AssistantSession: Send + Sync {
    /// Opaque device identifier assigned by the session at startup.
    fn device_id(&self) -> &str;

    /// Ask the session to open a new conversation turn.
    fn start_conversation(&self) -> Result<(), SessionError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`AssistantSession`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The outbound request queue is full; the press is dropped.
    RequestQueueFull,
    /// The session has shut down.
    Closed,
}

/// Errors from [`CommandExecutor`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecError {
    /// The executor does not know this command.
    Unsupported,
    /// A required parameter is missing or has the wrong type.
    /// The `&'static str` names the parameter.
    InvalidParams(&'static str),
    /// The actuator refused the command.
    Hardware(&'static str),
}

/// Errors from loading [`AssistantConfig`](crate::config::AssistantConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The stored blob is not valid JSON for the config schema.
    Parse { line: usize, column: usize },
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RequestQueueFull => write!(f, "start request queue full"),
            Self::Closed => write!(f, "session closed"),
        }
    }
}

impl core::fmt::Display for ExecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "unsupported command"),
            Self::InvalidParams(name) => write!(f, "invalid parameter: {}", name),
            Self::Hardware(msg) => write!(f, "hardware: {}", msg),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parse { line, column } => write!(f, "parse error at {}:{}", line, column),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
