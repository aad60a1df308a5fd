//! Outbound application events.
//!
//! The [`AssistantController`](super::service::AssistantController) emits
//! these through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them: log to serial, record in
//! a test, forward to a diagnostics channel.

use crate::events::{EventKind, RawEvent};
use crate::fsm::ConversationState;

use super::commands::DeviceCommand;
use super::ports::ExecError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller is about to consume the event stream.
    Started { device_id: String },

    /// The indicator state moved.
    StateChanged {
        from: ConversationState,
        to: ConversationState,
    },

    /// The start gate opened (assistant finished starting).
    GateOpened,

    /// The button handler was registered with the button port.
    ButtonArmed,

    /// A device command was delivered to the executor.
    CommandDispatched {
        command: DeviceCommand,
        result: Result<(), ExecError>,
    },

    /// Raw diagnostic record for every event, emitted after handling.
    EventObserved {
        kind: EventKind,
        record: String,
    },

    /// The event source ended; the controller loop is done.
    StreamEnded(RunSummary),
}

impl AppEvent {
    /// Diagnostic for `raw`, rendered as it was received.
    pub fn observed(raw: &RawEvent, kind: EventKind) -> Self {
        Self::EventObserved {
            kind,
            record: raw.to_string(),
        }
    }
}

/// Counters returned when the event stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub events: u64,
    pub commands: u64,
    pub command_failures: u64,
    /// Indicator updates (table hits, including same-state re-emits).
    pub status_updates: u64,
    /// Indicator updates that moved the state.
    pub state_changes: u64,
}
