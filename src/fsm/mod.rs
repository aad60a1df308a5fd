//! Conversation state tracking.
//!
//! The remote assistant owns turn timing; locally we only mirror where the
//! conversation is so the indicator and the start gate stay in step.
//!
//! ```text
//!            StartFinished            TurnStarted / DeviceAction
//!   IDLE ───────────────▶ STARTING ─────────────────▶ LISTENING ◀──┐
//!                                                        │          │
//!                                               EndOfUtterance      │
//!                                                        ▼          │
//!                READY ◀── TurnFinished(no follow-on) ─ THINKING    │
//!                  │       NoResponse / TurnTimeout                 │
//!                  └───────────────── TurnStarted ──────────────────┘
//!
//!   any state ──[AssistantError]──▶ ERROR
//! ```
//!
//! There are no timers and no guards: the next state is a pure function
//! of the incoming event (see [`states::next_state`]).

pub mod states;

use log::info;

use crate::events::AssistantEvent;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Indicator-facing conversation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationState {
    Idle,
    Starting,
    Listening,
    Thinking,
    Ready,
    Error,
}

impl ConversationState {
    /// Literal handed to the status indicator.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Holds the current state and counts transitions.
pub struct ConversationFsm {
    current: ConversationState,
    /// Events that hit the table (including same-state re-emits).
    table_hits: u64,
    /// Events that actually moved the state.
    transitions: u64,
}

/// What applying one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: ConversationState,
    /// `Some` when the table names an indicator state for the event.
    pub emit: Option<ConversationState>,
}

impl Step {
    pub fn changed(&self) -> bool {
        self.emit.is_some_and(|to| to != self.from)
    }
}

impl ConversationFsm {
    pub fn new() -> Self {
        Self {
            current: ConversationState::Idle,
            table_hits: 0,
            transitions: 0,
        }
    }

    /// Apply one event and report what the indicator should show.
    pub fn apply(&mut self, event: &AssistantEvent) -> Step {
        let from = self.current;
        let emit = states::next_state(event);

        if let Some(to) = emit {
            self.table_hits += 1;
            if to != from {
                info!("FSM transition: {} -> {}", from.name(), to.name());
                self.transitions += 1;
                self.current = to;
            }
        }

        Step { from, emit }
    }

    pub fn current_state(&self) -> ConversationState {
        self.current
    }

    pub fn table_hits(&self) -> u64 {
        self.table_hits
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}

impl Default for ConversationFsm {
    fn default() -> Self {
        Self::new()
    }
}
