//! Application service: the hexagonal core.
//!
//! [`AssistantController`] owns the conversation FSM and the start gate.
//! It consumes assistant event records one at a time, strictly in arrival
//! order, decodes each into an [`AssistantEvent`] once, and drives every
//! side effect through port traits injected at call sites, so the whole
//! service is testable with mock adapters.
//!
//! ```text
//!  EventSource ──▶ ┌────────────────────────┐ ──▶ StatusSink
//!                  │  AssistantController    │ ──▶ CommandExecutor
//!   ButtonPort ◀── │  FSM · StartGate        │ ──▶ EventSink
//!                  └────────────────────────┘
//!                        ▲ Arc<StartGate>
//!   button context ── ButtonHandler ──▶ AssistantSession::start_conversation
//! ```

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::events::{AssistantEvent, FollowOn, RawEvent};
use crate::fsm::{ConversationFsm, ConversationState};

use super::device_actions;
use super::events::{AppEvent, RunSummary};
use super::gate::{GatePolicy, StartGate};
use super::ports::{AssistantSession, ButtonPort, CommandExecutor, EventSink, StatusSink};

// ───────────────────────────────────────────────────────────────
// ButtonHandler
// ───────────────────────────────────────────────────────────────

/// Press handler handed to the [`ButtonPort`].  Runs in the button
/// context, concurrently with the event worker; it only touches the
/// shared gate and the session.
#[derive(Clone)]
pub struct ButtonHandler {
    gate: Arc<StartGate>,
    session: Arc<dyn AssistantSession>,
}

impl ButtonHandler {
    /// Request a new turn if the gate allows it.
    ///
    /// Returns `true` when a request reached the session.  A press with
    /// the gate closed is a silent no-op.
    pub fn on_button_pressed(&self) -> bool {
        if !self.gate.try_claim() {
            debug!("Button: press ignored, conversation cannot start now");
            return false;
        }
        match self.session.start_conversation() {
            Ok(()) => {
                info!("Button: conversation start requested");
                true
            }
            Err(e) => {
                warn!("Button: start request failed: {}", e);
                self.gate.release_claim();
                false
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// AssistantController
// ───────────────────────────────────────────────────────────────

/// The controller orchestrates all domain logic.
pub struct AssistantController {
    session: Arc<dyn AssistantSession>,
    gate: Arc<StartGate>,
    fsm: ConversationFsm,
    /// Copied from the session once; targets device actions.
    device_id: String,
    button_armed: bool,
    summary: RunSummary,
}

impl AssistantController {
    pub fn new(session: Arc<dyn AssistantSession>, policy: GatePolicy) -> Self {
        let device_id = session.device_id().to_string();
        Self {
            session,
            gate: Arc::new(StartGate::new(policy)),
            fsm: ConversationFsm::new(),
            device_id,
            button_armed: false,
            summary: RunSummary::default(),
        }
    }

    // ── Event pump ────────────────────────────────────────────

    /// Consume `events` until the source ends.
    ///
    /// Source termination is fatal to the controller loop; reconnecting
    /// is the session's business.
    pub fn run<I>(
        &mut self,
        events: I,
        hw: &mut (impl StatusSink + ButtonPort),
        executor: &mut impl CommandExecutor,
        sink: &mut impl EventSink,
    ) -> RunSummary
    where
        I: IntoIterator<Item = RawEvent>,
    {
        info!("Controller started (device_id={})", self.device_id);
        sink.emit(&AppEvent::Started {
            device_id: self.device_id.clone(),
        });

        for raw in events {
            self.handle(&raw, hw, executor, sink);
        }

        error!(
            "Event stream ended after {} events ({} commands, {} failed, {} state changes)",
            self.summary.events,
            self.summary.commands,
            self.summary.command_failures,
            self.summary.state_changes
        );
        sink.emit(&AppEvent::StreamEnded(self.summary));
        self.summary
    }

    // ── Per-event dispatch ────────────────────────────────────

    /// Process one event: gate → indicator → device actions → diagnostic.
    pub fn handle(
        &mut self,
        raw: &RawEvent,
        hw: &mut (impl StatusSink + ButtonPort),
        executor: &mut impl CommandExecutor,
        sink: &mut impl EventSink,
    ) {
        self.summary.events += 1;
        let event = &AssistantEvent::from(raw);

        // 1. Gate bookkeeping
        match event {
            AssistantEvent::StartFinished => {
                self.gate.open();
                sink.emit(&AppEvent::GateOpened);
                if !self.button_armed {
                    if !hw.register_press_handler(self.button_handler()) {
                        debug!("Button handler already installed");
                    }
                    self.button_armed = true;
                    sink.emit(&AppEvent::ButtonArmed);
                }
            }
            AssistantEvent::ConversationTurnStarted => self.gate.turn_started(),
            AssistantEvent::ConversationTurnFinished { follow_on } => {
                if *follow_on == FollowOn::Requested {
                    debug!("Turn finished, follow-on turn requested");
                } else {
                    self.gate.turn_ended();
                }
            }
            AssistantEvent::NoResponse | AssistantEvent::ConversationTurnTimeout => {
                self.gate.turn_ended();
            }
            AssistantEvent::AssistantError { is_fatal } => {
                error!("Assistant error (fatal={})", is_fatal);
                self.gate.turn_ended();
            }
            AssistantEvent::EndOfUtterance | AssistantEvent::DeviceAction(_) => {}
            AssistantEvent::Other { name, .. } => debug!("Ignoring event {}", name),
        }

        // 2. Indicator
        let step = self.fsm.apply(event);
        self.summary.status_updates = self.fsm.table_hits();
        self.summary.state_changes = self.fsm.transitions();
        if let Some(to) = step.emit {
            hw.set_status(to);
            if step.changed() {
                sink.emit(&AppEvent::StateChanged { from: step.from, to });
            }
        }

        // 3. Device actions
        if let AssistantEvent::DeviceAction(payload) = event {
            for command in device_actions::extract(payload, &self.device_id) {
                info!("Do command {}", command);
                let result = executor.execute(&command);
                self.summary.commands += 1;
                if let Err(e) = result {
                    warn!("Command {} failed: {}", command.command, e);
                    self.summary.command_failures += 1;
                }
                sink.emit(&AppEvent::CommandDispatched { command, result });
            }
        }

        // 4. Raw diagnostic record
        sink.emit(&AppEvent::observed(raw, event.kind()));
    }

    // ── Queries ───────────────────────────────────────────────

    /// A press handler sharing this controller's gate and session.
    pub fn button_handler(&self) -> ButtonHandler {
        ButtonHandler {
            gate: Arc::clone(&self.gate),
            session: Arc::clone(&self.session),
        }
    }

    pub fn gate(&self) -> Arc<StartGate> {
        Arc::clone(&self.gate)
    }

    pub fn state(&self) -> ConversationState {
        self.fsm.current_state()
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }
}
