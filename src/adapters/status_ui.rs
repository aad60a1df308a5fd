//! Status indicator adapter.
//!
//! Implements [`StatusSink`] by mapping each conversation state onto an
//! LED pattern and rendering it on the button-cap [`StatusLed`].  The
//! controller only selects the pattern; the main loop calls [`tick`]
//! at the configured refresh rate to animate it.
//!
//! | State       | Pattern      |
//! |-------------|--------------|
//! | `idle`      | Off          |
//! | `starting`  | Breathing    |
//! | `listening` | Solid        |
//! | `thinking`  | FastPulse    |
//! | `ready`     | Beacon       |
//! | `error`     | RapidFlash   |
//!
//! The controller runs on the event worker while the LED is animated on
//! the main task; [`StatusLink`] carries the latest requested state across.
//!
//! [`tick`]: StatusUi::tick

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::debug;

use crate::app::ports::StatusSink;
use crate::drivers::led_patterns::{LedPatternEngine, PatternId};
use crate::drivers::status_led::StatusLed;
use crate::fsm::ConversationState;

pub fn pattern_for(state: ConversationState) -> PatternId {
    match state {
        ConversationState::Idle => PatternId::Off,
        ConversationState::Starting => PatternId::Breathing,
        ConversationState::Listening => PatternId::Solid,
        ConversationState::Thinking => PatternId::FastPulse,
        ConversationState::Ready => PatternId::Beacon,
        ConversationState::Error => PatternId::RapidFlash,
    }
}

type StatusSignal = Signal<CriticalSectionRawMutex, ConversationState>;

pub struct StatusUi {
    engine: LedPatternEngine,
    led: StatusLed,
    status: Option<ConversationState>,
    pending: Arc<StatusSignal>,
}

impl Default for StatusUi {
    fn default() -> Self {
        Self::new(StatusLed::new())
    }
}

impl StatusUi {
    pub fn new(led: StatusLed) -> Self {
        let mut engine = LedPatternEngine::new();
        engine.set_pattern(pattern_for(ConversationState::Idle));
        Self {
            engine,
            led,
            status: None,
            pending: Arc::new(Signal::new()),
        }
    }

    /// A [`StatusSink`] for another context.  Only the latest state sent
    /// before the next [`tick`](Self::tick) is rendered.
    pub fn link(&self) -> StatusLink {
        StatusLink {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Pick up a linked state change, then advance the animation by
    /// `delta_ms` and push the level to the LED.
    pub fn tick(&mut self, delta_ms: u32) -> u8 {
        if let Some(state) = self.pending.try_take() {
            self.set_status(state);
        }
        let level = self.engine.tick(delta_ms);
        self.led.set_brightness(level);
        level
    }

    /// Last state the controller asked for, if any.
    pub fn status(&self) -> Option<ConversationState> {
        self.status
    }

    pub fn pattern(&self) -> Option<PatternId> {
        self.engine.pattern()
    }

    pub fn brightness(&self) -> u8 {
        self.led.brightness()
    }
}

impl StatusSink for StatusUi {
    fn set_status(&mut self, state: ConversationState) {
        debug!("Status: {}", state.name());
        self.engine.set_pattern(pattern_for(state));
        self.status = Some(state);
    }
}

/// Cross-context handle feeding a [`StatusUi`].
#[derive(Clone)]
pub struct StatusLink {
    pending: Arc<StatusSignal>,
}

impl StatusSink for StatusLink {
    fn set_status(&mut self, state: ConversationState) {
        self.pending.signal(state);
    }
}
