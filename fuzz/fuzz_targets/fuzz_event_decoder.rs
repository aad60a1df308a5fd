//! Fuzz target: event record decoding + controller dispatch
//!
//! Feeds arbitrary bytes as newline-separated JSON records through
//! `RawEvent::from_json` and hands every decoded event to a controller
//! with no-op adapters.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Decoded `args` is always absent, null, or an object
//! - Every decoded record is handled and counted exactly once
//!
//! cargo fuzz run fuzz_event_decoder

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use voicehat::app::commands::DeviceCommand;
use voicehat::app::events::AppEvent;
use voicehat::app::gate::GatePolicy;
use voicehat::app::ports::{
    AssistantSession, ButtonPort, CommandExecutor, EventSink, ExecError, SessionError, StatusSink,
};
use voicehat::app::service::{AssistantController, ButtonHandler};
use voicehat::events::RawEvent;
use voicehat::fsm::ConversationState;

struct Null;

impl AssistantSession for Null {
    fn device_id(&self) -> &str {
        "dev1"
    }
    fn start_conversation(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

impl StatusSink for Null {
    fn set_status(&mut self, _state: ConversationState) {}
}

impl ButtonPort for Null {
    fn register_press_handler(&mut self, _handler: ButtonHandler) -> bool {
        true
    }
}

impl CommandExecutor for Null {
    fn execute(&mut self, _command: &DeviceCommand) -> Result<(), ExecError> {
        Ok(())
    }
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let events: Vec<RawEvent> = text
        .lines()
        .filter_map(|line| RawEvent::from_json(line).ok())
        .inspect(|raw| {
            assert!(matches!(raw.args, None | Some(Value::Null | Value::Object(_))));
        })
        .collect();

    let mut ctl = AssistantController::new(Arc::new(Null), GatePolicy::Strict);
    let expected = events.len() as u64;
    let summary = ctl.run(events, &mut Null, &mut Null, &mut Null);
    assert_eq!(summary.events, expected);
});
