//! Integration tests for the session bridge feeding a live controller.
//!
//! A transport thread pushes JSON records into a bridge while the
//! controller consumes the bridge's event source on another thread, the
//! same split the firmware runs with.

use std::sync::Arc;
use std::thread;

use crate::mock_hw::{MockExecutor, MockHardware, RecordingSink};

use voicehat::adapters::session::{ChannelSession, SessionBridge, SessionRequest};
use voicehat::app::gate::GatePolicy;
use voicehat::app::ports::AssistantSession;
use voicehat::app::service::AssistantController;
use voicehat::fsm::ConversationState;

#[test]
fn controller_consumes_bridge_until_closed() {
    static BRIDGE: SessionBridge = SessionBridge::new();
    let session = Arc::new(ChannelSession::new(&BRIDGE, "dev1"));
    let mut ctl = AssistantController::new(session, GatePolicy::Strict);

    let transport = thread::spawn(|| {
        let records = [
            r#"{"type":"ON_START_FINISHED"}"#,
            r#"{"type":"ON_CONVERSATION_TURN_STARTED"}"#,
            "{ this is not json",
            r#"{"type":"ON_END_OF_UTTERANCE","args":null}"#,
            r#"{"type":"ON_DEVICE_ACTION","args":{"inputs":[{"intent":"action.devices.EXECUTE","payload":{"commands":[{"devices":[{"id":"dev1"}],"execution":[{"command":"action.devices.commands.OnOff","params":{"on":true}}]}]}}]}}"#,
            r#"{"type":"ON_CONVERSATION_TURN_FINISHED","args":{"with_follow_on_turn":false}}"#,
        ];
        let mut accepted = 0;
        for record in records {
            if BRIDGE.push_json_event(record).unwrap() {
                accepted += 1;
            }
        }
        BRIDGE.close_event_stream();
        accepted
    });

    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();
    let summary = ctl.run(BRIDGE.event_source(), &mut hw, &mut exec, &mut sink);

    assert_eq!(transport.join().unwrap(), 5);
    assert_eq!(summary.events, 5);
    assert_eq!(
        hw.status_names(),
        vec!["starting", "listening", "thinking", "listening", "ready"]
    );
    assert_eq!(exec.names(), vec!["action.devices.commands.OnOff"]);
    assert_eq!(ctl.state(), ConversationState::Ready);
}

#[test]
fn button_press_reaches_transport_as_request() {
    static BRIDGE: SessionBridge = SessionBridge::new();
    let session = Arc::new(ChannelSession::new(&BRIDGE, "dev1"));
    assert_eq!(session.device_id(), "dev1");
    let mut ctl = AssistantController::new(session, GatePolicy::Strict);

    BRIDGE.push_json_event(r#"{"type":"ON_START_FINISHED"}"#).unwrap();
    BRIDGE.close_event_stream();

    let mut hw = MockHardware::new();
    ctl.run(
        BRIDGE.event_source(),
        &mut hw,
        &mut MockExecutor::new(),
        &mut RecordingSink::new(),
    );

    // Stream closed: the session refuses new turns and the gate is released.
    assert!(!hw.press());
    assert_eq!(BRIDGE.try_next_request(), None);
    assert!(ctl.gate().can_start_conversation());
}

#[test]
fn requests_queue_while_session_open() {
    static BRIDGE: SessionBridge = SessionBridge::new();
    let session = Arc::new(ChannelSession::new(&BRIDGE, "dev1"));
    let mut ctl = AssistantController::new(session, GatePolicy::Loose);
    let mut hw = MockHardware::new();

    BRIDGE.push_json_event(r#"{"type":"ON_START_FINISHED"}"#).unwrap();
    let first = BRIDGE.event_source().next().unwrap();
    ctl.handle(&first, &mut hw, &mut MockExecutor::new(), &mut RecordingSink::new());

    assert!(hw.press());
    assert!(hw.press());
    assert_eq!(BRIDGE.try_next_request(), Some(SessionRequest::StartConversation));
    assert_eq!(BRIDGE.next_request(), SessionRequest::StartConversation);
    assert_eq!(BRIDGE.try_next_request(), None);
}
