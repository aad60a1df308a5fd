//! Integration tests for the event → indicator → command pipeline.
//!
//! Drives `AssistantController` with event records the way the session
//! bridge delivers them and asserts on every port call.

use serde_json::json;

use crate::mock_hw::{controller, event, MockExecutor, MockHardware, RecordingSink};

use voicehat::app::events::AppEvent;
use voicehat::app::gate::GatePolicy;
use voicehat::app::ports::ExecError;
use voicehat::events::{EventKind, RawEvent};
use voicehat::fsm::ConversationState;

fn device_action(device_id: &str, execution: serde_json::Value) -> RawEvent {
    event(
        "ON_DEVICE_ACTION",
        Some(json!({
            "inputs": [{
                "intent": "action.devices.EXECUTE",
                "payload": {"commands": [{
                    "devices": [{"id": device_id}],
                    "execution": execution
                }]}
            }]
        })),
    )
}

// ── Full turn ─────────────────────────────────────────────────

#[test]
fn typical_turn_drives_indicator() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    let script = vec![
        event("ON_START_FINISHED", None),
        event("ON_CONVERSATION_TURN_STARTED", None),
        event("ON_END_OF_UTTERANCE", None),
        event("ON_RESPONDING_STARTED", Some(json!({"is_error_response": false}))),
        event("ON_CONVERSATION_TURN_FINISHED", Some(json!({"with_follow_on_turn": false}))),
    ];
    let summary = ctl.run(script, &mut hw, &mut exec, &mut sink);

    assert_eq!(
        hw.status_names(),
        vec!["starting", "listening", "thinking", "ready"]
    );
    assert_eq!(summary.events, 5);
    assert_eq!(summary.status_updates, 4);
    assert_eq!(summary.state_changes, 4);
    assert_eq!(ctl.state(), ConversationState::Ready);
    assert!(matches!(sink.events.first(), Some(AppEvent::Started { device_id }) if device_id == "dev1"));
    assert!(matches!(sink.events.last(), Some(AppEvent::StreamEnded(s)) if s.events == 5));
}

#[test]
fn every_event_is_observed_after_handling() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    ctl.handle(&event("ON_MUTED_CHANGED", Some(json!({"is_muted": true}))), &mut hw, &mut exec, &mut sink);

    assert_eq!(sink.observed_count(), 2);
    // The diagnostic comes last for each event.
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::EventObserved { kind: EventKind::Other, record }) if record.contains("ON_MUTED_CHANGED")
    ));
}

#[test]
fn diagnostic_record_is_the_event_as_received() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_ASSISTANT_ERROR", None), &mut hw, &mut exec, &mut sink);
    ctl.handle(
        &event("ON_START_FINISHED", Some(json!({"build": "1.2"}))),
        &mut hw,
        &mut exec,
        &mut sink,
    );

    let records: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::EventObserved { record, .. } => Some(record.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        records,
        vec!["ON_ASSISTANT_ERROR", "ON_START_FINISHED {\"build\":\"1.2\"}"]
    );
}

// ── Follow-on handling ────────────────────────────────────────

#[test]
fn turn_finished_follow_on_variants() {
    let cases = [
        (Some(json!({"with_follow_on_turn": false})), Some(ConversationState::Ready)),
        (Some(json!({"with_follow_on_turn": true})), None),
        (None, None),
        (Some(json!({})), None),
        (Some(json!({"with_follow_on_turn": "no"})), None),
    ];

    for (args, expected) in cases {
        let (mut ctl, _) = controller(GatePolicy::Strict);
        let mut hw = MockHardware::new();
        let mut exec = MockExecutor::new();
        let ev = event("ON_CONVERSATION_TURN_FINISHED", args.clone());
        ctl.handle(&ev, &mut hw, &mut exec, &mut RecordingSink::new());
        assert_eq!(hw.statuses.last().copied(), expected, "args = {:?}", args);
    }
}

#[test]
fn follow_on_turn_keeps_strict_gate_closed() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    for ev in [
        event("ON_START_FINISHED", None),
        event("ON_CONVERSATION_TURN_STARTED", None),
        event("ON_CONVERSATION_TURN_FINISHED", Some(json!({"with_follow_on_turn": true}))),
    ] {
        ctl.handle(&ev, &mut hw, &mut exec, &mut sink);
    }
    assert!(!hw.press());

    ctl.handle(&event("ON_CONVERSATION_TURN_STARTED", None), &mut hw, &mut exec, &mut sink);
    ctl.handle(
        &event("ON_CONVERSATION_TURN_FINISHED", Some(json!({"with_follow_on_turn": false}))),
        &mut hw,
        &mut exec,
        &mut sink,
    );
    assert!(hw.press());
    assert_eq!(session.request_count(), 1);
}

// ── Unknown and error events ──────────────────────────────────

#[test]
fn unknown_kind_changes_nothing() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    let statuses_before = hw.statuses.clone();
    let ready_before = ctl.gate().can_start_conversation();

    ctl.handle(&event("ON_ALERT_STARTED", None), &mut hw, &mut exec, &mut sink);
    ctl.handle(&event("", None), &mut hw, &mut exec, &mut sink);

    assert_eq!(hw.statuses, statuses_before);
    assert_eq!(ctl.gate().can_start_conversation(), ready_before);
    assert_eq!(session.request_count(), 0);
    assert!(exec.executed.is_empty());
}

#[test]
fn assistant_error_shows_error_and_frees_gate() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    ctl.handle(&event("ON_CONVERSATION_TURN_STARTED", None), &mut hw, &mut exec, &mut sink);
    assert!(!ctl.gate().can_start_conversation());

    ctl.handle(&event("ON_ASSISTANT_ERROR", Some(json!({"is_fatal": false}))), &mut hw, &mut exec, &mut sink);
    assert_eq!(hw.statuses.last(), Some(&ConversationState::Error));
    assert!(ctl.gate().can_start_conversation());
}

#[test]
fn start_finished_is_idempotent() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    for _ in 0..3 {
        ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
        assert!(ctl.gate().is_ready());
    }
    assert_eq!(hw.registrations, 1);
    // Re-emitted to the indicator each time, but only one state change.
    assert_eq!(ctl.summary().status_updates, 3);
    assert_eq!(ctl.summary().state_changes, 1);
    let armed = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::ButtonArmed))
        .count();
    assert_eq!(armed, 1);
}

// ── Device actions ────────────────────────────────────────────

#[test]
fn device_action_executes_matching_commands() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    let ev = device_action(
        "dev1",
        json!([
            {"command": "action.devices.commands.OnOff", "params": {"on": true}},
            {"command": "turnOn", "params": {}}
        ]),
    );
    ctl.handle(&ev, &mut hw, &mut exec, &mut sink);

    assert_eq!(hw.statuses, vec![ConversationState::Listening]);
    assert_eq!(exec.names(), vec!["action.devices.commands.OnOff", "turnOn"]);
    assert_eq!(exec.executed[1].params, None);
    assert_eq!(ctl.summary().commands, 2);
}

#[test]
fn device_action_for_other_device_executes_nothing() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();

    let ev = device_action("dev2", json!([{"command": "turnOn"}]));
    ctl.handle(&ev, &mut hw, &mut exec, &mut RecordingSink::new());

    assert!(exec.executed.is_empty());
    // Indicator still reacts to the event itself.
    assert_eq!(hw.statuses, vec![ConversationState::Listening]);
}

#[test]
fn malformed_device_action_is_survivable() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    for args in [
        None,
        Some(json!({"inputs": 7})),
        Some(json!({"inputs": [{"intent": "action.devices.EXECUTE", "payload": "x"}]})),
        Some(json!({"inputs": [{"intent": "action.devices.EXECUTE", "payload": {"commands": [{"devices": "dev1"}]}}]})),
    ] {
        ctl.handle(&event("ON_DEVICE_ACTION", args), &mut hw, &mut exec, &mut sink);
    }

    assert!(exec.executed.is_empty());
    assert_eq!(sink.observed_count(), 4);
}

#[test]
fn executor_failures_are_counted_and_processing_continues() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::rejecting("explode");
    let mut sink = RecordingSink::new();

    let script = vec![
        device_action("dev1", json!([{"command": "explode"}, {"command": "turnOn"}])),
        event("ON_END_OF_UTTERANCE", None),
    ];
    let summary = ctl.run(script, &mut hw, &mut exec, &mut sink);

    assert_eq!(summary.commands, 2);
    assert_eq!(summary.command_failures, 1);
    assert_eq!(hw.statuses.last(), Some(&ConversationState::Thinking));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::CommandDispatched { result: Err(ExecError::Unsupported), .. }
    )));
}
