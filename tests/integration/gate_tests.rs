//! Integration tests for start gating across the event worker and the
//! button context.

use std::sync::atomic::Ordering;
use std::thread;

use serde_json::json;

use crate::mock_hw::{controller, event, MockExecutor, MockHardware, RecordingSink};

use voicehat::app::gate::GatePolicy;

#[test]
fn press_before_start_finished_requests_nothing() {
    let (ctl, session) = controller(GatePolicy::Strict);
    let handler = ctl.button_handler();
    assert!(!handler.on_button_pressed());
    assert!(!handler.on_button_pressed());
    assert_eq!(session.request_count(), 0);
}

#[test]
fn press_after_start_finished_requests_exactly_once() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut RecordingSink::new());
    assert!(hw.press());
    assert_eq!(session.request_count(), 1);
}

#[test]
fn strict_gate_allows_one_request_per_turn() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    assert!(hw.press());
    assert!(!hw.press());
    assert_eq!(session.request_count(), 1);

    // The session starts the turn; presses stay ignored until it ends.
    ctl.handle(&event("ON_CONVERSATION_TURN_STARTED", None), &mut hw, &mut exec, &mut sink);
    assert!(!hw.press());
    ctl.handle(&event("ON_NO_RESPONSE", None), &mut hw, &mut exec, &mut sink);
    assert!(hw.press());
    assert_eq!(session.request_count(), 2);
}

#[test]
fn loose_gate_only_tracks_readiness() {
    let (mut ctl, session) = controller(GatePolicy::Loose);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    ctl.handle(&event("ON_CONVERSATION_TURN_STARTED", None), &mut hw, &mut exec, &mut sink);
    assert!(hw.press());
    assert!(hw.press());
    assert_eq!(session.request_count(), 2);
}

#[test]
fn turn_enders_reopen_strict_gate() {
    let enders = [
        event("ON_CONVERSATION_TURN_FINISHED", Some(json!({"with_follow_on_turn": false}))),
        event("ON_CONVERSATION_TURN_FINISHED", None),
        event("ON_NO_RESPONSE", None),
        event("ON_CONVERSATION_TURN_TIMEOUT", None),
        event("ON_ASSISTANT_ERROR", Some(json!({"is_fatal": true}))),
    ];
    for ender in enders {
        let (mut ctl, _) = controller(GatePolicy::Strict);
        let mut hw = MockHardware::new();
        let mut exec = MockExecutor::new();
        let mut sink = RecordingSink::new();

        ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
        ctl.handle(&event("ON_CONVERSATION_TURN_STARTED", None), &mut hw, &mut exec, &mut sink);
        assert!(!ctl.gate().can_start_conversation());
        ctl.handle(&ender, &mut hw, &mut exec, &mut sink);
        assert!(ctl.gate().can_start_conversation(), "not reopened by {}", ender);
    }
}

#[test]
fn start_finished_reopens_strict_gate_mid_turn() {
    let (mut ctl, _) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_CONVERSATION_TURN_STARTED", None), &mut hw, &mut exec, &mut sink);
    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    assert!(ctl.gate().can_start_conversation());
}

#[test]
fn unanswered_claim_is_dropped_by_restart() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    let mut sink = RecordingSink::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    assert!(hw.press());
    // The request never turned into a turn; a restart must not leave
    // the gate shut.
    assert!(!hw.press());
    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut sink);
    assert!(hw.press());
    assert_eq!(session.request_count(), 2);
}

#[test]
fn failed_request_releases_claim() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();

    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut RecordingSink::new());
    session.full.store(true, Ordering::SeqCst);
    assert!(!hw.press());
    assert!(ctl.gate().can_start_conversation());

    session.full.store(false, Ordering::SeqCst);
    assert!(hw.press());
    assert_eq!(session.request_count(), 1);
}

#[test]
fn concurrent_presses_produce_single_request() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut RecordingSink::new());

    let handler = ctl.button_handler();
    let threads: Vec<_> = (0..8)
        .map(|_| {
            let h = handler.clone();
            thread::spawn(move || (0..50).filter(|_| h.on_button_pressed()).count())
        })
        .collect();
    let accepted: usize = threads.into_iter().map(|t| t.join().unwrap()).sum();

    assert_eq!(accepted, 1);
    assert_eq!(session.request_count(), 1);
}

#[test]
fn presses_racing_start_finished_never_fire_early() {
    let (mut ctl, session) = controller(GatePolicy::Strict);
    let gate = ctl.gate();
    let handler = ctl.button_handler();

    let presser = thread::spawn(move || {
        let mut fired_before_ready = 0;
        let mut fired = 0;
        for _ in 0..10_000 {
            let ready = gate.is_ready();
            if handler.on_button_pressed() {
                fired += 1;
                if !ready && !gate.is_ready() {
                    fired_before_ready += 1;
                }
            }
        }
        (fired, fired_before_ready)
    });

    let mut hw = MockHardware::new();
    let mut exec = MockExecutor::new();
    ctl.handle(&event("ON_START_FINISHED", None), &mut hw, &mut exec, &mut RecordingSink::new());

    let (fired, fired_before_ready) = presser.join().unwrap();
    assert_eq!(fired_before_ready, 0);
    assert!(fired <= 1);
    assert_eq!(session.request_count(), fired);

    // After StartFinished is processed, a press always gets through
    // unless the racing thread already claimed the turn.
    if fired == 0 {
        assert!(ctl.button_handler().on_button_pressed());
        assert_eq!(session.request_count(), 1);
    }
}
