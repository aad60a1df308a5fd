//! Fuzz target: device-action extraction
//!
//! Interprets the input as a JSON `args` object and walks it with
//! `device_actions::extract` for a fixed device id.
//!
//! Invariants checked:
//! - No panics on arbitrarily nested / mistyped payloads
//! - Yielded params are never null or empty (those become `None`)
//! - Extraction is restartable: two walks yield the same commands
//!
//! cargo fuzz run fuzz_device_actions

#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use voicehat::app::device_actions::extract;
use voicehat::events::DeviceActionPayload;

fuzz_target!(|data: &[u8]| {
    let Ok(Value::Object(args)) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let payload = DeviceActionPayload { args };

    let first: Vec<_> = extract(&payload, "dev1").collect();
    for cmd in &first {
        if let Some(params) = &cmd.params {
            assert!(!params.is_null());
            assert!(params.as_object().is_none_or(|o| !o.is_empty()));
        }
    }

    let second: Vec<_> = extract(&payload, "dev1").collect();
    assert_eq!(first, second);
});
