//! Device-action extraction.
//!
//! Walks the nested payload of a `DeviceAction` event and yields the
//! `(command, params)` pairs addressed to one device id:
//!
//! ```text
//! args.inputs[]                      intent == EXECUTE
//!   └─ payload.commands[]            devices[].id contains device_id
//!        └─ execution[]              { command, params }
//! ```
//!
//! The walk is a lazy iterator over borrowed JSON; nothing is collected up
//! front, callers can stop early, and calling [`extract`] again restarts
//! from the top.  Every level is independent: a malformed input, command
//! block or execution entry contributes nothing, its siblings still do.

use serde_json::Value;

use crate::events::DeviceActionPayload;

use super::commands::{DeviceCommand, Params};

/// Intent carried by inputs that ask the device to execute commands.
pub const EXECUTE_INTENT: &str = "action.devices.EXECUTE";

fn is_execute_intent(intent: &str) -> bool {
    intent == EXECUTE_INTENT || intent == "EXECUTE"
}

/// Truthiness of a JSON value: null, false, 0, "", [] and {} are empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Iterate `value[key]` as an array; anything else is an empty level.
fn array_at<'a>(value: &'a Value, key: &str) -> core::slice::Iter<'a, Value> {
    slice_of(value.get(key)).iter()
}

fn slice_of(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

fn targets_device(block: &Value, device_id: &str) -> bool {
    array_at(block, "devices").any(|device| device.get("id").and_then(Value::as_str) == Some(device_id))
}

fn to_command(entry: &Value) -> Option<DeviceCommand> {
    let command = entry.get("command").and_then(Value::as_str)?;
    let params: Params = entry.get("params").filter(|p| is_truthy(p)).cloned();
    Some(DeviceCommand::new(command, params))
}

/// Commands in `payload` addressed to `device_id`, in payload order.
pub fn extract<'a>(
    payload: &'a DeviceActionPayload,
    device_id: &'a str,
) -> impl Iterator<Item = DeviceCommand> + 'a {
    slice_of(payload.args.get("inputs"))
        .iter()
        .filter(|input| {
            input
                .get("intent")
                .and_then(Value::as_str)
                .is_some_and(is_execute_intent)
        })
        .filter_map(|input| input.get("payload"))
        .flat_map(|payload| array_at(payload, "commands"))
        .filter(move |block| targets_device(block, device_id))
        .flat_map(|block| array_at(block, "execution"))
        .filter_map(to_command)
}
