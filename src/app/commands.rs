//! Device commands extracted from `DeviceAction` payloads.
//!
//! These represent actions the remote assistant wants this device to
//! perform (smart-home style traits).  The
//! [`AssistantController`](super::service::AssistantController) hands each
//! one to the [`CommandExecutor`](super::ports::CommandExecutor) port.

use core::fmt;

use serde_json::Value;

/// Command parameters.  `None` is the explicit "no parameters" marker; a
/// present-but-empty payload is normalised to `None` at extraction time.
pub type Params = Option<Value>;

pub const ON_OFF: &str = "action.devices.commands.OnOff";
pub const BRIGHTNESS_ABSOLUTE: &str = "action.devices.commands.BrightnessAbsolute";

/// One `(command, params)` pair addressed to this device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCommand {
    pub command: String,
    pub params: Params,
}

/// Commands the bundled executors understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownCommand {
    OnOff { on: bool },
    /// Brightness in percent, clamped to 0–100.
    BrightnessAbsolute { brightness: u8 },
    Unsupported,
}

impl DeviceCommand {
    pub fn new(command: impl Into<String>, params: Params) -> Self {
        Self {
            command: command.into(),
            params,
        }
    }

    fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Classify the command.  Returns `Err(name)` when the command is known
    /// but its required parameter `name` is missing or mistyped.
    pub fn known(&self) -> Result<KnownCommand, &'static str> {
        match self.command.as_str() {
            ON_OFF => self
                .param("on")
                .and_then(Value::as_bool)
                .map(|on| KnownCommand::OnOff { on })
                .ok_or("on"),
            BRIGHTNESS_ABSOLUTE => self
                .param("brightness")
                .and_then(Value::as_u64)
                .map(|b| KnownCommand::BrightnessAbsolute {
                    brightness: b.min(100) as u8,
                })
                .ok_or("brightness"),
            _ => Ok(KnownCommand::Unsupported),
        }
    }
}

/// `X with params Y`, the tail of the `Do command ...` log line.
impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(p) => write!(f, "{} with params {}", self.command, p),
            None => write!(f, "{} with params None", self.command),
        }
    }
}
