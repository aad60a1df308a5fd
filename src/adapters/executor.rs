//! Command executor adapters.
//!
//! | Executor             | Behaviour                                   |
//! |----------------------|---------------------------------------------|
//! | `LogCommandExecutor` | Reports each command, actuates nothing      |
//! | `LampExecutor`       | `OnOff` / `BrightnessAbsolute` on the lamp  |

use log::info;

use crate::app::commands::{DeviceCommand, KnownCommand};
use crate::app::ports::{CommandExecutor, ExecError};
use crate::drivers::lamp::LampDriver;

/// Accepts every command and only logs it.
#[derive(Default)]
pub struct LogCommandExecutor {
    executed: u64,
}

impl LogCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl CommandExecutor for LogCommandExecutor {
    fn execute(&mut self, command: &DeviceCommand) -> Result<(), ExecError> {
        info!("EXEC  | {}", command);
        self.executed += 1;
        Ok(())
    }
}

/// Drives the dimmable lamp.
pub struct LampExecutor {
    lamp: LampDriver,
}

impl LampExecutor {
    pub fn new(lamp: LampDriver) -> Self {
        Self { lamp }
    }

    pub fn lamp(&self) -> &LampDriver {
        &self.lamp
    }
}

impl CommandExecutor for LampExecutor {
    fn execute(&mut self, command: &DeviceCommand) -> Result<(), ExecError> {
        match command.known().map_err(ExecError::InvalidParams)? {
            KnownCommand::OnOff { on: true } => self.lamp.turn_on(),
            KnownCommand::OnOff { on: false } => self.lamp.turn_off(),
            KnownCommand::BrightnessAbsolute { brightness } => self.lamp.set_brightness(brightness),
            KnownCommand::Unsupported => return Err(ExecError::Unsupported),
        }
        Ok(())
    }
}
