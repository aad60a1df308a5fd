//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The raw diagnostic record for every assistant event ends up here.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { device_id } => {
                info!("START | device_id={}", device_id);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from.name(), to.name());
            }
            AppEvent::GateOpened => {
                info!("GATE  | open");
            }
            AppEvent::ButtonArmed => {
                info!("BTN   | press handler armed");
            }
            AppEvent::CommandDispatched { command, result } => match result {
                Ok(()) => info!("CMD   | {} | ok", command.command),
                Err(e) => warn!("CMD   | {} | failed: {}", command.command, e),
            },
            AppEvent::EventObserved { kind, record } => {
                debug!("EVENT | kind={:?} | {}", kind, record);
            }
            AppEvent::StreamEnded(s) => {
                warn!(
                    "END   | events={} commands={} failed={} status={} changes={}",
                    s.events, s.commands, s.command_failures, s.status_updates, s.state_changes
                );
            }
        }
    }
}
