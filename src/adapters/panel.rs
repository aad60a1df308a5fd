//! Front-panel adapter: the controller's view of the button-cap hardware.
//!
//! The controller takes one `&mut (impl StatusSink + ButtonPort)`.  On the
//! device the LED and the button are owned by the main task, so the event
//! worker gets a `Panel` of their cross-context handles instead.

use crate::app::ports::{ButtonPort, StatusSink};
use crate::app::service::ButtonHandler;
use crate::fsm::ConversationState;

pub struct Panel<S, B> {
    pub status: S,
    pub button: B,
}

impl<S, B> Panel<S, B> {
    pub fn new(status: S, button: B) -> Self {
        Self { status, button }
    }
}

impl<S: StatusSink, B> StatusSink for Panel<S, B> {
    fn set_status(&mut self, state: ConversationState) {
        self.status.set_status(state);
    }
}

impl<S, B: ButtonPort> ButtonPort for Panel<S, B> {
    fn register_press_handler(&mut self, handler: ButtonHandler) -> bool {
        self.button.register_press_handler(handler)
    }
}
