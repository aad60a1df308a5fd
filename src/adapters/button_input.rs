//! Button input adapter.
//!
//! [`ButtonInput`] owns the debounced [`ButtonDriver`] and lives on the
//! main task.  The controller, running on the event worker, installs its
//! press handler through a [`ButtonRegistrar`] that shares the handler
//! slot.  Installation is write-once: a second registration keeps the
//! first handler.

use std::sync::{Arc, OnceLock};

use log::debug;

use crate::app::ports::ButtonPort;
use crate::app::service::ButtonHandler;
use crate::drivers::button::{ButtonDriver, ButtonEvent};

type HandlerSlot = Arc<OnceLock<ButtonHandler>>;

pub struct ButtonInput {
    driver: ButtonDriver,
    handler: HandlerSlot,
}

impl ButtonInput {
    pub fn new(driver: ButtonDriver) -> Self {
        Self {
            driver,
            handler: Arc::new(OnceLock::new()),
        }
    }

    /// A [`ButtonPort`] that installs into this input's handler slot.
    pub fn registrar(&self) -> ButtonRegistrar {
        ButtonRegistrar {
            slot: Arc::clone(&self.handler),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handler.get().is_some()
    }

    /// Run the debouncer and forward a confirmed press.
    /// Returns `true` when the press reached the session.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        match self.driver.tick(now_ms) {
            Some(ButtonEvent::Press) => self.press(),
            None => false,
        }
    }

    /// Dispatch one press to the installed handler.
    pub fn press(&self) -> bool {
        match self.handler.get() {
            Some(handler) => handler.on_button_pressed(),
            None => {
                debug!("Button: press before handler registration");
                false
            }
        }
    }
}

impl ButtonPort for ButtonInput {
    fn register_press_handler(&mut self, handler: ButtonHandler) -> bool {
        self.handler.set(handler).is_ok()
    }
}

/// Cross-context handle for installing the press handler.
#[derive(Clone)]
pub struct ButtonRegistrar {
    slot: HandlerSlot,
}

impl ButtonPort for ButtonRegistrar {
    fn register_press_handler(&mut self, handler: ButtonHandler) -> bool {
        self.slot.set(handler).is_ok()
    }
}
