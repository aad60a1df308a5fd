//! Single-colour status LED driver.
//!
//! One LEDC PWM channel (CH0) dims the LED in the button cap.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channel via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct StatusLed {
    current: u8,
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: 0 }
    }

    pub fn set_brightness(&mut self, duty: u8) {
        if duty != self.current {
            hw_init::ledc_set(hw_init::LEDC_CH_STATUS_LED, duty);
            self.current = duty;
        }
    }

    pub fn off(&mut self) {
        self.set_brightness(0);
    }

    pub fn brightness(&self) -> u8 {
        self.current
    }
}
