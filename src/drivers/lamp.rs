//! Dimmable lamp driver.
//!
//! The lamp is the local actuator behind smart-home device actions: a
//! GPIO enable line on the driver stage plus an LEDC PWM channel for
//! brightness.  Brightness is a percentage (0-100) and survives an
//! off/on cycle, the way a wall dimmer does.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real GPIO enable pin and LEDC PWM via hw_init.
//! On host/test: tracks state in-memory only.

use log::info;

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampState {
    Off,
    On { brightness: u8 },
}

pub struct LampDriver {
    state: LampState,
    /// Last non-zero brightness; restored by `turn_on`.
    brightness: u8,
}

impl Default for LampDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LampDriver {
    pub fn new() -> Self {
        Self {
            state: LampState::Off,
            brightness: 100,
        }
    }

    pub fn turn_on(&mut self) {
        self.apply(self.brightness);
    }

    pub fn turn_off(&mut self) {
        self.set_enable_hw(false);
        self.set_duty_hw(0);
        self.state = LampState::Off;
        info!("Lamp: off");
    }

    /// Set brightness in percent.  Zero switches the lamp off but keeps
    /// the previous level for the next `turn_on`.
    pub fn set_brightness(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent == 0 {
            self.turn_off();
            return;
        }
        self.brightness = percent;
        self.apply(percent);
    }

    fn apply(&mut self, percent: u8) {
        self.set_enable_hw(true);
        self.set_duty_hw(percent);
        self.state = LampState::On { brightness: percent };
        info!("Lamp: on | brightness={}%", percent);
    }

    fn set_enable_hw(&self, on: bool) {
        hw_init::gpio_write(pins::LAMP_ENABLE_GPIO, on);
    }

    fn set_duty_hw(&self, percent: u8) {
        let duty_8bit = ((percent as u16) * 255 / 100) as u8;
        hw_init::ledc_set(hw_init::LEDC_CH_LAMP, duty_8bit);
    }

    pub fn state(&self) -> LampState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        matches!(self.state, LampState::On { .. })
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}
