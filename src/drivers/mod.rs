//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod hw_init;
pub mod lamp;
pub mod led_patterns;
pub mod status_led;
