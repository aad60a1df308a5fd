//! ISR-debounced push-button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up. GPIO fires on
//! falling edge; ISR records the raw timestamp into an atomic, and the
//! `tick()` method (called from the main loop at indicator-tick rate)
//! runs the debounce state machine.
//!
//! ## Debounce
//!
//! A press is reported once the line has been quiet (no further falling
//! edges) for the debounce window.  Edges arriving within the window after
//! a reported press are contact bounce on release and are swallowed.

use core::sync::atomic::{AtomicU32, Ordering};

pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// Raw ISR timestamp (milliseconds since boot, truncated to u32).
/// Written by the ISR, read by the main loop.
static BUTTON_ISR_TIMESTAMP: AtomicU32 = AtomicU32::new(0);

/// Button events emitted after debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Settling { last_edge_ms: u32 },
    Cooldown { since_ms: u32 },
}

pub struct ButtonDriver {
    gpio: i32,
    debounce_ms: u32,
    state: DebounceState,
    last_isr_ms: u32,
}

impl ButtonDriver {
    pub fn new(gpio: i32, debounce_ms: u32) -> Self {
        Self {
            gpio,
            debounce_ms,
            state: DebounceState::Idle,
            last_isr_ms: 0,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Call from the main loop at each tick.
    /// `now_ms` is the current monotonic time in milliseconds.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let isr_ms = BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire);
        self.step(isr_ms, now_ms)
    }

    fn step(&mut self, isr_ms: u32, now_ms: u32) -> Option<ButtonEvent> {
        let new_edge = isr_ms != self.last_isr_ms && isr_ms != 0;
        if new_edge {
            self.last_isr_ms = isr_ms;
        }

        match self.state {
            DebounceState::Idle => {
                if new_edge {
                    self.state = DebounceState::Settling { last_edge_ms: isr_ms };
                }
                None
            }

            DebounceState::Settling { last_edge_ms } => {
                if new_edge {
                    // Bounce: restart the quiet window.
                    self.state = DebounceState::Settling { last_edge_ms: isr_ms };
                    return None;
                }
                if now_ms.wrapping_sub(last_edge_ms) >= self.debounce_ms {
                    self.state = DebounceState::Cooldown { since_ms: now_ms };
                    return Some(ButtonEvent::Press);
                }
                None
            }

            DebounceState::Cooldown { since_ms } => {
                if new_edge {
                    self.state = DebounceState::Cooldown { since_ms: now_ms };
                } else if now_ms.wrapping_sub(since_ms) >= self.debounce_ms {
                    self.state = DebounceState::Idle;
                }
                None
            }
        }
    }
}

/// ISR handler: register this on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
#[allow(unused)]
pub fn button_isr_handler(now_ms: u32) {
    BUTTON_ISR_TIMESTAMP.store(now_ms, Ordering::Release);
}
