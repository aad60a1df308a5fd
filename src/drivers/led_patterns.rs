//! Status LED pattern engine.
//!
//! Generates a time-varying brightness for the single-colour LED in the
//! button cap.  The main loop calls `tick()` each indicator cycle and
//! feeds the result into `StatusLed::set_brightness()`.
//!
//! ## Pattern types
//!
//! | Pattern      | Description                      | Rate   |
//! |-------------|----------------------------------|--------|
//! | Solid        | Constant level                   | -      |
//! | Breathing    | Smooth ramp up/down              | 0.5 Hz |
//! | FastPulse    | Triangular ramp                  | 2 Hz   |
//! | Beacon       | Short blip, long pause           | 0.5 Hz |
//! | RapidFlash   | Very fast on/off                 | 8 Hz   |
//! | Off          | Dark                             | -      |

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternId {
    Solid,
    Breathing,
    FastPulse,
    Beacon,
    RapidFlash,
    Off,
}

pub const FULL_BRIGHTNESS: u8 = 255;

/// LED pattern engine. Stack-allocated, no heap.
pub struct LedPatternEngine {
    phase_ms: u32,
    level: u8,
    active: Option<PatternId>,
    requested: Option<PatternId>,
}

impl Default for LedPatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LedPatternEngine {
    pub fn new() -> Self {
        Self {
            phase_ms: 0,
            level: FULL_BRIGHTNESS,
            active: None,
            requested: None,
        }
    }

    /// Select the pattern to render from the next tick on.
    pub fn set_pattern(&mut self, pattern: PatternId) {
        self.requested = Some(pattern);
    }

    /// Peak brightness used by every pattern.
    pub fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    pub fn pattern(&self) -> Option<PatternId> {
        self.requested
    }

    /// Clear the pattern; the LED goes dark.
    pub fn clear(&mut self) {
        self.requested = None;
        self.active = None;
        self.phase_ms = 0;
    }

    /// Advance the pattern phase and return the current brightness.
    /// `delta_ms` is the time since the last call.
    pub fn tick(&mut self, delta_ms: u32) -> u8 {
        self.phase_ms = self.phase_ms.wrapping_add(delta_ms);

        if self.requested != self.active {
            self.phase_ms = 0;
            self.active = self.requested;
        }

        match self.active {
            Some(pattern) => self.generate(pattern),
            None => 0,
        }
    }

    fn generate(&self, pattern: PatternId) -> u8 {
        let on = |lit: bool| if lit { self.level } else { 0 };
        match pattern {
            PatternId::Solid => self.level,
            PatternId::Off => 0,
            PatternId::Breathing => Self::scale(self.level, Self::triangle(self.phase_ms, 2000)),
            PatternId::FastPulse => Self::scale(self.level, Self::triangle(self.phase_ms, 500)),
            PatternId::Beacon => on(self.phase_ms % 2000 < 100),
            PatternId::RapidFlash => on(self.phase_ms % 125 < 63),
        }
    }

    /// Triangular approximation of a sine without libm:
    /// ramps 0→255→0 over `period_ms`.
    fn triangle(phase_ms: u32, period_ms: u32) -> u8 {
        let pos = (phase_ms % period_ms) as u64;
        let half = period_ms as u64 / 2;
        if pos < half {
            ((pos * 255) / half) as u8
        } else {
            (((period_ms as u64 - pos) * 255) / half) as u8
        }
    }

    fn scale(level: u8, brightness: u8) -> u8 {
        ((level as u16 * brightness as u16) / 255) as u8
    }
}
