//! GPIO / peripheral pin assignments for the VoiceHat board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Arcade button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button that starts a conversation turn.
pub const BUTTON_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// Status LED (inside the button cap)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the single-colour status LED.
pub const STATUS_LED_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Lamp output (target of OnOff / BrightnessAbsolute device actions)
// ---------------------------------------------------------------------------

/// Digital output: enables the lamp driver (active HIGH).
pub const LAMP_ENABLE_GPIO: i32 = 26;
/// LEDC PWM output for lamp dimming.
pub const LAMP_PWM_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency shared by the status LED and the lamp (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
