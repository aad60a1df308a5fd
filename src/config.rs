//! Controller configuration parameters.
//!
//! Identifiers are opaque pass-through values for the assistant session;
//! the rest tunes local behaviour.  Values can be overridden by a JSON
//! blob provisioned alongside the device credentials.

use serde::{Deserialize, Serialize};

use crate::app::gate::GatePolicy;
use crate::app::ports::ConfigError;

pub type ModelIdString = heapless::String<64>;
pub type UrlString = heapless::String<128>;

pub const DEFAULT_DEVICE_MODEL_ID: &str = "voicehat-kit";
pub const DEFAULT_DEVICE_API_URL: &str = "https://embeddedassistant.googleapis.com/v1alpha2";

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    // --- Identity ---
    /// Device model registered with the assistant service
    pub device_model_id: ModelIdString,
    /// Device API endpoint handed to the session
    pub device_api_url: UrlString,

    // --- Gating ---
    /// Whether a press during a running turn may start another one
    pub gate_policy: GatePolicy,

    // --- Button ---
    /// Edge debounce window (milliseconds)
    pub button_debounce_ms: u32,

    // --- Indicator ---
    /// Status LED refresh period (milliseconds)
    pub led_tick_ms: u32,

    // --- Device actions ---
    /// Actuate the lamp for device actions; `false` only reports them
    pub execute_device_actions: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            device_model_id: heapless_str(DEFAULT_DEVICE_MODEL_ID),
            device_api_url: heapless_str(DEFAULT_DEVICE_API_URL),
            gate_policy: GatePolicy::Strict,
            button_debounce_ms: 50,
            led_tick_ms: 20, // 50 Hz
            execute_device_actions: true,
        }
    }
}

impl AssistantConfig {
    /// Parse a provisioned JSON blob, filling absent fields with defaults,
    /// then validate it.
    pub fn from_json(blob: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(blob).map_err(|e| ConfigError::Parse {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Config for this build: the provisioned blob if there is one,
    /// defaults otherwise.
    pub fn load(blob: Option<&str>) -> crate::Result<Self> {
        match blob {
            Some(blob) => Ok(Self::from_json(blob)?),
            None => Ok(Self::default()),
        }
    }

    /// Reject values that would leave the device unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_model_id.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("device_model_id must not be empty"));
        }
        if !self.device_api_url.starts_with("https://") {
            return Err(ConfigError::ValidationFailed("device_api_url must be https"));
        }
        if !(5..=500).contains(&self.button_debounce_ms) {
            return Err(ConfigError::ValidationFailed("button_debounce_ms must be 5-500"));
        }
        if !(5..=1000).contains(&self.led_tick_ms) {
            return Err(ConfigError::ValidationFailed("led_tick_ms must be 5-1000"));
        }
        Ok(())
    }
}

/// Copy a compile-time constant into a fixed-capacity string.
/// Truncates at a char boundary if the constant outgrows the capacity.
fn heapless_str<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
