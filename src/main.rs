//! VoiceHat Firmware: Main Entry Point
//!
//! Hexagonal architecture: one worker consumes the assistant event stream,
//! the main task owns the button and the status LED.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SessionBridge     StatusUi       ButtonInput    LampExecutor  │
//! │  (events+requests) (StatusSink)   (ButtonPort)   (Executor)    │
//! │  LogEventSink      MonotonicClock                              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │         AssistantController (pure logic)               │    │
//! │  │  FSM · StartGate · device-action extraction            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The assistant transport is reached over the console UART: newline-
//! delimited JSON event records come in on stdin, start requests go out on
//! stdout.
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use voicehat::adapters::button_input::ButtonInput;
use voicehat::adapters::device_id;
use voicehat::adapters::executor::{LampExecutor, LogCommandExecutor};
use voicehat::adapters::log_sink::LogEventSink;
use voicehat::adapters::panel::Panel;
use voicehat::adapters::session::{ChannelSession, SessionRequest, SESSION};
use voicehat::adapters::status_ui::StatusUi;
use voicehat::adapters::time::MonotonicClock;
use voicehat::app::service::AssistantController;
use voicehat::config::AssistantConfig;
use voicehat::drivers::button::ButtonDriver;
use voicehat::drivers::hw_init;
use voicehat::drivers::lamp::LampDriver;
use voicehat::drivers::status_led::StatusLed;
use voicehat::pins;
use voicehat::Error;

fn load_config() -> AssistantConfig {
    let blob = option_env!("VOICEHAT_CONFIG");
    match AssistantConfig::load(blob) {
        Ok(cfg) => {
            if blob.is_some() {
                info!("Config loaded from build blob");
            }
            cfg
        }
        Err(e) => {
            warn!("Config rejected ({}), using defaults", e);
            AssistantConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  VoiceHat v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Hardware peripherals ───────────────────────────────
    hw_init::init_peripherals()
        .inspect_err(|e| error!("HAL init failed: {}", e))
        .map_err(Error::from)?;
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed ({}), button disabled", e);
    }

    // ── 3. Config + identity ──────────────────────────────────
    let config = load_config();
    let mac = device_id::read_mac()
        .inspect_err(|e| error!("Identity unavailable: {}", e))
        .map_err(Error::from)?;
    let dev_id = device_id::device_id(&mac)?;
    info!(
        "Device: model={} id={} api={}",
        config.device_model_id, dev_id, config.device_api_url
    );

    // Registration record for the transport; both values are opaque here.
    println!(
        "{}",
        serde_json::json!({
            "register": {
                "device_model_id": config.device_model_id.as_str(),
                "device_id": dev_id.as_str(),
            }
        })
    );

    // ── 4. Adapters ───────────────────────────────────────────
    let session = Arc::new(ChannelSession::new(&SESSION, dev_id.as_str()));
    let mut ui = StatusUi::new(StatusLed::new());
    let mut button = ButtonInput::new(ButtonDriver::new(
        pins::BUTTON_GPIO,
        config.button_debounce_ms,
    ));
    let mut panel = Panel::new(ui.link(), button.registrar());
    let mut controller = AssistantController::new(session, config.gate_policy);
    let execute_actions = config.execute_device_actions;

    // ── 5. Transport reader ───────────────────────────────────
    std::thread::Builder::new()
        .name("session-rx".into())
        .stack_size(8 * 1024)
        .spawn(|| {
            let queued = SESSION.pump_lines(std::io::stdin().lock());
            info!("Session: console closed after {} events", queued);
        })?;

    // ── 6. Controller worker ──────────────────────────────────
    std::thread::Builder::new()
        .name("controller".into())
        .stack_size(16 * 1024)
        .spawn(move || {
            let mut sink = LogEventSink::new();
            let events = SESSION.event_source();
            let summary = if execute_actions {
                let mut exec = LampExecutor::new(LampDriver::new());
                controller.run(events, &mut panel, &mut exec, &mut sink)
            } else {
                let mut exec = LogCommandExecutor::new();
                controller.run(events, &mut panel, &mut exec, &mut sink)
            };
            info!("Controller stopped: {:?}", summary);
        })?;

    info!("System ready. Entering button/indicator loop.");

    // ── 7. Button + indicator loop ────────────────────────────
    let clock = MonotonicClock::new();
    let tick = Duration::from_millis(config.led_tick_ms as u64);

    loop {
        button.poll(clock.uptime_ms());
        ui.tick(config.led_tick_ms);

        while let Some(request) = SESSION.try_next_request() {
            match request {
                SessionRequest::StartConversation => {
                    println!("{}", serde_json::json!({ "request": "start_conversation" }));
                }
            }
        }

        std::thread::sleep(tick);
    }
}
