//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                 |
//! |----------------|--------------------|-----------------------------|
//! | `button_input` | ButtonPort         | Debounced GPIO button       |
//! | `device_id`    | -                  | eFuse factory MAC           |
//! | `executor`     | CommandExecutor    | Serial log / lamp PWM       |
//! | `log_sink`     | EventSink          | Serial log output           |
//! | `panel`        | StatusSink         | Cross-context LED + button  |
//! |                | ButtonPort         |                             |
//! | `session`      | AssistantSession   | Assistant transport channels|
//! | `status_ui`    | StatusSink         | Status LED pattern engine   |
//! | `time`         | -                  | ESP32 high-resolution timer |

pub mod button_input;
pub mod device_id;
pub mod executor;
pub mod log_sink;
pub mod panel;
pub mod session;
pub mod status_ui;
pub mod time;
