//! Assistant lifecycle events.
//!
//! The remote assistant session delivers loosely-typed records
//! (`{ "type": "...", "args": { ... } }`).  They are decoded once, at the
//! edge, into [`AssistantEvent`], one variant per event kind, each
//! carrying only the fields that kind can use.  Everything downstream
//! matches on variants instead of poking at optional JSON fields.
//!
//! ```text
//! ┌───────────────┐  RawEvent   ┌────────────────┐  AssistantEvent  ┌────────────┐
//! │ Session / I/O │───────────▶│  from(RawEvent) │────────────────▶│ Controller │
//! │  (external)   │  JSON/serde │  (infallible)   │                  │  handle()  │
//! └───────────────┘             └────────────────┘                  └────────────┘
//! ```

use core::fmt;

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Closed set of lifecycle event kinds the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StartFinished,
    ConversationTurnStarted,
    EndOfUtterance,
    ConversationTurnFinished,
    NoResponse,
    AssistantError,
    ConversationTurnTimeout,
    DeviceAction,
    /// Anything else the session emits (alerts, media, mute changes, ...).
    Other,
}

impl EventKind {
    /// Every recognised kind, in wire order.
    pub const RECOGNISED: [EventKind; 8] = [
        Self::StartFinished,
        Self::ConversationTurnStarted,
        Self::EndOfUtterance,
        Self::ConversationTurnFinished,
        Self::NoResponse,
        Self::AssistantError,
        Self::ConversationTurnTimeout,
        Self::DeviceAction,
    ];

    /// Classify a wire event name.
    ///
    /// Matching is ASCII case-insensitive and the `ON_` prefix is optional,
    /// so `ON_START_FINISHED`, `start_finished` and `On_Start_Finished` are
    /// the same kind.  Unknown names map to [`EventKind::Other`].
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        let bare = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("ON_") => &trimmed[3..],
            _ => trimmed,
        };
        Self::RECOGNISED
            .into_iter()
            .find(|kind| kind.wire_name()[3..].eq_ignore_ascii_case(bare))
            .unwrap_or(Self::Other)
    }

    /// Canonical wire name (`ON_...`).
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::StartFinished => "ON_START_FINISHED",
            Self::ConversationTurnStarted => "ON_CONVERSATION_TURN_STARTED",
            Self::EndOfUtterance => "ON_END_OF_UTTERANCE",
            Self::ConversationTurnFinished => "ON_CONVERSATION_TURN_FINISHED",
            Self::NoResponse => "ON_NO_RESPONSE",
            Self::AssistantError => "ON_ASSISTANT_ERROR",
            Self::ConversationTurnTimeout => "ON_CONVERSATION_TURN_TIMEOUT",
            Self::DeviceAction => "ON_DEVICE_ACTION",
            Self::Other => "ON_OTHER",
        }
    }
}

// ---------------------------------------------------------------------------
// Raw transport record
// ---------------------------------------------------------------------------

/// An event exactly as the session hands it over.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub args: Option<Value>,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>, args: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            args,
        }
    }

    /// Decode one JSON event record.
    ///
    /// `args` may be absent or `null`; any other non-object value is
    /// rejected since no event kind defines positional args.
    pub fn from_json(record: &str) -> Result<Self, DecodeError> {
        let raw: RawEvent = serde_json::from_str(record)?;
        match &raw.args {
            None | Some(Value::Null | Value::Object(_)) => Ok(raw),
            Some(_) => Err(DecodeError::ArgsNotObject),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed event
// ---------------------------------------------------------------------------

/// Whether the session announced a follow-on turn when a turn finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOn {
    /// `with_follow_on_turn: true`: the session keeps listening.
    Requested,
    /// `with_follow_on_turn: false`: the turn is really over.
    NotRequested,
    /// No args, empty args, or a missing / non-boolean flag.
    Unknown,
}

/// JSON args of a `DeviceAction` event.  Interpreted lazily by
/// [`extract`](crate::app::device_actions::extract).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceActionPayload {
    pub args: Map<String, Value>,
}

/// One decoded lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantEvent {
    StartFinished,
    ConversationTurnStarted,
    EndOfUtterance,
    ConversationTurnFinished { follow_on: FollowOn },
    NoResponse,
    AssistantError { is_fatal: bool },
    ConversationTurnTimeout,
    DeviceAction(DeviceActionPayload),
    Other { name: String, args: Option<Value> },
}

impl AssistantEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StartFinished => EventKind::StartFinished,
            Self::ConversationTurnStarted => EventKind::ConversationTurnStarted,
            Self::EndOfUtterance => EventKind::EndOfUtterance,
            Self::ConversationTurnFinished { .. } => EventKind::ConversationTurnFinished,
            Self::NoResponse => EventKind::NoResponse,
            Self::AssistantError { .. } => EventKind::AssistantError,
            Self::ConversationTurnTimeout => EventKind::ConversationTurnTimeout,
            Self::DeviceAction(_) => EventKind::DeviceAction,
            Self::Other { .. } => EventKind::Other,
        }
    }
}

impl From<&RawEvent> for AssistantEvent {
    fn from(raw: &RawEvent) -> Self {
        let kind = EventKind::from_name(&raw.kind);
        // Empty args behave like no args at all.
        let args = match &raw.args {
            Some(Value::Object(map)) if !map.is_empty() => Some(map),
            _ => None,
        };

        match kind {
            EventKind::StartFinished => Self::StartFinished,
            EventKind::ConversationTurnStarted => Self::ConversationTurnStarted,
            EventKind::EndOfUtterance => Self::EndOfUtterance,
            EventKind::ConversationTurnFinished => {
                let follow_on = match args.map(|a| a.get("with_follow_on_turn")) {
                    None => FollowOn::Unknown,
                    Some(Some(Value::Bool(true))) => FollowOn::Requested,
                    Some(Some(Value::Bool(false))) => FollowOn::NotRequested,
                    Some(other) => {
                        warn!("EVENT | turn finished with unusable follow-on flag: {:?}", other);
                        FollowOn::Unknown
                    }
                };
                Self::ConversationTurnFinished { follow_on }
            }
            EventKind::NoResponse => Self::NoResponse,
            EventKind::AssistantError => {
                let is_fatal = args
                    .and_then(|a| a.get("is_fatal"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Self::AssistantError { is_fatal }
            }
            EventKind::ConversationTurnTimeout => Self::ConversationTurnTimeout,
            EventKind::DeviceAction => Self::DeviceAction(DeviceActionPayload {
                args: args.cloned().unwrap_or_default(),
            }),
            EventKind::Other => Self::Other {
                name: raw.kind.clone(),
                args: args.map(|a| Value::Object(a.clone())),
            },
        }
    }
}

impl From<RawEvent> for AssistantEvent {
    fn from(raw: RawEvent) -> Self {
        Self::from(&raw)
    }
}

/// The record as received, e.g.
/// `ON_CONVERSATION_TURN_FINISHED {"with_follow_on_turn":false}`.
impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        match &self.args {
            None | Some(Value::Null) => Ok(()),
            Some(args) => write!(f, " {args}"),
        }
    }
}
