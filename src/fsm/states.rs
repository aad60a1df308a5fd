//! The transition table.
//!
//! | Event                                    | Indicator   |
//! |------------------------------------------|-------------|
//! | StartFinished                            | `starting`  |
//! | ConversationTurnStarted                  | `listening` |
//! | EndOfUtterance                           | `thinking`  |
//! | ConversationTurnFinished, no follow-on   | `ready`     |
//! | ConversationTurnFinished, follow-on / ?  | -           |
//! | NoResponse                               | `ready`     |
//! | AssistantError                           | `error`     |
//! | ConversationTurnTimeout                  | `ready`     |
//! | DeviceAction                             | `listening` |
//! | anything else                            | -           |

use super::ConversationState;
use crate::events::{AssistantEvent, FollowOn};

/// Indicator state for `event`, or `None` when the event leaves it alone.
///
/// A finished turn only reads as `ready` when the session explicitly said
/// no follow-on turn is coming; missing args are not evidence of that.
pub fn next_state(event: &AssistantEvent) -> Option<ConversationState> {
    match event {
        AssistantEvent::StartFinished => Some(ConversationState::Starting),
        AssistantEvent::ConversationTurnStarted | AssistantEvent::DeviceAction(_) => {
            Some(ConversationState::Listening)
        }
        AssistantEvent::EndOfUtterance => Some(ConversationState::Thinking),
        AssistantEvent::ConversationTurnFinished {
            follow_on: FollowOn::NotRequested,
        }
        | AssistantEvent::NoResponse
        | AssistantEvent::ConversationTurnTimeout => Some(ConversationState::Ready),
        AssistantEvent::AssistantError { .. } => Some(ConversationState::Error),
        AssistantEvent::ConversationTurnFinished {
            follow_on: FollowOn::Requested | FollowOn::Unknown,
        }
        | AssistantEvent::Other { .. } => None,
    }
}
