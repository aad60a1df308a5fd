//! Start gate: decides whether a button press may open a new turn.
//!
//! The gate is the only state shared between the event worker (which
//! opens/closes it as lifecycle events arrive) and the button context
//! (which reads it on every press).  Both sides go through one
//! critical-section mutex, so a press is always evaluated against a
//! complete gate snapshot and a check-and-claim is a single step.
//!
//! | Flag               | Set by                    | Cleared by                       |
//! |--------------------|---------------------------|----------------------------------|
//! | `library_ready`    | `StartFinished`           | never (process lifetime)         |
//! | `turn_in_progress` | turn start / press claim  | turn end, no response, timeout, error, `StartFinished` |

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::{Deserialize, Serialize};

/// How strictly presses are gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Ready **and** no turn in progress.
    #[default]
    Strict,
    /// Ready only; a press during a turn still requests a new one.
    Loose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct GateState {
    library_ready: bool,
    turn_in_progress: bool,
}

impl GateState {
    fn allows_start(self, policy: GatePolicy) -> bool {
        self.library_ready && (policy == GatePolicy::Loose || !self.turn_in_progress)
    }
}

pub struct StartGate {
    policy: GatePolicy,
    state: Mutex<CriticalSectionRawMutex, Cell<GateState>>,
}

impl StartGate {
    /// A closed gate.  Nothing may start until [`open`](Self::open).
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(Cell::new(GateState::default())),
        }
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// The assistant finished starting.  Idempotent.
    ///
    /// A freshly started library has no turn in flight, so this also drops
    /// any pending turn or unanswered press claim.
    pub fn open(&self) {
        self.update(|s| {
            s.library_ready = true;
            s.turn_in_progress = false;
        });
    }

    /// A turn began, whoever started it (button, hotword, follow-on).
    pub fn turn_started(&self) {
        self.update(|s| s.turn_in_progress = true);
    }

    /// The current turn ended one way or another.
    pub fn turn_ended(&self) {
        self.update(|s| s.turn_in_progress = false);
    }

    /// Whether a press right now would be allowed to start a turn.
    pub fn can_start_conversation(&self) -> bool {
        self.state.lock(|cell| cell.get().allows_start(self.policy))
    }

    /// Check and claim in one critical section.
    ///
    /// Returns `true` if the caller may request a turn.  Under
    /// [`GatePolicy::Strict`] the gate is marked in-progress before the
    /// lock is released, so a racing press sees it closed.
    pub fn try_claim(&self) -> bool {
        self.state.lock(|cell| {
            let mut s = cell.get();
            if !s.allows_start(self.policy) {
                return false;
            }
            s.turn_in_progress = true;
            cell.set(s);
            true
        })
    }

    /// Undo a [`try_claim`](Self::try_claim) whose request never reached
    /// the session.
    pub fn release_claim(&self) {
        self.turn_ended();
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock(|cell| cell.get().library_ready)
    }

    pub fn is_turn_in_progress(&self) -> bool {
        self.state.lock(|cell| cell.get().turn_in_progress)
    }

    fn update(&self, f: impl FnOnce(&mut GateState)) {
        self.state.lock(|cell| {
            let mut s = cell.get();
            f(&mut s);
            cell.set(s);
        });
    }
}
