//! Channel bridge to the external assistant session.
//!
//! The transport that actually talks to the assistant service runs in its
//! own context.  It feeds decoded event records into the bridge and drains
//! start-conversation requests from it.  The controller sees the inbound
//! side as a plain blocking iterator and the outbound side as an
//! [`AssistantSession`].
//!
//! ```text
//! ┌──────────────┐  RawEvent        ┌──────────────────┐
//! │  Transport   │────────────────▶│ ChannelEventSource│──▶ controller
//! │              │◀────────────────│ ChannelSession    │◀── button
//! └──────────────┘  SessionRequest  └──────────────────┘
//! ```
//!
//! Channels are `embassy-sync` bounded MPMC queues, so a bridge can live in
//! a `static` without heap allocation.  [`SESSION`] is the firmware's
//! instance.  Any number of transport threads may push and close
//! concurrently; an event is either queued before the close or refused.

use core::cell::Cell;
use std::io::BufRead;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::signal::Signal;
use futures_lite::future::{block_on, or, poll_fn};
use log::{debug, warn};

use crate::app::ports::{AssistantSession, SessionError};
use crate::events::RawEvent;

/// Outbound request to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    StartConversation,
}

/// Channel depth for inbound events.
pub const EVENT_DEPTH: usize = 16;

/// Channel depth for outbound requests.
pub const REQUEST_DEPTH: usize = 4;

pub struct SessionBridge {
    events: Channel<CriticalSectionRawMutex, RawEvent, EVENT_DEPTH>,
    requests: Channel<CriticalSectionRawMutex, SessionRequest, REQUEST_DEPTH>,
    /// Checked and set in the same critical section that queues an
    /// event, so nothing lands in the inbox after the close.
    closed: Mutex<CriticalSectionRawMutex, Cell<bool>>,
    /// Wakes a consumer parked on an empty inbox when the stream closes.
    hangup: Signal<CriticalSectionRawMutex, ()>,
}

/// The firmware's session bridge.
pub static SESSION: SessionBridge = SessionBridge::new();

impl Default for SessionBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBridge {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            requests: Channel::new(),
            closed: Mutex::new(Cell::new(false)),
            hangup: Signal::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.lock(Cell::get)
    }

    // ── Transport side ────────────────────────────────────────

    /// Queue one event for the controller, blocking while the inbox is full.
    ///
    /// Fails with [`SessionError::Closed`] once the stream is closed, even
    /// if the close happens while this call waits for room.
    pub fn push_raw_event(&self, raw: RawEvent) -> Result<(), SessionError> {
        let mut pending = raw;
        loop {
            // `None`: closed.  `Some(raw)`: inbox full, `raw` handed back.
            let queued = self.closed.lock(|closed| {
                if closed.get() {
                    return Err(None);
                }
                self.events
                    .try_send(pending)
                    .map_err(|TrySendError::Full(raw)| Some(raw))
            });
            match queued {
                Ok(()) => return Ok(()),
                Err(None) => return Err(SessionError::Closed),
                Err(Some(raw)) => pending = raw,
            }
            block_on(poll_fn(|cx| self.events.poll_ready_to_send(cx)));
        }
    }

    /// Decode and queue one JSON event record.
    ///
    /// Undecodable records are logged and dropped; the stream carries on.
    /// Returns `Ok(false)` for a dropped record.
    pub fn push_json_event(&self, record: &str) -> Result<bool, SessionError> {
        match RawEvent::from_json(record) {
            Ok(raw) => self.push_raw_event(raw).map(|()| true),
            Err(e) => {
                warn!("Session: dropping undecodable event: {}", e);
                Ok(false)
            }
        }
    }

    /// Mark the session as ended.  The event source finishes once it has
    /// drained what was queued before this call.  Never blocks.
    pub fn close_event_stream(&self) {
        if self.closed.lock(|closed| closed.replace(true)) {
            return;
        }
        debug!("Session: event stream closed");
        self.hangup.signal(());
    }

    /// Feed newline-delimited JSON records from `reader` until EOF, then
    /// close the stream.  Returns the number of events queued.
    pub fn pump_lines(&self, reader: impl BufRead) -> usize {
        let mut queued = 0;
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Session: read failed: {}", e);
                    break;
                }
            };
            let record = line.trim();
            if record.is_empty() {
                continue;
            }
            match self.push_json_event(record) {
                Ok(true) => queued += 1,
                Ok(false) => {}
                Err(_) => break,
            }
        }
        self.close_event_stream();
        queued
    }

    /// Next pending start request, if any.
    pub fn try_next_request(&self) -> Option<SessionRequest> {
        self.requests.try_receive().ok()
    }

    /// Wait for the next start request.
    pub fn next_request(&self) -> SessionRequest {
        block_on(self.requests.receive())
    }

    // ── Controller side ───────────────────────────────────────

    pub fn event_source(&self) -> ChannelEventSource<'_> {
        ChannelEventSource {
            bridge: self,
            done: false,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound: blocking event iterator
// ───────────────────────────────────────────────────────────────

/// Blocking, ordered record stream.  Ends when the transport closes it
/// and everything queued before the close has been taken.
pub struct ChannelEventSource<'a> {
    bridge: &'a SessionBridge,
    done: bool,
}

impl Iterator for ChannelEventSource<'_> {
    type Item = RawEvent;

    fn next(&mut self) -> Option<RawEvent> {
        while !self.done {
            // Read the flag first: once it is set the inbox only shrinks.
            let closed = self.bridge.is_closed();
            if let Ok(raw) = self.bridge.events.try_receive() {
                return Some(raw);
            }
            if closed {
                self.done = true;
                break;
            }
            let received = block_on(or(
                async { Some(self.bridge.events.receive().await) },
                async {
                    self.bridge.hangup.wait().await;
                    None
                },
            ));
            if received.is_some() {
                return received;
            }
        }
        None
    }
}

impl core::iter::FusedIterator for ChannelEventSource<'_> {}

// ───────────────────────────────────────────────────────────────
// Outbound: AssistantSession over the request channel
// ───────────────────────────────────────────────────────────────

pub struct ChannelSession {
    bridge: &'static SessionBridge,
    device_id: String,
}

impl ChannelSession {
    pub fn new(bridge: &'static SessionBridge, device_id: impl Into<String>) -> Self {
        Self {
            bridge,
            device_id: device_id.into(),
        }
    }
}

impl AssistantSession for ChannelSession {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Never blocks: this runs in the button context.
    fn start_conversation(&self) -> Result<(), SessionError> {
        if self.bridge.is_closed() {
            return Err(SessionError::Closed);
        }
        self.bridge
            .requests
            .try_send(SessionRequest::StartConversation)
            .map_err(|_| SessionError::RequestQueueFull)
    }
}
