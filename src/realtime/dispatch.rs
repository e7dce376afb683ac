// SPDX-License-Identifier: MIT

//! Best-effort fan-out of events to resolved recipients.
//!
//! The dispatcher never returns an error: by the time it runs, the write has
//! succeeded and been answered, and a notification that cannot be delivered
//! is logged and forgotten. A recipient with no live session simply misses
//! the event and catches up on their next fetch.

use std::collections::HashSet;
use std::sync::Arc;

use super::{Event, SessionRegistry};
use crate::models::UserId;

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Serialize once, then push to every live session of every recipient.
    pub fn dispatch(&self, event: &Event, recipients: &HashSet<UserId>) {
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(event = event.kind(), error = %err, "failed to serialize event");
                return;
            }
        };
        let mut sessions = 0;
        for user in recipients {
            sessions += self.registry.send_to_user(*user, &frame);
        }
        tracing::debug!(
            event = event.kind(),
            recipients = recipients.len(),
            sessions,
            "event dispatched"
        );
    }

    /// Push to every connected session regardless of user, for the global
    /// refresh hints.
    pub fn broadcast(&self, event: &Event) {
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(event = event.kind(), error = %err, "failed to serialize event");
                return;
            }
        };
        let sessions = self.registry.broadcast_all(&frame);
        tracing::debug!(event = event.kind(), sessions, "event broadcast");
    }
}
