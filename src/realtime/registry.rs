// SPDX-License-Identifier: MIT

//! Registry of live, authenticated connections.
//!
//! Maps a user id to every connection that user currently holds; one person
//! with three tabs open has three entries under the same id and each receives
//! every event addressed to that user. Entries are added strictly on connect
//! and removed strictly on disconnect, and the map is safe under concurrent
//! connect/disconnect of different users.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::UserId;

/// Identifies one connection among a user's sessions.
pub type ConnId = Uuid;

struct SessionHandle {
    conn_id: ConnId,
    tx: mpsc::UnboundedSender<String>,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<UserId, Vec<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection for `user`. Returns the connection id to pass back to
    /// [`unregister`](Self::unregister) and the receiving end the socket task
    /// pumps frames from.
    pub fn register(&self, user: UserId) -> (ConnId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn_id = Uuid::new_v4();
        self.sessions
            .entry(user)
            .or_default()
            .push(SessionHandle { conn_id, tx });
        tracing::debug!(user = %user, conn = %conn_id, "session registered");
        (conn_id, rx)
    }

    /// Drop one connection. The user's entry disappears entirely once their
    /// last connection is gone.
    pub fn unregister(&self, user: UserId, conn_id: ConnId) {
        if let Some(mut handles) = self.sessions.get_mut(&user) {
            handles.retain(|h| h.conn_id != conn_id);
            let empty = handles.is_empty();
            drop(handles);
            if empty {
                self.sessions.remove_if(&user, |_, v| v.is_empty());
            }
        }
        tracing::debug!(user = %user, conn = %conn_id, "session unregistered");
    }

    /// Push a frame to every live connection of `user`. Connections whose
    /// receiving task has gone away are pruned on the spot. Returns how many
    /// connections the frame was handed to.
    pub fn send_to_user(&self, user: UserId, frame: &str) -> usize {
        let Some(mut handles) = self.sessions.get_mut(&user) else {
            return 0;
        };
        let before = handles.len();
        handles.retain(|h| h.tx.send(frame.to_string()).is_ok());
        let delivered = handles.len();
        if delivered < before {
            tracing::debug!(
                user = %user,
                pruned = before - delivered,
                "pruned dead sessions during send"
            );
        }
        delivered
    }

    /// Push a frame to every connection of every user. Returns the number of
    /// connections reached.
    pub fn broadcast_all(&self, frame: &str) -> usize {
        let users: Vec<UserId> = self.sessions.iter().map(|e| *e.key()).collect();
        users
            .into_iter()
            .map(|user| self.send_to_user(user, frame))
            .sum()
    }

    /// Live connection count for one user.
    pub fn connection_count(&self, user: UserId) -> usize {
        self.sessions.get(&user).map_or(0, |h| h.len())
    }

    /// Users with at least one live connection.
    pub fn connected_users(&self) -> usize {
        self.sessions.len()
    }
}
