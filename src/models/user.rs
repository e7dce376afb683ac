//! User account model and its public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// A registered account as held in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string. Never exposed through API views.
    pub password_hash: String,
    /// Accepted friendships, symmetric with the other side's list.
    pub friends: Vec<UserId>,
    /// Senders of friend requests still awaiting a response from this user.
    pub friend_requests: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_friend(&self, other: UserId) -> bool {
        self.friends.contains(&other)
    }

    pub fn has_request_from(&self, other: UserId) -> bool {
        self.friend_requests.contains(&other)
    }
}

/// Minimal projection used wherever another user is referenced in a response:
/// friend lists, team member lists, task assignees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub username: String,
}

impl UserRef {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
