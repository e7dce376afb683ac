// SPDX-License-Identifier: MIT

//! Team model and API views.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ids::{TeamId, UserId};
use super::user::UserRef;

/// A team as held in the store.
///
/// The owner is always present in `members`. `pending_invites` holds users who
/// have been invited but have not yet responded; the two lists are disjoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub owner: UserId,
    pub members: Vec<UserId>,
    pub pending_invites: Vec<UserId>,
}

impl Team {
    /// A new team starts with the owner as its only member.
    pub fn new(name: String, owner: UserId) -> Self {
        Self {
            id: TeamId::new(),
            name,
            owner,
            members: vec![owner],
            pending_invites: Vec::new(),
        }
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        self.owner == user
    }

    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    pub fn is_invited(&self, user: UserId) -> bool {
        self.pending_invites.contains(&user)
    }
}

/// Short reference embedded in task views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
    pub name: String,
}

impl TeamRef {
    pub fn of(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
        }
    }
}

/// Full team view with user references resolved to usernames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: TeamId,
    pub name: String,
    pub owner: UserRef,
    pub members: Vec<UserRef>,
    pub pending_invites: Vec<UserRef>,
}

impl TeamView {
    /// Resolve id arrays against a username lookup. Ids missing from the map
    /// (e.g. accounts deleted mid-request) are dropped from the view rather
    /// than surfaced as an error.
    pub fn build(team: &Team, usernames: &HashMap<UserId, String>) -> Self {
        let resolve = |id: &UserId| {
            usernames.get(id).map(|name| UserRef {
                id: *id,
                username: name.clone(),
            })
        };
        Self {
            id: team.id,
            name: team.name.clone(),
            owner: resolve(&team.owner).unwrap_or(UserRef {
                id: team.owner,
                username: String::new(),
            }),
            members: team.members.iter().filter_map(resolve).collect(),
            pending_invites: team.pending_invites.iter().filter_map(resolve).collect(),
        }
    }
}
