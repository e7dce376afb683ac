// SPDX-License-Identifier: MIT

//! The catalogue of events pushed over live connections.
//!
//! Every frame serializes as `{"event": <name>, "data": <payload>}`, the
//! shape the frontend's socket handler switches on. Payloads carry just
//! enough for the client to decide which lists to refetch; task events carry
//! the full resolved view so the common case needs no follow-up fetch.

use serde::Serialize;

use crate::models::{TaskId, TaskView, TeamId, UserId, UserRef};

#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Event {
    // ─── Tasks ───────────────────────────────────────────────────
    TaskCreated(Box<TaskView>),
    TaskUpdated(Box<TaskView>),
    TaskDeleted(TaskId),

    // ─── Teams and invites ───────────────────────────────────────
    TeamInviteReceived {
        team_id: TeamId,
        team_name: String,
        invited_by: String,
    },
    TeamJoined {
        team_id: TeamId,
    },
    MemberJoinedTeam {
        team_id: TeamId,
        user_id: UserId,
    },
    TeamUpdated {
        team_id: TeamId,
    },
    InviteRevoked {
        team_id: TeamId,
    },
    RemovedFromTeam {
        team_id: TeamId,
    },
    TeamDeleted(TeamId),
    LeftTeam(TeamId),
    MemberLeftTeam {
        team_id: TeamId,
        user_id: UserId,
    },

    // ─── Friends ─────────────────────────────────────────────────
    FriendRequestReceived {
        from: UserRef,
    },
    FriendRequestAccepted {
        friend_id: UserId,
        friend_username: String,
    },
    FriendsUpdated,
    FriendRemoved {
        user_id: UserId,
    },

    // ─── Global refresh hint ─────────────────────────────────────
    DataUpdated,
}

impl Event {
    /// Wire name, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TaskCreated(_) => "taskCreated",
            Event::TaskUpdated(_) => "taskUpdated",
            Event::TaskDeleted(_) => "taskDeleted",
            Event::TeamInviteReceived { .. } => "teamInviteReceived",
            Event::TeamJoined { .. } => "teamJoined",
            Event::MemberJoinedTeam { .. } => "memberJoinedTeam",
            Event::TeamUpdated { .. } => "teamUpdated",
            Event::InviteRevoked { .. } => "inviteRevoked",
            Event::RemovedFromTeam { .. } => "removedFromTeam",
            Event::TeamDeleted(_) => "teamDeleted",
            Event::LeftTeam(_) => "leftTeam",
            Event::MemberLeftTeam { .. } => "memberLeftTeam",
            Event::FriendRequestReceived { .. } => "friendRequestReceived",
            Event::FriendRequestAccepted { .. } => "friendRequestAccepted",
            Event::FriendsUpdated => "friendsUpdated",
            Event::FriendRemoved { .. } => "friendRemoved",
            Event::DataUpdated => "dataUpdated",
        }
    }

    /// Serialized frame ready to hand to every recipient session.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
