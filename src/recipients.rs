// SPDX-License-Identifier: MIT

//! Recipient resolution: who must hear about a change.
//!
//! One pure function per event kind, from post-write snapshots to sets of
//! user ids. The dispatcher fans each set out to live sessions; resolution
//! itself never touches the store or the registry, which keeps the rules
//! trivially testable and keeps a resolution failure from ever affecting a
//! write that already happened.

use std::collections::HashSet;

use crate::models::{Task, Team, UserId};

/// `taskCreated` / `taskUpdated` / `taskDeleted`: the task's assignees, the
/// owning team's current members, and the actor. The actor is always included
/// so the originating session gets the same refresh signal as everyone else.
/// A team that vanished between the write and resolution contributes nothing.
pub fn task_change(task: &Task, team: Option<&Team>, actor: UserId) -> HashSet<UserId> {
    let mut set: HashSet<UserId> = task.assignees.iter().copied().collect();
    if let Some(team) = team {
        set.extend(team.members.iter().copied());
    }
    set.insert(actor);
    set
}

/// `teamInviteReceived` at creation: exactly the users invited along with the
/// new team.
pub fn team_created(team: &Team) -> HashSet<UserId> {
    team.pending_invites.iter().copied().collect()
}

/// `teamInviteReceived` for a single later invite.
pub fn invite_sent(invitee: UserId) -> HashSet<UserId> {
    HashSet::from([invitee])
}

/// `inviteRevoked`, whether the invitee denied or the owner revoked: the
/// affected user only, no broadcast.
pub fn invite_revoked(invitee: UserId) -> HashSet<UserId> {
    HashSet::from([invitee])
}

/// `teamJoined`: the joining user's own sessions.
pub fn team_joined(joiner: UserId) -> HashSet<UserId> {
    HashSet::from([joiner])
}

/// Current member roster: `memberJoinedTeam` and `teamUpdated` resolve
/// against the post-write set; `teamDeleted` resolves against a roster
/// captured immediately before the delete.
pub fn team_roster(team: &Team) -> HashSet<UserId> {
    team.members.iter().copied().collect()
}

/// `removedFromTeam`: the removed member only.
pub fn member_removed(member: UserId) -> HashSet<UserId> {
    HashSet::from([member])
}

/// `leftTeam`: the leaver's own sessions.
pub fn left_team(leaver: UserId) -> HashSet<UserId> {
    HashSet::from([leaver])
}

/// `memberLeftTeam`: the owner.
pub fn member_left(owner: UserId) -> HashSet<UserId> {
    HashSet::from([owner])
}

/// `friendRequestReceived`: the recipient only.
pub fn friend_request(recipient: UserId) -> HashSet<UserId> {
    HashSet::from([recipient])
}

/// `friendRequestAccepted` and the `friendsUpdated` that rides along: the
/// original requester. The acceptor's own sessions are not notified, they
/// performed the action.
pub fn request_accepted(requester: UserId) -> HashSet<UserId> {
    HashSet::from([requester])
}

/// `friendRemoved`: the other side of the severed friendship.
pub fn friend_removed(other: UserId) -> HashSet<UserId> {
    HashSet::from([other])
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Priority, TaskId, TaskStatus, TeamId};

    fn task_on(team: Option<TeamId>, creator: UserId, assignees: Vec<UserId>) -> Task {
        Task {
            id: TaskId::new(),
            text: "t".into(),
            description: None,
            user: creator,
            team,
            assignees,
            priority: Priority::default(),
            due_date: Utc::now(),
            status: TaskStatus::default(),
            is_personal: team.is_none(),
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_change_unions_assignees_members_and_actor() {
        let owner = UserId::new();
        let member = UserId::new();
        let assignee = UserId::new();
        let actor = UserId::new();
        let mut team = Team::new("ops".into(), owner);
        team.members.push(member);
        let task = task_on(Some(team.id), owner, vec![assignee]);

        let set = task_change(&task, Some(&team), actor);
        assert_eq!(set, HashSet::from([owner, member, assignee, actor]));
    }

    #[test]
    fn test_task_change_dedupes_actor_already_in_roster() {
        let owner = UserId::new();
        let team = Team::new("ops".into(), owner);
        let task = task_on(Some(team.id), owner, vec![owner]);

        let set = task_change(&task, Some(&team), owner);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_vanished_team_contributes_nothing() {
        let creator = UserId::new();
        let actor = UserId::new();
        let task = task_on(Some(TeamId::new()), creator, vec![creator]);

        let set = task_change(&task, None, actor);
        assert_eq!(set, HashSet::from([creator, actor]));
    }

    #[test]
    fn test_team_created_targets_invitees_not_owner() {
        let owner = UserId::new();
        let (a, b) = (UserId::new(), UserId::new());
        let mut team = Team::new("ops".into(), owner);
        team.pending_invites = vec![a, b];

        assert_eq!(team_created(&team), HashSet::from([a, b]));
    }

    #[test]
    fn test_roster_tracks_current_members() {
        let owner = UserId::new();
        let member = UserId::new();
        let mut team = Team::new("ops".into(), owner);
        team.members.push(member);
        assert_eq!(team_roster(&team), HashSet::from([owner, member]));
    }
}
