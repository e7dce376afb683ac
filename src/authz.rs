// SPDX-License-Identifier: MIT

//! Authorization decisions, one function per action family.
//!
//! Every rule lives here instead of being re-derived inline in each handler.
//! The `can_*` functions are pure predicates over freshly loaded snapshots;
//! the `ensure_*` wrappers turn a denial into the canonical error so call
//! sites stay one line. A missing resource is the caller's problem and maps
//! to `NotFound` before these run.

use crate::error::{AppError, Result};
use crate::models::{Task, Team, User, UserId};

/// Task edit/delete: the creator always may; on a team task any current
/// member may as well.
pub fn can_modify_task(actor: UserId, task: &Task, team: Option<&Team>) -> bool {
    task.user == actor || team.is_some_and(|t| t.is_member(actor))
}

/// Creating a task under a team requires current membership.
pub fn can_add_team_task(actor: UserId, team: &Team) -> bool {
    team.is_member(actor)
}

/// Inviting, renaming, removing members and deleting are owner-only.
pub fn can_administer_team(actor: UserId, team: &Team) -> bool {
    team.is_owner(actor)
}

/// Responding to an invite requires actually holding one.
pub fn can_respond_invite(actor: UserId, team: &Team) -> bool {
    team.is_invited(actor)
}

/// Members other than the owner may leave.
pub fn can_leave_team(actor: UserId, team: &Team) -> bool {
    team.is_member(actor) && !team.is_owner(actor)
}

/// A friend request can be answered only by its recipient, and only while it
/// is still pending.
pub fn can_respond_friend_request(recipient: &User, requester: UserId) -> bool {
    recipient.has_request_from(requester)
}

/// Either side of a friendship may sever it.
pub fn can_remove_friend(actor: &User, friend: UserId) -> bool {
    actor.is_friend(friend)
}

// ─── Result-returning wrappers for the write paths ───────────────

pub fn ensure_task_edit(actor: UserId, task: &Task, team: Option<&Team>) -> Result<()> {
    if can_modify_task(actor, task, team) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you do not have access to this task".into(),
        ))
    }
}

pub fn ensure_team_member(actor: UserId, team: &Team) -> Result<()> {
    if can_add_team_task(actor, team) {
        Ok(())
    } else {
        Err(AppError::Forbidden("you are not a member of this team".into()))
    }
}

pub fn ensure_team_owner(actor: UserId, team: &Team) -> Result<()> {
    if can_administer_team(actor, team) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only the team owner can perform this action".into(),
        ))
    }
}

pub fn ensure_invited(actor: UserId, team: &Team) -> Result<()> {
    if can_respond_invite(actor, team) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "no pending invite to this team".into(),
        ))
    }
}

pub fn ensure_can_leave(actor: UserId, team: &Team) -> Result<()> {
    if team.is_owner(actor) {
        return Err(AppError::Forbidden(
            "the owner cannot leave the team; delete it instead".into(),
        ));
    }
    if !team.is_member(actor) {
        return Err(AppError::Forbidden("you are not a member of this team".into()));
    }
    Ok(())
}
