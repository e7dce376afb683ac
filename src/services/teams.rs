// SPDX-License-Identifier: MIT

//! Team orchestration service: creation, the invite lifecycle, membership
//! management, leaving, and deletion with its task cascade.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::authz;
use crate::db::{username_map, SharedStore};
use crate::error::{AppError, Result};
use crate::models::{Team, TeamId, TeamView, UserId, UserRef};
use crate::realtime::{Dispatcher, Event};
use crate::recipients;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Users to invite along with creation; they start as pending invites,
    /// not members.
    #[serde(default)]
    pub members: Vec<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub team_id: TeamId,
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondInviteRequest {
    pub team_id: TeamId,
    pub accept: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageTeamRequest {
    pub team_id: TeamId,
    #[serde(flatten)]
    pub action: ManageAction,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ManageAction {
    Rename { new_name: String },
    /// Removes a current member, or revokes a pending invite.
    RemoveMember { member_id: UserId },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveTeamRequest {
    pub team_id: TeamId,
}

/// `GET /teams` response: teams the actor owns and teams they joined.
#[derive(Debug, Serialize)]
pub struct TeamsList {
    pub owned: Vec<TeamView>,
    pub joined: Vec<TeamView>,
}

/// One outstanding invite as listed to the invitee.
#[derive(Debug, Serialize)]
pub struct TeamInvite {
    pub id: TeamId,
    pub name: String,
    pub owner: UserRef,
}

#[derive(Clone)]
pub struct TeamService {
    store: SharedStore,
    dispatcher: Dispatcher,
}

impl TeamService {
    pub fn new(store: SharedStore, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Create a team; the creator becomes owner and sole member, everyone in
    /// `members` receives an invite.
    pub async fn create(&self, actor: UserId, req: CreateTeamRequest) -> Result<TeamView> {
        req.validate()?;

        if self
            .store
            .find_team_by_owner_and_name(actor, &req.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "you already have a team with this name".into(),
            ));
        }

        let inviter = self.load_user(actor).await?;

        let mut team = Team::new(req.name, actor);
        team.pending_invites = initial_invitees(req.members, actor);
        self.store.put_team(&team).await?;

        tracing::info!(
            team = %team.id,
            owner = %actor,
            invited = team.pending_invites.len(),
            "team created"
        );

        let view = self.view_of(&team).await?;
        self.dispatcher.dispatch(
            &Event::TeamInviteReceived {
                team_id: team.id,
                team_name: team.name.clone(),
                invited_by: inviter.username,
            },
            &recipients::team_created(&team),
        );
        Ok(view)
    }

    /// Teams split into owned and joined.
    pub async fn list(&self, actor: UserId) -> Result<TeamsList> {
        let owned = self.store.teams_owned_by(actor).await?;
        let joined: Vec<Team> = self
            .store
            .teams_with_member(actor)
            .await?
            .into_iter()
            .filter(|t| t.owner != actor)
            .collect();

        Ok(TeamsList {
            owned: self.views_of(&owned).await?,
            joined: self.views_of(&joined).await?,
        })
    }

    /// Outstanding invites for the actor, with the inviting owner resolved.
    pub async fn invites(&self, actor: UserId) -> Result<Vec<TeamInvite>> {
        let teams = self.store.teams_with_invite(actor).await?;
        let usernames =
            username_map(self.store.as_ref(), teams.iter().map(|t| t.owner)).await?;

        Ok(teams
            .into_iter()
            .map(|team| TeamInvite {
                id: team.id,
                name: team.name,
                owner: UserRef {
                    id: team.owner,
                    username: usernames.get(&team.owner).cloned().unwrap_or_default(),
                },
            })
            .collect())
    }

    /// Invite a user (owner only).
    pub async fn invite(&self, actor: UserId, req: InviteRequest) -> Result<()> {
        let mut team = self.load_team(req.team_id).await?;
        authz::ensure_team_owner(actor, &team)?;

        if self.store.get_user(req.user_id).await?.is_none() {
            return Err(AppError::NotFound("user not found".into()));
        }
        if team.is_member(req.user_id) {
            return Err(AppError::Conflict(
                "user is already a member of this team".into(),
            ));
        }
        if team.is_invited(req.user_id) {
            return Err(AppError::Conflict("user has already been invited".into()));
        }

        let inviter = self.load_user(actor).await?;
        team.pending_invites.push(req.user_id);
        self.store.put_team(&team).await?;

        tracing::info!(team = %team.id, invitee = %req.user_id, "invite sent");

        self.dispatcher.dispatch(
            &Event::TeamInviteReceived {
                team_id: team.id,
                team_name: team.name.clone(),
                invited_by: inviter.username,
            },
            &recipients::invite_sent(req.user_id),
        );
        Ok(())
    }

    /// Accept or deny an invite. Accept moves the actor from pendingInvites
    /// to members in a single document write.
    pub async fn respond_invite(&self, actor: UserId, req: RespondInviteRequest) -> Result<()> {
        let mut team = self.load_team(req.team_id).await?;
        authz::ensure_invited(actor, &team)?;

        team.pending_invites.retain(|id| *id != actor);
        if req.accept {
            team.members.push(actor);
            self.store.put_team(&team).await?;

            tracing::info!(team = %team.id, user = %actor, "invite accepted");

            self.dispatcher.dispatch(
                &Event::TeamJoined { team_id: team.id },
                &recipients::team_joined(actor),
            );
            self.dispatcher.dispatch(
                &Event::MemberJoinedTeam {
                    team_id: team.id,
                    user_id: actor,
                },
                &recipients::team_roster(&team),
            );
        } else {
            self.store.put_team(&team).await?;

            tracing::info!(team = %team.id, user = %actor, "invite denied");

            self.dispatcher.dispatch(
                &Event::InviteRevoked { team_id: team.id },
                &recipients::invite_revoked(actor),
            );
        }
        Ok(())
    }

    /// Rename the team, remove a member, or revoke a pending invite (owner
    /// only).
    pub async fn manage(&self, actor: UserId, req: ManageTeamRequest) -> Result<TeamView> {
        let mut team = self.load_team(req.team_id).await?;
        authz::ensure_team_owner(actor, &team)?;

        match req.action {
            ManageAction::Rename { new_name } => {
                let new_name = new_name.trim().to_string();
                if new_name.is_empty() {
                    return Err(AppError::InvalidInput("team name cannot be empty".into()));
                }
                if new_name != team.name
                    && self
                        .store
                        .find_team_by_owner_and_name(actor, &new_name)
                        .await?
                        .is_some()
                {
                    return Err(AppError::Conflict(
                        "you already have a team with this name".into(),
                    ));
                }
                team.name = new_name;
                self.store.put_team(&team).await?;

                tracing::info!(team = %team.id, "team renamed");

                self.dispatcher.dispatch(
                    &Event::TeamUpdated { team_id: team.id },
                    &recipients::team_roster(&team),
                );
            }
            ManageAction::RemoveMember { member_id } => {
                if member_id == team.owner {
                    return Err(AppError::InvalidInput(
                        "the owner cannot be removed from the team".into(),
                    ));
                }
                if team.is_member(member_id) {
                    team.members.retain(|id| *id != member_id);
                    self.store.put_team(&team).await?;
                    let pruned = self
                        .store
                        .remove_assignees_in_team(team.id, &[member_id])
                        .await?;

                    tracing::info!(
                        team = %team.id,
                        member = %member_id,
                        pruned,
                        "member removed"
                    );

                    self.dispatcher.dispatch(
                        &Event::RemovedFromTeam { team_id: team.id },
                        &recipients::member_removed(member_id),
                    );
                    self.dispatcher.dispatch(
                        &Event::TeamUpdated { team_id: team.id },
                        &recipients::team_roster(&team),
                    );
                } else if team.is_invited(member_id) {
                    team.pending_invites.retain(|id| *id != member_id);
                    self.store.put_team(&team).await?;

                    tracing::info!(team = %team.id, invitee = %member_id, "invite revoked");

                    self.dispatcher.dispatch(
                        &Event::InviteRevoked { team_id: team.id },
                        &recipients::invite_revoked(member_id),
                    );
                } else {
                    return Err(AppError::NotFound(
                        "user is neither a member nor invited".into(),
                    ));
                }
            }
        }

        self.view_of(&team).await
    }

    /// Leave a team (members only; the owner deletes instead). Assignee
    /// entries on the team's tasks are pruned, the tasks survive.
    pub async fn leave(&self, actor: UserId, team_id: TeamId) -> Result<()> {
        let mut team = self.load_team(team_id).await?;
        authz::ensure_can_leave(actor, &team)?;

        team.members.retain(|id| *id != actor);
        self.store.put_team(&team).await?;
        let pruned = self.store.remove_assignees_in_team(team.id, &[actor]).await?;

        tracing::info!(team = %team.id, user = %actor, pruned, "member left team");

        self.dispatcher
            .dispatch(&Event::LeftTeam(team.id), &recipients::left_team(actor));
        self.dispatcher.dispatch(
            &Event::MemberLeftTeam {
                team_id: team.id,
                user_id: actor,
            },
            &recipients::member_left(team.owner),
        );
        Ok(())
    }

    /// Delete a team (owner only): roster snapshot first, then the team's
    /// tasks, then the team itself.
    pub async fn delete(&self, actor: UserId, team_id: TeamId) -> Result<()> {
        let team = self.load_team(team_id).await?;
        authz::ensure_team_owner(actor, &team)?;

        let roster = recipients::team_roster(&team);
        let removed_tasks = self.store.delete_tasks_in_team(team.id).await?;
        self.store.delete_team(team.id).await?;

        tracing::info!(team = %team.id, removed_tasks, "team deleted");

        self.dispatcher.dispatch(&Event::TeamDeleted(team.id), &roster);
        Ok(())
    }

    async fn load_team(&self, id: TeamId) -> Result<Team> {
        self.store
            .get_team(id)
            .await?
            .ok_or_else(|| AppError::NotFound("team not found".into()))
    }

    async fn load_user(&self, id: UserId) -> Result<crate::models::User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }

    async fn view_of(&self, team: &Team) -> Result<TeamView> {
        let mut ids: Vec<UserId> = vec![team.owner];
        ids.extend(team.members.iter().copied());
        ids.extend(team.pending_invites.iter().copied());
        let usernames = username_map(self.store.as_ref(), ids).await?;
        Ok(TeamView::build(team, &usernames))
    }

    async fn views_of(&self, teams: &[Team]) -> Result<Vec<TeamView>> {
        let mut ids: HashSet<UserId> = HashSet::new();
        for team in teams {
            ids.insert(team.owner);
            ids.extend(team.members.iter().copied());
            ids.extend(team.pending_invites.iter().copied());
        }
        let usernames = username_map(self.store.as_ref(), ids).await?;
        Ok(teams
            .iter()
            .map(|team| TeamView::build(team, &usernames))
            .collect())
    }
}

/// Initial invitees: duplicates collapse, the owner is silently dropped.
/// Nonexistent ids are allowed; they simply never respond.
fn initial_invitees(ids: Vec<UserId>, owner: UserId) -> Vec<UserId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| *id != owner && seen.insert(*id))
        .collect()
}
