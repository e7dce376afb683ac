// SPDX-License-Identifier: MIT

//! In-process store backed by [`DashMap`].
//!
//! Every operation locks at most one map entry at a time, which gives the
//! per-document atomicity the services rely on. Map iteration order is not
//! stable, so listing operations sort before returning.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{EntityStore, SharedStore};
use crate::error::Result;
use crate::models::{Task, TaskId, Team, TeamId, User, UserId};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    teams: DashMap<TeamId, Team>,
    tasks: DashMap<TaskId, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh store behind the trait-object handle the services expect.
    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

fn sorted_teams(mut teams: Vec<Team>) -> Vec<Team> {
    teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    teams
}

#[async_trait]
impl EntityStore for MemoryStore {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|r| r.value().clone()))
            .collect())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|r| r.value().username == username)
            .map(|r| r.value().clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|r| r.value().email == email)
            .map(|r| r.value().clone()))
    }

    async fn put_user(&self, user: &User) -> Result<()> {
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        self.users.remove(&id);
        Ok(())
    }

    async fn detach_user_from_social(&self, user: UserId) -> Result<usize> {
        let mut changed = 0;
        for mut entry in self.users.iter_mut() {
            let doc = entry.value_mut();
            let before = doc.friends.len() + doc.friend_requests.len();
            doc.friends.retain(|id| *id != user);
            doc.friend_requests.retain(|id| *id != user);
            if doc.friends.len() + doc.friend_requests.len() != before {
                changed += 1;
            }
        }
        Ok(changed)
    }

    // ─── Team Operations ─────────────────────────────────────────

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>> {
        Ok(self.teams.get(&id).map(|r| r.value().clone()))
    }

    async fn put_team(&self, team: &Team) -> Result<()> {
        self.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn delete_team(&self, id: TeamId) -> Result<()> {
        self.teams.remove(&id);
        Ok(())
    }

    async fn teams_owned_by(&self, user: UserId) -> Result<Vec<Team>> {
        Ok(sorted_teams(
            self.teams
                .iter()
                .filter(|r| r.value().owner == user)
                .map(|r| r.value().clone())
                .collect(),
        ))
    }

    async fn teams_with_member(&self, user: UserId) -> Result<Vec<Team>> {
        Ok(sorted_teams(
            self.teams
                .iter()
                .filter(|r| r.value().is_member(user))
                .map(|r| r.value().clone())
                .collect(),
        ))
    }

    async fn teams_with_invite(&self, user: UserId) -> Result<Vec<Team>> {
        Ok(sorted_teams(
            self.teams
                .iter()
                .filter(|r| r.value().is_invited(user))
                .map(|r| r.value().clone())
                .collect(),
        ))
    }

    async fn find_team_by_owner_and_name(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Option<Team>> {
        Ok(self
            .teams
            .iter()
            .find(|r| r.value().owner == owner && r.value().name == name)
            .map(|r| r.value().clone()))
    }

    async fn detach_user_from_teams(&self, user: UserId) -> Result<usize> {
        let mut changed = 0;
        for mut entry in self.teams.iter_mut() {
            let doc = entry.value_mut();
            let before = doc.members.len() + doc.pending_invites.len();
            doc.members.retain(|id| *id != user);
            doc.pending_invites.retain(|id| *id != user);
            if doc.members.len() + doc.pending_invites.len() != before {
                changed += 1;
            }
        }
        Ok(changed)
    }

    // ─── Task Operations ─────────────────────────────────────────

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.tasks.get(&id).map(|r| r.value().clone()))
    }

    async fn put_task(&self, task: &Task) -> Result<()> {
        self.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.tasks.remove(&id);
        Ok(())
    }

    async fn tasks_visible_to(&self, user: UserId, teams: &[TeamId]) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|r| {
                let t = r.value();
                t.user == user
                    || t.assignees.contains(&user)
                    || t.team.is_some_and(|team| teams.contains(&team))
            })
            .map(|r| r.value().clone())
            .collect();
        tasks.sort_by_key(|t| (t.is_completed, t.due_date, t.id));
        Ok(tasks)
    }

    async fn tasks_in_team(&self, team: TeamId) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|r| r.value().team == Some(team))
            .map(|r| r.value().clone())
            .collect();
        tasks.sort_by_key(|t| (t.is_completed, t.due_date, t.id));
        Ok(tasks)
    }

    async fn delete_tasks_in_team(&self, team: TeamId) -> Result<usize> {
        let ids: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|r| r.value().team == Some(team))
            .map(|r| r.value().id)
            .collect();
        for id in &ids {
            self.tasks.remove(id);
        }
        Ok(ids.len())
    }

    async fn delete_personal_tasks_of(&self, user: UserId) -> Result<usize> {
        let ids: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|r| r.value().is_personal && r.value().user == user)
            .map(|r| r.value().id)
            .collect();
        for id in &ids {
            self.tasks.remove(id);
        }
        Ok(ids.len())
    }

    async fn remove_assignees_in_team(&self, team: TeamId, users: &[UserId]) -> Result<usize> {
        let mut changed = 0;
        for mut entry in self.tasks.iter_mut() {
            let doc = entry.value_mut();
            if doc.team != Some(team) {
                continue;
            }
            let before = doc.assignees.len();
            doc.assignees.retain(|id| !users.contains(id));
            if doc.assignees.len() != before {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn remove_assignee_everywhere(&self, user: UserId) -> Result<usize> {
        let mut changed = 0;
        for mut entry in self.tasks.iter_mut() {
            let doc = entry.value_mut();
            let before = doc.assignees.len();
            doc.assignees.retain(|id| *id != user);
            if doc.assignees.len() != before {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
