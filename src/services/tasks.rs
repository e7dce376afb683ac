// SPDX-License-Identifier: MIT

//! Task orchestration service.
//!
//! Every mutation follows the same sequence:
//! 1. Load the task and, for team tasks, a fresh team snapshot
//! 2. Authorize against those snapshots
//! 3. Apply the write (partial updates: absent means unchanged)
//! 4. Build the response view
//! 5. Resolve recipients from the post-write state and fan out
//!
//! Step 5 is best-effort and can never fail the request.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::authz;
use crate::db::{username_map, SharedStore};
use crate::error::{AppError, Result};
use crate::models::{Priority, Task, TaskId, TaskStatus, TaskView, Team, TeamId, UserId};
use crate::realtime::{Dispatcher, Event};
use crate::recipients;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    pub description: Option<String>,
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub assignees: Vec<UserId>,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub is_completed: bool,
    pub is_personal: Option<bool>,
}

/// Partial update. An absent field leaves the stored value unchanged; an
/// explicit `null` description clears it, and an explicit empty assignee
/// array empties the list — both distinct from absence.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 500))]
    pub text: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub assignees: Option<Vec<UserId>>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
    pub is_completed: Option<bool>,
}

/// Wraps the parsed value in an outer `Some`, so a field that appears in the
/// body (even as `null`) is distinguishable from one that does not.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Clone)]
pub struct TaskService {
    store: SharedStore,
    dispatcher: Dispatcher,
}

impl TaskService {
    pub fn new(store: SharedStore, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Create a personal or team task.
    pub async fn create(&self, actor: UserId, req: CreateTaskRequest) -> Result<TaskView> {
        req.validate()?;

        let is_personal = match (req.is_personal, req.team_id.is_some()) {
            (Some(true), true) => {
                return Err(AppError::InvalidInput(
                    "a personal task cannot belong to a team".into(),
                ))
            }
            (Some(false), false) => {
                return Err(AppError::InvalidInput("a team task requires a teamId".into()))
            }
            (Some(explicit), _) => explicit,
            (None, has_team) => !has_team,
        };

        // 1.–2. Load the team fresh and check membership
        let team = match req.team_id {
            Some(team_id) => {
                let team = self
                    .store
                    .get_team(team_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("team not found".into()))?;
                authz::ensure_team_member(actor, &team)?;
                Some(team)
            }
            None => None,
        };

        let assignees = dedupe(req.assignees);
        validate_assignees(actor, &assignees, team.as_ref())?;

        // 3. Write
        let task = Task {
            id: TaskId::new(),
            text: req.text,
            description: req.description,
            user: actor,
            team: team.as_ref().map(|t| t.id),
            assignees,
            priority: req.priority,
            due_date: req.due_date,
            status: req.status,
            is_personal,
            is_completed: req.is_completed,
            created_at: Utc::now(),
        };
        self.store.put_task(&task).await?;

        tracing::info!(
            task = %task.id,
            user = %actor,
            team = ?task.team,
            "task created"
        );

        // 4.–5. Respond, then fan out
        let view = self.view_of(&task, team.as_ref()).await?;
        self.notify(&task, actor, Event::TaskCreated(Box::new(view.clone())))
            .await;
        Ok(view)
    }

    /// Everything the actor can see: own tasks, assigned tasks, and tasks of
    /// teams they belong to. Open tasks come before completed ones, each
    /// group ordered by due date.
    pub async fn list(&self, actor: UserId) -> Result<Vec<TaskView>> {
        let teams = self.store.teams_with_member(actor).await?;
        let team_ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
        let tasks = self.store.tasks_visible_to(actor, &team_ids).await?;

        // Tasks can reference teams the actor is no longer part of (they stay
        // visible as creator or assignee); load those for the view as well.
        let mut team_map: HashMap<TeamId, Team> =
            teams.into_iter().map(|t| (t.id, t)).collect();
        for team_id in tasks.iter().filter_map(|t| t.team) {
            if !team_map.contains_key(&team_id) {
                if let Some(team) = self.store.get_team(team_id).await? {
                    team_map.insert(team_id, team);
                }
            }
        }

        let mut ids: HashSet<UserId> = HashSet::new();
        for task in &tasks {
            ids.insert(task.user);
            ids.extend(task.assignees.iter().copied());
        }
        let usernames = username_map(self.store.as_ref(), ids).await?;

        Ok(tasks
            .iter()
            .map(|task| {
                let team = task.team.and_then(|id| team_map.get(&id));
                TaskView::build(task, team, &usernames)
            })
            .collect())
    }

    /// Partial update of a single task.
    pub async fn update(
        &self,
        actor: UserId,
        task_id: TaskId,
        req: UpdateTaskRequest,
    ) -> Result<TaskView> {
        req.validate()?;

        let mut task = self
            .store
            .get_task(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("task not found".into()))?;

        // A team task whose team no longer resolves has no authorization
        // snapshot to check against; report the task as gone.
        let team = match task.team {
            Some(team_id) => Some(
                self.store
                    .get_team(team_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("task not found".into()))?,
            ),
            None => None,
        };
        authz::ensure_task_edit(actor, &task, team.as_ref())?;

        if let Some(assignees) = req.assignees {
            let assignees = dedupe(assignees);
            validate_assignees(task.user, &assignees, team.as_ref())?;
            task.assignees = assignees;
        }
        if let Some(text) = req.text {
            task.text = text;
        }
        if let Some(description) = req.description {
            task.description = description;
        }
        if let Some(priority) = req.priority {
            task.priority = priority;
        }
        if let Some(due_date) = req.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = req.status {
            task.status = status;
        }
        if let Some(is_completed) = req.is_completed {
            task.is_completed = is_completed;
        }

        self.store.put_task(&task).await?;

        tracing::info!(task = %task.id, user = %actor, "task updated");

        let view = self.view_of(&task, team.as_ref()).await?;
        self.notify(&task, actor, Event::TaskUpdated(Box::new(view.clone())))
            .await;
        Ok(view)
    }

    /// Delete a single task.
    pub async fn delete(&self, actor: UserId, task_id: TaskId) -> Result<()> {
        let task = self
            .store
            .get_task(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("task not found".into()))?;

        let team = match task.team {
            Some(team_id) => Some(
                self.store
                    .get_team(team_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("task not found".into()))?,
            ),
            None => None,
        };
        authz::ensure_task_edit(actor, &task, team.as_ref())?;

        self.store.delete_task(task_id).await?;

        tracing::info!(task = %task_id, user = %actor, "task deleted");

        self.notify(&task, actor, Event::TaskDeleted(task_id)).await;
        Ok(())
    }

    async fn view_of(&self, task: &Task, team: Option<&Team>) -> Result<TaskView> {
        let mut ids: Vec<UserId> = Vec::with_capacity(task.assignees.len() + 1);
        ids.push(task.user);
        ids.extend(task.assignees.iter().copied());
        let usernames = username_map(self.store.as_ref(), ids).await?;
        Ok(TaskView::build(task, team, &usernames))
    }

    /// Re-read the owning team and fan out. A team deleted since the write
    /// contributes no recipients; a store failure here downgrades to a
    /// roster-less notification instead of failing the already-answered
    /// request.
    async fn notify(&self, task: &Task, actor: UserId, event: Event) {
        let team = match task.team {
            Some(team_id) => match self.store.get_team(team_id).await {
                Ok(team) => team,
                Err(err) => {
                    tracing::warn!(
                        task = %task.id,
                        error = %err,
                        "could not re-read team during fan-out"
                    );
                    None
                }
            },
            None => None,
        };
        let recipients = recipients::task_change(task, team.as_ref(), actor);
        self.dispatcher.dispatch(&event, &recipients);
    }
}

fn dedupe(ids: Vec<UserId>) -> Vec<UserId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn validate_assignees(creator: UserId, assignees: &[UserId], team: Option<&Team>) -> Result<()> {
    match team {
        Some(team) => {
            if assignees.iter().any(|id| !team.is_member(*id)) {
                return Err(AppError::InvalidInput(
                    "every assignee must be a current member of the team".into(),
                ));
            }
        }
        None => {
            if assignees.iter().any(|id| *id != creator) {
                return Err(AppError::InvalidInput(
                    "a personal task can only be assigned to its creator".into(),
                ));
            }
        }
    }
    Ok(())
}
