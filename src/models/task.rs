// SPDX-License-Identifier: MIT

//! Task model, its enums, and the populated API view.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TaskId, TeamId, UserId};
use super::team::{Team, TeamRef};
use super::user::UserRef;

/// Task priority. Serialized with the lowercase labels the frontend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "low")]
    Low,
    #[default]
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

/// Workflow status, independent of the completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "not started")]
    NotStarted,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

/// A task as held in the store.
///
/// Personal tasks have `team: None` and `is_personal: true`; team tasks carry
/// the owning team and may assign any of its members. The creator is always
/// recorded and retains edit rights on team tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub description: Option<String>,
    /// The creating user.
    pub user: UserId,
    pub team: Option<TeamId>,
    pub assignees: Vec<UserId>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub is_personal: bool,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_assignee(&self, user: UserId) -> bool {
        self.assignees.contains(&user)
    }
}

/// Task with user and team references resolved, as returned by the API and
/// carried in task events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    pub text: String,
    pub description: Option<String>,
    pub user: UserRef,
    pub team: Option<TeamRef>,
    pub assignees: Vec<UserRef>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub is_personal: bool,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TaskView {
    /// Resolve creator and assignee ids against a username lookup, and the
    /// team id against the loaded team (absent for personal tasks). Assignees
    /// whose accounts vanished are dropped from the view.
    pub fn build(task: &Task, team: Option<&Team>, usernames: &HashMap<UserId, String>) -> Self {
        let resolve = |id: &UserId| {
            usernames.get(id).map(|name| UserRef {
                id: *id,
                username: name.clone(),
            })
        };
        Self {
            id: task.id,
            text: task.text.clone(),
            description: task.description.clone(),
            user: resolve(&task.user).unwrap_or(UserRef {
                id: task.user,
                username: String::new(),
            }),
            team: team.map(TeamRef::of),
            assignees: task.assignees.iter().filter_map(resolve).collect(),
            priority: task.priority,
            due_date: task.due_date,
            status: task.status,
            is_personal: task.is_personal,
            is_completed: task.is_completed,
            created_at: task.created_at,
        }
    }
}
