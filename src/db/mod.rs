//! Storage layer.
//!
//! [`EntityStore`] is the boundary the services talk to: typed operations per
//! entity kind plus the bulk detach sweeps the account-deletion cascade needs.
//! Writes are atomic per document; there are no cross-document transactions,
//! so multi-entity updates are sequenced by the services and the bulk
//! operations here apply their change one document at a time.

pub mod memory;

pub use memory::MemoryStore;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Task, TaskId, Team, TeamId, User, UserId};

/// Shared handle handed to services and state.
pub type SharedStore = Arc<dyn EntityStore>;

#[async_trait]
pub trait EntityStore: Send + Sync {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Fetch several users at once; ids with no backing document are skipped.
    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create or replace a user document.
    async fn put_user(&self, user: &User) -> Result<()>;

    async fn delete_user(&self, id: UserId) -> Result<()>;

    /// Pull `user` out of every other user's friend and request lists.
    /// Returns the number of documents changed.
    async fn detach_user_from_social(&self, user: UserId) -> Result<usize>;

    // ─── Team Operations ─────────────────────────────────────────

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>>;

    /// Create or replace a team document.
    async fn put_team(&self, team: &Team) -> Result<()>;

    async fn delete_team(&self, id: TeamId) -> Result<()>;

    /// Teams owned by `user`, sorted by name.
    async fn teams_owned_by(&self, user: UserId) -> Result<Vec<Team>>;

    /// Teams where `user` appears in `members`, sorted by name.
    async fn teams_with_member(&self, user: UserId) -> Result<Vec<Team>>;

    /// Teams holding a pending invite for `user`, sorted by name.
    async fn teams_with_invite(&self, user: UserId) -> Result<Vec<Team>>;

    /// Duplicate-name check scoped to one owner.
    async fn find_team_by_owner_and_name(&self, owner: UserId, name: &str)
        -> Result<Option<Team>>;

    /// Pull `user` out of every team's member and pending-invite lists.
    /// Returns the number of documents changed.
    async fn detach_user_from_teams(&self, user: UserId) -> Result<usize>;

    // ─── Task Operations ─────────────────────────────────────────

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// Create or replace a task document.
    async fn put_task(&self, task: &Task) -> Result<()>;

    async fn delete_task(&self, id: TaskId) -> Result<()>;

    /// Everything `user` can see: tasks they created, tasks assigned to them,
    /// and tasks of the given teams. Sorted open-before-completed, then by
    /// due date ascending.
    async fn tasks_visible_to(&self, user: UserId, teams: &[TeamId]) -> Result<Vec<Task>>;

    async fn tasks_in_team(&self, team: TeamId) -> Result<Vec<Task>>;

    /// Returns the number of tasks deleted.
    async fn delete_tasks_in_team(&self, team: TeamId) -> Result<usize>;

    /// Delete the personal tasks created by `user`. Returns the count.
    async fn delete_personal_tasks_of(&self, user: UserId) -> Result<usize>;

    /// Pull `users` from the assignee lists of one team's tasks. Returns the
    /// number of tasks changed.
    async fn remove_assignees_in_team(&self, team: TeamId, users: &[UserId]) -> Result<usize>;

    /// Pull `user` from every task's assignee list. Returns the number of
    /// tasks changed.
    async fn remove_assignee_everywhere(&self, user: UserId) -> Result<usize>;
}

/// Resolve a set of ids to usernames for building API views. Ids with no
/// backing document are simply absent from the map.
pub async fn username_map(
    store: &dyn EntityStore,
    ids: impl IntoIterator<Item = UserId>,
) -> Result<HashMap<UserId, String>> {
    let ids: Vec<UserId> = ids.into_iter().collect();
    let users = store.get_users(&ids).await?;
    Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
}
