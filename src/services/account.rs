// SPDX-License-Identifier: MIT

//! Account lifecycle service.
//!
//! Handles signup, credential verification, password changes and the
//! account-deletion cascade:
//! 1. Delete owned teams and their tasks (rosters captured first)
//! 2. Detach the actor from every remaining team
//! 3. Delete the actor's personal tasks
//! 4. Prune the actor from every remaining assignee list
//! 5. Scrub the actor from all friend and request lists
//! 6. Delete the user document
//!
//! Each step is idempotent; a failure partway is surfaced but never rolled
//! back, so a retry finishes the remainder.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;

use crate::db::SharedStore;
use crate::error::{AppError, Result};
use crate::models::{User, UserId};
use crate::realtime::{Dispatcher, Event};
use crate::recipients;

#[derive(Clone)]
pub struct AccountService {
    store: SharedStore,
    dispatcher: Dispatcher,
}

impl AccountService {
    pub fn new(store: SharedStore, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Register a new account. Username and email are globally unique.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<User> {
        // 1. Uniqueness checks (field-specific errors, per-document reads)
        if self.store.find_user_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("username already taken".into()));
        }
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".into()));
        }

        // 2. Hash and store
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            friends: Vec::new(),
            friend_requests: Vec::new(),
            created_at: Utc::now(),
        };
        self.store.put_user(&user).await?;

        tracing::info!(user = %user.id, username, "user signed up");

        // 3. Nudge every connected session to refresh its user lists
        self.dispatcher.broadcast(&Event::DataUpdated);

        Ok(user)
    }

    /// Verify login credentials. The same error covers an unknown email and a
    /// wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::Unauthorized);
        }

        tracing::info!(user = %user.id, "user logged in");
        Ok(user)
    }

    pub async fn user_details(&self, actor: UserId) -> Result<User> {
        self.store
            .get_user(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }

    /// Change the password after re-verifying the current one.
    pub async fn update_password(
        &self,
        actor: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let mut user = self
            .store
            .get_user(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        if !verify_password(current_password, &user.password_hash) {
            return Err(AppError::InvalidInput("current password is incorrect".into()));
        }
        if current_password == new_password {
            return Err(AppError::InvalidInput(
                "new password must differ from the current one".into(),
            ));
        }

        user.password_hash = hash_password(new_password)?;
        self.store.put_user(&user).await?;

        tracing::info!(user = %actor, "password updated");
        Ok(())
    }

    /// Delete the account and everything that hangs off it, in the fixed
    /// cascade order. Events go out only after the cascade completes.
    pub async fn delete_account(&self, actor: UserId, password: &str) -> Result<()> {
        let user = self
            .store
            .get_user(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidInput("password is incorrect".into()));
        }

        // 1. Owned teams: capture each roster, then drop the team's tasks and
        //    the team itself.
        let owned = self.store.teams_owned_by(actor).await?;
        let mut deleted_teams = Vec::with_capacity(owned.len());
        let mut team_tasks = 0;
        for team in owned {
            let roster = recipients::team_roster(&team);
            team_tasks += self.store.delete_tasks_in_team(team.id).await?;
            self.store.delete_team(team.id).await?;
            deleted_teams.push((team.id, roster));
        }

        // 2. Memberships and invites elsewhere
        let detached_teams = self.store.detach_user_from_teams(actor).await?;

        // 3. Personal tasks
        let personal_tasks = self.store.delete_personal_tasks_of(actor).await?;

        // 4. Assignee entries on surviving tasks
        let assignee_pulls = self.store.remove_assignee_everywhere(actor).await?;

        // 5. Friend and request lists
        let social_pulls = self.store.detach_user_from_social(actor).await?;

        // 6. The user document itself
        self.store.delete_user(actor).await?;

        tracing::info!(
            user = %actor,
            owned_teams = deleted_teams.len(),
            team_tasks,
            detached_teams,
            personal_tasks,
            assignee_pulls,
            social_pulls,
            "account deleted"
        );

        for (team_id, roster) in &deleted_teams {
            self.dispatcher.dispatch(&Event::TeamDeleted(*team_id), roster);
        }
        self.dispatcher.broadcast(&Event::DataUpdated);

        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Internal(anyhow::anyhow!("password hashing failed: {err}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2!").unwrap();
        assert!(verify_password("hunter2!", &hash));
        assert!(!verify_password("hunter3!", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
