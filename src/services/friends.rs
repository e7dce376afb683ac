// SPDX-License-Identifier: MIT

//! Friendship orchestration: requests, responses, removal, listing.
//!
//! Friendship is symmetric; accept and remove always write both user
//! documents (two single-document writes, best-effort sequential).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::authz;
use crate::db::SharedStore;
use crate::error::{AppError, Result};
use crate::models::{User, UserId, UserRef};
use crate::realtime::{Dispatcher, Event};
use crate::recipients;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequest {
    #[validate(length(min = 1))]
    pub friend_username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondFriendRequest {
    pub requester_id: UserId,
    pub accept: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFriendRequest {
    pub friend_id: UserId,
}

/// `GET /friends` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendsList {
    pub friends: Vec<UserRef>,
    pub friend_requests: Vec<UserRef>,
}

#[derive(Clone)]
pub struct FriendService {
    store: SharedStore,
    dispatcher: Dispatcher,
}

impl FriendService {
    pub fn new(store: SharedStore, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Send a friend request by username.
    pub async fn send_request(&self, actor: UserId, req: SendFriendRequest) -> Result<()> {
        req.validate()?;

        let actor_user = self.load_user(actor).await?;
        let mut target = self
            .store
            .find_user_by_username(&req.friend_username)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        if target.id == actor {
            return Err(AppError::Conflict(
                "you cannot send a friend request to yourself".into(),
            ));
        }
        if actor_user.is_friend(target.id) {
            return Err(AppError::Conflict("you are already friends".into()));
        }
        if target.has_request_from(actor) {
            return Err(AppError::Conflict("friend request already sent".into()));
        }

        target.friend_requests.push(actor);
        self.store.put_user(&target).await?;

        tracing::info!(from = %actor, to = %target.id, "friend request sent");

        self.dispatcher.dispatch(
            &Event::FriendRequestReceived {
                from: UserRef::of(&actor_user),
            },
            &recipients::friend_request(target.id),
        );
        Ok(())
    }

    /// Accept or deny a pending request. Accepting writes both friend lists;
    /// only the requester's sessions are notified.
    pub async fn respond_request(&self, actor: UserId, req: RespondFriendRequest) -> Result<()> {
        let mut actor_user = self.load_user(actor).await?;

        if !authz::can_respond_friend_request(&actor_user, req.requester_id) {
            return Err(AppError::NotFound("friend request not found".into()));
        }

        actor_user.friend_requests.retain(|id| *id != req.requester_id);

        if !req.accept {
            self.store.put_user(&actor_user).await?;
            tracing::info!(user = %actor, requester = %req.requester_id, "friend request denied");
            return Ok(());
        }

        let mut requester = self
            .store
            .get_user(req.requester_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        if !actor_user.is_friend(req.requester_id) {
            actor_user.friends.push(req.requester_id);
        }
        self.store.put_user(&actor_user).await?;

        if !requester.is_friend(actor) {
            requester.friends.push(actor);
        }
        self.store.put_user(&requester).await?;

        tracing::info!(user = %actor, requester = %req.requester_id, "friend request accepted");

        let recipients = recipients::request_accepted(req.requester_id);
        self.dispatcher.dispatch(
            &Event::FriendRequestAccepted {
                friend_id: actor,
                friend_username: actor_user.username,
            },
            &recipients,
        );
        self.dispatcher.dispatch(&Event::FriendsUpdated, &recipients);
        Ok(())
    }

    /// Sever a friendship from either side; both documents are scrubbed and
    /// only the other party is notified.
    pub async fn remove(&self, actor: UserId, req: RemoveFriendRequest) -> Result<()> {
        let mut actor_user = self.load_user(actor).await?;

        if !authz::can_remove_friend(&actor_user, req.friend_id) {
            return Err(AppError::NotFound("friendship not found".into()));
        }

        actor_user.friends.retain(|id| *id != req.friend_id);
        self.store.put_user(&actor_user).await?;

        // The other side may already be gone; the cascade owns that case.
        if let Some(mut other) = self.store.get_user(req.friend_id).await? {
            other.friends.retain(|id| *id != actor);
            self.store.put_user(&other).await?;
        }

        tracing::info!(user = %actor, friend = %req.friend_id, "friend removed");

        self.dispatcher.dispatch(
            &Event::FriendRemoved { user_id: actor },
            &recipients::friend_removed(req.friend_id),
        );
        Ok(())
    }

    /// Friends and incoming requests, with usernames resolved.
    pub async fn list(&self, actor: UserId) -> Result<FriendsList> {
        let user = self.load_user(actor).await?;

        let friends = self.store.get_users(&user.friends).await?;
        let requests = self.store.get_users(&user.friend_requests).await?;

        Ok(FriendsList {
            friends: friends.iter().map(UserRef::of).collect(),
            friend_requests: requests.iter().map(UserRef::of).collect(),
        })
    }

    async fn load_user(&self, id: UserId) -> Result<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }
}
