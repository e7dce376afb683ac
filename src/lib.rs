// SPDX-License-Identifier: MIT

//! Taskboard: collaborative task manager backend.
//!
//! This crate provides the API for personal and team task tracking,
//! friendships, team membership, and live event delivery over WebSockets.

pub mod authz;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod recipients;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::SharedStore;
use realtime::{Dispatcher, SessionRegistry};
use services::{AccountService, FriendService, TaskService, TeamService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: SharedStore,
    pub registry: Arc<SessionRegistry>,
    pub dispatcher: Dispatcher,
    pub account: AccountService,
    pub tasks: TaskService,
    pub teams: TeamService,
    pub friends: FriendService,
}

impl AppState {
    /// Wire the services over one store and one session registry.
    pub fn new(config: Config, store: SharedStore) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let dispatcher = Dispatcher::new(registry.clone());
        Self {
            config,
            store: store.clone(),
            registry,
            dispatcher: dispatcher.clone(),
            account: AccountService::new(store.clone(), dispatcher.clone()),
            tasks: TaskService::new(store.clone(), dispatcher.clone()),
            teams: TeamService::new(store.clone(), dispatcher.clone()),
            friends: FriendService::new(store, dispatcher),
        }
    }
}
