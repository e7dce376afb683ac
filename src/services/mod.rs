// SPDX-License-Identifier: MIT

//! Services module - the mutation orchestrators.
//!
//! Every use case follows the same shape: load the snapshots, authorize,
//! write, build the response, then resolve recipients and dispatch. Fan-out
//! runs strictly after the write and can never fail it.

pub mod account;
pub mod friends;
pub mod tasks;
pub mod teams;

pub use account::AccountService;
pub use friends::FriendService;
pub use tasks::TaskService;
pub use teams::TeamService;
