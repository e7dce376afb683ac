// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod ids;
pub mod task;
pub mod team;
pub mod user;

pub use ids::{TaskId, TeamId, UserId};
pub use task::{Priority, Task, TaskStatus, TaskView};
pub use team::{Team, TeamRef, TeamView};
pub use user::{User, UserRef};
