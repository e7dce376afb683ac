// SPDX-License-Identifier: MIT

//! Live-notification plumbing: the event catalogue, the registry of
//! connected sessions, and the dispatcher that fans events out to them.

pub mod dispatch;
pub mod event;
pub mod registry;

pub use dispatch::Dispatcher;
pub use event::Event;
pub use registry::{ConnId, SessionRegistry};
