//! A lightweight actor runtime.
//!
//! An actor owns a piece of state and handles messages one at a time on a
//! tokio task, so the state never needs a lock. Background work reports back
//! by sending more messages, usually through a [`WeakActor`] so that an
//! in-flight task doesn't keep a dropped actor alive.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod handle;
mod mailbox;
mod scheduler;

pub use handle::{Actor, ActorDeadError, WeakActor};
pub use mailbox::Message;
