//! Core logic of the chatbot widget: conversation, session reset policy,
//! link resolution and configuration.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod chatbot;
mod config;
pub mod conversation;
pub mod link;
pub mod navigation;
mod service_client;
pub mod session;

pub use chatbot::{Chatbot, ChatbotBuilder, ChatbotSnapshot};
pub use config::*;
pub use navigation::{NavigationEvent, NavigationState, Navigator};
pub use nyang_actor::ActorDeadError;
