//! Protocol types shared between the chatbot widget and chat services.
//!
//! This crate describes the payloads exchanged with the remote chat API and
//! the contract every chat service implementation must follow, so that the
//! widget can talk to a real HTTP backend or a scripted fake without any
//! change in the core codebase.
//!
//! Types in this crate don't define any behavior beyond (de)serialization.

#![deny(missing_docs)]

mod error;
mod message;
mod request;
mod response;
mod service;

pub use error::*;
pub use message::*;
pub use request::*;
pub use response::*;
pub use service::*;
