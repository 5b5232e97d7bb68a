//! An out-of-the-box chatbot widget for terminal hosts.
//!
//! The crate wires the widget core to an in-memory router and renders
//! replies for the terminal. The `nyang` binary is a small demo built on
//! top of it, and you can also use it as a library to embed the widget into
//! your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod render;
mod router;

pub use router::{Router, RouterEvent};

/// Re-exports of [`nyang_core`] crate.
pub mod core {
    pub use nyang_core::*;
}

/// Re-exports of [`nyang_model`] crate.
pub mod model {
    pub use nyang_model::*;
}
