//! HTTP API module.
//!
//! Router, handlers, middleware and wire types for the Filedrop API.

pub mod middleware;
pub mod server;
pub mod types;

pub use server::{build_router, start_server, AppState};
pub use types::*;
