//! Backend services.
//!
//! # Services
//!
//! - [`api`] - Filedrop API calls (list, upload, download links)

pub mod api;

pub use api::*;
