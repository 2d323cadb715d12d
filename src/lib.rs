//! Library crate for userdesk.
//!
//! This crate exposes the building blocks of the tool:
//! - HTTP client for the user-management backend (`api`)
//! - Application state and update loop (`app`)
//! - Command-line and logging setup (`config`)
//! - Error and result types for the application glue (`error`)
//! - In-memory users filtering (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userdesk` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use api::{ApiClient, ApiConfig, ApiError, ClientProvider, RegisterData, User};
pub use error::{DynError, Result};
