//! HTTP API server for the GamePlan service.
//!
//! This crate provides an Axum HTTP server exposing:
//!
//! - **User endpoints** for username-only signup and the login probe
//! - **Game endpoints** serving the read-only catalog
//! - **Plan endpoints** for full-document CRUD plus cloning
//! - **An evaluate endpoint** running the resource ledger engine
//! - **A minimal HTML status page** (`GET /`) listing the endpoints
//!
//! # Architecture
//!
//! The handlers are thin: names come straight from the path, documents
//! from the body, and everything else is delegated to
//! [`gameplan_store`] or [`gameplan_ledger`]. Errors are mapped to HTTP
//! status codes in exactly one place ([`error::ApiError`]).

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::ApiConfig;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
