//! Shared type definitions for the GamePlan service.
//!
//! This crate is the single source of truth for all documents exchanged
//! between the store, the ledger engine, the HTTP API, and the
//! `TypeScript` frontend (via `ts-rs` binding generation).
//!
//! # Modules
//!
//! - [`resource`] -- `ResourceType` plus the change/state tagged unions
//! - [`plan`] -- `Stage` and `Plan` documents
//! - [`game`] -- `Game` catalog documents

pub mod game;
pub mod plan;
pub mod resource;

// Re-export all public types at crate root for convenience.
pub use game::Game;
pub use plan::{Plan, Stage};
pub use resource::{ResourceChange, ResourceState, ResourceType};
