//! Shared application state for the API server.
//!
//! [`AppState`] holds the file-backed store handle the endpoint handlers
//! operate through. The store itself is stateless (every call hits the
//! filesystem), so the state is cheap to clone and carries no locks.

use gameplan_store::GamePlanStore;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The file-backed store for users, games, and plans.
    pub store: GamePlanStore,
}

impl AppState {
    /// Create application state over a store handle.
    pub const fn new(store: GamePlanStore) -> Self {
        Self { store }
    }
}
