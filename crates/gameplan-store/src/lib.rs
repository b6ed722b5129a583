//! File-backed persistence for the GamePlan service.
//!
//! All state lives as JSON documents under a single data root:
//!
//! ```text
//! <root>/games/<gameName>.json                game catalog documents
//! <root>/.users/<username>/                   one directory per user
//! <root>/.users/<username>/<plan file>.json   plan documents
//! ```
//!
//! The layout is deliberately simple: a user *is* a directory, a plan *is*
//! a file, and the plan's display name lives inside the document (the file
//! name carries the game name plus a creation timestamp). There is no
//! index — plan lookups scan the user's directory, which is small.
//!
//! # Modules
//!
//! - [`user_store`] -- user directories (signup / login probe)
//! - [`game_store`] -- read-only game catalog documents
//! - [`plan_store`] -- plan document CRUD
//! - [`names`] -- identifier validation (also the path-traversal guard)

pub mod error;
pub mod game_store;
pub mod names;
pub mod plan_store;
pub mod user_store;

// Re-export primary types at crate root.
pub use error::StoreError;
pub use game_store::GameStore;
pub use plan_store::PlanStore;
pub use user_store::UserStore;

use std::path::{Path, PathBuf};

use tracing::info;

/// Sub-directory of the data root holding game catalog documents.
pub const GAMES_SUB_DIR: &str = "games";

/// Sub-directory of the data root holding user directories.
///
/// The leading dot keeps it from colliding with a game named `games`.
pub const USERS_SUB_DIR: &str = ".users";

/// File extension of game and plan documents.
pub const DOCUMENT_EXTENSION: &str = ".json";

/// Handle on the data root; the entry point to all stores.
#[derive(Debug, Clone)]
pub struct GamePlanStore {
    root: PathBuf,
}

impl GamePlanStore {
    /// Create a store handle for the given data root.
    ///
    /// No filesystem access happens here; call [`init_data_dirs`] once at
    /// startup.
    ///
    /// [`init_data_dirs`]: GamePlanStore::init_data_dirs
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data root this store operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the data root and its `games/` and `.users/` sub-directories
    /// if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if a directory cannot be created.
    pub async fn init_data_dirs(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(self.games_dir()).await?;
        tokio::fs::create_dir_all(self.users_dir()).await?;
        info!(root = %self.root.display(), "data directories initialized");
        Ok(())
    }

    /// Store view over user directories.
    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.root)
    }

    /// Store view over game catalog documents.
    pub fn games(&self) -> GameStore<'_> {
        GameStore::new(&self.root)
    }

    /// Store view over plan documents.
    pub fn plans(&self) -> PlanStore<'_> {
        PlanStore::new(&self.root)
    }

    /// Path of the `games/` sub-directory.
    fn games_dir(&self) -> PathBuf {
        self.root.join(GAMES_SUB_DIR)
    }

    /// Path of the `.users/` sub-directory.
    fn users_dir(&self) -> PathBuf {
        self.root.join(USERS_SUB_DIR)
    }
}

/// Build a unique per-test data root under the system temp directory.
#[cfg(test)]
pub(crate) fn test_root(label: &str) -> PathBuf {
    let unique = format!(
        "gameplan_test_{label}_{}_{:?}",
        std::process::id(),
        std::thread::current().id(),
    );
    std::env::temp_dir().join(unique)
}
