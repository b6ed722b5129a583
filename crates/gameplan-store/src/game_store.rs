//! Read-only access to game catalog documents.
//!
//! Catalogs are JSON files dropped into `games/` by the operator; the
//! service never writes them. Each document declares the resources of one
//! game (keys, semantics, display order) plus the default starting
//! resources for fresh plans.

use std::path::{Path, PathBuf};

use gameplan_types::Game;

use crate::error::StoreError;
use crate::names::validate_name;
use crate::{DOCUMENT_EXTENSION, GAMES_SUB_DIR};

/// Operations on the game catalog under the data root.
#[derive(Debug, Clone, Copy)]
pub struct GameStore<'a> {
    root: &'a Path,
}

impl<'a> GameStore<'a> {
    /// Create a game store bound to a data root.
    pub const fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// List the names of all configured games, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the games directory does not
    /// exist, or [`StoreError::Io`] if it cannot be read.
    pub async fn game_names(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.games_dir();
        if !tokio::fs::try_exists(&dir).await? {
            return Err(StoreError::NotFound(format!(
                "the games directory does not exist: {}",
                dir.display()
            )));
        }

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(stem) = file_name.strip_suffix(DOCUMENT_EXTENSION) {
                names.push(stem.to_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load one game catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] for a malformed name,
    /// [`StoreError::NotFound`] if no document exists for the game, or
    /// [`StoreError::Serialization`] if the document cannot be parsed.
    pub async fn load_game(&self, game_name: &str) -> Result<Game, StoreError> {
        validate_name(game_name)?;

        let path = self
            .games_dir()
            .join(format!("{game_name}{DOCUMENT_EXTENSION}"));
        if !tokio::fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(format!(
                "a config for a game with the name '{game_name}' does not exist"
            )));
        }

        let content = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Path of the `games/` sub-directory.
    fn games_dir(&self) -> PathBuf {
        self.root.join(GAMES_SUB_DIR)
    }
}
