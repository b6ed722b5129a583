//! User directories: signup and the login existence probe.
//!
//! A user is nothing but a directory under `.users/` — there are no
//! credentials. Signup creates the directory; login merely checks that it
//! exists.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::StoreError;
use crate::names::validate_name;
use crate::USERS_SUB_DIR;

/// Operations on user directories under the data root.
#[derive(Debug, Clone, Copy)]
pub struct UserStore<'a> {
    root: &'a Path,
}

impl<'a> UserStore<'a> {
    /// Create a user store bound to a data root.
    pub const fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] for a malformed name,
    /// [`StoreError::AlreadyExists`] if the user exists, or
    /// [`StoreError::Io`] if the directory cannot be created.
    pub async fn create_user(&self, username: &str) -> Result<(), StoreError> {
        validate_name(username)?;

        let dir = self.user_dir(username);
        if tokio::fs::try_exists(&dir).await? {
            return Err(StoreError::AlreadyExists(format!(
                "user '{username}' already exists"
            )));
        }

        tokio::fs::create_dir_all(&dir).await?;
        info!(username, "user created");
        Ok(())
    }

    /// Whether a user exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] for a malformed name or
    /// [`StoreError::Io`] if the check fails.
    pub async fn user_exists(&self, username: &str) -> Result<bool, StoreError> {
        validate_name(username)?;
        Ok(tokio::fs::try_exists(self.user_dir(username)).await?)
    }

    /// Directory of one user. The name must already be validated.
    pub(crate) fn user_dir(&self, username: &str) -> PathBuf {
        self.root.join(USERS_SUB_DIR).join(username)
    }
}
