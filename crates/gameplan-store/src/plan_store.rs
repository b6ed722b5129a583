//! Plan document CRUD.
//!
//! Each plan is one JSON file in the owning user's directory. The file
//! name is fixed at creation (`<game>_<timestamp>.json`); the display name
//! lives inside the document and is what every lookup goes by, so renaming
//! a plan never moves its file. Lookups scan the directory and parse each
//! document — an unparseable file is logged and skipped rather than
//! failing the whole listing.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use gameplan_types::Plan;

use crate::error::StoreError;
use crate::game_store::GameStore;
use crate::names::{validate_name, validate_plan_filename};
use crate::user_store::UserStore;
use crate::DOCUMENT_EXTENSION;

/// Operations on plan documents under the data root.
#[derive(Debug, Clone, Copy)]
pub struct PlanStore<'a> {
    root: &'a Path,
}

impl<'a> PlanStore<'a> {
    /// Create a plan store bound to a data root.
    pub const fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// List the names of all plans of a user, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user does not exist.
    pub async fn plan_names(&self, username: &str) -> Result<Vec<String>, StoreError> {
        let plans = self.load_all(username).await?;
        Ok(plans.into_iter().map(|(_, plan)| plan.name).collect())
    }

    /// Load one plan by its display name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user or plan does not exist.
    pub async fn load_plan(&self, username: &str, plan_name: &str) -> Result<Plan, StoreError> {
        let (_, plan) = self.find_plan(username, plan_name).await?;
        Ok(plan)
    }

    /// Create a fresh plan for a game.
    ///
    /// The plan is seeded from the game catalog: resource types and order
    /// are copied over, and the game's default starting resources become
    /// the first stage when they are non-empty. The plan name is the game
    /// name, made unique with a `_1`, `_2`, ... suffix if taken.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user or game does not
    /// exist, or [`StoreError::Io`]/[`StoreError::Serialization`] if the
    /// document cannot be written.
    pub async fn create_plan(&self, username: &str, game_name: &str) -> Result<Plan, StoreError> {
        validate_name(game_name)?;
        let user_dir = self.require_user_dir(username).await?;

        let game = GameStore::new(self.root).load_game(game_name).await?;
        let existing = self.plan_names(username).await?;

        let stages = if game.default_starting_resources.resource_changes.is_empty() {
            Vec::new()
        } else {
            vec![game.default_starting_resources]
        };

        let plan = Plan {
            name: unique_plan_name(game_name, &existing),
            filename: unique_plan_filename(&user_dir, game_name).await?,
            game_name: String::from(game_name),
            description: String::new(),
            last_modified: timestamp(),
            resource_types: game.resources,
            resource_order: game.resource_order,
            stages,
        };

        write_document(&user_dir.join(&plan.filename), &plan).await?;
        info!(username, plan = %plan.name, "plan created");
        Ok(plan)
    }

    /// Save a full plan document, stamping `last_modified`.
    ///
    /// The caller must always pass the complete, latest plan — the store
    /// overwrites the whole file, so a stale partial stage list would be
    /// persisted as-is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user does not exist or
    /// [`StoreError::InvalidName`] if the plan name or file name is
    /// malformed.
    pub async fn save_plan(&self, username: &str, plan: Plan) -> Result<Plan, StoreError> {
        validate_name(&plan.name)?;
        let user_dir = self.require_user_dir(username).await?;

        let mut plan = plan;
        if plan.filename.is_empty() {
            plan.filename = format!(
                "{}_{}{DOCUMENT_EXTENSION}",
                plan.game_name,
                Utc::now().format("%Y%m%d_%H%M%S")
            );
        }
        validate_plan_filename(&plan.filename)?;

        plan.last_modified = timestamp();
        write_document(&user_dir.join(&plan.filename), &plan).await?;
        info!(username, plan = %plan.name, "plan saved");
        Ok(plan)
    }

    /// Delete one plan by its display name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user or plan does not exist.
    pub async fn delete_plan(&self, username: &str, plan_name: &str) -> Result<(), StoreError> {
        let (path, _) = self.find_plan(username, plan_name).await?;
        tokio::fs::remove_file(&path).await?;
        info!(username, plan = plan_name, "plan deleted");
        Ok(())
    }

    /// Load every parseable plan document of a user, sorted by plan name.
    async fn load_all(&self, username: &str) -> Result<Vec<(PathBuf, Plan)>, StoreError> {
        let user_dir = self.require_user_dir(username).await?;

        let mut plans = Vec::new();
        let mut entries = tokio::fs::read_dir(&user_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(DOCUMENT_EXTENSION) {
                continue;
            }

            let path = entry.path();
            let content = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<Plan>(&content) {
                Ok(plan) => plans.push((path, plan)),
                Err(error) => {
                    warn!(username, file = %file_name, %error, "skipping unparseable plan file");
                }
            }
        }

        plans.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        Ok(plans)
    }

    /// Find a plan document by display name.
    async fn find_plan(
        &self,
        username: &str,
        plan_name: &str,
    ) -> Result<(PathBuf, Plan), StoreError> {
        validate_name(plan_name)?;
        let plans = self.load_all(username).await?;
        plans
            .into_iter()
            .find(|(_, plan)| plan.name == plan_name)
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "plan '{plan_name}' does not exist for user '{username}'"
                ))
            })
    }

    /// Resolve the user's directory, failing if the user does not exist.
    async fn require_user_dir(&self, username: &str) -> Result<PathBuf, StoreError> {
        let users = UserStore::new(self.root);
        if !users.user_exists(username).await? {
            return Err(StoreError::NotFound(format!(
                "user '{username}' does not exist"
            )));
        }
        Ok(users.user_dir(username))
    }
}

/// Pick a file name that does not collide with an existing document.
///
/// The timestamp alone is not enough: two plans created within the same
/// second would overwrite each other.
async fn unique_plan_filename(user_dir: &Path, game_name: &str) -> Result<String, StoreError> {
    let base = format!("{game_name}_{}", Utc::now().format("%Y%m%d_%H%M%S"));
    let mut candidate = format!("{base}{DOCUMENT_EXTENSION}");
    let mut counter: u64 = 1;
    while tokio::fs::try_exists(user_dir.join(&candidate)).await? {
        candidate = format!("{base}_{counter}{DOCUMENT_EXTENSION}");
        counter = counter.saturating_add(1);
    }
    Ok(candidate)
}

/// Pick the first free plan name: the game name itself, then `_1`, `_2`, ...
fn unique_plan_name(game_name: &str, existing: &[String]) -> String {
    if !existing.iter().any(|name| name == game_name) {
        return String::from(game_name);
    }
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{game_name}_{counter}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        counter = counter.saturating_add(1);
    }
}

/// Current UTC time in the document timestamp format.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Write a plan document, pretty-printed for hand inspection.
async fn write_document(path: &Path, plan: &Plan) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(plan)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}
