//! REST API endpoint handlers.
//!
//! All handlers go through the file-backed [`GamePlanStore`] in the shared
//! [`AppState`]; plan evaluation calls straight into the ledger engine.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/version` | Application version |
//! | `POST` | `/api/users/{username}` | Sign up |
//! | `GET` | `/api/users/{username}` | Login existence probe |
//! | `GET` | `/api/games` | List game names |
//! | `GET` | `/api/games/{gameName}` | Game catalog document |
//! | `GET` | `/api/users/{u}/plans` | List plan names |
//! | `PUT` | `/api/users/{u}/plans` | Save a full plan document |
//! | `POST` | `/api/users/{u}/plans` | Clone a plan |
//! | `GET` | `/api/users/{u}/plans/{planName}` | Load one plan |
//! | `POST` | `/api/users/{u}/plans/{gameName}` | Create a plan for a game |
//! | `DELETE` | `/api/users/{u}/plans/{planName}` | Delete a plan |
//! | `POST` | `/api/evaluate` | Run the ledger engine |
//!
//! [`GamePlanStore`]: gameplan_store::GamePlanStore

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use gameplan_ledger::{Evaluation, evaluate};
use gameplan_types::{Plan, ResourceState, Stage};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request body structs
// ---------------------------------------------------------------------------

/// Body of the `POST /api/users/{u}/plans` clone endpoint.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCloneRequest {
    /// Name of the plan to clone.
    pub original_plan_name: String,
}

/// Body of the `POST /api/evaluate` endpoint.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    /// The stage sequence to fold, in order.
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// When `true`, negativity checks are disabled entirely.
    #[serde(default)]
    pub allow_negative: bool,
    /// Optional seed state (the editor passes the state prior to a stage).
    #[serde(default)]
    pub initial_state: BTreeMap<String, ResourceState>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page listing the API endpoints.
///
/// The real frontend is the separate `TypeScript` application; this page
/// is what an operator sees when opening the server address directly.
pub async fn index() -> impl IntoResponse {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>GamePlan API</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        code {{ color: #7ee787; }}
        .status {{ color: #3fb950; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>GamePlan API</h1>
    <p class="subtitle">Board game plan tracking -- version {version}</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <h2>Endpoints</h2>
    <ul>
        <li><code>GET</code> <a href="/api/version">/api/version</a> -- application version</li>
        <li><code>GET</code> <a href="/api/games">/api/games</a> -- list game names</li>
        <li><code>GET</code> /api/games/:gameName -- game catalog document</li>
        <li><code>POST</code> /api/users/:username -- sign up</li>
        <li><code>GET</code> /api/users/:username -- login probe</li>
        <li><code>GET</code> /api/users/:username/plans -- list plan names</li>
        <li><code>PUT</code> /api/users/:username/plans -- save a plan</li>
        <li><code>POST</code> /api/users/:username/plans -- clone a plan</li>
        <li><code>GET</code> /api/users/:username/plans/:planName -- load a plan</li>
        <li><code>POST</code> /api/users/:username/plans/:gameName -- create a plan</li>
        <li><code>DELETE</code> /api/users/:username/plans/:planName -- delete a plan</li>
        <li><code>POST</code> /api/evaluate -- run the resource ledger engine</li>
    </ul>
</body>
</html>"#,
        version = env!("CARGO_PKG_VERSION"),
    ))
}

// ---------------------------------------------------------------------------
// GET /api/version
// ---------------------------------------------------------------------------

/// Return the application version.
pub async fn version() -> impl IntoResponse {
    Json(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Sign up a new user (username only, no credentials).
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.users().create_user(&username).await?;
    Ok(StatusCode::CREATED)
}

/// Login probe: `200` when the user exists, `404` otherwise.
pub async fn user_exists(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if state.store.users().user_exists(&username).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::NotFound(format!(
            "user '{username}' does not exist"
        )))
    }
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

/// List the names of all configured games.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let names = state.store.games().game_names().await?;
    Ok(Json(names))
}

/// Return one full game catalog document.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = state.store.games().load_game(&game_name).await?;
    Ok(Json(game))
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// List the names of a user's plans.
pub async fn list_plans(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let names = state.store.plans().plan_names(&username).await?;
    Ok(Json(names))
}

/// Load one plan by name.
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path((username, plan_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state.store.plans().load_plan(&username, &plan_name).await?;
    Ok(Json(plan))
}

/// Create a fresh plan for a game, seeded from the game catalog.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Path((username, game_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .store
        .plans()
        .create_plan(&username, &game_name)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// Clone an existing plan: a fresh plan for the same game with the
/// original's stages and a `Cloned from ...` description.
pub async fn clone_plan(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Json(request): Json<PlanCloneRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.store.plans();

    let original = plans
        .load_plan(&username, &request.original_plan_name)
        .await?;
    let mut cloned = plans.create_plan(&username, &original.game_name).await?;
    cloned.stages = original.stages;
    cloned.description = format!("Cloned from '{}'\n{}", original.name, original.description);
    let saved = plans.save_plan(&username, cloned).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Save a full plan document.
///
/// The body must carry the complete, latest plan — the store overwrites
/// the whole file, so a partial stage list would be persisted as-is.
pub async fn update_plan(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Json(plan): Json<Plan>,
) -> Result<impl IntoResponse, ApiError> {
    let saved = state.store.plans().save_plan(&username, plan).await?;
    Ok(Json(saved))
}

/// Delete one plan by name.
pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Path((username, plan_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .plans()
        .delete_plan(&username, &plan_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /api/evaluate -- run the ledger engine
// ---------------------------------------------------------------------------

/// Fold a stage sequence into final resource state and a validity flag.
///
/// The summary view posts all stages with an empty initial state; the
/// stage editor posts a one-stage slice together with the state prior to
/// that stage.
pub async fn evaluate_stages(Json(request): Json<EvaluateRequest>) -> Json<Evaluation> {
    Json(evaluate(
        &request.stages,
        request.allow_negative,
        &request.initial_state,
    ))
}
