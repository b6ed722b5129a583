//! Resource ledger engine for the GamePlan service.
//!
//! The engine folds an ordered sequence of plan stages into cumulative
//! per-resource state and an overall validity flag. It is pure and
//! synchronous: identical inputs always yield identical output, no I/O, no
//! shared state between calls. Callers invoke it freely — once per plan for
//! the summary view, once per stage for live previews.
//!
//! # Architecture
//!
//! - [`evaluate`] -- The fold itself, with one dispatch point over the six
//!   resource semantics.
//! - [`bowls`] -- The power-bowl token-transfer algorithm (gain/burn/use).
//!
//! # Validity
//!
//! A plan is *invalid* when any resource value goes below zero at any stage.
//! Negativity is not an error condition: the engine reports it as a plain
//! boolean so the frontend can render a red indicator without interrupting
//! editing. Passing `allow_negative = true` disables every negativity check
//! uniformly.
//!
//! # Usage
//!
//! ```
//! use std::collections::BTreeMap;
//! use gameplan_ledger::evaluate;
//! use gameplan_types::{ResourceChange, Stage};
//!
//! let mut stage = Stage::default();
//! stage
//!     .resource_changes
//!     .insert(String::from("gold"), ResourceChange::Simple { value: 5 });
//!
//! let result = evaluate(&[stage], false, &BTreeMap::new());
//! assert!(result.is_valid);
//! ```

pub mod bowls;
pub mod evaluate;

// Re-export primary types at crate root.
pub use bowls::Bowls;
pub use evaluate::{
    Evaluation, check_stage_types, evaluate, evaluate_plan, evaluate_stage, state_before_stage,
};

use gameplan_types::ResourceType;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors reported by the strict (type-checked) evaluation entry points.
///
/// The plain [`evaluate`] fold never fails; these errors only arise from
/// [`evaluate_plan`] and [`check_stage_types`], which validate every stage
/// change against the plan's declared resource types first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A stage change's tag disagrees with the type declared for its key.
    #[error(
        "stage {stage}: change for '{key}' is tagged {actual:?} but the plan declares {declared:?}"
    )]
    TypeMismatch {
        /// Zero-based index of the offending stage.
        stage: usize,
        /// The resource key the change applies to.
        key: String,
        /// The type declared for the key in the plan.
        declared: ResourceType,
        /// The type the change actually carries.
        actual: ResourceType,
    },

    /// A stage changes a key the plan does not declare at all.
    #[error("stage {stage}: change for '{key}' has no declared resource type")]
    UndeclaredResource {
        /// Zero-based index of the offending stage.
        stage: usize,
        /// The undeclared resource key.
        key: String,
    },
}
