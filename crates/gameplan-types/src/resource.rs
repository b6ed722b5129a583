//! Resource types and the change/state tagged unions.
//!
//! A plan tracks a set of named resources. Each resource key is declared
//! with a [`ResourceType`] that fixes its accumulation semantics, and every
//! stage may carry one [`ResourceChange`] per key. The ledger engine folds
//! changes into [`ResourceState`] values.
//!
//! The change and state unions mirror each other variant for variant and
//! share the same wire tag (`"type"`), so a state can be rendered by the
//! same frontend components that edit a change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Resource type declaration
// ---------------------------------------------------------------------------

/// Accumulation semantics declared for a resource key.
///
/// The variants form a closed set; adding a new semantics means adding one
/// variant here plus one variant in [`ResourceChange`] and [`ResourceState`]
/// and one arm in the engine's transition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceType {
    /// A single integer total accumulated by deltas.
    Simple,
    /// Several integer sub-resources accumulated by deltas, edited as one input.
    SimpleCombined,
    /// A single integer that is overwritten, not accumulated; carries forward
    /// when a stage leaves it unset.
    Absolute,
    /// Several one-time boolean sub-resources (e.g. buildings that can be
    /// built once), each sticky per key.
    OneTimeCombined,
    /// Three token bowls with gain/burn/use token movement.
    PowerBowls,
    /// Four cult track levels accumulated by deltas.
    Cults,
}

// ---------------------------------------------------------------------------
// Per-stage change
// ---------------------------------------------------------------------------

/// What one stage does to one resource.
///
/// Internally tagged on the wire: `{"type": "simple", "value": 3}`,
/// `{"type": "power_bowls", "bowl1": 5, ...}`, and so on. The tag must match
/// the [`ResourceType`] declared for the key in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceChange {
    /// A delta added to the previous total.
    Simple {
        /// The signed delta for this stage.
        value: i64,
    },
    /// An absolute override; `None` means "no change this stage".
    Absolute {
        /// The new value, or `None` to carry the previous value forward.
        value: Option<i64>,
    },
    /// Per-sub-key deltas added to the previous sub-totals.
    SimpleCombined {
        /// Delta per sub-resource key.
        resources: BTreeMap<String, i64>,
        /// Display color per sub-resource key.
        #[serde(default)]
        colors: BTreeMap<String, String>,
    },
    /// Per-sub-key boolean overrides; `None` means "no change" for that key.
    OneTimeCombined {
        /// Override per sub-resource key (`None` carries the previous value).
        resources: BTreeMap<String, Option<bool>>,
        /// Display color per sub-resource key.
        #[serde(default)]
        colors: BTreeMap<String, String>,
    },
    /// Bowl override plus token operations.
    ///
    /// The bowl triple is an absolute target, except that an all-zero triple
    /// means "keep the previous bowls". The gain/burn/use counts are applied
    /// afterwards and are non-negative by precondition.
    PowerBowls {
        /// Target token count for bowl 1.
        bowl1: i64,
        /// Target token count for bowl 2.
        bowl2: i64,
        /// Target token count for bowl 3.
        bowl3: i64,
        /// Number of single-token gain moves (bowl 1 to 2, then 2 to 3).
        gain: i64,
        /// Number of burn moves (two tokens from bowl 2, one into bowl 3).
        burn: i64,
        /// Number of use moves (one token from bowl 3 back to bowl 1).
        r#use: i64,
    },
    /// Deltas for the four cult tracks.
    Cults {
        /// Fire track delta.
        fire: i64,
        /// Water track delta.
        water: i64,
        /// Earth track delta.
        earth: i64,
        /// Air track delta.
        air: i64,
    },
}

impl ResourceChange {
    /// The [`ResourceType`] this change's tag corresponds to.
    pub const fn resource_type(&self) -> ResourceType {
        match self {
            Self::Simple { .. } => ResourceType::Simple,
            Self::Absolute { .. } => ResourceType::Absolute,
            Self::SimpleCombined { .. } => ResourceType::SimpleCombined,
            Self::OneTimeCombined { .. } => ResourceType::OneTimeCombined,
            Self::PowerBowls { .. } => ResourceType::PowerBowls,
            Self::Cults { .. } => ResourceType::Cults,
        }
    }
}

// ---------------------------------------------------------------------------
// Accumulated state
// ---------------------------------------------------------------------------

/// The accumulated value of one resource after some prefix of a plan.
///
/// Mirrors [`ResourceChange`] variant for variant, but holds current values
/// rather than deltas. For `PowerBowls` the gain/burn/use counts of the last
/// applied change are retained for redisplay only; they carry no state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceState {
    /// Current total of a simple resource.
    Simple {
        /// The accumulated total.
        value: i64,
    },
    /// Current value of an absolute resource; `None` until first set.
    Absolute {
        /// The last explicitly set value, if any.
        value: Option<i64>,
    },
    /// Current sub-totals of a combined resource.
    SimpleCombined {
        /// Accumulated total per sub-resource key.
        resources: BTreeMap<String, i64>,
        /// Display color per sub-resource key.
        #[serde(default)]
        colors: BTreeMap<String, String>,
    },
    /// Current values of a one-time combined resource.
    OneTimeCombined {
        /// Last explicitly set value per sub-resource key.
        resources: BTreeMap<String, Option<bool>>,
        /// Display color per sub-resource key.
        #[serde(default)]
        colors: BTreeMap<String, String>,
    },
    /// Current bowl contents plus the last change's operation counts.
    PowerBowls {
        /// Tokens currently in bowl 1.
        bowl1: i64,
        /// Tokens currently in bowl 2.
        bowl2: i64,
        /// Tokens currently in bowl 3.
        bowl3: i64,
        /// Gain count of the last applied change (redisplay only).
        gain: i64,
        /// Burn count of the last applied change (redisplay only).
        burn: i64,
        /// Use count of the last applied change (redisplay only).
        r#use: i64,
    },
    /// Current levels of the four cult tracks.
    Cults {
        /// Fire track level.
        fire: i64,
        /// Water track level.
        water: i64,
        /// Earth track level.
        earth: i64,
        /// Air track level.
        air: i64,
    },
}

impl ResourceState {
    /// The [`ResourceType`] this state's tag corresponds to.
    pub const fn resource_type(&self) -> ResourceType {
        match self {
            Self::Simple { .. } => ResourceType::Simple,
            Self::Absolute { .. } => ResourceType::Absolute,
            Self::SimpleCombined { .. } => ResourceType::SimpleCombined,
            Self::OneTimeCombined { .. } => ResourceType::OneTimeCombined,
            Self::PowerBowls { .. } => ResourceType::PowerBowls,
            Self::Cults { .. } => ResourceType::Cults,
        }
    }

    /// The starting state for a resource key that has not been touched yet.
    pub const fn default_for(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::Simple => Self::Simple { value: 0 },
            ResourceType::Absolute => Self::Absolute { value: None },
            ResourceType::SimpleCombined => Self::SimpleCombined {
                resources: BTreeMap::new(),
                colors: BTreeMap::new(),
            },
            ResourceType::OneTimeCombined => Self::OneTimeCombined {
                resources: BTreeMap::new(),
                colors: BTreeMap::new(),
            },
            ResourceType::PowerBowls => Self::PowerBowls {
                bowl1: 0,
                bowl2: 0,
                bowl3: 0,
                gain: 0,
                burn: 0,
                r#use: 0,
            },
            ResourceType::Cults => Self::Cults {
                fire: 0,
                water: 0,
                earth: 0,
                air: 0,
            },
        }
    }
}
