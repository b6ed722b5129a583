//! Plan and stage documents.
//!
//! A [`Plan`] is the unit of persistence: one JSON document per plan file in
//! the owning user's directory. Its `stages` are ordered and meaningful —
//! the ledger engine folds them strictly in sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::resource::{ResourceChange, ResourceType};

/// One step of a plan: a description plus per-resource changes.
///
/// A resource key absent from `resource_changes` means "unchanged this
/// stage", never "reset to zero".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Stage {
    /// Free-form description shown in the stage list.
    #[serde(default)]
    pub description: String,
    /// The changes this stage applies, keyed by resource key.
    #[serde(default)]
    pub resource_changes: BTreeMap<String, ResourceChange>,
}

/// An ordered sequence of stages for one user and game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Plan {
    /// Display name, unique within the owning user's plans.
    pub name: String,
    /// File name of the backing document (assigned by the store).
    #[serde(default)]
    pub filename: String,
    /// Name of the game this plan is for.
    pub game_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// ISO-8601 UTC timestamp of the last save (stamped by the store).
    #[serde(default)]
    pub last_modified: String,
    /// Declared accumulation semantics per resource key.
    #[serde(default)]
    pub resource_types: BTreeMap<String, ResourceType>,
    /// Display order of the resource keys.
    #[serde(default)]
    pub resource_order: Vec<String>,
    /// The ordered stage sequence.
    #[serde(default)]
    pub stages: Vec<Stage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceChange;

    #[test]
    fn stage_without_changes_deserializes_to_empty_map() {
        let json = serde_json::json!({"description": "setup"});
        let parsed: Result<Stage, _> = serde_json::from_value(json);
        let Some(stage) = parsed.ok() else {
            assert!(false, "expected stage to parse");
            return;
        };
        assert!(stage.resource_changes.is_empty());
    }

    #[test]
    fn plan_uses_camel_case_field_names() {
        let mut stage = Stage::default();
        stage
            .resource_changes
            .insert(String::from("gold"), ResourceChange::Simple { value: 5 });

        let plan = Plan {
            name: String::from("opening"),
            filename: String::from("terra_20250101_120000.json"),
            game_name: String::from("terra"),
            description: String::new(),
            last_modified: String::from("2025-01-01T12:00:00.000Z"),
            resource_types: BTreeMap::from([(String::from("gold"), ResourceType::Simple)]),
            resource_order: vec![String::from("gold")],
            stages: vec![stage],
        };

        let json = serde_json::to_value(&plan).unwrap_or_default();
        assert!(json.get("gameName").is_some());
        assert!(json.get("lastModified").is_some());
        assert!(json.get("resourceTypes").is_some());
        assert!(json.get("resourceOrder").is_some());
        let first_stage = json.get("stages").and_then(|s| s.get(0));
        assert!(
            first_stage
                .and_then(|s| s.get("resourceChanges"))
                .is_some()
        );
    }

    #[test]
    fn plan_round_trips_through_json() {
        let plan = Plan {
            name: String::from("p1"),
            game_name: String::from("terra"),
            resource_types: BTreeMap::from([
                (String::from("gold"), ResourceType::Simple),
                (String::from("power"), ResourceType::PowerBowls),
            ]),
            resource_order: vec![String::from("gold"), String::from("power")],
            ..Plan::default()
        };

        let json = serde_json::to_string(&plan).unwrap_or_default();
        let back: Result<Plan, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(plan));
    }
}
