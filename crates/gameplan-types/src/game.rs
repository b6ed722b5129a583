//! Game catalog documents.
//!
//! A [`Game`] describes the resources a game tracks: their keys, declared
//! semantics, display order, and the starting resources a fresh plan is
//! seeded with. Catalog documents are immutable input — the service only
//! reads them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::plan::Stage;
use crate::resource::ResourceType;

/// Catalog entry for one supported game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Game {
    /// Catalog name, matching the file name of the document.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Display order of the resource keys.
    #[serde(default)]
    pub resource_order: Vec<String>,
    /// Declared accumulation semantics per resource key.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceType>,
    /// Stage seeded as the first stage of every new plan for this game.
    #[serde(default)]
    pub default_starting_resources: Stage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceChange;

    #[test]
    fn game_parses_from_catalog_document() {
        let json = serde_json::json!({
            "name": "terra",
            "description": "Terra Mystica",
            "resourceOrder": ["gold", "power"],
            "resources": {"gold": "SIMPLE", "power": "POWER_BOWLS"},
            "defaultStartingResources": {
                "description": "starting resources",
                "resourceChanges": {
                    "gold": {"type": "simple", "value": 15}
                }
            }
        });

        let parsed: Result<Game, _> = serde_json::from_value(json);
        let Some(game) = parsed.ok() else {
            assert!(false, "expected game to parse");
            return;
        };
        assert_eq!(game.resource_order.len(), 2);
        assert_eq!(game.resources.get("power"), Some(&ResourceType::PowerBowls));
        assert_eq!(
            game.default_starting_resources
                .resource_changes
                .get("gold"),
            Some(&ResourceChange::Simple { value: 15 })
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = serde_json::json!({"name": "minimal"});
        let parsed: Result<Game, _> = serde_json::from_value(json);
        let Some(game) = parsed.ok() else {
            assert!(false, "expected game to parse");
            return;
        };
        assert!(game.resources.is_empty());
        assert!(game.default_starting_resources.resource_changes.is_empty());
    }
}
