//! The stage fold: cumulative resource state plus a validity flag.
//!
//! [`evaluate`] processes stages strictly in order. For each stage, every
//! resource key present in its change map gets a new state computed from
//! the previous one (defaulted per type when the key is new); keys the
//! stage does not mention carry their state through untouched. Validity
//! starts `true` and latches `false` the first time any negativity check
//! fires; `allow_negative = true` disables the checks entirely.
//!
//! Within one stage, resource keys are independent — processing order
//! across keys cannot affect the result — but every key of stage *i* is
//! fully applied before stage *i + 1* begins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gameplan_types::{Plan, ResourceChange, ResourceState, Stage};

use crate::LedgerError;
use crate::bowls::Bowls;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// The outcome of folding a stage sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Final state per resource key.
    pub final_state: BTreeMap<String, ResourceState>,
    /// Whether no resource ever went negative (always `true` when the
    /// negativity checks were disabled).
    pub is_valid: bool,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Fold `stages` into final per-resource state.
///
/// Pure and deterministic: the inputs are not mutated and the returned
/// state shares no data with `initial_state`. Cost is
/// O(stages x resource keys); callers re-evaluating large plans on every
/// edit should cache prefix results rather than re-deriving from scratch.
pub fn evaluate(
    stages: &[Stage],
    allow_negative: bool,
    initial_state: &BTreeMap<String, ResourceState>,
) -> Evaluation {
    let mut state = initial_state.clone();
    let mut is_valid = true;

    for stage in stages {
        for (key, change) in &stage.resource_changes {
            let next = apply_change(state.get(key), change, allow_negative, &mut is_valid);
            state.insert(key.clone(), next);
        }
    }

    Evaluation {
        final_state: state,
        is_valid,
    }
}

/// Evaluate a whole plan after checking every stage change against the
/// plan's declared resource types.
///
/// # Errors
///
/// Returns [`LedgerError::TypeMismatch`] or
/// [`LedgerError::UndeclaredResource`] if any stage change does not match
/// the plan's `resource_types` declaration.
pub fn evaluate_plan(plan: &Plan, allow_negative: bool) -> Result<Evaluation, LedgerError> {
    check_stage_types(plan)?;
    Ok(evaluate(&plan.stages, allow_negative, &BTreeMap::new()))
}

/// Verify that every stage change carries the tag declared for its key.
///
/// # Errors
///
/// Returns the first mismatch found, in stage order.
pub fn check_stage_types(plan: &Plan) -> Result<(), LedgerError> {
    for (index, stage) in plan.stages.iter().enumerate() {
        for (key, change) in &stage.resource_changes {
            let Some(declared) = plan.resource_types.get(key) else {
                return Err(LedgerError::UndeclaredResource {
                    stage: index,
                    key: key.clone(),
                });
            };
            let actual = change.resource_type();
            if actual != *declared {
                return Err(LedgerError::TypeMismatch {
                    stage: index,
                    key: key.clone(),
                    declared: *declared,
                    actual,
                });
            }
        }
    }
    Ok(())
}

/// The state immediately before stage `index`: the fold of `stages[0..index)`
/// from an empty initial state.
///
/// Drives the single-stage preview in the editor. An `index` past the end
/// evaluates the whole sequence.
pub fn state_before_stage(stages: &[Stage], index: usize) -> Evaluation {
    let prefix = stages.get(..index).unwrap_or(stages);
    evaluate(prefix, false, &BTreeMap::new())
}

/// Evaluate a single stage against a supplied prior state.
///
/// Returns that stage's own post-change totals and validity indicator.
pub fn evaluate_stage(
    stage: &Stage,
    prior: &BTreeMap<String, ResourceState>,
) -> Evaluation {
    evaluate(std::slice::from_ref(stage), false, prior)
}

// ---------------------------------------------------------------------------
// Transition rules
// ---------------------------------------------------------------------------

/// Compute the new state for one resource key from its previous state and
/// one change.
///
/// This is the single dispatch point over the six resource semantics. When
/// `prev` carries a different tag than the change (possible only for plans
/// that dodge the strict check), the previous state is ignored and the
/// change's own default is used, matching the historical behavior.
fn apply_change(
    prev: Option<&ResourceState>,
    change: &ResourceChange,
    allow_negative: bool,
    is_valid: &mut bool,
) -> ResourceState {
    match change {
        ResourceChange::Simple { value } => {
            let prev_value = match prev {
                Some(ResourceState::Simple { value }) => *value,
                _ => 0,
            };
            let new_value = prev_value.saturating_add(*value);
            if !allow_negative && new_value < 0 {
                *is_valid = false;
            }
            ResourceState::Simple { value: new_value }
        }

        ResourceChange::Absolute { value } => {
            // Sticky: null means "no change this stage".
            let prev_value = match prev {
                Some(ResourceState::Absolute { value }) => *value,
                _ => None,
            };
            ResourceState::Absolute {
                value: value.or(prev_value),
            }
        }

        ResourceChange::SimpleCombined { resources, colors } => {
            let (prev_resources, prev_colors) = match prev {
                Some(ResourceState::SimpleCombined { resources, colors }) => {
                    (resources.clone(), colors.clone())
                }
                _ => (BTreeMap::new(), BTreeMap::new()),
            };

            let mut new_resources = prev_resources;
            for (sub_key, delta) in resources {
                let total = new_resources
                    .get(sub_key)
                    .copied()
                    .unwrap_or(0)
                    .saturating_add(*delta);
                if !allow_negative && total < 0 {
                    *is_valid = false;
                }
                new_resources.insert(sub_key.clone(), total);
            }

            ResourceState::SimpleCombined {
                resources: new_resources,
                colors: merge_colors(colors, prev_colors),
            }
        }

        ResourceChange::OneTimeCombined { resources, colors } => {
            let (prev_resources, prev_colors) = match prev {
                Some(ResourceState::OneTimeCombined { resources, colors }) => {
                    (resources.clone(), colors.clone())
                }
                _ => (BTreeMap::new(), BTreeMap::new()),
            };

            // Sticky per sub-key: null means "no change" for that key.
            let mut new_resources = prev_resources;
            for (sub_key, override_value) in resources {
                let value = match override_value {
                    Some(flag) => Some(*flag),
                    None => new_resources.get(sub_key).copied().flatten(),
                };
                new_resources.insert(sub_key.clone(), value);
            }

            ResourceState::OneTimeCombined {
                resources: new_resources,
                colors: merge_colors(colors, prev_colors),
            }
        }

        ResourceChange::PowerBowls {
            bowl1,
            bowl2,
            bowl3,
            gain,
            burn,
            r#use,
        } => {
            let prev_bowls = match prev {
                Some(ResourceState::PowerBowls {
                    bowl1,
                    bowl2,
                    bowl3,
                    ..
                }) => Bowls::new(*bowl1, *bowl2, *bowl3),
                _ => Bowls::default(),
            };

            // An all-zero triple is "no override": keep the previous bowls.
            let target = Bowls::new(*bowl1, *bowl2, *bowl3);
            let mut bowls = if target.is_zero() { prev_bowls } else { target };

            bowls.gain(*gain);
            bowls.burn(*burn);
            bowls.spend(*r#use);

            if !allow_negative && bowls.any_negative() {
                *is_valid = false;
            }

            ResourceState::PowerBowls {
                bowl1: bowls.bowl1,
                bowl2: bowls.bowl2,
                bowl3: bowls.bowl3,
                gain: *gain,
                burn: *burn,
                r#use: *r#use,
            }
        }

        ResourceChange::Cults {
            fire,
            water,
            earth,
            air,
        } => {
            let (prev_fire, prev_water, prev_earth, prev_air) = match prev {
                Some(ResourceState::Cults {
                    fire,
                    water,
                    earth,
                    air,
                }) => (*fire, *water, *earth, *air),
                _ => (0, 0, 0, 0),
            };

            let new_fire = prev_fire.saturating_add(*fire);
            let new_water = prev_water.saturating_add(*water);
            let new_earth = prev_earth.saturating_add(*earth);
            let new_air = prev_air.saturating_add(*air);

            if !allow_negative && (new_fire < 0 || new_water < 0 || new_earth < 0 || new_air < 0)
            {
                *is_valid = false;
            }

            ResourceState::Cults {
                fire: new_fire,
                water: new_water,
                earth: new_earth,
                air: new_air,
            }
        }
    }
}

/// A change's colors replace the previous ones when it carries any;
/// otherwise the previous colors carry forward.
fn merge_colors(
    change_colors: &BTreeMap<String, String>,
    prev_colors: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    if change_colors.is_empty() {
        prev_colors
    } else {
        change_colors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a stage with a single change.
    fn stage(key: &str, change: ResourceChange) -> Stage {
        let mut stage = Stage::default();
        stage.resource_changes.insert(String::from(key), change);
        stage
    }

    fn simple(value: i64) -> ResourceChange {
        ResourceChange::Simple { value }
    }

    fn power(bowls: (i64, i64, i64), gain: i64, burn: i64, spend: i64) -> ResourceChange {
        ResourceChange::PowerBowls {
            bowl1: bowls.0,
            bowl2: bowls.1,
            bowl3: bowls.2,
            gain,
            burn,
            r#use: spend,
        }
    }

    #[test]
    fn simple_deltas_accumulate_and_flag_negativity() {
        let stages = vec![
            stage("gold", simple(5)),
            stage("gold", simple(-3)),
            stage("gold", simple(-4)),
        ];

        let result = evaluate(&stages, false, &BTreeMap::new());
        assert_eq!(
            result.final_state.get("gold"),
            Some(&ResourceState::Simple { value: -2 })
        );
        assert!(!result.is_valid);

        let tolerant = evaluate(&stages, true, &BTreeMap::new());
        assert_eq!(
            tolerant.final_state.get("gold"),
            Some(&ResourceState::Simple { value: -2 })
        );
        assert!(tolerant.is_valid);
    }

    #[test]
    fn validity_latches_even_if_total_recovers() {
        let stages = vec![
            stage("gold", simple(-1)),
            stage("gold", simple(10)),
        ];
        let result = evaluate(&stages, false, &BTreeMap::new());
        assert_eq!(
            result.final_state.get("gold"),
            Some(&ResourceState::Simple { value: 9 })
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn allow_negative_never_reports_invalid() {
        let stages = vec![
            stage("gold", simple(-100)),
            stage("power", power((0, 1, 0), 0, 5, 3)),
            stage(
                "cults",
                ResourceChange::Cults {
                    fire: -9,
                    water: -9,
                    earth: -9,
                    air: -9,
                },
            ),
        ];
        let result = evaluate(&stages, true, &BTreeMap::new());
        assert!(result.is_valid);
    }

    #[test]
    fn empty_stage_is_a_no_op() {
        let stages = vec![
            stage("gold", simple(5)),
            Stage::default(),
            stage("gold", simple(2)),
        ];
        let with_empty = evaluate(&stages, false, &BTreeMap::new());

        let compact = vec![stage("gold", simple(5)), stage("gold", simple(2))];
        let without_empty = evaluate(&compact, false, &BTreeMap::new());

        assert_eq!(with_empty.final_state, without_empty.final_state);
        assert_eq!(with_empty.is_valid, without_empty.is_valid);
    }

    #[test]
    fn prefix_evaluation_composes() {
        let stages = vec![
            stage("gold", simple(5)),
            stage("power", power((5, 7, 0), 2, 0, 0)),
            stage("gold", simple(-3)),
            stage("power", power((0, 0, 0), 0, 1, 1)),
        ];

        for split in 0..stages.len() {
            let prefix = state_before_stage(&stages, split);
            let Some(current) = stages.get(split) else {
                continue;
            };
            let stepped = evaluate_stage(current, &prefix.final_state);

            let direct = state_before_stage(&stages, split.saturating_add(1));
            assert_eq!(stepped.final_state, direct.final_state);
        }
    }

    #[test]
    fn absolute_value_is_sticky_across_null_stages() {
        let stages = vec![
            stage("score", ResourceChange::Absolute { value: Some(10) }),
            stage("score", ResourceChange::Absolute { value: None }),
        ];
        let carried = evaluate(&stages, false, &BTreeMap::new());
        assert_eq!(
            carried.final_state.get("score"),
            Some(&ResourceState::Absolute { value: Some(10) })
        );

        let mut all = stages;
        all.push(stage("score", ResourceChange::Absolute { value: Some(7) }));
        let overridden = evaluate(&all, false, &BTreeMap::new());
        assert_eq!(
            overridden.final_state.get("score"),
            Some(&ResourceState::Absolute { value: Some(7) })
        );
    }

    #[test]
    fn power_bowls_zero_triple_keeps_previous_bowls() {
        let stages = vec![
            stage("power", power((7, 0, 0), 0, 0, 0)),
            stage("power", power((0, 0, 0), 2, 0, 0)),
        ];
        let result = evaluate(&stages, false, &BTreeMap::new());
        assert_eq!(
            result.final_state.get("power"),
            Some(&ResourceState::PowerBowls {
                bowl1: 5,
                bowl2: 2,
                bowl3: 0,
                gain: 2,
                burn: 0,
                r#use: 0,
            })
        );
        assert!(result.is_valid);
    }

    #[test]
    fn power_bowls_over_burn_goes_negative_and_invalidates() {
        let stages = vec![
            stage("power", power((0, 1, 0), 0, 0, 0)),
            stage("power", power((0, 0, 0), 0, 1, 0)),
        ];
        let result = evaluate(&stages, false, &BTreeMap::new());
        assert_eq!(
            result.final_state.get("power"),
            Some(&ResourceState::PowerBowls {
                bowl1: 0,
                bowl2: -1,
                bowl3: 1,
                gain: 0,
                burn: 1,
                r#use: 0,
            })
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn power_bowls_nonzero_triple_overrides() {
        let stages = vec![
            stage("power", power((7, 3, 1), 0, 0, 0)),
            stage("power", power((2, 2, 2), 0, 0, 0)),
        ];
        let result = evaluate(&stages, false, &BTreeMap::new());
        assert_eq!(
            result.final_state.get("power"),
            Some(&ResourceState::PowerBowls {
                bowl1: 2,
                bowl2: 2,
                bowl3: 2,
                gain: 0,
                burn: 0,
                r#use: 0,
            })
        );
    }

    #[test]
    fn simple_combined_accumulates_per_sub_key() {
        let first = stage(
            "goods",
            ResourceChange::SimpleCombined {
                resources: BTreeMap::from([
                    (String::from("wood"), 2),
                    (String::from("stone"), 1),
                ]),
                colors: BTreeMap::from([(String::from("wood"), String::from("#885522"))]),
            },
        );
        let second = stage(
            "goods",
            ResourceChange::SimpleCombined {
                resources: BTreeMap::from([
                    (String::from("wood"), -1),
                    (String::from("stone"), -2),
                ]),
                colors: BTreeMap::new(),
            },
        );

        let result = evaluate(&[first, second], false, &BTreeMap::new());
        let Some(ResourceState::SimpleCombined { resources, colors }) =
            result.final_state.get("goods")
        else {
            assert!(false, "expected simple_combined state");
            return;
        };
        assert_eq!(resources.get("wood"), Some(&1));
        assert_eq!(resources.get("stone"), Some(&-1));
        // No colors in the second change: the first stage's carry forward.
        assert_eq!(colors.get("wood"), Some(&String::from("#885522")));
        assert!(!result.is_valid);
    }

    #[test]
    fn simple_combined_carries_untouched_sub_keys() {
        let first = stage(
            "goods",
            ResourceChange::SimpleCombined {
                resources: BTreeMap::from([
                    (String::from("wood"), 4),
                    (String::from("stone"), 2),
                ]),
                colors: BTreeMap::new(),
            },
        );
        let second = stage(
            "goods",
            ResourceChange::SimpleCombined {
                resources: BTreeMap::from([(String::from("wood"), -1)]),
                colors: BTreeMap::new(),
            },
        );

        let result = evaluate(&[first, second], false, &BTreeMap::new());
        let Some(ResourceState::SimpleCombined { resources, .. }) =
            result.final_state.get("goods")
        else {
            assert!(false, "expected simple_combined state");
            return;
        };
        assert_eq!(resources.get("wood"), Some(&3));
        assert_eq!(resources.get("stone"), Some(&2));
    }

    #[test]
    fn one_time_combined_is_sticky_per_sub_key() {
        let first = stage(
            "buildings",
            ResourceChange::OneTimeCombined {
                resources: BTreeMap::from([
                    (String::from("stronghold"), Some(true)),
                    (String::from("sanctuary"), None),
                ]),
                colors: BTreeMap::new(),
            },
        );
        let second = stage(
            "buildings",
            ResourceChange::OneTimeCombined {
                resources: BTreeMap::from([
                    (String::from("stronghold"), None),
                    (String::from("sanctuary"), Some(true)),
                ]),
                colors: BTreeMap::new(),
            },
        );

        let result = evaluate(&[first, second], false, &BTreeMap::new());
        let Some(ResourceState::OneTimeCombined { resources, .. }) =
            result.final_state.get("buildings")
        else {
            assert!(false, "expected one_time_combined state");
            return;
        };
        assert_eq!(resources.get("stronghold"), Some(&Some(true)));
        assert_eq!(resources.get("sanctuary"), Some(&Some(true)));
        assert!(result.is_valid);
    }

    #[test]
    fn cults_accumulate_and_check_each_track() {
        let stages = vec![
            stage(
                "cults",
                ResourceChange::Cults {
                    fire: 2,
                    water: 1,
                    earth: 0,
                    air: 0,
                },
            ),
            stage(
                "cults",
                ResourceChange::Cults {
                    fire: -1,
                    water: -2,
                    earth: 0,
                    air: 0,
                },
            ),
        ];
        let result = evaluate(&stages, false, &BTreeMap::new());
        assert_eq!(
            result.final_state.get("cults"),
            Some(&ResourceState::Cults {
                fire: 1,
                water: -1,
                earth: 0,
                air: 0,
            })
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn untouched_keys_carry_through_unchanged() {
        let initial = BTreeMap::from([
            (String::from("gold"), ResourceState::Simple { value: 9 }),
            (
                String::from("score"),
                ResourceState::Absolute { value: Some(40) },
            ),
        ]);
        let stages = vec![stage("gold", simple(1))];

        let result = evaluate(&stages, false, &initial);
        assert_eq!(
            result.final_state.get("score"),
            Some(&ResourceState::Absolute { value: Some(40) })
        );
        // The input map itself is untouched.
        assert_eq!(
            initial.get("gold"),
            Some(&ResourceState::Simple { value: 9 })
        );
    }

    #[test]
    fn mismatched_previous_state_falls_back_to_the_change_default() {
        let initial = BTreeMap::from([(
            String::from("gold"),
            ResourceState::Absolute { value: Some(50) },
        )]);
        let stages = vec![stage("gold", simple(3))];

        let result = evaluate(&stages, false, &initial);
        // The absolute previous state is ignored; the simple default (0) is used.
        assert_eq!(
            result.final_state.get("gold"),
            Some(&ResourceState::Simple { value: 3 })
        );
    }

    #[test]
    fn evaluate_plan_rejects_mismatched_tags() {
        let plan = Plan {
            name: String::from("p"),
            game_name: String::from("terra"),
            resource_types: BTreeMap::from([(
                String::from("gold"),
                gameplan_types::ResourceType::Absolute,
            )]),
            stages: vec![stage("gold", simple(3))],
            ..Plan::default()
        };

        let result = evaluate_plan(&plan, false);
        assert_eq!(
            result.err(),
            Some(LedgerError::TypeMismatch {
                stage: 0,
                key: String::from("gold"),
                declared: gameplan_types::ResourceType::Absolute,
                actual: gameplan_types::ResourceType::Simple,
            })
        );
    }

    #[test]
    fn evaluate_plan_rejects_undeclared_keys() {
        let plan = Plan {
            name: String::from("p"),
            game_name: String::from("terra"),
            stages: vec![stage("gold", simple(3))],
            ..Plan::default()
        };

        let result = evaluate_plan(&plan, false);
        assert_eq!(
            result.err(),
            Some(LedgerError::UndeclaredResource {
                stage: 0,
                key: String::from("gold"),
            })
        );
    }

    #[test]
    fn evaluate_plan_accepts_well_typed_plans() {
        let plan = Plan {
            name: String::from("p"),
            game_name: String::from("terra"),
            resource_types: BTreeMap::from([(
                String::from("gold"),
                gameplan_types::ResourceType::Simple,
            )]),
            stages: vec![stage("gold", simple(3))],
            ..Plan::default()
        };

        let result = evaluate_plan(&plan, false);
        let Some(evaluation) = result.ok() else {
            assert!(false, "expected evaluation to succeed");
            return;
        };
        assert_eq!(
            evaluation.final_state.get("gold"),
            Some(&ResourceState::Simple { value: 3 })
        );
    }

    #[test]
    fn evaluation_serializes_camel_case() {
        let result = evaluate(&[stage("gold", simple(1))], false, &BTreeMap::new());
        let json = serde_json::to_value(&result).unwrap_or_default();
        assert!(json.get("finalState").is_some());
        assert_eq!(json.get("isValid"), Some(&serde_json::json!(true)));
    }
}
