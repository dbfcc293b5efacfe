/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Rebalance Classifier (spec.md §4.3).

use crate::model::{PartitionState, RebalanceType, StateModelDefinition};
use crate::state_counts::state_counts;

/// Classifies the movement a partition requires given its best-possible and
/// current assignment, under the priority order of `model`.
///
/// A deficit in any high-priority non-reserved state means a replica has
/// been lost and must be recovered before placement optimization is
/// allowed — see spec.md §4.3 "Rationale".
pub fn classify(
    best_possible: &PartitionState,
    current: &PartitionState,
    model: &StateModelDefinition,
) -> RebalanceType {
    if best_possible == current {
        return RebalanceType::None;
    }

    let best_counts = state_counts(best_possible);
    let current_counts = state_counts(current);

    for state in &model.priority_states {
        let best_count = best_counts.get(state);
        let current_count = current_counts.get(state);

        if best_count.is_none() && current_count.is_none() {
            continue;
        }

        let exactly_one_absent = best_count.is_none() != current_count.is_none();
        let deficit = matches!((best_count, current_count), (Some(b), Some(c)) if c < b);

        if (exactly_one_absent || deficit) && !model.is_reserved(state) {
            return RebalanceType::RecoveryBalance;
        }
    }

    RebalanceType::LoadBalance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(priority: &[&str], initial: &str) -> StateModelDefinition {
        StateModelDefinition {
            priority_states: priority.iter().map(|s| s.to_string()).collect(),
            initial_state: initial.to_string(),
        }
    }

    fn map(pairs: &[(&str, &str)]) -> PartitionState {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn equal_maps_are_none() {
        let m = model(&["MASTER", "SLAVE"], "OFFLINE");
        let b = map(&[("a", "MASTER")]);
        assert_eq!(classify(&b, &b, &m), RebalanceType::None);
    }

    #[test]
    fn deficit_in_priority_state_is_recovery() {
        let m = model(&["MASTER", "SLAVE"], "OFFLINE");
        let current = map(&[("a", "OFFLINE"), ("b", "SLAVE")]);
        let best = map(&[("a", "MASTER"), ("b", "SLAVE")]);
        assert_eq!(classify(&best, &current, &m), RebalanceType::RecoveryBalance);
    }

    #[test]
    fn placement_only_difference_is_load_balance() {
        let m = model(&["MASTER", "SLAVE"], "OFFLINE");
        let current = map(&[("a", "MASTER"), ("b", "SLAVE")]);
        let best = map(&[("a", "SLAVE"), ("b", "MASTER")]);
        assert_eq!(classify(&best, &current, &m), RebalanceType::LoadBalance);
    }

    #[test]
    fn reserved_state_deficit_never_triggers_recovery() {
        let m = model(&["MASTER", "SLAVE"], "OFFLINE");
        // deficit only in DROPPED, a reserved state.
        let current = map(&[("a", "MASTER"), ("b", "DROPPED")]);
        let best = map(&[("a", "MASTER")]);
        assert_ne!(classify(&best, &current, &m), RebalanceType::RecoveryBalance);
    }

    #[test]
    fn non_reserved_deficit_alongside_reserved_one_is_recovery() {
        let m = model(&["MASTER", "SLAVE"], "OFFLINE");
        let current = map(&[("a", "MASTER"), ("b", "DROPPED")]);
        let best = map(&[("a", "MASTER"), ("b", "SLAVE")]);
        assert_eq!(classify(&best, &current, &m), RebalanceType::RecoveryBalance);
    }
}
