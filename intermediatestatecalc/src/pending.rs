/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Pending-Transition Accountant (spec.md §4.5).
//!
//! Pre-charges throttles for transitions already in flight before new
//! admission decisions are made, so fresh admission respects true available
//! budget. Must be invoked at most once per partition per computation —
//! calling it twice double-counts by design (spec.md §8, invariant 8).

use crate::model::{CurrentPartitionState, RebalanceType};
use crate::throttle::ThrottleController;

/// Charges `throttle` for one partition's pending (in-flight) transitions,
/// if any. `rebalance_type` is the partition's classification from §4.3.
pub fn charge_pending_transitions(
    throttle: &mut ThrottleController,
    resource: &str,
    rebalance_type: RebalanceType,
    state: &CurrentPartitionState,
) {
    if state.pending.is_empty() {
        return;
    }

    throttle.charge_cluster(rebalance_type);
    throttle.charge_resource(rebalance_type, resource);

    // Stable iteration order (sorted by instance id) so repeated runs over
    // identical inputs charge instances in the same sequence.
    for (instance, pending_state) in &state.pending {
        let differs = state
            .current
            .get(instance)
            .map(|current_state| current_state != pending_state)
            .unwrap_or(true);
        if differs {
            throttle.charge_instance(rebalance_type, instance);
        }
    }
}
