/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! State-Counts Helper (spec.md §4.2).

use crate::model::{PartitionState, State};
use std::collections::BTreeMap;

/// Tallies replica counts per state from an instance -> state mapping.
/// Empty input yields empty output; no entry has count 0.
pub fn state_counts(states: &PartitionState) -> BTreeMap<State, u32> {
    let mut counts = BTreeMap::new();
    for state in states.values() {
        *counts.entry(state.clone()).or_insert(0) += 1;
    }
    counts
}
