/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Data model for the intermediate state calculation stage.
//!
//! Every type here is a plain value, scoped to a single invocation of the
//! [`crate::intermediate::compute_intermediate_state`] entry point. Nothing
//! persists between invocations (see spec.md §3 "Lifecycle").

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Opaque, unique-within-a-cluster identifier for a participant host.
pub type InstanceId = String;

/// Opaque replica state name, e.g. `MASTER`, `SLAVE`, `OFFLINE`, `DROPPED`, `ERROR`.
pub type State = String;

/// Reserved states that never trigger recovery on their own (spec.md §3, §6).
pub const DROPPED: &str = "DROPPED";
pub const ERROR: &str = "ERROR";

/// A partition's instance -> state assignment. An instance appears at most
/// once per partition (spec.md §3 "Partition State Map").
pub type PartitionState = BTreeMap<InstanceId, State>;

/// Per-resource mapping of partition name -> partition state.
pub type ResourcePartitionStateMap = BTreeMap<String, PartitionState>;

/// Observed current assignment plus any in-flight (not yet acknowledged)
/// transitions for one partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentPartitionState {
    pub current: PartitionState,
    pub pending: PartitionState,
}

/// Ordered state-priority list plus the declared initial state for one
/// state model (spec.md §3 "State Model Definition").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateModelDefinition {
    /// Highest priority first.
    pub priority_states: Vec<State>,
    pub initial_state: State,
}

impl StateModelDefinition {
    /// `true` for `DROPPED`, `ERROR`, and this model's declared initial
    /// state — the reserved states whose deficits never trigger recovery.
    pub fn is_reserved(&self, state: &str) -> bool {
        state == DROPPED || state == ERROR || state == self.initial_state
    }
}

/// Rebalance mode for a resource's ideal state. Throttling only applies
/// when the mode is `FullAuto` (spec.md §3 "Ideal State").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceMode {
    FullAuto,
    /// Any other declared mode (e.g. `SEMI_AUTO`, `CUSTOMIZED`); throttling
    /// never applies, and the intermediate map equals the best-possible map.
    Other,
}

/// Per-resource ideal-state declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdealState {
    pub rebalance_mode: RebalanceMode,
    /// Name used to look up the resource's `StateModelDefinition`.
    pub state_model_ref: String,
}

/// Static shape of a resource: its declared partition list. Partition
/// contents (best-possible/current state) live in the other maps keyed by
/// (resource, partition); this only fixes which partitions exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceInfo {
    pub partitions: Vec<String>,
}

/// Classification of the movement a partition requires (spec.md §3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RebalanceType {
    None,
    RecoveryBalance,
    LoadBalance,
}

/// Per-scope admission limits for one rebalance type. Absent = unbounded
/// (spec.md §3 "Throttle Config").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeLimits {
    pub cluster: Option<u32>,
    pub resource: Option<u32>,
    pub instance: Option<u32>,
}

/// The full throttle configuration surface described in spec.md §6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default)]
    pub throttle_enabled: bool,
    #[serde(default)]
    pub recovery_balance: ScopeLimits,
    #[serde(default)]
    pub load_balance: ScopeLimits,
}

impl ThrottleConfig {
    /// Limits are unbounded, but the mechanism is enabled — matches the
    /// observed-default behavior of the source throttle policy before any
    /// quota is configured.
    pub fn unbounded() -> Self {
        ThrottleConfig {
            throttle_enabled: true,
            recovery_balance: ScopeLimits::default(),
            load_balance: ScopeLimits::default(),
        }
    }

    pub(crate) fn limits_for(&self, rebalance_type: RebalanceType) -> Option<&ScopeLimits> {
        match rebalance_type {
            RebalanceType::RecoveryBalance => Some(&self.recovery_balance),
            RebalanceType::LoadBalance => Some(&self.load_balance),
            RebalanceType::None => None,
        }
    }
}

/// Typed replacement for the attribute-map coupling spec.md §9 calls out as
/// an anti-pattern: every field the stage consumes, named explicitly.
#[derive(Debug, Clone)]
pub struct StageInput {
    pub best_possible: BTreeMap<String, ResourcePartitionStateMap>,
    pub current_state: BTreeMap<(String, String), CurrentPartitionState>,
    pub resource_map: BTreeMap<String, ResourceInfo>,
    pub ideal_states: BTreeMap<String, IdealState>,
    pub state_models: BTreeMap<String, StateModelDefinition>,
    pub live_instances: BTreeSet<InstanceId>,
    pub throttle_config: ThrottleConfig,
}

/// Per-resource result of the computation (spec.md §3 "Intermediate Output").
pub type IntermediateStateOutput = BTreeMap<String, ResourcePartitionStateMap>;
