/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Intermediate State Calculation
//!
//! Computes, once per controller pipeline cycle, the intermediate partition
//! assignment the cluster should be driven toward: best-possible assignment
//! admitted through a recovery-first, multi-scope throttle policy, given the
//! current (and pending) observed assignment. See the module-level docs on
//! [`intermediate::compute_intermediate_state`] for the full algorithm.

pub mod classifier;
pub mod config;
pub mod error;
pub mod intermediate;
pub mod model;
pub mod pending;
pub mod state_counts;
pub mod throttle;
pub mod version_gate;

pub use error::{Result, StageError};
pub use intermediate::compute_intermediate_state;
pub use model::{
    CurrentPartitionState, IdealState, IntermediateStateOutput, PartitionState, RebalanceMode,
    RebalanceType, ResourceInfo, ResourcePartitionStateMap, ScopeLimits, StageInput,
    StateModelDefinition, ThrottleConfig,
};
pub use throttle::ThrottleController;
pub use version_gate::VersionCompatibilityGate;
