/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Intermediate Computer (spec.md §4.6) — the stage's orchestrating entry
//! point. For each resource: classify its partitions, pre-charge pending
//! transitions, admit recovery unconditionally, then admit load-balance
//! only when the resource has no outstanding recovery work.

use crate::classifier::classify;
use crate::error::{Result, StageError};
use crate::model::{
    IntermediateStateOutput, PartitionState, RebalanceMode, RebalanceType, StageInput,
};
use crate::pending::charge_pending_transitions;
use crate::throttle::ThrottleController;
use std::collections::BTreeSet;

/// Validates that every attribute the stage needs is present, per spec.md
/// §4.6 "Failure mode": no partial output is ever emitted.
fn validate_input(input: &StageInput) -> Result<()> {
    let mut missing = Vec::new();

    for (resource, info) in &input.resource_map {
        if !input.best_possible.contains_key(resource) {
            missing.push(format!("best_possible[{resource}]"));
        }
        let ideal_state = input.ideal_states.get(resource);
        match ideal_state {
            None => missing.push(format!("ideal_state[{resource}]")),
            Some(ideal) if !input.state_models.contains_key(&ideal.state_model_ref) => {
                missing.push(format!("state_model[{}]", ideal.state_model_ref));
            }
            Some(_) => {}
        }
        // Check current_state over the same partition set the computation
        // loop below actually iterates: info.partitions union
        // best_possible's keys, since a partition can appear in
        // best-possible without being listed on the resource.
        let mut partitions: BTreeSet<&String> = info.partitions.iter().collect();
        if let Some(best_possible) = input.best_possible.get(resource) {
            partitions.extend(best_possible.keys());
        }
        for partition in partitions {
            let key = (resource.clone(), partition.clone());
            if !input.current_state.contains_key(&key) {
                missing.push(format!("current_state[{resource}/{partition}]"));
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StageError::MissingInput { missing })
    }
}

/// Computes the intermediate assignment the controller should drive the
/// cluster toward this cycle, subject to the throttle policy (spec.md §4.6).
pub fn compute_intermediate_state(input: &StageInput) -> Result<IntermediateStateOutput> {
    validate_input(input)?;

    let mut throttle = ThrottleController::new(
        input.resource_map.keys().cloned().collect(),
        input.throttle_config.clone(),
        input.live_instances.clone(),
    );

    let mut output = IntermediateStateOutput::new();

    for (resource, info) in &input.resource_map {
        let ideal_state = &input.ideal_states[resource];
        let best_possible = &input.best_possible[resource];

        if ideal_state.rebalance_mode != RebalanceMode::FullAuto || !throttle.is_throttle_enabled() {
            tracing::info!(
                resource = resource.as_str(),
                "not FULL_AUTO or throttling disabled; passthrough to best-possible"
            );
            output.insert(resource.clone(), best_possible.clone());
            continue;
        }

        let model = &input.state_models[&ideal_state.state_model_ref];

        let mut partitions: BTreeSet<&String> = info.partitions.iter().collect();
        // Best-possible/current may name partitions the resource map omits;
        // include them too so nothing silently drops out of the output.
        partitions.extend(best_possible.keys());

        let mut resource_intermediate = crate::model::ResourcePartitionStateMap::new();
        let mut recovery_set = BTreeSet::new();
        let mut load_balance_set = BTreeSet::new();

        for partition in &partitions {
            let key = (resource.clone(), (*partition).clone());
            let current_state = &input.current_state[&key];
            let best = best_possible
                .get(*partition)
                .cloned()
                .unwrap_or_else(PartitionState::new);

            match classify(&best, &current_state.current, model) {
                RebalanceType::None => {
                    resource_intermediate.insert((*partition).clone(), best);
                }
                RebalanceType::RecoveryBalance => {
                    recovery_set.insert((*partition).clone());
                }
                RebalanceType::LoadBalance => {
                    load_balance_set.insert((*partition).clone());
                }
            }
        }

        // Pending-Transition Accountant (§4.5): pre-charge in-flight work
        // for every partition that needs movement, before new admission.
        for partition in recovery_set.iter().chain(load_balance_set.iter()) {
            let key = (resource.clone(), partition.clone());
            let current_state = &input.current_state[&key];
            let rebalance_type = if recovery_set.contains(partition) {
                RebalanceType::RecoveryBalance
            } else {
                RebalanceType::LoadBalance
            };
            charge_pending_transitions(&mut throttle, resource, rebalance_type, current_state);
        }

        // Recovery admission is unconditional in this version (spec.md §9
        // leaves the hook for a future policy via throttle_for_resource/
        // throttle_for_instance, both already generic over RebalanceType).
        for partition in &recovery_set {
            let best = best_possible
                .get(partition)
                .cloned()
                .unwrap_or_else(PartitionState::new);
            resource_intermediate.insert(partition.clone(), best);
        }

        let mut admitted = 0u32;
        let mut throttled_count = 0u32;

        if recovery_set.is_empty() {
            for partition in &load_balance_set {
                let key = (resource.clone(), partition.clone());
                let current_state = &input.current_state[&key];
                let best = best_possible
                    .get(partition)
                    .cloned()
                    .unwrap_or_else(PartitionState::new);

                let mut all_instances: BTreeSet<&String> =
                    current_state.current.keys().collect();
                all_instances.extend(best.keys());

                let mut throttled = throttle.throttle_for_resource(RebalanceType::LoadBalance, resource);
                let mut changed_instances = Vec::new();

                if !throttled {
                    for instance in &all_instances {
                        if best.get(*instance) == current_state.current.get(*instance) {
                            continue;
                        }
                        if throttle.throttle_for_instance(RebalanceType::LoadBalance, instance) {
                            throttled = true;
                            break;
                        }
                        changed_instances.push((*instance).clone());
                    }
                }

                if throttled {
                    tracing::debug!(
                        resource = resource.as_str(),
                        partition = partition.as_str(),
                        "load balance throttled"
                    );
                    resource_intermediate.insert(partition.clone(), current_state.current.clone());
                    throttled_count += 1;
                } else {
                    resource_intermediate.insert(partition.clone(), best);
                    for instance in &changed_instances {
                        throttle.charge_instance(RebalanceType::LoadBalance, instance);
                    }
                    throttle.charge_resource(RebalanceType::LoadBalance, resource);
                    throttle.charge_cluster(RebalanceType::LoadBalance);
                    admitted += 1;
                }
            }
        } else {
            // Recovery outstanding for this resource: load-balance is
            // suppressed entirely, partitions retain their current map.
            for partition in &load_balance_set {
                let key = (resource.clone(), partition.clone());
                let current_state = &input.current_state[&key];
                resource_intermediate.insert(partition.clone(), current_state.current.clone());
            }
        }

        tracing::info!(
            resource = resource.as_str(),
            recovery = recovery_set.len(),
            load_balance = load_balance_set.len(),
            admitted,
            throttled = throttled_count,
            "resource intermediate computation complete"
        );

        output.insert(resource.clone(), resource_intermediate);
    }

    Ok(output)
}
