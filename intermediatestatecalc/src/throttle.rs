/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Throttle Controller (spec.md §4.4).
//!
//! A plain value type owning three nested counters keyed by
//! `(RebalanceType, scope id)`, exactly as spec.md §9 prescribes. Queries
//! take `(type, scope-id)`; only the Intermediate Computer mutates counters.
//! Not synchronized — the whole stage runs single-threaded per invocation
//! (spec.md §5).

use crate::model::{InstanceId, RebalanceType, ThrottleConfig};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct ThrottleController {
    config: ThrottleConfig,
    cluster_counts: HashMap<RebalanceType, u32>,
    resource_counts: HashMap<(RebalanceType, String), u32>,
    instance_counts: HashMap<(RebalanceType, String), u32>,
}

impl ThrottleController {
    /// `resources` and `live_instances` fix the scope this controller was
    /// constructed for (spec.md §4.4 "Construction inputs"); the controller
    /// itself only ever keys counters off the `(type, scope-id)` pairs it is
    /// charged with, so neither set needs to be retained past construction.
    pub fn new(
        _resources: BTreeSet<String>,
        config: ThrottleConfig,
        _live_instances: BTreeSet<InstanceId>,
    ) -> Self {
        ThrottleController {
            config,
            cluster_counts: HashMap::new(),
            resource_counts: HashMap::new(),
            instance_counts: HashMap::new(),
        }
    }

    pub fn is_throttle_enabled(&self) -> bool {
        self.config.throttle_enabled
    }

    fn cluster_count(&self, rebalance_type: RebalanceType) -> u32 {
        *self.cluster_counts.get(&rebalance_type).unwrap_or(&0)
    }

    fn resource_count(&self, rebalance_type: RebalanceType, resource: &str) -> u32 {
        *self
            .resource_counts
            .get(&(rebalance_type, resource.to_string()))
            .unwrap_or(&0)
    }

    fn instance_count(&self, rebalance_type: RebalanceType, instance: &str) -> u32 {
        *self
            .instance_counts
            .get(&(rebalance_type, instance.to_string()))
            .unwrap_or(&0)
    }

    /// Cluster-scope throttling short-circuits resource and instance checks
    /// (spec.md §4.4 "Semantics").
    fn cluster_throttled(&self, rebalance_type: RebalanceType) -> bool {
        if !self.is_throttle_enabled() {
            return false;
        }
        match self.config.limits_for(rebalance_type).and_then(|l| l.cluster) {
            Some(limit) => self.cluster_count(rebalance_type) >= limit,
            None => false,
        }
    }

    /// `true` if `resource` has reached its quota for `rebalance_type`.
    pub fn throttle_for_resource(&self, rebalance_type: RebalanceType, resource: &str) -> bool {
        if !self.is_throttle_enabled() {
            return false;
        }
        if self.cluster_throttled(rebalance_type) {
            return true;
        }
        match self.config.limits_for(rebalance_type).and_then(|l| l.resource) {
            Some(limit) => self.resource_count(rebalance_type, resource) >= limit,
            None => false,
        }
    }

    /// `true` if `instance` has reached its quota for `rebalance_type`.
    pub fn throttle_for_instance(&self, rebalance_type: RebalanceType, instance: &str) -> bool {
        if !self.is_throttle_enabled() {
            return false;
        }
        if self.cluster_throttled(rebalance_type) {
            return true;
        }
        match self.config.limits_for(rebalance_type).and_then(|l| l.instance) {
            Some(limit) => self.instance_count(rebalance_type, instance) >= limit,
            None => false,
        }
    }

    pub fn charge_cluster(&mut self, rebalance_type: RebalanceType) {
        *self.cluster_counts.entry(rebalance_type).or_insert(0) += 1;
    }

    pub fn charge_resource(&mut self, rebalance_type: RebalanceType, resource: &str) {
        *self
            .resource_counts
            .entry((rebalance_type, resource.to_string()))
            .or_insert(0) += 1;
    }

    pub fn charge_instance(&mut self, rebalance_type: RebalanceType, instance: &str) {
        *self
            .instance_counts
            .entry((rebalance_type, instance.to_string()))
            .or_insert(0) += 1;
    }
}
