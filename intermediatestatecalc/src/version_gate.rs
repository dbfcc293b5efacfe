/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Version Compatibility Gate (spec.md §4.1).
//!
//! Rejects controller/participant pairs whose declared primary versions are
//! incompatible before any state computation runs.

use crate::error::{Result, StageError};
use std::collections::HashSet;

/// Immutable set of `(controllerPrimary, participantPrimary)` pairs known to
/// be incompatible. Modeled as a value per spec.md §9 ("No global mutable
/// state ... Model as an immutable set value") rather than process-wide
/// static state, which keeps the gate trivially testable.
#[derive(Debug, Clone, Default)]
pub struct VersionCompatibilityGate {
    incompatible_pairs: HashSet<(String, String)>,
}

impl VersionCompatibilityGate {
    pub fn new(incompatible_pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        VersionCompatibilityGate {
            incompatible_pairs: incompatible_pairs.into_iter().collect(),
        }
    }

    /// Extracts the "primary version" of a version string: the prefix up to
    /// and including the second `.`-separated segment (`0.6.1.3` -> `0.6`).
    /// Strings with fewer than two segments are returned unchanged.
    pub fn primary_version(version: &str) -> String {
        let mut parts = version.splitn(3, '.');
        match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) => format!("{major}.{minor}"),
            _ => version.to_string(),
        }
    }

    /// Validates the controller's version against every live participant.
    ///
    /// A missing controller version is fatal. A missing participant version
    /// is logged as a warning and that instance is skipped (spec.md §4.1,
    /// §7). Any incompatible participant aborts the whole check.
    pub fn check(
        &self,
        controller_name: &str,
        controller_version: Option<&str>,
        participants: &[(String, Option<String>)],
    ) -> Result<()> {
        let controller_version =
            controller_version.ok_or(StageError::MissingControllerVersion)?;
        let controller_primary = Self::primary_version(controller_version);

        for (participant, version) in participants {
            let Some(participant_version) = version else {
                tracing::warn!(
                    instance = participant.as_str(),
                    "participant has no declared version, skipping compatibility check"
                );
                continue;
            };

            let participant_primary = Self::primary_version(participant_version);

            let incompatible = controller_primary < participant_primary
                || self
                    .incompatible_pairs
                    .contains(&(controller_primary.clone(), participant_primary.clone()));

            if incompatible {
                return Err(StageError::IncompatibleVersion {
                    controller: controller_name.to_string(),
                    participant: participant.clone(),
                    controller_version: controller_version.to_string(),
                    participant_version: participant_version.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_version_takes_first_two_segments() {
        assert_eq!(VersionCompatibilityGate::primary_version("0.6.1.3"), "0.6");
        assert_eq!(VersionCompatibilityGate::primary_version("0.6"), "0.6");
        assert_eq!(VersionCompatibilityGate::primary_version("6"), "6");
    }

    #[test]
    fn controller_newer_than_participant_is_compatible() {
        let gate = VersionCompatibilityGate::new([]);
        let result = gate.check(
            "controller",
            Some("0.6.1.3"),
            &[("p1".to_string(), Some("0.5.2.0".to_string()))],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn static_incompatible_set_is_fatal() {
        let gate = VersionCompatibilityGate::new([("0.4".to_string(), "0.3".to_string())]);
        let result = gate.check(
            "controller",
            Some("0.4.0.0"),
            &[("p1".to_string(), Some("0.3.0.0".to_string()))],
        );
        assert_eq!(
            result,
            Err(StageError::IncompatibleVersion {
                controller: "controller".to_string(),
                participant: "p1".to_string(),
                controller_version: "0.4.0.0".to_string(),
                participant_version: "0.3.0.0".to_string(),
            })
        );
    }

    #[test]
    fn missing_controller_version_is_fatal() {
        let gate = VersionCompatibilityGate::new([]);
        let result = gate.check("controller", None, &[]);
        assert_eq!(result, Err(StageError::MissingControllerVersion));
    }

    #[test]
    fn missing_participant_version_is_skipped_not_fatal() {
        let gate = VersionCompatibilityGate::new([]);
        let result = gate.check(
            "controller",
            Some("0.6.0.0"),
            &[("p1".to_string(), None)],
        );
        assert!(result.is_ok());
    }
}
