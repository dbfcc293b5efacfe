/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Error handling for the intermediate state calculation stage.

use thiserror::Error;

/// Fatal errors the stage can raise. `MissingParticipantVersion` (spec.md
/// §7) is intentionally not a variant here — it is a warning, logged and
/// skipped, never propagated.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StageError {
    #[error("missing required stage input(s): {}", .missing.join(", "))]
    MissingInput { missing: Vec<String> },

    #[error("controller has no declared version")]
    MissingControllerVersion,

    #[error(
        "incompatible version: controller {controller} ({controller_version}) vs participant {participant} ({participant_version})"
    )]
    IncompatibleVersion {
        controller: String,
        participant: String,
        controller_version: String,
        participant_version: String,
    },
}

pub type Result<T> = std::result::Result<T, StageError>;
