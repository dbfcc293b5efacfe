/*
 * SPDX-FileCopyrightText: Copyright 2024 LG Electronics Inc.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Configuration loading for the throttle surface (spec.md §6
//! "Configuration surface (throttle)").
//!
//! Mirrors `common::get_conf`'s pattern of a config-crate source with a
//! built-in fallback: a `piccolo_throttle.{yaml,json,toml}` file overrides
//! the unbounded, enabled-by-default configuration when present.

use crate::model::ThrottleConfig;

/// Loads the throttle configuration from `path` (if given) or the
/// conventional `piccolo_throttle` config file name, falling back to
/// [`ThrottleConfig::unbounded`] when neither is found or parses.
pub fn load_throttle_config(path: Option<&str>) -> ThrottleConfig {
    let mut builder = config::Config::builder();
    builder = match path {
        Some(path) => builder.add_source(config::File::with_name(path)),
        None => builder.add_source(config::File::with_name("piccolo_throttle").required(false)),
    };

    builder
        .build()
        .and_then(|cfg| cfg.try_deserialize::<ThrottleConfig>())
        .unwrap_or_else(|err| {
            tracing::debug!(
                error = %err,
                "no throttle configuration found, defaulting to unbounded/enabled"
            );
            ThrottleConfig::unbounded()
        })
}
