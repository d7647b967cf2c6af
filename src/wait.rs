// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Polling for `wait_for` conditions and for deletion.
//!
//! A condition holds when its JSONPath expression selects at least one value whose
//! string form equals the expected value. Expressions may be written as
//! `$.status.phase`, `.status.phase` or `{.status.phase}`.

use crate::api::get_object;
use crate::constants::{
    DEFAULT_DELETE_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WAIT_TIMEOUT_SECS,
};
use crate::descriptor::CrdDescriptor;
use crate::errors::{ProviderError, Result};
use crate::model::WaitCondition;
use crate::schema::validate::scalar_string;
use kube::api::{Api, DynamicObject};
use serde_json::Value;
use std::time::Duration;
use tokio::time::error::Elapsed;
use tracing::{debug, info};

/// Timeouts and poll interval shared by every operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitSettings {
    pub wait_timeout: Duration,
    pub delete_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            delete_timeout: Duration::from_secs(DEFAULT_DELETE_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

/// Normalize kubectl-style expressions to `$`-rooted JSONPath.
#[must_use]
pub fn normalize_jsonpath(expression: &str) -> String {
    let trimmed = expression.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed)
        .trim();
    if inner.starts_with('$') {
        inner.to_string()
    } else if inner.starts_with('.') || inner.starts_with('[') {
        format!("${inner}")
    } else {
        format!("$.{inner}")
    }
}

/// Check one condition against an object.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidJsonPath`] if the expression does not parse.
pub fn condition_met(object: &Value, condition: &WaitCondition) -> Result<bool> {
    let expression = normalize_jsonpath(&condition.jsonpath);
    let selected =
        jsonpath_lib::select(object, &expression).map_err(|e| ProviderError::InvalidJsonPath {
            expression: condition.jsonpath.clone(),
            reason: format!("{e:?}"),
        })?;
    Ok(selected
        .iter()
        .any(|value| scalar_string(value) == condition.value))
}

/// First condition that does not hold, if any.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidJsonPath`] if an expression does not parse.
pub fn first_unmet<'a>(
    object: &Value,
    conditions: &'a [WaitCondition],
) -> Result<Option<&'a WaitCondition>> {
    for condition in conditions {
        if !condition_met(object, condition)? {
            return Ok(Some(condition));
        }
    }
    Ok(None)
}

fn describe(condition: &WaitCondition) -> String {
    format!("{} = {:?}", condition.jsonpath, condition.value)
}

/// Wait until every condition holds, starting from `initial` (usually the apply
/// response) and polling GET afterwards. Returns the last object seen.
///
/// # Errors
///
/// Returns [`ProviderError::WaitTimeout`] when the conditions do not hold within the
/// wait timeout, or the first GET / JSONPath error.
pub async fn wait_for_conditions(
    api: &Api<DynamicObject>,
    descriptor: &CrdDescriptor,
    name: &str,
    id: &str,
    conditions: &[WaitCondition],
    initial: Value,
    settings: &WaitSettings,
) -> Result<Value> {
    let Some(unmet) = first_unmet(&initial, conditions)? else {
        return Ok(initial);
    };
    let mut pending = describe(unmet);
    info!("Waiting for {} {} until {}", descriptor.kind(), id, pending);

    let polled: std::result::Result<Result<Value>, Elapsed> =
        tokio::time::timeout(settings.wait_timeout, async {
            loop {
                tokio::time::sleep(settings.poll_interval).await;
                let object = get_object(api, descriptor, name, id).await?;
                match first_unmet(&object, conditions)? {
                    None => return Ok(object),
                    Some(condition) => {
                        pending = describe(condition);
                        debug!("{} {} still waiting for {}", descriptor.kind(), id, pending);
                    }
                }
            }
        })
        .await;

    match polled {
        Ok(result) => {
            if result.is_ok() {
                info!("Conditions met for {} {}", descriptor.kind(), id);
            }
            result
        }
        Err(_) => Err(ProviderError::WaitTimeout {
            kind: descriptor.kind().to_string(),
            name: id.to_string(),
            condition: pending,
            timeout_secs: settings.wait_timeout.as_secs(),
        }),
    }
}

/// Poll GET until the API server answers 404.
///
/// # Errors
///
/// Returns [`ProviderError::WaitTimeout`] when the object still exists after the
/// delete timeout, or the first GET error other than 404.
pub async fn wait_for_deletion(
    api: &Api<DynamicObject>,
    descriptor: &CrdDescriptor,
    name: &str,
    id: &str,
    settings: &WaitSettings,
) -> Result<()> {
    let polled: std::result::Result<Result<()>, Elapsed> =
        tokio::time::timeout(settings.delete_timeout, async {
            loop {
                match get_object(api, descriptor, name, id).await {
                    Err(e) if e.is_not_found() => return Ok(()),
                    Err(e) => return Err(e),
                    Ok(_) => {
                        debug!("{} {} still exists", descriptor.kind(), id);
                        tokio::time::sleep(settings.poll_interval).await;
                    }
                }
            }
        })
        .await;

    polled.unwrap_or_else(|_| {
        Err(ProviderError::WaitTimeout {
            kind: descriptor.kind().to_string(),
            name: id.to_string(),
            condition: "deletion".to_string(),
            timeout_secs: settings.delete_timeout.as_secs(),
        })
    })
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod wait_tests;
