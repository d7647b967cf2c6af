// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cluster I/O for a single object through the dynamic client.
//!
//! Each helper issues exactly one request and maps failures to
//! [`ProviderError::Api`] tagged with the verb. Nothing is retried.

use crate::descriptor::CrdDescriptor;
use crate::errors::{ProviderError, Result, Verb};
use kube::api::{Api, DeleteParams, DynamicObject, Patch, PatchParams};
use serde_json::Value;
use tracing::{debug, error, info};

/// Server-side apply `payload`, returning the object as stored by the API server.
///
/// The request carries `fieldManager`, `fieldValidation=Strict` and, when `force`
/// is set, `force=true`.
///
/// # Errors
///
/// Returns [`ProviderError::Api`] for PATCH failures and [`ProviderError::Unmarshal`]
/// if the response cannot be read back.
pub async fn apply_object(
    api: &Api<DynamicObject>,
    descriptor: &CrdDescriptor,
    name: &str,
    id: &str,
    payload: &Value,
    field_manager: &str,
    force: bool,
) -> Result<Value> {
    let mut params = PatchParams::apply(field_manager).validation_strict();
    if force {
        params = params.force();
    }

    debug!(
        "Applying {} {} as {} (force: {}, {} bytes)",
        descriptor.kind(),
        id,
        field_manager,
        force,
        payload.to_string().len()
    );

    match api.patch(name, &params, &Patch::Apply(payload)).await {
        Ok(object) => {
            info!("Applied {} {}", descriptor.kind(), id);
            object_to_value(descriptor, id, &object)
        }
        Err(e) => {
            error!("Failed to apply {} {}: {}", descriptor.kind(), id, e);
            Err(ProviderError::api(Verb::Patch, descriptor.kind(), id, &e))
        }
    }
}

/// Fetch the live object.
///
/// # Errors
///
/// Returns [`ProviderError::Api`] for GET failures, including 404 (check with
/// [`ProviderError::is_not_found`]), and [`ProviderError::Unmarshal`] if the response
/// cannot be read.
pub async fn get_object(
    api: &Api<DynamicObject>,
    descriptor: &CrdDescriptor,
    name: &str,
    id: &str,
) -> Result<Value> {
    let object = api
        .get(name)
        .await
        .map_err(|e| ProviderError::api(Verb::Get, descriptor.kind(), id, &e))?;
    debug!("Fetched {} {}", descriptor.kind(), id);
    object_to_value(descriptor, id, &object)
}

/// Delete the object. Returns `false` when it was already gone.
///
/// # Errors
///
/// Returns [`ProviderError::Api`] for DELETE failures other than 404.
pub async fn delete_object(
    api: &Api<DynamicObject>,
    descriptor: &CrdDescriptor,
    name: &str,
    id: &str,
) -> Result<bool> {
    match api.delete(name, &DeleteParams::default()).await {
        Ok(response) => {
            if response.is_left() {
                info!("Deletion of {} {} in progress", descriptor.kind(), id);
            } else {
                info!("Deleted {} {}", descriptor.kind(), id);
            }
            Ok(true)
        }
        Err(e) => {
            let err = ProviderError::api(Verb::Delete, descriptor.kind(), id, &e);
            if err.is_not_found() {
                debug!("{} {} already deleted", descriptor.kind(), id);
                Ok(false)
            } else {
                error!("Failed to delete {} {}: {}", descriptor.kind(), id, e);
                Err(err)
            }
        }
    }
}

fn object_to_value(descriptor: &CrdDescriptor, id: &str, object: &DynamicObject) -> Result<Value> {
    serde_json::to_value(object).map_err(|e| ProviderError::Unmarshal {
        kind: descriptor.kind().to_string(),
        name: id.to_string(),
        reason: e.to_string(),
    })
}
