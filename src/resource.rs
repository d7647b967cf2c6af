// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The managed resource backed by one CRD.
//!
//! # Lifecycle
//!
//! - **Create / Update** - server-side apply of the plan (`fieldManager`,
//!   `force` from `force_conflicts`, `fieldValidation=Strict`), then `wait_for`
//! - **Read** - GET; a 404 removes the resource from state
//! - **Delete** - DELETE (404 counts as success), then wait until the object is gone
//! - **Import** - `namespace/name` (or `name`) followed by GET
//!
//! Failures become diagnostics; no verb is retried.

use crate::api::{apply_object, delete_object, get_object};
use crate::constants::{ATTR_API_VERSION, ATTR_ID, ATTR_KIND};
use crate::descriptor::CrdDescriptor;
use crate::diagnostics::{Diagnostic, Diagnostics, SUMMARY_CONFIGURE, SUMMARY_REPLACE};
use crate::errors::Result;
use crate::framework::{
    CreateRequest, DeleteRequest, ImportStateRequest, ReadRequest, Resource, StateResponse,
    UpdateRequest,
};
use crate::import::parse_import_id;
use crate::model::{Metadata, ResourceModel};
use crate::provider::ProviderData;
use crate::schema::validate::validate;
use crate::schema::Schema;
use crate::wait::{wait_for_conditions, wait_for_deletion};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Resource type `k8s_<group>_<kind>_<version>`.
pub struct CrdResource {
    descriptor: Arc<CrdDescriptor>,
    data: Option<ProviderData>,
}

impl CrdResource {
    #[must_use]
    pub fn new(descriptor: Arc<CrdDescriptor>, data: Option<ProviderData>) -> Self {
        Self { descriptor, data }
    }

    fn data(&self) -> std::result::Result<&ProviderData, Diagnostic> {
        self.data.as_ref().ok_or_else(|| {
            Diagnostic::error(
                SUMMARY_CONFIGURE,
                format!(
                    "The provider has not been configured; cannot manage {} objects.",
                    self.descriptor.kind()
                ),
            )
        })
    }

    /// Apply a plan and build the resulting state.
    async fn apply(&self, plan: &Value) -> StateResponse {
        let diagnostics = validate(&without_computed(plan), &self.schema().attributes);
        if diagnostics.has_error() {
            return StateResponse {
                state: None,
                diagnostics,
            };
        }

        let data = match self.data() {
            Ok(data) => data,
            Err(diagnostic) => return StateResponse::from_diagnostics(diagnostic),
        };

        match self.apply_model(data, plan).await {
            Ok(state) => StateResponse {
                state: Some(state),
                diagnostics,
            },
            Err(e) => StateResponse::from_diagnostics(&e),
        }
    }

    async fn apply_model(&self, data: &ProviderData, plan: &Value) -> Result<Value> {
        let descriptor = &self.descriptor;
        let mut model = ResourceModel::from_document(descriptor, plan)?;
        let name = model.metadata.name.clone();
        let id = model.metadata.object_id(descriptor);
        let api = descriptor.api(data.client.clone(), model.metadata.namespace.as_deref());

        let field_manager = model
            .field_manager
            .clone()
            .unwrap_or_else(|| data.field_manager.clone());
        let force = model.force_conflicts.unwrap_or(false);

        let mut object = apply_object(
            &api,
            descriptor,
            &name,
            &id,
            &model.payload(descriptor),
            &field_manager,
            force,
        )
        .await?;

        if let Some(conditions) = model.wait_for.as_deref().filter(|c| !c.is_empty()) {
            object =
                wait_for_conditions(&api, descriptor, &name, &id, conditions, object, &data.wait)
                    .await?;
        }

        model.refresh_from(descriptor, &object);
        model.to_document(descriptor)
    }
}

/// Drop provider-computed top-level attributes carried over from prior state.
fn without_computed(plan: &Value) -> Value {
    let mut plan = plan.clone();
    if let Some(object) = plan.as_object_mut() {
        for key in [ATTR_ID, ATTR_API_VERSION, ATTR_KIND] {
            object.remove(key);
        }
    }
    plan
}

#[async_trait]
impl Resource for CrdResource {
    fn type_name(&self) -> String {
        self.descriptor.type_name()
    }

    fn schema(&self) -> Schema {
        self.descriptor.resource_schema()
    }

    async fn create(&self, request: CreateRequest) -> StateResponse {
        self.apply(&request.plan).await
    }

    async fn read(&self, request: ReadRequest) -> StateResponse {
        let descriptor = &self.descriptor;
        let data = match self.data() {
            Ok(data) => data,
            Err(diagnostic) => {
                return StateResponse {
                    state: Some(request.state),
                    diagnostics: diagnostic.into(),
                }
            }
        };
        let mut model = match ResourceModel::from_document(descriptor, &request.state) {
            Ok(model) => model,
            Err(e) => {
                return StateResponse {
                    state: Some(request.state),
                    diagnostics: Diagnostics::from(&e),
                }
            }
        };

        let id = model.metadata.object_id(descriptor);
        let api = descriptor.api(data.client.clone(), model.metadata.namespace.as_deref());
        let object = match get_object(&api, descriptor, &model.metadata.name, &id).await {
            Ok(object) => object,
            Err(e) if e.is_not_found() => {
                warn!(
                    "{} {} no longer exists, removing it from state",
                    descriptor.kind(),
                    id
                );
                return StateResponse::default();
            }
            Err(e) => {
                return StateResponse {
                    state: Some(request.state),
                    diagnostics: Diagnostics::from(&e),
                }
            }
        };

        model.refresh_from(descriptor, &object);
        match model.to_document(descriptor) {
            Ok(state) => StateResponse::with_state(state),
            Err(e) => StateResponse {
                state: Some(request.state),
                diagnostics: Diagnostics::from(&e),
            },
        }
    }

    async fn update(&self, request: UpdateRequest) -> StateResponse {
        let replace = self.requires_replace(&request.plan, &request.state);
        if !replace.is_empty() {
            let mut diagnostics = Diagnostics::new();
            for path in replace {
                diagnostics.add_attribute_error(
                    path,
                    SUMMARY_REPLACE,
                    "This attribute cannot be changed in place; the object must be deleted and recreated.",
                );
            }
            return StateResponse {
                state: Some(request.state),
                diagnostics,
            };
        }

        let mut response = self.apply(&request.plan).await;
        if response.state.is_none() {
            response.state = Some(request.state);
        }
        response
    }

    async fn delete(&self, request: DeleteRequest) -> Diagnostics {
        let descriptor = &self.descriptor;
        let data = match self.data() {
            Ok(data) => data,
            Err(diagnostic) => return diagnostic.into(),
        };
        let model = match ResourceModel::from_document(descriptor, &request.state) {
            Ok(model) => model,
            Err(e) => return Diagnostics::from(&e),
        };

        let name = &model.metadata.name;
        let id = model.metadata.object_id(descriptor);
        let api = descriptor.api(data.client.clone(), model.metadata.namespace.as_deref());

        let result = match delete_object(&api, descriptor, name, &id).await {
            Ok(true) => wait_for_deletion(&api, descriptor, name, &id, &data.wait).await,
            Ok(false) => Ok(()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Diagnostics::new(),
            Err(e) => Diagnostics::from(&e),
        }
    }

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse {
        let descriptor = &self.descriptor;
        let import_id = match parse_import_id(&request.id, descriptor.namespaced) {
            Ok(import_id) => import_id,
            Err(e) => return StateResponse::from_diagnostics(&e),
        };
        let data = match self.data() {
            Ok(data) => data,
            Err(diagnostic) => return StateResponse::from_diagnostics(diagnostic),
        };

        let id = descriptor.object_id(import_id.namespace.as_deref(), &import_id.name);
        let api = descriptor.api(data.client.clone(), import_id.namespace.as_deref());
        let object = match get_object(&api, descriptor, &import_id.name, &id).await {
            Ok(object) => object,
            Err(e) => return StateResponse::from_diagnostics(&e),
        };

        let metadata = match Metadata::from_live_object(descriptor, &object, &id) {
            Ok(metadata) => metadata,
            Err(e) => return StateResponse::from_diagnostics(&e),
        };

        let mut model = ResourceModel {
            metadata,
            ..ResourceModel::default()
        };
        model.refresh_from(descriptor, &object);
        info!("Imported {} {}", descriptor.kind(), id);

        match model.to_document(descriptor) {
            Ok(state) => StateResponse::with_state(state),
            Err(e) => StateResponse::from_diagnostics(&e),
        }
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod resource_tests;
