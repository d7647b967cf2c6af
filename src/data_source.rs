// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Lookup data sources: read an existing CRD object from the cluster.

use crate::api::get_object;
use crate::descriptor::CrdDescriptor;
use crate::diagnostics::{Diagnostic, Diagnostics, SUMMARY_CONFIGURE};
use crate::errors::{ProviderError, Result};
use crate::framework::{DataSource, DataSourceReadRequest, StateResponse};
use crate::model::{Metadata, ResourceModel};
use crate::provider::ProviderData;
use crate::schema::Schema;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Data source type `k8s_<group>_<kind>_<version>`.
pub struct CrdDataSource {
    descriptor: Arc<CrdDescriptor>,
    data: Option<ProviderData>,
}

impl CrdDataSource {
    #[must_use]
    pub fn new(descriptor: Arc<CrdDescriptor>, data: Option<ProviderData>) -> Self {
        Self { descriptor, data }
    }

    async fn lookup(&self, data: &ProviderData, config: &Value) -> Result<Value> {
        let descriptor = &self.descriptor;
        let requested: Metadata = serde_json::from_value(
            config.get("metadata").cloned().unwrap_or(Value::Null),
        )
        .map_err(|e| ProviderError::Marshal {
            kind: descriptor.kind().to_string(),
            name: String::new(),
            reason: e.to_string(),
        })?;

        let id = requested.object_id(descriptor);
        let api = descriptor.api(data.client.clone(), requested.namespace.as_deref());
        let object = get_object(&api, descriptor, &requested.name, &id).await?;

        let mut model = ResourceModel {
            metadata: Metadata::from_live_object(descriptor, &object, &id)?,
            ..ResourceModel::default()
        };
        model.refresh_from(descriptor, &object);
        model.to_document(descriptor)
    }
}

#[async_trait]
impl DataSource for CrdDataSource {
    fn type_name(&self) -> String {
        self.descriptor.type_name()
    }

    fn schema(&self) -> Schema {
        self.descriptor.data_source_schema()
    }

    async fn read(&self, request: DataSourceReadRequest) -> StateResponse {
        let diagnostics = self.validate_config(&request.config);
        if diagnostics.has_error() {
            return StateResponse {
                state: None,
                diagnostics,
            };
        }

        let Some(data) = self.data.as_ref() else {
            return StateResponse::from_diagnostics(Diagnostic::error(
                SUMMARY_CONFIGURE,
                format!(
                    "The provider has not been configured; cannot read {} objects.",
                    self.descriptor.kind()
                ),
            ));
        };

        match self.lookup(data, &request.config).await {
            Ok(state) => StateResponse {
                state: Some(state),
                diagnostics,
            },
            Err(e) => StateResponse::from_diagnostics(Diagnostics::from(&e)),
        }
    }
}
