// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Manifest data sources: render a CRD object as YAML without touching the cluster.

use crate::descriptor::CrdDescriptor;
use crate::diagnostics::Diagnostics;
use crate::errors::{ProviderError, Result};
use crate::framework::{DataSource, DataSourceReadRequest, StateResponse};
use crate::model::{kubernetes_payload, ManifestModel};
use crate::schema::Schema;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Data source type `k8s_<group>_<kind>_<version>_manifest`.
pub struct CrdManifest {
    descriptor: Arc<CrdDescriptor>,
}

impl CrdManifest {
    #[must_use]
    pub fn new(descriptor: Arc<CrdDescriptor>) -> Self {
        Self { descriptor }
    }

    /// Render a validated config into its state, including the `yaml` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Marshal`] when the config cannot be read or the
    /// object cannot be serialized to YAML.
    pub fn render(&self, config: &Value) -> Result<Value> {
        let descriptor = &self.descriptor;
        let mut model = ManifestModel::from_document(descriptor, config)?;
        let payload = kubernetes_payload(descriptor, &model.metadata, &model.content);

        let yaml = serde_yaml::to_string(&payload).map_err(|e| ProviderError::Marshal {
            kind: descriptor.kind().to_string(),
            name: model.metadata.name.clone(),
            reason: e.to_string(),
        })?;
        debug!(
            "Rendered {} manifest for {} ({} bytes)",
            descriptor.kind(),
            model.metadata.name,
            yaml.len()
        );

        model.id = Some(model.metadata.object_id(descriptor));
        model.yaml = Some(yaml);
        model.to_document(descriptor)
    }
}

#[async_trait]
impl DataSource for CrdManifest {
    fn type_name(&self) -> String {
        self.descriptor.manifest_type_name()
    }

    fn schema(&self) -> Schema {
        self.descriptor.manifest_schema()
    }

    async fn read(&self, request: DataSourceReadRequest) -> StateResponse {
        let diagnostics = self.validate_config(&request.config);
        if diagnostics.has_error() {
            return StateResponse {
                state: None,
                diagnostics,
            };
        }

        match self.render(&request.config) {
            Ok(state) => StateResponse {
                state: Some(state),
                diagnostics,
            },
            Err(e) => StateResponse::from_diagnostics(Diagnostics::from(&e)),
        }
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod manifest_tests;
