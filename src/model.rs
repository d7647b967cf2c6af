// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Typed views over plan, state and config documents.
//!
//! Documents use provider attribute names. The wrapper fields (`id`,
//! `force_conflicts`, `field_manager`, `wait_for`, `api_version`, `kind`,
//! `metadata`) are typed; everything else is CRD content kept as JSON and converted
//! with [`crate::schema::convert`].
//!
//! Models are built fresh for every operation and dropped when it returns.

use crate::descriptor::CrdDescriptor;
use crate::errors::{ProviderError, Result};
use crate::schema::convert::{from_kubernetes, to_kubernetes};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The `metadata` block of a resource, manifest or data source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Metadata {
    /// Kubernetes `metadata` JSON. The namespace is dropped for cluster-scoped CRDs.
    #[must_use]
    pub fn to_kubernetes(&self, namespaced: bool) -> Value {
        let mut meta = Map::new();
        meta.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(namespace) = self.namespace.as_ref().filter(|_| namespaced) {
            meta.insert("namespace".to_string(), Value::String(namespace.clone()));
        }
        if let Some(labels) = &self.labels {
            meta.insert("labels".to_string(), string_map(labels));
        }
        if let Some(annotations) = &self.annotations {
            meta.insert("annotations".to_string(), string_map(annotations));
        }
        Value::Object(meta)
    }

    /// Metadata of a live object.
    #[must_use]
    pub fn from_object_meta(meta: &ObjectMeta, namespaced: bool) -> Self {
        Self {
            name: meta.name.clone().unwrap_or_default(),
            namespace: meta.namespace.clone().filter(|_| namespaced),
            labels: meta.labels.clone().filter(|l| !l.is_empty()),
            annotations: meta.annotations.clone().filter(|a| !a.is_empty()),
        }
    }

    /// Metadata of a live object in its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unmarshal`] if `metadata` is not an `ObjectMeta`.
    pub fn from_live_object(descriptor: &CrdDescriptor, object: &Value, id: &str) -> Result<Self> {
        let metadata = object.get("metadata").cloned().unwrap_or(Value::Null);
        let meta: ObjectMeta =
            serde_json::from_value(metadata).map_err(|e| ProviderError::Unmarshal {
                kind: descriptor.kind().to_string(),
                name: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_object_meta(&meta, descriptor.namespaced))
    }

    /// `namespace/name` or `name`, as used in log lines and diagnostics.
    #[must_use]
    pub fn object_id(&self, descriptor: &CrdDescriptor) -> String {
        descriptor.object_id(self.namespace.as_deref(), &self.name)
    }
}

fn string_map(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

/// One `wait_for` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitCondition {
    /// JSONPath evaluated against the live object
    pub jsonpath: String,
    /// Expected string form of a selected value
    pub value: String,
}

/// Plan or state of a managed resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_conflicts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<Vec<WaitCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub metadata: Metadata,
    /// CRD content attributes (`spec`, ...), keyed by attribute name
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl ResourceModel {
    /// Parse a plan or state document.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Marshal`] if the document does not have the resource shape.
    pub fn from_document(descriptor: &CrdDescriptor, document: &Value) -> Result<Self> {
        serde_json::from_value(document.clone()).map_err(|e| ProviderError::Marshal {
            kind: descriptor.kind().to_string(),
            name: document_name(document),
            reason: e.to_string(),
        })
    }

    /// Serialize back into a state document.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Marshal`] if serialization fails.
    pub fn to_document(&self, descriptor: &CrdDescriptor) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ProviderError::Marshal {
            kind: descriptor.kind().to_string(),
            name: self.metadata.name.clone(),
            reason: e.to_string(),
        })
    }

    /// Server-side apply payload for this model.
    #[must_use]
    pub fn payload(&self, descriptor: &CrdDescriptor) -> Value {
        kubernetes_payload(descriptor, &self.metadata, &self.content)
    }

    /// Refresh the computed wrapper fields and the content from a live object.
    pub fn refresh_from(&mut self, descriptor: &CrdDescriptor, object: &Value) {
        self.id = Some(self.metadata.object_id(descriptor));
        self.api_version = Some(descriptor.api_version().to_string());
        self.kind = Some(descriptor.kind().to_string());
        self.content = content_from_kubernetes(descriptor, object);
    }
}

/// Config and state of a manifest data source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaml: Option<String>,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl ManifestModel {
    /// Parse a manifest config document.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Marshal`] if the document does not have the manifest shape.
    pub fn from_document(descriptor: &CrdDescriptor, document: &Value) -> Result<Self> {
        serde_json::from_value(document.clone()).map_err(|e| ProviderError::Marshal {
            kind: descriptor.kind().to_string(),
            name: document_name(document),
            reason: e.to_string(),
        })
    }

    /// Serialize into a state document.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Marshal`] if serialization fails.
    pub fn to_document(&self, descriptor: &CrdDescriptor) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ProviderError::Marshal {
            kind: descriptor.kind().to_string(),
            name: self.metadata.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Build the Kubernetes object for a model: `apiVersion` and `kind` from the
/// descriptor, `metadata`, and the content converted to JSON names.
#[must_use]
pub fn kubernetes_payload(
    descriptor: &CrdDescriptor,
    metadata: &Metadata,
    content: &Map<String, Value>,
) -> Value {
    let mut object = Map::new();
    object.insert(
        "apiVersion".to_string(),
        Value::String(descriptor.api_version().to_string()),
    );
    object.insert(
        "kind".to_string(),
        Value::String(descriptor.kind().to_string()),
    );
    object.insert(
        "metadata".to_string(),
        metadata.to_kubernetes(descriptor.namespaced),
    );
    if let Value::Object(content) =
        to_kubernetes(&Value::Object(content.clone()), &descriptor.content)
    {
        object.extend(content);
    }
    Value::Object(object)
}

/// Content attributes of a live Kubernetes object.
#[must_use]
pub fn content_from_kubernetes(descriptor: &CrdDescriptor, object: &Value) -> Map<String, Value> {
    match from_kubernetes(object, &descriptor.content) {
        Value::Object(content) => content,
        _ => Map::new(),
    }
}

fn document_name(document: &Value) -> String {
    document
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod model_tests;
