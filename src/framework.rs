// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider framework seam.
//!
//! A host (the `crdform` CLI, or any other driver) talks to the provider only through
//! these traits. Requests carry plan, state or config documents in provider attribute
//! names; responses carry the new state and the diagnostics of the operation.
//! Operations never return `Err`.

use crate::diagnostics::Diagnostics;
use crate::schema::validate::validate;
use crate::schema::{AttributePath, Schema};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Create a new object from a plan.
#[derive(Clone, Debug)]
pub struct CreateRequest {
    pub plan: Value,
}

/// Refresh the state from the cluster.
#[derive(Clone, Debug)]
pub struct ReadRequest {
    pub state: Value,
}

/// Apply a plan over existing state.
#[derive(Clone, Debug)]
pub struct UpdateRequest {
    pub plan: Value,
    pub state: Value,
}

/// Delete the object recorded in state.
#[derive(Clone, Debug)]
pub struct DeleteRequest {
    pub state: Value,
}

/// Adopt an existing object by identifier.
#[derive(Clone, Debug)]
pub struct ImportStateRequest {
    pub id: String,
}

/// Read a data source from its config.
#[derive(Clone, Debug)]
pub struct DataSourceReadRequest {
    pub config: Value,
}

/// Outcome of an operation that produces state.
///
/// `state` is `None` when the object no longer exists (or was never created) and
/// should be removed from state.
#[derive(Clone, Debug, Default)]
pub struct StateResponse {
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl StateResponse {
    #[must_use]
    pub fn with_state(state: Value) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    #[must_use]
    pub fn from_diagnostics(diagnostics: impl Into<Diagnostics>) -> Self {
        Self {
            state: None,
            diagnostics: diagnostics.into(),
        }
    }
}

/// A managed resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> String;

    fn schema(&self) -> Schema;

    /// Check a user-written config document.
    fn validate_config(&self, config: &Value) -> Diagnostics {
        validate(config, &self.schema().attributes)
    }

    /// Attributes whose change forces the object to be recreated.
    fn requires_replace(&self, plan: &Value, state: &Value) -> Vec<AttributePath> {
        self.schema().replacement_paths(plan, state)
    }

    async fn create(&self, request: CreateRequest) -> StateResponse;

    async fn read(&self, request: ReadRequest) -> StateResponse;

    async fn update(&self, request: UpdateRequest) -> StateResponse;

    async fn delete(&self, request: DeleteRequest) -> Diagnostics;

    async fn import_state(&self, request: ImportStateRequest) -> StateResponse;
}

/// A read-only data source type.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> String;

    fn schema(&self) -> Schema;

    fn validate_config(&self, config: &Value) -> Diagnostics {
        validate(config, &self.schema().attributes)
    }

    async fn read(&self, request: DataSourceReadRequest) -> StateResponse;
}

/// The provider: configuration plus the resource and data source types it serves.
#[async_trait]
pub trait Provider: Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Configure the provider from its config document.
    async fn configure(&mut self, config: &Value) -> Diagnostics;

    fn resources(&self) -> Vec<Arc<dyn Resource>>;

    fn data_sources(&self) -> Vec<Arc<dyn DataSource>>;

    /// Resource by type name.
    fn resource(&self, type_name: &str) -> Option<Arc<dyn Resource>> {
        self.resources()
            .into_iter()
            .find(|r| r.type_name() == type_name)
    }

    /// Data source (lookup or manifest) by type name.
    fn data_source(&self, type_name: &str) -> Option<Arc<dyn DataSource>> {
        self.data_sources()
            .into_iter()
            .find(|d| d.type_name() == type_name)
    }
}
