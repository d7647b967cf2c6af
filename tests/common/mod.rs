// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use crdform::framework::{DataSource, Provider, Resource};
use crdform::provider::{CrdProvider, ProviderData};
use crdform::registry::Registry;
use crdform::wait::WaitSettings;
use kube::client::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const POD_CHAOS_TYPE: &str = "k8s_chaos_mesh_org_pod_chaos_v1alpha1";
pub const NAMESPACE: &str = "chaos-testing";
pub const NAME: &str = "kill-one";
pub const OBJECT_PATH: &str = "/apis/chaos-mesh.org/v1alpha1/namespaces/chaos-testing/podchaos/kill-one";

/// Provider connected to the mock API server, with short timeouts.
pub async fn connected_provider(server: &MockServer) -> CrdProvider {
    let config = kube::Config::new(server.uri().parse().expect("mock server URI"));
    let client = Client::try_from(config).expect("client for mock server");
    let data = ProviderData {
        client,
        field_manager: "crdform".to_string(),
        wait: WaitSettings {
            wait_timeout: Duration::from_millis(500),
            delete_timeout: Duration::from_millis(500),
            poll_interval: Duration::from_millis(20),
        },
    };
    CrdProvider::with_data(Registry::builtin().expect("built-in CRDs"), data)
}

pub async fn pod_chaos_resource(server: &MockServer) -> Arc<dyn Resource> {
    connected_provider(server)
        .await
        .resource(POD_CHAOS_TYPE)
        .expect("PodChaos resource")
}

pub async fn pod_chaos_data_source(server: &MockServer) -> Arc<dyn DataSource> {
    connected_provider(server)
        .await
        .data_source(POD_CHAOS_TYPE)
        .expect("PodChaos data source")
}

/// Plan document for a PodChaos resource.
pub fn pod_chaos_plan() -> Value {
    json!({
        "metadata": {
            "name": NAME,
            "namespace": NAMESPACE,
            "labels": {"team": "sre"}
        },
        "spec": {
            "action": "pod-kill",
            "mode": "one",
            "grace_period": 5,
            "selector": {"namespaces": ["web"]}
        }
    })
}

/// PodChaos object as stored by the API server.
pub fn pod_chaos_object(phase: &str) -> Value {
    json!({
        "apiVersion": "chaos-mesh.org/v1alpha1",
        "kind": "PodChaos",
        "metadata": {
            "name": NAME,
            "namespace": NAMESPACE,
            "uid": "2f0c2e5a-7f4e-4c61-9d1b-6f3f0b3a9a11",
            "resourceVersion": "4711",
            "labels": {"team": "sre"},
            "managedFields": [{"manager": "crdform", "operation": "Apply"}]
        },
        "spec": {
            "action": "pod-kill",
            "mode": "one",
            "gracePeriod": 5,
            "selector": {"namespaces": ["web"]}
        },
        "status": {"experiment": {"desiredPhase": phase}}
    })
}

/// `metav1.Status` failure body.
pub fn status(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}

pub fn not_found() -> Value {
    status(
        404,
        "NotFound",
        "podchaos.chaos-mesh.org \"kill-one\" not found",
    )
}
