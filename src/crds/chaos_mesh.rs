// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Chaos Mesh custom resources (`chaos-mesh.org`).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fault injected into the selected pods: kill the pod, make it unavailable for the
/// duration, or kill the containers named in `containerNames`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PodChaosAction {
    PodKill,
    PodFailure,
    ContainerKill,
}

/// How many of the selected pods are affected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorMode {
    One,
    All,
    Fixed,
    FixedPercent,
    RandomMaxPercent,
}

/// A label selector requirement (`key`, `operator`, `values`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LabelSelectorRequirement {
    pub key: String,
    /// One of `In`, `NotIn`, `Exists`, `DoesNotExist`
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Selects the pods a chaos experiment targets.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodSelectorSpec {
    /// Namespaces to select pods from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,

    /// Node names the selected pods must run on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,

    /// Explicit pods, keyed by namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pods: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selectors: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_selectors: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selectors: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_selectors: Option<Vec<LabelSelectorRequirement>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_selectors: Option<BTreeMap<String, String>>,

    /// Pod phases to select, e.g. `Running`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_phase_selectors: Option<Vec<String>>,
}

/// `PodChaos` injects pod-level faults.
///
/// # Example
///
/// ```yaml
/// apiVersion: chaos-mesh.org/v1alpha1
/// kind: PodChaos
/// metadata:
///   name: kill-one-web-pod
///   namespace: chaos-testing
/// spec:
///   action: pod-kill
///   mode: one
///   selector:
///     namespaces: [web]
///     labelSelectors:
///       app: web
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "chaos-mesh.org",
    version = "v1alpha1",
    kind = "PodChaos",
    plural = "podchaos",
    namespaced,
    doc = "PodChaos is the control script for pod chaos: it kills pods, kills containers or makes pods fail for a duration."
)]
#[serde(rename_all = "camelCase")]
pub struct PodChaosSpec {
    /// Fault to inject.
    pub action: PodChaosAction,

    /// Which of the selected pods are affected.
    pub mode: SelectorMode,

    /// Number or percentage of pods, depending on `mode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Pods targeted by the experiment.
    pub selector: PodSelectorSpec,

    /// Containers to kill when `action` is `container-kill`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_names: Option<Vec<String>>,

    /// Grace period for `pod-kill`, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub grace_period: Option<i64>,

    /// How long the fault lasts, e.g. `30s` or `1h30m`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(regex(pattern = r"^(\d+(\.\d+)?(ns|us|ms|s|m|h))+$"))]
    pub duration: Option<String>,

    /// Cluster the experiment runs in, for multi-cluster installs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_cluster: Option<String>,
}
