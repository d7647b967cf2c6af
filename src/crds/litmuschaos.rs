// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! LitmusChaos custom resources (`litmuschaos.io`).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Desired state of a chaos engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Active,
    Stop,
}

/// What happens to experiment jobs once they finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CleanUpPolicy {
    Delete,
    Retain,
}

/// Application under test.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationParams {
    /// Namespace of the application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appns: Option<String>,

    /// Label selector of the application, e.g. `app=nginx`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applabel: Option<String>,

    /// Workload kind, e.g. `deployment`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appkind: Option<String>,
}

/// An environment variable passed to an experiment.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExperimentEnv {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A ConfigMap or Secret mounted into the experiment pod.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSource {
    pub name: String,
    pub mount_path: String,
}

/// Overrides applied to the experiment pod.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<ExperimentEnv>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_maps: Option<Vec<VolumeSource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<VolumeSource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_annotations: Option<BTreeMap<String, String>>,
}

/// Per-experiment settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExperimentAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ExperimentComponents>,
}

/// An experiment run by the engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExperimentList {
    /// Name of a `ChaosExperiment` in the engine's namespace
    #[schemars(length(min = 1))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ExperimentAttributes>,
}

/// `ChaosEngine` binds an application to a set of chaos experiments.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "litmuschaos.io",
    version = "v1alpha1",
    kind = "ChaosEngine",
    plural = "chaosengines",
    namespaced,
    doc = "ChaosEngine is the Schema for the chaosengines API: it links an application to the chaos experiments run against it."
)]
#[serde(rename_all = "camelCase")]
pub struct ChaosEngineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appinfo: Option<ApplicationParams>,

    /// Whether the application must carry the `litmuschaos.io/chaos` annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(regex(pattern = r"^(true|false)$"))]
    pub annotation_check: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_state: Option<EngineState>,

    /// Service account the experiment jobs run as.
    pub chaos_service_account: String,

    /// Experiments to run, in order.
    #[schemars(length(min = 1))]
    pub experiments: Vec<ExperimentList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_clean_up_policy: Option<CleanUpPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub termination_grace_period_seconds: Option<i64>,
}
