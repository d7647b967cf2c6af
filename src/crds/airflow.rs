// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Apache Airflow operator custom resources (`airflow.apache.org`).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MySQL instance deployed for the metadata database.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MySqlSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0, max = 1))]
    pub replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Use a MySQL operator instead of a StatefulSet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<bool>,

    /// Extra server options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
}

/// Postgres instance deployed for the metadata database.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostgresSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0, max = 1))]
    pub replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
}

/// Cloud SQL proxy in front of an external database.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqlProxySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// GCP project of the Cloud SQL instance
    pub project: String,

    /// GCP region of the Cloud SQL instance
    pub region: String,

    /// Cloud SQL instance name
    pub instance: String,

    /// Database type, `mysql` or `postgres`
    #[serde(rename = "type")]
    #[schemars(regex(pattern = r"^(mysql|postgres)$"))]
    pub db_type: String,
}

/// NFS server used to share DAG files.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NfsStoreSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Requested volume size, e.g. `10Gi`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<String>,
}

/// `AirflowBase` deploys the shared infrastructure of Airflow clusters.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "airflow.apache.org",
    version = "v1alpha1",
    kind = "AirflowBase",
    plural = "airflowbases",
    namespaced,
    doc = "AirflowBase represents the components required for an Airflow cluster: the metadata database and the DAG store."
)]
#[serde(rename_all = "camelCase")]
pub struct AirflowBaseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mysql: Option<MySqlSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlproxy: Option<SqlProxySpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs: Option<NfsStoreSpec>,

    /// Node labels the components are scheduled on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// Labels added to every generated object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Annotations added to every generated object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}
