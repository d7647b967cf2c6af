// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Typed custom resources compiled into the provider.
//!
//! Each struct derives `kube::CustomResource` and `schemars::JsonSchema`; the
//! generated CRD is turned into a [`CrdDescriptor`] at startup. CRDs that are not
//! compiled in are loaded from YAML (see [`crate::descriptor::load_crd_dir`]).
//!
//! - [`chaos_mesh::PodChaos`] - `chaos-mesh.org/v1alpha1`
//! - [`litmuschaos::ChaosEngine`] - `litmuschaos.io/v1alpha1`
//! - [`airflow::AirflowBase`] - `airflow.apache.org/v1alpha1`

pub mod airflow;
pub mod chaos_mesh;
pub mod litmuschaos;

use crate::descriptor::CrdDescriptor;
use crate::errors::Result;

/// Descriptors of every typed custom resource.
///
/// # Errors
///
/// Returns an error if a generated CRD carries no schema for its version.
pub fn builtin_descriptors() -> Result<Vec<CrdDescriptor>> {
    Ok(vec![
        CrdDescriptor::from_custom_resource::<airflow::AirflowBase>()?,
        CrdDescriptor::from_custom_resource::<chaos_mesh::PodChaos>()?,
        CrdDescriptor::from_custom_resource::<litmuschaos::ChaosEngine>()?,
    ])
}
