// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # crdform - Kubernetes CRDs as declarative provider resources
//!
//! crdform exposes Kubernetes Custom Resource Definitions as declarative resources
//! and data sources. Every CRD version becomes:
//!
//! - a **resource** (`k8s_<group>_<kind>_<version>`) managed with server-side apply,
//!   GET and DELETE through the dynamic client
//! - a **lookup data source** with the same name, reading an existing object
//! - a **manifest data source** (`..._manifest`) rendering the object as YAML
//!
//! ## Modules
//!
//! - [`schema`] - Provider attribute schemas, OpenAPI conversion, validation
//! - [`descriptor`] - Runtime description of one CRD version
//! - [`crds`] - Typed custom resources compiled into the provider
//! - [`registry`] - Type name → descriptor lookups
//! - [`model`] - Plan/state documents and Kubernetes payloads
//! - [`resource`], [`data_source`], [`manifest`] - Operation implementations
//! - [`framework`] - Traits a host drives the provider through
//! - [`provider`] - Configuration and client construction
//! - [`wait`] - `wait_for` and deletion polling
//!
//! ## Example
//!
//! ```rust,no_run
//! use crdform::framework::{CreateRequest, Provider};
//! use crdform::provider::CrdProvider;
//! use crdform::registry::Registry;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut provider = CrdProvider::new(Registry::builtin()?);
//! let diagnostics = provider.configure(&json!({"context": "kind-dev"})).await;
//! assert!(!diagnostics.has_error());
//!
//! let resource = provider
//!     .resource("k8s_chaos_mesh_org_pod_chaos_v1alpha1")
//!     .expect("built-in type");
//! let response = resource
//!     .create(CreateRequest {
//!         plan: json!({
//!             "metadata": {"name": "kill-one", "namespace": "chaos-testing"},
//!             "spec": {
//!                 "action": "pod-kill",
//!                 "mode": "one",
//!                 "selector": {"namespaces": ["web"]}
//!             }
//!         }),
//!     })
//!     .await;
//! println!("{:?}", response.state);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod constants;
pub mod crds;
pub mod data_source;
pub mod descriptor;
pub mod diagnostics;
pub mod docs;
pub mod errors;
pub mod framework;
pub mod import;
pub mod manifest;
pub mod model;
pub mod provider;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod wait;
