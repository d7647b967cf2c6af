// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider configuration and the [`CrdProvider`].
//!
//! # Configuration
//!
//! | Field | Environment fallback | Default |
//! |-------|----------------------|---------|
//! | `kubeconfig` | `KUBECONFIG` | in-cluster or `~/.kube/config` |
//! | `context` | `CRDFORM_CONTEXT` | current context |
//! | `field_manager` | `CRDFORM_FIELD_MANAGER` | `crdform` |
//! | `wait_timeout` | | 300 seconds |
//! | `delete_timeout` | | 120 seconds |
//! | `poll_interval` | | 2 seconds |
//! | `crd_dirs` | `CRDFORM_CRD_DIRS` (path list) | none |

use crate::constants::{
    DEFAULT_FIELD_MANAGER, ENV_CONTEXT, ENV_CRD_DIRS, ENV_FIELD_MANAGER, ENV_KUBECONFIG,
    PROVIDER_TYPE_NAME,
};
use crate::data_source::CrdDataSource;
use crate::diagnostics::Diagnostics;
use crate::errors::{ProviderError, Result};
use crate::framework::{DataSource, Provider, Resource};
use crate::manifest::CrdManifest;
use crate::registry::Registry;
use crate::resource::CrdResource;
use crate::wait::WaitSettings;
use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Provider configuration document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Path to a kubeconfig file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Default field manager for server-side apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_manager: Option<String>,

    /// Seconds to wait for `wait_for` conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_timeout: Option<u64>,

    /// Seconds to wait for a deleted object to disappear
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_timeout: Option<u64>,

    /// Seconds between polls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,

    /// Directories of CRD YAML files to expose in addition to the built-in types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crd_dirs: Vec<PathBuf>,
}

impl ProviderConfig {
    /// Parse a provider config document; `null` yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] for unknown fields or wrong types.
    pub fn from_document(document: &Value) -> Result<Self> {
        if document.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(document.clone())
            .map_err(|e| ProviderError::Configuration(e.to_string()))
    }

    /// Fill unset fields from the process environment.
    #[must_use]
    pub fn with_env_fallbacks(self) -> Self {
        self.with_fallbacks(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Fill unset fields from `lookup`.
    #[must_use]
    pub fn with_fallbacks(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.kubeconfig.is_none() {
            // KUBECONFIG may list several files; the first one is read
            self.kubeconfig = lookup(ENV_KUBECONFIG)
                .and_then(|paths| std::env::split_paths(&paths).next());
        }
        if self.context.is_none() {
            self.context = lookup(ENV_CONTEXT);
        }
        if self.field_manager.is_none() {
            self.field_manager = lookup(ENV_FIELD_MANAGER);
        }
        if self.crd_dirs.is_empty() {
            if let Some(dirs) = lookup(ENV_CRD_DIRS) {
                self.crd_dirs = std::env::split_paths(&dirs).collect();
            }
        }
        self
    }

    /// Field manager used when a resource does not set one.
    #[must_use]
    pub fn field_manager(&self) -> &str {
        self.field_manager.as_deref().unwrap_or(DEFAULT_FIELD_MANAGER)
    }

    #[must_use]
    pub fn wait_settings(&self) -> WaitSettings {
        let defaults = WaitSettings::default();
        WaitSettings {
            wait_timeout: self
                .wait_timeout
                .map_or(defaults.wait_timeout, Duration::from_secs),
            delete_timeout: self
                .delete_timeout
                .map_or(defaults.delete_timeout, Duration::from_secs),
            poll_interval: self
                .poll_interval
                .map_or(defaults.poll_interval, Duration::from_secs),
        }
    }
}

/// Build a Kubernetes client from the kubeconfig and context, or infer one.
///
/// # Errors
///
/// Returns [`ProviderError::Configuration`] if no usable configuration is found.
pub async fn build_client(config: &ProviderConfig) -> Result<Client> {
    let options = KubeConfigOptions {
        context: config.context.clone(),
        ..KubeConfigOptions::default()
    };

    let kube_config = match &config.kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                ProviderError::Configuration(format!(
                    "failed to read kubeconfig {}: {e}",
                    path.display()
                ))
            })?;
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| {
                    ProviderError::Configuration(format!("failed to load kubeconfig: {e}"))
                })?
        }
        None if config.context.is_some() => Config::from_kubeconfig(&options)
            .await
            .map_err(|e| ProviderError::Configuration(format!("failed to load kubeconfig: {e}")))?,
        None => Config::infer().await.map_err(|e| {
            ProviderError::Configuration(format!("failed to infer cluster configuration: {e}"))
        })?,
    };

    Client::try_from(kube_config)
        .map_err(|e| ProviderError::Configuration(format!("failed to create client: {e}")))
}

/// What every resource and data source needs once the provider is configured.
#[derive(Clone)]
pub struct ProviderData {
    pub client: Client,
    pub field_manager: String,
    pub wait: WaitSettings,
}

impl ProviderData {
    #[must_use]
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            field_manager: config.field_manager().to_string(),
            wait: config.wait_settings(),
        }
    }
}

/// Provider serving one resource, one manifest and one lookup data source per CRD.
pub struct CrdProvider {
    /// Types known before `configure` adds `crd_dirs`
    base: Registry,
    registry: Registry,
    data: Option<ProviderData>,
}

impl CrdProvider {
    /// Unconfigured provider over a registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            base: registry.clone(),
            registry,
            data: None,
        }
    }

    /// Provider that is already connected, bypassing [`Provider::configure`].
    #[must_use]
    pub fn with_data(registry: Registry, data: ProviderData) -> Self {
        Self {
            base: registry.clone(),
            registry,
            data: Some(data),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.data.is_some()
    }
}

#[async_trait]
impl Provider for CrdProvider {
    fn type_name(&self) -> &'static str {
        PROVIDER_TYPE_NAME
    }

    async fn configure(&mut self, config: &Value) -> Diagnostics {
        let config = match ProviderConfig::from_document(config) {
            Ok(config) => config.with_env_fallbacks(),
            Err(e) => return Diagnostics::from(&e),
        };

        // Reconfiguring starts over from the base types
        let mut registry = self.base.clone();
        for dir in &config.crd_dirs {
            match registry.with_crd_dir(dir) {
                Ok(loaded) => registry = loaded,
                Err(e) => return Diagnostics::from(&e),
            }
        }
        self.registry = registry;

        match build_client(&config).await {
            Ok(client) => {
                info!(
                    "Provider configured with {} CRD types (field manager: {})",
                    self.registry.len(),
                    config.field_manager()
                );
                self.data = Some(ProviderData::new(client, &config));
                Diagnostics::new()
            }
            Err(e) => Diagnostics::from(&e),
        }
    }

    fn resources(&self) -> Vec<Arc<dyn Resource>> {
        self.registry
            .descriptors()
            .map(|descriptor| {
                Arc::new(CrdResource::new(descriptor.clone(), self.data.clone()))
                    as Arc<dyn Resource>
            })
            .collect()
    }

    fn data_sources(&self) -> Vec<Arc<dyn DataSource>> {
        self.registry
            .descriptors()
            .flat_map(|descriptor| {
                [
                    Arc::new(CrdDataSource::new(descriptor.clone(), self.data.clone()))
                        as Arc<dyn DataSource>,
                    Arc::new(CrdManifest::new(descriptor.clone())) as Arc<dyn DataSource>,
                ]
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
