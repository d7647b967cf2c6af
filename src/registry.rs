// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Registry of every CRD the provider exposes.
//!
//! The registry maps resource type names to descriptors. Each descriptor backs three
//! types: the resource (`k8s_..._v1`), its manifest data source (`..._manifest`) and
//! the lookup data source (same name as the resource).

use crate::crds::builtin_descriptors;
use crate::descriptor::{load_crd_dir, load_crd_documents, CrdDescriptor};
use crate::errors::{ProviderError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Type name → descriptor, ordered by type name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: BTreeMap<String, Arc<CrdDescriptor>>,
}

impl Registry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the typed custom resources compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if a typed CRD cannot be described.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in builtin_descriptors()? {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Add every CRD found in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be loaded or a type name is already
    /// registered.
    pub fn with_crd_dir(mut self, dir: &Path) -> Result<Self> {
        for descriptor in load_crd_dir(dir)? {
            self.register(descriptor)?;
        }
        Ok(self)
    }

    /// Add every CRD in a (multi-document) YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the documents cannot be parsed or a type name is already
    /// registered.
    pub fn register_crd_documents(&mut self, source_name: &str, text: &str) -> Result<usize> {
        let descriptors = load_crd_documents(source_name, text)?;
        let count = descriptors.len();
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(count)
    }

    /// Add one descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::DuplicateType`] when the type name is taken.
    pub fn register(&mut self, descriptor: CrdDescriptor) -> Result<()> {
        let type_name = descriptor.type_name();
        if self.descriptors.contains_key(&type_name) {
            return Err(ProviderError::DuplicateType(type_name));
        }
        debug!(type_name = %type_name, kind = descriptor.kind(), "Registered CRD");
        self.descriptors.insert(type_name, Arc::new(descriptor));
        Ok(())
    }

    /// Descriptor behind a resource or lookup data source type name.
    #[must_use]
    pub fn resource(&self, type_name: &str) -> Option<Arc<CrdDescriptor>> {
        self.descriptors.get(type_name).cloned()
    }

    /// Descriptor behind a manifest data source type name.
    #[must_use]
    pub fn manifest(&self, type_name: &str) -> Option<Arc<CrdDescriptor>> {
        self.descriptors
            .values()
            .find(|d| d.manifest_type_name() == type_name)
            .cloned()
    }

    /// Descriptor behind a lookup data source type name.
    #[must_use]
    pub fn data_source(&self, type_name: &str) -> Option<Arc<CrdDescriptor>> {
        self.resource(type_name)
    }

    /// Registered resource type names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<CrdDescriptor>> {
        self.descriptors.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
