// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the crdform provider.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Provider Constants
// ============================================================================

/// Provider type name; every resource and data source type starts with it
pub const PROVIDER_TYPE_NAME: &str = "k8s";

/// Suffix appended to a resource type name to form its manifest data source
pub const MANIFEST_SUFFIX: &str = "_manifest";

/// Field manager used for server-side apply when neither the resource nor the
/// provider configuration sets one
pub const DEFAULT_FIELD_MANAGER: &str = "crdform";

// ============================================================================
// Attribute Names
// ============================================================================

/// Computed identifier attribute (`namespace/name` or `name`)
pub const ATTR_ID: &str = "id";

/// Optional boolean forcing server-side apply conflicts
pub const ATTR_FORCE_CONFLICTS: &str = "force_conflicts";

/// Optional server-side apply field manager
pub const ATTR_FIELD_MANAGER: &str = "field_manager";

/// Optional list of JSONPath conditions to wait for after apply
pub const ATTR_WAIT_FOR: &str = "wait_for";

/// Computed `apiVersion` of the object
pub const ATTR_API_VERSION: &str = "api_version";

/// Computed `kind` of the object
pub const ATTR_KIND: &str = "kind";

/// Object metadata block
pub const ATTR_METADATA: &str = "metadata";

/// Computed YAML rendering of a manifest
pub const ATTR_YAML: &str = "yaml";

/// Top-level Kubernetes fields that never become content attributes
pub const RESERVED_TOP_LEVEL_FIELDS: [&str; 4] = ["apiVersion", "kind", "metadata", "status"];

// ============================================================================
// Import Constants
// ============================================================================

/// Separator between namespace and name in import identifiers
pub const IMPORT_ID_SEPARATOR: char = '/';

// ============================================================================
// Timing Constants
// ============================================================================

/// Default time to wait for `wait_for` conditions (5 minutes)
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;

/// Default time to wait for a deleted object to disappear (2 minutes)
pub const DEFAULT_DELETE_TIMEOUT_SECS: u64 = 120;

/// Default interval between GET requests while waiting (2 seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

// ============================================================================
// Environment Variables
// ============================================================================

/// Path to a kubeconfig file
pub const ENV_KUBECONFIG: &str = "KUBECONFIG";

/// Kubeconfig context override
pub const ENV_CONTEXT: &str = "CRDFORM_CONTEXT";

/// Provider-wide default field manager
pub const ENV_FIELD_MANAGER: &str = "CRDFORM_FIELD_MANAGER";

/// Colon-separated list of directories containing CRD documents
pub const ENV_CRD_DIRS: &str = "CRDFORM_CRD_DIRS";
