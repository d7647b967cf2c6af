// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for provider operations.
//!
//! Every failure inside a resource or data source operation is represented by a
//! [`ProviderError`] first and converted into a [`crate::diagnostics::Diagnostic`]
//! at the operation boundary. Nothing is retried locally.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

/// Kubernetes API verb an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Server-side apply
    Patch,
    /// Read of a single object
    Get,
    /// Deletion of a single object
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch => f.write_str("PATCH"),
            Self::Get => f.write_str("GET"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// Errors that can occur while serving a resource, manifest, or data source operation.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The model could not be turned into a Kubernetes JSON payload
    #[error("Failed to marshal {kind} '{name}': {reason}")]
    Marshal {
        /// Kind of the object being marshalled
        kind: String,
        /// Object name, or an empty string when unknown
        name: String,
        /// Underlying serializer error
        reason: String,
    },

    /// The Kubernetes API rejected a request or could not be reached
    #[error("{verb} {kind} '{name}' failed: {message}")]
    Api {
        /// The API verb that failed
        verb: Verb,
        /// Kind of the target object
        kind: String,
        /// `namespace/name` or `name` of the target object
        name: String,
        /// HTTP status code when the API server answered
        code: Option<u16>,
        /// Message from the API server or the transport
        message: String,
    },

    /// The API server response could not be read back into the model
    #[error("Failed to unmarshal {kind} '{name}': {reason}")]
    Unmarshal {
        /// Kind of the object being read
        kind: String,
        /// Object name
        name: String,
        /// Underlying deserializer error
        reason: String,
    },

    /// An import identifier did not have the expected shape
    #[error("Invalid import identifier '{id}': expected {expected}")]
    InvalidImportId {
        /// The identifier given by the user
        id: String,
        /// Human-readable description of the accepted format
        expected: &'static str,
    },

    /// A `wait_for` condition or a deletion did not complete in time
    #[error("Timed out after {timeout_secs}s waiting for {kind} '{name}': {condition}")]
    WaitTimeout {
        /// Kind of the object being waited on
        kind: String,
        /// Object name
        name: String,
        /// Description of the unmet condition
        condition: String,
        /// Configured timeout in seconds
        timeout_secs: u64,
    },

    /// A `wait_for` JSONPath expression could not be evaluated
    #[error("Invalid JSONPath expression '{expression}': {reason}")]
    InvalidJsonPath {
        /// The offending expression
        expression: String,
        /// Parser error
        reason: String,
    },

    /// A CRD document could not be read or converted into a descriptor
    #[error("Failed to load CRD from {source_name}: {reason}")]
    CrdLoad {
        /// File name or other origin of the document
        source_name: String,
        /// What went wrong
        reason: String,
    },

    /// Two descriptors produced the same type name
    #[error("Duplicate type name '{0}'")]
    DuplicateType(String),

    /// Provider configuration or client construction failed
    #[error("Provider configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Build an [`ProviderError::Api`] from a kube client error.
    #[must_use]
    pub fn api(verb: Verb, kind: &str, name: &str, err: &kube::Error) -> Self {
        let (code, message) = match err {
            kube::Error::Api(response) => (Some(response.code), response.message.clone()),
            other => (None, other.to_string()),
        };
        Self::Api {
            verb,
            kind: kind.to_string(),
            name: name.to_string(),
            code,
            message,
        }
    }

    /// HTTP status code of an API error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }

    /// Returns true when the API server answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Returns true when server-side apply reported a field ownership conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
