// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Diagnostics returned by provider operations.
//!
//! Operations never fail with an error value: every problem is reported as a
//! [`Diagnostic`] with a fixed, human-readable summary describing which step failed
//! and the underlying error text as detail.
//!
//! # Usage
//!
//! ```rust
//! use crdform::diagnostics::{Diagnostic, SUMMARY_GET};
//! use crdform::errors::{ProviderError, Verb};
//!
//! let error = ProviderError::Api {
//!     verb: Verb::Get,
//!     kind: "PodChaos".to_string(),
//!     name: "default/kill-one".to_string(),
//!     code: Some(500),
//!     message: "etcdserver: request timed out".to_string(),
//! };
//!
//! let diagnostic = Diagnostic::from_error(&error);
//! assert_eq!(diagnostic.summary, SUMMARY_GET);
//! assert!(diagnostic.detail.contains("etcdserver"));
//! ```

use crate::constants::ATTR_FORCE_CONFLICTS;
use crate::errors::{ProviderError, Verb};
use crate::schema::AttributePath;
use serde::Serialize;
use std::fmt;

// ============================================================================
// Summaries
// ============================================================================

/// The model could not be serialized into a Kubernetes payload
pub const SUMMARY_MARSHAL: &str = "Unable to marshal resource";

/// Server-side apply failed
pub const SUMMARY_PATCH: &str = "Error sending PATCH request";

/// Server-side apply failed because another field manager owns a field
pub const SUMMARY_CONFLICT: &str = "Conflict during server-side apply";

/// Reading the object failed
pub const SUMMARY_GET: &str = "Unable to GET resource";

/// Deleting the object failed
pub const SUMMARY_DELETE: &str = "Unable to DELETE resource";

/// The API response could not be read back into the model
pub const SUMMARY_UNMARSHAL: &str = "Unable to unmarshal resource";

/// The import identifier was malformed
pub const SUMMARY_IMPORT: &str = "Error importing resource";

/// A `wait_for` condition or a deletion did not complete in time
pub const SUMMARY_WAIT: &str = "Wait for condition timed out";

/// A `wait_for` condition could not be evaluated
pub const SUMMARY_WAIT_INVALID: &str = "Invalid wait_for condition";

/// A planned change touches an attribute that cannot be updated in place
pub const SUMMARY_REPLACE: &str = "Resource requires replacement";

/// Provider configuration failed
pub const SUMMARY_CONFIGURE: &str = "Unable to configure provider";

/// CRD documents could not be loaded
pub const SUMMARY_CRD_LOAD: &str = "Unable to load custom resource definitions";

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("Error"),
            Self::Warning => f.write_str("Warning"),
        }
    }
}

/// A single problem reported by an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Attribute the diagnostic refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<AttributePath>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn at(mut self, path: AttributePath) -> Self {
        self.path = Some(path);
        self
    }

    /// Map a provider error onto its fixed summary and detail.
    ///
    /// | Error | Summary |
    /// |-------|---------|
    /// | `Marshal` | `Unable to marshal resource` |
    /// | `Api` PATCH 409 | `Conflict during server-side apply` |
    /// | `Api` PATCH | `Error sending PATCH request` |
    /// | `Api` GET | `Unable to GET resource` |
    /// | `Api` DELETE | `Unable to DELETE resource` |
    /// | `Unmarshal` | `Unable to unmarshal resource` |
    /// | `InvalidImportId` | `Error importing resource` |
    /// | `WaitTimeout` | `Wait for condition timed out` |
    /// | `InvalidJsonPath` | `Invalid wait_for condition` |
    /// | `CrdLoad`, `DuplicateType` | `Unable to load custom resource definitions` |
    /// | `Configuration` | `Unable to configure provider` |
    #[must_use]
    pub fn from_error(error: &ProviderError) -> Self {
        match error {
            ProviderError::Marshal { kind, name, reason } => Self::error(
                SUMMARY_MARSHAL,
                format!("Kind: {kind}, Name: {name}, Error: {reason}"),
            ),
            ProviderError::Api {
                verb: Verb::Patch,
                kind,
                name,
                message,
                ..
            } if error.is_conflict() => Self::error(
                SUMMARY_CONFLICT,
                format!(
                    "Kind: {kind}, Name: {name}, Error: {message}. Set {ATTR_FORCE_CONFLICTS} = true to take ownership of the conflicting fields."
                ),
            ),
            ProviderError::Api {
                verb,
                kind,
                name,
                code,
                message,
            } => {
                let summary = match verb {
                    Verb::Patch => SUMMARY_PATCH,
                    Verb::Get => SUMMARY_GET,
                    Verb::Delete => SUMMARY_DELETE,
                };
                let status = code.map(|c| format!(" (HTTP {c})")).unwrap_or_default();
                Self::error(
                    summary,
                    format!("Kind: {kind}, Name: {name}, Error: {message}{status}"),
                )
            }
            ProviderError::Unmarshal { kind, name, reason } => Self::error(
                SUMMARY_UNMARSHAL,
                format!("Kind: {kind}, Name: {name}, Error: {reason}"),
            ),
            ProviderError::InvalidImportId { .. } => Self::error(SUMMARY_IMPORT, error.to_string()),
            ProviderError::WaitTimeout { .. } => Self::error(SUMMARY_WAIT, error.to_string()),
            ProviderError::InvalidJsonPath { .. } => {
                Self::error(SUMMARY_WAIT_INVALID, error.to_string())
            }
            ProviderError::CrdLoad { .. } | ProviderError::DuplicateType(_) => {
                Self::error(SUMMARY_CRD_LOAD, error.to_string())
            }
            ProviderError::Configuration(_) => Self::error(SUMMARY_CONFIGURE, error.to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        if let Some(path) = self.path.as_ref().filter(|p| !p.is_root()) {
            write!(f, "\n  with {path}")?;
        }
        if !self.detail.is_empty() {
            write!(f, "\n  {}", self.detail)?;
        }
        Ok(())
    }
}

impl From<&ProviderError> for Diagnostic {
    fn from(error: &ProviderError) -> Self {
        Self::from_error(error)
    }
}

/// Ordered collection of diagnostics produced by one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    pub fn add_attribute_error(
        &mut self,
        path: AttributePath,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(Diagnostic::error(summary, detail).at(path));
    }

    pub fn add_attribute_warning(
        &mut self,
        path: AttributePath,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(Diagnostic::warning(summary, detail).at(path));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Only the error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl From<&ProviderError> for Diagnostics {
    fn from(error: &ProviderError) -> Self {
        Self(vec![Diagnostic::from_error(error)])
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod diagnostics_tests;
