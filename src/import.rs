// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Import identifier parsing.

use crate::constants::IMPORT_ID_SEPARATOR;
use crate::errors::{ProviderError, Result};

const NAMESPACED_FORMAT: &str = "'<namespace>/<name>'";
const CLUSTER_FORMAT: &str = "'<name>'";

/// Namespace and name of the object to import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportId {
    pub namespace: Option<String>,
    pub name: String,
}

/// Parse an import identifier.
///
/// Namespaced CRDs take `namespace/name`, split into exactly two non-empty parts.
/// Cluster-scoped CRDs take a bare, non-empty `name` without `/`.
///
/// ```
/// use crdform::import::parse_import_id;
///
/// let id = parse_import_id("chaos-testing/kill-web", true).unwrap();
/// assert_eq!(id.namespace.as_deref(), Some("chaos-testing"));
/// assert_eq!(id.name, "kill-web");
///
/// assert!(parse_import_id("kill-web", true).is_err());
/// ```
///
/// # Errors
///
/// Returns [`ProviderError::InvalidImportId`] naming the accepted format.
pub fn parse_import_id(id: &str, namespaced: bool) -> Result<ImportId> {
    if namespaced {
        let mut parts = id.split(IMPORT_ID_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), None) if !namespace.is_empty() && !name.is_empty() => {
                Ok(ImportId {
                    namespace: Some(namespace.to_string()),
                    name: name.to_string(),
                })
            }
            _ => Err(ProviderError::InvalidImportId {
                id: id.to_string(),
                expected: NAMESPACED_FORMAT,
            }),
        }
    } else if id.is_empty() || id.contains(IMPORT_ID_SEPARATOR) {
        Err(ProviderError::InvalidImportId {
            id: id.to_string(),
            expected: CLUSTER_FORMAT,
        })
    } else {
        Ok(ImportId {
            namespace: None,
            name: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_id() {
        assert_eq!(
            parse_import_id("litmus/nginx-chaos", true).unwrap(),
            ImportId {
                namespace: Some("litmus".to_string()),
                name: "nginx-chaos".to_string()
            }
        );
    }

    #[test]
    fn test_namespaced_id_rejects_bad_shapes() {
        for id in ["", "name", "/name", "ns/", "a/b/c", "/"] {
            let err = parse_import_id(id, true).unwrap_err();
            assert!(
                err.to_string().contains("'<namespace>/<name>'"),
                "unexpected error for {id:?}: {err}"
            );
        }
    }

    #[test]
    fn test_cluster_scoped_id() {
        assert_eq!(
            parse_import_id("letsencrypt", false).unwrap(),
            ImportId {
                namespace: None,
                name: "letsencrypt".to_string()
            }
        );
        assert!(parse_import_id("", false).is_err());
        assert!(parse_import_id("ns/name", false).is_err());
    }
}
