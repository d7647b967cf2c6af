// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `diagnostics.rs`

#[cfg(test)]
mod tests {
    use crate::diagnostics::*;
    use crate::errors::{ProviderError, Verb};
    use crate::schema::AttributePath;

    fn api_error(verb: Verb, code: Option<u16>) -> ProviderError {
        ProviderError::Api {
            verb,
            kind: "ChaosEngine".to_string(),
            name: "litmus/nginx-chaos".to_string(),
            code,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_verb_summaries() {
        assert_eq!(
            Diagnostic::from_error(&api_error(Verb::Patch, Some(422))).summary,
            SUMMARY_PATCH
        );
        assert_eq!(
            Diagnostic::from_error(&api_error(Verb::Get, Some(500))).summary,
            SUMMARY_GET
        );
        assert_eq!(
            Diagnostic::from_error(&api_error(Verb::Delete, None)).summary,
            SUMMARY_DELETE
        );
    }

    #[test]
    fn test_api_detail_contains_error_and_status() {
        let diagnostic = Diagnostic::from_error(&api_error(Verb::Get, Some(500)));
        assert_eq!(
            diagnostic.detail,
            "Kind: ChaosEngine, Name: litmus/nginx-chaos, Error: boom (HTTP 500)"
        );
        assert_eq!(diagnostic.severity, Severity::Error);
    }

    #[test]
    fn test_conflict_hints_force_conflicts() {
        let diagnostic = Diagnostic::from_error(&api_error(Verb::Patch, Some(409)));
        assert_eq!(diagnostic.summary, SUMMARY_CONFLICT);
        assert!(diagnostic.detail.contains("force_conflicts = true"));
    }

    #[test]
    fn test_conflict_on_get_is_not_special() {
        let diagnostic = Diagnostic::from_error(&api_error(Verb::Get, Some(409)));
        assert_eq!(diagnostic.summary, SUMMARY_GET);
    }

    #[test]
    fn test_marshal_and_unmarshal_summaries() {
        let marshal = ProviderError::Marshal {
            kind: "PodChaos".to_string(),
            name: "x".to_string(),
            reason: "bad".to_string(),
        };
        let unmarshal = ProviderError::Unmarshal {
            kind: "PodChaos".to_string(),
            name: "x".to_string(),
            reason: "bad".to_string(),
        };
        assert_eq!(Diagnostic::from_error(&marshal).summary, SUMMARY_MARSHAL);
        assert_eq!(Diagnostic::from_error(&unmarshal).summary, SUMMARY_UNMARSHAL);
    }

    #[test]
    fn test_import_error_summary() {
        let error = ProviderError::InvalidImportId {
            id: "only-name".to_string(),
            expected: "<namespace>/<name>",
        };
        let diagnostic = Diagnostic::from(&error);
        assert_eq!(diagnostic.summary, SUMMARY_IMPORT);
        assert!(diagnostic.detail.contains("only-name"));
    }

    #[test]
    fn test_has_error_ignores_warnings() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning("careful", "something odd");
        assert!(!diagnostics.has_error());
        assert_eq!(diagnostics.len(), 1);

        diagnostics.add_error("broken", "something failed");
        assert!(diagnostics.has_error());
        assert_eq!(diagnostics.errors().count(), 1);
    }

    #[test]
    fn test_display_includes_path() {
        let diagnostic = Diagnostic::error("Invalid Attribute Value", "too small")
            .at(AttributePath::attribute_root("spec").attribute("grace_period"));
        assert_eq!(
            diagnostic.to_string(),
            "Error: Invalid Attribute Value\n  with spec.grace_period\n  too small"
        );
    }

    #[test]
    fn test_serialize_diagnostics() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_attribute_error(
            AttributePath::attribute_root("metadata").attribute("name"),
            "Missing",
            "name is required",
        );
        let json = serde_json::to_value(&diagnostics).expect("serializable");
        assert_eq!(json[0]["severity"], "error");
        assert_eq!(json[0]["path"], "metadata.name");
    }
}
