// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for provider error types.

#[cfg(test)]
mod tests {
    use crate::errors::{ProviderError, Verb};

    fn api_error(code: Option<u16>) -> ProviderError {
        ProviderError::Api {
            verb: Verb::Patch,
            kind: "PodChaos".to_string(),
            name: "default/kill-one".to_string(),
            code,
            message: "the server rejected the request".to_string(),
        }
    }

    #[test]
    fn test_verb_display() {
        assert_eq!(Verb::Patch.to_string(), "PATCH");
        assert_eq!(Verb::Get.to_string(), "GET");
        assert_eq!(Verb::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            api_error(Some(422)).to_string(),
            "PATCH PodChaos 'default/kill-one' failed: the server rejected the request"
        );
    }

    #[test]
    fn test_not_found_and_conflict_detection() {
        assert!(api_error(Some(404)).is_not_found());
        assert!(!api_error(Some(404)).is_conflict());
        assert!(api_error(Some(409)).is_conflict());
        assert!(!api_error(None).is_not_found());
        assert_eq!(api_error(None).status_code(), None);
    }

    #[test]
    fn test_non_api_errors_have_no_status_code() {
        let error = ProviderError::InvalidImportId {
            id: "a/b/c".to_string(),
            expected: "<namespace>/<name>",
        };
        assert_eq!(error.status_code(), None);
        assert_eq!(
            error.to_string(),
            "Invalid import identifier 'a/b/c': expected <namespace>/<name>"
        );
    }

    #[test]
    fn test_wait_timeout_display() {
        let error = ProviderError::WaitTimeout {
            kind: "ChaosEngine".to_string(),
            name: "litmus/engine".to_string(),
            condition: "$.status.engineStatus == completed".to_string(),
            timeout_secs: 30,
        };
        assert_eq!(
            error.to_string(),
            "Timed out after 30s waiting for ChaosEngine 'litmus/engine': $.status.engineStatus == completed"
        );
    }
}
