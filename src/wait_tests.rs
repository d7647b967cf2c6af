// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `wait.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use serde_json::json;

    fn condition(jsonpath: &str, value: &str) -> WaitCondition {
        WaitCondition {
            jsonpath: jsonpath.to_string(),
            value: value.to_string(),
        }
    }

    fn engine() -> Value {
        json!({
            "metadata": {"name": "nginx-chaos", "generation": 2},
            "status": {
                "engineStatus": "completed",
                "ready": true,
                "conditions": [
                    {"type": "Initialized", "status": "True"},
                    {"type": "Ready", "status": "False"}
                ]
            }
        })
    }

    #[test]
    fn test_normalize_jsonpath() {
        assert_eq!(normalize_jsonpath("$.status.phase"), "$.status.phase");
        assert_eq!(normalize_jsonpath(".status.phase"), "$.status.phase");
        assert_eq!(normalize_jsonpath("{.status.phase}"), "$.status.phase");
        assert_eq!(normalize_jsonpath("status.phase"), "$.status.phase");
        assert_eq!(normalize_jsonpath(" ['status'] "), "$['status']");
    }

    #[test]
    fn test_condition_met_on_strings_and_scalars() {
        let object = engine();
        assert!(condition_met(&object, &condition("$.status.engineStatus", "completed")).unwrap());
        assert!(!condition_met(&object, &condition("$.status.engineStatus", "initialized")).unwrap());
        assert!(condition_met(&object, &condition(".status.ready", "true")).unwrap());
        assert!(condition_met(&object, &condition("{.metadata.generation}", "2")).unwrap());
    }

    #[test]
    fn test_condition_matches_any_selected_value() {
        let object = engine();
        assert!(condition_met(&object, &condition("$.status.conditions[*].status", "True")).unwrap());
        assert!(condition_met(
            &object,
            &condition("$.status.conditions[?(@.type == 'Ready')].status", "False")
        )
        .unwrap());
    }

    #[test]
    fn test_missing_path_is_unmet() {
        assert!(!condition_met(&engine(), &condition("$.status.phase", "Running")).unwrap());
    }

    #[test]
    fn test_first_unmet() {
        let conditions = vec![
            condition("$.status.engineStatus", "completed"),
            condition("$.status.ready", "false"),
        ];
        let unmet = first_unmet(&engine(), &conditions).unwrap();
        assert_eq!(unmet, Some(&conditions[1]));
        assert_eq!(first_unmet(&engine(), &conditions[..1]).unwrap(), None);
    }

    #[test]
    fn test_invalid_expression() {
        let err = condition_met(&engine(), &condition("$.status[", "x")).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidJsonPath { ref expression, .. } if expression == "$.status["));
    }

    #[test]
    fn test_default_settings() {
        let settings = WaitSettings::default();
        assert_eq!(settings.wait_timeout, Duration::from_secs(300));
        assert_eq!(settings.delete_timeout, Duration::from_secs(120));
        assert_eq!(settings.poll_interval, Duration::from_secs(2));
    }
}
