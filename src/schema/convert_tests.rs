// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `convert.rs`

#[cfg(test)]
mod tests {
    use super::super::{from_kubernetes, to_kubernetes};
    use crate::schema::openapi::attributes_from_openapi;
    use crate::schema::Attributes;
    use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::JSONSchemaProps;
    use serde_json::json;

    fn chaos_engine_spec() -> Attributes {
        let props: JSONSchemaProps = serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "engineState": {"type": "string"},
                "appinfo": {
                    "type": "object",
                    "properties": {
                        "appns": {"type": "string"},
                        "applabel": {"type": "string"}
                    }
                },
                "experiments": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "spec": {
                                "type": "object",
                                "properties": {
                                    "components": {
                                        "type": "object",
                                        "properties": {
                                            "env": {
                                                "type": "array",
                                                "items": {
                                                    "type": "object",
                                                    "properties": {
                                                        "name": {"type": "string"},
                                                        "value": {"type": "string"}
                                                    }
                                                }
                                            },
                                            "nodeSelector": {
                                                "type": "object",
                                                "additionalProperties": {"type": "string"}
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "jobCleanUpPolicy": {"type": "string"},
                "extra": {"type": "object", "x-kubernetes-preserve-unknown-fields": true}
            }
        }))
        .expect("valid schema");
        attributes_from_openapi(&props)
    }

    #[test]
    fn test_to_kubernetes_renames_nested_keys() {
        let document = json!({
            "engine_state": "active",
            "appinfo": {"appns": "default", "applabel": "app=nginx"},
            "experiments": [{
                "name": "pod-delete",
                "spec": {"components": {
                    "env": [{"name": "TOTAL_CHAOS_DURATION", "value": "30"}],
                    "node_selector": {"kubernetes.io/os": "linux"}
                }}
            }],
            "job_clean_up_policy": null
        });

        let converted = to_kubernetes(&document, &chaos_engine_spec());

        assert_eq!(
            converted,
            json!({
                "engineState": "active",
                "appinfo": {"appns": "default", "applabel": "app=nginx"},
                "experiments": [{
                    "name": "pod-delete",
                    "spec": {"components": {
                        "env": [{"name": "TOTAL_CHAOS_DURATION", "value": "30"}],
                        "nodeSelector": {"kubernetes.io/os": "linux"}
                    }}
                }]
            })
        );
    }

    #[test]
    fn test_from_kubernetes_drops_unknown_fields() {
        let object = json!({
            "engineState": "stop",
            "chaosServiceAccount": "litmus-admin",
            "experiments": [{"name": "pod-delete", "unknown": 1}],
            "extra": {"anything": {"goes": [1, 2]}}
        });

        let converted = from_kubernetes(&object, &chaos_engine_spec());

        assert_eq!(
            converted,
            json!({
                "engine_state": "stop",
                "experiments": [{"name": "pod-delete"}],
                "extra": {"anything": {"goes": [1, 2]}}
            })
        );
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let document = json!({
            "engine_state": "active",
            "experiments": [{"name": "pod-delete", "spec": {"components": {"node_selector": {"zone": "a"}}}}]
        });
        let schema = chaos_engine_spec();

        let back = from_kubernetes(&to_kubernetes(&document, &schema), &schema);
        assert_eq!(back, document);
    }

    #[test]
    fn test_non_object_input() {
        let schema = chaos_engine_spec();
        assert!(to_kubernetes(&json!([1, 2]), &schema).is_null());
        assert!(from_kubernetes(&json!("x"), &schema).is_null());
    }
}
