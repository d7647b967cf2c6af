// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `validate.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::schema::{Attribute, AttributeKind, AttributeMode, Attributes, ElementType, Validator};
    use serde_json::json;

    fn schema() -> Attributes {
        let mut selector = Attributes::new();
        selector.insert(
            "namespaces".to_string(),
            Attribute::new(AttributeKind::List(ElementType::String), AttributeMode::Optional),
        );
        selector.insert(
            "label_selectors".to_string(),
            Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Optional),
        );

        let mut env = Attributes::new();
        env.insert(
            "name".to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Required),
        );
        env.insert(
            "value".to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Optional),
        );

        let mut spec = Attributes::new();
        spec.insert(
            "mode".to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Required).with_validator(
                Validator::OneOf {
                    values: vec!["one".to_string(), "all".to_string()],
                },
            ),
        );
        spec.insert(
            "duration".to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Optional).with_validator(
                Validator::RegexMatches {
                    pattern: "^[0-9]+(ms|s|m|h)$".to_string(),
                },
            ),
        );
        spec.insert(
            "grace_period".to_string(),
            Attribute::new(AttributeKind::Int64, AttributeMode::Optional)
                .with_validator(Validator::Int64AtLeast { min: 0 }),
        );
        spec.insert(
            "selector".to_string(),
            Attribute::new(AttributeKind::SingleNested(selector), AttributeMode::Optional),
        );
        spec.insert(
            "env".to_string(),
            Attribute::new(AttributeKind::ListNested(env), AttributeMode::Optional)
                .with_validator(Validator::SizeAtMost { max: 2 }),
        );

        let mut root = Attributes::new();
        root.insert(
            "id".to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Computed),
        );
        root.insert(
            "spec".to_string(),
            Attribute::new(AttributeKind::SingleNested(spec), AttributeMode::Required),
        );
        root
    }

    fn summaries_and_paths(document: serde_json::Value) -> Vec<(String, String)> {
        validate(&document, &schema())
            .iter()
            .map(|d| {
                (
                    d.summary.clone(),
                    d.path.as_ref().map(ToString::to_string).unwrap_or_default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_valid_document() {
        let diagnostics = validate(
            &json!({
                "spec": {
                    "mode": "one",
                    "duration": "30s",
                    "grace_period": 0,
                    "selector": {"namespaces": ["default"], "label_selectors": {"app": "web"}},
                    "env": [{"name": "TOTAL_CHAOS_DURATION", "value": "60"}]
                }
            }),
            &schema(),
        );
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(
            summaries_and_paths(json!({})),
            vec![(SUMMARY_MISSING_REQUIRED.to_string(), "spec".to_string())]
        );
        assert_eq!(
            summaries_and_paths(json!({"spec": {"env": [{"value": "x"}]}})),
            vec![
                (SUMMARY_MISSING_REQUIRED.to_string(), "spec.env[0].name".to_string()),
                (SUMMARY_MISSING_REQUIRED.to_string(), "spec.mode".to_string()),
            ]
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        assert_eq!(
            summaries_and_paths(json!({"spec": {"mode": null}})),
            vec![(SUMMARY_MISSING_REQUIRED.to_string(), "spec.mode".to_string())]
        );
    }

    #[test]
    fn test_unsupported_argument() {
        assert_eq!(
            summaries_and_paths(json!({"spec": {"mode": "all", "replicas": 3}})),
            vec![(SUMMARY_UNSUPPORTED_ARGUMENT.to_string(), "spec.replicas".to_string())]
        );
    }

    #[test]
    fn test_read_only_attribute() {
        assert_eq!(
            summaries_and_paths(json!({"id": "default/x", "spec": {"mode": "all"}})),
            vec![(SUMMARY_READ_ONLY.to_string(), "id".to_string())]
        );
    }

    #[test]
    fn test_incorrect_types() {
        assert_eq!(
            summaries_and_paths(json!({
                "spec": {
                    "mode": "all",
                    "grace_period": "ten",
                    "selector": {"namespaces": ["ok", 3], "label_selectors": {"app": true}}
                }
            })),
            vec![
                (SUMMARY_INCORRECT_TYPE.to_string(), "spec.grace_period".to_string()),
                (
                    SUMMARY_INCORRECT_TYPE.to_string(),
                    r#"spec.selector.label_selectors["app"]"#.to_string()
                ),
                (SUMMARY_INCORRECT_TYPE.to_string(), "spec.selector.namespaces[1]".to_string()),
            ]
        );
    }

    #[test]
    fn test_validator_failures() {
        let diagnostics = validate(
            &json!({
                "spec": {
                    "mode": "some",
                    "duration": "forever",
                    "grace_period": -1,
                    "env": [{"name": "a"}, {"name": "b"}, {"name": "c"}]
                }
            }),
            &schema(),
        );

        let details: Vec<&str> = diagnostics.iter().map(|d| d.detail.as_str()).collect();
        assert_eq!(details.len(), 4);
        assert!(details.contains(&"Attribute spec.duration value must match pattern \"^[0-9]+(ms|s|m|h)$\", got: \"forever\""));
        assert!(details.contains(&"Attribute spec.env must contain at most 2 elements, got: 3"));
        assert!(details.contains(&"Attribute spec.grace_period value must be at least 0, got: -1"));
        assert!(details.contains(&"Attribute spec.mode value must be one of: [\"one\" \"all\"], got: \"some\""));
    }

    #[test]
    fn test_element_validator_failures() {
        let mut attributes = Attributes::new();
        attributes.insert(
            "modes".to_string(),
            Attribute::new(AttributeKind::List(ElementType::String), AttributeMode::Optional)
                .with_element_validator(Validator::OneOf {
                    values: vec!["a".to_string(), "b".to_string()],
                }),
        );
        attributes.insert(
            "tags".to_string(),
            Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Optional)
                .with_element_validator(Validator::RegexMatches {
                    pattern: "^x$".to_string(),
                }),
        );

        let diagnostics = validate(
            &json!({"modes": ["a", "zzz"], "tags": {"ok": "x", "k": "nope"}}),
            &attributes,
        );

        let details: Vec<&str> = diagnostics.iter().map(|d| d.detail.as_str()).collect();
        assert_eq!(
            details,
            vec![
                "Attribute modes[1] value must be one of: [\"a\" \"b\"], got: \"zzz\"",
                "Attribute tags[\"k\"] value must match pattern \"^x$\", got: \"nope\"",
            ]
        );
        assert!(diagnostics.has_error());
    }

    #[test]
    fn test_non_object_document() {
        let diagnostics = validate(&json!("nope"), &schema());
        assert!(diagnostics.has_error());
        assert_eq!(diagnostics.iter().next().map(|d| d.summary.as_str()), Some(SUMMARY_INCORRECT_TYPE));
    }

    #[test]
    fn test_invalid_pattern_is_a_warning() {
        let mut attributes = Attributes::new();
        attributes.insert(
            "name".to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Optional).with_validator(
                Validator::RegexMatches {
                    pattern: "(?<=look)behind".to_string(),
                },
            ),
        );

        let diagnostics = validate(&json!({"name": "x"}), &attributes);
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics.has_error());
    }
}
