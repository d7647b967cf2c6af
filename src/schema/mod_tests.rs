// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the schema model

#[cfg(test)]
mod tests {
    use crate::schema::*;
    use serde_json::json;

    fn metadata_schema() -> Schema {
        let mut metadata = Attributes::new();
        metadata.insert(
            "name".to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Required).requiring_replace(),
        );
        metadata.insert(
            "labels".to_string(),
            Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Optional),
        );

        let mut attributes = Attributes::new();
        attributes.insert(
            "metadata".to_string(),
            Attribute::new(AttributeKind::SingleNested(metadata), AttributeMode::Required),
        );
        Schema {
            description: String::new(),
            version: 0,
            attributes,
        }
    }

    #[test]
    fn test_replacement_paths_on_name_change() {
        let schema = metadata_schema();
        let state = json!({"metadata": {"name": "old", "labels": {"a": "b"}}});
        let plan = json!({"metadata": {"name": "new", "labels": {"a": "b"}}});

        let paths: Vec<String> = schema
            .replacement_paths(&plan, &state)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(paths, vec!["metadata.name".to_string()]);
    }

    #[test]
    fn test_no_replacement_for_label_change() {
        let schema = metadata_schema();
        let state = json!({"metadata": {"name": "same", "labels": {"a": "b"}}});
        let plan = json!({"metadata": {"name": "same", "labels": {"a": "c"}}});
        assert!(schema.replacement_paths(&plan, &state).is_empty());
    }

    #[test]
    fn test_into_computed_is_recursive() {
        let schema = metadata_schema();
        let computed = computed_attributes(schema.attributes);

        let metadata = &computed["metadata"];
        assert_eq!(metadata.mode, AttributeMode::Computed);
        let nested = metadata.kind.nested().expect("nested attributes");
        assert_eq!(nested["name"].mode, AttributeMode::Computed);
        assert!(nested["name"].validators.is_empty());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(AttributeKind::String.type_name(), "string");
        assert_eq!(
            AttributeKind::List(ElementType::Int64).type_name(),
            "list of number (int64)"
        );
        assert_eq!(
            AttributeKind::ListNested(Attributes::new()).type_name(),
            "list of object"
        );
    }

    #[test]
    fn test_attribute_serialization() {
        let attribute = Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Optional)
            .with_description("Labels")
            .with_json_name("labels")
            .with_validator(Validator::SizeAtMost { max: 64 });

        let json = serde_json::to_value(&attribute).expect("serializable");
        assert_eq!(
            json,
            json!({
                "description": "Labels",
                "json_name": "labels",
                "mode": "optional",
                "kind": {"type": "map", "of": "string"},
                "validators": [{"validator": "size_at_most", "max": 64}]
            })
        );
    }

    #[test]
    fn test_validator_descriptions() {
        assert_eq!(
            Validator::OneOf {
                values: vec!["a".to_string(), "b".to_string()]
            }
            .description(),
            "value must be one of: [\"a\" \"b\"]"
        );
        assert_eq!(
            Validator::LengthBetween { min: 1, max: 63 }.description(),
            "string length must be between 1 and 63"
        );
    }
}
