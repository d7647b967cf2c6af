// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Conversion of CRD OpenAPI v3 schemas into provider attribute trees.
//!
//! # Type Mapping
//!
//! | OpenAPI | Attribute kind |
//! |---------|----------------|
//! | `object` with `properties` | `SingleNested` |
//! | `object` with only `additionalProperties` | `Map` / `MapNested` |
//! | free-form `object`, `x-kubernetes-preserve-unknown-fields` | `Dynamic` |
//! | `array` of objects | `ListNested` |
//! | `array` of primitives | `List` |
//! | `string` / `integer` / `number` / `boolean` | primitive |
//! | `x-kubernetes-int-or-string` | `Dynamic` |
//!
//! `enum`, `pattern`, length, range and size bounds become [`Validator`]s.

use super::{Attribute, AttributeKind, AttributeMode, Attributes, ElementType, Validator};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    JSONSchemaProps, JSONSchemaPropsOrArray, JSONSchemaPropsOrBool,
};
use serde_json::Value;

/// Build the attributes of an object schema from its `properties`.
///
/// Properties listed in `required` become required attributes, all others optional.
/// Attribute names are derived with [`attribute_name`]; names that collide after
/// conversion receive a trailing underscore.
#[must_use]
pub fn attributes_from_openapi(props: &JSONSchemaProps) -> Attributes {
    let mut attributes = Attributes::new();
    let Some(properties) = props.properties.as_ref() else {
        return attributes;
    };
    let required = props.required.as_deref().unwrap_or_default();

    for (json_name, property) in properties {
        let is_required = required.iter().any(|r| r == json_name);
        let mut name = attribute_name(json_name);
        while attributes.contains_key(&name) {
            name.push('_');
        }
        attributes.insert(name, attribute_from_openapi(json_name, property, is_required));
    }

    attributes
}

/// Build a single attribute from a property schema.
#[must_use]
pub fn attribute_from_openapi(
    json_name: &str,
    props: &JSONSchemaProps,
    required: bool,
) -> Attribute {
    let mode = if required {
        AttributeMode::Required
    } else {
        AttributeMode::Optional
    };

    let mut attribute = Attribute::new(kind_from_openapi(props), mode)
        .with_description(props.description.clone().unwrap_or_default())
        .with_json_name(json_name);
    attribute.validators = validators_from_openapi(props);
    if matches!(attribute.kind, AttributeKind::List(_) | AttributeKind::Map(_)) {
        if let Some(element) = element_schema(props) {
            attribute.element_validators = validators_from_openapi(element);
        }
    }
    attribute
}

/// Schema of the items of an array, or the values of an `additionalProperties` map.
fn element_schema(props: &JSONSchemaProps) -> Option<&JSONSchemaProps> {
    match props.type_.as_deref() {
        Some("array") => match props.items.as_ref() {
            Some(JSONSchemaPropsOrArray::Schema(item)) => Some(&**item),
            _ => None,
        },
        _ => match props.additional_properties.as_ref() {
            Some(JSONSchemaPropsOrBool::Schema(value)) => Some(&**value),
            _ => None,
        },
    }
}

fn kind_from_openapi(props: &JSONSchemaProps) -> AttributeKind {
    if props.x_kubernetes_int_or_string == Some(true) {
        return AttributeKind::Dynamic;
    }

    match props.type_.as_deref() {
        Some("string") => AttributeKind::String,
        Some("integer") => AttributeKind::Int64,
        Some("number") => AttributeKind::Float64,
        Some("boolean") => AttributeKind::Bool,
        Some("array") => match props.items.as_ref() {
            Some(JSONSchemaPropsOrArray::Schema(item)) => match kind_from_openapi(item) {
                AttributeKind::SingleNested(attributes) => AttributeKind::ListNested(attributes),
                other => AttributeKind::List(element_type(&other)),
            },
            _ => AttributeKind::List(ElementType::Dynamic),
        },
        Some("object") | None => object_kind(props),
        Some(_) => AttributeKind::Dynamic,
    }
}

fn object_kind(props: &JSONSchemaProps) -> AttributeKind {
    if props.properties.as_ref().is_some_and(|p| !p.is_empty()) {
        return AttributeKind::SingleNested(attributes_from_openapi(props));
    }
    if props.x_kubernetes_preserve_unknown_fields == Some(true) {
        return AttributeKind::Dynamic;
    }

    match props.additional_properties.as_ref() {
        Some(JSONSchemaPropsOrBool::Schema(value)) => match kind_from_openapi(value) {
            AttributeKind::SingleNested(attributes) => AttributeKind::MapNested(attributes),
            other => AttributeKind::Map(element_type(&other)),
        },
        Some(JSONSchemaPropsOrBool::Bool(true)) => AttributeKind::Map(ElementType::Dynamic),
        _ => AttributeKind::Dynamic,
    }
}

fn element_type(kind: &AttributeKind) -> ElementType {
    match kind {
        AttributeKind::String => ElementType::String,
        AttributeKind::Int64 => ElementType::Int64,
        AttributeKind::Float64 => ElementType::Float64,
        AttributeKind::Bool => ElementType::Bool,
        _ => ElementType::Dynamic,
    }
}

fn validators_from_openapi(props: &JSONSchemaProps) -> Vec<Validator> {
    let mut validators = Vec::new();

    if let Some(values) = props.enum_.as_ref() {
        let values: Vec<String> = values
            .iter()
            .filter(|v| !v.0.is_null())
            .map(|v| match &v.0 {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        if !values.is_empty() {
            validators.push(Validator::OneOf { values });
        }
    }

    if let Some(pattern) = props.pattern.as_ref() {
        validators.push(Validator::RegexMatches {
            pattern: pattern.clone(),
        });
    }

    let min_length = props.min_length.and_then(|v| u64::try_from(v).ok());
    let max_length = props.max_length.and_then(|v| u64::try_from(v).ok());
    match (min_length, max_length) {
        (Some(min), Some(max)) => validators.push(Validator::LengthBetween { min, max }),
        (Some(min), None) => validators.push(Validator::LengthAtLeast { min }),
        (None, Some(max)) => validators.push(Validator::LengthAtMost { max }),
        (None, None) => {}
    }

    match props.type_.as_deref() {
        Some("integer") => {
            #[allow(clippy::cast_possible_truncation)]
            let min = props.minimum.map(|m| {
                let m = m.ceil() as i64;
                if props.exclusive_minimum == Some(true) {
                    m.saturating_add(1)
                } else {
                    m
                }
            });
            #[allow(clippy::cast_possible_truncation)]
            let max = props.maximum.map(|m| {
                let m = m.floor() as i64;
                if props.exclusive_maximum == Some(true) {
                    m.saturating_sub(1)
                } else {
                    m
                }
            });
            match (min, max) {
                (Some(min), Some(max)) => validators.push(Validator::Int64Between { min, max }),
                (Some(min), None) => validators.push(Validator::Int64AtLeast { min }),
                (None, Some(max)) => validators.push(Validator::Int64AtMost { max }),
                (None, None) => {}
            }
        }
        Some("number") => match (props.minimum, props.maximum) {
            (Some(min), Some(max)) => validators.push(Validator::Float64Between { min, max }),
            (Some(min), None) => validators.push(Validator::Float64AtLeast { min }),
            (None, Some(max)) => validators.push(Validator::Float64AtMost { max }),
            (None, None) => {}
        },
        _ => {}
    }

    let (min_size, max_size) = match props.type_.as_deref() {
        Some("array") => (props.min_items, props.max_items),
        _ => (props.min_properties, props.max_properties),
    };
    if let Some(min) = min_size.and_then(|v| u64::try_from(v).ok()) {
        validators.push(Validator::SizeAtLeast { min });
    }
    if let Some(max) = max_size.and_then(|v| u64::try_from(v).ok()) {
        validators.push(Validator::SizeAtMost { max });
    }

    validators
}

/// Convert a Kubernetes JSON field name into an attribute name.
///
/// camelCase becomes snake_case, acronyms are kept together (`podIP` → `pod_ip`,
/// `URLPath` → `url_path`, `IPv4Address` → `ipv4_address`), characters outside `[a-z0-9_]` become `_`, and names
/// starting with a digit are prefixed with `_`.
///
/// ```
/// use crdform::schema::openapi::attribute_name;
///
/// assert_eq!(attribute_name("apiVersion"), "api_version");
/// assert_eq!(attribute_name("podIP"), "pod_ip");
/// assert_eq!(attribute_name("x-kubernetes-group"), "x_kubernetes_group");
/// ```
#[must_use]
pub fn attribute_name(json_name: &str) -> String {
    let chars: Vec<char> = json_name.chars().collect();
    let mut name = String::with_capacity(json_name.len() + 4);

    for (position, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let previous = position.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(position + 1).copied();
            let boundary = match previous {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                // `IPv4` stays one word
                Some(p) if p.is_ascii_uppercase() => {
                    next.is_some_and(|n| n.is_ascii_lowercase())
                        && !chars.get(position + 2).is_some_and(char::is_ascii_digit)
                }
                _ => false,
            };
            if boundary && !name.is_empty() && !name.ends_with('_') {
                name.push('_');
            }
            name.push(c.to_ascii_lowercase());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            name.push(c);
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }

    let trimmed = name.trim_end_matches('_');
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{trimmed}");
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "openapi_tests.rs"]
mod openapi_tests;
