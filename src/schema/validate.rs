// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Validation of plan and config documents against a provider schema.
//!
//! Validation never stops at the first problem: every finding is recorded as a
//! diagnostic pointing at the offending attribute path.

use super::{quoted_list, Attribute, AttributeKind, AttributePath, Attributes, ElementType, Validator};
use crate::diagnostics::Diagnostics;
use regex::Regex;
use serde_json::{Map, Value};

/// Summary used when a required attribute is missing
pub const SUMMARY_MISSING_REQUIRED: &str = "Missing Configuration for Required Attribute";

/// Summary used for attributes the schema does not know
pub const SUMMARY_UNSUPPORTED_ARGUMENT: &str = "Unsupported argument";

/// Summary used when a computed-only attribute is configured
pub const SUMMARY_READ_ONLY: &str = "Invalid Configuration for Read-Only Attribute";

/// Summary used when a value has the wrong type
pub const SUMMARY_INCORRECT_TYPE: &str = "Incorrect attribute value type";

/// Summary used by `OneOf` and `RegexMatches`
pub const SUMMARY_VALUE_MATCH: &str = "Invalid Attribute Value Match";

/// Summary used by length validators
pub const SUMMARY_VALUE_LENGTH: &str = "Invalid Attribute Value Length";

/// Summary used by range and size validators
pub const SUMMARY_VALUE: &str = "Invalid Attribute Value";

/// Validate a document against the attributes of a schema.
///
/// # Example
///
/// ```
/// use crdform::schema::{Attribute, AttributeKind, AttributeMode, Attributes};
/// use crdform::schema::validate::validate;
/// use serde_json::json;
///
/// let mut attributes = Attributes::new();
/// attributes.insert(
///     "name".to_string(),
///     Attribute::new(AttributeKind::String, AttributeMode::Required),
/// );
///
/// assert!(!validate(&json!({"name": "x"}), &attributes).has_error());
/// assert!(validate(&json!({}), &attributes).has_error());
/// ```
#[must_use]
pub fn validate(document: &Value, attributes: &Attributes) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    match document {
        Value::Object(object) => {
            validate_object(object, attributes, &AttributePath::root(), &mut diagnostics);
        }
        Value::Null => {
            validate_object(&Map::new(), attributes, &AttributePath::root(), &mut diagnostics);
        }
        other => diagnostics.add_error(
            SUMMARY_INCORRECT_TYPE,
            format!("Expected an object document, got {}", json_type_name(other)),
        ),
    }
    diagnostics
}

fn validate_object(
    object: &Map<String, Value>,
    attributes: &Attributes,
    path: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    for (name, value) in object {
        if !attributes.contains_key(name) && !value.is_null() {
            diagnostics.add_attribute_error(
                path.attribute(name),
                SUMMARY_UNSUPPORTED_ARGUMENT,
                format!("An argument named {name:?} is not expected here."),
            );
        }
    }

    for (name, attribute) in attributes {
        let child = path.attribute(name);
        match object.get(name).filter(|v| !v.is_null()) {
            None if attribute.mode.is_required() => diagnostics.add_attribute_error(
                child.clone(),
                SUMMARY_MISSING_REQUIRED,
                format!(
                    "Must set a configuration value for the {child} attribute as the provider has marked it as required."
                ),
            ),
            None => {}
            Some(_) if attribute.mode.is_read_only() => diagnostics.add_attribute_error(
                child.clone(),
                SUMMARY_READ_ONLY,
                format!(
                    "Cannot set value for the {child} attribute as the provider has marked it as read-only. Remove the configuration line setting the value."
                ),
            ),
            Some(value) => validate_value(value, attribute, &child, diagnostics),
        }
    }
}

fn validate_value(
    value: &Value,
    attribute: &Attribute,
    path: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    let type_ok = match &attribute.kind {
        AttributeKind::String => value.is_string(),
        AttributeKind::Int64 => value.is_i64() || value.is_u64(),
        AttributeKind::Float64 => value.is_number(),
        AttributeKind::Bool => value.is_boolean(),
        AttributeKind::Dynamic => true,
        AttributeKind::List(element) => match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    validate_element(item, *element, attribute, &path.index(index), diagnostics);
                }
                true
            }
            None => false,
        },
        AttributeKind::Map(element) => match value.as_object() {
            Some(entries) => {
                for (key, item) in entries {
                    validate_element(item, *element, attribute, &path.key(key), diagnostics);
                }
                true
            }
            None => false,
        },
        AttributeKind::SingleNested(nested) => match value.as_object() {
            Some(object) => {
                validate_object(object, nested, path, diagnostics);
                true
            }
            None => false,
        },
        AttributeKind::ListNested(nested) => match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    validate_nested_item(item, nested, &path.index(index), diagnostics);
                }
                true
            }
            None => false,
        },
        AttributeKind::MapNested(nested) => match value.as_object() {
            Some(entries) => {
                for (key, item) in entries {
                    validate_nested_item(item, nested, &path.key(key), diagnostics);
                }
                true
            }
            None => false,
        },
    };

    if !type_ok {
        diagnostics.add_attribute_error(
            path.clone(),
            SUMMARY_INCORRECT_TYPE,
            format!(
                "Inappropriate value for attribute {path}: {} required, got {}.",
                attribute.kind.type_name(),
                json_type_name(value)
            ),
        );
        return;
    }

    for validator in &attribute.validators {
        check_validator(validator, value, path, diagnostics);
    }
}

fn validate_nested_item(
    item: &Value,
    nested: &Attributes,
    path: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    match item.as_object() {
        Some(object) => validate_object(object, nested, path, diagnostics),
        None => diagnostics.add_attribute_error(
            path.clone(),
            SUMMARY_INCORRECT_TYPE,
            format!(
                "Inappropriate value for attribute {path}: object required, got {}.",
                json_type_name(item)
            ),
        ),
    }
}

fn validate_element(
    item: &Value,
    element: ElementType,
    attribute: &Attribute,
    path: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    let ok = match element {
        ElementType::String => item.is_string(),
        ElementType::Int64 => item.is_i64() || item.is_u64(),
        ElementType::Float64 => item.is_number(),
        ElementType::Bool => item.is_boolean(),
        ElementType::Dynamic => true,
    };
    if !ok {
        diagnostics.add_attribute_error(
            path.clone(),
            SUMMARY_INCORRECT_TYPE,
            format!(
                "Inappropriate value for attribute {path}: {} required, got {}.",
                element.type_name(),
                json_type_name(item)
            ),
        );
        return;
    }

    for validator in &attribute.element_validators {
        check_validator(validator, item, path, diagnostics);
    }
}

fn check_validator(
    validator: &Validator,
    value: &Value,
    path: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    let got = scalar_string(value);
    let failure = match validator {
        Validator::OneOf { values } => (!values.iter().any(|v| *v == got)).then(|| {
            (
                SUMMARY_VALUE_MATCH,
                format!(
                    "Attribute {path} value must be one of: {}, got: {got:?}",
                    quoted_list(values)
                ),
            )
        }),
        Validator::RegexMatches { pattern } => match Regex::new(pattern) {
            Ok(regex) => (!regex.is_match(&got)).then(|| {
                (
                    SUMMARY_VALUE_MATCH,
                    format!("Attribute {path} value must match pattern {pattern:?}, got: {got:?}"),
                )
            }),
            Err(e) => {
                diagnostics.add_attribute_warning(
                    path.clone(),
                    "Unsupported validation pattern",
                    format!("Pattern {pattern:?} could not be compiled and was not checked: {e}"),
                );
                None
            }
        },
        Validator::LengthBetween { min, max } => {
            let length = got.chars().count() as u64;
            (length < *min || length > *max).then(|| {
                (
                    SUMMARY_VALUE_LENGTH,
                    format!("Attribute {path} string length must be between {min} and {max}, got: {length}"),
                )
            })
        }
        Validator::LengthAtLeast { min } => {
            let length = got.chars().count() as u64;
            (length < *min).then(|| {
                (
                    SUMMARY_VALUE_LENGTH,
                    format!("Attribute {path} string length must be at least {min}, got: {length}"),
                )
            })
        }
        Validator::LengthAtMost { max } => {
            let length = got.chars().count() as u64;
            (length > *max).then(|| {
                (
                    SUMMARY_VALUE_LENGTH,
                    format!("Attribute {path} string length must be at most {max}, got: {length}"),
                )
            })
        }
        Validator::Int64Between { min, max } => value.as_i64().and_then(|v| {
            (v < *min || v > *max).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} value must be between {min} and {max}, got: {v}"),
                )
            })
        }),
        Validator::Int64AtLeast { min } => value.as_i64().and_then(|v| {
            (v < *min).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} value must be at least {min}, got: {v}"),
                )
            })
        }),
        Validator::Int64AtMost { max } => value.as_i64().and_then(|v| {
            (v > *max).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} value must be at most {max}, got: {v}"),
                )
            })
        }),
        Validator::Float64Between { min, max } => value.as_f64().and_then(|v| {
            (v < *min || v > *max).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} value must be between {min} and {max}, got: {v}"),
                )
            })
        }),
        Validator::Float64AtLeast { min } => value.as_f64().and_then(|v| {
            (v < *min).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} value must be at least {min}, got: {v}"),
                )
            })
        }),
        Validator::Float64AtMost { max } => value.as_f64().and_then(|v| {
            (v > *max).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} value must be at most {max}, got: {v}"),
                )
            })
        }),
        Validator::SizeAtLeast { min } => collection_size(value).and_then(|size| {
            (size < *min).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} must contain at least {min} elements, got: {size}"),
                )
            })
        }),
        Validator::SizeAtMost { max } => collection_size(value).and_then(|size| {
            (size > *max).then(|| {
                (
                    SUMMARY_VALUE,
                    format!("Attribute {path} must contain at most {max} elements, got: {size}"),
                )
            })
        }),
    };

    if let Some((summary, detail)) = failure {
        diagnostics.add_attribute_error(path.clone(), summary, detail);
    }
}

fn collection_size(value: &Value) -> Option<u64> {
    match value {
        Value::Array(items) => Some(items.len() as u64),
        Value::Object(entries) => Some(entries.len() as u64),
        _ => None,
    }
}

/// String form of a scalar used by string validators; non-strings use their JSON text.
pub(crate) fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod validate_tests;
