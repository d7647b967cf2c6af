// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Translation between provider state documents and Kubernetes JSON.
//!
//! Provider documents use snake_case attribute names; Kubernetes objects use the JSON
//! names recorded on each [`Attribute`]. Map keys are user data and are never renamed.
//! Null values are omitted in both directions, and Kubernetes fields the schema does
//! not describe are dropped when reading.

use super::{Attribute, AttributeKind, Attributes};
use serde_json::{Map, Value};

/// Convert a provider document (attribute names) into Kubernetes JSON (JSON names).
///
/// ```
/// use crdform::schema::{Attribute, AttributeKind, AttributeMode, Attributes};
/// use crdform::schema::convert::to_kubernetes;
/// use serde_json::json;
///
/// let mut attributes = Attributes::new();
/// attributes.insert(
///     "grace_period".to_string(),
///     Attribute::new(AttributeKind::Int64, AttributeMode::Optional).with_json_name("gracePeriod"),
/// );
///
/// assert_eq!(
///     to_kubernetes(&json!({"grace_period": 5}), &attributes),
///     json!({"gracePeriod": 5})
/// );
/// ```
#[must_use]
pub fn to_kubernetes(document: &Value, attributes: &Attributes) -> Value {
    let Some(object) = document.as_object() else {
        return Value::Null;
    };

    let mut out = Map::new();
    for (name, attribute) in attributes {
        let Some(value) = object.get(name).filter(|v| !v.is_null()) else {
            continue;
        };
        out.insert(
            attribute.json_key(name).to_string(),
            value_to_kubernetes(value, attribute),
        );
    }
    Value::Object(out)
}

/// Convert Kubernetes JSON into a provider document, keeping only described fields.
#[must_use]
pub fn from_kubernetes(object: &Value, attributes: &Attributes) -> Value {
    let Some(object) = object.as_object() else {
        return Value::Null;
    };

    let mut out = Map::new();
    for (name, attribute) in attributes {
        let Some(value) = object.get(attribute.json_key(name)).filter(|v| !v.is_null()) else {
            continue;
        };
        out.insert(name.clone(), value_from_kubernetes(value, attribute));
    }
    Value::Object(out)
}

fn value_to_kubernetes(value: &Value, attribute: &Attribute) -> Value {
    match &attribute.kind {
        AttributeKind::SingleNested(nested) => to_kubernetes(value, nested),
        AttributeKind::ListNested(nested) => map_items(value, |item| to_kubernetes(item, nested)),
        AttributeKind::MapNested(nested) => map_entries(value, |item| to_kubernetes(item, nested)),
        _ => value.clone(),
    }
}

fn value_from_kubernetes(value: &Value, attribute: &Attribute) -> Value {
    match &attribute.kind {
        AttributeKind::SingleNested(nested) => from_kubernetes(value, nested),
        AttributeKind::ListNested(nested) => {
            map_items(value, |item| from_kubernetes(item, nested))
        }
        AttributeKind::MapNested(nested) => {
            map_entries(value, |item| from_kubernetes(item, nested))
        }
        _ => value.clone(),
    }
}

fn map_items(value: &Value, f: impl Fn(&Value) -> Value) -> Value {
    match value.as_array() {
        Some(items) => Value::Array(items.iter().map(f).collect()),
        None => value.clone(),
    }
}

fn map_entries(value: &Value, f: impl Fn(&Value) -> Value) -> Value {
    match value.as_object() {
        Some(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), f(item)))
                .collect(),
        ),
        None => value.clone(),
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod convert_tests;
