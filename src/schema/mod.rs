// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider schema model.
//!
//! A [`Schema`] is a tree of [`Attribute`]s describing what a resource or data source
//! accepts and stores. Attribute names are snake_case; every attribute that maps onto a
//! Kubernetes field remembers the original JSON name so that state can be translated
//! to and from API objects (see [`convert`]).
//!
//! # Submodules
//!
//! - [`openapi`] - Builds attribute trees from CRD OpenAPI v3 schemas
//! - [`validate`] - Checks plan and config documents against a schema
//! - [`convert`] - Renames keys between provider state and Kubernetes JSON
//! - [`path`] - Attribute paths used by diagnostics

pub mod convert;
pub mod openapi;
pub mod path;
pub mod validate;

pub use path::{AttributePath, PathStep};

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attributes of an object, keyed by attribute name.
pub type Attributes = BTreeMap<String, Attribute>;

/// Whether an attribute is set by the user, by the provider, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Must be configured
    Required,
    /// May be configured
    Optional,
    /// Set by the provider only
    Computed,
    /// May be configured, otherwise set by the provider
    OptionalComputed,
}

impl AttributeMode {
    #[must_use]
    pub fn is_required(self) -> bool {
        self == Self::Required
    }

    /// Returns true when the user may not set the attribute.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        self == Self::Computed
    }
}

/// Element type of a primitive list or map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    String,
    Int64,
    Float64,
    Bool,
    /// Any JSON value
    Dynamic,
}

impl ElementType {
    /// Human-readable type name used in diagnostics and docs.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "number (int64)",
            Self::Float64 => "number",
            Self::Bool => "bool",
            Self::Dynamic => "dynamic",
        }
    }
}

/// The value shape of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int64,
    Float64,
    Bool,
    /// Free-form JSON (preserved unknown fields, int-or-string)
    Dynamic,
    List(ElementType),
    Map(ElementType),
    /// A single nested object
    SingleNested(Attributes),
    /// A list of nested objects
    ListNested(Attributes),
    /// A map of nested objects
    MapNested(Attributes),
}

impl AttributeKind {
    /// Human-readable type name used in diagnostics and docs.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::String => ElementType::String.type_name().to_string(),
            Self::Int64 => ElementType::Int64.type_name().to_string(),
            Self::Float64 => ElementType::Float64.type_name().to_string(),
            Self::Bool => ElementType::Bool.type_name().to_string(),
            Self::Dynamic => ElementType::Dynamic.type_name().to_string(),
            Self::List(element) => format!("list of {}", element.type_name()),
            Self::Map(element) => format!("map of {}", element.type_name()),
            Self::SingleNested(_) => "object".to_string(),
            Self::ListNested(_) => "list of object".to_string(),
            Self::MapNested(_) => "map of object".to_string(),
        }
    }

    /// Nested attributes of object-shaped kinds.
    #[must_use]
    pub fn nested(&self) -> Option<&Attributes> {
        match self {
            Self::SingleNested(attributes)
            | Self::ListNested(attributes)
            | Self::MapNested(attributes) => Some(attributes),
            _ => None,
        }
    }
}

/// Value checks applied to configured attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "validator", rename_all = "snake_case")]
pub enum Validator {
    OneOf { values: Vec<String> },
    RegexMatches { pattern: String },
    LengthBetween { min: u64, max: u64 },
    LengthAtLeast { min: u64 },
    LengthAtMost { max: u64 },
    Int64Between { min: i64, max: i64 },
    Int64AtLeast { min: i64 },
    Int64AtMost { max: i64 },
    Float64Between { min: f64, max: f64 },
    Float64AtLeast { min: f64 },
    Float64AtMost { max: f64 },
    SizeAtLeast { min: u64 },
    SizeAtMost { max: u64 },
}

impl Validator {
    /// Short description for generated documentation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::OneOf { values } => format!("value must be one of: {}", quoted_list(values)),
            Self::RegexMatches { pattern } => format!("value must match `{pattern}`"),
            Self::LengthBetween { min, max } => {
                format!("string length must be between {min} and {max}")
            }
            Self::LengthAtLeast { min } => format!("string length must be at least {min}"),
            Self::LengthAtMost { max } => format!("string length must be at most {max}"),
            Self::Int64Between { min, max } => format!("value must be between {min} and {max}"),
            Self::Int64AtLeast { min } => format!("value must be at least {min}"),
            Self::Int64AtMost { max } => format!("value must be at most {max}"),
            Self::Float64Between { min, max } => {
                format!("value must be between {min} and {max}")
            }
            Self::Float64AtLeast { min } => format!("value must be at least {min}"),
            Self::Float64AtMost { max } => format!("value must be at most {max}"),
            Self::SizeAtLeast { min } => format!("must contain at least {min} elements"),
            Self::SizeAtMost { max } => format!("must contain at most {max} elements"),
        }
    }
}

/// Render values as `["a" "b"]`, the way validator messages list them.
pub(crate) fn quoted_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", quoted.join(" "))
}

/// One attribute of a resource or data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub description: String,
    /// Kubernetes JSON field name; `None` for provider-only attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    /// Changing the value forces the object to be recreated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_replace: bool,
    pub kind: AttributeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    /// Checks applied to each element of a `List` or `Map`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub element_validators: Vec<Validator>,
}

impl Attribute {
    #[must_use]
    pub fn new(kind: AttributeKind, mode: AttributeMode) -> Self {
        Self {
            description: String::new(),
            json_name: None,
            mode,
            sensitive: false,
            requires_replace: false,
            kind,
            validators: Vec::new(),
            element_validators: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    #[must_use]
    pub fn with_element_validator(mut self, validator: Validator) -> Self {
        self.element_validators.push(validator);
        self
    }

    #[must_use]
    pub fn requiring_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    /// Kubernetes JSON key for this attribute.
    #[must_use]
    pub fn json_key<'a>(&'a self, attribute_name: &'a str) -> &'a str {
        self.json_name.as_deref().unwrap_or(attribute_name)
    }

    /// Copy of this attribute where it and all nested attributes are computed-only.
    #[must_use]
    pub fn into_computed(mut self) -> Self {
        self.mode = AttributeMode::Computed;
        self.validators.clear();
        self.element_validators.clear();
        self.kind = match self.kind {
            AttributeKind::SingleNested(attributes) => {
                AttributeKind::SingleNested(computed_attributes(attributes))
            }
            AttributeKind::ListNested(attributes) => {
                AttributeKind::ListNested(computed_attributes(attributes))
            }
            AttributeKind::MapNested(attributes) => {
                AttributeKind::MapNested(computed_attributes(attributes))
            }
            other => other,
        };
        self
    }
}

/// Mark every attribute of a tree as computed-only.
#[must_use]
pub fn computed_attributes(attributes: Attributes) -> Attributes {
    attributes
        .into_iter()
        .map(|(name, attribute)| (name, attribute.into_computed()))
        .collect()
}

/// Schema of a resource or data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: String,
    pub version: i64,
    pub attributes: Attributes,
}

impl Schema {
    /// Attribute paths marked `requires_replace` whose planned value differs from the
    /// prior state. Only top-level and single nested attributes are compared.
    #[must_use]
    pub fn replacement_paths(&self, plan: &Value, state: &Value) -> Vec<AttributePath> {
        let mut paths = Vec::new();
        collect_replacements(
            &self.attributes,
            plan,
            state,
            &AttributePath::root(),
            &mut paths,
        );
        paths
    }
}

fn collect_replacements(
    attributes: &Attributes,
    plan: &Value,
    state: &Value,
    path: &AttributePath,
    paths: &mut Vec<AttributePath>,
) {
    for (name, attribute) in attributes {
        let planned = plan.get(name).unwrap_or(&Value::Null);
        let prior = state.get(name).unwrap_or(&Value::Null);
        let child = path.attribute(name);

        if attribute.requires_replace && planned != prior {
            paths.push(child);
        } else if let AttributeKind::SingleNested(nested) = &attribute.kind {
            collect_replacements(nested, planned, prior, &child, paths);
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod mod_tests;
