// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Markdown reference documentation for resource and data source types.

use crate::descriptor::CrdDescriptor;
use crate::schema::{Attribute, AttributeMode, Attributes, Schema};
use std::fmt::Write;

/// Reference page for one CRD: resource, lookup data source and manifest.
#[must_use]
pub fn render_markdown(descriptor: &CrdDescriptor) -> String {
    let mut out = String::new();
    let type_name = descriptor.type_name();

    let _ = writeln!(out, "## {type_name}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**API Version**: `{}` **Kind**: `{}` **Scope**: {}",
        descriptor.api_version(),
        descriptor.kind(),
        if descriptor.namespaced {
            "Namespaced"
        } else {
            "Cluster"
        }
    );
    let _ = writeln!(out);

    render_schema(&mut out, "Resource", &descriptor.resource_schema());

    let _ = writeln!(out, "#### Import");
    let _ = writeln!(out);
    let example = if descriptor.namespaced {
        "<namespace>/<name>"
    } else {
        "<name>"
    };
    let _ = writeln!(out, "```shell");
    let _ = writeln!(
        out,
        "crdform import {type_name} '{example}' --state {}.json",
        descriptor.kind().to_lowercase()
    );
    let _ = writeln!(out, "```");
    let _ = writeln!(out);

    render_schema(&mut out, "Data Source", &descriptor.data_source_schema());
    render_schema(
        &mut out,
        &format!("Manifest (`{}`)", descriptor.manifest_type_name()),
        &descriptor.manifest_schema(),
    );

    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    out
}

fn render_schema(out: &mut String, title: &str, schema: &Schema) {
    let _ = writeln!(out, "### {title}");
    let _ = writeln!(out);
    if !schema.description.is_empty() {
        let _ = writeln!(out, "{}", schema.description);
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "| Attribute | Type | Mode | Description |");
    let _ = writeln!(out, "| --------- | ---- | ---- | ----------- |");
    render_rows(out, "", &schema.attributes);
    let _ = writeln!(out);
}

fn render_rows(out: &mut String, prefix: &str, attributes: &Attributes) {
    for (name, attribute) in attributes {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        let _ = writeln!(
            out,
            "| `{path}` | {} | {} | {} |",
            attribute.kind.type_name(),
            mode_label(attribute),
            describe(attribute)
        );
        if let Some(nested) = attribute.kind.nested() {
            render_rows(out, &path, nested);
        }
    }
}

fn mode_label(attribute: &Attribute) -> &'static str {
    match attribute.mode {
        AttributeMode::Required if attribute.requires_replace => "Required, forces replacement",
        AttributeMode::Required => "Required",
        AttributeMode::Optional => "Optional",
        AttributeMode::Computed => "Computed",
        AttributeMode::OptionalComputed => "Optional, Computed",
    }
}

fn describe(attribute: &Attribute) -> String {
    // Pipes and newlines would break the table
    let mut text = attribute.description.replace('|', "\\|").replace('\n', " ");
    for validator in &attribute.validators {
        if !text.is_empty() {
            text.push(' ');
        }
        let _ = write!(text, "_{}_.", validator.description().replace('|', "\\|"));
    }
    for validator in &attribute.element_validators {
        if !text.is_empty() {
            text.push(' ');
        }
        let _ = write!(
            text,
            "_each element: {}_.",
            validator.description().replace('|', "\\|")
        );
    }
    text
}
