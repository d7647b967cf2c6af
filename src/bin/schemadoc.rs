// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider Markdown Documentation Generator
//!
//! Generates the markdown reference for every resource and data source type.
//!
//! Usage:
//!   cargo run --bin schemadoc [-- <crd-dir>...] > docs/src/reference/types.md

use crdform::docs::render_markdown;
use crdform::registry::Registry;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = Registry::builtin()?;
    for dir in std::env::args().skip(1).map(PathBuf::from) {
        registry = registry.with_crd_dir(&dir)?;
    }

    println!("# Type Reference");
    println!();
    println!("Resources and data sources exposed by crdform.");
    println!();
    println!("> **Note**: This file is AUTO-GENERATED from the registered CRDs");
    println!("> DO NOT EDIT MANUALLY - Run `cargo run --bin schemadoc` to regenerate");
    println!();

    println!("## Table of Contents");
    println!();
    for type_name in registry.type_names() {
        println!("- [{type_name}](#{type_name})");
    }
    println!();

    for descriptor in registry.descriptors() {
        print!("{}", render_markdown(descriptor));
    }

    Ok(())
}
