// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider Schema Generator
//!
//! Writes the provider schema of every registered type as JSON, plus the CRD YAML
//! of every custom resource compiled into the provider.
//!
//! Usage:
//!   cargo run --bin schemagen [-- <crd-dir>...]
//!
//! Schemas are written to deploy/schemas/, CRDs to deploy/crds/.

use crdform::crds::{airflow::AirflowBase, chaos_mesh::PodChaos, litmuschaos::ChaosEngine};
use crdform::registry::Registry;
use crdform::schema::Schema;
use kube::CustomResourceExt;
use std::fs;
use std::path::{Path, PathBuf};

const COPYRIGHT_HEADER: &str = "# Copyright (c) 2025 Erick Bourgeois, firestoned
# SPDX-License-Identifier: MIT
#
# This file is AUTO-GENERATED from src/crds/
# DO NOT EDIT MANUALLY - Run `cargo run --bin schemagen` to regenerate
#
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema_dir = Path::new("deploy/schemas");
    let crd_dir = Path::new("deploy/crds");
    fs::create_dir_all(schema_dir)?;
    fs::create_dir_all(crd_dir)?;

    println!("Generating CRD YAML files from src/crds/...");
    generate_crd::<PodChaos>(crd_dir)?;
    generate_crd::<ChaosEngine>(crd_dir)?;
    generate_crd::<AirflowBase>(crd_dir)?;

    let mut registry = Registry::builtin()?;
    for dir in std::env::args().skip(1).map(PathBuf::from) {
        registry = registry.with_crd_dir(&dir)?;
    }

    println!("Generating provider schemas for {} CRD versions...", registry.len());
    for descriptor in registry.descriptors() {
        let type_name = descriptor.type_name();
        write_schema(schema_dir, &type_name, &descriptor.resource_schema())?;
        write_schema(
            schema_dir,
            &format!("{type_name}.data"),
            &descriptor.data_source_schema(),
        )?;
        write_schema(
            schema_dir,
            &descriptor.manifest_type_name(),
            &descriptor.manifest_schema(),
        )?;
    }

    println!("✓ Successfully generated files in deploy/");
    Ok(())
}

fn generate_crd<T>(output_dir: &Path) -> Result<(), Box<dyn std::error::Error>>
where
    T: CustomResourceExt,
{
    let filename = format!("{}.crd.yaml", T::crd_name());
    let yaml = serde_yaml::to_string(&T::crd())?;
    fs::write(output_dir.join(&filename), format!("{COPYRIGHT_HEADER}{yaml}"))?;
    println!("  ✓ Generated {filename}");
    Ok(())
}

fn write_schema(
    output_dir: &Path,
    name: &str,
    schema: &Schema,
) -> Result<(), Box<dyn std::error::Error>> {
    let filename = format!("{name}.json");
    fs::write(
        output_dir.join(&filename),
        serde_json::to_string_pretty(schema)? + "\n",
    )?;
    println!("  ✓ Generated {filename}");
    Ok(())
}
