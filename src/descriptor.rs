// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CRD descriptors: the runtime description of one CRD version.
//!
//! A [`CrdDescriptor`] drives one resource, one manifest data source and one lookup
//! data source. Descriptors are built from typed custom resources compiled into the
//! crate ([`CrdDescriptor::from_custom_resource`]) or from
//! `apiextensions.k8s.io/v1` `CustomResourceDefinition` documents loaded at runtime
//! ([`load_crd_documents`]).
//!
//! # Type Names
//!
//! | CRD | Resource type |
//! |-----|---------------|
//! | `chaos-mesh.org/v1alpha1` `PodChaos` | `k8s_chaos_mesh_org_pod_chaos_v1alpha1` |
//! | `litmuschaos.io/v1alpha1` `ChaosEngine` | `k8s_litmuschaos_io_chaos_engine_v1alpha1` |
//!
//! The manifest data source appends `_manifest` to the resource type name.

use crate::constants::{
    ATTR_API_VERSION, ATTR_FIELD_MANAGER, ATTR_FORCE_CONFLICTS, ATTR_ID, ATTR_KIND,
    ATTR_METADATA, ATTR_WAIT_FOR, ATTR_YAML, IMPORT_ID_SEPARATOR, MANIFEST_SUFFIX,
    PROVIDER_TYPE_NAME, RESERVED_TOP_LEVEL_FIELDS,
};
use crate::errors::{ProviderError, Result};
use crate::schema::openapi::{attribute_name, attributes_from_openapi};
use crate::schema::{
    computed_attributes, Attribute, AttributeKind, AttributeMode, Attributes, ElementType,
    Schema, Validator,
};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, JSONSchemaProps,
};
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind};
use kube::{Client, CustomResourceExt, Resource};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// DNS-1123 subdomain, the format of object names
const NAME_PATTERN: &str =
    r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$";

/// DNS-1123 label, the format of namespace names
const NAMESPACE_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

/// File extensions read by [`load_crd_dir`]
const CRD_FILE_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Attribute names the provider adds next to the CRD content
const WRAPPER_ATTRIBUTES: [&str; 8] = [
    ATTR_ID,
    ATTR_FORCE_CONFLICTS,
    ATTR_FIELD_MANAGER,
    ATTR_WAIT_FOR,
    ATTR_API_VERSION,
    ATTR_KIND,
    ATTR_METADATA,
    ATTR_YAML,
];

/// Runtime description of one served CRD version.
#[derive(Debug, Clone)]
pub struct CrdDescriptor {
    pub api_resource: ApiResource,
    pub namespaced: bool,
    pub description: String,
    /// Top-level content attributes (everything except `apiVersion`, `kind`,
    /// `metadata` and `status`)
    pub content: Attributes,
}

impl CrdDescriptor {
    /// Build a descriptor from the OpenAPI schema of one CRD version.
    #[must_use]
    pub fn from_schema(
        group: &str,
        version: &str,
        kind: &str,
        plural: &str,
        namespaced: bool,
        schema: &JSONSchemaProps,
    ) -> Self {
        let gvk = GroupVersionKind::gvk(group, version, kind);
        let api_resource = ApiResource::from_gvk_with_plural(&gvk, plural);

        let mut root = schema.clone();
        if let Some(properties) = root.properties.as_mut() {
            properties.retain(|name, _| !RESERVED_TOP_LEVEL_FIELDS.contains(&name.as_str()));
        }

        let mut content = Attributes::new();
        for (name, attribute) in attributes_from_openapi(&root) {
            let mut name = name;
            while WRAPPER_ATTRIBUTES.contains(&name.as_str()) || content.contains_key(&name) {
                name.push('_');
            }
            content.insert(name, attribute);
        }

        Self {
            api_resource,
            namespaced,
            description: schema.description.clone().unwrap_or_default(),
            content,
        }
    }

    /// Build descriptors for every served version of a CRD that carries a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::CrdLoad`] when no served version has an OpenAPI schema.
    pub fn from_crd(crd: &CustomResourceDefinition) -> Result<Vec<Self>> {
        let spec = &crd.spec;
        let namespaced = spec.scope == "Namespaced";
        let crd_name = crd.metadata.name.clone().unwrap_or_else(|| spec.names.plural.clone());

        let descriptors: Vec<Self> = spec
            .versions
            .iter()
            .filter(|version| version.served)
            .filter_map(|version| {
                let schema = version
                    .schema
                    .as_ref()
                    .and_then(|s| s.open_api_v3_schema.as_ref())?;
                Some(Self::from_schema(
                    &spec.group,
                    &version.name,
                    &spec.names.kind,
                    &spec.names.plural,
                    namespaced,
                    schema,
                ))
            })
            .collect();

        if descriptors.is_empty() {
            return Err(ProviderError::CrdLoad {
                source_name: crd_name,
                reason: "no served version with an OpenAPI v3 schema".to_string(),
            });
        }

        Ok(descriptors)
    }

    /// Build the descriptor of a typed custom resource compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::CrdLoad`] when the generated CRD has no schema for
    /// the resource's version.
    pub fn from_custom_resource<K>() -> Result<Self>
    where
        K: CustomResourceExt + Resource<DynamicType = ()>,
    {
        let version = K::version(&());
        Self::from_crd(&K::crd())?
            .into_iter()
            .find(|d| d.api_resource.version == version)
            .ok_or_else(|| ProviderError::CrdLoad {
                source_name: K::crd_name().to_string(),
                reason: format!("no schema for version {version}"),
            })
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.api_resource.kind
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.api_resource.group
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.api_resource.version
    }

    #[must_use]
    pub fn plural(&self) -> &str {
        &self.api_resource.plural
    }

    /// `group/version`, or just `version` for the core group.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_resource.api_version
    }

    /// Resource type name, e.g. `k8s_chaos_mesh_org_pod_chaos_v1alpha1`.
    #[must_use]
    pub fn type_name(&self) -> String {
        let mut parts = vec![PROVIDER_TYPE_NAME.to_string()];
        if !self.group().is_empty() {
            parts.push(attribute_name(&self.group().replace('.', "_")));
        }
        parts.push(attribute_name(self.kind()));
        parts.push(attribute_name(self.version()));
        parts.join("_")
    }

    /// Manifest data source type name, e.g. `k8s_chaos_mesh_org_pod_chaos_v1alpha1_manifest`.
    #[must_use]
    pub fn manifest_type_name(&self) -> String {
        format!("{}{MANIFEST_SUFFIX}", self.type_name())
    }

    /// Identifier of an object: `namespace/name` for namespaced CRDs, `name` otherwise.
    #[must_use]
    pub fn object_id(&self, namespace: Option<&str>, name: &str) -> String {
        match namespace.filter(|_| self.namespaced) {
            Some(namespace) => format!("{namespace}{IMPORT_ID_SEPARATOR}{name}"),
            None => name.to_string(),
        }
    }

    /// Dynamic API handle for this CRD, scoped to a namespace when namespaced.
    #[must_use]
    pub fn api(&self, client: Client, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace.filter(|_| self.namespaced) {
            Some(namespace) => Api::namespaced_with(client, namespace, &self.api_resource),
            None => Api::all_with(client, &self.api_resource),
        }
    }

    /// Schema of the managed resource.
    #[must_use]
    pub fn resource_schema(&self) -> Schema {
        let mut attributes = self.content.clone();
        attributes.insert(
            ATTR_ID.to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Computed)
                .with_description(self.id_description()),
        );
        attributes.insert(
            ATTR_FORCE_CONFLICTS.to_string(),
            Attribute::new(AttributeKind::Bool, AttributeMode::Optional).with_description(
                "If 'true', server-side apply will force the changes against conflicts.",
            ),
        );
        attributes.insert(
            ATTR_FIELD_MANAGER.to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Optional)
                .with_description("The name of the manager used to track field ownership.")
                .with_validator(Validator::LengthAtLeast { min: 1 }),
        );
        attributes.insert(ATTR_WAIT_FOR.to_string(), wait_for_attribute());
        attributes.insert(ATTR_API_VERSION.to_string(), self.api_version_attribute());
        attributes.insert(ATTR_KIND.to_string(), self.kind_attribute());
        attributes.insert(
            ATTR_METADATA.to_string(),
            Attribute::new(
                AttributeKind::SingleNested(self.metadata_attributes(true)),
                AttributeMode::Required,
            )
            .with_description("Data that helps uniquely identify this object."),
        );

        Schema {
            description: self.schema_description(),
            version: 0,
            attributes,
        }
    }

    /// Schema of the manifest data source.
    #[must_use]
    pub fn manifest_schema(&self) -> Schema {
        let mut attributes = self.content.clone();
        attributes.insert(
            ATTR_ID.to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Computed)
                .with_description(self.id_description()),
        );
        attributes.insert(
            ATTR_YAML.to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Computed)
                .with_description("The generated manifest in YAML format."),
        );
        attributes.insert(
            ATTR_METADATA.to_string(),
            Attribute::new(
                AttributeKind::SingleNested(self.metadata_attributes(false)),
                AttributeMode::Required,
            )
            .with_description("Data that helps uniquely identify this object."),
        );

        Schema {
            description: format!(
                "Creates a YAML manifest for {}/{} objects. {}",
                self.api_version(),
                self.kind(),
                self.description
            )
            .trim_end()
            .to_string(),
            version: 0,
            attributes,
        }
    }

    /// Schema of the read-only lookup data source.
    #[must_use]
    pub fn data_source_schema(&self) -> Schema {
        let mut metadata = Attributes::new();
        metadata.insert("name".to_string(), self.name_attribute(false));
        if self.namespaced {
            metadata.insert("namespace".to_string(), self.namespace_attribute(false));
        }
        metadata.insert(
            "labels".to_string(),
            Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Computed)
                .with_json_name("labels")
                .with_description("Map of string keys and values attached to the object."),
        );
        metadata.insert(
            "annotations".to_string(),
            Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Computed)
                .with_json_name("annotations")
                .with_description("Unstructured key value map stored with the object."),
        );

        let mut attributes = computed_attributes(self.content.clone());
        attributes.insert(
            ATTR_ID.to_string(),
            Attribute::new(AttributeKind::String, AttributeMode::Computed)
                .with_description(self.id_description()),
        );
        attributes.insert(ATTR_API_VERSION.to_string(), self.api_version_attribute());
        attributes.insert(ATTR_KIND.to_string(), self.kind_attribute());
        attributes.insert(
            ATTR_METADATA.to_string(),
            Attribute::new(AttributeKind::SingleNested(metadata), AttributeMode::Required)
                .with_description("Data that helps uniquely identify this object."),
        );

        Schema {
            description: format!(
                "Reads an existing {}/{} object from the cluster.",
                self.api_version(),
                self.kind()
            ),
            version: 0,
            attributes,
        }
    }

    fn schema_description(&self) -> String {
        if self.description.is_empty() {
            format!("Manages {}/{} objects.", self.api_version(), self.kind())
        } else {
            self.description.clone()
        }
    }

    fn id_description(&self) -> String {
        if self.namespaced {
            "The unique identifier of this object, formatted as '<namespace>/<name>'.".to_string()
        } else {
            "The unique identifier of this object, formatted as '<name>'.".to_string()
        }
    }

    fn api_version_attribute(&self) -> Attribute {
        Attribute::new(AttributeKind::String, AttributeMode::Computed).with_description(format!(
            "The API group and version of the object, always '{}'.",
            self.api_version()
        ))
    }

    fn kind_attribute(&self) -> Attribute {
        Attribute::new(AttributeKind::String, AttributeMode::Computed)
            .with_description(format!("The kind of the object, always '{}'.", self.kind()))
    }

    fn name_attribute(&self, requires_replace: bool) -> Attribute {
        let attribute = Attribute::new(AttributeKind::String, AttributeMode::Required)
            .with_json_name("name")
            .with_description("Unique name of this object within its namespace.")
            .with_validator(Validator::LengthBetween { min: 1, max: 253 })
            .with_validator(Validator::RegexMatches {
                pattern: NAME_PATTERN.to_string(),
            });
        if requires_replace {
            attribute.requiring_replace()
        } else {
            attribute
        }
    }

    fn namespace_attribute(&self, requires_replace: bool) -> Attribute {
        let attribute = Attribute::new(AttributeKind::String, AttributeMode::Required)
            .with_json_name("namespace")
            .with_description("Namespace that contains this object.")
            .with_validator(Validator::LengthBetween { min: 1, max: 63 })
            .with_validator(Validator::RegexMatches {
                pattern: NAMESPACE_PATTERN.to_string(),
            });
        if requires_replace {
            attribute.requiring_replace()
        } else {
            attribute
        }
    }

    fn metadata_attributes(&self, requires_replace: bool) -> Attributes {
        let mut metadata = Attributes::new();
        metadata.insert("name".to_string(), self.name_attribute(requires_replace));
        if self.namespaced {
            metadata.insert(
                "namespace".to_string(),
                self.namespace_attribute(requires_replace),
            );
        }
        metadata.insert(
            "labels".to_string(),
            Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Optional)
                .with_json_name("labels")
                .with_description("Map of string keys and values used to organize and categorize objects."),
        );
        metadata.insert(
            "annotations".to_string(),
            Attribute::new(AttributeKind::Map(ElementType::String), AttributeMode::Optional)
                .with_json_name("annotations")
                .with_description("Unstructured key value map stored with the object."),
        );
        metadata
    }
}

fn wait_for_attribute() -> Attribute {
    let mut condition = Attributes::new();
    condition.insert(
        "jsonpath".to_string(),
        Attribute::new(AttributeKind::String, AttributeMode::Required)
            .with_description("JSONPath expression evaluated against the live object, e.g. '$.status.phase'.")
            .with_validator(Validator::LengthAtLeast { min: 1 }),
    );
    condition.insert(
        "value".to_string(),
        Attribute::new(AttributeKind::String, AttributeMode::Required)
            .with_description("Value the expression must select."),
    );

    Attribute::new(AttributeKind::ListNested(condition), AttributeMode::Optional)
        .with_description("Conditions that must hold on the object before apply completes.")
}

/// Load descriptors from a (possibly multi-document) YAML or JSON string.
///
/// Documents that are not `CustomResourceDefinition`s are skipped.
///
/// # Errors
///
/// Returns [`ProviderError::CrdLoad`] when a document cannot be parsed or a CRD has no
/// usable version.
pub fn load_crd_documents(source_name: &str, text: &str) -> Result<Vec<CrdDescriptor>> {
    let mut descriptors = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document).map_err(|e| ProviderError::CrdLoad {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

        if value.is_null() {
            continue;
        }
        if value.get("kind").and_then(serde_yaml::Value::as_str) != Some("CustomResourceDefinition")
        {
            debug!(source = source_name, "Skipping document that is not a CustomResourceDefinition");
            continue;
        }

        let crd: CustomResourceDefinition =
            serde_yaml::from_value(value).map_err(|e| ProviderError::CrdLoad {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;
        descriptors.extend(CrdDescriptor::from_crd(&crd)?);
    }

    Ok(descriptors)
}

/// Load descriptors from every `*.yaml`, `*.yml` and `*.json` file in a directory.
///
/// Files are read in name order so that duplicate detection is deterministic.
///
/// # Errors
///
/// Returns [`ProviderError::CrdLoad`] when the directory or a file cannot be read or
/// parsed.
pub fn load_crd_dir(dir: &Path) -> Result<Vec<CrdDescriptor>> {
    let read_error = |reason: String| ProviderError::CrdLoad {
        source_name: dir.display().to_string(),
        reason,
    };

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| read_error(e.to_string()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| CRD_FILE_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();

    let mut descriptors = Vec::new();
    for file in files {
        let source_name = file.display().to_string();
        let text = std::fs::read_to_string(&file).map_err(|e| ProviderError::CrdLoad {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;
        let loaded = load_crd_documents(&source_name, &text)?;
        info!(
            file = %source_name,
            count = loaded.len(),
            "Loaded CRD descriptors"
        );
        descriptors.extend(loaded);
    }

    Ok(descriptors)
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod descriptor_tests;
