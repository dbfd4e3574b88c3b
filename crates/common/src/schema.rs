//! Normalized package schema
//!
//! The package schema is the generation-time artifact consumed by the SDK
//! emitters and by the provider runtime. All maps are ordered by key so that
//! serializing the same schema always produces the same bytes.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Build the fully-qualified token of a resource (`<pkg>:index:<Resource>`)
pub fn resource_token(package: &str, resource: &str) -> String {
    format!("{}:index:{}", package, resource)
}

/// Descriptor of a single resource property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Primitive type name as declared in the API description (e.g. "string")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A set of named properties plus the names that are required
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    pub properties: BTreeMap<String, PropertySpec>,
    pub required: BTreeSet<String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, marking it required when `required` is set
    pub fn insert(&mut self, name: &str, spec: PropertySpec, required: bool) {
        self.properties.insert(name.to_string(), spec);
        if required {
            self.required.insert(name.to_string());
        }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Resource shape: observable outputs and configurable inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    #[serde(rename = "type", default = "object_type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub input_properties: BTreeMap<String, PropertySpec>,

    #[serde(default)]
    pub required_inputs: Vec<String>,
}

fn object_type() -> String {
    "object".to_string()
}

impl ResourceSpec {
    /// Build a resource from its output bag and input bag
    ///
    /// Required sets are emitted sorted so the artifact is reproducible.
    pub fn from_bags(output: PropertyBag, input: PropertyBag) -> Self {
        Self {
            kind: object_type(),
            description: None,
            properties: output.properties,
            required: output.required.into_iter().collect(),
            input_properties: input.properties,
            required_inputs: input.required.into_iter().collect(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Output properties as a bag
    pub fn output_bag(&self) -> PropertyBag {
        PropertyBag {
            properties: self.properties.clone(),
            required: self.required.iter().cloned().collect(),
        }
    }

    /// Input properties as a bag
    pub fn input_bag(&self) -> PropertyBag {
        PropertyBag {
            properties: self.input_properties.clone(),
            required: self.required_inputs.iter().cloned().collect(),
        }
    }
}

/// Normalized package schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Package name, used as the first segment of every resource token
    pub name: String,

    /// Version stamp
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Complex types (not produced by inference, kept for the emitters)
    #[serde(default)]
    pub types: BTreeMap<String, serde_json::Value>,

    /// Resources keyed by token
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceSpec>,

    /// Functions (not produced by inference)
    #[serde(default)]
    pub functions: BTreeMap<String, serde_json::Value>,

    /// Opaque per-ecosystem hints for the SDK emitters
    #[serde(default)]
    pub language: BTreeMap<String, serde_json::Value>,
}

impl PackageSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Look up a resource by token
    pub fn resource(&self, token: &str) -> Option<&ResourceSpec> {
        self.resources.get(token)
    }

    /// Resource name part of a token belonging to this package
    pub fn resource_name<'a>(&self, token: &'a str) -> Option<&'a str> {
        token
            .strip_prefix(&self.name)
            .and_then(|rest| rest.strip_prefix(":index:"))
    }

    /// Parse a schema from its JSON artifact form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse package schema: {}", e)))
    }

    /// Serialize into the human-readable JSON artifact form
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a schema artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Load(format!("Failed to read schema {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }
}
