//! API description loader

use super::types::{
    HttpMethod, Operation, Parameter, ParameterOrRef, PathItem, Schema, SwaggerSpec,
};
use restbridge_common::{GeneratorError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Timeout for fetching a description over HTTP
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Scheme used when the description declares none
const DEFAULT_SCHEME: &str = "https";

/// Where the API is served, as declared by the description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub scheme: String,
    pub host: String,
    pub base_path: String,
}

impl ConnectionInfo {
    /// `scheme://host/basePath`
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.base_path)
    }
}

/// A loaded, immutable API description
///
/// Keeps the raw JSON document next to the typed view so that `$ref`
/// pointers can be resolved against any part of the document.
#[derive(Debug, Clone)]
pub struct ApiDescription {
    raw: Value,
    spec: SwaggerSpec,
}

impl ApiDescription {
    /// Load a description from a file path or an http(s) URL
    pub fn load(source: &str) -> Result<Self> {
        if is_url(source) {
            Self::from_url(source)
        } else {
            Self::from_file(source)
        }
    }

    /// Load a description from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GeneratorError::Load(format!(
                "Failed to read API description {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Fetch a description over HTTP
    pub fn from_url(url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| GeneratorError::Load(format!("Failed to build HTTP client: {}", e)))?;

        let response = client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| GeneratorError::Load(format!("Failed to fetch {}: {}", url, e)))?;

        let content = response
            .text()
            .map_err(|e| GeneratorError::Load(format!("Failed to read body of {}: {}", url, e)))?;

        Self::from_json(&content)
    }

    /// Parse a description from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json).map_err(|e| {
            GeneratorError::Load(format!("API description is not valid JSON: {}", e))
        })?;

        Self::from_value(raw)
    }

    /// Build a description from an already decoded JSON document
    pub fn from_value(raw: Value) -> Result<Self> {
        if raw.get("paths").is_none() {
            return Err(GeneratorError::Parse(
                "API description has no 'paths' object".to_string(),
            ));
        }

        let spec = SwaggerSpec::deserialize(&raw)
            .map_err(|e| GeneratorError::Parse(format!("Malformed API description: {}", e)))?;

        Ok(Self { raw, spec })
    }

    /// Typed view of the document
    pub fn spec(&self) -> &SwaggerSpec {
        &self.spec
    }

    /// Iterate over every `(path, method, operation)` in path order
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> + '_ {
        self.spec.paths.iter().flat_map(|(path, item)| {
            HttpMethod::ALL.into_iter().filter_map(move |method| {
                item.operation(method)
                    .map(|op| (path.as_str(), method, op))
            })
        })
    }

    /// Path item declared for `path`
    pub fn path_item(&self, path: &str) -> Option<&PathItem> {
        self.spec.paths.get(path)
    }

    /// Resolve a local JSON pointer such as `#/definitions/Todo`
    pub fn resolve_pointer(&self, reference: &str) -> Result<&Value> {
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| GeneratorError::RefNotFound(reference.to_string()))?;

        self.raw
            .pointer(pointer)
            .ok_or_else(|| GeneratorError::RefNotFound(reference.to_string()))
    }

    /// Resolve a pointer to a schema fragment
    pub fn resolve_schema(&self, reference: &str) -> Result<Schema> {
        let value = self.resolve_pointer(reference)?;
        Schema::deserialize(value).map_err(|e| {
            GeneratorError::Parse(format!("'{}' is not a valid schema: {}", reference, e))
        })
    }

    /// Resolve a parameter, following a `$ref` when present
    pub fn resolve_parameter(&self, parameter: &ParameterOrRef) -> Result<Parameter> {
        match parameter {
            ParameterOrRef::Parameter(param) => Ok(param.as_ref().clone()),
            ParameterOrRef::Reference { ref_path } => {
                let value = self.resolve_pointer(ref_path)?;
                Parameter::deserialize(value).map_err(|e| {
                    GeneratorError::Parse(format!("'{}' is not a valid parameter: {}", ref_path, e))
                })
            }
        }
    }

    /// Connection info declared at the top of the document
    pub fn connection(&self) -> ConnectionInfo {
        ConnectionInfo {
            scheme: self
                .spec
                .schemes
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_SCHEME.to_string()),
            host: self.spec.host.clone().unwrap_or_default(),
            base_path: self
                .spec
                .base_path
                .as_deref()
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    /// Base URL every resource path is appended to
    pub fn base_url(&self) -> String {
        self.connection().base_url()
    }
}

/// Check if a source string looks like a URL
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
