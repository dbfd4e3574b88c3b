//! Endpoint metadata artifact
//!
//! Side-channel data the provider runtime needs but the package schema does
//! not carry: the API base URL and the creation path of every resource.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// API base URL plus creation path per resource token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMetadata {
    /// Shared base URL, e.g. `https://todo-backend.example.com/api`
    pub base_url: String,

    /// Resource token -> path used to create that resource
    #[serde(default)]
    pub resource_urls: BTreeMap<String, String>,
}

impl EndpointMetadata {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            resource_urls: BTreeMap::new(),
        }
    }

    /// Creation path recorded for a resource token
    pub fn creation_path(&self, token: &str) -> Option<&str> {
        self.resource_urls.get(token).map(String::as_str)
    }

    /// Join the base URL with a path or live identity
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Tokens from `tokens` that have no creation path recorded
    pub fn missing_tokens<'a, I>(&self, tokens: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tokens
            .into_iter()
            .filter(|token| !self.resource_urls.contains_key(*token))
            .map(String::as_str)
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse endpoint metadata: {}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a metadata artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Load(format!("Failed to read metadata {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let mut metadata = EndpointMetadata::new("http://localhost:8080/api");
        metadata
            .resource_urls
            .insert("xyz:index:Todo".to_string(), "/todos".to_string());

        let value: serde_json::Value =
            serde_json::from_str(&metadata.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "baseUrl": "http://localhost:8080/api",
                "resourceUrls": {"xyz:index:Todo": "/todos"}
            })
        );
    }

    #[test]
    fn test_url_for_identity() {
        let metadata = EndpointMetadata::new("http://localhost:8080");
        assert_eq!(metadata.url_for("/todos/1"), "http://localhost:8080/todos/1");
    }

    #[test]
    fn test_missing_tokens() {
        let mut metadata = EndpointMetadata::new("http://localhost");
        metadata
            .resource_urls
            .insert("xyz:index:Todo".to_string(), "/todos".to_string());

        let tokens = vec!["xyz:index:Todo".to_string(), "xyz:index:Tag".to_string()];
        assert_eq!(metadata.missing_tokens(&tokens), vec!["xyz:index:Tag"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"baseUrl": "https://api.example.com", "resourceUrls": {"xyz:index:Todo": "/todos"}}"#,
        )
        .unwrap();

        let metadata = EndpointMetadata::load(&path).unwrap();
        assert_eq!(metadata.creation_path("xyz:index:Todo"), Some("/todos"));
        assert_eq!(metadata.creation_path("xyz:index:Tag"), None);
    }
}
