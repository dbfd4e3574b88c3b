//! Common types and utilities for restbridge
//!
//! This crate contains the normalized package schema, the endpoint metadata
//! artifact, generation-time error types, and configuration loading shared by
//! the parser, generator, provider, and CLI components.

mod config;
mod metadata;
mod schema;

pub use config::{GeneratorConfig, DEFAULT_CONFIG_FILE};
pub use metadata::EndpointMetadata;
pub use schema::{resource_token, PackageSpec, PropertyBag, PropertySpec, ResourceSpec};

use thiserror::Error;

/// Errors that can occur while loading an API description or generating artifacts
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The description could not be fetched, read, or decoded as JSON
    #[error("Load error: {0}")]
    Load(String),

    /// The JSON does not have the structure of an API description
    #[error("Parse error: {0}")]
    Parse(String),

    /// A JSON pointer did not resolve within the document
    #[error("Reference not found: {0}")]
    RefNotFound(String),

    /// A create operation declared a parameter other than a single body
    #[error("Unsupported parameter '{name}' in '{location}': only a body parameter is supported for create operations")]
    UnsupportedParameter { name: String, location: String },

    /// A `$ref` inside a schema fragment could not be resolved
    #[error("Unresolvable reference '{0}'")]
    UnresolvableRef(String),

    /// The read operation has no 2xx response carrying a schema
    #[error("No 2xx response with a schema found for operation '{0}'")]
    NoSuccessResponse(String),

    /// Inference failed for a specific resource
    #[error("Failed to generate '{token}': {source}")]
    Resource {
        token: String,
        #[source]
        source: Box<GeneratorError>,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Attach the resource token that was being generated when this error occurred
    pub fn for_resource(self, token: &str) -> Self {
        GeneratorError::Resource {
            token: token.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_error_names_token() {
        let err = GeneratorError::NoSuccessResponse("Todo_Get".to_string())
            .for_resource("xyz:index:Todo");
        let message = err.to_string();
        assert!(message.contains("xyz:index:Todo"));
        assert!(message.contains("Todo_Get"));
    }

    #[test]
    fn test_unsupported_parameter_message() {
        let err = GeneratorError::UnsupportedParameter {
            name: "todoId".to_string(),
            location: "path".to_string(),
        };
        assert!(err.to_string().contains("todoId"));
        assert!(err.to_string().contains("path"));
    }
}
