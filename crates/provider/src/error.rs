//! Runtime error types

use restbridge_common::GeneratorError;
use thiserror::Error;

/// Errors returned by lifecycle requests
///
/// A failed create, update, or delete leaves the remote resource in an
/// unknown state. Callers must assume it still exists.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The resource type taken from the URN is not in the package schema
    #[error("unknown resource type '{0}'")]
    UnknownResourceType(String),

    /// The resource type has no creation path in the endpoint metadata
    #[error("no endpoint recorded for resource type '{0}'")]
    MissingEndpoint(String),

    /// The create response carried no `id` field
    #[error("create response for '{0}' has no 'id' field")]
    MissingIdentityField(String),

    /// The remote API answered with a status outside [200, 300)
    #[error("HTTP request failed with {status}: {body}")]
    RemoteRequest { status: u16, body: String },

    /// The remote API answered with a body that is not a JSON object
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid URN '{0}'")]
    InvalidUrn(String),

    /// The request never produced an HTTP response
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider was cancelled before the request was sent
    #[error("provider has been cancelled")]
    Cancelled,

    /// The schema or metadata artifact could not be loaded
    #[error("artifact error: {0}")]
    Artifact(String),
}

impl From<GeneratorError> for ProviderError {
    fn from(err: GeneratorError) -> Self {
        ProviderError::Artifact(err.to_string())
    }
}

/// Result type for lifecycle requests
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_request_message() {
        let err = ProviderError::RemoteRequest {
            status: 422,
            body: "title is required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP request failed with 422: title is required"
        );
    }

    #[test]
    fn test_generator_error_becomes_artifact() {
        let err: ProviderError = GeneratorError::Parse("bad schema".to_string()).into();
        assert!(matches!(err, ProviderError::Artifact(msg) if msg.contains("bad schema")));
    }
}
