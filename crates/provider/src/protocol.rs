//! Lifecycle protocol served to the host orchestrator
//!
//! The host owns the wire transport and version negotiation. This module
//! only describes the requests a provider answers.

use crate::error::Result;
use crate::value::PropertyMap;

/// A single validation failure reported by `check`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub property: String,
    pub reason: String,
}

/// Result of `check` and `check_config`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckResult {
    /// Inputs to pass to later `diff`, `create` and `update` calls
    pub inputs: PropertyMap,
    pub failures: Vec<CheckFailure>,
}

/// Whether the provider detected changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffChanges {
    /// The provider has no opinion; the host compares properties itself
    #[default]
    Unknown,
    None,
    Some,
}

/// Result of `diff`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffResult {
    pub changes: DiffChanges,

    /// Properties whose change forces a replacement
    pub replaces: Vec<String>,
}

/// Result of `create`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResult {
    /// Live resource identity used by every later request
    pub id: String,
    pub properties: PropertyMap,
}

/// Result of `read`
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResult {
    pub id: String,
    pub properties: PropertyMap,
    pub inputs: PropertyMap,
}

/// Result of `update`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult {
    pub properties: PropertyMap,
}

/// Plugin metadata returned by `plugin_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub version: String,
}

/// Requests a resource provider answers
///
/// Requests are independent. Implementations hold no per-resource state and
/// may be called from many threads at once.
pub trait ResourceProvider: Send + Sync {
    /// Validate provider configuration
    fn check_config(&self, urn: &str, news: PropertyMap) -> Result<CheckResult>;

    /// Apply provider configuration
    fn configure(&self, config: PropertyMap) -> Result<()>;

    /// Validate the inputs of a resource
    fn check(&self, urn: &str, olds: PropertyMap, news: PropertyMap) -> Result<CheckResult>;

    /// Compare old and new properties of a resource
    fn diff(&self, id: &str, urn: &str, olds: PropertyMap, news: PropertyMap)
        -> Result<DiffResult>;

    /// Create a resource and return its live identity
    fn create(&self, urn: &str, inputs: PropertyMap) -> Result<CreateResult>;

    /// Read the live state of a resource
    fn read(&self, id: &str, urn: &str, properties: PropertyMap) -> Result<ReadResult>;

    /// Update a resource in place
    fn update(&self, id: &str, urn: &str, olds: PropertyMap, news: PropertyMap)
        -> Result<UpdateResult>;

    /// Delete a resource; on error the resource must be assumed to still exist
    fn delete(&self, id: &str, urn: &str, properties: PropertyMap) -> Result<()>;

    /// Advisory cancellation of future requests
    fn cancel(&self);

    fn plugin_info(&self) -> PluginInfo;
}
