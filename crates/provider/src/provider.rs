//! CRUD translator
//!
//! Replays the package schema against the live API: every lifecycle request
//! becomes exactly one logical HTTP request against `baseUrl + path`.

use crate::error::{ProviderError, Result};
use crate::protocol::{
    CheckResult, CreateResult, DiffResult, PluginInfo, ReadResult, ResourceProvider, UpdateResult,
};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::urn;
use crate::value::{carry_secrets, map_from_json, map_to_json, PropertyMap, PropertyValue};
use restbridge_common::{EndpointMetadata, PackageSpec};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// File name of the schema artifact
pub const SCHEMA_FILE: &str = "schema.json";

/// File name of the endpoint metadata artifact
pub const METADATA_FILE: &str = "metadata.json";

/// Field of a resource response that carries the server-assigned id
const ID_FIELD: &str = "id";

/// Resource provider backed by a REST API
pub struct RestProvider {
    schema: Arc<PackageSpec>,
    metadata: Arc<EndpointMetadata>,
    transport: Box<dyn Transport>,
    version: String,
    cancelled: AtomicBool,
}

impl RestProvider {
    pub fn new(
        schema: PackageSpec,
        metadata: EndpointMetadata,
        transport: impl Transport + 'static,
    ) -> Self {
        Self::from_shared(Arc::new(schema), Arc::new(metadata), transport)
    }

    /// Build a provider over artifacts shared with other instances
    pub fn from_shared(
        schema: Arc<PackageSpec>,
        metadata: Arc<EndpointMetadata>,
        transport: impl Transport + 'static,
    ) -> Self {
        let missing = metadata.missing_tokens(schema.resources.keys());
        if !missing.is_empty() {
            warn!(
                tokens = ?missing,
                "resources without a creation path will fail to create"
            );
        }

        Self {
            version: schema.version.clone(),
            schema,
            metadata,
            transport: Box::new(transport),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Load `schema.json` and `metadata.json` from a directory
    pub fn from_artifact_dir(dir: &Path, transport: impl Transport + 'static) -> Result<Self> {
        let schema = PackageSpec::load(&dir.join(SCHEMA_FILE))?;
        let metadata = EndpointMetadata::load(&dir.join(METADATA_FILE))?;
        Ok(Self::new(schema, metadata, transport))
    }

    /// Build a provider from artifacts embedded as JSON strings
    pub fn from_embedded(
        schema_json: &str,
        metadata_json: &str,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        let schema = PackageSpec::from_json(schema_json)?;
        let metadata = EndpointMetadata::from_json(metadata_json)?;
        Ok(Self::new(schema, metadata, transport))
    }

    /// Override the version reported by `plugin_info`
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn schema(&self) -> &PackageSpec {
        &self.schema
    }

    pub fn metadata(&self) -> &EndpointMetadata {
        &self.metadata
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resource type named by `urn`, which must be in the schema
    fn resource_token<'u>(&self, urn: &'u str) -> Result<&'u str> {
        let token = urn::resource_type(urn)?;
        if self.schema.resource(token).is_none() {
            return Err(ProviderError::UnknownResourceType(token.to_string()));
        }
        Ok(token)
    }

    /// Send a request and require a 2xx status
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let response = self.transport.send(&request)?;
        if !response.is_success() {
            warn!(
                method = %request.method,
                url = %request.url,
                status = response.status,
                "remote request failed"
            );
            return Err(ProviderError::RemoteRequest {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    /// Send a request and decode the JSON object it returns
    ///
    /// A 204 response decodes to an empty property map.
    fn send_json(&self, request: HttpRequest) -> Result<PropertyMap> {
        let response = self.send(request)?;
        if response.status == 204 {
            return Ok(PropertyMap::new());
        }

        let value: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            ProviderError::InvalidResponse(format!("decoding JSON {}: {}", response.body, e))
        })?;
        map_from_json(value).ok_or_else(|| {
            ProviderError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                response.body
            ))
        })
    }
}

/// Turn the `id` member of a create response into a path segment
fn identity_segment(token: &str, value: Option<PropertyValue>) -> Result<String> {
    match value {
        Some(PropertyValue::String(id)) if !id.is_empty() => Ok(id),
        Some(PropertyValue::Number(id)) => Ok(id.to_string()),
        None | Some(PropertyValue::Null) | Some(PropertyValue::String(_)) => {
            Err(ProviderError::MissingIdentityField(token.to_string()))
        }
        Some(other) => Err(ProviderError::InvalidResponse(format!(
            "'{}' of '{}' is not a string or number: {}",
            ID_FIELD,
            token,
            other.to_json()
        ))),
    }
}

impl ResourceProvider for RestProvider {
    fn check_config(&self, _urn: &str, news: PropertyMap) -> Result<CheckResult> {
        Ok(CheckResult {
            inputs: news,
            failures: Vec::new(),
        })
    }

    fn configure(&self, config: PropertyMap) -> Result<()> {
        debug!(keys = config.len(), "ignoring provider configuration");
        Ok(())
    }

    fn check(&self, urn: &str, _olds: PropertyMap, news: PropertyMap) -> Result<CheckResult> {
        let token = self.resource_token(urn)?;
        debug!(%token, "checked inputs");
        Ok(CheckResult {
            inputs: news,
            failures: Vec::new(),
        })
    }

    fn diff(
        &self,
        _id: &str,
        _urn: &str,
        _olds: PropertyMap,
        _news: PropertyMap,
    ) -> Result<DiffResult> {
        Ok(DiffResult::default())
    }

    fn create(&self, urn: &str, inputs: PropertyMap) -> Result<CreateResult> {
        let token = self.resource_token(urn)?;
        let path = self
            .metadata
            .creation_path(token)
            .ok_or_else(|| ProviderError::MissingEndpoint(token.to_string()))?;
        let url = self.metadata.url_for(path);

        info!(%token, %url, "creating resource");
        let request = HttpRequest::new(Method::Post, url).with_body(map_to_json(&inputs));
        let mut properties = self.send_json(request)?;

        let segment = identity_segment(token, properties.remove(ID_FIELD))?;
        let id = format!("{}/{}", path.trim_end_matches('/'), segment);
        info!(%token, %id, "created resource");

        Ok(CreateResult { id, properties })
    }

    fn read(&self, id: &str, urn: &str, properties: PropertyMap) -> Result<ReadResult> {
        let url = self.metadata.url_for(id);
        debug!(%urn, %url, "reading resource");

        let mut outputs = self.send_json(HttpRequest::new(Method::Get, url))?;
        outputs.remove(ID_FIELD);

        Ok(ReadResult {
            id: id.to_string(),
            properties: carry_secrets(outputs, &properties),
            inputs: properties,
        })
    }

    fn update(
        &self,
        id: &str,
        urn: &str,
        _olds: PropertyMap,
        news: PropertyMap,
    ) -> Result<UpdateResult> {
        let url = self.metadata.url_for(id);
        info!(%urn, %url, "updating resource");

        let request = HttpRequest::new(Method::Patch, url).with_body(map_to_json(&news));
        let mut outputs = self.send_json(request)?;
        outputs.remove(ID_FIELD);

        Ok(UpdateResult {
            properties: carry_secrets(outputs, &news),
        })
    }

    fn delete(&self, id: &str, urn: &str, _properties: PropertyMap) -> Result<()> {
        let url = self.metadata.url_for(id);
        info!(%urn, %url, "deleting resource");

        self.send(HttpRequest::new(Method::Delete, url))?;
        Ok(())
    }

    fn cancel(&self) {
        info!("cancellation requested");
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn plugin_info(&self) -> PluginInfo {
        PluginInfo {
            version: self.version.clone(),
        }
    }
}
