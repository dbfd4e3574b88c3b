//! Schema assembly
//!
//! Folds every discovered resource through property inference and produces
//! the package schema, the endpoint metadata, and the diagnostics of the run.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::discovery::{discover_resources, CrudAction, DiscoveryOptions, OperationGroup};
use crate::inference::PropertyInferrer;
use crate::swagger::ApiDescription;
use restbridge_common::{
    EndpointMetadata, GeneratorConfig, GeneratorError, PackageSpec, ResourceSpec, Result,
};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Everything produced by a single assembly run
#[derive(Debug, Clone)]
pub struct AssembledSchema {
    pub schema: PackageSpec,
    pub metadata: EndpointMetadata,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds a package schema from an API description
pub struct SchemaAssembler<'a> {
    api: &'a ApiDescription,
    options: DiscoveryOptions,
    language: BTreeMap<String, Value>,
    version: String,
}

impl<'a> SchemaAssembler<'a> {
    pub fn new(api: &'a ApiDescription, config: &GeneratorConfig) -> Self {
        Self {
            api,
            options: DiscoveryOptions::new(&config.package)
                .with_separator(&config.operation_id_separator),
            language: config.language.clone(),
            version: String::new(),
        }
    }

    /// Stamp the assembled schema with a version
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Run discovery and inference over the whole description
    ///
    /// Any inference failure aborts the run and names the resource token it
    /// occurred in. Skipped operations and resources are reported through
    /// [`AssembledSchema::diagnostics`].
    pub fn assemble(&self) -> Result<AssembledSchema> {
        let discovery = discover_resources(self.api, &self.options);
        let inferrer = PropertyInferrer::new(self.api);

        let mut schema = PackageSpec::new(&self.options.package).with_version(&self.version);
        schema.language = self.language.clone();
        let mut metadata = EndpointMetadata::new(&self.api.base_url());
        let mut diagnostics = discovery.diagnostics;

        for (token, group) in &discovery.groups {
            let Some(path) = discovery.creation_paths.get(token) else {
                warn!(%token, "skipping resource without a POST operation");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MissingCreationPath,
                    token.as_str(),
                    "no POST operation belongs to this resource",
                ));
                continue;
            };

            let resource = build_resource(&inferrer, group).map_err(|e| e.for_resource(token))?;
            debug!(
                %token,
                inputs = resource.input_properties.len(),
                outputs = resource.properties.len(),
                "assembled resource"
            );

            schema.resources.insert(token.clone(), resource);
            metadata.resource_urls.insert(token.clone(), path.clone());
        }

        let missing = metadata.missing_tokens(schema.resources.keys());
        if !missing.is_empty() {
            return Err(GeneratorError::Generation(format!(
                "resources without a creation path: {}",
                missing.join(", ")
            )));
        }

        info!(
            package = %schema.name,
            resources = schema.resources.len(),
            skipped = diagnostics.len(),
            "assembled package schema"
        );

        Ok(AssembledSchema {
            schema,
            metadata,
            diagnostics,
        })
    }
}

fn build_resource(inferrer: &PropertyInferrer<'_>, group: &OperationGroup) -> Result<ResourceSpec> {
    let action = |action: CrudAction| {
        group.operation(action).ok_or_else(|| {
            GeneratorError::Generation(format!(
                "resource '{}' has no {} operation",
                group.name, action
            ))
        })
    };
    let create = action(CrudAction::Create)?;
    let get = action(CrudAction::Get)?;

    let input = inferrer.body_properties(&create.operation)?;
    let output = inferrer.response_properties(&get.operation)?;

    let description = create
        .operation
        .description
        .clone()
        .or_else(|| create.operation.summary.clone());

    Ok(ResourceSpec::from_bags(output, input).with_description(description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn todo_api() -> Value {
        json!({
            "swagger": "2.0",
            "host": "todo.example.com",
            "basePath": "/api",
            "schemes": ["http"],
            "paths": {
                "/todos": {
                    "post": {
                        "operationId": "Todo_Create",
                        "description": "Create a todo",
                        "parameters": [{"name": "todo", "in": "body", "schema": {"$ref": "#/definitions/Todo"}}]
                    }
                },
                "/todos/{id}": {
                    "get": {
                        "operationId": "Todo_Get",
                        "responses": {"200": {"schema": {"$ref": "#/definitions/Todo"}}}
                    },
                    "patch": {"operationId": "Todo_Update"},
                    "delete": {"operationId": "Todo_Delete"}
                },
                "/health": {"get": {"operationId": "health"}}
            },
            "definitions": {
                "Todo": {
                    "type": "object",
                    "required": ["title"],
                    "properties": {
                        "id": {"type": "string", "readOnly": true},
                        "title": {"type": "string"},
                        "completed": {"type": "boolean"}
                    }
                }
            }
        })
    }

    fn assemble(document: Value) -> Result<AssembledSchema> {
        let api = ApiDescription::from_value(document).unwrap();
        SchemaAssembler::new(&api, &GeneratorConfig::default())
            .with_version("1.2.3")
            .assemble()
    }

    #[test]
    fn test_non_create_post_keeps_creation_path() {
        let mut document = todo_api();
        document["paths"]["/todos/{id}/archive"] = json!({
            "post": {"operationId": "Todo_Archive"}
        });

        let assembled = assemble(document).unwrap();
        assert_eq!(
            assembled.metadata.creation_path("xyz:index:Todo"),
            Some("/todos")
        );
    }

    #[test]
    fn test_assemble_todo() {
        let assembled = assemble(todo_api()).unwrap();
        let schema = &assembled.schema;

        assert_eq!(schema.name, "xyz");
        assert_eq!(schema.version, "1.2.3");
        assert!(schema.language.contains_key("nodejs"));

        let todo = schema.resource("xyz:index:Todo").unwrap();
        assert_eq!(todo.description.as_deref(), Some("Create a todo"));
        assert_eq!(todo.required, vec!["completed", "title"]);
        assert_eq!(todo.required_inputs, vec!["title"]);
        assert!(!todo.properties.contains_key("id"));
        assert!(!todo.input_properties.contains_key("id"));

        assert_eq!(assembled.metadata.base_url, "http://todo.example.com/api");
        assert_eq!(
            assembled.metadata.creation_path("xyz:index:Todo"),
            Some("/todos")
        );

        assert_eq!(assembled.diagnostics.len(), 1);
        assert_eq!(
            assembled.diagnostics[0].kind,
            DiagnosticKind::AmbiguousOperationId
        );
    }

    #[test]
    fn test_every_resource_has_creation_path() {
        let assembled = assemble(todo_api()).unwrap();
        assert!(assembled
            .metadata
            .missing_tokens(assembled.schema.resources.keys())
            .is_empty());
    }

    #[test]
    fn test_create_without_post_is_skipped() {
        let mut document = todo_api();
        let create = document["paths"]["/todos"]["post"].take();
        document["paths"]["/todos"] = json!({"patch": create});
        document["paths"]["/todos/{id}"]["patch"] = json!({"operationId": "Todo_Update"});

        let assembled = assemble(document).unwrap();
        assert!(assembled.schema.resources.is_empty());
        assert!(assembled.metadata.resource_urls.is_empty());
        assert!(assembled.diagnostics.iter().any(|d| {
            d.kind == DiagnosticKind::MissingCreationPath && d.subject == "xyz:index:Todo"
        }));
    }

    #[test]
    fn test_inference_error_names_resource() {
        let mut document = todo_api();
        document["paths"]["/todos/{id}"]["get"]["responses"] = json!({"404": {}});

        match assemble(document) {
            Err(GeneratorError::Resource { token, source }) => {
                assert_eq!(token, "xyz:index:Todo");
                assert!(matches!(*source, GeneratorError::NoSuccessResponse(_)));
            }
            other => panic!("expected resource error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_with_path_parameter_fails() {
        let mut document = todo_api();
        document["paths"]["/todos"]["parameters"] =
            json!([{"name": "tenant", "in": "header", "type": "string"}]);

        let err = assemble(document).unwrap_err();
        assert!(err.to_string().contains("tenant"));
    }

    #[test]
    fn test_schema_round_trips_through_artifact() {
        let assembled = assemble(todo_api()).unwrap();
        let json = assembled.schema.to_json_pretty().unwrap();
        assert_eq!(PackageSpec::from_json(&json).unwrap(), assembled.schema);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let first = assemble(todo_api()).unwrap();
        let second = assemble(todo_api()).unwrap();
        assert_eq!(
            first.schema.to_json_pretty().unwrap(),
            second.schema.to_json_pretty().unwrap()
        );
        assert_eq!(first.metadata, second.metadata);
    }
}
