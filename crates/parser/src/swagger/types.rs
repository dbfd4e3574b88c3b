//! Swagger 2.0 type definitions
//!
//! Simplified representation focusing on resource extraction. Maps are
//! ordered so that every walk over the document is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Swagger document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwaggerSpec {
    /// Swagger version (e.g., "2.0")
    #[serde(default)]
    pub swagger: Option<String>,

    /// API metadata
    #[serde(default)]
    pub info: Option<Info>,

    /// Host serving the API (e.g., "todo-backend.example.com")
    #[serde(default)]
    pub host: Option<String>,

    /// Base path prefixed to every path (e.g., "/api")
    #[serde(rename = "basePath")]
    #[serde(default)]
    pub base_path: Option<String>,

    /// Transfer protocols, first one wins
    #[serde(default)]
    pub schemes: Vec<String>,

    /// API paths (endpoints)
    pub paths: BTreeMap<String, PathItem>,

    /// Reusable schema definitions
    #[serde(default)]
    pub definitions: BTreeMap<String, Schema>,

    /// Reusable parameters
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,
}

/// API information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// HTTP verbs an operation can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Every verb a path item may declare
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Post,
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,

    #[serde(default)]
    pub post: Option<Operation>,

    #[serde(default)]
    pub put: Option<Operation>,

    #[serde(default)]
    pub patch: Option<Operation>,

    #[serde(default)]
    pub delete: Option<Operation>,

    /// Parameters shared by every operation of this path
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,
}

impl PathItem {
    /// Operation bound to `method`, if any
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation ID (e.g., "Todo_Create")
    #[serde(rename = "operationId")]
    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    /// Responses keyed by status code (or "default")
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Operation {
    /// Operation id, or an empty string when none is declared
    pub fn id(&self) -> &str {
        self.operation_id.as_deref().unwrap_or_default()
    }

    /// Successful (2xx) responses in ascending status order
    pub fn success_responses(&self) -> Vec<(u16, &Response)> {
        let mut responses: Vec<(u16, &Response)> = self
            .responses
            .iter()
            .filter_map(|(code, response)| code.parse::<u16>().ok().map(|c| (c, response)))
            .filter(|(code, _)| (200..300).contains(code))
            .collect();
        responses.sort_by_key(|(code, _)| *code);
        responses
    }
}

/// Parameter or a `$ref` to a shared parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Reference {
        #[serde(rename = "$ref")]
        ref_path: String,
    },

    Parameter(Box<Parameter>),
}

/// Parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: body, path, query, header, formData
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Schema of a body parameter
    #[serde(default)]
    pub schema: Option<Schema>,

    /// Type of a non-body parameter
    #[serde(rename = "type")]
    #[serde(default)]
    pub param_type: Option<SchemaType>,
}

impl Parameter {
    pub fn is_body(&self) -> bool {
        self.location == "body"
    }
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: Option<Schema>,
}

/// Declared type: a single name or a list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// First declared type name
    pub fn first(&self) -> Option<&str> {
        match self {
            SchemaType::Single(name) => Some(name.as_str()),
            SchemaType::Multiple(names) => names.first().map(String::as_str),
        }
    }
}

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Reference to another schema (e.g., "#/definitions/Todo")
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    /// Type: string, number, integer, boolean, array, object
    #[serde(rename = "type")]
    #[serde(default)]
    pub schema_type: Option<SchemaType>,

    /// Format (e.g., int32, int64, date-time)
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Properties (for object type)
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,

    /// Required properties
    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "readOnly")]
    #[serde(default)]
    pub read_only: bool,

    /// Items schema (for array type)
    #[serde(default)]
    pub items: Option<Box<Schema>>,

    /// Extensions (x-*, etc.)
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Schema {
    /// First declared primitive type name
    pub fn primitive_type(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(SchemaType::first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_type_forms() {
        let single: Schema = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
        assert_eq!(single.primitive_type(), Some("string"));

        let multiple: Schema = serde_json::from_str(r#"{"type": ["integer", "null"]}"#).unwrap();
        assert_eq!(multiple.primitive_type(), Some("integer"));

        let none: Schema = serde_json::from_str(r##"{"$ref": "#/definitions/Todo"}"##).unwrap();
        assert_eq!(none.primitive_type(), None);
        assert_eq!(none.ref_path.as_deref(), Some("#/definitions/Todo"));
    }

    #[test]
    fn test_parameter_or_ref() {
        let reference: ParameterOrRef =
            serde_json::from_str(r##"{"$ref": "#/parameters/todoId"}"##).unwrap();
        assert!(matches!(reference, ParameterOrRef::Reference { .. }));

        let body: ParameterOrRef = serde_json::from_str(
            r##"{"name": "todo", "in": "body", "schema": {"$ref": "#/definitions/Todo"}}"##,
        )
        .unwrap();
        match body {
            ParameterOrRef::Parameter(param) => assert!(param.is_body()),
            other => panic!("expected inline parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_success_responses_sorted() {
        let operation: Operation = serde_json::from_str(
            r#"{
                "responses": {
                    "404": {"description": "missing"},
                    "201": {"description": "created"},
                    "default": {"description": "error"},
                    "200": {"description": "ok"}
                }
            }"#,
        )
        .unwrap();

        let codes: Vec<u16> = operation
            .success_responses()
            .into_iter()
            .map(|(code, _)| code)
            .collect();
        assert_eq!(codes, vec![200, 201]);
    }
}
