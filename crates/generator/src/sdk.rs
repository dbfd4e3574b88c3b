//! Template-driven SDK emitters
//!
//! Each emitter turns a package schema into a set of source files for one
//! language ecosystem. Per-language hints from `PackageSpec::language` are
//! passed to the templates unchanged.

use crate::templates::render;
use restbridge_common::{GeneratorError, PackageSpec, PropertySpec, ResourceSpec, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tera::{Context, Tera};

/// Languages with a built-in emitter
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["nodejs", "python"];

/// Relative file path -> file contents
pub type SdkFiles = BTreeMap<String, String>;

/// Emits SDK sources for one language
pub trait SdkEmitter {
    /// Language key, also the name of the output directory
    fn language(&self) -> &'static str;

    /// Render every file of the SDK
    fn emit(&self, schema: &PackageSpec) -> Result<SdkFiles>;
}

/// Emitter for a configured language name
pub fn emitter_for<'a>(language: &str, tera: &'a Tera) -> Result<Box<dyn SdkEmitter + 'a>> {
    match language {
        "nodejs" => Ok(Box::new(NodejsEmitter { tera })),
        "python" => Ok(Box::new(PythonEmitter { tera })),
        other => Err(GeneratorError::Generation(format!(
            "No SDK emitter for language '{}' (supported: {})",
            other,
            SUPPORTED_LANGUAGES.join(", ")
        ))),
    }
}

/// Template view of a single property
#[derive(Debug, Clone, Serialize)]
pub struct PropertyView {
    pub name: String,
    pub py_name: String,
    pub type_name: String,
    pub description: String,
    pub required: bool,
}

impl PropertyView {
    fn new(name: &str, spec: &PropertySpec, required: bool) -> Self {
        Self {
            name: name.to_string(),
            py_name: to_snake_case(name),
            type_name: spec.type_name.clone().unwrap_or_default(),
            description: spec.description.clone().unwrap_or_default(),
            required,
        }
    }
}

/// Template view of a resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    pub name: String,
    pub token: String,
    pub module: String,
    pub description: String,
    pub inputs: Vec<PropertyView>,
    pub outputs: Vec<PropertyView>,

    /// Outputs that are not also inputs
    pub outputs_only: Vec<PropertyView>,
}

impl ResourceView {
    fn new(name: &str, token: &str, module: String, resource: &ResourceSpec) -> Self {
        let inputs: Vec<PropertyView> = resource
            .input_properties
            .iter()
            .map(|(n, spec)| PropertyView::new(n, spec, resource.required_inputs.contains(n)))
            .collect();
        let outputs: Vec<PropertyView> = resource
            .properties
            .iter()
            .map(|(n, spec)| PropertyView::new(n, spec, resource.required.contains(n)))
            .collect();
        let outputs_only = outputs
            .iter()
            .filter(|o| !resource.input_properties.contains_key(&o.name))
            .cloned()
            .collect();

        Self {
            name: name.to_string(),
            token: token.to_string(),
            module,
            description: resource.description.clone().unwrap_or_default(),
            inputs,
            outputs,
            outputs_only,
        }
    }
}

/// Build template views for every resource, naming modules with `module_name`
fn resource_views(schema: &PackageSpec, module_name: fn(&str) -> String) -> Vec<ResourceView> {
    schema
        .resources
        .iter()
        .map(|(token, resource)| {
            let name = schema.resource_name(token).unwrap_or(token.as_str());
            ResourceView::new(name, token, module_name(name), resource)
        })
        .collect()
}

fn base_context(schema: &PackageSpec) -> Context {
    let mut context = Context::new();
    context.insert("package", &schema.name);
    context.insert("version", &schema.version);
    context.insert(
        "description",
        &format!("SDK for the {} resource provider", schema.name),
    );
    context
}

/// Node.js (TypeScript) SDK
pub struct NodejsEmitter<'a> {
    tera: &'a Tera,
}

impl SdkEmitter for NodejsEmitter<'_> {
    fn language(&self) -> &'static str {
        "nodejs"
    }

    fn emit(&self, schema: &PackageSpec) -> Result<SdkFiles> {
        let hints = schema.language.get("nodejs");
        let dependencies = hints
            .and_then(|h| h.get("dependencies"))
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        let package_name = hints
            .and_then(|h| h.get("packageName"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| schema.name.clone());

        let resources = resource_views(schema, to_lower_camel_case);
        let mut context = base_context(schema);
        context.insert("package_name", &package_name);
        context.insert("dependencies", &dependencies);
        context.insert("resources", &resources);

        let mut files = SdkFiles::new();
        files.insert(
            "package.json".to_string(),
            render(self.tera, "nodejs/package.json", &context)?,
        );
        files.insert(
            "index.ts".to_string(),
            render(self.tera, "nodejs/index.ts", &context)?,
        );
        for resource in &resources {
            context.insert("resource", resource);
            files.insert(
                format!("{}.ts", resource.module),
                render(self.tera, "nodejs/resource.ts", &context)?,
            );
        }

        Ok(files)
    }
}

/// Python SDK
pub struct PythonEmitter<'a> {
    tera: &'a Tera,
}

impl SdkEmitter for PythonEmitter<'_> {
    fn language(&self) -> &'static str {
        "python"
    }

    fn emit(&self, schema: &PackageSpec) -> Result<SdkFiles> {
        let hints = schema.language.get("python");
        let uses_io_classes = hints
            .and_then(|h| h.get("usesIOClasses"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let package_name = hints
            .and_then(|h| h.get("packageName"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| to_snake_case(&schema.name));

        let resources = resource_views(schema, to_snake_case);
        let mut context = base_context(schema);
        context.insert("package_name", &package_name);
        context.insert("uses_io_classes", &uses_io_classes);
        context.insert("resources", &resources);

        let mut files = SdkFiles::new();
        files.insert(
            "pyproject.toml".to_string(),
            render(self.tera, "python/pyproject.toml", &context)?,
        );
        files.insert(
            format!("{}/__init__.py", package_name),
            render(self.tera, "python/__init__.py", &context)?,
        );
        for resource in &resources {
            context.insert("resource", resource);
            files.insert(
                format!("{}/{}.py", package_name, resource.module),
                render(self.tera, "python/resource.py", &context)?,
            );
        }

        Ok(files)
    }
}

/// Convert PascalCase or camelCase to snake_case
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            // HTTPServer -> http_server, todoItem -> todo_item
            let boundary = i > 0
                && (chars[i - 1].is_lowercase()
                    || chars[i - 1].is_ascii_digit()
                    || (i + 1 < chars.len() && chars[i + 1].is_lowercase()));
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' || ch == '_' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Lowercase the first character (`TodoItem` -> `todoItem`)
pub fn to_lower_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
