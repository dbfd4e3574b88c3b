//! Template loading and management

use restbridge_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Templates compiled into the binary, keyed by name
const TEMPLATES: &[(&str, &str)] = &[
    (
        "provider/embedded.rs",
        include_str!("../templates/provider/embedded.rs.tera"),
    ),
    (
        "nodejs/package.json",
        include_str!("../templates/nodejs/package.json.tera"),
    ),
    (
        "nodejs/index.ts",
        include_str!("../templates/nodejs/index.ts.tera"),
    ),
    (
        "nodejs/resource.ts",
        include_str!("../templates/nodejs/resource.ts.tera"),
    ),
    (
        "python/pyproject.toml",
        include_str!("../templates/python/pyproject.toml.tera"),
    ),
    (
        "python/__init__.py",
        include_str!("../templates/python/__init__.py.tera"),
    ),
    (
        "python/resource.py",
        include_str!("../templates/python/resource.py.tera"),
    ),
];

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    // Register custom filters
    tera.register_filter("ts_type", ts_type_filter);
    tera.register_filter("py_type", py_type_filter);

    for (name, source) in TEMPLATES {
        tera.add_raw_template(name, source).map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", name, e))
        })?;
    }

    Ok(tera)
}

/// Render a template, mapping Tera errors to generation errors
pub fn render(tera: &Tera, name: &str, context: &tera::Context) -> Result<String> {
    tera.render(name, context)
        .map_err(|e| GeneratorError::Generation(format!("Template error in {}: {:?}", name, e)))
}

/// Filter to convert a schema type name to a TypeScript type
fn ts_type_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let type_name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("ts_type filter expects a string"))?;

    let ts_type = match type_name {
        "string" => "string",
        "integer" | "number" => "number",
        "boolean" => "boolean",
        "array" => "any[]",
        "object" => "{[key: string]: any}",
        _ => "any",
    };

    Ok(Value::String(ts_type.to_string()))
}

/// Filter to convert a schema type name to a Python type hint
fn py_type_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let type_name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("py_type filter expects a string"))?;

    let py_type = match type_name {
        "string" => "str",
        "integer" => "int",
        "number" => "float",
        "boolean" => "bool",
        "array" => "Sequence[Any]",
        "object" => "Mapping[str, Any]",
        _ => "Any",
    };

    Ok(Value::String(py_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    type FilterFn = fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>;

    fn apply(filter: FilterFn, value: &str) -> String {
        filter(&Value::String(value.to_string()), &HashMap::new())
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_templates_load() {
        let tera = load_templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert_eq!(names.len(), TEMPLATES.len());
    }

    #[test]
    fn test_ts_type_filter() {
        assert_eq!(apply(ts_type_filter, "integer"), "number");
        assert_eq!(apply(ts_type_filter, "boolean"), "boolean");
        assert_eq!(apply(ts_type_filter, ""), "any");
    }

    #[test]
    fn test_py_type_filter() {
        assert_eq!(apply(py_type_filter, "integer"), "int");
        assert_eq!(apply(py_type_filter, "number"), "float");
        assert_eq!(apply(py_type_filter, "whatever"), "Any");
    }

    #[test]
    fn test_filters_reject_non_strings() {
        assert!(ts_type_filter(&Value::Bool(true), &HashMap::new()).is_err());
        assert!(py_type_filter(&Value::Null, &HashMap::new()).is_err());
    }
}
