//! Generator configuration loaded from YAML
//!
//! Everything that would otherwise be hardcoded for a particular API (package
//! name, location of the API description, operation-id convention, SDK
//! languages and their hints) lives in a `restbridge.yaml` file next to the
//! project.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "restbridge.yaml";

/// Root structure of `restbridge.yaml`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Package name, first segment of every resource token
    pub package: String,

    /// API description source: a file path or an http(s) URL
    pub spec: String,

    /// Separator between resource name and action in operation ids
    pub operation_id_separator: String,

    /// SDK languages to emit
    pub languages: Vec<String>,

    /// Opaque per-language hints copied into the package schema
    pub language: BTreeMap<String, serde_json::Value>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let mut language = BTreeMap::new();
        language.insert(
            "nodejs".to_string(),
            serde_json::json!({"dependencies": {"@pulumi/pulumi": "^3.0.0"}}),
        );
        language.insert(
            "python".to_string(),
            serde_json::json!({"usesIOClasses": true}),
        );

        Self {
            package: "xyz".to_string(),
            spec: "open-api-spec/todo-backend.json".to_string(),
            operation_id_separator: "_".to_string(),
            languages: vec!["nodejs".to_string(), "python".to_string()],
            language,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content)
            .map_err(|e| GeneratorError::Config(format!("Invalid config in {:?}: {}", path, e)))
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Config(format!("Failed to parse config YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise `restbridge.yaml` if present, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.package.is_empty() {
            return Err(GeneratorError::Config("package name must not be empty".to_string()));
        }
        if self.package.contains(':') {
            return Err(GeneratorError::Config(format!(
                "package name '{}' must not contain ':'",
                self.package
            )));
        }
        if self.operation_id_separator.is_empty() {
            return Err(GeneratorError::Config(
                "operation_id_separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.package, "xyz");
        assert_eq!(config.operation_id_separator, "_");
        assert!(config.language.contains_key("nodejs"));
        assert_eq!(config.languages, vec!["nodejs", "python"]);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config = GeneratorConfig::from_yaml(
            r#"
package: todo
spec: https://example.com/swagger.json
"#,
        )
        .unwrap();

        assert_eq!(config.package, "todo");
        assert_eq!(config.spec, "https://example.com/swagger.json");
        assert_eq!(config.operation_id_separator, "_");
    }

    #[test]
    fn test_language_hints() {
        let config = GeneratorConfig::from_yaml(
            r#"
package: todo
languages: [nodejs]
language:
  nodejs:
    dependencies:
      "@pulumi/pulumi": "^3.0.0"
"#,
        )
        .unwrap();

        assert_eq!(config.languages, vec!["nodejs"]);
        assert_eq!(
            config.language["nodejs"]["dependencies"]["@pulumi/pulumi"],
            "^3.0.0"
        );
        assert!(!config.language.contains_key("python"));
    }

    #[test]
    fn test_rejects_invalid_package() {
        assert!(matches!(
            GeneratorConfig::from_yaml("package: \"a:b\""),
            Err(GeneratorError::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_yaml("operation_id_separator: \"\""),
            Err(GeneratorError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = GeneratorConfig::load(Path::new("/nonexistent/restbridge.yaml"));
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }
}
