//! Artifact and SDK generation for restbridge providers
//!
//! This crate turns an assembled package schema and its endpoint metadata
//! into the files a provider build needs:
//! - `provider/schema.json` and `provider/metadata.json` (the artifacts)
//! - `provider/schema.rs` and `provider/metadata.rs` (the artifacts as
//!   compile-time string constants)
//! - `sdk/<language>/...` (client SDK sources per configured language)

mod sdk;
mod templates;

pub use sdk::{
    emitter_for, to_lower_camel_case, to_snake_case, NodejsEmitter, PropertyView, PythonEmitter,
    ResourceView, SdkEmitter, SdkFiles, SUPPORTED_LANGUAGES,
};

use restbridge_common::{EndpointMetadata, GeneratorError, PackageSpec, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use tracing::{debug, info};

/// Directory holding the provider artifacts
pub const PROVIDER_DIR: &str = "provider";

/// Directory holding one subdirectory per SDK language
pub const SDK_DIR: &str = "sdk";

/// Provider generator
///
/// Writes the schema and metadata artifacts, their embedded forms, and one
/// SDK per configured language.
pub struct ProviderGenerator {
    schema: PackageSpec,
    metadata: EndpointMetadata,
    languages: Vec<String>,
    tera: Tera,
}

impl ProviderGenerator {
    /// Create a generator, failing if a resource has no creation path
    pub fn new(schema: PackageSpec, metadata: EndpointMetadata) -> Result<Self> {
        let missing = metadata.missing_tokens(schema.resources.keys());
        if !missing.is_empty() {
            return Err(GeneratorError::Generation(format!(
                "Endpoint metadata has no creation path for: {}",
                missing.join(", ")
            )));
        }

        let tera = templates::load_templates()?;
        Ok(Self {
            schema,
            metadata,
            languages: SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            tera,
        })
    }

    /// Restrict SDK emission to the given languages
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn schema(&self) -> &PackageSpec {
        &self.schema
    }

    pub fn metadata(&self) -> &EndpointMetadata {
        &self.metadata
    }

    /// Generate all artifacts to a directory, returning the written paths
    ///
    /// Unknown languages are rejected before anything is written.
    pub fn generate_to_directory(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let emitters = self
            .languages
            .iter()
            .map(|language| emitter_for(language, &self.tera))
            .collect::<Result<Vec<_>>>()?;

        let mut written = self.generate_provider_artifacts(&output_dir.join(PROVIDER_DIR))?;

        for emitter in emitters {
            let sdk_dir = output_dir.join(SDK_DIR).join(emitter.language());
            let files = emitter.emit(&self.schema)?;
            info!(
                "Emitting {} SDK ({} files) to {}",
                emitter.language(),
                files.len(),
                sdk_dir.display()
            );
            for (relative, contents) in files {
                written.push(write_file(&sdk_dir.join(relative), &contents)?);
            }
        }

        Ok(written)
    }

    /// Write schema.json, metadata.json and their embedded constants
    fn generate_provider_artifacts(&self, provider_dir: &Path) -> Result<Vec<PathBuf>> {
        info!("Writing provider artifacts to {}", provider_dir.display());

        let schema_json = self.schema.to_json_pretty()?;
        let metadata_json = self.metadata.to_json_pretty()?;

        Ok(vec![
            write_file(&provider_dir.join("schema.json"), &schema_json)?,
            write_file(&provider_dir.join("metadata.json"), &metadata_json)?,
            write_file(
                &provider_dir.join("schema.rs"),
                &self.render_embedded("SCHEMA", "schema.json", "Package schema artifact")?,
            )?,
            write_file(
                &provider_dir.join("metadata.rs"),
                &self.render_embedded("METADATA", "metadata.json", "Endpoint metadata artifact")?,
            )?,
        ])
    }

    fn render_embedded(&self, constant: &str, file: &str, doc: &str) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("constant", constant);
        context.insert("file", file);
        context.insert("doc", doc);
        templates::render(&self.tera, "provider/embedded.rs", &context)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    fs::write(path, contents).map_err(|e| {
        GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
    })?;
    debug!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}

/// Generate provider artifacts and SDKs (convenience function)
pub fn generate_provider(
    schema: PackageSpec,
    metadata: EndpointMetadata,
    languages: &[String],
    output_path: &Path,
) -> Result<Vec<PathBuf>> {
    ProviderGenerator::new(schema, metadata)?
        .with_languages(languages.iter().cloned())
        .generate_to_directory(output_path)
}
