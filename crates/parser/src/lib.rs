//! Schema inference for Swagger 2.0 API descriptions
//!
//! This crate turns an API description into the package schema and endpoint
//! metadata consumed by the generator and the provider runtime.
//!
//! ## Inference Strategy
//!
//! Operations are grouped into resources by their operation id:
//! - `Todo_Create` → resource `Todo`, action `Create`
//! - ids that do not split into exactly two parts are skipped
//!
//! A resource is kept only when it exposes all of Create, Get, Update and
//! Delete. Its inputs come from the Create body schema and its outputs from
//! the lowest 2xx response of Get. Everything that is skipped is reported as
//! a [`Diagnostic`].

mod assembler;
mod diagnostics;
mod discovery;
mod inference;
pub mod swagger;

pub use assembler::{AssembledSchema, SchemaAssembler};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use discovery::{
    discover_resources, CrudAction, DiscoveredOperation, Discovery, DiscoveryOptions,
    OperationGroup, OperationIdConvention, DISCOVERY_ORDER,
};
pub use inference::{infer_properties, InferenceMode, PropertyInferrer};
pub use swagger::ApiDescription;

use restbridge_common::{GeneratorConfig, Result};

/// Load the configured API description and assemble its package schema
///
/// # Arguments
/// * `config` - Generator configuration (package name, description source)
/// * `version` - Version stamped into the schema
pub fn build_schema(config: &GeneratorConfig, version: &str) -> Result<AssembledSchema> {
    let api = ApiDescription::load(&config.spec)?;
    SchemaAssembler::new(&api, config)
        .with_version(version)
        .assemble()
}
