//! Property inference
//!
//! Derives the input and output property bags of a resource from the schema
//! fragments of its Create body parameter and Get success response.

use crate::swagger::{ApiDescription, Operation, ParameterOrRef, Schema};
use restbridge_common::{GeneratorError, PropertyBag, PropertySpec, Result};
use std::borrow::Cow;

/// Longest `$ref` chain followed before giving up
const MAX_REF_DEPTH: usize = 32;

/// Which side of a resource a bag describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceMode {
    /// Caller-supplied properties: `readOnly` skipped, `required` mirrored
    Input,

    /// Observed properties: `id` skipped, everything required
    Output,
}

/// Infers property bags against a loaded API description
#[derive(Debug, Clone, Copy)]
pub struct PropertyInferrer<'a> {
    api: &'a ApiDescription,
}

impl<'a> PropertyInferrer<'a> {
    pub fn new(api: &'a ApiDescription) -> Self {
        Self { api }
    }

    /// Build a property bag from an object schema fragment
    pub fn infer_properties(&self, schema: &Schema, mode: InferenceMode) -> Result<PropertyBag> {
        let source = self.resolve(schema)?;
        let mut bag = PropertyBag::new();

        for (name, property) in &source.properties {
            let resolved = self.resolve(property)?;

            let skip = match mode {
                InferenceMode::Input => property.read_only || resolved.read_only,
                InferenceMode::Output => name == "id",
            };
            if skip {
                continue;
            }

            let spec = PropertySpec {
                type_name: property
                    .primitive_type()
                    .or_else(|| resolved.primitive_type())
                    .map(str::to_string),
                description: property
                    .description
                    .clone()
                    .or_else(|| resolved.description.clone()),
            };
            let required = match mode {
                InferenceMode::Input => source.required.iter().any(|r| r == name),
                InferenceMode::Output => true,
            };
            bag.insert(name, spec, required);
        }

        Ok(bag)
    }

    /// Input bag of a Create operation
    ///
    /// Only a single body parameter is accepted. Any other parameter fails
    /// with [`GeneratorError::UnsupportedParameter`].
    pub fn body_properties(&self, create: &Operation) -> Result<PropertyBag> {
        let mut body = None;

        for parameter in &create.parameters {
            let parameter = match parameter {
                ParameterOrRef::Reference { ref_path } => self
                    .api
                    .resolve_parameter(parameter)
                    .map_err(|_| GeneratorError::UnresolvableRef(ref_path.clone()))?,
                ParameterOrRef::Parameter(param) => param.as_ref().clone(),
            };

            if !parameter.is_body() || body.is_some() {
                return Err(GeneratorError::UnsupportedParameter {
                    name: parameter.name,
                    location: parameter.location,
                });
            }
            body = Some(parameter);
        }

        match body.and_then(|parameter| parameter.schema) {
            Some(schema) => self.infer_properties(&schema, InferenceMode::Input),
            None => Ok(PropertyBag::new()),
        }
    }

    /// Output bag of a Get operation, from its lowest 2xx response with a schema
    pub fn response_properties(&self, get: &Operation) -> Result<PropertyBag> {
        let schema = get
            .success_responses()
            .into_iter()
            .find_map(|(_, response)| response.schema.as_ref())
            .ok_or_else(|| GeneratorError::NoSuccessResponse(get.id().to_string()))?;

        self.infer_properties(schema, InferenceMode::Output)
    }

    /// Follow a `$ref` chain to the schema it ends at
    fn resolve<'s>(&self, schema: &'s Schema) -> Result<Cow<'s, Schema>> {
        let mut current = Cow::Borrowed(schema);
        let mut depth = 0;

        while let Some(reference) = current.ref_path.clone() {
            if depth == MAX_REF_DEPTH {
                return Err(GeneratorError::UnresolvableRef(format!(
                    "{} (reference chain too deep)",
                    reference
                )));
            }
            depth += 1;

            let next = self
                .api
                .resolve_schema(&reference)
                .map_err(|_| GeneratorError::UnresolvableRef(reference.clone()))?;
            current = Cow::Owned(next);
        }

        Ok(current)
    }
}

/// Build a property bag from `schema` against `api`
pub fn infer_properties(
    api: &ApiDescription,
    schema: &Schema,
    mode: InferenceMode,
) -> Result<PropertyBag> {
    PropertyInferrer::new(api).infer_properties(schema, mode)
}
