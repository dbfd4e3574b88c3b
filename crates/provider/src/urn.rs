//! Resource URN parsing
//!
//! URNs have the form `urn:pulumi:<stack>::<project>::<qualified type>::<name>`
//! where the qualified type lists parent types separated by `$` and ends with
//! the resource's own type token.

use crate::error::{ProviderError, Result};

const URN_PREFIX: &str = "urn:pulumi:";

/// A parsed resource URN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urn<'a> {
    pub stack: &'a str,
    pub project: &'a str,
    pub qualified_type: &'a str,
    pub name: &'a str,
}

impl<'a> Urn<'a> {
    /// Parse a URN string
    ///
    /// # Examples
    /// ```
    /// use restbridge_provider::Urn;
    ///
    /// let urn = Urn::parse("urn:pulumi:dev::todo::xyz:index:Todo::groceries").unwrap();
    /// assert_eq!(urn.resource_type(), "xyz:index:Todo");
    /// assert_eq!(urn.name, "groceries");
    /// ```
    pub fn parse(urn: &'a str) -> Result<Self> {
        let rest = urn
            .strip_prefix(URN_PREFIX)
            .ok_or_else(|| ProviderError::InvalidUrn(urn.to_string()))?;

        let mut parts = rest.splitn(4, "::");
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(stack), Some(project), Some(qualified_type), Some(name))
                if !qualified_type.is_empty() =>
            {
                Ok(Self {
                    stack,
                    project,
                    qualified_type,
                    name,
                })
            }
            _ => Err(ProviderError::InvalidUrn(urn.to_string())),
        }
    }

    /// Type token of the resource itself, without parent types
    pub fn resource_type(&self) -> &'a str {
        self.qualified_type
            .rsplit('$')
            .next()
            .unwrap_or(self.qualified_type)
    }
}

/// Resource type token named by a URN
pub fn resource_type(urn: &str) -> Result<&str> {
    Ok(Urn::parse(urn)?.resource_type())
}
