//! Resource discovery and CRUD grouping
//!
//! Groups operations into resources using the operation-id naming convention
//! `<Resource>_<Action>` and keeps only resources that expose the full
//! Create/Get/Update/Delete quartet.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::swagger::{ApiDescription, HttpMethod, Operation, ParameterOrRef};
use restbridge_common::resource_token;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Verbs considered during discovery, in consideration order
pub const DISCOVERY_ORDER: [HttpMethod; 4] = [
    HttpMethod::Post,
    HttpMethod::Get,
    HttpMethod::Patch,
    HttpMethod::Delete,
];

/// CRUD action keys a resource must expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CrudAction {
    Create,
    Get,
    Update,
    Delete,
}

impl CrudAction {
    pub const ALL: [CrudAction; 4] = [
        CrudAction::Create,
        CrudAction::Get,
        CrudAction::Update,
        CrudAction::Delete,
    ];

    /// Action key as it appears in operation ids
    pub fn as_key(&self) -> &'static str {
        match self {
            CrudAction::Create => "Create",
            CrudAction::Get => "Get",
            CrudAction::Update => "Update",
            CrudAction::Delete => "Delete",
        }
    }

    /// Classify an action key (exact match only)
    ///
    /// # Examples
    /// ```
    /// use restbridge_parser::CrudAction;
    ///
    /// assert_eq!(CrudAction::from_key("Create"), Some(CrudAction::Create));
    /// assert_eq!(CrudAction::from_key("create"), None);
    /// assert_eq!(CrudAction::from_key("List"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<CrudAction> {
        CrudAction::ALL.into_iter().find(|action| action.as_key() == key)
    }
}

impl fmt::Display for CrudAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Operation-id naming convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationIdConvention {
    separator: String,
}

impl Default for OperationIdConvention {
    fn default() -> Self {
        Self::new("_")
    }
}

impl OperationIdConvention {
    pub fn new(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
        }
    }

    /// Split an operation id into `(resource, action)`
    ///
    /// Returns `None` unless the id splits into exactly two non-empty parts.
    ///
    /// # Examples
    /// ```
    /// use restbridge_parser::OperationIdConvention;
    ///
    /// let convention = OperationIdConvention::default();
    /// assert_eq!(convention.split("Todo_Create"), Some(("Todo", "Create")));
    /// assert_eq!(convention.split("Todo_Item_Create"), None);
    /// assert_eq!(convention.split("createTodo"), None);
    /// ```
    pub fn split<'a>(&self, operation_id: &'a str) -> Option<(&'a str, &'a str)> {
        let parts: Vec<&str> = operation_id.split(self.separator.as_str()).collect();
        match parts.as_slice() {
            [resource, action] if !resource.is_empty() && !action.is_empty() => {
                Some((resource, action))
            }
            _ => None,
        }
    }
}

/// Options controlling discovery
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Package name used to build resource tokens
    pub package: String,

    pub convention: OperationIdConvention,
}

impl DiscoveryOptions {
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
            convention: OperationIdConvention::default(),
        }
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.convention = OperationIdConvention::new(separator);
        self
    }
}

/// An operation located in the description
#[derive(Debug, Clone)]
pub struct DiscoveredOperation {
    pub path: String,
    pub method: HttpMethod,
    pub operation: Operation,
}

/// Operations of one resource keyed by action
#[derive(Debug, Clone)]
pub struct OperationGroup {
    /// Resource name (first half of the operation id)
    pub name: String,

    /// Fully-qualified resource token
    pub token: String,

    operations: BTreeMap<String, DiscoveredOperation>,
}

impl OperationGroup {
    fn new(name: &str, token: &str) -> Self {
        Self {
            name: name.to_string(),
            token: token.to_string(),
            operations: BTreeMap::new(),
        }
    }

    /// Operation registered for a CRUD action
    pub fn operation(&self, action: CrudAction) -> Option<&DiscoveredOperation> {
        self.operations.get(action.as_key())
    }

    /// CRUD actions this resource does not expose
    pub fn missing_actions(&self) -> Vec<CrudAction> {
        CrudAction::ALL
            .into_iter()
            .filter(|action| !self.operations.contains_key(action.as_key()))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_actions().is_empty()
    }
}

/// Result of resource discovery
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Complete resources keyed by token
    pub groups: BTreeMap<String, OperationGroup>,

    /// Creation path (path of the `Create` POST operation) keyed by token
    pub creation_paths: BTreeMap<String, String>,

    /// Operations and resources that were skipped
    pub diagnostics: Vec<Diagnostic>,
}

/// Discover resource-shaped operation groups
pub fn discover_resources(api: &ApiDescription, options: &DiscoveryOptions) -> Discovery {
    let mut groups: BTreeMap<String, OperationGroup> = BTreeMap::new();
    let mut creation_paths = BTreeMap::new();
    let mut diagnostics = Vec::new();

    let operations = api
        .operations()
        .filter(|(_, method, _)| DISCOVERY_ORDER.contains(method));

    for (path, method, operation) in operations {
        let Some((resource, action)) = options.convention.split(operation.id()) else {
            let subject = format!("{} {}", method, path);
            warn!(
                operation_id = operation.id(),
                "skipping {}: ambiguous operation id", subject
            );
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::AmbiguousOperationId,
                subject,
                format!(
                    "operation id '{}' does not match <Resource>{}<Action>",
                    operation.id(),
                    options.convention.separator
                ),
            ));
            continue;
        };

        let token = resource_token(&options.package, resource);
        debug!(%token, action, %method, path, "discovered operation");

        let mut operation = operation.clone();
        if let Some(item) = api.path_item(path) {
            operation.parameters = merge_parameters(api, &item.parameters, operation.parameters);
        }

        // Only the Create POST defines where instances are created.
        if method == HttpMethod::Post && CrudAction::from_key(action) == Some(CrudAction::Create) {
            creation_paths.insert(token.clone(), path.to_string());
        }

        groups
            .entry(token.clone())
            .or_insert_with(|| OperationGroup::new(resource, &token))
            .operations
            .insert(
                action.to_string(),
                DiscoveredOperation {
                    path: path.to_string(),
                    method,
                    operation,
                },
            );
    }

    groups.retain(|token, group| {
        let missing = group.missing_actions();
        if missing.is_empty() {
            return true;
        }

        let missing: Vec<&str> = missing.iter().map(CrudAction::as_key).collect();
        warn!(%token, missing = ?missing, "skipping incomplete resource");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::IncompleteResource,
            token.as_str(),
            format!("missing actions: {}", missing.join(", ")),
        ));
        false
    });
    creation_paths.retain(|token, _| groups.contains_key(token));

    Discovery {
        groups,
        creation_paths,
        diagnostics,
    }
}

/// Combine path-level and operation-level parameters
///
/// An operation parameter overrides a path parameter with the same
/// `(name, in)`. Parameters whose `$ref` does not resolve are kept as-is so
/// inference can report them.
fn merge_parameters(
    api: &ApiDescription,
    path_level: &[ParameterOrRef],
    operation_level: Vec<ParameterOrRef>,
) -> Vec<ParameterOrRef> {
    let key = |parameter: &ParameterOrRef| {
        api.resolve_parameter(parameter)
            .ok()
            .map(|p| (p.name, p.location))
    };
    let overridden: Vec<(String, String)> = operation_level.iter().filter_map(key).collect();

    path_level
        .iter()
        .filter(|parameter| key(*parameter).map_or(true, |k| !overridden.contains(&k)))
        .cloned()
        .chain(operation_level)
        .collect()
}
