//! Skipped-item diagnostics
//!
//! Operations and resources that are left out of the schema are not errors,
//! but callers need to be able to audit them. Every skip is recorded here and
//! returned next to the assembled schema.

use std::fmt;

/// Why an item was left out of the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Operation id did not split into exactly `<Resource><sep><Action>`
    AmbiguousOperationId,

    /// Resource is missing one of the Create/Get/Update/Delete actions
    IncompleteResource,

    /// Resource has all four actions but no POST operation to create it with
    MissingCreationPath,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::AmbiguousOperationId => "ambiguous operation id",
            DiagnosticKind::IncompleteResource => "incomplete resource",
            DiagnosticKind::MissingCreationPath => "missing creation path",
        };
        f.write_str(label)
    }
}

/// A single skipped item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Operation (`METHOD path`) or resource token the diagnostic is about
    pub subject: String,

    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.subject, self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::IncompleteResource,
            "xyz:index:Tag",
            "missing actions: Update, Delete",
        );
        assert_eq!(
            diagnostic.to_string(),
            "xyz:index:Tag (incomplete resource): missing actions: Update, Delete"
        );
    }
}
