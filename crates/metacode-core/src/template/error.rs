//! Template error types

use thiserror::Error;

/// Template parsing and expansion errors
///
/// Every variant carries the offending directive text together with its
/// 1-based line and column, so a fault can be located in the macro body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Unbalanced loop directives, unknown directive syntax, unclosed `{{`
    #[error("MALFORMED_TEMPLATE: {message} (directive '{directive}' at line {line}, column {column})")]
    MalformedTemplate {
        message: String,
        directive: String,
        line: usize,
        column: usize,
    },

    /// Name not found in any active scope
    #[error("UNBOUND_REFERENCE: '{name}' is not bound in any enclosing scope (directive '{directive}' at line {line}, column {column})")]
    UnboundReference {
        name: String,
        directive: String,
        line: usize,
        column: usize,
    },

    /// Row has no such column
    #[error("FIELD_NOT_FOUND: row '{name}' has no column '{field}' (directive '{directive}' at line {line}, column {column})")]
    FieldNotFound {
        name: String,
        field: String,
        directive: String,
        line: usize,
        column: usize,
    },

    /// A bound value was used where a different kind of value is required
    #[error("TYPE_MISMATCH: '{name}' is a {found}, expected a {expected} (directive '{directive}' at line {line}, column {column})")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
        directive: String,
        line: usize,
        column: usize,
    },

    /// Macro invoked with the wrong number of arguments
    #[error("ARITY_MISMATCH: macro '{name}' takes {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Environment lacks a binding for one of the macro's formal parameters
    #[error("MISSING_ARGUMENT: macro '{name}' has no binding for parameter '{param}'")]
    MissingArgument { name: String, param: String },
}

impl TemplateError {
    /// Shift the reported position by a line and column offset
    ///
    /// Used when a template body was cut out of a larger file: lines move by
    /// `line_offset`, columns by `column_offset` (the stripped indentation).
    pub fn relocate(self, line_offset: usize, column_offset: usize) -> Self {
        match self {
            TemplateError::MalformedTemplate {
                message,
                directive,
                line,
                column,
            } => TemplateError::MalformedTemplate {
                message,
                directive,
                line: line + line_offset,
                column: column + column_offset,
            },
            TemplateError::UnboundReference {
                name,
                directive,
                line,
                column,
            } => TemplateError::UnboundReference {
                name,
                directive,
                line: line + line_offset,
                column: column + column_offset,
            },
            TemplateError::FieldNotFound {
                name,
                field,
                directive,
                line,
                column,
            } => TemplateError::FieldNotFound {
                name,
                field,
                directive,
                line: line + line_offset,
                column: column + column_offset,
            },
            TemplateError::TypeMismatch {
                name,
                expected,
                found,
                directive,
                line,
                column,
            } => TemplateError::TypeMismatch {
                name,
                expected,
                found,
                directive,
                line: line + line_offset,
                column: column + column_offset,
            },
            other => other,
        }
    }

    /// Line of the offending directive, if the error has one
    pub fn line(&self) -> Option<usize> {
        match self {
            TemplateError::MalformedTemplate { line, .. }
            | TemplateError::UnboundReference { line, .. }
            | TemplateError::FieldNotFound { line, .. }
            | TemplateError::TypeMismatch { line, .. } => Some(*line),
            TemplateError::ArityMismatch { .. } | TemplateError::MissingArgument { .. } => None,
        }
    }
}
