use crate::table::TableError;
use crate::template::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetacodeError {
    // Document errors
    #[error("MALFORMED_DIRECTIVE: line {line}: {message}")]
    MalformedDirective { line: usize, message: String },

    #[error("UNKNOWN_MACRO: macro '{name}' is not defined (line {line})")]
    UnknownMacro { name: String, line: usize },

    #[error("EXPANSION_FAILED: invocation of '{name}' at line {line}: {source}")]
    Expansion {
        name: String,
        line: usize,
        #[source]
        source: TemplateError,
    },

    // Template and table errors
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Table(#[from] TableError),

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID: failed to parse metacode.toml: {0}")]
    ConfigInvalid(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

impl MetacodeError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        MetacodeError::MalformedDirective {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetacodeError>;
