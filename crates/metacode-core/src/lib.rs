// Core modules
pub mod config;
pub mod document;
pub mod error;
pub mod table;
pub mod template;

// Re-export commonly used types
pub use config::Config;
pub use document::{Document, FileStatus};
pub use error::{MetacodeError, Result};
pub use table::{Row, Table};
