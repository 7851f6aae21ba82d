//! metacode.toml configuration

pub mod consts;
pub mod model;

pub use model::{Config, ExpandConfig, SyntaxConfig, WatchConfig};
