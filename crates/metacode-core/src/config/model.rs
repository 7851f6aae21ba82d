use crate::config::consts;
use crate::error::{MetacodeError, Result};
use serde::Deserialize;
use std::path::Path;

/// metacode.toml schema
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub syntax: SyntaxConfig,
    #[serde(default)]
    pub expand: ExpandConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// How directives are embedded in host-language comments
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntaxConfig {
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            comment_prefix: default_comment_prefix(),
            indent: default_indent(),
        }
    }
}

fn default_comment_prefix() -> String {
    consts::syntax::COMMENT_PREFIX.to_string()
}

fn default_indent() -> usize {
    consts::syntax::INDENT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpandConfig {
    /// Expand multiple files in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    consts::watch::DEBOUNCE_MS
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| MetacodeError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read metacode.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            MetacodeError::ConfigParseError(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `dir/metacode.toml` if present, defaults otherwise
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(consts::CONFIG_FILE_NAME);
        if path.is_file() {
            log::debug!("loading config from {}", path.display());
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let prefix = &self.syntax.comment_prefix;
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(MetacodeError::ConfigInvalidValue {
                field: "syntax.comment_prefix".to_string(),
                reason: format!("must be non-empty and contain no whitespace, got {:?}", prefix),
            });
        }
        Ok(())
    }
}
