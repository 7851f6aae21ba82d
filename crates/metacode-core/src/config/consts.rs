//! Configuration constants

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "metacode.toml";

/// Syntax defaults
pub mod syntax {
    /// Line comment prefix of the host language
    pub const COMMENT_PREFIX: &str = "//";

    /// Indentation (after the prefix and one space) of macro and table bodies
    pub const INDENT: usize = 2;
}

/// Watch defaults
pub mod watch {
    /// Quiet period before a burst of file events triggers re-expansion
    pub const DEBOUNCE_MS: u64 = 200;
}
