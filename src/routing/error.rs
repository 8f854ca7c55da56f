//! Routing error types

use thiserror::Error;

/// Result type for rule resolution
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors raised while resolving a request against the route table.
///
/// These are authoring defects in the route table, not request conditions.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A regex rule's path pattern does not compile
    #[error("invalid regex path pattern '{pattern}': {source}")]
    PatternCompile {
        /// The offending pattern as authored
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}

impl ResolveError {
    /// Create a PatternCompile error
    #[inline]
    pub fn pattern_compile(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::PatternCompile {
            pattern: pattern.into(),
            source,
        }
    }
}
