//! Error type for building a pattern catalog

/// Errors raised while constructing rules or a catalog.
///
/// Scanning and analysing never fail; everything that can go wrong is caught
/// here, when the catalog is put together.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A rule was given an empty or whitespace-only name
    #[error("pattern rule name must not be empty")]
    EmptyName,

    /// Two rules in the same catalog share a name
    #[error("duplicate pattern rule: {0}")]
    DuplicateName(String),

    /// A regex pattern failed to compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A phrase matcher was given no phrases, or an empty one
    #[error("phrase matcher needs at least one non-empty phrase")]
    EmptyPhrase,

    /// A custom rule defined neither a pattern nor phrases
    #[error("pattern rule '{0}' has neither a pattern nor phrases")]
    MissingMatcher(String),

    /// The config tried to disable a rule that is not in the catalog
    #[error("cannot disable unknown pattern rule: {0}")]
    UnknownRule(String),
}
