//! Error types for impact queries.

use std::fmt::Display;
use thiserror::Error;
use tracing::warn;

/// Result type alias using [`ImpactError`].
pub type Result<T> = std::result::Result<T, ImpactError>;

/// Errors that can occur while answering an impact query.
///
/// The graph and tree algorithms never fail. Everything here originates at
/// the resolver boundary or at the outer surface (config, I/O, CLI input).
#[derive(Error, Debug)]
pub enum ImpactError {
    /// No symbol resolves at a position or for a name.
    #[error("No symbol found: {what}")]
    NotFound { what: String },

    /// A hierarchy query was started from a reference whose preferred
    /// declaration could not be resolved.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// The resolver failed to answer a query.
    #[error("Resolver error: {0}")]
    Backend(String),

    /// A `path:line:column` string could not be parsed.
    #[error("{0} is not a valid location")]
    InvalidLocation(String),

    /// Every sub-query of an impact request came back empty or failed.
    #[error("No results for any queried symbol")]
    NoResults,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl ImpactError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Failures scoped to one sub-query. The composition layer logs these
    /// and carries on with the remaining symbols.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Backend(_) | Self::NotFound { .. } | Self::PreconditionViolation(_)
        )
    }
}

/// Recoverable failures of one sub-query become "no result".
pub(crate) fn tolerated<T>(
    query: &'static str,
    subject: impl Display,
    result: Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            warn!(query, subject = %subject, error = %e, "sub-query failed, skipping");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
