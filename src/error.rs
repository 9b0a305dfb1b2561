//! Top-level error type for the repository engine.
//!
//! Each subsystem keeps its own `thiserror` enum next to its code (the
//! sanitizer, the binding layer, the transport, and so on); this module folds
//! them into the single `RepositoryError` surfaced by the public API, and maps
//! every error onto a coarse category used for log fields.

use thiserror::Error;

use crate::binding::BindingError;
use crate::hydrate::HydrationError;
use crate::mutate::MutationError;
use crate::sanitize::SanitizeError;
use crate::scope::ScopeError;
use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Error surfaced by every public repository operation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Remote I/O failed. Never retried; recursive work in flight is
    /// abandoned and already-committed statements stay in place.
    #[error("store transport error: {0}")]
    Transport(#[from] TransportError),

    /// A result row did not carry the shape the catalog promised.
    #[error("result binding error: {0}")]
    Binding(#[from] BindingError),

    /// Caller-supplied text failed IRI/literal validation.
    #[error("invalid query parameter: {0}")]
    Sanitize(#[from] SanitizeError),

    /// Tenant membership did not resolve to exactly one partition.
    #[error("graph scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("hydration error: {0}")]
    Hydration(#[from] HydrationError),

    #[error("mutation error: {0}")]
    Mutation(#[from] MutationError),

    /// Identifier allocation failed. Allocation has no local fallback: when
    /// the store cannot confirm uniqueness the whole operation fails.
    #[error("identifier allocation failed: {0}")]
    Allocation(String),
}

impl RepositoryError {
    /// Coarse category attached to log events and surfaced to callers that
    /// only need to branch on the class of failure.
    pub fn category(&self) -> &'static str {
        match self {
            RepositoryError::Transport(_) => "remote_io",
            RepositoryError::Binding(_) => "result_shape",
            RepositoryError::Sanitize(_) => "validation",
            RepositoryError::Scope(_) => "access",
            RepositoryError::Hydration(_) => "hydration",
            RepositoryError::Mutation(MutationError::InvalidInput { .. }) => "validation",
            RepositoryError::Mutation(_) => "mutation",
            RepositoryError::Allocation(_) => "allocation",
        }
    }

    /// True when the failure came from the remote store rather than from the
    /// caller's input.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            RepositoryError::Transport(_) | RepositoryError::Allocation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_categorize_as_validation() {
        let err = RepositoryError::Mutation(MutationError::InvalidInput {
            field: "label",
            reason: "blank".into(),
        });
        assert_eq!(err.category(), "validation");
        assert!(!err.is_remote());
    }
}
