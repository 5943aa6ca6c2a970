//! Error types for kernel operations.

use crate::family::{ClosureGap, GradationGap};

/// Errors arising from invalid domains, malformed families, or family-law
/// violations surfaced through the typed conversions.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// A knowledge structure requires a non-empty domain.
    #[error("domain cannot be empty")]
    EmptyDomain,

    /// States are u64 bitmasks, one bit per item.
    #[error("domain holds {count} items; the state encoding caps at 64")]
    DomainTooLarge { count: usize },

    #[error("duplicate domain item: {item}")]
    DuplicateItem { item: String },

    #[error("domain items must have non-empty labels")]
    EmptyLabel,

    /// A state referenced an item outside the domain.
    #[error("unknown item: {item}")]
    UnknownItem { item: String },

    #[error("the family of states must contain the empty state")]
    MissingEmptyState,

    #[error("the family of states must contain the whole domain")]
    MissingFullState,

    /// Conversion to a knowledge space failed.
    #[error("family is not union-closed: {0}")]
    NotUnionClosed(ClosureGap),

    /// Conversion to a learning space failed.
    #[error("family is not well-graded: {0}")]
    NotWellGraded(GradationGap),
}
