//! Error types for assessment operations.

use kst_kernel::KernelError;

/// Errors arising from invalid distributions, rule parameters, or a
/// misused assessment loop.
#[derive(Debug, thiserror::Error)]
pub enum AssessError {
    #[error("probability cannot be negative: p({state}) = {p}")]
    NegativeProbability { state: String, p: f64 },

    /// The distribution must sum to 1 (within tolerance).
    #[error("state probabilities must sum to 1, got {sum}")]
    DistributionSum { sum: f64 },

    #[error("distribution references a state outside the family: {state}")]
    UnknownState { state: String },

    /// An updating rule wiped out all posterior mass.
    #[error("updating rule produced zero total mass")]
    DegenerateUpdate,

    #[error("rule parameter {name} must lie in [0, 1), got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A response was submitted with no question pending.
    #[error("no question is pending; call next_question first")]
    NoPendingQuestion,

    #[error(transparent)]
    Kernel(#[from] KernelError),
}
