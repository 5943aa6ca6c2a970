//! # kst Assessment
//!
//! Uncovering a learner's latent knowledge state, one question at a time.
//!
//! A probabilistic knowledge structure (Q, 𝒦, L) attaches a probability
//! distribution L to the states of a knowledge structure. The Markov
//! assessment procedure maintains L as a likelihood over the learner's
//! possible states: a questioning rule picks the next item to ask, the
//! response feeds an updating rule that reshapes L, and the loop repeats
//! until one state holds enough mass.
//!
//! ```text
//! ProbabilisticKnowledgeStructure   ← (Q, 𝒦, L)
//!     │
//! QuestioningRule / UpdatingRule    ← the pluggable seams
//!     │
//! MarkovAssessment                  ← ask → answer → update
//!     │
//! SimulatedLearner                  ← a latent state behind slip/guess noise
//! ```

pub mod error;
pub mod map;
pub mod probabilistic;
pub mod rules;
pub mod simulate;

pub use error::AssessError;
pub use map::{MarkovAssessment, Trial};
pub use probabilistic::{PROBABILITY_TOLERANCE, ProbabilisticKnowledgeStructure};
pub use rules::{HalfSplit, MultiplicativeUpdate, QuestioningRule, UpdatingRule};
pub use simulate::{AssessmentOutcome, SimulatedLearner, run_assessment};
