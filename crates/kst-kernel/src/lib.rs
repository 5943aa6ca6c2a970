//! # kst Kernel
//!
//! Knowledge Space Theory: a domain Q is a finite set of items, a
//! knowledge state is the subset of Q a learner has mastered, and a
//! knowledge structure is a family 𝒦 of states containing at least ∅
//! and Q. Progressively stronger family laws single out the structures
//! that behave well as models of learning:
//!
//! ```text
//! KnowledgeStructure     ← (Q, 𝒦) with ∅, Q ∈ 𝒦
//!     │  union closure
//! KnowledgeSpace         ← K, L ∈ 𝒦 ⟹ K ∪ L ∈ 𝒦
//!     │  well-gradedness
//! LearningSpace          ← every state reachable one item at a time
//! ```
//!
//! States are `u64` bitmasks over the domain's item indices, so the
//! family algorithms are plain bit arithmetic. Every law check produces
//! a concrete witness of the first gap it finds, and `check::run_checks`
//! collects the full law-by-law report.

pub mod check;
pub mod domain;
pub mod error;
pub mod family;
pub mod space;
pub mod structure;
pub mod surmise;

pub use check::{CheckReport, Law, LawViolation, run_checks};
pub use domain::{Domain, MAX_ITEMS, StateMask, bits_of};
pub use error::KernelError;
pub use family::{ClosureGap, GapDirection, GradationGap, StateFamily};
pub use space::{Classification, Classified, KnowledgeSpace, LearningSpace, classify};
pub use structure::{KnowledgeStructure, StructureDoc};
pub use surmise::SurmiseRelation;
