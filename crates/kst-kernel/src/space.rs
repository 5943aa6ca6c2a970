//! The classification ladder: structure → space → learning space.
//!
//! Each rung is a newtype whose existence witnesses a family law, and
//! each failed conversion carries the concrete gap that blocked it.

use crate::domain::{Domain, StateMask};
use crate::error::KernelError;
use crate::family::StateFamily;
use crate::structure::KnowledgeStructure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How specific a family is, most general first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Structure,
    Space,
    LearningSpace,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structure => write!(f, "knowledge structure"),
            Self::Space => write!(f, "knowledge space"),
            Self::LearningSpace => write!(f, "learning space"),
        }
    }
}

/// The most specific class the structure's family satisfies.
pub fn classify(ks: &KnowledgeStructure) -> Classification {
    if !ks.family().is_union_closed() {
        Classification::Structure
    } else if !ks.family().is_well_graded(ks.domain().full_mask()) {
        Classification::Space
    } else {
        Classification::LearningSpace
    }
}

/// A knowledge structure whose family is union-closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeSpace(KnowledgeStructure);

impl KnowledgeSpace {
    pub fn structure(&self) -> &KnowledgeStructure {
        &self.0
    }

    pub fn into_structure(self) -> KnowledgeStructure {
        self.0
    }

    pub fn domain(&self) -> &Domain {
        self.0.domain()
    }

    pub fn family(&self) -> &StateFamily {
        self.0.family()
    }

    /// The base: every atom of the space.
    ///
    /// An atom is a minimal state containing some item; the span of the
    /// base is the whole space.
    pub fn base(&self) -> Vec<StateMask> {
        let mut atoms = BTreeSet::new();
        for item in self.0.domain().items() {
            // Every item of a validated structure resolves.
            if let Ok(minimal) = self.0.atoms_at(item) {
                atoms.extend(minimal);
            }
        }
        atoms.into_iter().collect()
    }

    /// Build the space spanned by a generating family over a domain.
    ///
    /// The span is the union closure of the generators plus ∅; the
    /// generators must jointly cover the domain, otherwise Q is not a
    /// state and no structure exists.
    pub fn span<I>(domain: Domain, generators: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = StateMask>,
    {
        let family: StateFamily = generators.into_iter().collect();
        let closed = family.union_closure();
        let structure = KnowledgeStructure::new(domain, closed.iter())?;
        Ok(Self(structure))
    }
}

impl TryFrom<KnowledgeStructure> for KnowledgeSpace {
    type Error = KernelError;

    fn try_from(ks: KnowledgeStructure) -> Result<Self, Self::Error> {
        match ks.family().find_closure_gap() {
            Some(gap) => Err(KernelError::NotUnionClosed(gap)),
            None => Ok(Self(ks)),
        }
    }
}

/// A knowledge space whose family is also well-graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearningSpace(KnowledgeSpace);

impl LearningSpace {
    pub fn space(&self) -> &KnowledgeSpace {
        &self.0
    }

    pub fn structure(&self) -> &KnowledgeStructure {
        self.0.structure()
    }

    pub fn into_space(self) -> KnowledgeSpace {
        self.0
    }

    pub fn domain(&self) -> &Domain {
        self.0.domain()
    }

    pub fn family(&self) -> &StateFamily {
        self.0.family()
    }

    pub fn base(&self) -> Vec<StateMask> {
        self.0.base()
    }
}

impl TryFrom<KnowledgeSpace> for LearningSpace {
    type Error = KernelError;

    fn try_from(space: KnowledgeSpace) -> Result<Self, Self::Error> {
        let full = space.domain().full_mask();
        match space.family().find_gradation_gap(full) {
            Some(gap) => Err(KernelError::NotWellGraded(gap)),
            None => Ok(Self(space)),
        }
    }
}

impl TryFrom<KnowledgeStructure> for LearningSpace {
    type Error = KernelError;

    fn try_from(ks: KnowledgeStructure) -> Result<Self, Self::Error> {
        LearningSpace::try_from(KnowledgeSpace::try_from(ks)?)
    }
}

/// A structure held at its most specific classification.
#[derive(Debug, Clone)]
pub enum Classified {
    Structure(KnowledgeStructure),
    Space(KnowledgeSpace),
    Learning(LearningSpace),
}

impl Classified {
    /// Classify and wrap, most specific class first.
    pub fn from_structure(ks: KnowledgeStructure) -> Self {
        if !ks.family().is_union_closed() {
            return Self::Structure(ks);
        }
        let space = KnowledgeSpace(ks);
        if !space
            .family()
            .is_well_graded(space.domain().full_mask())
        {
            return Self::Space(space);
        }
        Self::Learning(LearningSpace(space))
    }

    pub fn classification(&self) -> Classification {
        match self {
            Self::Structure(_) => Classification::Structure,
            Self::Space(_) => Classification::Space,
            Self::Learning(_) => Classification::LearningSpace,
        }
    }

    pub fn structure(&self) -> &KnowledgeStructure {
        match self {
            Self::Structure(ks) => ks,
            Self::Space(space) => space.structure(),
            Self::Learning(ls) => ls.structure(),
        }
    }
}
