//! The surmise relation: what mastery of one item lets us surmise.
//!
//! For a knowledge structure (Q, 𝒦), item q precedes item r (q ⪯ r)
//! when every state containing r also contains q: observing r mastered
//! lets us surmise q is too. Computed as the intersection of all states
//! containing r, which is exactly the set of items r entails.
//!
//! The relation is reflexive and transitive; mutual precedence collapses
//! to the notion equivalence of [`crate::structure`].

use crate::domain::{Domain, StateMask};
use crate::error::KernelError;
use crate::structure::KnowledgeStructure;
use std::collections::BTreeMap;

/// The precedence relation of a knowledge structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurmiseRelation {
    domain: Domain,
    /// `prereq[i]` = intersection of all states containing item i.
    prereq: Vec<StateMask>,
}

impl SurmiseRelation {
    /// Derive the precedence relation from a structure.
    pub fn derive(ks: &KnowledgeStructure) -> Self {
        let domain = ks.domain().clone();
        let prereq = (0..domain.len()).map(|i| ks.prerequisite_mask(i)).collect();
        Self { domain, prereq }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Everything mastery of `item` lets us surmise, including itself.
    pub fn prerequisites_of(&self, item: &str) -> Result<Vec<&str>, KernelError> {
        let index = self.index(item)?;
        Ok(self.domain.decode(self.prereq[index]))
    }

    /// Whether q ⪯ r: every state containing r contains q.
    pub fn is_precedent(&self, q: &str, r: &str) -> Result<bool, KernelError> {
        let q_index = self.index(q)?;
        let r_index = self.index(r)?;
        Ok(self.prereq[r_index] & (1 << q_index) != 0)
    }

    /// Mutual precedence: q and r appear in exactly the same states.
    pub fn equivalent(&self, q: &str, r: &str) -> Result<bool, KernelError> {
        Ok(self.is_precedent(q, r)? && self.is_precedent(r, q)?)
    }

    /// The relation as a label map, item → surmised items.
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.domain
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let surmised = self
                    .domain
                    .decode(self.prereq[i])
                    .into_iter()
                    .map(String::from)
                    .collect();
                (item.clone(), surmised)
            })
            .collect()
    }

    fn index(&self, item: &str) -> Result<usize, KernelError> {
        self.domain
            .index_of(item)
            .ok_or_else(|| KernelError::UnknownItem {
                item: item.to_string(),
            })
    }
}

impl std::fmt::Display for SurmiseRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (item, surmised) in self.to_map() {
            writeln!(f, "{item} ⟵ {}", surmised.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_structure() -> KnowledgeStructure {
        // a ⪯ b ⪯ c: states ∅, a, ab, abc.
        let domain = Domain::new(["a", "b", "c"]).unwrap();
        KnowledgeStructure::from_state_labels(
            domain,
            [vec![], vec!["a"], vec!["a", "b"], vec!["a", "b", "c"]],
        )
        .unwrap()
    }

    #[test]
    fn chain_precedence() {
        let surmise = SurmiseRelation::derive(&chain_structure());
        assert!(surmise.is_precedent("a", "b").unwrap());
        assert!(surmise.is_precedent("a", "c").unwrap());
        assert!(surmise.is_precedent("b", "c").unwrap());
        assert!(!surmise.is_precedent("c", "a").unwrap());
        assert_eq!(surmise.prerequisites_of("c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(surmise.prerequisites_of("a").unwrap(), vec!["a"]);
    }

    #[test]
    fn precedence_is_reflexive() {
        let surmise = SurmiseRelation::derive(&chain_structure());
        for item in ["a", "b", "c"] {
            assert!(surmise.is_precedent(item, item).unwrap());
        }
    }

    #[test]
    fn equivalence_matches_notions() {
        // a and c always occur together.
        let domain = Domain::new(["a", "b", "c"]).unwrap();
        let ks = KnowledgeStructure::from_state_labels(
            domain,
            [vec![], vec!["a", "c"], vec!["a", "b", "c"]],
        )
        .unwrap();
        let surmise = SurmiseRelation::derive(&ks);
        assert!(surmise.equivalent("a", "c").unwrap());
        assert!(!surmise.equivalent("a", "b").unwrap());

        let notion = ks.notion("a").unwrap();
        assert_eq!(notion, ks.domain().encode(["a", "c"]).unwrap());
    }

    #[test]
    fn unknown_item_is_reported() {
        let surmise = SurmiseRelation::derive(&chain_structure());
        assert!(matches!(
            surmise.is_precedent("a", "z"),
            Err(KernelError::UnknownItem { .. })
        ));
    }

    #[test]
    fn map_form_is_deterministic() {
        let surmise = SurmiseRelation::derive(&chain_structure());
        let map = surmise.to_map();
        assert_eq!(map["b"], vec!["a".to_string(), "b".to_string()]);
    }
}
