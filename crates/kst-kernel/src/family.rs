//! Families of knowledge states and the family laws.
//!
//! A family is a deduplicated set of state masks. Three laws matter:
//!
//! - **Union closure**: K, L ∈ 𝒦 ⟹ K ∪ L ∈ 𝒦. A finite family is
//!   closed under arbitrary unions iff it is closed under pairwise
//!   unions, so the pairwise check decides the law.
//! - **Well-gradedness**: every state has a non-empty inner fringe
//!   (an item it can shed) unless it is ∅, and a non-empty outer fringe
//!   (an item it can learn) unless it is the whole domain.
//! - **Accessibility** ([MA]): every non-empty state has a non-empty
//!   inner fringe.
//!
//! Every check surfaces a deterministic witness of the first gap in
//! ascending mask order.

use crate::domain::{StateMask, bits_of};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Witness that a pairwise union is missing from a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureGap {
    /// First state of the offending pair.
    pub left: StateMask,

    /// Second state of the offending pair.
    pub right: StateMask,

    /// Their union, absent from the family.
    pub missing: StateMask,
}

/// Which direction a gradation gap points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDirection {
    /// The state has an empty inner fringe (no item can be shed).
    CannotShed,

    /// The state has an empty outer fringe (no item can be learned).
    CannotLearn,
}

/// Witness that a state blocks one-item-at-a-time gradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradationGap {
    /// The state with the empty fringe.
    pub state: StateMask,

    pub direction: GapDirection,
}

impl std::fmt::Display for ClosureGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ∪ {} = {} is not a state",
            fmt_bits(self.left),
            fmt_bits(self.right),
            fmt_bits(self.missing)
        )
    }
}

impl std::fmt::Display for GradationGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            GapDirection::CannotShed => {
                write!(f, "state {} cannot shed any item", fmt_bits(self.state))
            }
            GapDirection::CannotLearn => {
                write!(f, "state {} cannot learn any item", fmt_bits(self.state))
            }
        }
    }
}

/// Render a mask as its item indices, e.g. `{0,2}`.
fn fmt_bits(mask: StateMask) -> String {
    let parts: Vec<String> = bits_of(mask).into_iter().map(|b| b.to_string()).collect();
    format!("{{{}}}", parts.join(","))
}

/// A deduplicated family of knowledge states in ascending mask order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFamily {
    states: BTreeSet<StateMask>,
}

impl StateFamily {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of states in the family.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, state: StateMask) -> bool {
        self.states.contains(&state)
    }

    /// Insert a state; returns false if it was already present.
    pub fn insert(&mut self, state: StateMask) -> bool {
        self.states.insert(state)
    }

    /// States in ascending mask order.
    pub fn iter(&self) -> impl Iterator<Item = StateMask> + '_ {
        self.states.iter().copied()
    }

    /// The union of every state: the domain the family spans.
    pub fn union_of_all(&self) -> StateMask {
        self.states.iter().fold(0, |acc, &s| acc | s)
    }

    /// First pair whose union is missing, in ascending mask order.
    pub fn find_closure_gap(&self) -> Option<ClosureGap> {
        let states: Vec<StateMask> = self.states.iter().copied().collect();
        for i in 0..states.len() {
            for j in (i + 1)..states.len() {
                let union = states[i] | states[j];
                if union != states[i] && union != states[j] && !self.states.contains(&union) {
                    return Some(ClosureGap {
                        left: states[i],
                        right: states[j],
                        missing: union,
                    });
                }
            }
        }
        None
    }

    /// Every missing pairwise union, capped at `limit` witnesses.
    pub fn closure_gaps(&self, limit: usize) -> Vec<ClosureGap> {
        let states: Vec<StateMask> = self.states.iter().copied().collect();
        let mut gaps = Vec::new();
        let mut seen_missing = BTreeSet::new();
        for i in 0..states.len() {
            for j in (i + 1)..states.len() {
                let union = states[i] | states[j];
                if union != states[i]
                    && union != states[j]
                    && !self.states.contains(&union)
                    && seen_missing.insert(union)
                {
                    gaps.push(ClosureGap {
                        left: states[i],
                        right: states[j],
                        missing: union,
                    });
                    if gaps.len() == limit {
                        return gaps;
                    }
                }
            }
        }
        gaps
    }

    pub fn is_union_closed(&self) -> bool {
        self.find_closure_gap().is_none()
    }

    /// The span: smallest union-closed family containing this one and ∅.
    ///
    /// Fixpoint of pairwise unions. Idempotent on union-closed families.
    pub fn union_closure(&self) -> StateFamily {
        let mut closed: BTreeSet<StateMask> = self.states.clone();
        closed.insert(0);
        loop {
            let snapshot: Vec<StateMask> = closed.iter().copied().collect();
            let mut added = Vec::new();
            for i in 0..snapshot.len() {
                for j in (i + 1)..snapshot.len() {
                    let union = snapshot[i] | snapshot[j];
                    if !closed.contains(&union) {
                        added.push(union);
                    }
                }
            }
            if added.is_empty() {
                break;
            }
            closed.extend(added);
        }
        StateFamily { states: closed }
    }

    /// Items whose removal from `state` stays in the family.
    pub fn inner_fringe(&self, state: StateMask) -> StateMask {
        let mut fringe = 0;
        for bit in bits_of(state) {
            if self.states.contains(&(state & !(1 << bit))) {
                fringe |= 1 << bit;
            }
        }
        fringe
    }

    /// Items whose addition to `state` stays in the family.
    pub fn outer_fringe(&self, state: StateMask, full: StateMask) -> StateMask {
        let mut fringe = 0;
        for bit in bits_of(full & !state) {
            if self.states.contains(&(state | (1 << bit))) {
                fringe |= 1 << bit;
            }
        }
        fringe
    }

    /// First state with an empty fringe it should have, in ascending
    /// mask order. Shedding gaps are reported before learning gaps for
    /// the same state.
    pub fn find_gradation_gap(&self, full: StateMask) -> Option<GradationGap> {
        self.gradation_gaps(full, 1).into_iter().next()
    }

    /// Every gradation gap, capped at `limit` witnesses.
    pub fn gradation_gaps(&self, full: StateMask, limit: usize) -> Vec<GradationGap> {
        let mut gaps = Vec::new();
        for &state in &self.states {
            if state != 0 && self.inner_fringe(state) == 0 {
                gaps.push(GradationGap {
                    state,
                    direction: GapDirection::CannotShed,
                });
                if gaps.len() == limit {
                    return gaps;
                }
            }
            if state != full && self.outer_fringe(state, full) == 0 {
                gaps.push(GradationGap {
                    state,
                    direction: GapDirection::CannotLearn,
                });
                if gaps.len() == limit {
                    return gaps;
                }
            }
        }
        gaps
    }

    pub fn is_well_graded(&self, full: StateMask) -> bool {
        self.find_gradation_gap(full).is_none()
    }

    /// First non-empty state with an empty inner fringe, if any ([MA]).
    pub fn find_accessibility_gap(&self) -> Option<StateMask> {
        self.states
            .iter()
            .copied()
            .find(|&state| state != 0 && self.inner_fringe(state) == 0)
    }

    pub fn is_accessible(&self) -> bool {
        self.find_accessibility_gap().is_none()
    }

    /// Union-closed and accessible.
    pub fn is_antimatroid(&self) -> bool {
        self.is_union_closed() && self.is_accessible()
    }

    /// Minimal states containing the given item: the atoms at it.
    pub fn minimal_containing(&self, item: usize) -> Vec<StateMask> {
        let bit = 1u64 << item;
        let with: Vec<StateMask> = self
            .states
            .iter()
            .copied()
            .filter(|s| s & bit != 0)
            .collect();
        with.iter()
            .copied()
            .filter(|s| !with.iter().any(|t| t != s && t & s == *t))
            .collect()
    }
}

impl FromIterator<StateMask> for StateFamily {
    fn from_iter<I: IntoIterator<Item = StateMask>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// {∅, a, b, ab, ac, bc, abc} over bits a=0, b=1, c=2.
    fn learning_family() -> StateFamily {
        [0b000, 0b001, 0b010, 0b011, 0b101, 0b110, 0b111]
            .into_iter()
            .collect()
    }

    #[test]
    fn learning_family_satisfies_all_laws() {
        let family = learning_family();
        assert!(family.is_union_closed());
        assert!(family.is_well_graded(0b111));
        assert!(family.is_accessible());
        assert!(family.is_antimatroid());
    }

    #[test]
    fn closure_gap_witness() {
        // {∅, a, b, abc}: a ∪ b = ab is missing.
        let family: StateFamily = [0b000, 0b001, 0b010, 0b111].into_iter().collect();
        let gap = family.find_closure_gap().expect("family is not closed");
        assert_eq!(gap.left, 0b001);
        assert_eq!(gap.right, 0b010);
        assert_eq!(gap.missing, 0b011);
        assert_eq!(gap.to_string(), "{0} ∪ {1} = {0,1} is not a state");
    }

    #[test]
    fn subset_pairs_are_not_gaps() {
        // b ⊂ ab: their union is ab itself, not a gap.
        let family: StateFamily = [0b000, 0b010, 0b011].into_iter().collect();
        assert!(family.is_union_closed());
    }

    #[test]
    fn union_closure_spans_the_family() {
        let family: StateFamily = [0b001, 0b010, 0b100].into_iter().collect();
        let span = family.union_closure();
        // All eight subsets of {a,b,c}: the free space on three atoms.
        assert_eq!(span.len(), 8);
        assert!(span.contains(0));
        assert!(span.contains(0b111));
    }

    #[test]
    fn union_closure_is_idempotent() {
        let family = learning_family();
        assert_eq!(family.union_closure(), family);
    }

    #[test]
    fn fringes() {
        let family = learning_family();
        // ac = {a,c}: can shed c (→ a) but not a ({c} is no state).
        assert_eq!(family.inner_fringe(0b101), 0b100);
        // ac can learn b (→ abc).
        assert_eq!(family.outer_fringe(0b101, 0b111), 0b010);
        // ∅ has an empty inner fringe by definition.
        assert_eq!(family.inner_fringe(0), 0);
    }

    #[test]
    fn gradation_gap_witness() {
        // {∅, ab, abc}: ab can shed nothing, ∅ can learn nothing.
        let family: StateFamily = [0b000, 0b011, 0b111].into_iter().collect();
        let gap = family.find_gradation_gap(0b111).expect("not well-graded");
        assert_eq!(gap.state, 0b000);
        assert_eq!(gap.direction, GapDirection::CannotLearn);

        let all = family.gradation_gaps(0b111, 16);
        assert!(all.contains(&GradationGap {
            state: 0b011,
            direction: GapDirection::CannotShed,
        }));
    }

    #[test]
    fn accessibility_gap_witness() {
        let family: StateFamily = [0b000, 0b011, 0b111].into_iter().collect();
        assert_eq!(family.find_accessibility_gap(), Some(0b011));
        assert!(!family.is_antimatroid());
    }

    #[test]
    fn union_closed_but_not_well_graded() {
        // {∅, ab, abc} is union-closed yet not well-graded.
        let family: StateFamily = [0b000, 0b011, 0b111].into_iter().collect();
        assert!(family.is_union_closed());
        assert!(!family.is_well_graded(0b111));
    }

    #[test]
    fn minimal_containing_returns_all_atoms() {
        // Both ab and cb are minimal at b.
        let family: StateFamily = [0b000, 0b011, 0b110, 0b111].into_iter().collect();
        assert_eq!(family.minimal_containing(1), vec![0b011, 0b110]);
        // a appears only inside ab (and abc); ab is the single atom at a.
        assert_eq!(family.minimal_containing(0), vec![0b011]);
    }

    #[test]
    fn closure_gaps_respect_limit() {
        // Three singletons and no unions at all.
        let family: StateFamily = [0b000, 0b001, 0b010, 0b100].into_iter().collect();
        assert_eq!(family.closure_gaps(2).len(), 2);
        assert!(family.closure_gaps(16).len() >= 3);
    }
}
