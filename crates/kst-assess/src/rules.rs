//! Questioning and updating rules: the pluggable seams of the
//! assessment procedure.
//!
//! A questioning rule decides which item to ask next from the current
//! likelihood; an updating rule reshapes the likelihood once a response
//! arrives. The predefined pair (half-split questioning with the
//! multiplicative local-independence update) covers the common case;
//! custom strategies implement the traits.

use crate::error::AssessError;
use crate::probabilistic::ProbabilisticKnowledgeStructure;
use kst_kernel::StateMask;
use std::collections::BTreeMap;

/// Selects the next item to ask.
pub trait QuestioningRule {
    /// Name of this rule (for diagnostics).
    fn name(&self) -> &str;

    /// The index of the next item to ask, or `None` when no item would
    /// be informative.
    fn select(&self, pks: &ProbabilisticKnowledgeStructure) -> Option<usize>;
}

/// Reshapes the likelihood after a response.
pub trait UpdatingRule {
    /// Name of this rule (for diagnostics).
    fn name(&self) -> &str;

    /// The posterior over states after observing `response` to the item
    /// at index `question`.
    fn update(
        &self,
        pks: &ProbabilisticKnowledgeStructure,
        question: usize,
        response: bool,
    ) -> Result<BTreeMap<StateMask, f64>, AssessError>;
}

/// Ask the item whose mastery probability is closest to one half.
///
/// Items whose mass has already collapsed past the margin are skipped;
/// when every item is settled the rule returns `None` and the
/// assessment has nothing left to learn. Ties break toward the lower
/// item index.
#[derive(Debug, Clone, Copy)]
pub struct HalfSplit {
    /// An item is settled when its mass is within this margin of 0 or 1.
    pub settled_margin: f64,
}

impl Default for HalfSplit {
    fn default() -> Self {
        Self {
            settled_margin: 1e-3,
        }
    }
}

impl QuestioningRule for HalfSplit {
    fn name(&self) -> &str {
        "half_split"
    }

    fn select(&self, pks: &ProbabilisticKnowledgeStructure) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for index in 0..pks.structure().domain().len() {
            let mass = pks.item_mass(index);
            if mass <= self.settled_margin || mass >= 1.0 - self.settled_margin {
                continue;
            }
            let distance = (mass - 0.5).abs();
            let better = match best {
                Some((_, best_distance)) => distance < best_distance,
                None => true,
            };
            if better {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// The multiplicative update under local independence.
///
/// A correct answer to q multiplies states containing q by (1 − slip)
/// and states without q by guess; an incorrect answer uses slip and
/// (1 − guess). The posterior is renormalized.
#[derive(Debug, Clone, Copy)]
pub struct MultiplicativeUpdate {
    slip: f64,
    guess: f64,
}

impl MultiplicativeUpdate {
    /// Both parameters must lie in [0, 1).
    pub fn new(slip: f64, guess: f64) -> Result<Self, AssessError> {
        for (name, value) in [("slip", slip), ("guess", guess)] {
            if !(0.0..1.0).contains(&value) {
                return Err(AssessError::InvalidParameter { name, value });
            }
        }
        Ok(Self { slip, guess })
    }

    pub fn slip(&self) -> f64 {
        self.slip
    }

    pub fn guess(&self) -> f64 {
        self.guess
    }

    fn likelihood(&self, contains: bool, response: bool) -> f64 {
        match (contains, response) {
            (true, true) => 1.0 - self.slip,
            (true, false) => self.slip,
            (false, true) => self.guess,
            (false, false) => 1.0 - self.guess,
        }
    }
}

impl UpdatingRule for MultiplicativeUpdate {
    fn name(&self) -> &str {
        "multiplicative"
    }

    fn update(
        &self,
        pks: &ProbabilisticKnowledgeStructure,
        question: usize,
        response: bool,
    ) -> Result<BTreeMap<StateMask, f64>, AssessError> {
        let bit = 1u64 << question;

        let mut posterior: BTreeMap<StateMask, f64> = BTreeMap::new();
        let mut total = 0.0;
        for (&state, &p) in pks.distribution() {
            let weighted = p * self.likelihood(state & bit != 0, response);
            total += weighted;
            posterior.insert(state, weighted);
        }

        if total <= 0.0 {
            return Err(AssessError::DegenerateUpdate);
        }

        for p in posterior.values_mut() {
            *p /= total;
        }
        Ok(posterior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kst_kernel::{Domain, KnowledgeStructure};

    fn uniform_pks() -> ProbabilisticKnowledgeStructure {
        let domain = Domain::new(["a", "b", "c"]).unwrap();
        let ks = KnowledgeStructure::from_state_labels(
            domain,
            [
                vec![],
                vec!["a"],
                vec!["a", "b"],
                vec!["a", "b", "c"],
            ],
        )
        .unwrap();
        ProbabilisticKnowledgeStructure::uniform(ks)
    }

    #[test]
    fn half_split_prefers_the_most_uncertain_item() {
        // Chain ∅ ⊂ a ⊂ ab ⊂ abc, uniform prior: masses are
        // a: 3/4, b: 2/4, c: 1/4, so b sits exactly on one half.
        let pks = uniform_pks();
        let rule = HalfSplit::default();
        assert_eq!(rule.select(&pks), Some(1));
    }

    #[test]
    fn half_split_skips_settled_items() {
        let pks = uniform_pks();
        let full = pks.structure().domain().full_mask();
        let certain = pks
            .with_distribution(std::collections::BTreeMap::from([(full, 1.0)]))
            .unwrap();
        // All mass on abc: every item settled at 1.
        assert_eq!(HalfSplit::default().select(&certain), None);
    }

    #[test]
    fn multiplicative_update_moves_mass_toward_consistency() {
        let pks = uniform_pks();
        let rule = MultiplicativeUpdate::new(0.0, 0.0).unwrap();

        // Correct answer to b: only ab and abc survive.
        let posterior = rule.update(&pks, 1, true).unwrap();
        let ab = pks.structure().domain().encode(["a", "b"]).unwrap();
        let abc = pks.structure().domain().full_mask();
        assert!((posterior[&ab] - 0.5).abs() < 1e-12);
        assert!((posterior[&abc] - 0.5).abs() < 1e-12);
        assert_eq!(posterior[&0], 0.0);
    }

    #[test]
    fn noisy_update_keeps_all_states_alive() {
        let pks = uniform_pks();
        let rule = MultiplicativeUpdate::new(0.1, 0.1).unwrap();
        let posterior = rule.update(&pks, 1, true).unwrap();
        assert!(posterior.values().all(|&p| p > 0.0));
        let total: f64 = posterior.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_update_is_an_error() {
        // All mass on abc, then a noiseless incorrect answer to a:
        // impossible under the model, so mass vanishes.
        let pks = uniform_pks();
        let full = pks.structure().domain().full_mask();
        let certain = pks
            .with_distribution(std::collections::BTreeMap::from([(full, 1.0)]))
            .unwrap();
        let rule = MultiplicativeUpdate::new(0.0, 0.0).unwrap();
        assert!(matches!(
            rule.update(&certain, 0, false),
            Err(AssessError::DegenerateUpdate)
        ));
    }

    #[test]
    fn parameters_are_validated() {
        assert!(matches!(
            MultiplicativeUpdate::new(1.0, 0.0),
            Err(AssessError::InvalidParameter { name: "slip", .. })
        ));
        assert!(matches!(
            MultiplicativeUpdate::new(0.0, -0.1),
            Err(AssessError::InvalidParameter { name: "guess", .. })
        ));
    }
}
