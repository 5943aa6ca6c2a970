//! Probabilistic knowledge structures: (Q, 𝒦, L).
//!
//! The distribution L assigns each state of a knowledge structure a
//! probability. During assessment it plays the role of the likelihood
//! of each state being the learner's latent state.

use crate::error::AssessError;
use kst_kernel::{KnowledgeStructure, StateMask};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slack allowed when comparing a distribution's total mass to 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// A knowledge structure with a probability distribution on its states.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProbabilisticDoc", into = "ProbabilisticDoc")]
pub struct ProbabilisticKnowledgeStructure {
    structure: KnowledgeStructure,
    distribution: BTreeMap<StateMask, f64>,
}

/// Persisted document form: each state as labels with its probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilisticDoc {
    pub domain: Vec<String>,
    pub states: Vec<WeightedStateDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedStateDoc {
    pub items: Vec<String>,
    pub p: f64,
}

impl ProbabilisticKnowledgeStructure {
    /// Attach a distribution to a structure.
    ///
    /// States absent from `probabilities` get probability 0. Keys that
    /// are not states of the structure are rejected, as are negative
    /// probabilities and totals away from 1.
    pub fn new(
        structure: KnowledgeStructure,
        probabilities: BTreeMap<StateMask, f64>,
    ) -> Result<Self, AssessError> {
        for (&state, &p) in &probabilities {
            if !structure.family().contains(state) {
                return Err(AssessError::UnknownState {
                    state: structure.domain().render(state),
                });
            }
            if p < 0.0 {
                return Err(AssessError::NegativeProbability {
                    state: structure.domain().render(state),
                    p,
                });
            }
        }

        let sum: f64 = probabilities.values().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(AssessError::DistributionSum { sum });
        }

        let distribution = structure
            .family()
            .iter()
            .map(|state| (state, probabilities.get(&state).copied().unwrap_or(0.0)))
            .collect();

        Ok(Self {
            structure,
            distribution,
        })
    }

    /// The uniform prior: every state equally likely.
    pub fn uniform(structure: KnowledgeStructure) -> Self {
        let n = structure.state_count() as f64;
        let distribution = structure.family().iter().map(|s| (s, 1.0 / n)).collect();
        Self {
            structure,
            distribution,
        }
    }

    /// All mass on a single state.
    pub fn point_mass(
        structure: KnowledgeStructure,
        state: StateMask,
    ) -> Result<Self, AssessError> {
        let probabilities = BTreeMap::from([(state, 1.0)]);
        Self::new(structure, probabilities)
    }

    pub fn structure(&self) -> &KnowledgeStructure {
        &self.structure
    }

    pub fn distribution(&self) -> &BTreeMap<StateMask, f64> {
        &self.distribution
    }

    /// Probability of a single state (0 for non-states).
    pub fn probability_of_state(&self, state: StateMask) -> f64 {
        self.distribution.get(&state).copied().unwrap_or(0.0)
    }

    /// Total mass of states containing the item at `bit`.
    pub fn item_mass(&self, bit: usize) -> f64 {
        let mask = 1u64 << bit;
        self.distribution
            .iter()
            .filter(|(state, _)| *state & mask != 0)
            .map(|(_, p)| p)
            .sum()
    }

    /// Total mass of states containing the labeled item.
    pub fn probability_of_item(&self, item: &str) -> Result<f64, AssessError> {
        let bit = self
            .structure
            .domain()
            .index_of(item)
            .ok_or_else(|| kst_kernel::KernelError::UnknownItem {
                item: item.to_string(),
            })?;
        Ok(self.item_mass(bit))
    }

    /// The state with the highest probability; ties break toward the
    /// smaller mask.
    pub fn most_likely_state(&self) -> (StateMask, f64) {
        let mut best = (0u64, f64::NEG_INFINITY);
        for (&state, &p) in &self.distribution {
            if p > best.1 {
                best = (state, p);
            }
        }
        best
    }

    /// Replace the distribution, re-validating it.
    pub fn with_distribution(
        &self,
        probabilities: BTreeMap<StateMask, f64>,
    ) -> Result<Self, AssessError> {
        Self::new(self.structure.clone(), probabilities)
    }
}

impl TryFrom<ProbabilisticDoc> for ProbabilisticKnowledgeStructure {
    type Error = AssessError;

    fn try_from(doc: ProbabilisticDoc) -> Result<Self, Self::Error> {
        let domain = kst_kernel::Domain::new(doc.domain)?;
        let mut probabilities = BTreeMap::new();
        let mut masks = Vec::with_capacity(doc.states.len());
        for state in &doc.states {
            let mask = domain.encode(state.items.iter().map(String::as_str))?;
            probabilities.insert(mask, state.p);
            masks.push(mask);
        }
        let structure = KnowledgeStructure::new(domain, masks)?;
        Self::new(structure, probabilities)
    }
}

impl From<ProbabilisticKnowledgeStructure> for ProbabilisticDoc {
    fn from(pks: ProbabilisticKnowledgeStructure) -> Self {
        let states = pks
            .structure
            .ordered_states()
            .into_iter()
            .map(|state| WeightedStateDoc {
                items: pks
                    .structure
                    .domain()
                    .decode(state)
                    .into_iter()
                    .map(String::from)
                    .collect(),
                p: pks.probability_of_state(state),
            })
            .collect();
        Self {
            domain: pks.structure.domain().items().to_vec(),
            states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kst_kernel::Domain;

    fn structure() -> KnowledgeStructure {
        let domain = Domain::new(["a", "b", "c"]).unwrap();
        KnowledgeStructure::from_state_labels(
            domain,
            [
                vec![],
                vec!["a"],
                vec!["b"],
                vec!["a", "b"],
                vec!["a", "c"],
                vec!["b", "c"],
                vec!["a", "b", "c"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn uniform_distributes_evenly() {
        let pks = ProbabilisticKnowledgeStructure::uniform(structure());
        let p = pks.probability_of_state(0);
        assert!((p - 1.0 / 7.0).abs() < 1e-12);
        let total: f64 = pks.distribution().values().sum();
        assert!((total - 1.0).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn missing_states_default_to_zero() {
        let ks = structure();
        let full = ks.domain().full_mask();
        let pks =
            ProbabilisticKnowledgeStructure::new(ks, BTreeMap::from([(full, 1.0)])).unwrap();
        assert_eq!(pks.probability_of_state(0), 0.0);
        assert_eq!(pks.probability_of_state(full), 1.0);
        assert_eq!(pks.distribution().len(), 7);
    }

    #[test]
    fn negative_probability_rejected() {
        let ks = structure();
        let err = ProbabilisticKnowledgeStructure::new(
            ks,
            BTreeMap::from([(0u64, -1.0), (0b111, 2.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, AssessError::NegativeProbability { .. }));
    }

    #[test]
    fn off_by_more_than_tolerance_rejected() {
        let ks = structure();
        let err =
            ProbabilisticKnowledgeStructure::new(ks, BTreeMap::from([(0b111u64, 0.5)]))
                .unwrap_err();
        assert!(matches!(err, AssessError::DistributionSum { .. }));
    }

    #[test]
    fn ten_tenths_is_accepted() {
        // 10 × 0.1 does not sum to exactly 1.0 in floating point; the
        // tolerance must absorb that.
        let domain = Domain::new(["a", "b", "c", "d"]).unwrap();
        let states: Vec<Vec<&str>> = vec![
            vec![],
            vec!["a"],
            vec!["b"],
            vec!["a", "b"],
            vec!["a", "c"],
            vec!["b", "c"],
            vec!["a", "b", "c"],
            vec!["a", "b", "d"],
            vec!["a", "c", "d"],
            vec!["a", "b", "c", "d"],
        ];
        let ks = KnowledgeStructure::from_state_labels(domain, states).unwrap();
        assert_eq!(ks.state_count(), 10);
        let probabilities: BTreeMap<StateMask, f64> =
            ks.family().iter().map(|s| (s, 0.1)).collect();
        assert!(ProbabilisticKnowledgeStructure::new(ks, probabilities).is_ok());
    }

    #[test]
    fn unknown_state_rejected() {
        let ks = structure();
        let err = ProbabilisticKnowledgeStructure::new(
            ks,
            BTreeMap::from([(0b100u64, 1.0)]), // {c} is not a state
        )
        .unwrap_err();
        assert!(matches!(err, AssessError::UnknownState { .. }));
    }

    #[test]
    fn item_mass_sums_containing_states() {
        let pks = ProbabilisticKnowledgeStructure::uniform(structure());
        // a appears in 4 of 7 states.
        let p = pks.probability_of_item("a").unwrap();
        assert!((p - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn most_likely_state_breaks_ties_low() {
        let pks = ProbabilisticKnowledgeStructure::uniform(structure());
        let (state, _) = pks.most_likely_state();
        assert_eq!(state, 0);
    }

    #[test]
    fn document_roundtrip() {
        let ks = structure();
        let full = ks.domain().full_mask();
        let pks = ProbabilisticKnowledgeStructure::point_mass(ks, full).unwrap();
        let json = serde_json::to_string(&pks).unwrap();
        let back: ProbabilisticKnowledgeStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(back.probability_of_state(full), 1.0);
        assert_eq!(back.structure().state_count(), 7);
    }
}
