//! Knowledge structures: a domain plus a validated family of states.
//!
//! A knowledge structure (Q, 𝒦) requires only that ∅ ∈ 𝒦 and Q ∈ 𝒦.
//! Everything here is independent of the stronger family laws; the
//! classification ladder lives in [`crate::space`].

use crate::domain::{Domain, StateMask, bits_of};
use crate::error::KernelError;
use crate::family::StateFamily;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A validated knowledge structure (Q, 𝒦).
///
/// Invariants established at construction:
/// - the domain is non-empty (and ≤ 64 items),
/// - every state is a subset of the domain,
/// - ∅ and Q are states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StructureDoc", into = "StructureDoc")]
pub struct KnowledgeStructure {
    domain: Domain,
    family: StateFamily,
}

/// The persisted document form: labels only, no masks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureDoc {
    pub domain: Vec<String>,
    pub states: Vec<Vec<String>>,
}

impl KnowledgeStructure {
    /// Build a structure from pre-encoded state masks.
    pub fn new<I>(domain: Domain, states: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = StateMask>,
    {
        let full = domain.full_mask();
        let mut family = StateFamily::new();
        for state in states {
            if state & !full != 0 {
                // A set bit beyond the domain has no label to report.
                let stray = bits_of(state & !full)[0];
                return Err(KernelError::UnknownItem {
                    item: format!("#{stray}"),
                });
            }
            family.insert(state);
        }
        if !family.contains(0) {
            return Err(KernelError::MissingEmptyState);
        }
        if !family.contains(full) {
            return Err(KernelError::MissingFullState);
        }
        Ok(Self { domain, family })
    }

    /// Build a structure from states given as label collections.
    pub fn from_state_labels<I, S, L>(domain: Domain, states: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut masks = Vec::new();
        for state in states {
            let mut mask = 0u64;
            for label in state {
                let label = label.as_ref();
                let i = domain
                    .index_of(label)
                    .ok_or_else(|| KernelError::UnknownItem {
                        item: label.to_string(),
                    })?;
                mask |= 1 << i;
            }
            masks.push(mask);
        }
        Self::new(domain, masks)
    }

    /// The trivial structure (Q, {∅, Q}).
    pub fn trivial(domain: Domain) -> Self {
        let full = domain.full_mask();
        let family: StateFamily = [0, full].into_iter().collect();
        Self { domain, family }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn family(&self) -> &StateFamily {
        &self.family
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.family.len()
    }

    /// States ordered by cardinality, then mask value.
    pub fn ordered_states(&self) -> Vec<StateMask> {
        let mut states: Vec<StateMask> = self.family.iter().collect();
        states.sort_by_key(|s| (s.count_ones(), *s));
        states
    }

    /// States containing the given item.
    pub fn states_with_item(&self, item: &str) -> Result<Vec<StateMask>, KernelError> {
        let bit = self.item_bit(item)?;
        Ok(self.family.iter().filter(|s| s & bit != 0).collect())
    }

    /// States not containing the given item.
    pub fn states_without_item(&self, item: &str) -> Result<Vec<StateMask>, KernelError> {
        let bit = self.item_bit(item)?;
        Ok(self.family.iter().filter(|s| s & bit == 0).collect())
    }

    /// The notion of an item: all items contained in exactly the same
    /// states. Always contains the item itself.
    pub fn notion(&self, item: &str) -> Result<StateMask, KernelError> {
        let index = self.item_index(item)?;
        Ok(self.notion_of_index(index))
    }

    fn notion_of_index(&self, index: usize) -> StateMask {
        let here = self.prerequisite_mask(index);
        let mut notion = 0u64;
        for other in bits_of(here) {
            if self.prerequisite_mask(other) & (1 << index) != 0 {
                notion |= 1 << other;
            }
        }
        notion
    }

    /// Intersection of all states containing the item at `index`.
    ///
    /// Every item in the result appears in every state the given item
    /// appears in; this is the surmise kernel shared with
    /// [`crate::surmise`].
    pub(crate) fn prerequisite_mask(&self, index: usize) -> StateMask {
        let bit = 1u64 << index;
        self.family
            .iter()
            .filter(|s| s & bit != 0)
            .fold(self.domain.full_mask(), |acc, s| acc & s)
    }

    /// The partition of the domain into notions.
    pub fn partition(&self) -> Vec<StateMask> {
        let mut parts = std::collections::BTreeSet::new();
        for index in 0..self.domain.len() {
            parts.insert(self.notion_of_index(index));
        }
        parts.into_iter().collect()
    }

    /// Whether every notion is a singleton.
    pub fn is_discriminative(&self) -> bool {
        (0..self.domain.len()).all(|i| self.notion_of_index(i).count_ones() == 1)
    }

    /// Collapse each notion to a single item labeled by the sorted
    /// concatenation of the notion's labels.
    pub fn discriminative_reduction(&self) -> Result<KnowledgeStructure, KernelError> {
        self.discriminative_reduction_with(|labels| labels.concat())
    }

    /// Collapse each notion to a single item with a caller-supplied
    /// labeling. The join function receives the notion's labels in
    /// domain order and must produce distinct labels for distinct
    /// notions.
    pub fn discriminative_reduction_with<F>(&self, join: F) -> Result<KnowledgeStructure, KernelError>
    where
        F: Fn(&[&str]) -> String,
    {
        let parts = self.partition();

        // Reduced label for the notion covering each original item.
        let mut label_of_part: Vec<String> = Vec::with_capacity(parts.len());
        for &part in &parts {
            let labels: Vec<&str> = self.domain.decode(part);
            label_of_part.push(join(&labels));
        }

        let reduced_domain = Domain::new(label_of_part.iter().cloned())?;

        let mut reduced_states = Vec::with_capacity(self.family.len());
        for state in self.family.iter() {
            let mut labels: Vec<&str> = Vec::new();
            for (part, label) in parts.iter().zip(label_of_part.iter()) {
                // A state contains a whole notion or none of it.
                if state & part != 0 {
                    labels.push(label.as_str());
                }
            }
            reduced_states.push(reduced_domain.encode(labels.iter().copied())?);
        }

        KnowledgeStructure::new(reduced_domain, reduced_states)
    }

    /// All minimal states containing the item: the atoms at it.
    pub fn atoms_at(&self, item: &str) -> Result<Vec<StateMask>, KernelError> {
        let index = self.item_index(item)?;
        Ok(self.family.minimal_containing(index))
    }

    /// Items the given state can shed while staying in the family.
    pub fn inner_fringe(&self, state: StateMask) -> StateMask {
        self.family.inner_fringe(state)
    }

    /// Items the given state can learn while staying in the family.
    pub fn outer_fringe(&self, state: StateMask) -> StateMask {
        self.family.outer_fringe(state, self.domain.full_mask())
    }

    /// SHA-256 fingerprint of the canonical byte form.
    ///
    /// Two structures describe the same (Q, 𝒦) iff their fingerprints
    /// match, independent of input order or persistence format.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"domain:");
        for item in self.domain.items() {
            hasher.update(item.as_bytes());
            hasher.update(b"\n");
        }
        for state in self.family.iter() {
            hasher.update(b"state:");
            hasher.update(state.to_le_bytes());
        }
        let hash = hasher.finalize();
        format!("{hash:x}")
    }

    fn item_index(&self, item: &str) -> Result<usize, KernelError> {
        self.domain
            .index_of(item)
            .ok_or_else(|| KernelError::UnknownItem {
                item: item.to_string(),
            })
    }

    fn item_bit(&self, item: &str) -> Result<StateMask, KernelError> {
        Ok(1u64 << self.item_index(item)?)
    }
}

impl std::fmt::Display for KnowledgeStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Domain: {}", self.domain)?;
        writeln!(f, "States:")?;
        for state in self.ordered_states() {
            writeln!(f, "    {}", self.domain.render(state))?;
        }
        Ok(())
    }
}

impl TryFrom<StructureDoc> for KnowledgeStructure {
    type Error = KernelError;

    fn try_from(doc: StructureDoc) -> Result<Self, Self::Error> {
        let domain = Domain::new(doc.domain)?;
        Self::from_state_labels(domain, doc.states)
    }
}

impl From<KnowledgeStructure> for StructureDoc {
    fn from(ks: KnowledgeStructure) -> Self {
        let states = ks
            .ordered_states()
            .into_iter()
            .map(|s| {
                ks.domain
                    .decode(s)
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .collect();
        Self {
            domain: ks.domain.items().to_vec(),
            states,
        }
    }
}
