//! Domains and knowledge states.
//!
//! A domain Q is a finite set of items. A knowledge state is a subset of
//! Q, encoded as a bitmask over the domain's item indices: bit i is set
//! exactly when the i-th item is mastered.
//!
//! The mask encoding keeps the family algorithms allocation-free: the
//! union of two states is `|`, the overlap is `&`, and a one-item
//! learning step is a single bit flip.

use crate::error::KernelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A knowledge state over a domain's item indices.
pub type StateMask = u64;

/// Maximum number of items a domain can hold (one mask bit per item).
pub const MAX_ITEMS: usize = 64;

/// Extract the item indices set in a mask, ascending.
pub fn bits_of(mask: StateMask) -> Vec<usize> {
    let mut bits = Vec::new();
    let mut m = mask;
    let mut i = 0;
    while m > 0 {
        if m & 1 == 1 {
            bits.push(i);
        }
        m >>= 1;
        i += 1;
    }
    bits
}

/// A domain: the ordered, duplicate-free set of items under study.
///
/// Items are sorted lexicographically at construction, so the same item
/// set always produces the same bit assignment regardless of input order.
/// This makes masks, fingerprints, and rendered output canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Domain {
    items: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl Domain {
    /// Build a domain from item labels.
    ///
    /// Rejects empty domains, empty labels, duplicates, and more than
    /// [`MAX_ITEMS`] items.
    pub fn new<I, S>(labels: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = labels.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(KernelError::EmptyDomain);
        }
        if items.len() > MAX_ITEMS {
            return Err(KernelError::DomainTooLarge { count: items.len() });
        }
        items.sort();

        let mut index = BTreeMap::new();
        for (i, item) in items.iter().enumerate() {
            if item.is_empty() {
                return Err(KernelError::EmptyLabel);
            }
            if index.insert(item.clone(), i).is_some() {
                return Err(KernelError::DuplicateItem { item: item.clone() });
            }
        }

        Ok(Self { items, index })
    }

    /// Number of items in the domain.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// A domain is never empty; this exists for the usual pairing with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The state containing every item.
    pub fn full_mask(&self) -> StateMask {
        if self.items.len() == MAX_ITEMS {
            StateMask::MAX
        } else {
            (1u64 << self.items.len()) - 1
        }
    }

    /// Item labels in index order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Label of the item at `index`.
    pub fn label(&self, index: usize) -> &str {
        &self.items[index]
    }

    /// Index of the item with the given label, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Encode a collection of item labels as a state mask.
    pub fn encode<'a, I>(&self, labels: I) -> Result<StateMask, KernelError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut mask = 0u64;
        for label in labels {
            let i = self
                .index_of(label)
                .ok_or_else(|| KernelError::UnknownItem {
                    item: label.to_string(),
                })?;
            mask |= 1 << i;
        }
        Ok(mask)
    }

    /// Decode a state mask into item labels, in domain order.
    pub fn decode(&self, mask: StateMask) -> Vec<&str> {
        bits_of(mask)
            .into_iter()
            .filter(|&i| i < self.items.len())
            .map(|i| self.items[i].as_str())
            .collect()
    }

    /// Render a state as `{a,b,c}`.
    pub fn render(&self, mask: StateMask) -> String {
        format!("{{{}}}", self.decode(mask).join(","))
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.items.join(", "))
    }
}

impl TryFrom<Vec<String>> for Domain {
    type Error = KernelError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<Domain> for Vec<String> {
    fn from(domain: Domain) -> Self {
        domain.items
    }
}
