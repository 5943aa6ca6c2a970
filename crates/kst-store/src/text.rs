//! The text states format.
//!
//! ```text
//! # a three-item learning space
//! A
//! B
//! A,B
//! A,C
//! B,C
//! A,B,C
//! ```
//!
//! Each line is one state; items are separated by the configured
//! separator; spaces are ignored. The domain is the union of all listed
//! states and the empty state is implied. The whole domain must appear
//! as a line, since a structure without Q among its states does not exist.

use crate::StoreError;
use kst_kernel::{Domain, KnowledgeStructure};
use std::collections::BTreeSet;

/// Separator configuration for the text format.
#[derive(Debug, Clone)]
pub struct TextFormat {
    pub item_separator: char,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            item_separator: ',',
        }
    }
}

/// Parse the text states format into a knowledge structure.
pub fn parse_states(text: &str, format: &TextFormat) -> Result<KnowledgeStructure, StoreError> {
    let mut states: Vec<BTreeSet<String>> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line: String = raw.chars().filter(|c| !matches!(c, ' ' | '\r')).collect();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut state = BTreeSet::new();
        for item in line.split(format.item_separator) {
            if item.is_empty() {
                return Err(StoreError::Parse {
                    line: line_no + 1,
                    message: format!("empty item in state '{raw}'"),
                });
            }
            state.insert(item.to_string());
        }
        states.push(state);
    }

    let mut items: BTreeSet<String> = BTreeSet::new();
    for state in &states {
        items.extend(state.iter().cloned());
    }
    if items.is_empty() {
        return Err(StoreError::Parse {
            line: 0,
            message: "no states listed".to_string(),
        });
    }

    let domain = Domain::new(items)?;
    // The empty state is implied.
    states.push(BTreeSet::new());
    let structure = KnowledgeStructure::from_state_labels(
        domain,
        states
            .iter()
            .map(|state| state.iter().map(String::as_str).collect::<Vec<_>>()),
    )?;
    Ok(structure)
}

/// Render a structure in the canonical text form.
///
/// States appear in ascending cardinality order; ∅ is omitted (it is
/// implied on parse), so the round trip is exact.
pub fn render_states(ks: &KnowledgeStructure, format: &TextFormat) -> String {
    let sep = format.item_separator.to_string();
    let mut out = String::new();
    for state in ks.ordered_states() {
        if state == 0 {
            continue;
        }
        out.push_str(&ks.domain().decode(state).join(&sep));
        out.push('\n');
    }
    out
}
