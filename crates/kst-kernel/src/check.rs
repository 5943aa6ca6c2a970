//! The law checker: run every family law and collect witnesses.
//!
//! Construction already guarantees ∅ and Q are states, so the report
//! concentrates on the laws that grade the classification ladder. Each
//! violation renders its offending states as label sets so reports stay
//! readable without the mask encoding.

use crate::family::GapDirection;
use crate::space::Classification;
use crate::structure::KnowledgeStructure;
use serde::{Deserialize, Serialize};

/// Cap on witnesses reported per law.
pub const VIOLATION_SAMPLE_LIMIT: usize = 25;

/// The family laws the checker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Law {
    UnionClosure,
    WellGradedness,
    Accessibility,
}

impl std::fmt::Display for Law {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnionClosure => write!(f, "union closure"),
            Self::WellGradedness => write!(f, "well-gradedness"),
            Self::Accessibility => write!(f, "accessibility"),
        }
    }
}

/// A concrete violation of a family law.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawViolation {
    pub law: Law,
    pub description: String,
    /// The offending states, rendered as item-label sets.
    pub states: Vec<Vec<String>>,
}

impl std::fmt::Display for LawViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.law, self.description)
    }
}

/// The full law-by-law report for a structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub classification: Classification,
    pub violations: Vec<LawViolation>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Run every family law against a structure, collecting up to
/// [`VIOLATION_SAMPLE_LIMIT`] witnesses per law.
pub fn run_checks(ks: &KnowledgeStructure) -> CheckReport {
    let domain = ks.domain();
    let family = ks.family();
    let full = domain.full_mask();
    let mut violations = Vec::new();

    let labels = |mask| {
        domain
            .decode(mask)
            .into_iter()
            .map(String::from)
            .collect::<Vec<String>>()
    };

    for gap in family.closure_gaps(VIOLATION_SAMPLE_LIMIT) {
        violations.push(LawViolation {
            law: Law::UnionClosure,
            description: format!(
                "{} ∪ {} = {} is not a state",
                domain.render(gap.left),
                domain.render(gap.right),
                domain.render(gap.missing)
            ),
            states: vec![labels(gap.left), labels(gap.right), labels(gap.missing)],
        });
    }

    for gap in family.gradation_gaps(full, VIOLATION_SAMPLE_LIMIT) {
        let description = match gap.direction {
            GapDirection::CannotShed => {
                format!("state {} cannot shed any item", domain.render(gap.state))
            }
            GapDirection::CannotLearn => {
                format!("state {} cannot learn any item", domain.render(gap.state))
            }
        };
        violations.push(LawViolation {
            law: Law::WellGradedness,
            description,
            states: vec![labels(gap.state)],
        });
    }

    if let Some(state) = family.find_accessibility_gap() {
        violations.push(LawViolation {
            law: Law::Accessibility,
            description: format!(
                "non-empty state {} cannot shed any item",
                domain.render(state)
            ),
            states: vec![labels(state)],
        });
    }

    CheckReport {
        classification: crate::space::classify(ks),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    fn structure(labels: &[&str], states: &[&str]) -> KnowledgeStructure {
        let domain = Domain::new(labels.iter().copied()).unwrap();
        KnowledgeStructure::from_state_labels(
            domain,
            states
                .iter()
                .map(|s| s.chars().map(String::from).collect::<Vec<_>>()),
        )
        .unwrap()
    }

    #[test]
    fn clean_report_for_learning_space() {
        let ks = structure(&["A", "B", "C"], &["", "A", "B", "AB", "AC", "BC", "ABC"]);
        let report = run_checks(&ks);
        assert!(report.is_clean());
        assert_eq!(report.classification, Classification::LearningSpace);
    }

    #[test]
    fn closure_violations_carry_the_missing_union() {
        let ks = structure(&["a", "b", "c"], &["", "a", "b", "abc"]);
        let report = run_checks(&ks);
        assert_eq!(report.classification, Classification::Structure);

        let closure: Vec<&LawViolation> = report
            .violations
            .iter()
            .filter(|v| v.law == Law::UnionClosure)
            .collect();
        assert_eq!(closure.len(), 1);
        assert_eq!(closure[0].states[2], vec!["a".to_string(), "b".to_string()]);
        insta::assert_snapshot!(
            closure[0].to_string(),
            @"union closure: {a} ∪ {b} = {a,b} is not a state"
        );
    }

    #[test]
    fn space_without_gradation_reports_both_laws() {
        let ks = structure(&["a", "b", "c"], &["", "ab", "abc"]);
        let report = run_checks(&ks);
        assert_eq!(report.classification, Classification::Space);
        assert!(report.violations.iter().any(|v| v.law == Law::WellGradedness));
        assert!(report.violations.iter().any(|v| v.law == Law::Accessibility));
    }

    #[test]
    fn report_serializes_with_labels() {
        let ks = structure(&["a", "b", "c"], &["", "ab", "abc"]);
        let report = run_checks(&ks);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["classification"], "space");
        assert_eq!(json["violations"][0]["law"], "well_gradedness");
    }
}
