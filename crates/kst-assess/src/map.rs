//! The Markov assessment procedure.
//!
//! A step-by-step uncovering of a learner's latent state. Each step asks
//! the question the questioning rule selects, records the response, and
//! lets the updating rule reshape the likelihood over states. The
//! current likelihood drives the next selection, so the whole process is
//! a Markov chain on distributions.
//!
//! Under mild conditions on the rules the likelihood of the latent state
//! converges to 1; `is_settled` tests whether any state has crossed a
//! mass threshold.

use crate::error::AssessError;
use crate::probabilistic::ProbabilisticKnowledgeStructure;
use crate::rules::{QuestioningRule, UpdatingRule};
use chrono::{DateTime, Utc};
use kst_kernel::StateMask;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One asked-and-answered question with its resulting posterior.
#[derive(Debug, Clone)]
pub struct Trial {
    /// Label of the item asked.
    pub question: String,

    /// Whether the response was correct.
    pub response: bool,

    /// The posterior over states after the update.
    pub posterior: BTreeMap<StateMask, f64>,

    pub asked_at: DateTime<Utc>,
}

/// A running assessment session.
pub struct MarkovAssessment {
    session: Uuid,
    pks: ProbabilisticKnowledgeStructure,
    questioning: Box<dyn QuestioningRule>,
    updating: Box<dyn UpdatingRule>,
    pending: Option<usize>,
    trials: Vec<Trial>,
}

impl MarkovAssessment {
    /// Start a session from an initial likelihood and a rule pair.
    pub fn new(
        pks: ProbabilisticKnowledgeStructure,
        questioning: Box<dyn QuestioningRule>,
        updating: Box<dyn UpdatingRule>,
    ) -> Self {
        Self {
            session: Uuid::new_v4(),
            pks,
            questioning,
            updating,
            pending: None,
            trials: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    /// The current likelihood over states.
    pub fn likelihood(&self) -> &ProbabilisticKnowledgeStructure {
        &self.pks
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Select the next question, or return the one already pending.
    ///
    /// Returns the item index; `None` means the questioning rule has no
    /// informative item left. Repeated calls without an intervening
    /// response return the same question.
    pub fn next_question(&mut self) -> Option<usize> {
        if self.pending.is_none() {
            self.pending = self.questioning.select(&self.pks);
        }
        self.pending
    }

    /// Label of the currently pending question, if any.
    pub fn pending_question(&self) -> Option<&str> {
        self.pending
            .map(|index| self.pks.structure().domain().label(index))
    }

    /// Record a response to the pending question and update the
    /// likelihood.
    pub fn submit_response(&mut self, response: bool) -> Result<(), AssessError> {
        let question = self.pending.ok_or(AssessError::NoPendingQuestion)?;

        let posterior = self.updating.update(&self.pks, question, response)?;
        self.pks = self.pks.with_distribution(posterior.clone())?;

        self.trials.push(Trial {
            question: self
                .pks
                .structure()
                .domain()
                .label(question)
                .to_string(),
            response,
            posterior,
            asked_at: Utc::now(),
        });
        self.pending = None;
        Ok(())
    }

    /// The most likely state and its mass.
    pub fn estimate(&self) -> (StateMask, f64) {
        self.pks.most_likely_state()
    }

    /// Whether some state has accumulated at least `threshold` mass.
    pub fn is_settled(&self, threshold: f64) -> bool {
        self.estimate().1 >= threshold
    }
}

impl std::fmt::Debug for MarkovAssessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkovAssessment")
            .field("session", &self.session)
            .field("questioning", &self.questioning.name())
            .field("updating", &self.updating.name())
            .field("trials", &self.trials.len())
            .field("pending", &self.pending)
            .finish()
    }
}
