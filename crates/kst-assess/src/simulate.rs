//! Simulated learners: a latent state behind slip/guess noise.
//!
//! Useful for exercising the assessment loop end to end: the learner
//! answers from a fixed latent state, slipping on mastered items with
//! probability `slip` and lucky-guessing unmastered ones with
//! probability `guess`. The RNG is a seeded ChaCha stream so runs are
//! reproducible across platforms.

use crate::error::AssessError;
use crate::map::{MarkovAssessment, Trial};
use kst_kernel::StateMask;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A response oracle with a fixed latent state.
#[derive(Debug)]
pub struct SimulatedLearner {
    latent: StateMask,
    slip: f64,
    guess: f64,
    rng: ChaCha8Rng,
}

impl SimulatedLearner {
    /// Both noise parameters must lie in [0, 1).
    pub fn new(latent: StateMask, slip: f64, guess: f64, seed: u64) -> Result<Self, AssessError> {
        for (name, value) in [("slip", slip), ("guess", guess)] {
            if !(0.0..1.0).contains(&value) {
                return Err(AssessError::InvalidParameter { name, value });
            }
        }
        Ok(Self {
            latent,
            slip,
            guess,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn latent(&self) -> StateMask {
        self.latent
    }

    /// Answer the item at `index`: correct with probability 1 − slip if
    /// mastered, guess otherwise.
    pub fn answer(&mut self, index: usize) -> bool {
        let mastered = self.latent & (1 << index) != 0;
        if mastered {
            !self.rng.gen_bool(self.slip)
        } else {
            self.rng.gen_bool(self.guess)
        }
    }
}

/// The result of a driven assessment run.
#[derive(Debug)]
pub struct AssessmentOutcome {
    /// The most likely state when the run stopped.
    pub estimate: StateMask,

    /// Its posterior mass.
    pub confidence: f64,

    pub questions_asked: usize,

    /// Whether the mass threshold was reached (as opposed to running out
    /// of questions or informative items).
    pub settled: bool,

    pub trials: Vec<Trial>,
}

/// Drive an assessment against a simulated learner until it settles,
/// runs out of informative questions, or exhausts `max_questions`.
pub fn run_assessment(
    mut assessment: MarkovAssessment,
    learner: &mut SimulatedLearner,
    settle_threshold: f64,
    max_questions: usize,
) -> Result<AssessmentOutcome, AssessError> {
    let mut asked = 0;
    while asked < max_questions && !assessment.is_settled(settle_threshold) {
        let Some(question) = assessment.next_question() else {
            break;
        };
        let response = learner.answer(question);
        assessment.submit_response(response)?;
        asked += 1;
    }

    let (estimate, confidence) = assessment.estimate();
    let settled = assessment.is_settled(settle_threshold);
    Ok(AssessmentOutcome {
        estimate,
        confidence,
        questions_asked: asked,
        settled,
        trials: assessment.trials().to_vec(),
    })
}
