use crate::support::{load_config_or_exit, load_structure_or_exit, print_json};
use kst_assess::{
    HalfSplit, MarkovAssessment, MultiplicativeUpdate, ProbabilisticKnowledgeStructure,
    SimulatedLearner, run_assessment,
};
use serde_json::json;

pub struct Args {
    pub file: Option<String>,
    pub latent: String,
    pub slip: Option<f64>,
    pub guess: Option<f64>,
    pub seed: u64,
    pub settle: Option<f64>,
    pub max_questions: usize,
    pub json: bool,
}

pub fn run(args: Args) {
    let config = load_config_or_exit();
    let ks = load_structure_or_exit(args.file, &config);

    let slip = args.slip.unwrap_or_else(|| config.slip());
    let guess = args.guess.unwrap_or_else(|| config.guess());
    let settle = args.settle.unwrap_or_else(|| config.settle());

    let latent_labels: Vec<&str> = args
        .latent
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let latent = ks
        .domain()
        .encode(latent_labels.iter().copied())
        .unwrap_or_else(|e| {
            eprintln!("error: invalid latent state: {e}");
            std::process::exit(1);
        });
    if !ks.family().contains(latent) {
        eprintln!(
            "warning: latent state {} is not a state of the family",
            ks.domain().render(latent)
        );
    }

    let updating = MultiplicativeUpdate::new(slip, guess).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let mut learner = SimulatedLearner::new(latent, slip, guess, args.seed).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let assessment = MarkovAssessment::new(
        ProbabilisticKnowledgeStructure::uniform(ks.clone()),
        Box::new(HalfSplit::default()),
        Box::new(updating),
    );

    let outcome = run_assessment(assessment, &mut learner, settle, args.max_questions)
        .unwrap_or_else(|e| {
            eprintln!("error: assessment failed: {e}");
            std::process::exit(1);
        });

    if args.json {
        let trials: Vec<_> = outcome
            .trials
            .iter()
            .map(|t| {
                json!({
                    "question": t.question,
                    "response": t.response,
                })
            })
            .collect();
        print_json(&json!({
            "latent": ks.domain().decode(latent),
            "estimate": ks.domain().decode(outcome.estimate),
            "confidence": outcome.confidence,
            "questionsAsked": outcome.questions_asked,
            "settled": outcome.settled,
            "trials": trials,
        }));
        return;
    }

    for (i, trial) in outcome.trials.iter().enumerate() {
        let verdict = if trial.response { "correct" } else { "incorrect" };
        println!("q{}: {} ({verdict})", i + 1, trial.question);
    }
    println!(
        "estimate: {} (p = {:.3}, {} question{})",
        ks.domain().render(outcome.estimate),
        outcome.confidence,
        outcome.questions_asked,
        if outcome.questions_asked == 1 { "" } else { "s" }
    );
    if !outcome.settled {
        println!("assessment did not settle within the question budget");
    }
}
