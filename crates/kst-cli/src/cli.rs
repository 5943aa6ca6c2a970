use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kst",
    about = "kst: classify, inspect, and assess knowledge structures",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report the most specific class of the family
    Classify {
        /// Structure file (.json or text states format)
        file: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every family law and report violation witnesses
    Check {
        /// Structure file (.json or text states format)
        file: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show domain, states, fingerprint, notions, atoms, and surmises
    Inspect {
        /// Structure file (.json or text states format)
        file: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Collapse notions into single items (discriminative reduction)
    Reduce {
        /// Structure file (.json or text states format)
        file: Option<String>,

        /// Where to write the reduced structure (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Close the listed states under union (the spanned space)
    Span {
        /// Structure or generator file (.json or text states format)
        file: Option<String>,

        /// Where to write the spanned space (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a simulated Markov assessment against a latent state
    Assess {
        /// Structure file (.json or text states format)
        file: Option<String>,

        /// Latent state as comma-separated items (e.g. a,b)
        #[arg(long)]
        latent: String,

        /// Careless-error probability for the learner and the update rule
        #[arg(long)]
        slip: Option<f64>,

        /// Lucky-guess probability for the learner and the update rule
        #[arg(long)]
        guess: Option<f64>,

        /// RNG seed for the simulated learner
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Posterior mass at which the assessment settles
        #[arg(long)]
        settle: Option<f64>,

        /// Question budget
        #[arg(long, default_value_t = 32)]
        max_questions: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
