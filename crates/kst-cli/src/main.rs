//! kst CLI: the `kst` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { file, json } => commands::classify::run(file, json),

        Commands::Check { file, json } => commands::check::run(file, json),

        Commands::Inspect { file, json } => commands::inspect::run(file, json),

        Commands::Reduce { file, output, json } => commands::reduce::run(file, output, json),

        Commands::Span { file, output, json } => commands::span::run(file, output, json),

        Commands::Assess {
            file,
            latent,
            slip,
            guess,
            seed,
            settle,
            max_questions,
            json,
        } => commands::assess::run(commands::assess::Args {
            file,
            latent,
            slip,
            guess,
            seed,
            settle,
            max_questions,
            json,
        }),
    }
}
