//! Shared helpers for the command modules.

use crate::config::Config;
use kst_kernel::KnowledgeStructure;
use kst_store::{TextFormat, read_structure, render_states, write_structure};
use std::path::PathBuf;

/// Load the config, exiting on a malformed file.
pub fn load_config_or_exit() -> Config {
    Config::load().unwrap_or_else(|e| {
        eprintln!("error: invalid config: {e}");
        std::process::exit(1);
    })
}

/// Resolve the structure path from the argument or the config default.
pub fn resolve_file_or_exit(file: Option<String>, config: &Config) -> PathBuf {
    match file.or_else(|| config.files.structure.clone()) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!(
                "error: no structure file given and no [files].structure configured in {}",
                crate::config::CONFIG_PATH
            );
            std::process::exit(1);
        }
    }
}

/// Load a structure, exiting with a readable message on failure.
pub fn load_structure_or_exit(file: Option<String>, config: &Config) -> KnowledgeStructure {
    let path = resolve_file_or_exit(file, config);
    read_structure(&path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    })
}

/// Write a structure to `output`, or render it to stdout when omitted.
pub fn emit_structure_or_exit(ks: &KnowledgeStructure, output: Option<String>, json: bool) {
    match output {
        Some(path) => {
            write_structure(&path, ks).unwrap_or_else(|e| {
                eprintln!("error: failed to write {path}: {e}");
                std::process::exit(1);
            });
        }
        None if json => print_json(ks),
        None => print!("{}", render_states(ks, &TextFormat::default())),
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            std::process::exit(1);
        }
    }
}
