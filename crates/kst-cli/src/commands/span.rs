use crate::support::{emit_structure_or_exit, load_config_or_exit, load_structure_or_exit};
use kst_kernel::KnowledgeSpace;

pub fn run(file: Option<String>, output: Option<String>, json: bool) {
    let config = load_config_or_exit();
    let ks = load_structure_or_exit(file, &config);

    let space = KnowledgeSpace::span(ks.domain().clone(), ks.family().iter()).unwrap_or_else(
        |e| {
            eprintln!("error: span failed: {e}");
            std::process::exit(1);
        },
    );

    emit_structure_or_exit(space.structure(), output, json);
}
