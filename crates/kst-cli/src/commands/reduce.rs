use crate::support::{emit_structure_or_exit, load_config_or_exit, load_structure_or_exit};

pub fn run(file: Option<String>, output: Option<String>, json: bool) {
    let config = load_config_or_exit();
    let ks = load_structure_or_exit(file, &config);

    if ks.is_discriminative() {
        eprintln!("structure is already discriminative; emitting it unchanged");
    }

    let reduced = ks.discriminative_reduction().unwrap_or_else(|e| {
        eprintln!("error: reduction failed: {e}");
        std::process::exit(1);
    });

    emit_structure_or_exit(&reduced, output, json);
}
