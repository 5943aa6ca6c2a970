use crate::support::{load_config_or_exit, load_structure_or_exit, print_json};
use kst_kernel::run_checks;

pub fn run(file: Option<String>, json: bool) {
    let config = load_config_or_exit();
    let ks = load_structure_or_exit(file, &config);
    let report = run_checks(&ks);

    if json {
        print_json(&report);
    } else {
        println!("classification: {}", report.classification);
        if report.is_clean() {
            println!("all family laws hold");
        } else {
            for violation in &report.violations {
                println!("  {violation}");
            }
        }
    }

    if !report.is_clean() {
        std::process::exit(2);
    }
}
