use crate::support::{load_config_or_exit, load_structure_or_exit, print_json};
use kst_kernel::classify;
use serde_json::json;

pub fn run(file: Option<String>, json: bool) {
    let config = load_config_or_exit();
    let ks = load_structure_or_exit(file, &config);
    let classification = classify(&ks);

    if json {
        print_json(&json!({
            "classification": classification,
            "domain": ks.domain().items(),
            "stateCount": ks.state_count(),
            "fingerprint": ks.fingerprint(),
        }));
    } else {
        println!("{classification}");
    }
}
