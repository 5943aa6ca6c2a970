use crate::support::{load_config_or_exit, load_structure_or_exit, print_json};
use kst_kernel::{Classification, KnowledgeSpace, SurmiseRelation, classify};
use serde_json::json;

pub fn run(file: Option<String>, json: bool) {
    let config = load_config_or_exit();
    let ks = load_structure_or_exit(file, &config);

    let classification = classify(&ks);
    let surmise = SurmiseRelation::derive(&ks);
    let notions: Vec<Vec<&str>> = ks
        .partition()
        .into_iter()
        .map(|part| ks.domain().decode(part))
        .collect();

    // The base only exists once union closure holds.
    let base: Option<Vec<String>> = (classification != Classification::Structure)
        .then(|| {
            KnowledgeSpace::try_from(ks.clone())
                .ok()
                .map(|space| {
                    space
                        .base()
                        .into_iter()
                        .map(|atom| space.domain().render(atom))
                        .collect()
                })
        })
        .flatten();

    if json {
        print_json(&json!({
            "classification": classification,
            "domain": ks.domain().items(),
            "stateCount": ks.state_count(),
            "fingerprint": ks.fingerprint(),
            "discriminative": ks.is_discriminative(),
            "notions": notions,
            "base": base,
            "surmise": surmise.to_map(),
        }));
        return;
    }

    println!("classification: {classification}");
    println!("domain: {}", ks.domain());
    println!("states: {}", ks.state_count());
    println!("fingerprint: {}", ks.fingerprint());
    println!("discriminative: {}", ks.is_discriminative());

    println!("notions:");
    for notion in &notions {
        println!("    {{{}}}", notion.join(","));
    }

    if let Some(base) = base {
        println!("base:");
        for atom in base {
            println!("    {atom}");
        }
    }

    println!("surmise relation:");
    print!("{surmise}");
}
