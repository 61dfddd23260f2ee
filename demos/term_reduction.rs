use std::collections::BTreeMap;

use terse::{calculate_sim_matrix, MapAnnotations, MapSimilarity, Reducer, ScoreSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Minimal end-to-end: enrichment hits -> similarity matrix -> reduced
    // representative groups. The in-memory ports stand in for a semantic
    // similarity service and an annotation database.

    // Six GO-style terms: a cell-death trio, a proliferation pair, and an
    // unrelated transport term.
    let terms = [
        "GO:0006915", // apoptotic process
        "GO:0012501", // programmed cell death
        "GO:0097300", // programmed necrotic cell death
        "GO:0008283", // cell population proliferation
        "GO:0050673", // epithelial cell proliferation
        "GO:0006810", // transport
    ];

    let sim = MapSimilarity::new()
        .with_pair("GO:0006915", "GO:0012501", 0.95)
        .with_pair("GO:0006915", "GO:0097300", 0.82)
        .with_pair("GO:0012501", "GO:0097300", 0.88)
        .with_pair("GO:0006915", "GO:0008283", 0.25)
        .with_pair("GO:0006915", "GO:0050673", 0.22)
        .with_pair("GO:0006915", "GO:0006810", 0.08)
        .with_pair("GO:0012501", "GO:0008283", 0.26)
        .with_pair("GO:0012501", "GO:0050673", 0.21)
        .with_pair("GO:0012501", "GO:0006810", 0.09)
        .with_pair("GO:0097300", "GO:0008283", 0.2)
        .with_pair("GO:0097300", "GO:0050673", 0.19)
        .with_pair("GO:0097300", "GO:0006810", 0.07)
        .with_pair("GO:0008283", "GO:0050673", 0.85)
        .with_pair("GO:0008283", "GO:0006810", 0.12)
        .with_pair("GO:0050673", "GO:0006810", 0.11);

    let annotations = MapAnnotations::new()
        .with_term("GO:0006915", "apoptotic process", 1600)
        .with_term("GO:0012501", "programmed cell death", 1750)
        .with_term("GO:0097300", "programmed necrotic cell death", 90)
        .with_term("GO:0008283", "cell population proliferation", 2100)
        .with_term("GO:0050673", "epithelial cell proliferation", 380)
        .with_term("GO:0006810", "transport", 4800)
        .with_ancestors("GO:0006915", ["GO:0012501", "GO:0008150"])
        .with_ancestors("GO:0050673", ["GO:0008283", "GO:0008150"]);

    let matrix = calculate_sim_matrix(terms, &sim, None)?;

    // Enrichment p-values, as -log10: higher is better.
    let scores: BTreeMap<String, f64> = [
        ("GO:0006915", 8.2),
        ("GO:0012501", 6.9),
        ("GO:0097300", 3.1),
        ("GO:0008283", 5.4),
        ("GO:0050673", 4.7),
        ("GO:0006810", 2.2),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let reduced = Reducer::new()
        .with_threshold(0.7)
        .with_scores(ScoreSource::Provided(&scores))
        .with_annotations(&annotations)
        .with_parent_threshold(0.2)
        .reduce(&matrix)?;

    println!(
        "{} terms -> {} representative groups\n",
        reduced.len(),
        reduced.n_clusters()
    );
    for row in reduced.rows() {
        println!(
            "  {}  cluster {}  parent {}  sim {:.2}  score {:.1}  {}",
            row.label,
            row.cluster,
            row.representative,
            row.parent_sim,
            row.score,
            row.term.as_deref().unwrap_or("-"),
        );
    }

    println!("\nreduced matrix over representatives:");
    let rm = reduced.reduced_matrix();
    for a in rm.labels() {
        for b in rm.labels() {
            print!(" {:.2}", rm.get(a, b).unwrap_or(0.0));
        }
        println!("  {a}");
    }

    if let Some(groups) = reduced.parents_of_parents() {
        println!("\nparents of parents:");
        for (rep, super_rep) in groups {
            if rep != super_rep {
                println!("  {rep} -> {super_rep}");
            }
        }
    }

    Ok(())
}
