// crates/wa_cli/src/report.rs
//
// Builds the JSON report for one apportionment run. Key order does not matter
// here; wa_io canonicalizes on write.

use serde_json::{json, Map, Value};
use wa_algo::Apportionment;
use wa_core::ids::Sha256;

pub fn build_report(outcome: &Apportionment, target_total: u32, input_sha256: &Sha256) -> Value {
    let allocation: Map<String, Value> = outcome
        .counts
        .iter()
        .map(|(id, n)| (id.to_string(), Value::from(*n)))
        .collect();

    json!({
        "allocation": allocation,
        "deviation": outcome.deviation,
        "input_sha256": input_sha256.as_hex(),
        "path": outcome.path.as_str(),
        "target_total": target_total,
        "search": {
            "candidates_kept": outcome.search.candidates_kept,
            "gap": outcome.search.gap,
            "nodes_expanded": outcome.search.nodes_expanded,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use wa_algo::{allocate_detailed, Category, SearchLimits};

    const DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn cats(decl: &[(&str, f64)]) -> Vec<Category> {
        decl.iter().map(|(id, w)| Category::parse(id, *w).unwrap()).collect()
    }

    #[test]
    fn overshoot_report_shape() {
        let outcome = allocate_detailed(
            &cats(&[("s", 7.0), ("q", 3.0), ("p", 2.0), ("r", 5.0)]),
            9,
            SearchLimits::default(),
        ).unwrap();
        let sha: Sha256 = DIGEST.parse().unwrap();
        let mut got = build_report(&outcome, 9, &sha);

        // Deviation is a float we don't want to pin bit-for-bit here.
        let dev = got["deviation"].take();
        assert!(dev.as_f64().unwrap() > 0.0);

        assert_json_eq!(
            got,
            json!({
                "allocation": {"p": 1, "q": 1, "r": 3, "s": 4},
                "deviation": null,
                "input_sha256": DIGEST,
                "path": "overshoot",
                "target_total": 9,
                "search": {
                    "candidates_kept": outcome.search.candidates_kept,
                    "gap": 1,
                    "nodes_expanded": outcome.search.nodes_expanded,
                },
            })
        );
    }

    #[test]
    fn empty_declaration_reports_null_deviation() {
        let outcome = allocate_detailed(&[], 5, SearchLimits::default()).unwrap();
        let sha: Sha256 = DIGEST.parse().unwrap();
        let got = build_report(&outcome, 5, &sha);
        assert_json_eq!(
            got,
            json!({
                "allocation": {},
                "deviation": null,
                "input_sha256": DIGEST,
                "path": "empty",
                "target_total": 5,
                "search": {"candidates_kept": 0, "gap": 0, "nodes_expanded": 0},
            })
        );
    }
}
