//! Property tests for the apportionment invariants.

use proptest::prelude::*;
use wa_algo::{allocate, allocate_detailed, Category, SearchLimits};

fn declare(weights: &[u32]) -> Vec<Category> {
    weights
        .iter()
        .enumerate()
        .map(|(i, &w)| Category::parse(&format!("cat{i:02}"), f64::from(w)).unwrap())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn sums_exactly_and_respects_floors(
        weights in prop::collection::vec(1u32..100, 1..7),
        n in 0u32..60,
    ) {
        let cats = declare(&weights);
        let got = allocate(&cats, n).unwrap();

        prop_assert_eq!(got.len(), cats.len());
        let sum: u64 = got.values().map(|&v| u64::from(v)).sum();
        prop_assert_eq!(sum, u64::from(n));

        if n as usize >= cats.len() {
            prop_assert!(got.values().all(|&v| v >= 1));
        } else {
            prop_assert_eq!(got.values().filter(|&&v| v == 1).count(), n as usize);
            prop_assert!(got.values().all(|&v| v <= 1));
        }
    }

    #[test]
    fn sparse_selection_takes_heaviest(
        weights in prop::collection::vec(1u32..10, 2..8),
        n_frac in 0.0f64..1.0,
    ) {
        let cats = declare(&weights);
        let n = ((cats.len() as f64) * n_frac) as u32;
        let got = allocate(&cats, n).unwrap();

        // Any chosen category outranks any unchosen one: heavier, or equal weight and smaller id.
        for chosen in cats.iter().filter(|c| got[&c.id] == 1) {
            for skipped in cats.iter().filter(|c| got[&c.id] == 0) {
                prop_assert!(
                    chosen.weight > skipped.weight
                        || (chosen.weight == skipped.weight && chosen.id < skipped.id)
                );
            }
        }
    }

    #[test]
    fn result_ignores_declaration_order(
        weights in prop::collection::vec(1u32..50, 1..6),
        n in 0u32..40,
        rotate in 0usize..6,
    ) {
        let cats = declare(&weights);
        let mut shuffled = cats.clone();
        let r = rotate % shuffled.len();
        shuffled.rotate_left(r);
        shuffled.reverse();

        let a = allocate_detailed(&cats, n, SearchLimits::default()).unwrap();
        let b = allocate_detailed(&shuffled, n, SearchLimits::default()).unwrap();
        prop_assert_eq!(&a.counts, &b.counts);
        prop_assert_eq!(a.path, b.path);
        prop_assert_eq!(a.deviation.map(f64::to_bits), b.deviation.map(f64::to_bits));
    }

    #[test]
    fn correction_always_finds_a_candidate(
        weights in prop::collection::vec(1u32..30, 1..6),
        n in 1u32..50,
    ) {
        let cats = declare(&weights);
        let r = allocate_detailed(&cats, n, SearchLimits::unbounded()).unwrap();
        if r.search.gap > 0 {
            prop_assert!(r.search.candidates_kept >= 1);
            prop_assert!(r.search.nodes_expanded >= 1);
        }
        prop_assert!(r.deviation.unwrap() >= 0.0);
    }
}
