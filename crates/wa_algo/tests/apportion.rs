//! End-to-end apportionment scenarios through the public `wa_algo` surface.

use wa_algo::{
    allocate, allocate_detailed, deviation, Allocation, ApportionPath, Category, CategoryId,
    SearchLimits,
};

fn cats(decl: &[(&str, f64)]) -> Vec<Category> {
    decl.iter().map(|&(id, w)| Category::parse(id, w).unwrap()).collect()
}

fn id(s: &str) -> CategoryId {
    s.parse().unwrap()
}

fn pairs(a: &Allocation) -> Vec<(&str, u32)> {
    a.iter().map(|(k, &v)| (k.as_str(), v)).collect()
}

fn total(a: &Allocation) -> u64 {
    a.values().map(|&v| u64::from(v)).sum()
}

#[test]
fn scenario_a_equal_weights_small_total() {
    let got = allocate(&cats(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]), 2).unwrap();
    assert_eq!(pairs(&got), vec![("A", 1), ("B", 1), ("C", 0)]);
}

#[test]
fn scenario_b_half_shares_need_one_more_unit() {
    let c = cats(&[("A", 1.0), ("B", 1.0)]);
    let r = allocate_detailed(&c, 5, SearchLimits::default()).unwrap();
    assert_eq!(r.path, ApportionPath::Undershoot);
    assert_eq!(total(&r.counts), 5);
    let a = r.counts[&id("A")];
    let b = r.counts[&id("B")];
    assert!(a.abs_diff(b) <= 1);
    assert_eq!(pairs(&r.counts), vec![("A", 3), ("B", 2)]);
}

#[test]
fn scenario_c_exact_shares_score_zero() {
    let c = cats(&[("Heavy", 9.0), ("Light", 1.0)]);
    let r = allocate_detailed(&c, 10, SearchLimits::default()).unwrap();
    assert_eq!(pairs(&r.counts), vec![("Heavy", 9), ("Light", 1)]);
    assert!(r.deviation.unwrap() < 1e-9);
    assert!(deviation(&c, &r.counts).unwrap() < 1e-9);
}

#[test]
fn scenario_d_zero_total_is_all_zero() {
    let c = cats(&[("x", 3.0), ("y", 1.0), ("z", 0.5)]);
    let got = allocate(&c, 0).unwrap();
    assert_eq!(got.len(), 3);
    assert!(got.values().all(|&v| v == 0));
}

#[test]
fn scenario_e_single_category_takes_everything() {
    let c = cats(&[("Solo", 1.0)]);
    for n in [0u32, 1, 2, 7, 100, 12_345] {
        let got = allocate(&c, n).unwrap();
        assert_eq!(pairs(&got), vec![("Solo", n)]);
    }
}

#[test]
fn empty_declaration_yields_empty_mapping() {
    assert!(allocate(&[], 0).unwrap().is_empty());
    assert!(allocate(&[], 25).unwrap().is_empty());
}

#[test]
fn input_order_does_not_matter() {
    let fwd = cats(&[("p", 2.0), ("q", 3.0), ("r", 5.0), ("s", 7.0)]);
    let mut rev = fwd.clone();
    rev.reverse();
    for n in [0u32, 3, 9, 17, 40] {
        assert_eq!(allocate(&fwd, n).unwrap(), allocate(&rev, n).unwrap());
    }
}

fn check(decl: &[(&str, f64)], n: u32, want: &[(&str, u32)]) {
    let got = allocate(&cats(decl), n).unwrap();
    assert_eq!(pairs(&got), want.to_vec(), "N={n} decl={decl:?}");
}

#[test]
fn known_answers() {
    check(&[("A", 5.0), ("B", 3.0), ("C", 2.0)], 7, &[("A", 4), ("B", 2), ("C", 1)]);
    check(
        &[("u1", 3.0), ("u2", 5.0), ("u3", 1.0), ("u4", 1.0)],
        11,
        &[("u1", 3), ("u2", 6), ("u3", 1), ("u4", 1)],
    );
    check(
        &[("web", 0.3), ("api", 0.5), ("admin", 0.2)],
        13,
        &[("admin", 3), ("api", 6), ("web", 4)],
    );
    check(
        &[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0), ("e", 1.0), ("f", 1.0), ("g", 1.0)],
        10,
        &[("a", 2), ("b", 2), ("c", 2), ("d", 1), ("e", 1), ("f", 1), ("g", 1)],
    );
    check(&[("x", 7.0), ("y", 2.0), ("z", 1.0)], 3, &[("x", 1), ("y", 1), ("z", 1)]);
    check(&[("x", 1.0), ("y", 100.0)], 3, &[("x", 1), ("y", 2)]);
    check(
        &[("p", 2.0), ("q", 3.0), ("r", 5.0), ("s", 7.0)],
        9,
        &[("p", 1), ("q", 1), ("r", 3), ("s", 4)],
    );
}

#[test]
fn overshoot_then_removal() {
    // 2/17*9 → 1, 3/17*9 → 2, 5/17*9 → 3, 7/17*9 → 4: ten units for nine slots.
    let c = cats(&[("p", 2.0), ("q", 3.0), ("r", 5.0), ("s", 7.0)]);
    let r = allocate_detailed(&c, 9, SearchLimits::default()).unwrap();
    assert_eq!(r.path, ApportionPath::Overshoot);
    assert_eq!(r.search.gap, 1);
    assert!(r.search.candidates_kept >= 1);
    assert_eq!(total(&r.counts), 9);
}

#[test]
fn repeated_calls_are_identical() {
    let c = cats(&[("k1", 0.7), ("k2", 1.3), ("k3", 2.9), ("k4", 0.1), ("k5", 4.4)]);
    let first = allocate_detailed(&c, 23, SearchLimits::default()).unwrap();
    for _ in 0..5 {
        let again = allocate_detailed(&c, 23, SearchLimits::default()).unwrap();
        assert_eq!(again.counts, first.counts);
        assert_eq!(
            again.deviation.map(f64::to_bits),
            first.deviation.map(f64::to_bits)
        );
    }
}
