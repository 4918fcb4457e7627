//! Deviation score: Euclidean distance, in percentage points, between an
//! allocation's distribution and the weight-implied ideal distribution.
//!
//!   actual_i   = 100 * count_i / Σcount
//!   expected_i = 100 * weight_i / Σweight
//!   deviation  = sqrt(Σ (actual_i − expected_i)²)
//!
//! The squares are added with `exact_sum`, so the score is a function of the
//! multiset of squared differences only and can serve as an exact dedup key.

use wa_core::{entities::Allocation, entities::Category, rounding::exact_sum};

use crate::apportion::table::CategoryTable;
use crate::AllocError;

/// Score positional `counts` whose sum is `total` (> 0).
pub(crate) fn deviation_of_counts(table: &CategoryTable, counts: &[u32], total: u64) -> f64 {
    debug_assert!(total > 0);
    let total = total as f64;
    let weight_sum = table.weight_sum();
    let squares = table.weights().iter().zip(counts).map(|(&w, &c)| {
        let actual = 100.0 * f64::from(c) / total;
        let expected = 100.0 * w / weight_sum;
        let d = actual - expected;
        d * d
    });
    exact_sum(squares).sqrt()
}

/// Standalone scorer for diagnostics.
///
/// `allocation` must be keyed by exactly the declared category ids and hold at
/// least one unit; categories are validated as for `allocate`.
pub fn deviation(categories: &[Category], allocation: &Allocation) -> Result<f64, AllocError> {
    let table = CategoryTable::new(categories)?;
    let counts = table.counts_of(allocation)?;
    let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    if total == 0 {
        return Err(AllocError::AllocationMismatch(
            "allocation holds no units; proportions are undefined",
        ));
    }
    Ok(deviation_of_counts(&table, &counts, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(decl: &[(&str, f64)]) -> Vec<Category> {
        decl.iter()
            .map(|&(id, w)| Category { id: id.parse().unwrap(), weight: w })
            .collect()
    }

    fn alloc(decl: &[(&str, u32)]) -> Allocation {
        decl.iter().map(|&(id, c)| (id.parse().unwrap(), c)).collect()
    }

    #[test]
    fn perfect_split_scores_zero() {
        let c = cats(&[("Heavy", 9.0), ("Light", 1.0)]);
        let d = deviation(&c, &alloc(&[("Heavy", 9), ("Light", 1)])).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn off_by_one_pair() {
        let c = cats(&[("A", 1.0), ("B", 1.0)]);
        // 60/40 vs 50/50 → sqrt(10² + 10²)
        let d = deviation(&c, &alloc(&[("A", 3), ("B", 2)])).unwrap();
        assert!((d - 200f64.sqrt()).abs() < 1e-12);
        let mirrored = deviation(&c, &alloc(&[("A", 2), ("B", 3)])).unwrap();
        assert_eq!(d.to_bits(), mirrored.to_bits());
    }

    #[test]
    fn uses_allocation_total_not_declared_target() {
        let c = cats(&[("A", 1.0), ("B", 3.0)]);
        let d = deviation(&c, &alloc(&[("A", 10), ("B", 30)])).unwrap();
        assert!(d < 1e-12);
    }

    #[test]
    fn rejects_empty_and_mismatched_allocations() {
        let c = cats(&[("A", 1.0), ("B", 1.0)]);
        assert!(matches!(
            deviation(&c, &alloc(&[("A", 0), ("B", 0)])),
            Err(AllocError::AllocationMismatch(_))
        ));
        assert!(matches!(
            deviation(&c, &alloc(&[("A", 1)])),
            Err(AllocError::AllocationMismatch(_))
        ));
        assert!(matches!(
            deviation(&c, &alloc(&[("A", 1), ("C", 1)])),
            Err(AllocError::AllocationMismatch(_))
        ));
    }

    #[test]
    fn rejects_invalid_categories() {
        let c = cats(&[("A", 0.0)]);
        assert!(matches!(
            deviation(&c, &alloc(&[("A", 1)])),
            Err(AllocError::InvalidWeight { .. })
        ));
    }
}
