//! Top-level apportionment: estimate → (correct → score) → pick.
//!
//! States:
//!   EMPTY       no categories           → empty mapping (any N)
//!   SMALL_N     N <= K                  → N heaviest get 1, terminal
//!   EXACT       Σ estimate == N         → terminal
//!   OVERSHOOT   Σ estimate >  N         → removal search, lowest deviation wins
//!   UNDERSHOOT  Σ estimate <  N         → addition search, lowest deviation wins
//!
//! Determinism:
//! - Everything iterates in identifier order; no hashing order leaks into results.
//! - Pure function of `(categories, target_total, limits)`.

use tracing::debug;

use crate::apportion::correct::correct;
use crate::apportion::estimate::{initial_estimate, Estimate};
use crate::apportion::score::deviation_of_counts;
use crate::apportion::table::CategoryTable;
use crate::{
    AllocError, Allocation, ApportionPath, Apportionment, Category, SearchLimits, SearchStats,
};

/// Apportion `target_total` units across `categories` with the default search budget.
pub fn allocate(categories: &[Category], target_total: u32) -> Result<Allocation, AllocError> {
    allocate_with_limits(categories, target_total, SearchLimits::default())
}

pub fn allocate_with_limits(
    categories: &[Category],
    target_total: u32,
    limits: SearchLimits,
) -> Result<Allocation, AllocError> {
    allocate_detailed(categories, target_total, limits).map(|a| a.counts)
}

/// Same as `allocate_with_limits`, also reporting the path taken, the winning
/// deviation, and search statistics.
pub fn allocate_detailed(
    categories: &[Category],
    target_total: u32,
    limits: SearchLimits,
) -> Result<Apportionment, AllocError> {
    let table = CategoryTable::new(categories)?;

    if table.is_empty() {
        debug!(target_total, "no categories declared; nothing to allocate");
        return Ok(Apportionment {
            counts: Allocation::new(),
            deviation: None,
            path: ApportionPath::Empty,
            search: SearchStats::default(),
        });
    }

    let target = u64::from(target_total);
    let estimate = initial_estimate(&table, target_total)?;

    let counts = match estimate {
        Estimate::Sparse(counts) => {
            debug!(target_total, categories = table.len(), "small total: one unit to each of the heaviest");
            let deviation = (target > 0).then(|| deviation_of_counts(&table, &counts, target));
            return Ok(Apportionment {
                counts: table.to_allocation(&counts),
                deviation,
                path: ApportionPath::SmallTotal,
                search: SearchStats::default(),
            });
        }
        Estimate::Rounded(counts) => counts,
    };

    let estimated: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    if estimated == target {
        debug!(target_total, "rounded shares already exact");
        return Ok(Apportionment {
            deviation: Some(deviation_of_counts(&table, &counts, target)),
            counts: table.to_allocation(&counts),
            path: ApportionPath::Exact,
            search: SearchStats::default(),
        });
    }

    let path = if estimated > target {
        ApportionPath::Overshoot
    } else {
        ApportionPath::Undershoot
    };
    let gap = estimated.abs_diff(target);
    debug!(%path, gap, estimated, target_total, "correcting rounded estimate");

    let outcome = correct(&table, counts, target, limits)?;
    let candidates_kept = outcome.candidates.len();
    let (score, winner) = outcome
        .candidates
        .into_best()
        .ok_or(AllocError::Internal("correction search produced no candidate"))?;

    debug!(
        %path,
        nodes = outcome.nodes_expanded,
        candidates_kept,
        deviation = score,
        "correction finished"
    );

    let result = Apportionment {
        counts: table.to_allocation(&winner),
        deviation: Some(score),
        path,
        search: SearchStats {
            gap,
            nodes_expanded: outcome.nodes_expanded,
            candidates_kept,
        },
    };
    debug_assert_eq!(wa_core::allocation_total(&result.counts), target);
    Ok(result)
}

/// Narrow a signed total, rejecting negatives and values past `u32::MAX` instead of clamping.
pub fn target_total_from_i64(n: i64) -> Result<u32, AllocError> {
    if n < 0 {
        return Err(AllocError::NegativeTotal(n));
    }
    u32::try_from(n).map_err(|_| AllocError::TotalOutOfRange(n))
}
