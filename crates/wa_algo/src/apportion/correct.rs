//! Exact-sum correction: search one-unit moves from the initial estimate until
//! the total hits `N`, offering every landing allocation to a `CandidateSet`.
//!
//! Contract:
//! - Overshoot (Σ > N): removal moves. Categories are tried in **descending**
//!   identifier order; a category at 1 is never decremented. A branch ends on
//!   Σ == N (candidate) or Σ < N (pruned).
//! - Undershoot (Σ < N): addition moves. Categories are tried in **ascending**
//!   identifier order, unbounded. A branch ends on Σ == N or Σ > N (pruned).
//! - Candidates are discovered in depth-first pre-order of that move tree and
//!   the first allocation per exact score is kept.
//!
//! Mechanics:
//! - Explicit work stack; children are pushed in reverse try-order so they pop
//!   in try-order, which reproduces recursive pre-order exactly.
//! - A state already visited is skipped. Its subtree depends only on the state
//!   and was fully explored the first time, so every landing allocation under
//!   it has already been offered; skipping changes nothing but the cost.
//! - `SearchLimits::max_nodes` caps the number of distinct states visited.

use std::collections::HashSet;

use tracing::{trace, warn};

use crate::apportion::candidates::CandidateSet;
use crate::apportion::score::deviation_of_counts;
use crate::apportion::table::CategoryTable;
use crate::{AllocError, SearchLimits};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Estimate overshot; take units away.
    Remove,
    /// Estimate undershot; hand units out.
    Add,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub candidates: CandidateSet,
    pub nodes_expanded: u64,
}

/// Run the correction search from `start` towards `target`.
///
/// `start` must not already sum to `target`.
pub fn correct(
    table: &CategoryTable,
    start: Vec<u32>,
    target: u64,
    limits: SearchLimits,
) -> Result<SearchOutcome, AllocError> {
    let start_total = sum(&start);
    let dir = if start_total > target {
        Direction::Remove
    } else if start_total < target {
        Direction::Add
    } else {
        return Err(AllocError::Internal("correction requested for an exact estimate"));
    };

    let k = start.len();
    let mut candidates = CandidateSet::new();
    let mut seen: HashSet<Vec<u32>> = HashSet::new();
    let mut stack: Vec<(Vec<u32>, u64)> = vec![(start, start_total)];
    let mut nodes: u64 = 0;

    while let Some((counts, total)) = stack.pop() {
        let overshot = match dir {
            Direction::Remove => total < target,
            Direction::Add => total > target,
        };
        if overshot {
            continue;
        }
        if seen.contains(&counts) {
            continue;
        }

        nodes += 1;
        if let Some(limit) = limits.max_nodes {
            if nodes > limit {
                warn!(limit, kept = candidates.len(), "correction search budget exhausted");
                return Err(AllocError::SearchBudgetExhausted { limit });
            }
        }

        if total == target {
            let score = deviation_of_counts(table, &counts, total);
            let kept = candidates.offer(score, &counts);
            trace!(score, kept, ?counts, "landing allocation");
            seen.insert(counts);
            continue;
        }

        match dir {
            Direction::Remove => {
                // Try-order is descending index; push ascending so the highest pops first.
                for i in 0..k {
                    if counts[i] > 1 {
                        let mut child = counts.clone();
                        child[i] -= 1;
                        stack.push((child, total - 1));
                    }
                }
            }
            Direction::Add => {
                for i in (0..k).rev() {
                    let mut child = counts.clone();
                    child[i] = child[i]
                        .checked_add(1)
                        .ok_or(AllocError::Internal("category count overflow"))?;
                    stack.push((child, total + 1));
                }
            }
        }
        seen.insert(counts);
    }

    Ok(SearchOutcome { candidates, nodes_expanded: nodes })
}

#[inline]
fn sum(counts: &[u32]) -> u64 {
    counts.iter().map(|&c| u64::from(c)).sum()
}
