//! Initial estimate: one rounding pass over the proportional shares.
//!
//! Contract:
//! - `N <= K` (including `N == 0`): the `N` heaviest categories get one unit
//!   each, ties by ascending identifier; this branch is always exact.
//! - `N > K`: `round_half_even(weight / Σweights * N)`, floored at 1 so every
//!   category keeps at least one unit. The total may land above, on, or below `N`.

use wa_core::rounding::round_half_even_u32;

use crate::apportion::table::CategoryTable;
use crate::AllocError;

/// First-pass counts, positional over the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Estimate {
    /// `N <= K` selection; already sums to `N`.
    Sparse(Vec<u32>),
    /// Rounded shares; may need correction.
    Rounded(Vec<u32>),
}

pub fn initial_estimate(table: &CategoryTable, target_total: u32) -> Result<Estimate, AllocError> {
    let k = table.len();
    if (target_total as usize) <= k {
        return Ok(Estimate::Sparse(select_heaviest(table, target_total as usize)));
    }

    let n = f64::from(target_total);
    let sum = table.weight_sum();
    let counts = table
        .weights()
        .iter()
        .map(|&w| {
            let share = w / sum;
            round_half_even_u32(share * n)
                .map(|c| c.max(1))
                .ok_or(AllocError::Internal("proportional share out of range"))
        })
        .collect::<Result<Vec<u32>, AllocError>>()?;
    Ok(Estimate::Rounded(counts))
}

/// One unit to each of the `n` heaviest categories (stable over identifier order).
fn select_heaviest(table: &CategoryTable, n: usize) -> Vec<u32> {
    let weights = table.weights();
    // Table positions are already in identifier order; a stable sort keeps it on ties.
    let mut ranked: Vec<usize> = (0..table.len()).collect();
    ranked.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

    let mut counts = vec![0u32; table.len()];
    for &ix in ranked.iter().take(n) {
        counts[ix] = 1;
    }
    counts
}
