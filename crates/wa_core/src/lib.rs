//! wa_core: core types, ordering helpers, and float numerics for apportionment.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! workspace (`wa_algo`, `wa_io`, `wa_cli`).
//!
//! - Category names: `CategoryId`; digests: `Sha256`
//! - Declarations: `Category` (id + positive weight), `Allocation`
//! - Deterministic ordering helpers
//! - Half-even rounding and exactly-rounded summation
//!
//! Serialization derives are gated behind the `serde` feature.

pub mod ids;
pub mod determinism;

pub mod errors {
    use core::fmt;

    use crate::ids::IdError;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum CoreError {
        InvalidId(IdError),
        /// Weight was zero, negative, NaN or infinite.
        InvalidWeight(f64),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId(e) => write!(f, "invalid category id: {e}"),
                CoreError::InvalidWeight(w) => {
                    write!(f, "invalid weight {w}: must be finite and strictly positive")
                }
            }
        }
    }

    impl std::error::Error for CoreError {}

    impl From<IdError> for CoreError {
        fn from(e: IdError) -> Self {
            CoreError::InvalidId(e)
        }
    }
}

pub mod entities {
    //! Declarations supplied by callers and the allocation handed back.

    use std::collections::BTreeMap;

    use crate::errors::CoreError;
    use crate::ids::CategoryId;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    /// A named category with a strictly positive relative weight.
    #[derive(Clone, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
    pub struct Category {
        pub id: CategoryId,
        pub weight: f64,
    }

    impl Category {
        pub fn new(id: CategoryId, weight: f64) -> Result<Self, CoreError> {
            if !is_valid_weight(weight) {
                return Err(CoreError::InvalidWeight(weight));
            }
            Ok(Self { id, weight })
        }

        /// Parse the id and validate the weight in one step.
        pub fn parse(id: &str, weight: f64) -> Result<Self, CoreError> {
            Self::new(id.parse()?, weight)
        }
    }

    #[inline]
    pub fn is_valid_weight(w: f64) -> bool {
        w.is_finite() && w > 0.0
    }

    /// Category → unit count, iterated in canonical (identifier) order.
    pub type Allocation = BTreeMap<CategoryId, u32>;

    /// Sum of all counts (u64 accumulator; cannot overflow for u32 values
    /// across any realistic number of categories).
    #[inline]
    pub fn allocation_total(alloc: &Allocation) -> u64 {
        alloc.values().map(|&v| u64::from(v)).sum()
    }
}

pub mod rounding {
    //! Float helpers with reproducible results.

    /// Round to nearest, ties to even, and narrow to `u32`.
    /// Returns `None` for NaN, negative results, or values above `u32::MAX`.
    #[inline]
    pub fn round_half_even_u32(x: f64) -> Option<u32> {
        let r = x.round_ties_even();
        if r.is_nan() || r < 0.0 || r > f64::from(u32::MAX) {
            return None;
        }
        Some(r as u32)
    }

    /// Correctly rounded sum of finite floats (Shewchuk partials with a
    /// half-even final step). The result does not depend on input order.
    /// Falls back to naive summation if any input is not finite.
    pub fn exact_sum<I: IntoIterator<Item = f64>>(xs: I) -> f64 {
        let mut partials: Vec<f64> = Vec::new();
        let mut naive = 0.0f64;
        let mut finite = true;

        for x0 in xs {
            naive += x0;
            if !x0.is_finite() {
                finite = false;
                continue;
            }
            if !finite {
                continue;
            }
            let mut x = x0;
            let mut i = 0usize;
            for j in 0..partials.len() {
                let mut y = partials[j];
                if x.abs() < y.abs() {
                    core::mem::swap(&mut x, &mut y);
                }
                let hi = x + y;
                let lo = y - (hi - x);
                if lo != 0.0 {
                    partials[i] = lo;
                    i += 1;
                }
                x = hi;
            }
            partials.truncate(i);
            partials.push(x);
        }

        if !finite {
            return naive;
        }

        let Some(mut k) = partials.len().checked_sub(1) else {
            return 0.0;
        };
        let mut hi = partials[k];
        let mut lo = 0.0f64;
        while k > 0 {
            let x = hi;
            k -= 1;
            let y = partials[k];
            hi = x + y;
            let yr = hi - x;
            lo = y - yr;
            if lo != 0.0 {
                break;
            }
        }
        // Half-even adjustment when the discarded tail sits exactly on a midpoint.
        if k > 0 && ((lo < 0.0 && partials[k - 1] < 0.0) || (lo > 0.0 && partials[k - 1] > 0.0)) {
            let y = lo * 2.0;
            let x = hi + y;
            let yr = x - hi;
            if y == yr {
                hi = x;
            }
        }
        hi
    }

}

// Convenience re-exports for downstream crates.
pub use entities::{allocation_total, Allocation, Category};
pub use errors::CoreError;
pub use ids::{CategoryId, IdError, Sha256};
