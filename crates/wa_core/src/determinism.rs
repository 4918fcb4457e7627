//! Determinism utilities: stable ordering for categories.
//!
//! This module is **I/O-free**. It provides:
//! - Stable total orders for category names and declarations
//! - Canonical in-place sort by identifier
//! - Duplicate detection over a canonically sorted slice

use core::cmp::Ordering;

use crate::entities::Category;
use crate::ids::CategoryId;

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for CategoryId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for Category {
    /// Canonical category order is the identifier alone; weight never participates.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.id.stable_cmp(&other.id)
    }
}

/* -------------------------------------------------------------------------- */
/*                            Canonical sort helpers                           */
/* -------------------------------------------------------------------------- */

/// Sort categories **in place** by ascending identifier.
#[inline]
pub fn sort_categories_canonical(xs: &mut [Category]) {
    xs.sort_by(|a, b| a.stable_cmp(b));
}

/// First identifier that appears more than once in a canonically sorted slice.
pub fn first_duplicate(sorted: &[Category]) -> Option<&CategoryId> {
    sorted
        .windows(2)
        .find(|w| w[0].id == w[1].id)
        .map(|w| &w[0].id)
}

/* ---------------------------------- Tests --------------------------------- */
