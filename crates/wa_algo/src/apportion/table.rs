//! Validated, canonically ordered view of the declared categories.
//!
//! Every other stage works on parallel vectors indexed by position in this
//! table, so counts are plain `Vec<u32>` and the identifier order is fixed once.

use wa_core::{
    determinism::{first_duplicate, sort_categories_canonical},
    entities::{is_valid_weight, Allocation, Category},
    ids::CategoryId,
};

use crate::AllocError;

#[derive(Clone, Debug)]
pub struct CategoryTable {
    ids: Vec<CategoryId>,
    weights: Vec<f64>,
    weight_sum: f64,
}

impl CategoryTable {
    /// Validate (positive finite weights, unique ids) and sort by identifier.
    pub fn new(categories: &[Category]) -> Result<Self, AllocError> {
        for c in categories {
            if !is_valid_weight(c.weight) {
                return Err(AllocError::InvalidWeight {
                    category: c.id.clone(),
                    weight: c.weight,
                });
            }
        }

        let mut sorted = categories.to_vec();
        sort_categories_canonical(&mut sorted);
        if let Some(dup) = first_duplicate(&sorted) {
            return Err(AllocError::DuplicateCategory(dup.clone()));
        }

        // Left-to-right in identifier order; shares and expected percentages both use this value.
        let weight_sum: f64 = sorted.iter().map(|c| c.weight).sum();
        if !weight_sum.is_finite() {
            return Err(AllocError::InvalidWeight {
                category: sorted[sorted.len() - 1].id.clone(),
                weight: sorted[sorted.len() - 1].weight,
            });
        }

        let (ids, weights): (Vec<CategoryId>, Vec<f64>) = sorted.into_iter().map(|c| (c.id, c.weight)).unzip();
        Ok(Self { ids, weights, weight_sum })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn ids(&self) -> &[CategoryId] {
        &self.ids
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Map positional counts back to identifiers.
    pub fn to_allocation(&self, counts: &[u32]) -> Allocation {
        debug_assert_eq!(counts.len(), self.ids.len());
        self.ids.iter().cloned().zip(counts.iter().copied()).collect()
    }

    /// Positional counts for an allocation keyed by exactly this table's ids.
    pub fn counts_of(&self, alloc: &Allocation) -> Result<Vec<u32>, AllocError> {
        if alloc.len() != self.ids.len() {
            return Err(AllocError::AllocationMismatch(
                "allocation must contain exactly the declared categories",
            ));
        }
        self.ids
            .iter()
            .map(|id| {
                alloc.get(id).copied().ok_or(AllocError::AllocationMismatch(
                    "allocation must contain exactly the declared categories",
                ))
            })
            .collect()
    }
}
