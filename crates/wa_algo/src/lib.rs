// crates/wa_algo/src/lib.rs
#![forbid(unsafe_code)]

use core::fmt;

pub use wa_core::{
    entities::{allocation_total, Allocation, Category},
    ids::CategoryId,
};

// ----------------------------- Errors -----------------------------------------------

/// Coarse classification used by callers that map errors to exit codes or HTTP-ish statuses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied input violates a precondition.
    InvalidArgument,
    /// The correction search hit its node budget.
    Exhausted,
    /// An algorithm invariant failed; never expected for valid input.
    Internal,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AllocError {
    /// Target total below zero (only reachable through signed entry points).
    NegativeTotal(i64),
    /// Target total does not fit the `u32` unit count.
    TotalOutOfRange(i64),
    /// Weight was zero, negative, NaN or infinite.
    InvalidWeight { category: CategoryId, weight: f64 },
    /// The same identifier was declared twice.
    DuplicateCategory(CategoryId),
    /// A scored allocation does not line up with the declared categories.
    AllocationMismatch(&'static str),
    /// The correction search visited `limit` states without finishing.
    SearchBudgetExhausted { limit: u64 },
    Internal(&'static str),
}

impl AllocError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AllocError::NegativeTotal(_)
            | AllocError::TotalOutOfRange(_)
            | AllocError::InvalidWeight { .. }
            | AllocError::DuplicateCategory(_)
            | AllocError::AllocationMismatch(_) => ErrorKind::InvalidArgument,
            AllocError::SearchBudgetExhausted { .. } => ErrorKind::Exhausted,
            AllocError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::NegativeTotal(n) => write!(f, "invalid argument: target total {n} is negative"),
            AllocError::TotalOutOfRange(n) => {
                write!(f, "invalid argument: target total {n} exceeds {}", u32::MAX)
            }
            AllocError::InvalidWeight { category, weight } => write!(
                f,
                "invalid argument: category {category} has weight {weight}; weights must be finite and > 0"
            ),
            AllocError::DuplicateCategory(id) => {
                write!(f, "invalid argument: category {id} declared more than once")
            }
            AllocError::AllocationMismatch(m) => write!(f, "invalid argument: {m}"),
            AllocError::SearchBudgetExhausted { limit } => {
                write!(f, "correction search exceeded its budget of {limit} states")
            }
            AllocError::Internal(m) => write!(f, "internal error: {m}"),
        }
    }
}

impl std::error::Error for AllocError {}

// ----------------------------- Search limits ----------------------------------------

/// Bound on the exact-sum correction search.
///
/// The search is exponential in the rounding gap in the worst case; the budget
/// counts distinct states visited and turns a runaway search into
/// `AllocError::SearchBudgetExhausted`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// `None` disables the bound.
    pub max_nodes: Option<u64>,
}

impl SearchLimits {
    pub const DEFAULT_MAX_NODES: u64 = 1_000_000;

    pub const fn with_max_nodes(max_nodes: u64) -> Self {
        Self { max_nodes: Some(max_nodes) }
    }

    pub const fn unbounded() -> Self {
        Self { max_nodes: None }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::with_max_nodes(Self::DEFAULT_MAX_NODES)
    }
}

// ----------------------------- Outcome ----------------------------------------------

/// Which orchestration branch produced the answer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApportionPath {
    /// No categories declared.
    Empty,
    /// `N <= K`: one unit each to the `N` heaviest categories.
    SmallTotal,
    /// Rounded shares already summed to `N`.
    Exact,
    /// Rounded shares exceeded `N`; removal search ran.
    Overshoot,
    /// Rounded shares fell short of `N`; addition search ran.
    Undershoot,
}

impl ApportionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApportionPath::Empty => "empty",
            ApportionPath::SmallTotal => "small_total",
            ApportionPath::Exact => "exact",
            ApportionPath::Overshoot => "overshoot",
            ApportionPath::Undershoot => "undershoot",
        }
    }
}

impl fmt::Display for ApportionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correction search statistics (all zero when no search ran).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// |N − Σ initial estimate|
    pub gap: u64,
    /// Distinct states visited.
    pub nodes_expanded: u64,
    /// Distinct deviation scores retained in the candidate set.
    pub candidates_kept: usize,
}

/// Full result of one apportionment call.
#[derive(Clone, Debug, PartialEq)]
pub struct Apportionment {
    pub counts: Allocation,
    /// Deviation of `counts` from the ideal shares; `None` when nothing was
    /// allocated (no categories or `N == 0`).
    pub deviation: Option<f64>,
    pub path: ApportionPath,
    pub search: SearchStats,
}

// ----------------------------- Modules ----------------------------------------------

pub mod apportion {
    // File modules (actual implementations)
    pub mod table;
    pub mod estimate;
    pub mod candidates;
    pub mod correct;
    pub mod score;

    pub use candidates::CandidateSet;
    pub use estimate::{initial_estimate, Estimate};
    pub use score::deviation;
    pub use table::CategoryTable;
}

pub mod allocate;

// Convenience re-exports (callers import these from crate root)
pub use allocate::{allocate, allocate_detailed, allocate_with_limits, target_total_from_i64};
pub use apportion::deviation;
