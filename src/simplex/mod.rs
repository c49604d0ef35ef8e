mod options;
mod problem;
mod solution;
mod table;

pub use options::{BasisDetection, SolverOptions};
pub use problem::*;
pub use solution::{PivotRecord, Report};
pub use table::{Pivot, Selection, SimplexTable};

use derive_more::{Display, Error, IsVariant};
use derive_new::new;

/// Input shapes that do not describe a tableau.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, new)]
#[display(fmt = "{}", message)]
pub struct DimensionMismatch {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Display, Error, IsVariant)]
pub enum SimplexError {
    #[display(fmt = "the problem is unbounded; no finite optimal solution exists")]
    Unbounded,
    #[display(fmt = "iteration limit of {} reached; the problem may have cycled", limit)]
    IterationLimitExceeded { limit: usize },
    #[display(fmt = "a computation error occurred: {}", source)]
    Computation { source: DimensionMismatch },
}

impl From<DimensionMismatch> for SimplexError {
    fn from(source: DimensionMismatch) -> Self {
        Self::Computation { source }
    }
}

pub type SolutionResult = Result<Report, SimplexError>;

/// Maximizes `c·x` subject to `A·x <= b`, `x >= 0` with the default [`SolverOptions`].
pub fn solve(c: &[f64], a: &[Vec<f64>], b: &[f64]) -> SolutionResult {
    Problem::new(c.to_vec(), a.to_vec(), b.to_vec()).solve()
}
