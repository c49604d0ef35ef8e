use derive_more::IsVariant;
use serde::{Deserialize, Serialize};

/// How the final tableau is searched for basic decision variables.
#[derive(Debug, Clone, Copy, PartialEq, Default, IsVariant, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisDetection {
    /// A column is basic only if exactly one of its constraint entries is `1.0` and the entries
    /// sum to exactly `1.0`.
    ///
    /// Repeated elimination can leave a unit column a few ulps away from `1.0`, in which case the
    /// variable is reported as zero.
    #[default]
    Exact,
    /// Same test, with every comparison made within the given distance.
    Tolerance(f64),
}

impl BasisDetection {
    pub fn is_one(&self, value: f64) -> bool {
        match *self {
            BasisDetection::Exact => value == 1.,
            BasisDetection::Tolerance(eps) => (value - 1.).abs() <= eps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Objective row entries and pivot column entries at or below this are treated as non-positive.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Decimal places kept in the report.
    pub precision: u32,
    pub basis_detection: BasisDetection,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 1000,
            precision: 4,
            basis_detection: BasisDetection::Exact,
        }
    }
}

impl SolverOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_basis_detection(mut self, basis_detection: BasisDetection) -> Self {
        self.basis_detection = basis_detection;
        self
    }
}
