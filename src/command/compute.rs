use derive_more::IsVariant;
use serde::{Deserialize, Serialize};

use crate::simplex::{self, Problem, Report, SolverOptions};

/// A problem as submitted by a caller, `A` keeping its matrix-style name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInput {
    pub c: Vec<f64>,
    #[serde(rename = "A")]
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SolverOptions>,
}

impl ProblemInput {
    /// Zero-filled input with `n` variables and `m` constraints, ready to be filled in.
    pub fn template(n: usize, m: usize) -> Self {
        Self {
            c: vec![0.; n],
            a: vec![vec![0.; n]; m],
            b: vec![0.; m],
            options: None,
        }
    }
}

impl From<&ProblemInput> for Problem {
    fn from(input: &ProblemInput) -> Self {
        Problem::new(input.c.clone(), input.a.clone(), input.b.clone())
    }
}

/// Serialized as the report itself on success and as `{"error": "..."}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, IsVariant)]
#[serde(untagged)]
pub enum Response {
    Solved(Report),
    Failed { error: String },
}

impl From<simplex::SolutionResult> for Response {
    fn from(result: simplex::SolutionResult) -> Self {
        match result {
            Ok(report) => Response::Solved(report),
            Err(err) => Response::Failed {
                error: err.to_string(),
            },
        }
    }
}

pub fn compute(input: &ProblemInput, options: &SolverOptions) -> Response {
    log::info!(
        "Received input:\n\
        c: {:?}\n\
        A: {:?}\n\
        b: {:?}\n\
        options: {options:?}",
        input.c,
        input.a,
        input.b
    );

    let result = Problem::from(input).solve_with(options);
    match &result {
        Ok(report) => log::info!(
            "Solved in {} iterations, Z max = {}",
            report.total_iterations,
            report.z_max
        ),
        Err(err) => log::error!("{err}"),
    }
    result.into()
}
