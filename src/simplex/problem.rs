
use std::fmt;

use derive_new::new;
use nalgebra::DMatrix;

use super::{Pivot, Report, Selection, SimplexError, SimplexTable, SolutionResult, SolverOptions};

/// `maximize c·x subject to A·x <= b, x >= 0`.
#[derive(Debug, Clone, PartialEq, new)]
pub struct Problem {
    objective: Vec<f64>,
    constraints: Vec<Vec<f64>>,
    rhs: Vec<f64>,
}

/// One performed pivot together with the tableau it was applied to.
#[derive(Debug, Clone, PartialEq, new)]
pub struct Step {
    /// 1-based.
    pub iteration: usize,
    pub pivot: Pivot,
    pub tableau_before: DMatrix<f64>,
}

/// Everything the pivot loop produced on its way to an optimal tableau.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub initial: DMatrix<f64>,
    pub table: SimplexTable,
    pub steps: Vec<Step>,
}

impl Problem {
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Vec<f64>] {
        &self.constraints
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn solve(&self) -> SolutionResult {
        self.solve_with(&SolverOptions::default())
    }

    pub fn solve_with(&self, options: &SolverOptions) -> SolutionResult {
        let trace = self.trace(options)?;
        Ok(Report::new(trace, options))
    }

    /// Runs the pivot loop until the tableau is optimal.
    ///
    /// No anti-cycling rule is applied: the entering column is the largest reduced cost and the
    /// leaving row the first minimum ratio, so degenerate problems can cycle until
    /// [`SolverOptions::max_iterations`] pivots have been made.
    pub fn trace(&self, options: &SolverOptions) -> Result<Trace, SimplexError> {
        let mut table = SimplexTable::new(self)?;
        let initial = table.tableau().clone();
        log::info!("Problem formed: {self}");

        let mut steps: Vec<Step> = Vec::new();
        loop {
            if steps.len() >= options.max_iterations {
                log::warn!(
                    "Iteration limit of {} reached without an optimal tableau",
                    options.max_iterations
                );
                return Err(SimplexError::IterationLimitExceeded {
                    limit: options.max_iterations,
                });
            }

            let iteration = steps.len() + 1;
            match table.select_pivot(options.tolerance) {
                Selection::Optimal => {
                    log::info!("Optimal solution was found after {} pivots", steps.len());
                    break;
                }
                Selection::Unbounded { col } => {
                    log::info!(
                        "Column {} has no positive entry, the problem is unbounded",
                        table.variable_label(col)
                    );
                    return Err(SimplexError::Unbounded);
                }
                Selection::Pivot(pivot) => {
                    log::info!(
                        "Iteration: {iteration}, {} enters, {} leaves, pivot element: {}",
                        table.variable_label(pivot.col),
                        table.row_label(pivot.row),
                        pivot.element
                    );
                    steps.push(Step::new(iteration, pivot, table.tableau().clone()));
                    table.pivot(pivot);
                }
            }
        }

        Ok(Trace {
            initial,
            table,
            steps,
        })
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn linear_form(coefficients: &[f64]) -> String {
            coefficients
                .iter()
                .enumerate()
                .map(|(j, c)| match (j, c.is_sign_negative()) {
                    (0, _) => format!("{c}·X1"),
                    (j, true) => format!(" - {}·X{}", -c, j + 1),
                    (j, false) => format!(" + {c}·X{}", j + 1),
                })
                .collect()
        }

        writeln!(f, "maximize Z = {}", linear_form(&self.objective))?;
        writeln!(f, "subject to")?;
        for (i, (row, rhs)) in self.constraints.iter().zip(&self.rhs).enumerate() {
            writeln!(f, "    e{}: {} <= {rhs}", i + 1, linear_form(row))?;
        }
        let variables = (1..=self.objective.len())
            .map(|j| format!("X{j}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "    {variables} >= 0")
    }
}
