use derive_more::IsVariant;
use derive_new::new;
use nalgebra::DMatrix;

use crate::{dbg_display, ensure, ensure_eq};

use super::{Problem, SimplexError};

/// A pivot cell chosen by the ratio test.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct Pivot {
    pub row: usize,
    pub col: usize,
    pub element: f64,
}

/// What the current objective row and ratio test say about the next step.
#[derive(Debug, Clone, Copy, PartialEq, IsVariant)]
pub enum Selection {
    /// No objective row entry exceeds the tolerance.
    Optimal,
    /// The entering column has no entry above the tolerance in any constraint row.
    Unbounded { col: usize },
    Pivot(Pivot),
}

/// Augmented tableau of a maximization problem in `Ax <= b, x >= 0` form.
///
/// Rows `0..m` hold the constraints and row `m` the objective.
/// Columns `0..n` hold the decision variables, `n..n + m` the slack variables and the last one
/// the right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexTable {
    n_vars: usize,
    m_constr: usize,
    tableau: DMatrix<f64>,
}

impl SimplexTable {
    pub fn new(problem: &Problem) -> Result<Self, SimplexError> {
        let n_vars = problem.objective().len();
        let m_constr = problem.rhs().len();

        ensure!(n_vars >= 1);
        ensure!(m_constr >= 1);
        ensure_eq!(problem.constraints().len(), m_constr);
        for row in problem.constraints() {
            ensure_eq!(row.len(), n_vars);
        }
        log::debug!("Shape assertions passed: n = {n_vars}, m = {m_constr}");

        let rhs_col = n_vars + m_constr;
        let tableau = DMatrix::from_fn(m_constr + 1, rhs_col + 1, |i, j| {
            if i == m_constr {
                // slack and rhs entries of the objective row start at zero
                return if j < n_vars { problem.objective()[j] } else { 0. };
            }
            if j < n_vars {
                problem.constraints()[i][j]
            } else if j == rhs_col {
                problem.rhs()[i]
            } else if j - n_vars == i {
                1.
            } else {
                0.
            }
        });

        Ok(Self {
            n_vars,
            m_constr,
            tableau,
        })
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    pub fn m_constr(&self) -> usize {
        self.m_constr
    }

    pub fn tableau(&self) -> &DMatrix<f64> {
        &self.tableau
    }

    pub fn rhs_col(&self) -> usize {
        self.n_vars + self.m_constr
    }

    pub fn objective_row(&self) -> usize {
        self.m_constr
    }

    /// Right-hand side of the objective row. Its absolute value is the objective reached so far.
    pub fn objective_value(&self) -> f64 {
        self.tableau[(self.objective_row(), self.rhs_col())]
    }

    /// Index of the largest objective row entry, first one on ties, if it exceeds `tolerance`.
    ///
    /// A `NaN` anywhere in the objective row stops the search, the same way a `NaN` maximum
    /// never compares above the tolerance.
    pub fn entering_column(&self, tolerance: f64) -> Option<usize> {
        let reduced_costs = self
            .tableau
            .row(self.objective_row())
            .iter()
            .take(self.rhs_col())
            .copied()
            .collect::<Vec<_>>();
        if reduced_costs.iter().any(|cost| cost.is_nan()) {
            log::warn!("Objective row contains NaN, treating the tableau as final");
            return None;
        }

        reduced_costs
            .into_iter()
            .enumerate()
            .reduce(|best, current| if current.1 > best.1 { current } else { best })
            .filter(|&(_, max)| max > tolerance)
            .map(|(j, _)| j)
    }

    /// Minimum ratio test on column `col`, first row on ties.
    ///
    /// Rows whose entry in `col` does not exceed `tolerance` get an infinite ratio. Returns `None`
    /// when no row has such an entry.
    pub fn leaving_row(&self, col: usize, tolerance: f64) -> Option<usize> {
        let rhs_col = self.rhs_col();
        let ratios = (0..self.m_constr)
            .map(|i| {
                let entry = self.tableau[(i, col)];
                (entry > tolerance).then(|| self.tableau[(i, rhs_col)] / entry)
            })
            .collect::<Vec<_>>();
        if ratios.iter().all(Option::is_none) {
            return None;
        }
        log::debug!("Ratios for column {col}: {ratios:?}");

        ratios
            .into_iter()
            .map(|ratio| ratio.unwrap_or(f64::INFINITY))
            .enumerate()
            .reduce(|best, current| if current.1 < best.1 { current } else { best })
            .map(|(i, _)| i)
    }

    pub fn select_pivot(&self, tolerance: f64) -> Selection {
        let Some(col) = self.entering_column(tolerance) else {
            return Selection::Optimal;
        };
        match self.leaving_row(col, tolerance) {
            Some(row) => Selection::Pivot(Pivot::new(row, col, self.tableau[(row, col)])),
            None => Selection::Unbounded { col },
        }
    }

    /// Gauss-Jordan elimination around `pivot`: the pivot row is normalized first, then its
    /// multiples are subtracted from every other row, the objective row included.
    pub fn pivot(&mut self, pivot: Pivot) {
        let Pivot { row, col, element } = pivot;
        log::debug!("Pivoting on ({row}, {col}) = {element}");
        dbg_display!(&self.tableau);

        // divide all elements in a row by pivot element
        self.tableau.row_mut(row).apply(|el| *el /= element);

        // subtract pivot row from other rows till all of elements in pivot col except of pivot element are zero
        let pivot_row = self.tableau.row(row).into_owned();
        for i in (0..self.tableau.nrows()).filter(|i| i != &row) {
            let multiplier = self.tableau[(i, col)];
            self.tableau
                .row_mut(i)
                .zip_apply(&pivot_row, |tableau_row_el, pivot_row_el| {
                    *tableau_row_el -= multiplier * pivot_row_el
                });
        }
    }

    /// `X{k}` for decision variables, `S{k}` for slack variables.
    pub fn variable_label(&self, col: usize) -> String {
        if col < self.n_vars {
            format!("X{}", col + 1)
        } else {
            format!("S{}", col - self.n_vars + 1)
        }
    }

    /// `e{k}` for the constraint row that gives up its basic variable.
    pub fn row_label(&self, row: usize) -> String {
        format!("e{}", row + 1)
    }
}
