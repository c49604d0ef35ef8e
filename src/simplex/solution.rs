use std::fmt;

use derive_new::new;
use nalgebra::DMatrix;
use serde::Serialize;

use crate::helpers::{f64_rounded_string, round_all, round_to};

use super::{BasisDetection, SimplexTable, SolverOptions, Step, Trace};

// report values are already rounded, this only trims the float noise of the decimal conversion
const SHOWN_DIGITS: usize = 10;

/// A performed pivot as shown to the reader.
#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct PivotRecord {
    pub iteration: usize,
    pub pivot_row: usize,
    pub pivot_col: usize,
    pub pivot_element: f64,
    pub entering_var: String,
    pub leaving_var: String,
    pub tableau_before: Vec<Vec<f64>>,
}

/// Outcome of a successful solve. Every float is rounded to [`SolverOptions::precision`] places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub solution: Vec<f64>,
    pub z_max: f64,
    pub initial_tableau: Vec<Vec<f64>>,
    pub final_tableau: Vec<Vec<f64>>,
    pub n_vars: usize,
    pub m_constr: usize,
    pub pivot_history: Vec<PivotRecord>,
    pub total_iterations: usize,
}

/// Reads the decision variables off a final tableau.
///
/// Column `j` is basic when exactly one of its constraint entries is one and the entries add up
/// to one; the variable then takes the right-hand side of that row. Every other variable is zero.
pub fn extract_solution(table: &SimplexTable, detection: BasisDetection) -> Vec<f64> {
    let tableau = table.tableau();
    let m_constr = table.m_constr();
    (0..table.n_vars())
        .map(|j| {
            let column = tableau.column(j);
            let entries = column.rows(0, m_constr);
            let ones = entries.iter().filter(|el| detection.is_one(**el)).count();
            let sum = entries.iter().sum::<f64>();
            let basic = ones == 1 && detection.is_one(sum);
            log::debug!(
                "Column {}: ones = {ones}, sum = {sum}, basic = {basic}",
                table.variable_label(j)
            );
            if !basic {
                return 0.;
            }
            entries
                .iter()
                .position(|el| detection.is_one(*el))
                .map_or(0., |row| tableau[(row, table.rhs_col())])
        })
        .collect()
}

/// The sign of the objective row's right-hand side depends on the elimination history, so only its
/// magnitude is meaningful.
pub fn extract_objective(table: &SimplexTable) -> f64 {
    table.objective_value().abs()
}

fn rounded_rows(tableau: &DMatrix<f64>, precision: u32) -> Vec<Vec<f64>> {
    tableau
        .row_iter()
        .map(|row| round_all(row.iter().copied(), precision))
        .collect()
}

impl Report {
    pub fn new(trace: Trace, options: &SolverOptions) -> Self {
        let Trace {
            initial,
            table,
            steps,
        } = trace;
        let precision = options.precision;

        let solution = extract_solution(&table, options.basis_detection);
        let z_max = extract_objective(&table);
        log::info!("Solution: {solution:?}, Z max: {z_max}");

        let pivot_history = steps
            .into_iter()
            .map(
                |Step {
                     iteration,
                     pivot,
                     tableau_before,
                 }| {
                    PivotRecord::new(
                        iteration,
                        pivot.row,
                        pivot.col,
                        round_to(pivot.element, precision),
                        table.variable_label(pivot.col),
                        table.row_label(pivot.row),
                        rounded_rows(&tableau_before, precision),
                    )
                },
            )
            .collect::<Vec<_>>();

        Self {
            solution: round_all(solution, precision),
            z_max: round_to(z_max, precision),
            initial_tableau: rounded_rows(&initial, precision),
            final_tableau: rounded_rows(table.tableau(), precision),
            n_vars: table.n_vars(),
            m_constr: table.m_constr(),
            total_iterations: pivot_history.len(),
            pivot_history,
        }
    }

    fn write_tableau(&self, f: &mut fmt::Formatter<'_>, rows: &[Vec<f64>]) -> fmt::Result {
        let width = 10;

        let header = (1..=self.n_vars)
            .map(|j| format!("X{j}"))
            .chain((1..=self.m_constr).map(|i| format!("S{i}")))
            .chain(["RHS".to_owned()]);
        write!(f, "{:>4}", "")?;
        for label in header {
            write!(f, "{label:>width$}")?;
        }
        writeln!(f)?;

        for (i, row) in rows.iter().enumerate() {
            let label = if i < self.m_constr {
                format!("e{}", i + 1)
            } else {
                "Z".to_owned()
            };
            write!(f, "{label:>4}")?;
            for value in row {
                write!(f, "{:>width$}", f64_rounded_string(value, SHOWN_DIGITS))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial tableau:")?;
        self.write_tableau(f, &self.initial_tableau)?;

        for record in &self.pivot_history {
            writeln!(f)?;
            writeln!(
                f,
                "Iteration {}: {} enters, {} leaves, pivot element {} at ({}, {})",
                record.iteration,
                record.entering_var,
                record.leaving_var,
                f64_rounded_string(&record.pivot_element, SHOWN_DIGITS),
                record.pivot_row,
                record.pivot_col
            )?;
            self.write_tableau(f, &record.tableau_before)?;
        }

        writeln!(f)?;
        writeln!(f, "Final tableau after {} iterations:", self.total_iterations)?;
        self.write_tableau(f, &self.final_tableau)?;

        writeln!(f)?;
        for (j, value) in self.solution.iter().enumerate() {
            writeln!(f, "X{} = {}", j + 1, f64_rounded_string(value, SHOWN_DIGITS))?;
        }
        write!(f, "Z max = {}", f64_rounded_string(&self.z_max, SHOWN_DIGITS))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::simplex::{Pivot, Problem};

    fn solved(c: Vec<f64>, a: Vec<Vec<f64>>, b: Vec<f64>) -> SimplexTable {
        Problem::new(c, a, b)
            .trace(&SolverOptions::default())
            .unwrap()
            .table
    }

    #[test]
    fn extract_reads_basic_columns() {
        let table = solved(
            vec![3., 5.],
            vec![vec![1., 0.], vec![0., 2.], vec![3., 2.]],
            vec![4., 12., 18.],
        );
        assert_eq!(extract_solution(&table, BasisDetection::Exact), vec![2., 6.]);
        assert_eq!(extract_objective(&table), 36.);
    }

    #[test]
    fn extract_zeroes_columns_with_several_ones() {
        // the X1 column ends as [1, 1], which is not a unit column
        let table = solved(vec![3., 4.], vec![vec![1., 1.], vec![2., 1.]], vec![10., 15.]);
        assert_eq!(
            table.tableau().column(0).rows(0, 2).iter().copied().collect::<Vec<_>>(),
            vec![1., 1.]
        );
        assert_eq!(extract_solution(&table, BasisDetection::Exact), vec![0., 10.]);
    }

    #[test]
    fn exact_detection_misses_perturbed_unit_column() {
        let mut table = solved(vec![1.], vec![vec![2.]], vec![3.]);
        assert_eq!(extract_solution(&table, BasisDetection::Exact), vec![1.5]);

        // dividing by 1 instead of the actual entry leaves it one ulp above one
        let problem = Problem::new(vec![1.], vec![vec![1. + f64::EPSILON]], vec![3.]);
        table = SimplexTable::new(&problem).unwrap();
        table.pivot(Pivot::new(0, 0, 1.));
        assert_eq!(extract_solution(&table, BasisDetection::Exact), vec![0.]);
        assert_eq!(
            extract_solution(&table, BasisDetection::Tolerance(1e-9)),
            vec![3.]
        );
    }

    #[test]
    fn report_rounds_and_labels_history() {
        let options = SolverOptions::default();
        let trace = Problem::new(
            vec![3., 5.],
            vec![vec![1., 0.], vec![0., 2.], vec![3., 2.]],
            vec![4., 12., 18.],
        )
        .trace(&options)
        .unwrap();
        let report = Report::new(trace, &options);

        assert_eq!(report.n_vars, 2);
        assert_eq!(report.m_constr, 3);
        assert_eq!(report.total_iterations, 2);
        assert_eq!(report.solution, vec![2., 6.]);
        assert_eq!(report.z_max, 36.);
        assert_eq!(
            report.final_tableau,
            vec![
                vec![0., 0., 1., 0.3333, -0.3333, 2.],
                vec![0., 1., 0., 0.5, 0., 6.],
                vec![1., 0., 0., -0.3333, 0.3333, 2.],
                vec![0., 0., 0., -1.5, -1., -36.],
            ]
        );

        let entering = report
            .pivot_history
            .iter()
            .map(|record| (record.entering_var.as_str(), record.leaving_var.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(entering, vec![("X2", "e2"), ("X1", "e3")]);
        assert_eq!(report.pivot_history[0].pivot_element, 2.);
        assert_eq!(report.pivot_history[1].pivot_element, 3.);
        assert_eq!(report.pivot_history[0].tableau_before, report.initial_tableau);
    }

    #[test]
    fn report_renders_tableaux_and_solution() {
        let report = crate::simplex::solve(&[3., 4.], &[vec![1., 1.], vec![2., 1.]], &[10., 15.])
            .unwrap();
        let text = report.to_string();
        assert!(text.starts_with("Initial tableau:\n"));
        assert!(text.contains("Iteration 1: X2 enters, e1 leaves, pivot element 1 at (0, 1)"));
        assert!(text.contains("Final tableau after 1 iterations:"));
        assert!(text.contains("X1 = 0\nX2 = 10\nZ max = 40"));
        let header = text.lines().nth(1).unwrap();
        assert_eq!(
            header.split_whitespace().collect::<Vec<_>>(),
            vec!["X1", "X2", "S1", "S2", "RHS"]
        );
    }
}
