// HiGHS Solver Adapter
// Translates the domain problem to a HiGHS row problem

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverService},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::{info, warn};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;
        info!(problem = %problem.name, backend = self.name(), "solving");

        let start_time = Instant::now();
        let mut statistics = SolverStatistics::for_problem(problem);

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.num_variables());

        // binaries are integer columns bounded to [0, 1]
        for &obj_coeff in &problem.objective.coefficients {
            cols.push(pb.add_integer_column(obj_coeff, 0.0..=1.0));
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .map(|&(i, coeff)| (cols[i], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
            }
        }

        let mut model = pb.optimise(Sense::Maximise);
        if !problem.solver_config.verbose {
            model.set_option("output_flag", false);
        }
        if let Some(limit) = problem.solver_config.time_limit {
            model.set_option("time_limit", limit.as_secs_f64());
        }

        let solved = model.solve();
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        let solution = match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let actual_obj = problem.objective.evaluate(&variable_values);

                let mut solution = DomainSolution::optimal(actual_obj, variable_values);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                solution
            }
            HighsModelStatus::ModelEmpty => {
                DomainSolution::optimal(problem.objective.constant, Vec::new())
            }
            HighsModelStatus::Infeasible => DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                DomainSolution::new(
                    DomainSolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
            }
            HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
                warn!(status = ?solved.status(), "HiGHS stopped before proving optimality");
                DomainSolution::not_solved(format!("HiGHS stopped: {:?}", solved.status()))
            }
            status => {
                warn!(?status, "HiGHS finished without a usable status");
                DomainSolution::new(
                    DomainSolutionStatus::Undefined,
                    format!("HiGHS solver returned status: {:?}", status),
                )
            }
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_time_limit(&self) -> bool {
        true
    }
}
