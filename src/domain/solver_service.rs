// Domain service interface for solving the integer programs built by the packing model
// Any backend (HiGHS, CBC, microlp) plugs in behind this trait

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for integer-programming solvers
///
/// `solve` blocks until the backend returns. Non-optimal outcomes
/// (infeasible, unbounded, time limit) are reported through
/// [`Solution::status`], never as errors.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        if problem.objective.num_variables() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                num_vars,
                problem.objective.num_variables()
            ));
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if let Some(&(index, _)) = constraint.terms.iter().find(|(index, _)| *index >= num_vars)
            {
                errors.push(format!(
                    "Constraint {} '{}' references variable {} but problem has {} variables",
                    i, constraint.name, index, num_vars
                ));
            }
        }

        if !problem.objective.constant.is_finite() {
            errors.push("Objective constant must be finite".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Whether the backend honours `SolverConfig::time_limit` on its own
    fn supports_time_limit(&self) -> bool;
}
