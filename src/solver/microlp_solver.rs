// Pure Rust backend: no native libraries, no native time limit

use super::good_lp_support::solve_with;
use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::solvers::microlp;
use tracing::info;

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;
        info!(problem = %problem.name, backend = self.name(), "solving");

        solve_with(problem, microlp::microlp, |_| {})
    }

    fn name(&self) -> &str {
        "microlp"
    }

    fn supports_time_limit(&self) -> bool {
        false
    }
}
