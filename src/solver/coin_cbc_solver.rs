use super::good_lp_support::solve_with;
use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::solvers::coin_cbc;
use tracing::info;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;
        info!(problem = %problem.name, backend = self.name(), "solving");

        let config = problem.solver_config.clone();
        solve_with(problem, coin_cbc::coin_cbc, |model| {
            if let Some(limit) = config.time_limit {
                model.set_parameter("seconds", &format!("{}", limit.as_secs_f64()));
            }
            if !config.verbose {
                model.set_parameter("log", "0");
            }
        })
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_time_limit(&self) -> bool {
        true
    }
}
