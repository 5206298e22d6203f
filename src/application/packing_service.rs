// Packing use case: validate, build the model, solve within bounds, decode

use super::decoder::{DecodeError, SolutionDecoder};
use super::model_builder::{build_model, ModelOptions};
use crate::domain::{
    grid::Grid,
    models::SolverStatistics,
    packing::{ItemTypeId, PackingConfig, PackingSpec, SpecError},
    solver_service::{SolverError, SolverService},
    value_objects::SolutionStatus,
};
use crate::solver::timebox::{solve_timeboxed, SolveOptions};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PackingError {
    #[error("Invalid packing configuration: {0}")]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Cannot decode solver output: {0}")]
    Decode(#[from] DecodeError),
}

/// Result of one packing run
///
/// `grid` and `objective_value` are present only when the solver proved
/// optimality; every other status is passed through unchanged.
#[derive(Debug, Clone)]
pub struct PackingOutcome {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub grid: Option<Grid>,
    pub message: String,
    pub statistics: SolverStatistics,
}

/// Model size figures, available without solving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub placement_variables: usize,
    pub coverage_variables: usize,
    pub constraints: usize,
    pub unplaceable_items: Vec<ItemTypeId>,
}

pub struct PackingService {
    solver: Arc<dyn SolverService>,
    model_options: ModelOptions,
    decoder: SolutionDecoder,
}

impl PackingService {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver,
            model_options: ModelOptions::default(),
            decoder: SolutionDecoder::new(),
        }
    }

    pub fn with_model_options(mut self, options: ModelOptions) -> Self {
        self.model_options = options;
        self
    }

    pub fn with_decoder(mut self, decoder: SolutionDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Validate `config`, then solve it.
    pub fn solve_config(
        &self,
        config: &PackingConfig,
        options: &SolveOptions,
    ) -> Result<PackingOutcome, PackingError> {
        let spec = config.validate()?;
        self.solve(&spec, options)
    }

    pub fn solve(
        &self,
        spec: &PackingSpec,
        options: &SolveOptions,
    ) -> Result<PackingOutcome, PackingError> {
        let model = build_model(spec, self.model_options);
        info!(
            backend = self.solver.name(),
            bin = %format!("{}x{}", spec.bin().width, spec.bin().height),
            placements = model.num_placements(),
            "solving packing model"
        );

        let solution = solve_timeboxed(Arc::clone(&self.solver), model.problem.clone(), options)?;
        info!(status = %solution.status, objective = ?solution.optimal_value, "solver finished");

        if !solution.is_optimal() {
            debug!(message = %solution.message, "no grid for non-optimal status");
            return Ok(PackingOutcome {
                status: solution.status,
                objective_value: None,
                grid: None,
                message: solution.message,
                statistics: solution.statistics,
            });
        }

        let grid = self.decoder.decode(&model, &solution)?;

        if let Some(reported) = solution.optimal_value {
            let recomputed = grid.objective_value(spec);
            if (reported - recomputed).abs() > 1e-6 * reported.abs().max(1.0) {
                warn!(reported, recomputed, "objective differs from the decoded grid");
            }
        }

        Ok(PackingOutcome {
            status: solution.status,
            objective_value: solution.optimal_value,
            grid: Some(grid),
            message: solution.message,
            statistics: solution.statistics,
        })
    }

    /// Size of the model `config` would produce, without solving it.
    pub fn validate(&self, config: &PackingConfig) -> Result<ModelSummary, PackingError> {
        let spec = config.validate()?;
        let model = build_model(&spec, self.model_options);
        self.solver.validate(&model.problem)?;

        Ok(ModelSummary {
            placement_variables: model.num_placements(),
            coverage_variables: spec.bin().cells(),
            constraints: model.problem.constraints.len(),
            unplaceable_items: spec
                .items()
                .iter()
                .filter(|item| !item.fits_in(spec.bin()))
                .map(|item| item.id)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::{OptimizationProblem, Solution},
        packing::ItemConfig,
    };
    use std::time::Duration;

    /// Returns a fixed status, or selects nothing when asked for an optimum.
    struct ScriptedSolver(SolutionStatus);

    impl SolverService for ScriptedSolver {
        fn solve(&self, problem: &OptimizationProblem) -> crate::domain::solver_service::Result<Solution> {
            Ok(match self.0 {
                SolutionStatus::Optimal => {
                    let values = vec![0.0; problem.num_variables()];
                    Solution::optimal(problem.objective.evaluate(&values), values)
                }
                status => Solution::new(status, "scripted"),
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn supports_time_limit(&self) -> bool {
            false
        }
    }

    fn service(status: SolutionStatus) -> PackingService {
        PackingService::new(Arc::new(ScriptedSolver(status)))
    }

    #[test]
    fn rejects_bad_config_before_solving() {
        let config = PackingConfig {
            items: Vec::new(),
            ..PackingConfig::default()
        };
        let err = service(SolutionStatus::Optimal)
            .solve_config(&config, &SolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, PackingError::Spec(SpecError::NoItems)));
    }

    #[test]
    fn non_optimal_statuses_pass_through_without_grid() {
        for status in [
            SolutionStatus::Infeasible,
            SolutionStatus::Unbounded,
            SolutionStatus::NotSolved,
            SolutionStatus::Undefined,
        ] {
            let outcome = service(status)
                .solve_config(&PackingConfig::default(), &SolveOptions::default())
                .unwrap();
            assert_eq!(outcome.status, status);
            assert!(outcome.grid.is_none());
            assert!(outcome.objective_value.is_none());
        }
    }

    #[test]
    fn huge_time_limit_solves_normally() {
        let options = SolveOptions::default().with_time_limit(Duration::from_secs_f64(1e19));
        let outcome = service(SolutionStatus::Optimal)
            .solve_config(&PackingConfig::default(), &options)
            .unwrap();
        assert_eq!(outcome.status, SolutionStatus::Optimal);
        assert!(outcome.grid.is_some());
    }

    #[test]
    fn optimal_outcome_carries_grid() {
        let outcome = service(SolutionStatus::Optimal)
            .solve_config(&PackingConfig::default(), &SolveOptions::default())
            .unwrap();
        let grid = outcome.grid.unwrap();
        assert!(grid.is_empty());
        assert_eq!(outcome.objective_value, Some(-120.0));
        assert_eq!(outcome.statistics.num_variables, 0);
    }

    #[test]
    fn summary_reports_sizes_and_unplaceable_items() {
        let config = PackingConfig {
            items: vec![ItemConfig::new(2, 1, 4, 3.0), ItemConfig::new(5, 1, 1, 1.0)],
            ..PackingConfig::default()
        };
        let summary = service(SolutionStatus::Optimal).validate(&config).unwrap();
        assert_eq!(
            summary,
            ModelSummary {
                placement_variables: 9,
                coverage_variables: 12,
                constraints: 12 + 2,
                unplaceable_items: vec![ItemTypeId(1)],
            }
        );
    }
}
