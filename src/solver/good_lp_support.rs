// Shared translation from the domain problem to a good_lp model
// Used by every backend reached through good_lp (CBC, microlp)

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::Result,
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus},
};
use good_lp::{
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolutionTrait, Solver,
    SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::{debug, warn};

/// Build the model, let `configure` set backend parameters, solve and map the outcome.
pub(crate) fn solve_with<S, C>(
    problem: &OptimizationProblem,
    solver: S,
    configure: C,
) -> Result<DomainSolution>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    C: FnOnce(&mut S::Model),
{
    let start_time = Instant::now();
    let mut statistics = SolverStatistics::for_problem(problem);

    let mut vars = variables!();
    let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.num_variables());

    for var_def in problem.variables.iter() {
        lp_variables.push(vars.add(variable().binary().name(var_def.name.clone())));
    }

    let mut objective: Expression = 0.into();
    for (i, &coeff) in problem.objective.coefficients.iter().enumerate() {
        if coeff != 0.0 {
            objective += coeff * lp_variables[i];
        }
    }

    let mut lp_model = vars.maximise(objective).using(solver);

    for constraint in &problem.constraints {
        if constraint.terms.is_empty() {
            let holds = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => 0.0 <= constraint.bound,
                ConstraintType::Equal => constraint.bound == 0.0,
            };
            if holds {
                continue;
            }
            debug!(constraint = %constraint.name, "empty constraint cannot hold");
            statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
            return Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                format!("Constraint '{}' has no terms and cannot hold", constraint.name),
            )
            .with_statistics(statistics));
        }

        let mut lhs: Expression = 0.into();
        for &(i, coeff) in &constraint.terms {
            lhs += coeff * lp_variables[i];
        }

        lp_model = match constraint.constraint_type {
            ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
            ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
        };
    }

    configure(&mut lp_model);

    let solution_result = lp_model.solve();
    let elapsed = start_time.elapsed();
    statistics.solve_time_ms = elapsed.as_secs_f64() * 1000.0;

    match solution_result {
        Ok(sol) => {
            let variable_values: Vec<f64> = lp_variables.iter().map(|&var| sol.value(var)).collect();
            let actual_obj = problem.objective.evaluate(&variable_values);

            let mut solution = DomainSolution::optimal(actual_obj, variable_values);
            solution.statistics = statistics;
            solution.message = format!("Optimal solution found for '{}'", problem.name);
            Ok(solution)
        }
        Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
            DomainSolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
            DomainSolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
        .with_statistics(statistics)),
        Err(e) => {
            let limit_reached = problem
                .solver_config
                .time_limit
                .is_some_and(|limit| elapsed >= limit);
            if limit_reached {
                warn!(error = ?e, "solver stopped at its time limit");
                Ok(DomainSolution::not_solved(format!("Time limit reached: {:?}", e))
                    .with_statistics(statistics))
            } else {
                warn!(error = ?e, "solver finished without a usable status");
                Ok(DomainSolution::new(
                    DomainSolutionStatus::Undefined,
                    format!("Solver returned: {:?}", e),
                )
                .with_statistics(statistics))
            }
        }
    }
}
