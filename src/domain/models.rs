use super::value_objects::{ConstraintType, SolutionStatus};
use std::time::Duration;

/// Binary decision variable; every column of a packing model is 0 or 1
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn binary(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Linear objective `Σ coefficients[i] · x[i] + constant`, always maximized
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub coefficients: Vec<f64>,
    pub constant: f64,
}

impl ObjectiveFunction {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self {
            coefficients,
            constant: 0.0,
        }
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Value of the objective at `values`, constant included.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum::<f64>()
            + self.constant
    }
}

/// Sparse linear constraint `Σ coeff · x[index] (≤ | =) bound`
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(usize, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<(usize, f64)>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Left-hand side evaluated at `values`.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(i, c)| c * values.get(i).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Backend parameters carried with a problem
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Set by the time box; backends with a native limit also enforce it
    pub time_limit: Option<Duration>,
    pub verbose: bool,
}

/// Complete optimization problem handed to a solver adapter
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem) -> Self {
        Self {
            solve_time_ms: 0.0,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
        }
    }
}

/// Raw solver answer: status plus one value per declared variable when optimal
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn not_solved(message: impl Into<String>) -> Self {
        Self::new(SolutionStatus::NotSolved, message)
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}
