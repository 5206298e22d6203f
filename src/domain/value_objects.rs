// Domain value objects shared by the packing model and the solver adapters

use std::fmt;

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
}

/// Status reported by a solver adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Proven optimal assignment available
    Optimal,
    /// No assignment satisfies all constraints
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Solve did not finish (deadline reached or cancelled)
    NotSolved,
    /// Backend finished in a state it could not classify
    Undefined,
}

impl SolutionStatus {
    pub fn has_values(&self) -> bool {
        matches!(self, SolutionStatus::Optimal)
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::NotSolved => write!(f, "Not Solved"),
            SolutionStatus::Undefined => write!(f, "Undefined"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverBackend {
    /// Best backend compiled into this build
    #[default]
    Auto,
    /// HiGHS via the `highs` crate
    Highs,
    /// COIN-OR CBC via `good_lp`
    CoinCbc,
    /// Pure Rust branch and bound via `good_lp`
    MicroLp,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::Highs => write!(f, "HiGHS"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::MicroLp => write!(f, "microlp"),
        }
    }
}

impl std::str::FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "highs" => Ok(SolverBackend::Highs),
            "cbc" | "coin-cbc" | "coin_cbc" => Ok(SolverBackend::CoinCbc),
            "microlp" => Ok(SolverBackend::MicroLp),
            other => Err(format!("unknown solver backend '{}'", other)),
        }
    }
}
