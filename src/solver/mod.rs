// Solver adapters module

#[cfg(feature = "cbc")]
pub mod coin_cbc_solver;
pub mod factory;
#[cfg(any(feature = "cbc", feature = "microlp"))]
mod good_lp_support;
#[cfg(feature = "highs")]
pub mod highs_solver;
#[cfg(feature = "microlp")]
pub mod microlp_solver;
pub mod timebox;

#[cfg(feature = "cbc")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;
#[cfg(feature = "microlp")]
pub use microlp_solver::MicroLpSolver;
pub use timebox::{solve_timeboxed, CancellationToken, SolveOptions};
