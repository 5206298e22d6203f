use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use std::sync::Arc;

#[cfg(feature = "cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
#[cfg(feature = "microlp")]
use crate::solver::MicroLpSolver;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Ok(Arc::new(HighsSolver::new())),
            #[cfg(feature = "cbc")]
            SolverBackend::CoinCbc => Ok(Arc::new(CoinCbcSolver::new())),
            #[cfg(feature = "microlp")]
            SolverBackend::MicroLp => Ok(Arc::new(MicroLpSolver::new())),
            #[allow(unreachable_patterns)]
            other => Err(SolverError::SolverNotAvailable(format!(
                "{} was not compiled into this build",
                other
            ))),
        }
    }

    /// Best available backend: HiGHS, then CBC, then microlp
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::available_backends()
            .first()
            .map(|&backend| Self::create_from_backend(backend))
            .unwrap_or_else(|| {
                Err(SolverError::SolverNotAvailable(
                    "no solver backend enabled; build with `highs`, `cbc` or `microlp`".to_string(),
                ))
            })
    }

    /// Backends compiled into this build, in order of preference
    pub fn available_backends() -> Vec<SolverBackend> {
        let mut backends = Vec::new();
        if cfg!(feature = "highs") {
            backends.push(SolverBackend::Highs);
        }
        if cfg!(feature = "cbc") {
            backends.push(SolverBackend::CoinCbc);
        }
        if cfg!(feature = "microlp") {
            backends.push(SolverBackend::MicroLp);
        }
        backends
    }
}
