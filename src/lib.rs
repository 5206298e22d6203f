// Domain layer: packing data model, placements, grid, solver contract
pub mod domain;

// Application layer: model building, decoding and the packing use case
pub mod application;

// Infrastructure layer: config files, logging, rendering, gRPC server
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    BinSpec, Grid, ItemConfig, ItemType, ItemTypeId, OptimizationProblem, PackingConfig,
    PackingSpec, Placement, PlacementIndex, RewardConfig, Solution, SolutionStatus, SolverBackend,
    SolverError, SolverService, SpecError,
};

pub use application::{
    build_model, DecodeError, ModelOptions, ModelSummary, PackingError, PackingModel,
    PackingOutcome, PackingService, SolutionDecoder,
};

pub use infrastructure::{
    init_logging, load_config, ColorPalette, Renderer, SvgRenderer, TextRenderer,
};

#[cfg(feature = "server")]
pub use application::GrpcPackingService;

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

pub use solver::{CancellationToken, SolveOptions, SolverFactory};

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
#[cfg(feature = "microlp")]
pub use solver::MicroLpSolver;
