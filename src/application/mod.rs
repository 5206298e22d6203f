// Application module: packing use cases and outer adapters

pub mod decoder;
#[cfg(feature = "server")]
pub mod grpc_service;
pub mod mappers;
pub mod model_builder;
pub mod packing_service;

pub use decoder::{DecodeError, SolutionDecoder};
#[cfg(feature = "server")]
pub use grpc_service::GrpcPackingService;
pub use model_builder::{build_model, ModelOptions, PackingModel};
pub use packing_service::{ModelSummary, PackingError, PackingOutcome, PackingService};
