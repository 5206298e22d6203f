use tonic::{Request, Response, Status};
use tracing::{info, warn};

use super::mappers::{self, packing_proto};
use super::model_builder::ModelOptions;
use super::packing_service::{PackingError, PackingService};
use crate::domain::{
    solver_service::{SolverError, SolverService},
    value_objects::SolverBackend,
};
use crate::solver::SolverFactory;
use std::sync::Arc;

/// gRPC service implementation
pub struct GrpcPackingService {
    default_backend: SolverBackend,
}

impl GrpcPackingService {
    pub fn new(default_backend: SolverBackend) -> Self {
        Self { default_backend }
    }

    fn solver_for(&self, requested: SolverBackend) -> Result<Arc<dyn SolverService>, Status> {
        let backend = match requested {
            SolverBackend::Auto => self.default_backend,
            other => other,
        };
        SolverFactory::create_from_backend(backend).map_err(solver_status)
    }
}

impl Default for GrpcPackingService {
    fn default() -> Self {
        Self::new(SolverBackend::Auto)
    }
}

fn solver_status(err: SolverError) -> Status {
    match err {
        SolverError::SolverNotAvailable(msg) => Status::failed_precondition(msg),
        SolverError::InvalidProblem(msg) => Status::invalid_argument(msg),
        SolverError::ExecutionFailed(msg) => Status::internal(format!("Solver error: {}", msg)),
    }
}

fn packing_status(err: PackingError) -> Status {
    match err {
        PackingError::Spec(e) => Status::invalid_argument(e.to_string()),
        PackingError::Solver(e) => solver_status(e),
        PackingError::Decode(e) => Status::internal(e.to_string()),
    }
}

#[tonic::async_trait]
impl packing_proto::packing_solver_server::PackingSolver for GrpcPackingService {
    async fn solve_packing(
        &self,
        request: Request<packing_proto::SolvePackingRequest>,
    ) -> Result<Response<packing_proto::SolvePackingResponse>, Status> {
        let request = request.into_inner();
        let config = mappers::proto_to_domain_config(&request);
        let settings = mappers::proto_to_request_settings(&request);

        let solver = self.solver_for(settings.backend)?;
        let solver_name = solver.name().to_string();
        info!(
            bin = %format!("{}x{}", config.bin_width, config.bin_height),
            items = config.items.len(),
            backend = %solver_name,
            "solve request"
        );

        let service = PackingService::new(solver).with_model_options(ModelOptions {
            explicit_cell_capacity: settings.explicit_cell_capacity,
        });

        // The solve blocks for as long as the backend searches
        let outcome = tokio::task::spawn_blocking(move || {
            service.solve_config(&config, &settings.options)
        })
        .await
        .map_err(|e| Status::internal(format!("Solver task failed: {}", e)))?
        .map_err(packing_status)?;

        info!(status = %outcome.status, objective = ?outcome.objective_value, "solve finished");
        Ok(Response::new(mappers::domain_to_proto_outcome(
            outcome,
            &solver_name,
        )))
    }

    async fn validate_packing(
        &self,
        request: Request<packing_proto::SolvePackingRequest>,
    ) -> Result<Response<packing_proto::ValidatePackingResponse>, Status> {
        let request = request.into_inner();
        let config = mappers::proto_to_domain_config(&request);
        let settings = mappers::proto_to_request_settings(&request);
        let solver = self.solver_for(settings.backend)?;

        let service = PackingService::new(solver).with_model_options(ModelOptions {
            explicit_cell_capacity: settings.explicit_cell_capacity,
        });

        let response = match service.validate(&config) {
            Ok(summary) => mappers::domain_to_proto_summary(&summary),
            Err(e) => {
                warn!(error = %e, "rejected packing configuration");
                packing_proto::ValidatePackingResponse {
                    is_valid: false,
                    errors: vec![e.to_string()],
                    ..Default::default()
                }
            }
        };
        Ok(Response::new(response))
    }

    async fn get_available_solvers(
        &self,
        _request: Request<packing_proto::Empty>,
    ) -> Result<Response<packing_proto::AvailableSolvers>, Status> {
        let solvers = SolverFactory::available_backends()
            .into_iter()
            .filter_map(|backend| {
                let solver = SolverFactory::create_from_backend(backend).ok()?;
                Some(packing_proto::SolverInfo {
                    name: solver.name().to_string(),
                    backend: mappers::domain_to_proto_backend(backend) as i32,
                    supports_time_limit: solver.supports_time_limit(),
                })
            })
            .collect();

        Ok(Response::new(packing_proto::AvailableSolvers { solvers }))
    }
}
