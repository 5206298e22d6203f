// Infrastructure: gRPC server setup and lifecycle

use std::net::SocketAddr;
use tonic::transport::Server;
use tracing::info;

use crate::application::mappers::packing_proto::packing_solver_server::PackingSolverServer;
use crate::application::GrpcPackingService;
use crate::domain::value_objects::SolverBackend;
use crate::solver::SolverFactory;

pub struct ServerConfig {
    pub address: SocketAddr,
    pub default_backend: SolverBackend,
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            default_backend: SolverBackend::Auto,
        }
    }

    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.default_backend = backend;
        self
    }
}

/// Serve until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // fail at startup rather than on the first request
    let solver = SolverFactory::create_from_backend(config.default_backend)?;
    let service = GrpcPackingService::new(config.default_backend);

    info!(
        address = %config.address,
        backend = solver.name(),
        available = ?SolverFactory::available_backends(),
        "binpack packing solver listening"
    );

    Server::builder()
        .add_service(PackingSolverServer::new(service))
        .serve_with_shutdown(config.address, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
