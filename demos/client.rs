// Example: pack the reference 4x3 instance through the gRPC service
//
// Bin 4x3, reward 10 per covered cell, penalty -10 per empty cell.
//
// Item | Size | Count | Unit cost
// -----|------|-------|----------
//  A   | 1x1  |   3   |    5
//  B   | 2x1  |   4   |    3
//
// Start the server first: `cargo run --features server -- serve`

use binpack::application::mappers::{
    self, packing_proto::packing_solver_client::PackingSolverClient, packing_proto::Empty,
    packing_proto::SolutionStatus, RequestSettings,
};
use binpack::{PackingConfig, SolveOptions, SolverBackend};
use std::time::Duration;
use tonic::Request;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = PackingSolverClient::connect("http://127.0.0.1:50051").await?;

    let solvers = client
        .get_available_solvers(Request::new(Empty {}))
        .await?
        .into_inner()
        .solvers;
    println!("Available solvers:");
    for solver in &solvers {
        println!("  - {} (time limit: {})", solver.name, solver.supports_time_limit);
    }

    let request = mappers::domain_to_proto_request(
        &PackingConfig::default(),
        &RequestSettings {
            backend: SolverBackend::Auto,
            options: SolveOptions::default().with_time_limit(Duration::from_secs(30)),
            explicit_cell_capacity: false,
        },
    );

    let validation = client
        .validate_packing(Request::new(request.clone()))
        .await?
        .into_inner();
    println!(
        "\nModel: {} placement variables, {} coverage variables, {} constraints",
        validation.placement_variables, validation.coverage_variables, validation.num_constraints
    );

    let result = client.solve_packing(Request::new(request)).await?.into_inner();
    let status = SolutionStatus::try_from(result.status).unwrap_or(SolutionStatus::Undefined);
    println!("\nStatus: {:?}", status);
    if let Some(value) = result.objective_value {
        println!("Objective value: {}", value);
    }
    if !result.rows.is_empty() {
        println!("Grid:");
        for row in &result.rows {
            println!("  {}", row);
        }
    }
    for placed in &result.placements {
        println!(
            "  {} at ({}, {}) size {}x{}",
            placed.label, placed.row, placed.col, placed.width, placed.height
        );
    }
    if let Some(stats) = result.statistics {
        println!(
            "\nSolved by {} in {:.2} ms",
            stats.solver_backend, stats.solve_time_ms
        );
    }

    Ok(())
}
