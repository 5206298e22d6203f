// Mappers: convert between gRPC messages and domain models
// Keeps protobuf types out of the packing logic

use super::packing_service::{ModelSummary, PackingOutcome};
use crate::domain::{
    models::SolverStatistics,
    packing::{ItemConfig, PackingConfig},
    value_objects::{SolutionStatus, SolverBackend},
};
use crate::solver::SolveOptions;
use std::time::Duration;
use tracing::warn;

/// Wire messages of the `binpack.PackingSolver` service
pub mod packing_proto {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum SolutionStatus {
        Undefined = 0,
        Optimal = 1,
        Infeasible = 2,
        Unbounded = 3,
        NotSolved = 4,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum SolverBackend {
        Auto = 0,
        Highs = 1,
        CoinCbc = 2,
        MicroLp = 3,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PackingItem {
        #[prost(int64, tag = "1")]
        pub width: i64,
        #[prost(int64, tag = "2")]
        pub height: i64,
        #[prost(int64, tag = "3")]
        pub count: i64,
        #[prost(double, tag = "4")]
        pub unit_cost: f64,
        #[prost(string, tag = "5")]
        pub name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SolvePackingRequest {
        #[prost(int64, tag = "1")]
        pub bin_width: i64,
        #[prost(int64, tag = "2")]
        pub bin_height: i64,
        #[prost(message, repeated, tag = "3")]
        pub items: ::prost::alloc::vec::Vec<PackingItem>,
        #[prost(double, tag = "4")]
        pub reward: f64,
        #[prost(double, tag = "5")]
        pub penalty: f64,
        #[prost(enumeration = "SolverBackend", tag = "6")]
        pub backend: i32,
        /// Zero or negative means no limit
        #[prost(double, tag = "7")]
        pub time_limit_seconds: f64,
        #[prost(bool, tag = "8")]
        pub explicit_cell_capacity: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PlacedItem {
        #[prost(uint32, tag = "1")]
        pub item_type: u32,
        #[prost(string, tag = "2")]
        pub label: ::prost::alloc::string::String,
        #[prost(uint32, tag = "3")]
        pub row: u32,
        #[prost(uint32, tag = "4")]
        pub col: u32,
        #[prost(uint32, tag = "5")]
        pub width: u32,
        #[prost(uint32, tag = "6")]
        pub height: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SolverStatistics {
        #[prost(double, tag = "1")]
        pub solve_time_ms: f64,
        #[prost(uint32, tag = "2")]
        pub num_variables: u32,
        #[prost(uint32, tag = "3")]
        pub num_constraints: u32,
        #[prost(string, tag = "5")]
        pub solver_backend: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SolvePackingResponse {
        #[prost(enumeration = "SolutionStatus", tag = "1")]
        pub status: i32,
        #[prost(double, optional, tag = "2")]
        pub objective_value: ::core::option::Option<f64>,
        /// Label grid, one string per row, `.` for empty cells
        #[prost(string, repeated, tag = "3")]
        pub rows: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        #[prost(message, repeated, tag = "4")]
        pub placements: ::prost::alloc::vec::Vec<PlacedItem>,
        #[prost(string, tag = "5")]
        pub message: ::prost::alloc::string::String,
        #[prost(message, optional, tag = "6")]
        pub statistics: ::core::option::Option<SolverStatistics>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ValidatePackingResponse {
        #[prost(bool, tag = "1")]
        pub is_valid: bool,
        #[prost(string, repeated, tag = "2")]
        pub errors: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        #[prost(string, repeated, tag = "3")]
        pub warnings: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        #[prost(uint32, tag = "4")]
        pub placement_variables: u32,
        #[prost(uint32, tag = "5")]
        pub coverage_variables: u32,
        #[prost(uint32, tag = "6")]
        pub num_constraints: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Empty {}

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SolverInfo {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
        #[prost(enumeration = "SolverBackend", tag = "2")]
        pub backend: i32,
        #[prost(bool, tag = "3")]
        pub supports_time_limit: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct AvailableSolvers {
        #[prost(message, repeated, tag = "1")]
        pub solvers: ::prost::alloc::vec::Vec<SolverInfo>,
    }

    #[cfg(feature = "server")]
    include!(concat!(env!("OUT_DIR"), "/binpack.PackingSolver.rs"));
}

use packing_proto as proto;

/// Solver-side settings carried by a request
#[derive(Debug, Clone)]
pub struct RequestSettings {
    pub backend: SolverBackend,
    pub options: SolveOptions,
    pub explicit_cell_capacity: bool,
}

/// Convert a request into the raw packing configuration
pub fn proto_to_domain_config(request: &proto::SolvePackingRequest) -> PackingConfig {
    PackingConfig {
        bin_width: request.bin_width,
        bin_height: request.bin_height,
        items: request
            .items
            .iter()
            .map(|item| ItemConfig {
                name: (!item.name.is_empty()).then(|| item.name.clone()),
                width: item.width,
                height: item.height,
                count: item.count,
                unit_cost: item.unit_cost,
            })
            .collect(),
        reward: request.reward,
        penalty: request.penalty,
    }
}

/// Convert a raw packing configuration into a request
pub fn domain_to_proto_request(
    config: &PackingConfig,
    settings: &RequestSettings,
) -> proto::SolvePackingRequest {
    proto::SolvePackingRequest {
        bin_width: config.bin_width,
        bin_height: config.bin_height,
        items: config
            .items
            .iter()
            .map(|item| proto::PackingItem {
                width: item.width,
                height: item.height,
                count: item.count,
                unit_cost: item.unit_cost,
                name: item.name.clone().unwrap_or_default(),
            })
            .collect(),
        reward: config.reward,
        penalty: config.penalty,
        backend: domain_to_proto_backend(settings.backend) as i32,
        time_limit_seconds: settings
            .options
            .time_limit
            .map_or(0.0, |limit| limit.as_secs_f64()),
        explicit_cell_capacity: settings.explicit_cell_capacity,
    }
}

/// Backend, time limit and model switches of a request
pub fn proto_to_request_settings(request: &proto::SolvePackingRequest) -> RequestSettings {
    let backend = match proto::SolverBackend::try_from(request.backend) {
        Ok(proto::SolverBackend::Auto) | Err(_) => SolverBackend::Auto,
        Ok(proto::SolverBackend::Highs) => SolverBackend::Highs,
        Ok(proto::SolverBackend::CoinCbc) => SolverBackend::CoinCbc,
        Ok(proto::SolverBackend::MicroLp) => SolverBackend::MicroLp,
    };

    // a limit no Duration can hold is no limit at all
    let mut options = SolveOptions::default();
    if request.time_limit_seconds > 0.0 {
        match Duration::try_from_secs_f64(request.time_limit_seconds) {
            Ok(limit) => options = options.with_time_limit(limit),
            Err(_) => warn!(
                seconds = request.time_limit_seconds,
                "time limit out of range; solving without one"
            ),
        }
    }

    RequestSettings {
        backend,
        options,
        explicit_cell_capacity: request.explicit_cell_capacity,
    }
}

pub fn domain_to_proto_backend(backend: SolverBackend) -> proto::SolverBackend {
    match backend {
        SolverBackend::Auto => proto::SolverBackend::Auto,
        SolverBackend::Highs => proto::SolverBackend::Highs,
        SolverBackend::CoinCbc => proto::SolverBackend::CoinCbc,
        SolverBackend::MicroLp => proto::SolverBackend::MicroLp,
    }
}

pub fn domain_to_proto_status(status: SolutionStatus) -> proto::SolutionStatus {
    match status {
        SolutionStatus::Optimal => proto::SolutionStatus::Optimal,
        SolutionStatus::Infeasible => proto::SolutionStatus::Infeasible,
        SolutionStatus::Unbounded => proto::SolutionStatus::Unbounded,
        SolutionStatus::NotSolved => proto::SolutionStatus::NotSolved,
        SolutionStatus::Undefined => proto::SolutionStatus::Undefined,
    }
}

fn domain_to_proto_statistics(
    statistics: &SolverStatistics,
    solver_name: &str,
) -> proto::SolverStatistics {
    proto::SolverStatistics {
        solve_time_ms: statistics.solve_time_ms,
        num_variables: statistics.num_variables,
        num_constraints: statistics.num_constraints,
        solver_backend: solver_name.to_string(),
    }
}

/// Convert a packing outcome to the response message
pub fn domain_to_proto_outcome(
    outcome: PackingOutcome,
    solver_name: &str,
) -> proto::SolvePackingResponse {
    let (rows, placements) = match &outcome.grid {
        Some(grid) => (
            grid.label_rows(),
            grid.placed()
                .iter()
                .map(|p| proto::PlacedItem {
                    item_type: p.item.index() as u32,
                    label: p.item.label(),
                    row: p.row as u32,
                    col: p.col as u32,
                    width: p.width as u32,
                    height: p.height as u32,
                })
                .collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    proto::SolvePackingResponse {
        status: domain_to_proto_status(outcome.status) as i32,
        objective_value: outcome.objective_value,
        rows,
        placements,
        statistics: Some(domain_to_proto_statistics(&outcome.statistics, solver_name)),
        message: outcome.message,
    }
}

/// Convert a model summary to the validation response
pub fn domain_to_proto_summary(summary: &ModelSummary) -> proto::ValidatePackingResponse {
    let warnings = summary
        .unplaceable_items
        .iter()
        .map(|id| format!("Item type {} does not fit in the bin and will never be placed", id))
        .collect();

    proto::ValidatePackingResponse {
        is_valid: true,
        errors: Vec::new(),
        warnings,
        placement_variables: summary.placement_variables as u32,
        coverage_variables: summary.coverage_variables as u32,
        num_constraints: summary.constraints as u32,
    }
}
