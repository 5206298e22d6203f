// gRPC stubs for the `server` feature.
// Messages are declared by hand with prost derives in `application::mappers`,
// so only the service plumbing is generated here and protoc is not needed.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    if std::env::var_os("CARGO_FEATURE_SERVER").is_none() {
        return;
    }

    let method = |name: &str, route: &str, input: &str, output: &str| {
        tonic_build::manual::Method::builder()
            .name(name)
            .route_name(route)
            .input_type(format!("crate::application::mappers::packing_proto::{}", input))
            .output_type(format!("crate::application::mappers::packing_proto::{}", output))
            .codec_path("tonic::codec::ProstCodec")
            .build()
    };

    let service = tonic_build::manual::Service::builder()
        .name("PackingSolver")
        .package("binpack")
        .method(method(
            "solve_packing",
            "SolvePacking",
            "SolvePackingRequest",
            "SolvePackingResponse",
        ))
        .method(method(
            "validate_packing",
            "ValidatePacking",
            "SolvePackingRequest",
            "ValidatePackingResponse",
        ))
        .method(method(
            "get_available_solvers",
            "GetAvailableSolvers",
            "Empty",
            "AvailableSolvers",
        ))
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
