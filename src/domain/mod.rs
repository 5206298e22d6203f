// Domain module: packing data model and the solver contract

pub mod grid;
pub mod models;
pub mod packing;
pub mod placement;
pub mod solver_service;
pub mod value_objects;

pub use grid::*;
pub use models::*;
pub use packing::*;
pub use placement::*;
pub use solver_service::*;
pub use value_objects::*;
