//! Flat node/edge rendering model built from visualization trees.

pub mod builder;
pub mod model;

pub use builder::{DiagramBuilder, build_flow_diagrams};
pub use model::*;
