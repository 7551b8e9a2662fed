//! Pipeline definitions that can be wrapped by visualization nodes.
//!
//! [`BaseVisualEntity`] is the capability contract; [`RouteEntity`] and
//! [`PipeEntity`] are the concrete variants backed by JSON documents.

pub mod contract;
pub mod document;
pub mod pipe;
pub mod processors;
pub mod resource;
pub mod route;

pub use contract::*;
pub use pipe::PipeEntity;
pub use resource::{IntoVisualEntity, entities_from_value, load_entities};
pub use route::RouteEntity;
