//! The visualization node tree: addressable nodes mirroring a pipeline definition.

pub mod flow;
pub mod formatter;
pub mod id;
pub mod node;
pub mod path;
pub mod tree;

pub use flow::FlowVisualization;
pub use formatter::TreeDisplay;
pub use id::generate_id;
pub use node::{NodeData, NodeIndex, VisualizationNode};
pub use path::{PathSegment, StepPath};
pub use tree::{NodeRef, VisualizationTree};
