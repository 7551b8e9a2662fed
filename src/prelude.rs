//! Prelude module for convenient imports
//!
//! Re-exports the types needed to load resources, build diagrams and drive an
//! editing session.
//!
//! # Example
//!
//! ```rust,no_run
//! use pipeviz::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/resources.json")?;
//! let entities = load_entities(&json)?;
//!
//! let flows = entities
//!     .iter()
//!     .map(FlowVisualization::from_entity)
//!     .collect::<std::result::Result<Vec<_>, _>>()?;
//! let diagram = build_flow_diagrams(&flows, |_| true);
//! println!("{} nodes, {} edges", diagram.nodes.len(), diagram.edges.len());
//! # Ok(())
//! # }
//! ```

// Entities
pub use crate::entity::{
    AddStepMode, BaseVisualEntity, CatalogKind, DefinedComponent, EntityType, IntoVisualEntity,
    NodeInteraction, PipeEntity, RouteEntity, SharedEntity, VisualComponentSchema, load_entities,
};

// Visualization tree
pub use crate::visualization::{
    FlowVisualization, NodeData, NodeIndex, StepPath, TreeDisplay, VisualizationTree,
};

// Diagram
pub use crate::diagram::{
    DiagramEdge, DiagramNode, EdgeKind, FlowDiagram, GraphModel, LayoutType, build_flow_diagrams,
};

// Editing session
pub use crate::canvas::{CanvasSettings, EditorSession, VisibleFlows};

// Error types
pub use crate::error::{ConversionError, EditorError, EntityError, SettingsError, TreeError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
