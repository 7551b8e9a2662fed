//! # Pipeviz - Pipeline Visualization Model
//!
//! **Pipeviz** turns integration pipeline definitions (routes and pipes) into an
//! addressable tree of visualization nodes, flattens those trees into a
//! node/edge model a graph surface can draw, and coordinates an editing session
//! on top of it.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Resources**: Parse a JSON resource list with [`entity::load_entities`],
//!     or implement [`entity::IntoVisualEntity`] for your own format.
//! 2.  **Convert**: Each entity builds its own node tree. Every node delegates labels,
//!     tooltips, schemas and mutations to the entity at the root of its tree.
//! 3.  **Diagram**: [`diagram::build_flow_diagrams`] walks the visible trees and emits
//!     sequence, branch and merge edges.
//! 4.  **Edit**: An [`canvas::EditorSession`] keeps track of the selection, applies
//!     edits to the selected step and re-renders.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pipeviz::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("resources.json")?;
//!     let entities = load_entities(&json)?;
//!
//!     let mut session = EditorSession::builder(entities)
//!         .with_layout(LayoutType::DagreVertical)
//!         .build()?;
//!
//!     let first = session.diagram().nodes[0].id.clone();
//!     session.handle_selection(&[first]);
//!     if let Some(interaction) = session.selected_interaction() {
//!         println!("Can append a step: {}", interaction.can_have_next_step);
//!     }
//!
//!     let log = DefinedComponent::new("log", CatalogKind::Processor);
//!     session.add_step(&log, AddStepMode::After)?;
//!
//!     println!("{}", serde_json::to_string_pretty(&session.graph_model())?);
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod diagram;
pub mod entity;
pub mod error;
pub mod prelude;
pub mod visualization;
