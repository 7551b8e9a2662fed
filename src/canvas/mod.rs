//! Editing session over a set of flows: selection, visibility, layout and
//! re-rendering after every edit.

pub mod session;
pub mod settings;
pub mod visible_flows;

pub use session::{EditorSession, EditorSessionBuilder};
pub use settings::{CanvasSettings, DEFAULT_FIT_PADDING, DEFAULT_GRAPH_ID};
pub use visible_flows::VisibleFlows;
