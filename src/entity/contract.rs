use crate::error::{ConversionError, EntityError};
use crate::visualization::{NodeData, NodeIndex, StepPath, VisualizationTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to an entity. The editor is single-threaded, so `Rc<RefCell<_>>`.
pub type SharedEntity = Rc<RefCell<dyn BaseVisualEntity>>;

/// The concrete pipeline-definition variants that can be visualized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Route,
    Pipe,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Route => write!(f, "route"),
            EntityType::Pipe => write!(f, "pipe"),
        }
    }
}

/// Where a new step goes relative to the anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddStepMode {
    /// Before the anchor, in the same chain.
    Before,
    /// After the anchor, in the same chain.
    After,
    /// As a child (nested steps or a new branch) of the anchor.
    Child,
    /// As the special branch (e.g. `otherwise`) of the anchor.
    SpecialChild,
}

impl fmt::Display for AddStepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AddStepMode::Before => "before",
            AddStepMode::After => "after",
            AddStepMode::Child => "as a child of",
            AddStepMode::SpecialChild => "as a special child of",
        };
        write!(f, "{}", text)
    }
}

/// Catalog families a step definition can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogKind {
    Component,
    Processor,
    Kamelet,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Component => write!(f, "component"),
            CatalogKind::Processor => write!(f, "processor"),
            CatalogKind::Kamelet => write!(f, "kamelet"),
        }
    }
}

/// A catalog entry selected by the user to be inserted into a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinedComponent {
    pub name: String,
    pub kind: CatalogKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DefinedComponent {
    pub fn new(name: &str, kind: CatalogKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            title: None,
            description: None,
        }
    }
}

/// Everything an entity needs to insert a step.
#[derive(Debug, Clone, Copy)]
pub struct AddStepRequest<'a> {
    pub definition: &'a DefinedComponent,
    pub mode: AddStepMode,
    /// Payload of the anchor node; its `path` locates the insertion point.
    pub data: &'a NodeData,
}

/// Structural edits currently legal at a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInteraction {
    pub can_have_previous_step: bool,
    pub can_have_next_step: bool,
    pub can_have_children: bool,
    pub can_have_special_children: bool,
}

/// Editable-property schema of a step, plus its current values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualComponentSchema {
    pub title: String,
    pub schema: Value,
    pub definition: Value,
}

/// Capabilities a pipeline definition must offer to be wrapped by visualization nodes.
///
/// Every method receives a [`StepPath`] produced by the same entity's
/// [`BaseVisualEntity::to_viz_node`], so paths must resolve consistently
/// across calls until the tree is rebuilt.
pub trait BaseVisualEntity: fmt::Debug {
    fn id(&self) -> &str;

    fn entity_type(&self) -> EntityType;

    fn node_label(&self, path: &StepPath) -> String;

    fn tooltip_content(&self, path: &StepPath) -> String;

    fn component_schema(&self, path: &StepPath) -> Option<VisualComponentSchema>;

    fn node_validation_text(&self, path: &StepPath) -> Option<String>;

    fn node_interaction(&self, data: &NodeData) -> NodeInteraction;

    fn add_step(&mut self, request: AddStepRequest<'_>) -> Result<(), EntityError>;

    /// Removing a path that no longer resolves is a no-op.
    fn remove_step(&mut self, path: &StepPath) -> Result<(), EntityError>;

    fn update_model(&mut self, path: &StepPath, value: Value) -> Result<(), EntityError>;

    /// Builds the node structure of this entity inside `tree` and returns its root.
    fn to_viz_node(&self, tree: &mut VisualizationTree) -> Result<NodeIndex, ConversionError>;
}
