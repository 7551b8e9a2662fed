use super::path::StepPath;
use crate::entity::SharedEntity;
use std::fmt;

/// Handle to a node inside a [`super::VisualizationTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload carried by every visualization node.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// Location of the step inside the owning entity's document.
    pub path: StepPath,
    /// Owning entity. Only set on the root node of a tree.
    pub entity: Option<SharedEntity>,
}

impl NodeData {
    pub fn new(path: StepPath) -> Self {
        Self { path, entity: None }
    }

    pub fn with_entity(path: StepPath, entity: SharedEntity) -> Self {
        Self {
            path,
            entity: Some(entity),
        }
    }
}

/// A single addressable node of the visualization tree.
///
/// Links are plain arena handles; the setters on the tree do not validate them.
#[derive(Debug, Clone)]
pub struct VisualizationNode {
    pub(crate) id: String,
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) previous: Option<NodeIndex>,
    pub(crate) next: Option<NodeIndex>,
    pub(crate) children: Option<Vec<NodeIndex>>,
}

impl VisualizationNode {
    pub(crate) fn new(id: String, data: NodeData) -> Self {
        Self {
            id,
            data,
            parent: None,
            previous: None,
            next: None,
            children: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }

    pub fn path(&self) -> &StepPath {
        &self.data.path
    }

    /// The entity attached to this node's own payload. Does not walk to the root.
    pub fn base_entity(&self) -> Option<&SharedEntity> {
        self.data.entity.as_ref()
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn previous(&self) -> Option<NodeIndex> {
        self.previous
    }

    pub fn next(&self) -> Option<NodeIndex> {
        self.next
    }

    /// `None` means children do not apply to this node; `Some(&[])` is a
    /// branch construct that currently has no branches.
    pub fn children(&self) -> Option<&[NodeIndex]> {
        self.children.as_deref()
    }

    /// True when the children list has been assigned, even if it is empty.
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}
