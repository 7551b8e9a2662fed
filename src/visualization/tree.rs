use super::id::generate_id;
use super::node::{NodeData, NodeIndex, VisualizationNode};
use crate::entity::{
    AddStepMode, AddStepRequest, DefinedComponent, NodeInteraction, SharedEntity,
    VisualComponentSchema,
};
use crate::error::{EntityError, TreeError};
use ahash::AHashMap;
use serde_json::Value;
use tracing::debug;

/// Arena owning every node produced for one flow.
///
/// All navigation and root-delegated behavior lives here and is addressed by
/// [`NodeIndex`]. Nodes never own each other, so unlinking cannot leave
/// reference cycles behind.
#[derive(Debug, Default)]
pub struct VisualizationTree {
    nodes: Vec<VisualizationNode>,
    ids: AHashMap<String, NodeIndex>,
}

impl VisualizationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node whose id is derived from `label`.
    pub fn create_node(&mut self, label: &str, data: NodeData) -> NodeIndex {
        let mut id = generate_id(label);
        while self.ids.contains_key(&id) {
            id = generate_id(label);
        }
        let index = NodeIndex(self.nodes.len());
        self.ids.insert(id.clone(), index);
        self.nodes.push(VisualizationNode::new(id, data));
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: NodeIndex) -> &VisualizationNode {
        &self.nodes[index.0]
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> &mut VisualizationNode {
        &mut self.nodes[index.0]
    }

    pub fn get(&self, index: NodeIndex) -> Option<&VisualizationNode> {
        self.nodes.get(index.0)
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &VisualizationNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    pub fn node_ref(&self, index: NodeIndex) -> NodeRef<'_> {
        NodeRef { tree: self, index }
    }

    // --- Structural accessors ---

    pub fn parent_node(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).parent
    }

    pub fn set_parent_node(&mut self, index: NodeIndex, parent: Option<NodeIndex>) {
        self.node_mut(index).parent = parent;
    }

    pub fn previous_node(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).previous
    }

    pub fn set_previous_node(&mut self, index: NodeIndex, previous: Option<NodeIndex>) {
        self.node_mut(index).previous = previous;
    }

    pub fn next_node(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).next
    }

    pub fn set_next_node(&mut self, index: NodeIndex, next: Option<NodeIndex>) {
        self.node_mut(index).next = next;
    }

    pub fn children(&self, index: NodeIndex) -> Option<&[NodeIndex]> {
        self.node(index).children()
    }

    pub fn set_children(&mut self, index: NodeIndex, children: Option<Vec<NodeIndex>>) {
        self.node_mut(index).children = children;
    }

    /// Appends `child` to the children of `parent` and points it back at `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.node_mut(parent)
            .children
            .get_or_insert_with(Vec::new)
            .push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Links `previous -> next` in both directions.
    pub fn link(&mut self, previous: NodeIndex, next: NodeIndex) {
        self.node_mut(previous).next = Some(next);
        self.node_mut(next).previous = Some(previous);
    }

    /// Follows `next` links from `index` to the last node of the chain.
    pub fn chain_tail(&self, index: NodeIndex) -> NodeIndex {
        let mut current = index;
        for _ in 0..self.nodes.len() {
            match self.node(current).next {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    // --- Root resolution ---

    /// Walks `previous` first, then `parent`, until a node with neither is found.
    pub fn try_root_node(&self, index: NodeIndex) -> Result<NodeIndex, TreeError> {
        let mut current = index;
        // An acyclic walk visits each node at most once.
        for _ in 0..=self.nodes.len() {
            let node = self.node(current);
            match node.previous.or(node.parent) {
                Some(up) => current = up,
                None => return Ok(current),
            }
        }
        Err(TreeError::CycleDetected {
            node_id: self.node(index).id.clone(),
        })
    }

    /// Like [`Self::try_root_node`], but a cycle is treated as a bug.
    ///
    /// # Panics
    ///
    /// Panics when the structure contains a previous/parent cycle.
    pub fn root_node(&self, index: NodeIndex) -> NodeIndex {
        match self.try_root_node(index) {
            Ok(root) => root,
            Err(err) => panic!("malformed visualization tree: {}", err),
        }
    }

    /// The entity attached to the node's own payload, without traversal.
    pub fn base_entity(&self, index: NodeIndex) -> Option<&SharedEntity> {
        self.node(index).base_entity()
    }

    /// The entity owning the whole flow, reached through the root node.
    pub fn root_entity(&self, index: NodeIndex) -> Option<SharedEntity> {
        let root = self.try_root_node(index).ok()?;
        self.base_entity(root).cloned()
    }

    // --- Root-delegated behavior ---

    pub fn node_label(&self, index: NodeIndex) -> String {
        let node = self.node(index);
        self.root_entity(index)
            .map(|entity| entity.borrow().node_label(&node.data.path))
            .unwrap_or_else(|| node.id.clone())
    }

    pub fn tooltip_content(&self, index: NodeIndex) -> String {
        let node = self.node(index);
        self.root_entity(index)
            .map(|entity| entity.borrow().tooltip_content(&node.data.path))
            .unwrap_or_else(|| node.id.clone())
    }

    pub fn node_validation_text(&self, index: NodeIndex) -> Option<String> {
        self.root_entity(index)
            .and_then(|entity| entity.borrow().node_validation_text(&self.node(index).data.path))
    }

    pub fn component_schema(&self, index: NodeIndex) -> Option<VisualComponentSchema> {
        self.root_entity(index)
            .and_then(|entity| entity.borrow().component_schema(&self.node(index).data.path))
    }

    /// Structural edits allowed at this node. Fully restrictive without an entity.
    pub fn node_interaction(&self, index: NodeIndex) -> NodeInteraction {
        self.root_entity(index)
            .map(|entity| entity.borrow().node_interaction(&self.node(index).data))
            .unwrap_or_default()
    }

    /// Asks the owning entity to insert a step relative to this node.
    ///
    /// The tree itself is left untouched; callers rebuild it afterwards.
    pub fn add_step(
        &self,
        index: NodeIndex,
        definition: &DefinedComponent,
        mode: AddStepMode,
    ) -> Result<(), EntityError> {
        let Some(entity) = self.root_entity(index) else {
            debug!(node = %self.node(index).id, "add_step ignored, no owning entity");
            return Ok(());
        };
        let request = AddStepRequest {
            definition,
            mode,
            data: &self.node(index).data,
        };
        entity.borrow_mut().add_step(request)
    }

    pub fn update_model(&self, index: NodeIndex, value: Value) -> Result<(), EntityError> {
        let Some(entity) = self.root_entity(index) else {
            debug!(node = %self.node(index).id, "update_model ignored, no owning entity");
            return Ok(());
        };
        entity
            .borrow_mut()
            .update_model(&self.node(index).data.path, value)
    }

    /// Deletes the step from the owning entity and detaches the node from its parent.
    ///
    /// Chain (previous/next) removal is left to the entity's document mutation.
    pub fn remove_step(&mut self, index: NodeIndex) -> Result<(), EntityError> {
        if let Some(entity) = self.root_entity(index) {
            entity
                .borrow_mut()
                .remove_step(&self.node(index).data.path)?;
        }

        let Some(parent) = self.node(index).parent else {
            return Ok(());
        };
        let id = self.node(index).id.clone();
        let position = self
            .node(parent)
            .children()
            .and_then(|children| children.iter().position(|c| self.node(*c).id == id));
        if let Some(position) = position {
            if let Some(children) = self.node_mut(parent).children.as_mut() {
                children.remove(position);
            }
            self.node_mut(index).parent = None;
        }
        Ok(())
    }

    /// Collects the ids of the terminal nodes reachable through `children`.
    ///
    /// A node is a leaf when it has neither a `next` node nor a children list.
    /// An assigned but empty children list is not a leaf and contributes nothing.
    pub fn populate_leaf_nodes_ids(&self, index: NodeIndex, ids: &mut Vec<String>) {
        let node = self.node(index);
        match node.children() {
            None if node.next.is_none() => ids.push(node.id.clone()),
            None => {}
            Some(children) => {
                for child in children {
                    self.populate_leaf_nodes_ids(*child, ids);
                }
            }
        }
    }
}

/// Borrowed view over one node, convenient for inspector-style read access.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a VisualizationTree,
    index: NodeIndex,
}

impl<'a> NodeRef<'a> {
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn node(&self) -> &'a VisualizationNode {
        self.tree.node(self.index)
    }

    pub fn id(&self) -> &'a str {
        self.tree.node(self.index).id()
    }

    pub fn label(&self) -> String {
        self.tree.node_label(self.index)
    }

    pub fn tooltip(&self) -> String {
        self.tree.tooltip_content(self.index)
    }

    pub fn validation_text(&self) -> Option<String> {
        self.tree.node_validation_text(self.index)
    }

    pub fn schema(&self) -> Option<VisualComponentSchema> {
        self.tree.component_schema(self.index)
    }

    pub fn interaction(&self) -> NodeInteraction {
        self.tree.node_interaction(self.index)
    }
}
