use super::node::{NodeData, NodeIndex};
use super::tree::VisualizationTree;
use crate::entity::SharedEntity;
use crate::error::ConversionError;
use std::rc::Rc;

/// The node tree of one flow together with its root.
#[derive(Debug)]
pub struct FlowVisualization {
    pub flow_id: String,
    pub tree: VisualizationTree,
    pub root: NodeIndex,
}

impl FlowVisualization {
    /// Converts `entity` into a fresh tree and attaches the entity to the root payload.
    pub fn from_entity(entity: &SharedEntity) -> Result<Self, ConversionError> {
        let mut tree = VisualizationTree::new();
        let (flow_id, root) = {
            let borrowed = entity.borrow();
            (borrowed.id().to_string(), borrowed.to_viz_node(&mut tree)?)
        };
        let path = tree.node(root).path().clone();
        *tree.node_mut(root).data_mut() = NodeData::with_entity(path, Rc::clone(entity));
        Ok(Self {
            flow_id,
            tree,
            root,
        })
    }

    pub fn entity(&self) -> Option<&SharedEntity> {
        self.tree.base_entity(self.root)
    }
}
