use super::model::{DiagramEdge, DiagramNode, EdgeKind, FlowDiagram};
use crate::visualization::{FlowVisualization, NodeIndex, VisualizationTree};
use ahash::AHashSet;
use tracing::{debug, warn};

/// Walks one visualization tree and produces its flat rendering model.
///
/// Every diagram id is derived from a node id, so rebuilding the same tree
/// yields the same diagram.
pub struct DiagramBuilder<'a> {
    tree: &'a VisualizationTree,
    flow_id: &'a str,
    diagram: FlowDiagram,
    visited: AHashSet<NodeIndex>,
}

impl<'a> DiagramBuilder<'a> {
    pub fn new(tree: &'a VisualizationTree, flow_id: &'a str) -> Self {
        Self {
            tree,
            flow_id,
            diagram: FlowDiagram::default(),
            visited: AHashSet::new(),
        }
    }

    pub fn build(mut self, root: NodeIndex) -> FlowDiagram {
        self.append_chain(root);
        debug!(
            flow = self.flow_id,
            nodes = self.diagram.nodes.len(),
            edges = self.diagram.edges.len(),
            "Built flow diagram"
        );
        self.diagram
    }

    /// Emits `head` and every node after it, descending into children on the way.
    fn append_chain(&mut self, head: NodeIndex) {
        let tree = self.tree;
        let mut current = Some(head);
        while let Some(index) = current {
            if !self.visited.insert(index) {
                warn!(
                    flow = self.flow_id,
                    node = tree.node(index).id(),
                    "Node reached twice while building diagram, skipping"
                );
                return;
            }
            let node = tree.node(index);
            let diagram_node = self.diagram_node(index);
            self.diagram.nodes.push(diagram_node);

            match node.children() {
                Some(children) if !children.is_empty() => {
                    for child in children {
                        let child_id = tree.node(*child).id();
                        self.push_edge(node.id(), child_id, EdgeKind::Branch);
                        if let Some(next) = node.next() {
                            let next_id = tree.node(next).id();
                            for exit in self.branch_exits(*child) {
                                self.push_edge(tree.node(exit).id(), next_id, EdgeKind::Merge);
                            }
                        }
                        self.append_chain(*child);
                    }
                }
                // No branches to route through: connect straight to the next step.
                _ => {
                    if let Some(next) = node.next() {
                        self.push_edge(node.id(), tree.node(next).id(), EdgeKind::Sequence);
                    }
                }
            }
            current = node.next();
        }
    }

    fn push_edge(&mut self, source: &str, target: &str, kind: EdgeKind) {
        self.diagram
            .edges
            .push(DiagramEdge::new(source, target, kind));
    }

    fn diagram_node(&self, index: NodeIndex) -> DiagramNode {
        let node = self.tree.node(index);
        DiagramNode {
            id: node.id().to_string(),
            node_type: "node".to_string(),
            label: self.tree.node_label(index),
            flow_id: self.flow_id.to_string(),
            parent_id: self
                .branch_owner(index)
                .map(|owner| self.tree.node(owner).id().to_string()),
        }
    }

    /// The node whose children list holds the chain `index` belongs to.
    fn branch_owner(&self, index: NodeIndex) -> Option<NodeIndex> {
        let mut current = index;
        for _ in 0..self.tree.len() {
            match self.tree.node(current).previous() {
                Some(previous) => current = previous,
                None => break,
            }
        }
        self.tree.node(current).parent()
    }

    /// Terminal nodes of the branch starting at `head`.
    ///
    /// Follows the chain to its tail; a tail that branches again contributes the
    /// exits of its own branches. A tail with an empty children list is itself an exit.
    fn branch_exits(&self, head: NodeIndex) -> Vec<NodeIndex> {
        let mut exits = Vec::new();
        let mut seen = AHashSet::new();
        self.collect_exits(head, &mut exits, &mut seen);
        exits
    }

    fn collect_exits(
        &self,
        head: NodeIndex,
        exits: &mut Vec<NodeIndex>,
        seen: &mut AHashSet<NodeIndex>,
    ) {
        if !seen.insert(head) {
            return;
        }
        let tail = self.tree.chain_tail(head);
        match self.tree.node(tail).children() {
            Some(children) if !children.is_empty() => {
                for child in children {
                    self.collect_exits(*child, exits, seen);
                }
            }
            _ => exits.push(tail),
        }
    }
}

/// Builds one diagram per visible flow and concatenates them in flow order.
///
/// Hidden flows contribute nothing; the flows themselves are not modified.
pub fn build_flow_diagrams<'a, I, F>(flows: I, is_visible: F) -> FlowDiagram
where
    I: IntoIterator<Item = &'a FlowVisualization>,
    F: Fn(&str) -> bool,
{
    let mut diagram = FlowDiagram::default();
    for flow in flows {
        if !is_visible(&flow.flow_id) {
            continue;
        }
        let flow_diagram = DiagramBuilder::new(&flow.tree, &flow.flow_id).build(flow.root);
        diagram.append(flow_diagram);
    }
    diagram
}
