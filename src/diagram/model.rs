use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout algorithms understood by the rendering surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutType {
    #[default]
    DagreHorizontal,
    DagreVertical,
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutType::DagreHorizontal => write!(f, "DagreHorizontal"),
            LayoutType::DagreVertical => write!(f, "DagreVertical"),
        }
    }
}

/// A drawable node. Its id is the visualization node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub label: String,
    pub flow_id: String,
    /// Id of the branching node owning this node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// What a drawable edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// `previous -> next` inside one chain.
    Sequence,
    /// Branching node to the head of one of its children.
    Branch,
    /// Exit of a branch back into the step that follows the branching node.
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl DiagramEdge {
    pub fn new(source: &str, target: &str, kind: EdgeKind) -> Self {
        Self {
            id: format!("{} >>> {}", source, target),
            edge_type: "edge".to_string(),
            source: source.to_string(),
            target: target.to_string(),
            kind,
        }
    }
}

/// Flat rendering model: nodes plus the edges connecting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDiagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl FlowDiagram {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn append(&mut self, other: FlowDiagram) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }
}

/// Graph settings handed to the rendering surface alongside the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSettings {
    pub id: String,
    #[serde(rename = "type")]
    pub graph_type: String,
    pub layout: LayoutType,
    pub fit_padding: u32,
}

/// The complete, serializable payload for the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub graph: GraphSettings,
}
