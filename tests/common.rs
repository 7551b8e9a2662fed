//! Common test utilities for building resources, entities and trees.
use pipeviz::entity::{
    AddStepMode, AddStepRequest, BaseVisualEntity, EntityType, IntoVisualEntity,
    NodeInteraction, PipeEntity, RouteEntity, SharedEntity, VisualComponentSchema,
};
use pipeviz::error::{ConversionError, EntityError};
use pipeviz::visualization::{FlowVisualization, NodeData, NodeIndex, StepPath, VisualizationTree};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

/// A route with `steps` log processors after a timer endpoint.
///
/// Produces `steps + 1` nodes chained `from -> log -> log ...`.
#[allow(dead_code)]
pub fn linear_route(id: &str, steps: usize) -> Value {
    let steps: Vec<Value> = (0..steps)
        .map(|i| json!({ "log": { "message": format!("step {}", i) } }))
        .collect();
    json!({
        "route": {
            "id": id,
            "from": { "uri": "timer:tick", "steps": steps }
        }
    })
}

/// A route whose first step is a choice with two `when` branches and an
/// `otherwise`, followed by a final `to`.
///
/// ```text
/// from -> choice -> to(log:done)
///           |- when[0]   -> log(a)
///           |- when[1]   -> to(direct:b) -> log(b)
///           '- otherwise -> log(other)
/// ```
#[allow(dead_code)]
pub fn choice_route() -> Value {
    json!({
        "route": {
            "id": "route-choice",
            "from": {
                "uri": "timer:tick",
                "steps": [
                    {
                        "choice": {
                            "when": [
                                {
                                    "expression": "${header.a}",
                                    "steps": [ { "log": { "message": "a" } } ]
                                },
                                {
                                    "expression": "${header.b}",
                                    "steps": [
                                        { "to": { "uri": "direct:b" } },
                                        { "log": { "message": "b" } }
                                    ]
                                }
                            ],
                            "otherwise": {
                                "steps": [ { "log": { "message": "other" } } ]
                            }
                        }
                    },
                    { "to": { "uri": "log:done" } }
                ]
            }
        }
    })
}

/// A pipe `timer-source -> log-action -> log:out`.
#[allow(dead_code)]
pub fn simple_pipe() -> Value {
    json!({
        "pipe": {
            "metadata": { "name": "pipe-orders" },
            "spec": {
                "source": { "ref": { "kind": "Kamelet", "name": "timer-source" } },
                "steps": [ { "ref": { "kind": "Kamelet", "name": "log-action" } } ],
                "sink": { "uri": "log:out" }
            }
        }
    })
}

/// Wraps a resource value into a shared entity.
#[allow(dead_code)]
pub fn entity(resource: Value) -> SharedEntity {
    resource
        .into_visual_entity()
        .expect("fixture resource should convert")
}

/// A route entity kept concrete so tests can inspect its document.
#[allow(dead_code)]
pub fn route_entity(resource: Value) -> Rc<RefCell<RouteEntity>> {
    let definition = resource["route"].clone();
    Rc::new(RefCell::new(
        RouteEntity::new(definition).expect("fixture route should be valid"),
    ))
}

#[allow(dead_code)]
pub fn pipe_entity(resource: Value) -> Rc<RefCell<PipeEntity>> {
    let definition = resource["pipe"].clone();
    Rc::new(RefCell::new(
        PipeEntity::new(definition).expect("fixture pipe should be valid"),
    ))
}

/// Finds the node of a flow sitting at `path`.
#[allow(dead_code)]
pub fn node_at(flow: &FlowVisualization, path: &str) -> NodeIndex {
    let path: StepPath = path.parse().expect("paths always parse");
    flow.tree
        .iter()
        .find(|(_, node)| *node.path() == path)
        .map(|(index, _)| index)
        .unwrap_or_else(|| panic!("no node at path '{}'", path))
}

/// An entity that answers every query with fixed values and records removals.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MockEntity {
    pub removed: Vec<String>,
    pub added: Vec<(String, AddStepMode, String)>,
}

impl BaseVisualEntity for MockEntity {
    fn id(&self) -> &str {
        "mock"
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Route
    }

    fn node_label(&self, _path: &StepPath) -> String {
        "foo".to_string()
    }

    fn tooltip_content(&self, _path: &StepPath) -> String {
        "foo tooltip".to_string()
    }

    fn component_schema(&self, _path: &StepPath) -> Option<VisualComponentSchema> {
        None
    }

    fn node_validation_text(&self, _path: &StepPath) -> Option<String> {
        Some("always invalid".to_string())
    }

    fn node_interaction(&self, _data: &NodeData) -> NodeInteraction {
        NodeInteraction {
            can_have_previous_step: true,
            can_have_next_step: true,
            can_have_children: false,
            can_have_special_children: false,
        }
    }

    fn add_step(&mut self, request: AddStepRequest<'_>) -> Result<(), EntityError> {
        self.added.push((
            request.definition.name.clone(),
            request.mode,
            request.data.path.to_string(),
        ));
        Ok(())
    }

    fn remove_step(&mut self, path: &StepPath) -> Result<(), EntityError> {
        self.removed.push(path.to_string());
        Ok(())
    }

    fn update_model(&mut self, _path: &StepPath, _value: Value) -> Result<(), EntityError> {
        Ok(())
    }

    fn to_viz_node(&self, tree: &mut VisualizationTree) -> Result<NodeIndex, ConversionError> {
        Ok(tree.create_node("mock", NodeData::new(StepPath::new().key("mock"))))
    }
}

/// Creates a detached node labelled `label` at the path `label`.
#[allow(dead_code)]
pub fn plain_node(tree: &mut VisualizationTree, label: &str) -> NodeIndex {
    tree.create_node(label, NodeData::new(StepPath::new().key(label)))
}
