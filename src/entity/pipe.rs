use super::contract::{
    AddStepMode, AddStepRequest, BaseVisualEntity, CatalogKind, EntityType, NodeInteraction,
    VisualComponentSchema,
};
use super::document::{self, insert_into_array, replace_properties, str_prop};
use crate::error::{ConversionError, EntityError};
use crate::visualization::{
    NodeData, NodeIndex, PathSegment, StepPath, VisualizationTree, generate_id,
};
use serde_json::{Value, json};
use tracing::debug;

const KAMELET_API_VERSION: &str = "camel.apache.org/v1";

/// A linear pipe binding a source to a sink through a list of kamelet steps.
///
/// ```json
/// { "metadata": { "name": "orders" },
///   "spec": { "source": { "ref": { "name": "timer-source" } },
///             "steps": [ { "ref": { "name": "log-action" } } ],
///             "sink": { "uri": "log:out" } } }
/// ```
#[derive(Debug, Clone)]
pub struct PipeEntity {
    id: String,
    definition: Value,
}

/// Position of an endpoint or step inside the pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Source,
    Step(usize),
    Sink,
}

impl Role {
    fn name(self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Step(_) => "step",
            Role::Sink => "sink",
        }
    }
}

impl PipeEntity {
    pub fn new(definition: Value) -> Result<Self, ConversionError> {
        if !definition.is_object() {
            return Err(ConversionError::InvalidStep {
                path: String::new(),
                reason: "a pipe definition must be an object".to_string(),
            });
        }
        let id = definition
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| generate_id("pipe"));
        Ok(Self { id, definition })
    }

    pub fn definition(&self) -> &Value {
        &self.definition
    }

    pub fn to_resource(&self) -> Value {
        json!({ "pipe": self.definition })
    }

    fn spec_path() -> StepPath {
        StepPath::new().key("spec")
    }

    fn role(path: &StepPath) -> Option<Role> {
        match path.segments() {
            [PathSegment::Key(spec), PathSegment::Key(key)] if spec == "spec" => match key.as_str()
            {
                "source" => Some(Role::Source),
                "sink" => Some(Role::Sink),
                _ => None,
            },
            [PathSegment::Key(spec), PathSegment::Key(steps), PathSegment::Index(i)]
                if spec == "spec" && steps == "steps" =>
            {
                Some(Role::Step(*i))
            }
            _ => None,
        }
    }

    fn steps_len(&self) -> usize {
        self.definition
            .pointer("/spec/steps")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    fn endpoint_to_node(
        tree: &mut VisualizationTree,
        label: &str,
        path: StepPath,
        value: &Value,
    ) -> Result<NodeIndex, ConversionError> {
        if !value.is_object() {
            return Err(ConversionError::InvalidStep {
                path: path.to_string(),
                reason: "a pipe endpoint must be an object".to_string(),
            });
        }
        Ok(tree.create_node(label, NodeData::new(path)))
    }
}

impl BaseVisualEntity for PipeEntity {
    fn id(&self) -> &str {
        &self.id
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Pipe
    }

    fn node_label(&self, path: &StepPath) -> String {
        let Some(role) = Self::role(path) else {
            return path.to_string();
        };
        let endpoint = document::resolve(&self.definition, path);
        endpoint
            .and_then(|e| e.pointer("/ref/name").and_then(Value::as_str))
            .or_else(|| endpoint.and_then(|e| str_prop(e, "uri")))
            .unwrap_or(role.name())
            .to_string()
    }

    fn tooltip_content(&self, path: &StepPath) -> String {
        let label = self.node_label(path);
        match Self::role(path) {
            Some(role) => format!("{}: {}", role.name(), label),
            None => label,
        }
    }

    fn component_schema(&self, path: &StepPath) -> Option<VisualComponentSchema> {
        Self::role(path)?;
        let definition = document::resolve(&self.definition, path)?.clone();
        Some(VisualComponentSchema {
            title: self.node_label(path),
            schema: json!({
                "type": "object",
                "properties": {
                    "ref": { "type": "object", "title": "Reference" },
                    "uri": { "type": "string", "title": "Uri" },
                    "properties": { "type": "object", "title": "Properties" },
                },
            }),
            definition,
        })
    }

    fn node_validation_text(&self, path: &StepPath) -> Option<String> {
        let role = Self::role(path)?;
        let endpoint = document::resolve(&self.definition, path)?;
        if endpoint.get("ref").is_none() && str_prop(endpoint, "uri").is_none() {
            return Some(format!("{} requires a ref or a uri", role.name()));
        }
        None
    }

    fn node_interaction(&self, data: &NodeData) -> NodeInteraction {
        match Self::role(&data.path) {
            Some(Role::Source) => NodeInteraction {
                can_have_next_step: true,
                ..NodeInteraction::default()
            },
            Some(Role::Step(_)) => NodeInteraction {
                can_have_previous_step: true,
                can_have_next_step: true,
                ..NodeInteraction::default()
            },
            Some(Role::Sink) => NodeInteraction {
                can_have_previous_step: true,
                ..NodeInteraction::default()
            },
            None => NodeInteraction::default(),
        }
    }

    fn add_step(&mut self, request: AddStepRequest<'_>) -> Result<(), EntityError> {
        let definition = request.definition;
        if definition.kind != CatalogKind::Kamelet {
            return Err(EntityError::UnsupportedComponent {
                name: definition.name.clone(),
                kind: definition.kind.to_string(),
            });
        }
        let path = &request.data.path;
        let index = match (Self::role(path), request.mode) {
            (Some(Role::Source), AddStepMode::After) => 0,
            (Some(Role::Step(i)), AddStepMode::Before) => i,
            (Some(Role::Step(i)), AddStepMode::After) => i + 1,
            (Some(Role::Sink), AddStepMode::Before) => self.steps_len(),
            _ => {
                return Err(EntityError::InvalidInsertion {
                    component: definition.name.clone(),
                    mode: request.mode.to_string(),
                    path: path.to_string(),
                    reason: "pipes only accept kamelets between source and sink".to_string(),
                });
            }
        };
        let step = json!({
            "ref": {
                "kind": "Kamelet",
                "apiVersion": KAMELET_API_VERSION,
                "name": definition.name,
            }
        });
        debug!(pipe = %self.id, component = %definition.name, index, "Adding step");
        insert_into_array(&mut self.definition, &Self::spec_path(), "steps", index, step)
    }

    fn remove_step(&mut self, path: &StepPath) -> Result<(), EntityError> {
        match Self::role(path) {
            Some(Role::Step(_)) => {
                if !document::remove_at(&mut self.definition, path) {
                    debug!(pipe = %self.id, path = %path, "Nothing to remove");
                }
                Ok(())
            }
            Some(_) => Err(EntityError::CannotRemove(path.to_string())),
            None => Ok(()),
        }
    }

    fn update_model(&mut self, path: &StepPath, value: Value) -> Result<(), EntityError> {
        if Self::role(path).is_none() {
            return Err(EntityError::PathNotFound(path.to_string()));
        }
        replace_properties(&mut self.definition, path, value, &[])
    }

    fn to_viz_node(&self, tree: &mut VisualizationTree) -> Result<NodeIndex, ConversionError> {
        let spec_path = Self::spec_path();
        let spec = document::resolve(&self.definition, &spec_path).ok_or_else(|| {
            ConversionError::InvalidStep {
                path: spec_path.to_string(),
                reason: "a pipe needs a 'spec' object".to_string(),
            }
        })?;
        let source = spec.get("source").ok_or_else(|| ConversionError::InvalidStep {
            path: spec_path.key("source").to_string(),
            reason: "a pipe needs a source".to_string(),
        })?;

        let root = Self::endpoint_to_node(tree, "source", spec_path.key("source"), source)?;
        let mut last = root;
        if let Some(steps) = spec.get("steps") {
            let steps_path = spec_path.key("steps");
            let items = steps.as_array().ok_or_else(|| ConversionError::InvalidStep {
                path: steps_path.to_string(),
                reason: "expected an array of steps".to_string(),
            })?;
            for (i, step) in items.iter().enumerate() {
                let node = Self::endpoint_to_node(tree, "step", steps_path.index(i), step)?;
                tree.link(last, node);
                last = node;
            }
        }
        if let Some(sink) = spec.get("sink") {
            let node = Self::endpoint_to_node(tree, "sink", spec_path.key("sink"), sink)?;
            tree.link(last, node);
        }
        debug!(pipe = %self.id, nodes = tree.len(), "Converted pipe");
        Ok(root)
    }
}
