use super::contract::{
    AddStepMode, AddStepRequest, BaseVisualEntity, CatalogKind, DefinedComponent, EntityType,
    NodeInteraction, VisualComponentSchema,
};
use super::document::{self, insert_into_array, replace_properties, single_entry, str_prop};
use super::processors::{self, ProcessorShape};
use crate::error::{ConversionError, EntityError};
use crate::visualization::{
    NodeData, NodeIndex, PathSegment, StepPath, VisualizationTree, generate_id,
};
use serde_json::{Value, json};
use tracing::debug;

/// A route: one `from` endpoint followed by a chain of processors.
///
/// ```json
/// {
///   "id": "route-1",
///   "from": { "uri": "timer:tick", "steps": [ { "log": { "message": "hi" } } ] }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RouteEntity {
    id: String,
    definition: Value,
}

/// A step resolved from a path: its processor name and where its properties live.
struct Located {
    name: String,
    properties: StepPath,
}

impl RouteEntity {
    pub fn new(definition: Value) -> Result<Self, ConversionError> {
        if !definition.is_object() {
            return Err(ConversionError::InvalidStep {
                path: String::new(),
                reason: "a route definition must be an object".to_string(),
            });
        }
        let id = str_prop(&definition, "id")
            .map(str::to_string)
            .unwrap_or_else(|| generate_id("route"));
        Ok(Self { id, definition })
    }

    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// The route wrapped as a resource, e.g. `{"route": {...}}`.
    pub fn to_resource(&self) -> Value {
        json!({ "route": self.definition })
    }

    fn from_path() -> StepPath {
        StepPath::new().key("from")
    }

    fn is_chained(path: &StepPath) -> bool {
        matches!(
            path.segments(),
            [.., PathSegment::Key(list), PathSegment::Index(_)] if list == "steps"
        )
    }

    fn locate(&self, path: &StepPath) -> Option<Located> {
        let value = document::resolve(&self.definition, path)?;
        match path.segments() {
            [.., PathSegment::Key(list), PathSegment::Index(_)] if list == "steps" => {
                let (name, _) = single_entry(value)?;
                Some(Located {
                    name: name.clone(),
                    properties: path.key(name),
                })
            }
            // Branch entries such as `choice.when.0` carry their properties directly.
            [.., PathSegment::Key(list), PathSegment::Index(_)] => Some(Located {
                name: list.clone(),
                properties: path.clone(),
            }),
            [.., PathSegment::Key(name)] => Some(Located {
                name: name.clone(),
                properties: path.clone(),
            }),
            _ => None,
        }
    }

    fn properties(&self, located: &Located) -> Option<&Value> {
        document::resolve(&self.definition, &located.properties)
    }

    fn new_step(definition: &DefinedComponent) -> Value {
        match definition.kind {
            CatalogKind::Processor => {
                let mut step = serde_json::Map::new();
                step.insert(definition.name.clone(), json!({}));
                Value::Object(step)
            }
            CatalogKind::Component => json!({ "to": { "uri": definition.name } }),
            CatalogKind::Kamelet => {
                json!({ "to": { "uri": format!("kamelet:{}", definition.name) } })
            }
        }
    }

    fn invalid_insertion(request: &AddStepRequest<'_>, reason: &str) -> EntityError {
        EntityError::InvalidInsertion {
            component: request.definition.name.clone(),
            mode: request.mode.to_string(),
            path: request.data.path.to_string(),
            reason: reason.to_string(),
        }
    }

    fn insert_in_chain(&mut self, request: &AddStepRequest<'_>) -> Result<(), EntityError> {
        let path = &request.data.path;
        let step = Self::new_step(request.definition);
        match (path.segments(), request.mode) {
            ([.., PathSegment::Key(list), PathSegment::Index(i)], mode) if list == "steps" => {
                let owner = path
                    .parent()
                    .and_then(|p| p.parent())
                    .ok_or_else(|| EntityError::PathNotFound(path.to_string()))?;
                let index = if mode == AddStepMode::After { i + 1 } else { *i };
                insert_into_array(&mut self.definition, &owner, "steps", index, step)
            }
            ([PathSegment::Key(key)], AddStepMode::After) if key == "from" => {
                insert_into_array(&mut self.definition, path, "steps", 0, step)
            }
            _ => Err(Self::invalid_insertion(
                request,
                "only chained steps accept siblings",
            )),
        }
    }

    fn insert_child(&mut self, request: &AddStepRequest<'_>) -> Result<(), EntityError> {
        let path = &request.data.path;
        let located = self
            .locate(path)
            .ok_or_else(|| EntityError::PathNotFound(path.to_string()))?;
        let step = Self::new_step(request.definition);
        match processors::shape_of(&located.name) {
            ProcessorShape::Container => insert_into_array(
                &mut self.definition,
                &located.properties,
                "steps",
                usize::MAX,
                step,
            ),
            ProcessorShape::Branching { branches, .. } => {
                let branch = if request.definition.name == branches {
                    json!({ "expression": "", "steps": [] })
                } else {
                    json!({ "steps": [step] })
                };
                insert_into_array(
                    &mut self.definition,
                    &located.properties,
                    branches,
                    usize::MAX,
                    branch,
                )
            }
            ProcessorShape::Simple => Err(Self::invalid_insertion(
                request,
                "this step cannot hold nested steps",
            )),
        }
    }

    fn insert_special_child(&mut self, request: &AddStepRequest<'_>) -> Result<(), EntityError> {
        let path = &request.data.path;
        let located = self
            .locate(path)
            .ok_or_else(|| EntityError::PathNotFound(path.to_string()))?;
        let ProcessorShape::Branching {
            special: Some(key), ..
        } = processors::shape_of(&located.name)
        else {
            return Err(Self::invalid_insertion(
                request,
                "this step has no special branch",
            ));
        };
        let step = Self::new_step(request.definition);
        let properties = document::resolve_mut(&mut self.definition, &located.properties)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| EntityError::PathNotFound(located.properties.to_string()))?;
        if properties.contains_key(key) {
            return Err(Self::invalid_insertion(
                request,
                "the special branch already exists",
            ));
        }
        let branch = if request.definition.name == key {
            json!({ "steps": [] })
        } else {
            json!({ "steps": [step] })
        };
        properties.insert(key.to_string(), branch);
        Ok(())
    }

    // --- Conversion walk ---

    fn invalid_step(path: &StepPath, reason: &str) -> ConversionError {
        ConversionError::InvalidStep {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates one node per step and links them `previous -> next`.
    fn chain_to_nodes(
        &self,
        tree: &mut VisualizationTree,
        steps_path: &StepPath,
        steps: &Value,
    ) -> Result<Vec<NodeIndex>, ConversionError> {
        let items = steps
            .as_array()
            .ok_or_else(|| Self::invalid_step(steps_path, "expected an array of steps"))?;
        let mut chain: Vec<NodeIndex> = Vec::with_capacity(items.len());
        for (i, step) in items.iter().enumerate() {
            let node = self.step_to_node(tree, &steps_path.index(i), step)?;
            if let Some(previous) = chain.last() {
                tree.link(*previous, node);
            }
            chain.push(node);
        }
        Ok(chain)
    }

    fn step_to_node(
        &self,
        tree: &mut VisualizationTree,
        path: &StepPath,
        step: &Value,
    ) -> Result<NodeIndex, ConversionError> {
        let (name, properties) = single_entry(step).ok_or_else(|| {
            Self::invalid_step(path, "a step must be an object with exactly one processor key")
        })?;
        let node = tree.create_node(name, NodeData::new(path.clone()));
        let properties_path = path.key(name);

        match processors::shape_of(name) {
            ProcessorShape::Simple => {}
            ProcessorShape::Container => {
                self.attach_nested_steps(tree, node, &properties_path, properties)?
            }
            ProcessorShape::Branching { branches, special } => {
                // Branching steps always expose a children list, even with no branches.
                tree.set_children(node, Some(Vec::new()));
                if let Some(entries) = properties.get(branches) {
                    let entries_path = properties_path.key(branches);
                    let entries = entries
                        .as_array()
                        .ok_or_else(|| Self::invalid_step(&entries_path, "expected an array"))?;
                    for (i, entry) in entries.iter().enumerate() {
                        let branch =
                            self.branch_to_node(tree, branches, &entries_path.index(i), entry)?;
                        tree.add_child(node, branch);
                    }
                }
                if let Some(key) = special {
                    if let Some(entry) = properties.get(key) {
                        let branch =
                            self.branch_to_node(tree, key, &properties_path.key(key), entry)?;
                        tree.add_child(node, branch);
                    }
                }
            }
        }
        Ok(node)
    }

    fn branch_to_node(
        &self,
        tree: &mut VisualizationTree,
        name: &str,
        path: &StepPath,
        entry: &Value,
    ) -> Result<NodeIndex, ConversionError> {
        if !entry.is_object() {
            return Err(Self::invalid_step(path, "a branch must be an object"));
        }
        let node = tree.create_node(name, NodeData::new(path.clone()));
        self.attach_nested_steps(tree, node, path, entry)?;
        Ok(node)
    }

    /// The head of a non-empty nested `steps` chain becomes the single child of `node`.
    fn attach_nested_steps(
        &self,
        tree: &mut VisualizationTree,
        node: NodeIndex,
        owner_path: &StepPath,
        properties: &Value,
    ) -> Result<(), ConversionError> {
        if let Some(steps) = properties.get("steps") {
            let chain = self.chain_to_nodes(tree, &owner_path.key("steps"), steps)?;
            if let Some(head) = chain.first() {
                tree.add_child(node, *head);
            }
        }
        Ok(())
    }
}

impl BaseVisualEntity for RouteEntity {
    fn id(&self) -> &str {
        &self.id
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Route
    }

    fn node_label(&self, path: &StepPath) -> String {
        let Some(located) = self.locate(path) else {
            return path.to_string();
        };
        if processors::requires_uri(&located.name) {
            if let Some(uri) = self.properties(&located).and_then(|p| str_prop(p, "uri")) {
                return uri
                    .split_once(':')
                    .map_or(uri, |(scheme, _)| scheme)
                    .to_string();
            }
        }
        located.name
    }

    fn tooltip_content(&self, path: &StepPath) -> String {
        let description = self.locate(path).and_then(|located| {
            self.properties(&located)
                .and_then(|p| str_prop(p, "description"))
                .map(str::to_string)
        });
        description.unwrap_or_else(|| self.node_label(path))
    }

    fn component_schema(&self, path: &StepPath) -> Option<VisualComponentSchema> {
        let located = self.locate(path)?;
        let mut definition = self.properties(&located)?.clone();
        if let Value::Object(map) = &mut definition {
            for key in processors::structural_keys(&located.name) {
                map.remove(key);
            }
        }
        Some(VisualComponentSchema {
            title: processors::title_of(&located.name),
            schema: processors::properties_schema(&located.name),
            definition,
        })
    }

    fn node_validation_text(&self, path: &StepPath) -> Option<String> {
        let located = self.locate(path)?;
        let properties = self.properties(&located)?;
        let is_blank = |key: &str| str_prop(properties, key).is_none_or(|v| v.trim().is_empty());

        if processors::requires_uri(&located.name) && is_blank("uri") {
            return Some(format!("{} requires a uri", located.name));
        }
        if processors::requires_expression(&located.name) && is_blank("expression") {
            return Some(format!("{} requires an expression", located.name));
        }
        None
    }

    fn node_interaction(&self, data: &NodeData) -> NodeInteraction {
        let path = &data.path;
        let Some(located) = self.locate(path) else {
            return NodeInteraction::default();
        };
        let chained = Self::is_chained(path);
        let shape = processors::shape_of(&located.name);
        let can_have_special_children = match shape {
            ProcessorShape::Branching {
                special: Some(key), ..
            } => self
                .properties(&located)
                .is_some_and(|p| p.get(key).is_none()),
            _ => false,
        };

        NodeInteraction {
            can_have_previous_step: chained,
            can_have_next_step: chained || *path == Self::from_path(),
            can_have_children: shape != ProcessorShape::Simple,
            can_have_special_children,
        }
    }

    fn add_step(&mut self, request: AddStepRequest<'_>) -> Result<(), EntityError> {
        debug!(
            route = %self.id,
            component = %request.definition.name,
            mode = %request.mode,
            anchor = %request.data.path,
            "Adding step"
        );
        match request.mode {
            AddStepMode::Before | AddStepMode::After => self.insert_in_chain(&request),
            AddStepMode::Child => self.insert_child(&request),
            AddStepMode::SpecialChild => self.insert_special_child(&request),
        }
    }

    fn remove_step(&mut self, path: &StepPath) -> Result<(), EntityError> {
        if path.is_empty() || *path == Self::from_path() {
            return Err(EntityError::CannotRemove(path.to_string()));
        }
        if !document::remove_at(&mut self.definition, path) {
            debug!(route = %self.id, path = %path, "Nothing to remove");
        }
        Ok(())
    }

    fn update_model(&mut self, path: &StepPath, value: Value) -> Result<(), EntityError> {
        let located = self
            .locate(path)
            .ok_or_else(|| EntityError::PathNotFound(path.to_string()))?;
        let preserved = processors::structural_keys(&located.name);
        replace_properties(&mut self.definition, &located.properties, value, &preserved)
    }

    fn to_viz_node(&self, tree: &mut VisualizationTree) -> Result<NodeIndex, ConversionError> {
        let from_path = Self::from_path();
        let from = document::resolve(&self.definition, &from_path)
            .filter(|v| v.is_object())
            .ok_or_else(|| Self::invalid_step(&from_path, "a route needs a 'from' object"))?;

        let root = tree.create_node("from", NodeData::new(from_path.clone()));
        if let Some(steps) = from.get("steps") {
            let chain = self.chain_to_nodes(tree, &from_path.key("steps"), steps)?;
            if let Some(head) = chain.first() {
                tree.link(root, *head);
            }
        }
        debug!(route = %self.id, nodes = tree.len(), "Converted route");
        Ok(root)
    }
}
