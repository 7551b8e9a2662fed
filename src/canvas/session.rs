use super::settings::CanvasSettings;
use super::visible_flows::VisibleFlows;
use crate::diagram::{
    DiagramNode, FlowDiagram, GraphModel, GraphSettings, LayoutType, build_flow_diagrams,
};
use crate::entity::{AddStepMode, DefinedComponent, NodeInteraction, SharedEntity};
use crate::error::{ConversionError, EditorError};
use crate::visualization::{FlowVisualization, NodeIndex, NodeRef, StepPath};
use serde_json::Value;
use tracing::debug;

/// Builder for an [`EditorSession`].
pub struct EditorSessionBuilder {
    entities: Vec<SharedEntity>,
    settings: CanvasSettings,
    hidden: Vec<String>,
}

impl EditorSessionBuilder {
    pub fn new(entities: Vec<SharedEntity>) -> Self {
        Self {
            entities,
            settings: CanvasSettings::default(),
            hidden: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: CanvasSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_layout(mut self, layout: LayoutType) -> Self {
        self.settings.layout = layout;
        self
    }

    /// Starts the session with the given flow hidden.
    pub fn with_hidden_flow(mut self, flow_id: &str) -> Self {
        self.hidden.push(flow_id.to_string());
        self
    }

    /// Creates the session and renders it once.
    pub fn build(self) -> Result<EditorSession, ConversionError> {
        let ids: Vec<String> = self
            .entities
            .iter()
            .map(|e| e.borrow().id().to_string())
            .collect();
        let mut visible_flows = VisibleFlows::from_ids(ids.iter().map(String::as_str));
        for id in &self.hidden {
            visible_flows.set_visible(id, false);
        }

        let mut session = EditorSession {
            entities: self.entities,
            flows: Vec::new(),
            visible_flows,
            diagram: FlowDiagram::default(),
            selected_ids: Vec::new(),
            selected_node: None,
            settings: self.settings,
            catalog_open: false,
        };
        session.render()?;
        Ok(session)
    }
}

/// State of one editing session over a set of flows.
///
/// Owns the selection, the visible flows, the active layout and the catalog
/// toggle, and rebuilds trees and diagram from scratch after every edit.
#[derive(Debug)]
pub struct EditorSession {
    entities: Vec<SharedEntity>,
    flows: Vec<FlowVisualization>,
    visible_flows: VisibleFlows,
    diagram: FlowDiagram,
    selected_ids: Vec<String>,
    selected_node: Option<DiagramNode>,
    settings: CanvasSettings,
    catalog_open: bool,
}

impl EditorSession {
    pub fn builder(entities: Vec<SharedEntity>) -> EditorSessionBuilder {
        EditorSessionBuilder::new(entities)
    }

    pub fn entities(&self) -> &[SharedEntity] {
        &self.entities
    }

    /// Node trees of the flows drawn by the last render.
    pub fn flows(&self) -> &[FlowVisualization] {
        &self.flows
    }

    pub fn flow(&self, flow_id: &str) -> Option<&FlowVisualization> {
        self.flows.iter().find(|f| f.flow_id == flow_id)
    }

    pub fn diagram(&self) -> &FlowDiagram {
        &self.diagram
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn visible_flows(&self) -> &VisibleFlows {
        &self.visible_flows
    }

    /// Converts every visible entity again and rebuilds the diagram.
    ///
    /// The selection is cleared because node ids change on every conversion.
    pub fn render(&mut self) -> Result<&FlowDiagram, ConversionError> {
        self.clear_selection();
        let ids: Vec<String> = self
            .entities
            .iter()
            .map(|e| e.borrow().id().to_string())
            .collect();
        self.visible_flows.sync(ids.iter().map(String::as_str));

        let mut flows = Vec::new();
        for (entity, id) in self.entities.iter().zip(&ids) {
            if self.visible_flows.is_visible(id) {
                flows.push(FlowVisualization::from_entity(entity)?);
            }
        }
        let diagram = build_flow_diagrams(&flows, |id| self.visible_flows.is_visible(id));
        debug!(
            flows = flows.len(),
            nodes = diagram.nodes.len(),
            edges = diagram.edges.len(),
            "Rendered canvas"
        );
        self.flows = flows;
        self.diagram = diagram;
        Ok(&self.diagram)
    }

    /// Replaces the flows being edited and renders them.
    pub fn replace_entities(
        &mut self,
        entities: Vec<SharedEntity>,
    ) -> Result<&FlowDiagram, ConversionError> {
        self.entities = entities;
        self.render()
    }

    pub fn graph_model(&self) -> GraphModel {
        GraphModel {
            nodes: self.diagram.nodes.clone(),
            edges: self.diagram.edges.clone(),
            graph: GraphSettings {
                id: self.settings.graph_id.clone(),
                graph_type: "graph".to_string(),
                layout: self.settings.layout,
                fit_padding: self.settings.fit_padding,
            },
        }
    }

    // --- Selection ---

    /// Records the ids reported by the rendering surface and selects the first one.
    ///
    /// Only single selection is supported; an unknown id clears the selection.
    pub fn handle_selection(&mut self, selected_ids: &[String]) -> Option<&DiagramNode> {
        self.selected_ids = selected_ids.to_vec();
        self.selected_node = selected_ids
            .first()
            .and_then(|id| self.diagram.node(id))
            .cloned();
        debug!(
            selected = ?self.selected_node.as_ref().map(|n| n.id.as_str()),
            "Selection changed"
        );
        self.selected_node.as_ref()
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected_ids
    }

    pub fn selected_node(&self) -> Option<&DiagramNode> {
        self.selected_node.as_ref()
    }

    /// The visualization node behind the current selection.
    pub fn selected_viz_node(&self) -> Option<NodeRef<'_>> {
        let (flow, index) = self.selected_handle().ok()?;
        Some(self.flows[flow].tree.node_ref(index))
    }

    /// Edits allowed at the selected node, as reported by its owning entity.
    pub fn selected_interaction(&self) -> Option<NodeInteraction> {
        self.selected_viz_node().map(|node| node.interaction())
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
        self.selected_node = None;
    }

    /// Closing the side bar drops the selection.
    pub fn close_side_bar(&mut self) {
        self.clear_selection();
    }

    fn selected_handle(&self) -> Result<(usize, NodeIndex), EditorError> {
        let selected = self.selected_node.as_ref().ok_or(EditorError::NoSelection)?;
        self.flows
            .iter()
            .enumerate()
            .filter(|(_, flow)| flow.flow_id == selected.flow_id)
            .find_map(|(position, flow)| flow.tree.find(&selected.id).map(|i| (position, i)))
            .ok_or(EditorError::NoSelection)
    }

    // --- Edits on the selection ---

    pub fn add_step(
        &mut self,
        definition: &DefinedComponent,
        mode: AddStepMode,
    ) -> Result<(), EditorError> {
        let (flow, index) = self.selected_handle()?;
        self.flows[flow].tree.add_step(index, definition, mode)?;
        self.render()?;
        Ok(())
    }

    pub fn remove_selected_step(&mut self) -> Result<(), EditorError> {
        let (flow, index) = self.selected_handle()?;
        self.flows[flow].tree.remove_step(index)?;
        self.render()?;
        Ok(())
    }

    /// Updates the selected step's properties and keeps it selected.
    pub fn update_selected_model(&mut self, value: Value) -> Result<(), EditorError> {
        let (flow, index) = self.selected_handle()?;
        let flow_id = self.flows[flow].flow_id.clone();
        let path = self.flows[flow].tree.node(index).path().clone();
        self.flows[flow].tree.update_model(index, value)?;
        self.render()?;
        self.select_by_path(&flow_id, &path);
        Ok(())
    }

    /// Selects the node at `path` in the given flow, if it is drawn.
    pub fn select_by_path(&mut self, flow_id: &str, path: &StepPath) -> Option<&DiagramNode> {
        let id = self.flow(flow_id).and_then(|flow| {
            flow.tree
                .iter()
                .find(|(_, node)| node.path() == path)
                .map(|(_, node)| node.id().to_string())
        });
        match id {
            Some(id) => self.handle_selection(&[id]),
            None => {
                self.clear_selection();
                None
            }
        }
    }

    // --- Canvas state ---

    pub fn layout(&self) -> LayoutType {
        self.settings.layout
    }

    pub fn set_layout(&mut self, layout: LayoutType) {
        self.settings.layout = layout;
    }

    /// Flips a flow's visibility, re-renders and returns the new state.
    pub fn toggle_flow(&mut self, flow_id: &str) -> Result<bool, ConversionError> {
        let visible = self.visible_flows.toggle(flow_id);
        self.render()?;
        Ok(visible)
    }

    pub fn set_flow_visible(
        &mut self,
        flow_id: &str,
        visible: bool,
    ) -> Result<(), ConversionError> {
        self.visible_flows.set_visible(flow_id, visible);
        self.render()?;
        Ok(())
    }

    pub fn show_all_flows(&mut self) -> Result<(), ConversionError> {
        self.visible_flows.show_all();
        self.render()?;
        Ok(())
    }

    pub fn hide_all_flows(&mut self) -> Result<(), ConversionError> {
        self.visible_flows.hide_all();
        self.render()?;
        Ok(())
    }

    /// True when there is nothing to draw: no flows at all, or all of them hidden.
    pub fn should_show_empty_state(&self) -> bool {
        self.entities.is_empty() || self.visible_flows.all_hidden()
    }

    pub fn is_catalog_open(&self) -> bool {
        self.catalog_open
    }

    pub fn set_catalog_open(&mut self, open: bool) {
        self.catalog_open = open;
    }
}
