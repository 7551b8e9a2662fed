//! Tests for route and pipe entities: conversion, delegation and document edits.
mod common;
use common::*;
use pipeviz::prelude::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn flow_of<E: BaseVisualEntity + 'static>(entity: &Rc<RefCell<E>>) -> FlowVisualization {
    let shared: SharedEntity = entity.clone();
    FlowVisualization::from_entity(&shared).expect("fixture converts")
}

fn processor(name: &str) -> DefinedComponent {
    DefinedComponent::new(name, CatalogKind::Processor)
}

mod loading {
    use super::*;

    #[test]
    fn test_load_routes_and_pipes() {
        let json = json!([choice_route(), simple_pipe(), linear_route("route-b", 1)]).to_string();
        let entities = load_entities(&json).expect("resources load");

        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0].borrow().entity_type(), EntityType::Route);
        assert_eq!(entities[0].borrow().id(), "route-choice");
        assert_eq!(entities[1].borrow().entity_type(), EntityType::Pipe);
        assert_eq!(entities[1].borrow().id(), "pipe-orders");
        assert_eq!(entities[2].borrow().id(), "route-b");
    }

    #[test]
    fn test_load_single_resource() {
        let entities = load_entities(&simple_pipe().to_string()).expect("resource loads");
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_unsupported_entity_kind() {
        let err = load_entities(r#"[{"beans": []}]"#).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnsupportedEntity {
                kind: "beans".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_resources() {
        assert!(matches!(
            load_entities("not json"),
            Err(ConversionError::JsonParseError(_))
        ));
        assert!(matches!(
            load_entities("[1]"),
            Err(ConversionError::InvalidResource { index: 0, .. })
        ));
        assert!(matches!(
            load_entities(r#"[{"route": {}, "pipe": {}}]"#),
            Err(ConversionError::InvalidResource { index: 0, .. })
        ));
    }

    #[test]
    fn test_route_without_id_gets_generated_one() {
        let route = RouteEntity::new(json!({ "from": { "uri": "timer:x" } })).unwrap();
        assert!(route.id().starts_with("route-"));
    }

    #[test]
    fn test_route_without_from_fails_conversion() {
        let shared = entity(json!({ "route": { "id": "broken" } }));
        let err = FlowVisualization::from_entity(&shared).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidStep { .. }));
    }
}

mod route {
    use super::*;

    #[test]
    fn test_route_conversion_structure() {
        let route = route_entity(choice_route());
        let flow = flow_of(&route);
        let tree = &flow.tree;

        assert_eq!(tree.len(), 10);
        assert_eq!(tree.node_label(flow.root), "timer");

        let choice = tree.next_node(flow.root).expect("from is followed by choice");
        assert_eq!(tree.node(choice).path().to_string(), "from.steps.0");
        assert_eq!(tree.node_label(choice), "choice");
        let branches = tree.children(choice).expect("choice has branches");
        assert_eq!(branches.len(), 3);
        assert_eq!(tree.node_label(branches[0]), "when");
        assert_eq!(tree.node_label(branches[2]), "otherwise");

        let tail = tree.next_node(choice).expect("choice is followed by to");
        assert_eq!(tree.node_label(tail), "log");
        assert!(tree.next_node(tail).is_none());

        // Nested chains hang off their branch through the head only.
        let second = tree.children(branches[1]).expect("when has steps");
        assert_eq!(second.len(), 1);
        assert_eq!(tree.node_label(second[0]), "direct");
        let after = tree.next_node(second[0]).expect("two steps in the branch");
        assert_eq!(tree.root_node(after), flow.root);
    }

    #[test]
    fn test_choice_without_branches_has_empty_children() {
        let route = route_entity(json!({
            "route": { "id": "r", "from": { "uri": "timer:x", "steps": [ { "choice": {} } ] } }
        }));
        let flow = flow_of(&route);
        let choice = node_at(&flow, "from.steps.0");

        assert_eq!(flow.tree.children(choice), Some(&[][..]));
        let mut ids = Vec::new();
        flow.tree.populate_leaf_nodes_ids(choice, &mut ids);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_route_interactions() {
        let route = route_entity(choice_route());
        let flow = flow_of(&route);

        let from = flow.tree.node_interaction(flow.root);
        assert!(!from.can_have_previous_step);
        assert!(from.can_have_next_step);
        assert!(!from.can_have_children);

        let choice = flow.tree.node_interaction(node_at(&flow, "from.steps.0"));
        assert!(choice.can_have_previous_step);
        assert!(choice.can_have_next_step);
        assert!(choice.can_have_children);
        assert!(!choice.can_have_special_children);

        let when = flow
            .tree
            .node_interaction(node_at(&flow, "from.steps.0.choice.when.0"));
        assert!(!when.can_have_previous_step);
        assert!(!when.can_have_next_step);
        assert!(when.can_have_children);
    }

    #[test]
    fn test_route_tooltip_and_validation() {
        let route = route_entity(json!({
            "route": {
                "id": "r",
                "from": {
                    "uri": "timer:x",
                    "steps": [
                        { "to": { "description": "Final hop" } },
                        { "setBody": { "expression": " " } },
                        { "log": { "message": "ok" } }
                    ]
                }
            }
        }));
        let flow = flow_of(&route);
        let to = node_at(&flow, "from.steps.0");

        assert_eq!(flow.tree.tooltip_content(to), "Final hop");
        assert_eq!(
            flow.tree.node_validation_text(to).as_deref(),
            Some("to requires a uri")
        );
        assert_eq!(
            flow.tree
                .node_validation_text(node_at(&flow, "from.steps.1"))
                .as_deref(),
            Some("setBody requires an expression")
        );
        assert!(
            flow.tree
                .node_validation_text(node_at(&flow, "from.steps.2"))
                .is_none()
        );
        assert_eq!(flow.tree.tooltip_content(node_at(&flow, "from.steps.2")), "log");
    }

    #[test]
    fn test_component_schema_excludes_nested_steps() {
        let route = route_entity(choice_route());
        let flow = flow_of(&route);

        let when = flow
            .tree
            .component_schema(node_at(&flow, "from.steps.0.choice.when.0"))
            .expect("when has a schema");
        assert_eq!(when.title, "When");
        assert_eq!(when.definition, json!({ "expression": "${header.a}" }));
        assert_eq!(when.schema["required"], json!(["expression"]));

        let choice = flow
            .tree
            .component_schema(node_at(&flow, "from.steps.0"))
            .expect("choice has a schema");
        assert_eq!(choice.definition, json!({}));
    }

    #[test]
    fn test_add_step_before_and_after() {
        let route = route_entity(choice_route());
        let flow = flow_of(&route);
        let choice = node_at(&flow, "from.steps.0");

        flow.tree
            .add_step(choice, &processor("log"), AddStepMode::After)
            .unwrap();
        flow.tree
            .add_step(choice, &processor("setBody"), AddStepMode::Before)
            .unwrap();

        let route = route.borrow();
        let steps = route.definition()["from"]["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], json!({ "setBody": {} }));
        assert!(steps[1].get("choice").is_some());
        assert_eq!(steps[2], json!({ "log": {} }));
    }

    #[test]
    fn test_add_step_after_from_prepends() {
        let route = route_entity(linear_route("r", 1));
        let flow = flow_of(&route);
        let component = DefinedComponent::new("kafka:orders", CatalogKind::Component);

        flow.tree
            .add_step(flow.root, &component, AddStepMode::After)
            .unwrap();

        let route = route.borrow();
        let steps = route.definition()["from"]["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], json!({ "to": { "uri": "kafka:orders" } }));
    }

    #[test]
    fn test_add_step_before_from_is_rejected() {
        let route = route_entity(linear_route("r", 1));
        let flow = flow_of(&route);

        let err = flow
            .tree
            .add_step(flow.root, &processor("log"), AddStepMode::Before)
            .unwrap_err();
        assert!(matches!(err, EntityError::InvalidInsertion { .. }));
    }

    #[test]
    fn test_add_child_to_branching_and_container_steps() {
        let route = route_entity(choice_route());
        let flow = flow_of(&route);
        let choice = node_at(&flow, "from.steps.0");
        let when = node_at(&flow, "from.steps.0.choice.when.0");

        flow.tree
            .add_step(choice, &processor("when"), AddStepMode::Child)
            .unwrap();
        flow.tree
            .add_step(choice, &processor("log"), AddStepMode::Child)
            .unwrap();
        let kamelet = DefinedComponent::new("log-sink", CatalogKind::Kamelet);
        flow.tree.add_step(when, &kamelet, AddStepMode::Child).unwrap();

        let route = route.borrow();
        let branches = route.definition()["from"]["steps"][0]["choice"]["when"]
            .as_array()
            .unwrap();
        assert_eq!(branches.len(), 4);
        assert_eq!(branches[2], json!({ "expression": "", "steps": [] }));
        assert_eq!(branches[3], json!({ "steps": [ { "log": {} } ] }));
        assert_eq!(
            branches[0]["steps"][1],
            json!({ "to": { "uri": "kamelet:log-sink" } })
        );
    }

    #[test]
    fn test_add_child_to_simple_step_is_rejected() {
        let route = route_entity(linear_route("r", 1));
        let flow = flow_of(&route);

        let err = flow
            .tree
            .add_step(node_at(&flow, "from.steps.0"), &processor("log"), AddStepMode::Child)
            .unwrap_err();
        assert!(matches!(err, EntityError::InvalidInsertion { .. }));
    }

    #[test]
    fn test_special_child_only_when_absent() {
        let route = route_entity(choice_route());
        let mut flow = flow_of(&route);
        let choice = node_at(&flow, "from.steps.0");

        let err = flow
            .tree
            .add_step(choice, &processor("log"), AddStepMode::SpecialChild)
            .unwrap_err();
        assert!(matches!(err, EntityError::InvalidInsertion { .. }));

        let otherwise = node_at(&flow, "from.steps.0.choice.otherwise");
        flow.tree.remove_step(otherwise).unwrap();
        assert_eq!(flow.tree.children(choice).map(<[_]>::len), Some(2));

        let flow = flow_of(&route);
        let choice = node_at(&flow, "from.steps.0");
        assert!(flow.tree.node_interaction(choice).can_have_special_children);
        flow.tree
            .add_step(choice, &processor("log"), AddStepMode::SpecialChild)
            .unwrap();

        let route = route.borrow();
        assert_eq!(
            route.definition()["from"]["steps"][0]["choice"]["otherwise"],
            json!({ "steps": [ { "log": {} } ] })
        );
    }

    #[test]
    fn test_remove_step() {
        let route = route_entity(choice_route());
        let mut flow = flow_of(&route);

        let err = flow.tree.remove_step(flow.root).unwrap_err();
        assert_eq!(err, EntityError::CannotRemove("from".to_string()));

        let branch = node_at(&flow, "from.steps.0.choice.when.1");
        flow.tree.remove_step(branch).unwrap();
        assert_eq!(
            route.borrow().definition()["from"]["steps"][0]["choice"]["when"]
                .as_array()
                .map(Vec::len),
            Some(1)
        );

        // The path no longer resolves; removing it again changes nothing.
        let shared: SharedEntity = route.clone();
        let path: StepPath = "from.steps.0.choice.when.1".parse().unwrap();
        shared.borrow_mut().remove_step(&path).unwrap();
        assert_eq!(
            route.borrow().definition()["from"]["steps"][0]["choice"]["when"]
                .as_array()
                .map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn test_update_model_keeps_nested_steps() {
        let route = route_entity(choice_route());
        let flow = flow_of(&route);
        let when = node_at(&flow, "from.steps.0.choice.when.0");

        flow.tree
            .update_model(when, json!({ "expression": "${header.c}" }))
            .unwrap();
        flow.tree
            .update_model(flow.root, json!({ "uri": "timer:other" }))
            .unwrap();

        let route = route.borrow();
        let branch = &route.definition()["from"]["steps"][0]["choice"]["when"][0];
        assert_eq!(branch["expression"], "${header.c}");
        assert_eq!(branch["steps"].as_array().map(Vec::len), Some(1));
        assert_eq!(route.definition()["from"]["uri"], "timer:other");
        assert_eq!(
            route.definition()["from"]["steps"].as_array().map(Vec::len),
            Some(2)
        );
    }

    #[test]
    fn test_update_model_requires_object() {
        let route = route_entity(linear_route("r", 1));
        let flow = flow_of(&route);

        let err = flow
            .tree
            .update_model(node_at(&flow, "from.steps.0"), json!("text"))
            .unwrap_err();
        assert!(matches!(err, EntityError::InvalidModel { .. }));
    }
}

mod pipe {
    use super::*;

    #[test]
    fn test_pipe_conversion_chain() {
        let pipe = pipe_entity(simple_pipe());
        let flow = flow_of(&pipe);
        let tree = &flow.tree;

        assert_eq!(flow.flow_id, "pipe-orders");
        assert_eq!(tree.len(), 3);
        let step = tree.next_node(flow.root).unwrap();
        let sink = tree.next_node(step).unwrap();
        assert_eq!(tree.node_label(flow.root), "timer-source");
        assert_eq!(tree.node_label(step), "log-action");
        assert_eq!(tree.node_label(sink), "log:out");
        assert_eq!(tree.tooltip_content(sink), "sink: log:out");
        assert!(tree.node_validation_text(sink).is_none());
    }

    #[test]
    fn test_pipe_interactions() {
        let pipe = pipe_entity(simple_pipe());
        let flow = flow_of(&pipe);

        let source = flow.tree.node_interaction(node_at(&flow, "spec.source"));
        assert!(!source.can_have_previous_step && source.can_have_next_step);
        let step = flow.tree.node_interaction(node_at(&flow, "spec.steps.0"));
        assert!(step.can_have_previous_step && step.can_have_next_step);
        let sink = flow.tree.node_interaction(node_at(&flow, "spec.sink"));
        assert!(sink.can_have_previous_step && !sink.can_have_next_step);
        assert!(!sink.can_have_children);
    }

    #[test]
    fn test_pipe_accepts_only_kamelets() {
        let pipe = pipe_entity(simple_pipe());
        let flow = flow_of(&pipe);

        let err = flow
            .tree
            .add_step(flow.root, &processor("log"), AddStepMode::After)
            .unwrap_err();
        assert!(matches!(err, EntityError::UnsupportedComponent { .. }));

        let kamelet = DefinedComponent::new("json-deserialize-action", CatalogKind::Kamelet);
        flow.tree
            .add_step(node_at(&flow, "spec.sink"), &kamelet, AddStepMode::Before)
            .unwrap();
        let err = flow
            .tree
            .add_step(node_at(&flow, "spec.sink"), &kamelet, AddStepMode::After)
            .unwrap_err();
        assert!(matches!(err, EntityError::InvalidInsertion { .. }));

        let pipe = pipe.borrow();
        let steps = pipe.definition()["spec"]["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1]["ref"]["name"], "json-deserialize-action");
    }

    #[test]
    fn test_pipe_endpoints_cannot_be_removed() {
        let pipe = pipe_entity(simple_pipe());
        let mut flow = flow_of(&pipe);

        assert!(matches!(
            flow.tree.remove_step(flow.root),
            Err(EntityError::CannotRemove(_))
        ));
        flow.tree.remove_step(node_at(&flow, "spec.steps.0")).unwrap();
        assert_eq!(
            pipe.borrow().definition()["spec"]["steps"]
                .as_array()
                .map(Vec::len),
            Some(0)
        );
    }

    #[test]
    fn test_pipe_sink_validation() {
        let pipe = pipe_entity(json!({
            "pipe": {
                "metadata": { "name": "p" },
                "spec": { "source": { "uri": "timer:x" }, "sink": {} }
            }
        }));
        let flow = flow_of(&pipe);

        assert_eq!(flow.tree.len(), 2);
        assert_eq!(
            flow.tree
                .node_validation_text(node_at(&flow, "spec.sink"))
                .as_deref(),
            Some("sink requires a ref or a uri")
        );
    }
}
