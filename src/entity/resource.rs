use super::contract::SharedEntity;
use super::pipe::PipeEntity;
use super::route::RouteEntity;
use crate::error::ConversionError;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// A trait for data that can be turned into a visual entity.
///
/// This is the conversion boundary between raw resource documents and the
/// visualization layer. Anything the layer does not know how to draw is
/// rejected here instead of being silently skipped.
pub trait IntoVisualEntity {
    fn into_visual_entity(self) -> Result<SharedEntity, ConversionError>;
}

/// A single-key resource object such as `{"route": {...}}` or `{"pipe": {...}}`.
impl IntoVisualEntity for Value {
    fn into_visual_entity(self) -> Result<SharedEntity, ConversionError> {
        entity_from_resource(0, self)
    }
}

/// Parses a JSON document holding one resource or an array of resources.
pub fn load_entities(json: &str) -> Result<Vec<SharedEntity>, ConversionError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))?;
    entities_from_value(value)
}

pub fn entities_from_value(value: Value) -> Result<Vec<SharedEntity>, ConversionError> {
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let entities = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| entity_from_resource(index, item))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = entities.len(), "Loaded entities");
    Ok(entities)
}

fn entity_from_resource(index: usize, item: Value) -> Result<SharedEntity, ConversionError> {
    let Value::Object(map) = item else {
        return Err(ConversionError::InvalidResource {
            index,
            reason: "expected an object".to_string(),
        });
    };
    if map.len() != 1 {
        return Err(ConversionError::InvalidResource {
            index,
            reason: format!("expected exactly one resource key, found {}", map.len()),
        });
    }
    let Some((kind, definition)) = map.into_iter().next() else {
        return Err(ConversionError::InvalidResource {
            index,
            reason: "empty resource".to_string(),
        });
    };

    let entity: SharedEntity = match kind.as_str() {
        "route" => Rc::new(RefCell::new(RouteEntity::new(definition)?)),
        "pipe" => Rc::new(RefCell::new(PipeEntity::new(definition)?)),
        _ => return Err(ConversionError::UnsupportedEntity { kind }),
    };
    Ok(entity)
}
