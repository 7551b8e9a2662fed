//! Addressing helpers over `serde_json::Value` documents.

use crate::error::EntityError;
use crate::visualization::{PathSegment, StepPath};
use serde_json::{Map, Value};

pub fn resolve<'a>(document: &'a Value, path: &StepPath) -> Option<&'a Value> {
    document.pointer(&path.to_pointer())
}

pub fn resolve_mut<'a>(document: &'a mut Value, path: &StepPath) -> Option<&'a mut Value> {
    document.pointer_mut(&path.to_pointer())
}

/// The only `(key, value)` pair of an object such as `{"log": {...}}`.
pub fn single_entry(value: &Value) -> Option<(&String, &Value)> {
    let object = value.as_object()?;
    if object.len() != 1 {
        return None;
    }
    object.iter().next()
}

pub fn str_prop<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Removes the value addressed by `path`. Returns `false` when nothing was there.
pub fn remove_at(document: &mut Value, path: &StepPath) -> bool {
    let (Some(parent_path), Some(last)) = (path.parent(), path.last()) else {
        return false;
    };
    let Some(parent) = resolve_mut(document, &parent_path) else {
        return false;
    };
    match (parent, last) {
        (Value::Array(items), PathSegment::Index(i)) if *i < items.len() => {
            items.remove(*i);
            true
        }
        (Value::Object(map), PathSegment::Key(key)) => map.remove(key).is_some(),
        _ => false,
    }
}

/// Inserts `value` at `index` of the array stored under `key` in the object at
/// `owner`, creating the array when it does not exist yet.
pub fn insert_into_array(
    document: &mut Value,
    owner: &StepPath,
    key: &str,
    index: usize,
    value: Value,
) -> Result<(), EntityError> {
    let map = resolve_mut(document, owner)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| EntityError::PathNotFound(owner.to_string()))?;
    let items = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    let Value::Array(items) = items else {
        return Err(EntityError::InvalidModel {
            path: owner.key(key).to_string(),
            reason: "expected an array".to_string(),
        });
    };
    let index = index.min(items.len());
    items.insert(index, value);
    Ok(())
}

/// Replaces the object at `path` with `value`, keeping the listed structural keys
/// of the previous object so nested steps survive a property update.
pub fn replace_properties(
    document: &mut Value,
    path: &StepPath,
    value: Value,
    preserved: &[&str],
) -> Result<(), EntityError> {
    let Value::Object(mut incoming) = value else {
        return Err(EntityError::InvalidModel {
            path: path.to_string(),
            reason: "expected an object".to_string(),
        });
    };
    let target = resolve_mut(document, path)
        .ok_or_else(|| EntityError::PathNotFound(path.to_string()))?;
    let previous = std::mem::replace(target, Value::Null);
    let previous: Map<String, Value> = match previous {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for key in preserved {
        if let Some(kept) = previous.get(*key) {
            incoming.insert((*key).to_string(), kept.clone());
        }
    }
    *target = Value::Object(incoming);
    Ok(())
}
