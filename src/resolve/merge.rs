//! Shallow, left-to-right merge of configuration layers

use serde_json::{Map, Value};

/// Combine `layers` earliest-first into one object.
///
/// Every top-level key of a later layer replaces the accumulated value wholesale;
/// nested objects and arrays are never merged field by field. An overwritten key keeps
/// the position it first appeared at, new keys are appended in layer order.
pub fn merge_layers<'a, I>(layers: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Borrow `value` as a layer, treating anything but an object as an empty layer.
pub fn as_layer(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}
