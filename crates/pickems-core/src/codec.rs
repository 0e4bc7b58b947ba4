//! Typed document codec.
//!
//! Converts [`DocumentValue`] trees to pretty-printed JSON and back. Plain
//! JSON has no way to tell an ordered map from a record, so maps are written
//! in a tagged wrapper:
//!
//! ```json
//! { "dataType": "Map", "value": [["k1", 1], ["k2", 2]] }
//! ```
//!
//! Only objects with exactly the two keys `dataType` and `value` are treated
//! as wrappers. A record that happens to have that exact shape is escaped on
//! encode as `{"dataType": "Record", "value": {...}}` and unwrapped on decode,
//! so every value round-trips. Legacy files never contain the `Record` tag;
//! a literal record `{"dataType": "Record", "value": {...}}` in such a file
//! would be unwrapped one level.

use pickems_types::document::{DocumentValue, OrderedMap};
use pickems_types::error::CodecError;
use serde_json::{Map, Value};

/// Wrapper key holding the type tag.
pub const TAG_KEY: &str = "dataType";
/// Wrapper key holding the payload.
pub const VALUE_KEY: &str = "value";
/// Tag for ordered maps; payload is an array of `[key, value]` pairs.
pub const MAP_TAG: &str = "Map";
/// Tag for escaped records; payload is the original object.
pub const RECORD_TAG: &str = "Record";

/// Encode a value as pretty-printed (2-space) JSON bytes.
pub fn encode(value: &DocumentValue) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec_pretty(&to_wire(value)).map_err(|e| CodecError::Serialize(e.to_string()))
}

/// Decode JSON bytes, reconstructing tagged maps and escaped records.
pub fn decode(bytes: &[u8]) -> Result<DocumentValue, CodecError> {
    let wire: Value = serde_json::from_slice(bytes).map_err(|e| {
        let message = e.to_string();
        let message = match message.rfind(" at line ") {
            Some(idx) => message[..idx].to_string(),
            None => message,
        };
        CodecError::Syntax {
            line: e.line(),
            column: e.column(),
            message,
        }
    })?;
    from_wire(wire)
}

/// Convert a value to its JSON wire form (tagged maps, escaped records).
pub fn to_wire(value: &DocumentValue) -> Value {
    match value {
        DocumentValue::Map(map) => {
            let pairs = map
                .iter()
                .map(|(k, v)| Value::Array(vec![Value::String(k.to_string()), to_wire(v)]))
                .collect();
            tagged(MAP_TAG, Value::Array(pairs))
        }
        DocumentValue::Record(record) => {
            let object: Map<String, Value> = record
                .iter()
                .map(|(k, v)| (k.to_string(), to_wire(v)))
                .collect();
            if collides_with_wrapper(record) {
                tagged(RECORD_TAG, Value::Object(object))
            } else {
                Value::Object(object)
            }
        }
        DocumentValue::Sequence(items) => Value::Array(items.iter().map(to_wire).collect()),
        DocumentValue::Scalar(scalar) => scalar.clone(),
    }
}

/// Convert a JSON wire value back into a [`DocumentValue`].
pub fn from_wire(value: Value) -> Result<DocumentValue, CodecError> {
    decode_node(value, "")
}

#[derive(Clone, Copy)]
enum Wrapper {
    Map,
    Record,
}

fn tagged(tag: &str, payload: Value) -> Value {
    let mut object = Map::new();
    object.insert(TAG_KEY.to_string(), Value::String(tag.to_string()));
    object.insert(VALUE_KEY.to_string(), payload);
    Value::Object(object)
}

fn collides_with_wrapper(record: &OrderedMap<DocumentValue>) -> bool {
    record.len() == 2
        && record.contains_key(VALUE_KEY)
        && matches!(
            record.get(TAG_KEY).and_then(|tag| tag.as_str()),
            Some(MAP_TAG | RECORD_TAG)
        )
}

fn wrapper_kind(object: &Map<String, Value>) -> Option<Wrapper> {
    if object.len() != 2 || !object.contains_key(VALUE_KEY) {
        return None;
    }
    match object.get(TAG_KEY)?.as_str()? {
        MAP_TAG => Some(Wrapper::Map),
        RECORD_TAG => Some(Wrapper::Record),
        _ => None,
    }
}

/// Append a reference token to a JSON pointer (RFC 6901 escaping).
fn child_pointer(pointer: &str, token: &str) -> String {
    format!("{pointer}/{}", token.replace('~', "~0").replace('/', "~1"))
}

fn decode_node(value: Value, pointer: &str) -> Result<DocumentValue, CodecError> {
    match value {
        Value::Object(mut object) => match wrapper_kind(&object) {
            Some(Wrapper::Map) => {
                let payload = object.remove(VALUE_KEY).unwrap_or(Value::Null);
                decode_map(payload, &child_pointer(pointer, VALUE_KEY))
            }
            Some(Wrapper::Record) => {
                let payload_pointer = child_pointer(pointer, VALUE_KEY);
                match object.remove(VALUE_KEY) {
                    Some(Value::Object(inner)) => decode_record(inner, &payload_pointer),
                    _ => Err(CodecError::Shape {
                        pointer: payload_pointer,
                        message: "escaped record payload must be an object".to_string(),
                    }),
                }
            }
            None => decode_record(object, pointer),
        },
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| decode_node(item, &child_pointer(pointer, &i.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(DocumentValue::Sequence),
        scalar => Ok(DocumentValue::Scalar(scalar)),
    }
}

fn decode_record(object: Map<String, Value>, pointer: &str) -> Result<DocumentValue, CodecError> {
    let mut record = OrderedMap::new();
    for (key, value) in object {
        let decoded = decode_node(value, &child_pointer(pointer, &key))?;
        record.insert(key, decoded);
    }
    Ok(DocumentValue::Record(record))
}

fn decode_map(payload: Value, pointer: &str) -> Result<DocumentValue, CodecError> {
    let Value::Array(pairs) = payload else {
        return Err(CodecError::Shape {
            pointer: pointer.to_string(),
            message: "map payload must be an array of [key, value] pairs".to_string(),
        });
    };

    let mut map = OrderedMap::new();
    for (i, pair) in pairs.into_iter().enumerate() {
        let pair_pointer = child_pointer(pointer, &i.to_string());
        let (key, value) = match pair {
            Value::Array(mut entry) if entry.len() == 2 => {
                let value = entry.pop().unwrap_or(Value::Null);
                let key = entry.pop().unwrap_or(Value::Null);
                (key, value)
            }
            _ => {
                return Err(CodecError::Shape {
                    pointer: pair_pointer,
                    message: "map entry must be a [key, value] pair".to_string(),
                });
            }
        };
        let Value::String(key) = key else {
            return Err(CodecError::Shape {
                pointer: child_pointer(&pair_pointer, "0"),
                message: "map key must be a string".to_string(),
            });
        };
        let decoded = decode_node(value, &child_pointer(&pair_pointer, "1"))?;
        // Duplicate keys: last value wins, first position is kept.
        map.insert(key, decoded);
    }
    Ok(DocumentValue::Map(map))
}
