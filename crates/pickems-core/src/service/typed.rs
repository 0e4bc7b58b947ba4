//! Conversions between typed documents and [`DocumentValue`].
//!
//! Each typed document fixes its [`DocumentKind`] and checks, on the way in,
//! that the stored value has the shape that kind is written with. A mismatch
//! is reported as a plain message; the entity service attaches the file path.

use pickems_types::document::{DocumentKind, DocumentValue, OrderedMap, Shape};
use pickems_types::entities::{LastMatchupMessages, Matchups, ReactionMap, Weeks};
use pickems_types::settings::Settings;

use crate::codec::{from_wire, to_wire};

/// A document with a fixed kind and a typed Rust form.
pub trait TypedDocument: Sized + Default {
    const KIND: DocumentKind;

    /// Convert to the value written to disk.
    fn to_value(&self) -> Result<DocumentValue, String>;

    /// Convert a decoded value, rejecting values of the wrong shape.
    fn from_value(value: DocumentValue) -> Result<Self, String>;
}

fn shape_mismatch(kind: DocumentKind, found: Shape) -> String {
    format!("expected {} for {kind}, found {found}", kind.shape())
}

fn string_entries(map: OrderedMap<DocumentValue>) -> Result<OrderedMap<String>, String> {
    map.try_map_values(|key, value| match value {
        DocumentValue::Scalar(serde_json::Value::String(s)) => Ok(s),
        other => Err(format!("value for '{key}' must be a string, found {}", other.shape())),
    })
}

fn string_values(map: &OrderedMap<String>) -> OrderedMap<DocumentValue> {
    map.iter()
        .map(|(k, v)| (k, DocumentValue::from(v.as_str())))
        .collect()
}

impl TypedDocument for ReactionMap {
    const KIND: DocumentKind = DocumentKind::ReactionMap;

    fn to_value(&self) -> Result<DocumentValue, String> {
        Ok(DocumentValue::Map(string_values(&self.0)))
    }

    fn from_value(value: DocumentValue) -> Result<Self, String> {
        match value {
            DocumentValue::Map(map) => string_entries(map).map(ReactionMap),
            other => Err(shape_mismatch(Self::KIND, other.shape())),
        }
    }
}

impl TypedDocument for Matchups {
    const KIND: DocumentKind = DocumentKind::Matchups;

    fn to_value(&self) -> Result<DocumentValue, String> {
        Ok(DocumentValue::Map(self.0.clone()))
    }

    fn from_value(value: DocumentValue) -> Result<Self, String> {
        match value {
            DocumentValue::Map(map) => Ok(Matchups(map)),
            other => Err(shape_mismatch(Self::KIND, other.shape())),
        }
    }
}

impl TypedDocument for Weeks {
    const KIND: DocumentKind = DocumentKind::Weeks;

    fn to_value(&self) -> Result<DocumentValue, String> {
        Ok(DocumentValue::Sequence(self.0.clone()))
    }

    fn from_value(value: DocumentValue) -> Result<Self, String> {
        match value {
            DocumentValue::Sequence(items) => Ok(Weeks(items)),
            other => Err(shape_mismatch(Self::KIND, other.shape())),
        }
    }
}

impl TypedDocument for LastMatchupMessages {
    const KIND: DocumentKind = DocumentKind::LastMatchupMessages;

    fn to_value(&self) -> Result<DocumentValue, String> {
        Ok(DocumentValue::Record(string_values(&self.0)))
    }

    fn from_value(value: DocumentValue) -> Result<Self, String> {
        match value {
            DocumentValue::Record(record) => string_entries(record).map(LastMatchupMessages),
            other => Err(shape_mismatch(Self::KIND, other.shape())),
        }
    }
}

impl TypedDocument for Settings {
    const KIND: DocumentKind = DocumentKind::Settings;

    // Field values go through the wire form so nested maps and escaped
    // records survive the trip through serde. The top-level record itself is
    // never a wrapper.
    fn to_value(&self) -> Result<DocumentValue, String> {
        let object = match serde_json::to_value(self).map_err(|e| e.to_string())? {
            serde_json::Value::Object(object) => object,
            other => return Err(format!("settings serialized to {other}, not an object")),
        };
        let mut record = OrderedMap::new();
        for (key, value) in object {
            let decoded = from_wire(value).map_err(|e| format!("field '{key}': {e}"))?;
            record.insert(key, decoded);
        }
        Ok(DocumentValue::Record(record))
    }

    fn from_value(value: DocumentValue) -> Result<Self, String> {
        let record = match value {
            DocumentValue::Record(record) => record,
            other => return Err(shape_mismatch(Self::KIND, other.shape())),
        };
        let object: serde_json::Map<String, serde_json::Value> = record
            .iter()
            .map(|(k, v)| (k.to_string(), to_wire(v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| e.to_string())
    }
}

/// Check that `value` is acceptable content for `kind`.
pub fn validate(kind: DocumentKind, value: &DocumentValue) -> Result<(), String> {
    fn check<T: TypedDocument>(value: &DocumentValue) -> Result<(), String> {
        T::from_value(value.clone()).map(|_| ())
    }

    match kind {
        DocumentKind::ReactionMap => check::<ReactionMap>(value),
        DocumentKind::Matchups => check::<Matchups>(value),
        DocumentKind::Settings => check::<Settings>(value),
        DocumentKind::LastMatchupMessages => check::<LastMatchupMessages>(value),
        DocumentKind::Weeks => check::<Weeks>(value),
    }
}
