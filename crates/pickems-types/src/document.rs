//! Document types for the per-tenant store.
//!
//! Every tenant owns exactly five documents, one per [`DocumentKind`]. Their
//! content is a [`DocumentValue`]: a JSON-like tree that keeps ordered maps and
//! plain records apart, so a map written to disk comes back as a map.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The five fixed documents stored per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    ReactionMap,
    Matchups,
    Settings,
    LastMatchupMessages,
    Weeks,
}

impl DocumentKind {
    /// All kinds, in initialization order.
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::ReactionMap,
        DocumentKind::Matchups,
        DocumentKind::Settings,
        DocumentKind::LastMatchupMessages,
        DocumentKind::Weeks,
    ];

    /// Document name as used on disk and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::ReactionMap => "reactionMap",
            DocumentKind::Matchups => "matchups",
            DocumentKind::Settings => "settings",
            DocumentKind::LastMatchupMessages => "lastMatchupMessages",
            DocumentKind::Weeks => "weeks",
        }
    }

    /// Fixed file name inside the tenant directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// The value shape this kind is stored as.
    pub fn shape(&self) -> Shape {
        match self {
            DocumentKind::ReactionMap | DocumentKind::Matchups => Shape::Map,
            DocumentKind::Settings | DocumentKind::LastMatchupMessages => Shape::Record,
            DocumentKind::Weeks => Shape::Sequence,
        }
    }

    /// The empty default written when the document is absent.
    pub fn empty_value(&self) -> DocumentValue {
        match self.shape() {
            Shape::Map => DocumentValue::Map(OrderedMap::new()),
            Shape::Record => DocumentValue::Record(OrderedMap::new()),
            Shape::Sequence => DocumentValue::Sequence(Vec::new()),
            Shape::Scalar => DocumentValue::null(),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown document kind: '{s}'"))
    }
}

/// Runtime shape of a [`DocumentValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Map,
    Record,
    Sequence,
    Scalar,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Map => write!(f, "map"),
            Shape::Record => write!(f, "record"),
            Shape::Sequence => write!(f, "sequence"),
            Shape::Scalar => write!(f, "scalar"),
        }
    }
}

/// String-keyed associative container that keeps insertion order.
///
/// Re-inserting an existing key replaces its value in place; removing a key
/// keeps the relative order of the remaining entries.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Convert every value, keeping keys and order. Stops at the first error.
    pub fn try_map_values<U, E>(
        self,
        mut f: impl FnMut(&str, V) -> Result<U, E>,
    ) -> Result<OrderedMap<U>, E> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for (key, value) in self.entries {
            let converted = f(&key, value)?;
            entries.push((key, converted));
        }
        Ok(OrderedMap { entries })
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Content of a stored document.
///
/// `Map` and `Record` hold the same data but differ on the wire: a map is
/// written in the tagged `{"dataType": "Map", ...}` form, a record as a plain
/// JSON object. `Scalar` only ever holds null, booleans, numbers, or strings.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Map(OrderedMap<DocumentValue>),
    Record(OrderedMap<DocumentValue>),
    Sequence(Vec<DocumentValue>),
    Scalar(serde_json::Value),
}

impl DocumentValue {
    pub fn null() -> Self {
        DocumentValue::Scalar(serde_json::Value::Null)
    }

    pub fn shape(&self) -> Shape {
        match self {
            DocumentValue::Map(_) => Shape::Map,
            DocumentValue::Record(_) => Shape::Record,
            DocumentValue::Sequence(_) => Shape::Sequence,
            DocumentValue::Scalar(_) => Shape::Scalar,
        }
    }

    /// Build a value from plain JSON: objects become records, arrays become
    /// sequences. No tag interpretation happens here.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(obj) => DocumentValue::Record(
                obj.into_iter()
                    .map(|(k, v)| (k, DocumentValue::from_json(v)))
                    .collect(),
            ),
            serde_json::Value::Array(items) => {
                DocumentValue::Sequence(items.into_iter().map(DocumentValue::from_json).collect())
            }
            scalar => DocumentValue::Scalar(scalar),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrderedMap<DocumentValue>> {
        match self {
            DocumentValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&OrderedMap<DocumentValue>> {
        match self {
            DocumentValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for DocumentValue {
    fn from(value: &str) -> Self {
        DocumentValue::Scalar(serde_json::Value::String(value.to_string()))
    }
}

impl From<String> for DocumentValue {
    fn from(value: String) -> Self {
        DocumentValue::Scalar(serde_json::Value::String(value))
    }
}

impl From<i64> for DocumentValue {
    fn from(value: i64) -> Self {
        DocumentValue::Scalar(serde_json::Value::from(value))
    }
}

impl From<bool> for DocumentValue {
    fn from(value: bool) -> Self {
        DocumentValue::Scalar(serde_json::Value::Bool(value))
    }
}
