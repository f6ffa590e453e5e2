//! Records, identifiers and the document store
//!
//! The store is a plain value: an ordered map from resource name to an ordered
//! collection of records, plus any other top-level values kept as they are. It is loaded fresh for every request, handed to the
//! engine, and handed back (possibly mutated) to the persistence layer.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// Name of the identifier field carried by every record
pub const ID_FIELD: &str = "id";

/// A record identifier, either textual or integral
///
/// Path segments are always strings while stored identifiers may be numbers
/// (historical data) or strings (generated ids). Both forms of the same
/// identifier compare equal through [`RecordId::matches_segment`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Text(String),
    Integer(i64),
}

impl RecordId {
    /// Read an identifier from a stored JSON value
    ///
    /// Strings and integral numbers are identifiers; any other shape is not.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(RecordId::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(RecordId::Integer),
            _ => None,
        }
    }

    /// Check whether a raw path segment designates this identifier
    pub fn matches_segment(&self, segment: &str) -> bool {
        match self {
            RecordId::Text(text) => text == segment,
            RecordId::Integer(n) => segment.parse::<i64>().is_ok_and(|parsed| parsed == *n),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Text(text) => Value::String(text.clone()),
            RecordId::Integer(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(text) => write!(f, "{}", text),
            RecordId::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Integer(value)
    }
}

/// One entry of a collection: an open-ended, order-preserving field map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Insert or overwrite a field, keeping the position of an existing key
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    /// The record identifier, if the `id` field holds a usable one
    pub fn id(&self) -> Option<RecordId> {
        self.get(ID_FIELD).and_then(RecordId::from_value)
    }

    /// Whether this record is addressed by the given path segment
    pub fn has_id(&self, segment: &str) -> bool {
        self.id().is_some_and(|id| id.matches_segment(segment))
    }

    /// Whether the named field holds a sequence (a nested collection)
    pub fn has_nested(&self, field: &str) -> bool {
        matches!(self.get(field), Some(Value::Array(_)))
    }

    /// Child records of a nested collection field
    ///
    /// Returns an empty vector when the field is absent or not a sequence.
    /// Children that are not JSON objects are skipped.
    pub fn nested_records(&self, field: &str) -> Vec<Record> {
        match self.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned().map(Record))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// One top-level value of the store
///
/// Arrays of objects are record collections. Any other value is kept as it
/// was read so that saving the store writes it back untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum Slot {
    Records(Vec<Record>),
    Raw(Value),
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) if items.iter().all(Value::is_object) => Slot::Records(
                items
                    .into_iter()
                    .filter_map(|item| Record::try_from(item).ok())
                    .collect(),
            ),
            other => Slot::Raw(other),
        }
    }
}

/// Mapping from resource name to its ordered collection of records
///
/// The document must be a JSON object. Its values that are arrays of objects
/// are collections; other values are carried along verbatim and are not
/// writable resources.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Store {
    slots: IndexMap<String, Slot>,
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            slots: raw
                .into_iter()
                .map(|(name, value)| (name, Slot::from(value)))
                .collect(),
        })
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a store from a JSON document
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.slots
                .iter()
                .map(|(name, slot)| {
                    let value = match slot {
                        Slot::Records(records) => {
                            Value::Array(records.iter().cloned().map(Record::into_value).collect())
                        }
                        Slot::Raw(value) => value.clone(),
                    };
                    (name.clone(), value)
                })
                .collect(),
        )
    }

    pub fn contains(&self, resource: &str) -> bool {
        self.slots.contains_key(resource)
    }

    /// Records of a resource, for reading
    ///
    /// An array holding some non-object elements reads as its object elements
    /// only. A key whose value is not an array is not a collection.
    pub fn collection(&self, resource: &str) -> Option<Cow<'_, [Record]>> {
        match self.slots.get(resource)? {
            Slot::Records(records) => Some(Cow::Borrowed(records.as_slice())),
            Slot::Raw(Value::Array(items)) => Some(Cow::Owned(
                items
                    .iter()
                    .filter_map(|item| Record::try_from(item.clone()).ok())
                    .collect(),
            )),
            Slot::Raw(_) => None,
        }
    }

    /// Records of a resource, for writing
    ///
    /// Only arrays made entirely of objects are writable.
    pub fn collection_mut(&mut self, resource: &str) -> Option<&mut Vec<Record>> {
        match self.slots.get_mut(resource)? {
            Slot::Records(records) => Some(records),
            Slot::Raw(_) => None,
        }
    }

    /// Get a collection, creating it empty (at the end) on first write
    ///
    /// `None` when the key already holds something other than a collection.
    pub fn ensure_collection(&mut self, resource: &str) -> Option<&mut Vec<Record>> {
        match self
            .slots
            .entry(resource.to_string())
            .or_insert_with(|| Slot::Records(Vec::new()))
        {
            Slot::Records(records) => Some(records),
            Slot::Raw(_) => None,
        }
    }

    pub fn insert_collection(&mut self, resource: impl Into<String>, records: Vec<Record>) {
        self.slots.insert(resource.into(), Slot::Records(records));
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Position of the first record addressed by `segment`
pub fn position_of(records: &[Record], segment: &str) -> Option<usize> {
    records.iter().position(|record| record.has_id(segment))
}
