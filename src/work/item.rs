use core::fmt;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a [`WorkItem`].
///
/// Items loaded from a plain list of payloads are identified by their
/// position, items loaded from keyed records keep the caller's key.
/// Positions display as `#3`, keys quoted as `"doc-7"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Index(usize),
    Key(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Index(i) => write!(f, "#{i}"),
            ItemId::Key(k) => write!(f, "{k:?}"),
        }
    }
}

impl From<usize> for ItemId {
    fn from(index: usize) -> Self {
        ItemId::Index(index)
    }
}

impl From<&str> for ItemId {
    fn from(key: &str) -> Self {
        ItemId::Key(key.to_string())
    }
}

impl From<String> for ItemId {
    fn from(key: String) -> Self {
        ItemId::Key(key)
    }
}

/// A labeled result attached to a work item by a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// A single label or free text (e.g. `"negative"`, a summary).
    Text(String),
    /// A list of labels (e.g. tags, named entities).
    List(Vec<String>),
    /// Nested key/value structure (e.g. `{"people": [...], "places": [...]}`).
    Map(BTreeMap<String, AnnotationValue>),
    /// Sentinel written when the producing call failed.
    Empty,
}

impl AnnotationValue {
    /// `true` for the failure sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, AnnotationValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Text(s) => write!(f, "{s}"),
            AnnotationValue::List(l) => write!(f, "[{}]", l.join(", ")),
            AnnotationValue::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            AnnotationValue::Empty => write!(f, "<empty>"),
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(s: &str) -> Self {
        AnnotationValue::Text(s.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(s: String) -> Self {
        AnnotationValue::Text(s)
    }
}

impl From<Vec<String>> for AnnotationValue {
    fn from(l: Vec<String>) -> Self {
        AnnotationValue::List(l)
    }
}

impl From<Vec<&str>> for AnnotationValue {
    fn from(l: Vec<&str>) -> Self {
        AnnotationValue::List(l.into_iter().map(String::from).collect())
    }
}

impl From<Value> for AnnotationValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AnnotationValue::Empty,
            Value::String(s) => AnnotationValue::Text(s),
            Value::Bool(b) => AnnotationValue::Text(b.to_string()),
            Value::Number(n) => AnnotationValue::Text(n.to_string()),
            Value::Array(values) => AnnotationValue::List(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::Object(map) => AnnotationValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, AnnotationValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// One unit of content flowing through a pipeline run.
///
/// `id`, `payload` and `metadata` are fixed at creation. Annotations are
/// only written by the pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    id: ItemId,
    payload: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
    #[serde(default)]
    annotations: HashMap<String, AnnotationValue>,
}

impl WorkItem {
    pub fn new<I, P>(id: I, payload: P) -> Self
    where
        I: Into<ItemId>,
        P: Into<String>,
    {
        Self {
            id: id.into(),
            payload: payload.into(),
            metadata: Map::new(),
            annotations: HashMap::new(),
        }
    }

    /// Attach source metadata (file name, page number, ...) at creation.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn annotations(&self) -> &HashMap<String, AnnotationValue> {
        &self.annotations
    }

    pub fn annotation(&self, key: &str) -> Option<&AnnotationValue> {
        self.annotations.get(key)
    }

    /// Overwrites any prior value stored under `key`.
    pub(crate) fn set_annotation<K>(&mut self, key: K, value: AnnotationValue)
    where
        K: Into<String>,
    {
        self.annotations.insert(key.into(), value);
    }
}
