//! Builder for `to_dict()` records.

use serde_json::{Map, Value as Json};

use super::Node;
use crate::Attributes;

/// Accumulates an order-preserving JSON object: `"type"` first, fields in
/// insertion order, `"children"` last and only when non-empty.
pub(crate) struct Record(Map<String, Json>);

impl Record {
    pub(crate) fn new(kind: &str) -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), Json::String(kind.to_string()));
        Record(map)
    }

    pub(crate) fn field(mut self, key: &str, value: impl Into<Json>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Absent optionals are kept as `null` so the key set is stable per variant.
    pub(crate) fn opt(mut self, key: &str, value: Option<&str>) -> Self {
        let value = value.map_or(Json::Null, |v| Json::String(v.to_string()));
        self.0.insert(key.to_string(), value);
        self
    }

    pub(crate) fn attrs(mut self, key: &str, attrs: &Attributes) -> Self {
        self.0.insert(key.to_string(), attrs.to_json());
        self
    }

    pub(crate) fn nodes(mut self, key: &str, nodes: &[Node]) -> Self {
        self.0.insert(key.to_string(), nodes_json(nodes));
        self
    }

    pub(crate) fn children(self, children: &[Node]) -> Json {
        if children.is_empty() {
            self.finish()
        } else {
            self.nodes("children", children).finish()
        }
    }

    pub(crate) fn finish(self) -> Json {
        Json::Object(self.0)
    }
}

pub(crate) fn nodes_json(nodes: &[Node]) -> Json {
    Json::Array(nodes.iter().map(Node::to_dict).collect())
}
