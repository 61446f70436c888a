//! Ordered attribute lists.

use serde_json::{Map, Value as Json};

/// Attributes of an element in document order.
///
/// Markup attributes are few per element, so a `Vec` beats a map here and
/// keeps the order the author wrote them in (which `to_dict()` and component
/// props both preserve).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    /// Look up an attribute value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of these attributes without the listed keys.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Attributes {
        self.0
            .iter()
            .filter(|(k, _)| !keys.contains(&k.as_str()))
            .cloned()
            .collect()
    }

    /// JSON object in document order.
    pub fn to_json(&self) -> Json {
        let mut map = Map::with_capacity(self.0.len());
        for (k, v) in &self.0 {
            map.insert(k.clone(), Json::String(v.clone()));
        }
        Json::Object(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut attrs: Attributes = [("a", "1"), ("b", "2")].into_iter().collect();
        attrs.insert("a", "3");
        let keys: Vec<_> = attrs.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(attrs.get("a"), Some("3"));
    }

    #[test]
    fn test_without() {
        let attrs: Attributes = [("function", "add"), ("x", "1"), ("result", "r")]
            .into_iter()
            .collect();
        let args = attrs.without(&["function", "result"]);
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("x"), Some("1"));
    }

    #[test]
    fn test_json_preserves_order() {
        let attrs: Attributes = [("z", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(attrs.to_json().to_string(), r#"{"z":"1","a":"2"}"#);
    }
}
