//! Decoded logical rows

use crate::Value;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// One decoded row: field name to value, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: IndexMap<Arc<str>, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Append a field. A repeated name replaces the earlier value in place.
    pub fn insert(&mut self, name: impl Into<Arc<str>>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_ref())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn into_fields(self) -> IndexMap<Arc<str>, Value> {
        self.fields
    }
}

impl From<IndexMap<Arc<str>, Value>> for Record {
    fn from(fields: IndexMap<Arc<str>, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<Arc<str>>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name.as_ref(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        [
            ("id", Value::Int64(1)),
            ("name", Value::String(Arc::from("a"))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_record_preserves_order() {
        let record = sample();
        assert_eq!(record.len(), 2);
        assert_eq!(record.field_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(record.get("id"), Some(&Value::Int64(1)));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_record_display() {
        assert_eq!(sample().to_string(), "{id: 1, name: \"a\"}");
        assert_eq!(Record::new().to_string(), "{}");
    }

    #[test]
    fn test_record_serialize() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"a"}"#);

        let mut record = Record::new();
        record.insert("missing", Value::Null);
        record.insert("tags", Value::List(vec![Value::Boolean(true)]));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"missing":null,"tags":[true]}"#
        );
    }
}
