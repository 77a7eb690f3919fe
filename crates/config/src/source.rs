//! Untyped source values that remember duplicate keys.
//!
//! `serde_json::Value` keeps the last of two equal keys. The loader reads
//! nested sections through [`SourceValue`] instead, which records the path of
//! the first duplicate so validation can refuse it by name.

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceValue {
    pub(crate) value: Value,
    /// Path of the first repeated key, relative to this value.
    pub(crate) duplicate: Option<String>,
}

impl SourceValue {
    fn plain(value: Value) -> Self {
        Self {
            value,
            duplicate: None,
        }
    }
}

/// Append `child` to a dotted field path.
pub(crate) fn join(parent: &str, child: &str) -> String {
    if child.starts_with('[') {
        format!("{parent}{child}")
    } else {
        format!("{parent}.{child}")
    }
}

impl<'de> Deserialize<'de> for SourceValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SourceValueVisitor)
    }
}

struct SourceValueVisitor;

impl<'de> Visitor<'de> for SourceValueVisitor {
    type Value = SourceValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any configuration value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(Value::Bool(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(Value::Number(v.into())))
    }

    fn visit_u64<E>(self, v: u64) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(Value::Number(v.into())))
    }

    fn visit_f64<E>(self, v: f64) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(
            Number::from_f64(v).map_or(Value::Null, Value::Number),
        ))
    }

    fn visit_str<E>(self, v: &str) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(Value::String(v.to_string())))
    }

    fn visit_string<E>(self, v: String) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(Value::String(v)))
    }

    fn visit_unit<E>(self) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(Value::Null))
    }

    fn visit_none<E>(self) -> Result<SourceValue, E> {
        Ok(SourceValue::plain(Value::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<SourceValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        SourceValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<SourceValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        let mut duplicate = None;
        while let Some(item) = seq.next_element::<SourceValue>()? {
            if duplicate.is_none() {
                duplicate = item
                    .duplicate
                    .map(|path| join(&format!("[{}]", items.len()), &path));
            }
            items.push(item.value);
        }
        Ok(SourceValue {
            value: Value::Array(items),
            duplicate,
        })
    }

    fn visit_map<A>(self, mut map: A) -> Result<SourceValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = BTreeSet::new();
        let mut object = Map::new();
        let mut duplicate = None;
        while let Some((key, item)) = map.next_entry::<String, SourceValue>()? {
            if duplicate.is_none() {
                if !seen.insert(key.clone()) {
                    duplicate = Some(key.clone());
                } else if let Some(path) = &item.duplicate {
                    duplicate = Some(join(&key, path));
                }
            }
            object.insert(key, item.value);
        }
        Ok(SourceValue {
            value: Value::Object(object),
            duplicate,
        })
    }
}
