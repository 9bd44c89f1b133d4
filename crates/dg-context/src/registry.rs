//! Per-adapter property tables.
//!
//! Each adapter type owns one [`PropertyMap`], built once inside a
//! `LazyLock` and shared by every instance.

use std::collections::BTreeMap;

use crate::value::Value;

type Getter<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;

/// Name → accessor table for adapters of type `T`.
pub struct PropertyMap<T> {
    adapter: &'static str,
    getters: BTreeMap<&'static str, Getter<T>>,
}

impl<T> PropertyMap<T> {
    /// Empty table; `adapter` names the adapter in log lines.
    #[must_use]
    pub fn new(adapter: &'static str) -> Self {
        Self {
            adapter,
            getters: BTreeMap::new(),
        }
    }

    /// Register a property.
    ///
    /// A name registered twice keeps its first accessor; the duplicate is
    /// logged as an error.
    pub fn add(&mut self, name: &'static str, getter: impl Fn(&T) -> Value + Send + Sync + 'static) {
        if self.getters.contains_key(name) {
            tracing::error!(
                adapter = self.adapter,
                property = name,
                "Duplicate property registration"
            );
            return;
        }
        self.getters.insert(name, Box::new(getter));
    }

    /// Value of property `name` on `object`.
    ///
    /// Unknown names yield [`Value::None`]; templates probe optional properties.
    pub fn get(&self, object: &T, name: &str) -> Value {
        if let Some(getter) = self.getters.get(name) {
            getter(object)
        } else {
            tracing::debug!(adapter = self.adapter, property = name, "Unknown property");
            Value::None
        }
    }

    /// Sorted property names.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.getters.keys().copied().collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.getters.contains_key(name)
    }

    #[must_use]
    pub fn adapter(&self) -> &'static str {
        self.adapter
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Counter {
        value: i64,
    }

    fn map() -> PropertyMap<Counter> {
        let mut map = PropertyMap::new("Counter");
        map.add("value", |c: &Counter| Value::Int(c.value));
        map.add("double", |c: &Counter| Value::Int(c.value * 2));
        map.add("isZero", |c: &Counter| Value::Bool(c.value == 0));
        map
    }

    #[test]
    fn test_fields_sorted() {
        assert_eq!(map().fields(), vec!["double", "isZero", "value"]);
    }

    #[test]
    fn test_get_known_and_unknown() {
        let map = map();
        let counter = Counter { value: 4 };
        assert_eq!(map.get(&counter, "double").to_int(), 8);
        assert!(map.get(&counter, "triple").is_none());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut map = map();
        map.add("value", |_: &Counter| Value::Int(-1));
        assert_eq!(map.get(&Counter { value: 7 }, "value").to_int(), 7);
        assert_eq!(map.fields().len(), 3);
    }
}
