//! The value type crossing into template engines.
//!
//! Every property lookup yields a [`Value`]. Conversions are total: asking a
//! scalar for list access, or a list for a number, produces an empty or
//! default result instead of an error.

use std::fmt;
use std::sync::Arc;

/// Late-bound property taking positional arguments.
pub type Callable = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Ordered collection exposed to templates.
pub trait ListContext: Send + Sync {
    /// Number of elements.
    fn count(&self) -> usize;

    /// Element at `index`; [`Value::None`] when out of range.
    fn at(&self, index: usize) -> Value;
}

/// Object with named properties exposed to templates.
pub trait StructContext: Send + Sync {
    /// Property value; [`Value::None`] for unknown names.
    fn get(&self, name: &str) -> Value;

    /// Sorted, deduplicated property names.
    fn fields(&self) -> Vec<&'static str>;
}

/// Dynamically typed template value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    String(Arc<str>),
    List(Arc<dyn ListContext>),
    Struct(Arc<dyn StructContext>),
    Function(Arc<Callable>),
}

impl Value {
    /// List value over already computed elements.
    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Arc::new(GenericList::new(items)))
    }

    /// Struct value wrapping an adapter.
    #[must_use]
    pub fn from_struct<T: StructContext + 'static>(context: T) -> Self {
        Self::Struct(Arc::new(context))
    }

    /// Callable value.
    #[must_use]
    pub fn function(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// Name of the variant, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
            Self::Function(_) => "function",
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Truthiness: empty strings, empty lists, zero and `none` are false.
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::String(s) => !s.is_empty(),
            Self::List(list) => list.count() > 0,
            Self::Struct(_) | Self::Function(_) => true,
        }
    }

    /// Integer conversion: strings are parsed, lists give their length.
    #[must_use]
    pub fn to_int(&self) -> i64 {
        match self {
            Self::None | Self::Struct(_) | Self::Function(_) => 0,
            Self::Bool(b) => i64::from(*b),
            Self::Int(i) => *i,
            Self::String(s) => s.trim().parse().unwrap_or(0),
            Self::List(list) => i64::try_from(list.count()).unwrap_or(i64::MAX),
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&Arc<dyn ListContext>> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&Arc<dyn StructContext>> {
        match self {
            Self::Struct(context) => Some(context),
            _ => None,
        }
    }

    /// Property of a struct value; [`Value::None`] for any other variant.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.as_struct()
            .map_or(Value::None, |context| context.get(name))
    }

    /// Call a function value; other variants yield [`Value::None`].
    #[must_use]
    pub fn call(&self, args: &[Value]) -> Value {
        match self {
            Self::Function(f) => f(args),
            _ => {
                tracing::debug!(kind = self.type_name(), "Value is not callable");
                Value::None
            }
        }
    }

    /// Cursor over a list value, positioned before the first element.
    #[must_use]
    pub fn cursor(&self) -> Option<ListCursor> {
        self.as_list().map(|list| ListCursor::new(Arc::clone(list)))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
            Self::List(_) => f.write_str("[list]"),
            Self::Struct(_) => f.write_str("[struct]"),
            Self::Function(_) => f.write_str("[function]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::List(list) => f.debug_struct("List").field("count", &list.count()).finish(),
            Self::Struct(context) => f
                .debug_struct("Struct")
                .field("fields", &context.fields().len())
                .finish(),
            Self::Function(_) => f.write_str("Function"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::String(value)
    }
}

/// List over a vector of values.
#[derive(Debug, Default)]
pub struct GenericList {
    items: Vec<Value>,
}

impl GenericList {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl ListContext for GenericList {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn at(&self, index: usize) -> Value {
        self.items.get(index).cloned().unwrap_or_default()
    }
}

/// Bidirectional cursor over a list.
pub struct ListCursor {
    list: Arc<dyn ListContext>,
    position: Option<usize>,
}

impl ListCursor {
    #[must_use]
    pub fn new(list: Arc<dyn ListContext>) -> Self {
        Self {
            list,
            position: None,
        }
    }

    pub fn to_first(&mut self) {
        self.position = (self.list.count() > 0).then_some(0);
    }

    pub fn to_last(&mut self) {
        self.position = self.list.count().checked_sub(1);
    }

    /// Advance; moving past the last element invalidates the cursor.
    pub fn to_next(&mut self) {
        let count = self.list.count();
        self.position = self
            .position
            .map(|i| i + 1)
            .filter(|&i| i < count);
    }

    /// Step back; moving before the first element invalidates the cursor.
    pub fn to_prev(&mut self) {
        self.position = self.position.and_then(|i| i.checked_sub(1));
    }

    /// Element under the cursor, if it points at one.
    #[must_use]
    pub fn current(&self) -> Option<Value> {
        self.position.map(|i| self.list.at(i))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Point;

    impl StructContext for Point {
        fn get(&self, name: &str) -> Value {
            match name {
                "x" => Value::Int(3),
                _ => Value::None,
            }
        }

        fn fields(&self) -> Vec<&'static str> {
            vec!["x"]
        }
    }

    #[test]
    fn test_to_string_rules() {
        assert_eq!(Value::None.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::list(Vec::new()).to_string(), "[list]");
        assert_eq!(Value::from_struct(Point).to_string(), "[struct]");
        assert_eq!(Value::function(|_| Value::None).to_string(), "[function]");
    }

    #[test]
    fn test_to_bool_and_to_int() {
        assert!(!Value::None.to_bool());
        assert!(!Value::from("").to_bool());
        assert!(Value::from("0").to_bool());
        assert!(!Value::list(Vec::new()).to_bool());
        assert!(Value::list(vec![Value::None]).to_bool());
        assert_eq!(Value::from(" 42 ").to_int(), 42);
        assert_eq!(Value::from("x").to_int(), 0);
        assert_eq!(Value::Bool(true).to_int(), 1);
        assert_eq!(Value::list(vec![Value::None, Value::None]).to_int(), 2);
    }

    #[test]
    fn test_wrong_kind_access_is_empty() {
        assert!(Value::Int(1).as_list().is_none());
        assert!(Value::Int(1).get("x").is_none());
        assert!(Value::from("f").call(&[]).is_none());
        assert!(Value::Bool(true).cursor().is_none());
        assert_eq!(Value::from_struct(Point).get("x").to_int(), 3);
        assert!(Value::from_struct(Point).get("y").is_none());
    }

    #[test]
    fn test_cursor_walks_both_ways() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let mut cursor = list.cursor().unwrap();
        assert!(cursor.current().is_none());

        cursor.to_first();
        assert_eq!(cursor.current().map(|v| v.to_int()), Some(1));
        cursor.to_next();
        cursor.to_next();
        assert_eq!(cursor.current().map(|v| v.to_int()), Some(3));
        cursor.to_next();
        assert!(cursor.current().is_none());

        cursor.to_last();
        cursor.to_prev();
        assert_eq!(cursor.current().map(|v| v.to_int()), Some(2));
        cursor.to_prev();
        cursor.to_prev();
        assert!(cursor.current().is_none());
    }

    #[test]
    fn test_out_of_range_at_is_none() {
        let list = GenericList::new(vec![Value::Int(1)]);
        assert!(list.at(5).is_none());
    }

    #[test]
    fn test_call_passes_arguments() {
        let add = Value::function(|args| {
            Value::Int(args.iter().map(Value::to_int).sum())
        });
        assert_eq!(add.call(&[Value::Int(2), Value::from("5")]).to_int(), 7);
    }
}
