use std::{fmt, rc::Rc};

use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap, ser::SerializeSeq};

use crate::runtime::{
    callable::Function, class::ClassRef, classify::LengthIndexed, instance::Instance,
    typed_array::TypedArray,
};

/// Associative container storage. Insertion order is kept so iteration is
/// deterministic, but callers must not rely on any particular order.
pub type MapStore = IndexMap<Rc<str>, Value>;

/// Runtime value handled by the iteration engine, the ordering engine and
/// class members.
///
/// ## Memory Management Model
///
/// Containers use `Rc` so cloning a value is O(1). They are copy-on-write:
/// helpers that modify a container go through `Rc::make_mut` and hand back
/// the updated value, leaving other holders of the old `Rc` untouched.
///
/// Instances are the only shared-mutable values. Their property store lives
/// behind a `RefCell` so that methods observe each other's writes.
#[derive(Debug, Clone)]
pub enum Value {
    /// Missing value (an absent key, an omitted argument).
    Undefined,
    /// Explicit absence of value.
    None,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    /// Ordered, 0-indexed sequence.
    Array(Rc<Vec<Value>>),
    /// Fixed-width numeric sequence.
    Typed(Rc<TypedArray>),
    /// Associative container keyed by strings.
    Map(Rc<MapStore>),
    /// Custom container exposing only a length and indexed access.
    Iterable(Rc<dyn LengthIndexed>),
    Function(Function),
    Class(ClassRef),
    Instance(Rc<Instance>),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    pub fn map<K: Into<Rc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn empty_map() -> Self {
        Value::Map(Rc::new(MapStore::new()))
    }

    /// Returns the canonical runtime type label used in diagnostics and builtins.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::None => "None",
            Value::Boolean(_) => "Bool",
            Value::Integer(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Typed(array) => array.type_name(),
            Value::Map(_) => "Map",
            Value::Iterable(_) => "Iterable",
            Value::Function(_) => "Function",
            Value::Class(_) => "Class",
            Value::Instance(_) => "Instance",
        }
    }

    /// Returns whether this value is truthy.
    ///
    /// `Undefined`, `None`, `false`, zero, NaN and the empty string are falsy;
    /// every container, function and instance is truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::None => false,
            Value::Boolean(b) => *b,
            Value::Integer(v) => *v != 0,
            Value::Float(v) => *v != 0.0 && !v.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Rc<Instance>> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Converts a value to interpolation-friendly string text.
    ///
    /// Unlike [`std::fmt::Display`], strings are returned without quotes.
    /// This form is also used when a value serves as a map key.
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(v) => v.to_string(),
            other => other.to_string(),
        }
    }
}

fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    let items: Vec<String> = items.map(|e| e.to_string()).collect();
    write!(f, "[{}]", items.join(", "))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::None => write!(f, "None"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Array(elements) => write_items(f, elements.iter()),
            Value::Typed(array) => write_items(f, array.to_values().iter()),
            Value::Map(pairs) => {
                let items: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("\"{}\": {}", k, v))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            Value::Iterable(_) => write!(f, "<iterable>"),
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Class(class) => write!(f, "<class {}>", class.display_name()),
            Value::Instance(instance) => {
                write!(f, "<{} instance>", instance.get_class().display_name())
            }
        }
    }
}

/// Structural equality for data, identity for functions, classes,
/// instances and custom iterables. `Integer(1) != Float(1.0)`; use
/// `ordering::equals` for the numeric-aware comparison.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::None, Value::None) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Typed(a), Value::Typed(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Iterable(a), Value::Iterable(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v.into())
    }
}

impl From<Rc<str>> for Value {
    fn from(v: Rc<str>) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::array(v)
    }
}

impl From<MapStore> for Value {
    fn from(v: MapStore) -> Self {
        Value::Map(Rc::new(v))
    }
}

impl From<TypedArray> for Value {
    fn from(v: TypedArray) -> Self {
        Value::Typed(Rc::new(v))
    }
}

impl From<Function> for Value {
    fn from(v: Function) -> Self {
        Value::Function(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => {
                Value::map(entries.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined
            | Value::None
            | Value::Iterable(_)
            | Value::Function(_)
            | Value::Class(_) => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Typed(array) => {
                let items = array.to_values();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in &items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries.iter() {
                    map.serialize_entry(&**k, v)?;
                }
                map.end()
            }
            Value::Instance(instance) => {
                let properties = instance.properties();
                let mut map = serializer.serialize_map(Some(properties.len()))?;
                for (k, v) in properties.iter() {
                    map.serialize_entry(&**k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(
            Value::array(vec![Value::Integer(1), Value::Integer(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(
            Value::map([("a", Value::Integer(1))]).to_string(),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn test_is_truthy() {
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(7).is_truthy());
        assert!(!Value::Float(f64::NAN).is_truthy());
        assert!(!Value::String("".into()).is_truthy());
        assert!(Value::String("x".into()).is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::None.is_truthy());
        assert!(!Value::Undefined.is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert!(Value::empty_map().is_truthy());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Integer(1).type_name(), "Int");
        assert_eq!(Value::Float(1.0).type_name(), "Float");
        assert_eq!(Value::Boolean(true).type_name(), "Bool");
        assert_eq!(Value::String("x".into()).type_name(), "String");
        assert_eq!(Value::None.type_name(), "None");
        assert_eq!(Value::Undefined.type_name(), "Undefined");
        assert_eq!(Value::array(vec![]).type_name(), "Array");
        assert_eq!(Value::empty_map().type_name(), "Map");
        assert_eq!(
            Value::from(TypedArray::Int32(vec![])).type_name(),
            "Int32Array"
        );
    }

    #[test]
    fn test_to_string_value() {
        assert_eq!(Value::String("hello".into()).to_string_value(), "hello");
        assert_eq!(
            Value::array(vec![Value::String("a".into()), Value::Integer(2)]).to_string_value(),
            "[\"a\", 2]"
        );
    }

    #[test]
    fn test_clone_shares_rc_for_array_and_map() {
        let array = Value::array(vec![Value::Integer(1), Value::Integer(2)]);
        let array_clone = array.clone();
        match (array, array_clone) {
            (Value::Array(left), Value::Array(right)) => {
                assert!(Rc::ptr_eq(&left, &right));
                assert_eq!(Rc::strong_count(&left), 2);
            }
            _ => panic!("expected array values"),
        }

        let map = Value::map([("k", Value::Integer(42))]);
        let map_clone = map.clone();
        match (map, map_clone) {
            (Value::Map(left), Value::Map(right)) => {
                assert!(Rc::ptr_eq(&left, &right));
                assert_eq!(Rc::strong_count(&left), 2);
            }
            _ => panic!("expected map values"),
        }
    }

    #[test]
    fn json_round_trip_keeps_key_order() {
        let json = serde_json::json!({"z": 1, "a": [true, null, 2.5], "m": "s"});
        let value = Value::from(json.clone());
        assert_eq!(serde_json::to_value(&value).unwrap(), json);
        match value {
            Value::Map(entries) => {
                let keys: Vec<&str> = entries.keys().map(|k| &**k).collect();
                assert_eq!(keys, vec!["z", "a", "m"]);
            }
            other => panic!("expected map, got {}", other),
        }
    }
}
