//! Value classification.
//!
//! Every consumer in the iteration and ordering engines dispatches on
//! [`Kind`] instead of probing the value's shape again. Classification is
//! total and has no side effects: an instance is only inspected through its
//! class's member tables, never called.

use std::fmt;

use crate::runtime::{error::RuntimeError, value::Value};

/// Method names that make an instance a generic iterable.
pub const LENGTH_MEMBER: &str = "length";
pub const AT_MEMBER: &str = "at";

/// Container that only exposes a length and indexed access.
pub trait LengthIndexed: fmt::Debug {
    fn length(&self) -> Result<usize, RuntimeError>;
    fn at(&self, index: usize) -> Result<Value, RuntimeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Sequence,
    Associative,
    GenericIterable,
    Scalar,
    Function,
    Instance,
    Undefined,
    None,
}

impl Kind {
    pub fn label(self) -> &'static str {
        match self {
            Kind::Sequence => "sequence",
            Kind::Associative => "associative",
            Kind::GenericIterable => "iterable",
            Kind::Scalar => "scalar",
            Kind::Function => "function",
            Kind::Instance => "instance",
            Kind::Undefined => "undefined",
            Kind::None => "none",
        }
    }

    /// Sequence, associative container or generic iterable.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Kind::Sequence | Kind::Associative | Kind::GenericIterable
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Undefined => Kind::Undefined,
        Value::None => Kind::None,
        Value::Boolean(_) | Value::Integer(_) | Value::Float(_) | Value::String(_) => Kind::Scalar,
        Value::Array(_) | Value::Typed(_) => Kind::Sequence,
        Value::Map(_) => Kind::Associative,
        Value::Iterable(_) => Kind::GenericIterable,
        Value::Function(_) | Value::Class(_) => Kind::Function,
        Value::Instance(instance) => {
            let class = instance.get_class();
            if class.responds_to(LENGTH_MEMBER) && class.responds_to(AT_MEMBER) {
                Kind::GenericIterable
            } else {
                Kind::Instance
            }
        }
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        classify(self)
    }

    /// Returns the length/at view of a generic iterable.
    pub fn as_length_indexed(&self) -> Option<&dyn LengthIndexed> {
        match self {
            Value::Iterable(iterable) => Some(&**iterable),
            Value::Instance(instance) if classify(self) == Kind::GenericIterable => {
                Some(&**instance)
            }
            _ => None,
        }
    }
}

/// Number of elements, keys or characters; zero for everything without a
/// notion of length.
pub fn length(value: &Value) -> Result<usize, RuntimeError> {
    Ok(match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Typed(array) => array.len(),
        Value::Map(entries) => entries.len(),
        Value::Instance(instance) => match value.as_length_indexed() {
            Some(indexed) => indexed.length()?,
            None => instance.property_names().len(),
        },
        Value::Iterable(iterable) => iterable.length()?,
        _ => 0,
    })
}
