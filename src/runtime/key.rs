use std::{fmt, rc::Rc};

use crate::runtime::value::Value;

/// Position of an element inside a container, as handed to visit callbacks.
///
/// Sequences and generic iterables are visited with `Index`, associative
/// containers with `Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(Rc<str>),
}

impl Key {
    pub fn to_value(&self) -> Value {
        match self {
            Key::Index(i) => Value::Integer(*i as i64),
            Key::Name(name) => Value::String(name.clone()),
        }
    }

    /// Returns the key as an associative-container key.
    pub fn to_name(&self) -> Rc<str> {
        match self {
            Key::Index(i) => i.to_string().into(),
            Key::Name(name) => name.clone(),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(v) => write!(f, "{}", v),
            Key::Name(v) => write!(f, "\"{}\"", v),
        }
    }
}
