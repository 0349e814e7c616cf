use thiserror::Error;

use crate::runtime::value::Value;

/// Errors raised by the runtime and by user callbacks running inside it.
///
/// `Arity` and `Type` carry fully rendered messages (including the `Hint:`
/// block) built by the builtin argument helpers.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Arity(String),
    #[error("{0}")]
    Type(String),
    #[error("{operation}: unsupported type {got}")]
    UnsupportedType {
        operation: &'static str,
        got: &'static str,
    },
    #[error("{class} has no member `{member}`")]
    UnknownMember { class: String, member: String },
    #[error("{class} has no parent class")]
    NoParent { class: String },
    #[error("{ancestor} is not an ancestor of {class}")]
    NotAnAncestor { class: String, ancestor: String },
    #[error("receiver of `{member}` was dropped before the call")]
    DetachedReceiver { member: String },
    #[error("raised {0}")]
    Raised(Value),
}

impl RuntimeError {
    pub fn unsupported(operation: &'static str, value: &Value) -> Self {
        RuntimeError::UnsupportedType {
            operation,
            got: value.type_name(),
        }
    }

    /// Raises an arbitrary value, the way a callback would throw.
    pub fn raise(value: impl Into<Value>) -> Self {
        RuntimeError::Raised(value.into())
    }
}
