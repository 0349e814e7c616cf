use crate::runtime::{
    class::is_instance,
    classify::{Kind, classify, length},
    error::RuntimeError,
    value::Value,
};

use super::helpers::{check_arity, check_arity_range, optional, type_error};

/// Coarse type label: `undefined`, `none`, `boolean`, `number`, `string`,
/// `list`, `map`, `iterable`, `function`, `class` or `instance`.
pub fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::None => "none",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) | Value::Float(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Typed(_) => "list",
        Value::Map(_) => "map",
        Value::Iterable(_) => "iterable",
        Value::Function(_) => "function",
        Value::Class(_) => "class",
        Value::Instance(_) => "instance",
    }
}

pub(super) fn builtin_len(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "len", "len(value)")?;
    Ok(Value::from(length(&args[0])?))
}

pub(super) fn builtin_type_of(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "type_of", "type_of(value)")?;
    Ok(Value::from(type_label(&args[0])))
}

pub(super) fn builtin_kind_of(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "kind_of", "kind_of(value)")?;
    Ok(Value::from(classify(&args[0]).label()))
}

pub(super) fn builtin_is_list(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_list", "is_list(value)")?;
    Ok(Value::Boolean(classify(&args[0]) == Kind::Sequence))
}

pub(super) fn builtin_is_map(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_map", "is_map(value)")?;
    Ok(Value::Boolean(classify(&args[0]) == Kind::Associative))
}

pub(super) fn builtin_is_iterable(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_iterable", "is_iterable(value)")?;
    Ok(Value::Boolean(classify(&args[0]).is_container()))
}

pub(super) fn builtin_is_function(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_function", "is_function(value)")?;
    Ok(Value::Boolean(matches!(args[0], Value::Function(_))))
}

pub(super) fn builtin_is_instance(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity_range(&args, 1, 2, "is_instance", "is_instance(value, class?)")?;
    match optional(&args, 1) {
        None => Ok(Value::Boolean(is_instance(&args[0], None))),
        Some(Value::Class(class)) => Ok(Value::Boolean(is_instance(&args[0], Some(&**class)))),
        Some(other) => Err(type_error(
            "is_instance",
            "second argument",
            "Class",
            other.type_name(),
            "is_instance(value, class?)",
        )),
    }
}

pub(super) fn builtin_is_defined(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_defined", "is_defined(value)")?;
    Ok(Value::Boolean(args[0].is_defined()))
}

pub(super) fn builtin_is_undefined(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_undefined", "is_undefined(value)")?;
    Ok(Value::Boolean(!args[0].is_defined()))
}

pub(super) fn builtin_is_number(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_number", "is_number(value)")?;
    Ok(Value::Boolean(matches!(args[0], Value::Integer(_) | Value::Float(_))))
}

pub(super) fn builtin_is_string(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_string", "is_string(value)")?;
    Ok(Value::Boolean(matches!(args[0], Value::String(_))))
}

/// `None`, containers and instances. Scalars, functions and classes are not
/// objects.
pub(super) fn builtin_is_object(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "is_object", "is_object(value)")?;
    Ok(Value::Boolean(matches!(
        args[0],
        Value::None
            | Value::Array(_)
            | Value::Typed(_)
            | Value::Map(_)
            | Value::Iterable(_)
            | Value::Instance(_)
    )))
}
