use crate::runtime::{
    callable::Function,
    classify::{Kind, classify, length},
    diagnostics,
    error::RuntimeError,
    flow::Flow,
    iterate::iterate,
    key::Key,
    value::Value,
};

pub(super) fn format_hint(signature: &str) -> String {
    format!("\n\nHint:\n  {}", signature)
}

pub(super) fn arity_error(name: &str, expected: &str, got: usize, signature: &str) -> RuntimeError {
    RuntimeError::Arity(format!(
        "wrong number of arguments\n\n  function: {}/{}\n  expected: {}\n  got: {}{}",
        name,
        expected,
        expected,
        got,
        format_hint(signature)
    ))
}

pub(super) fn type_error(
    name: &str,
    label: &str,
    expected: &str,
    got: &str,
    signature: &str,
) -> RuntimeError {
    RuntimeError::Type(format!(
        "{} expected {} to be {}, got {}{}",
        name,
        label,
        expected,
        got,
        format_hint(signature)
    ))
}

pub(super) fn check_arity(
    args: &[Value],
    expected: usize,
    name: &str,
    signature: &str,
) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(arity_error(
            name,
            &expected.to_string(),
            args.len(),
            signature,
        ));
    }
    Ok(())
}

pub(super) fn check_arity_range(
    args: &[Value],
    min: usize,
    max: usize,
    name: &str,
    signature: &str,
) -> Result<(), RuntimeError> {
    if args.len() < min || args.len() > max {
        return Err(arity_error(
            name,
            &format!("{}..{}", min, max),
            args.len(),
            signature,
        ));
    }
    Ok(())
}

pub(super) fn arg_int(
    args: &[Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<i64, RuntimeError> {
    match &args[index] {
        Value::Integer(value) => Ok(*value),
        other => Err(type_error(name, label, "Int", other.type_name(), signature)),
    }
}

/// Optional integer argument; missing, `Undefined` and `None` yield `default`.
pub(super) fn arg_int_or(
    args: &[Value],
    index: usize,
    default: Option<i64>,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<Option<i64>, RuntimeError> {
    match optional(args, index) {
        None => Ok(default),
        Some(_) => arg_int(args, index, name, label, signature).map(Some),
    }
}

pub(super) fn arg_function<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<&'a Function, RuntimeError> {
    match &args[index] {
        Value::Function(func) => Ok(func),
        other => Err(type_error(
            name,
            label,
            "Function",
            other.type_name(),
            signature,
        )),
    }
}

pub(super) fn arg_function_opt<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<Option<&'a Function>, RuntimeError> {
    match optional(args, index) {
        None => Ok(None),
        Some(_) => arg_function(args, index, name, label, signature).map(Some),
    }
}

/// Argument at `index` unless it is missing, `Undefined` or `None`.
pub(super) fn optional(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index)
        .filter(|value| !matches!(value, Value::Undefined | Value::None))
}

/// Runs a visit callback with `(value, key)`.
pub(super) fn visit(func: &Function, value: &Value, key: &Key) -> Result<Value, RuntimeError> {
    func.call(&[value.clone(), key.to_value()])
}

/// Reports an unsupported argument type and returns `fallback`.
pub(super) fn unsupported(operation: &'static str, value: &Value, fallback: Value) -> Value {
    diagnostics::error(RuntimeError::unsupported(operation, value).to_string());
    fallback
}

/// Resolves a possibly negative index against the length of `value`.
pub(super) fn resolve_offset(value: &Value, index: i64) -> Result<i64, RuntimeError> {
    if index >= 0 {
        Ok(index)
    } else {
        Ok(length(value)? as i64 + index)
    }
}

/// Every `(key, value)` of a container, or of an opaque instance's
/// properties. `None` for values without elements.
pub(super) fn entries(value: &Value) -> Result<Option<Vec<(Key, Value)>>, RuntimeError> {
    match (classify(value), value) {
        (Kind::Sequence | Kind::Associative | Kind::GenericIterable, _) => {
            let mut out = Vec::new();
            iterate(value, |item, key| {
                out.push((key.clone(), item.clone()));
                Ok(Flow::Continue)
            })?;
            Ok(Some(out))
        }
        (Kind::Instance, Value::Instance(instance)) => Ok(Some(
            instance
                .properties()
                .iter()
                .map(|(name, item)| (Key::Name(name.clone()), item.clone()))
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Elements of a sequence or generic iterable, `None` for anything else.
pub(super) fn elements(value: &Value) -> Result<Option<Vec<Value>>, RuntimeError> {
    match classify(value) {
        Kind::Sequence | Kind::GenericIterable => {
            let mut out = Vec::new();
            iterate(value, |item, _| {
                out.push(item.clone());
                Ok(Flow::Continue)
            })?;
            Ok(Some(out))
        }
        _ => Ok(None),
    }
}

pub(super) fn is_list_like(value: &Value) -> bool {
    matches!(classify(value), Kind::Sequence | Kind::GenericIterable)
}
