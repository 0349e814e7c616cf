use std::rc::Rc;

use crate::runtime::{
    classify::{Kind, classify},
    error::RuntimeError,
    key::Key,
    ordering::equals,
    value::{MapStore, Value},
};

use super::helpers::{
    arg_int, arg_int_or, check_arity, check_arity_range, elements, entries, is_list_like, optional,
    resolve_offset, unsupported,
};

fn listing(value: &Value, shape: impl Fn(&Key, &Value) -> Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Undefined | Value::None => Ok(Value::array(Vec::new())),
        _ => Ok(match entries(value)? {
            Some(entries) => Value::array(entries.iter().map(|(k, v)| shape(k, v)).collect()),
            None => Value::None,
        }),
    }
}

/// Indices of a sequence, names of a map or of an instance's properties.
/// `None` for everything else.
pub fn keys(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Undefined | Value::None => Ok(Value::None),
        _ => listing(value, |key, _| key.to_value()),
    }
}

/// Values as a fresh array; empty for `Undefined`/`None`, `None` for
/// scalars.
pub fn values(value: &Value) -> Result<Value, RuntimeError> {
    listing(value, |_, v| v.clone())
}

/// `{key, value}` maps, one per element.
pub fn items(value: &Value) -> Result<Value, RuntimeError> {
    listing(value, |key, v| {
        Value::map([("key", key.to_value()), ("value", v.clone())])
    })
}

/// `[key, value]` pairs, one per element.
pub fn pairs(value: &Value) -> Result<Value, RuntimeError> {
    listing(value, |key, v| Value::array(vec![key.to_value(), v.clone()]))
}

fn element_at(value: &Value, index: usize) -> Result<Value, RuntimeError> {
    Ok(match value {
        Value::String(s) => s
            .chars()
            .nth(index)
            .map(|c| Value::from(c.to_string()))
            .unwrap_or(Value::Undefined),
        Value::Array(items) => items.get(index).cloned().unwrap_or(Value::Undefined),
        Value::Typed(array) => array.get(index).unwrap_or(Value::Undefined),
        Value::Map(entries) => entries
            .get(index.to_string().as_str())
            .cloned()
            .unwrap_or(Value::Undefined),
        other => match other.as_length_indexed() {
            Some(indexed) if index < indexed.length()? => indexed.at(index)?,
            Some(_) => Value::Undefined,
            None => match other {
                Value::Instance(instance) => instance.get(&index.to_string()),
                _ => Value::Undefined,
            },
        },
    })
}

/// Element at `index`. A negative index counts from the end of strings,
/// sequences and generic iterables; anything else is unsupported.
/// A non-integer index looks up a map key or an instance property.
pub fn access(value: &Value, index: &Value) -> Result<Value, RuntimeError> {
    match index {
        Value::Integer(i) if *i >= 0 => element_at(value, *i as usize),
        Value::Integer(i) => {
            if !(matches!(value, Value::String(_)) || is_list_like(value)) {
                return Err(RuntimeError::unsupported("access", value));
            }
            match resolve_offset(value, *i)? {
                resolved if resolved >= 0 => element_at(value, resolved as usize),
                _ => Ok(Value::Undefined),
            }
        }
        key => {
            let name = key.to_string_value();
            Ok(match value {
                Value::Map(entries) => {
                    entries.get(name.as_str()).cloned().unwrap_or(Value::Undefined)
                }
                Value::Instance(instance) => instance.get(&name),
                _ => Value::Undefined,
            })
        }
    }
}

/// `index` if it is non-negative, else `len(value) + index`.
pub fn offset(value: &Value, index: i64) -> Result<i64, RuntimeError> {
    resolve_offset(value, index)
}

/// Copy of sequences and maps, `depth` levels deep. Other values, and any
/// value when `depth < 1`, are returned as is.
pub fn copy(value: &Value, depth: i64) -> Result<Value, RuntimeError> {
    if depth < 1 {
        return Ok(value.clone());
    }
    let inner = |item: &Value| -> Result<Value, RuntimeError> {
        if depth > 1 {
            copy(item, depth - 1)
        } else {
            Ok(item.clone())
        }
    };
    if let Value::Typed(array) = value {
        return Ok(Value::Typed(Rc::new((**array).clone())));
    }
    match classify(value) {
        Kind::Associative => {
            let mut out = MapStore::new();
            for (key, item) in entries(value)?.unwrap_or_default() {
                out.insert(key.to_name(), inner(&item)?);
            }
            Ok(out.into())
        }
        Kind::Sequence | Kind::GenericIterable => {
            let mut out = Vec::new();
            for (_, item) in entries(value)?.unwrap_or_default() {
                out.push(inner(&item)?);
            }
            Ok(Value::array(out))
        }
        _ => Ok(value.clone()),
    }
}

/// Merges `other` into `value`.
///
/// Lists get every item of `other` they do not already contain; maps get
/// every key of `other` they lack (or have undefined), or every key when
/// `replace` is set. A type mismatch is reported and `value` comes back
/// unchanged.
pub fn merge(value: Value, other: &Value, replace: bool) -> Result<Value, RuntimeError> {
    match value {
        Value::Array(mut items) => {
            let Some(extra) = elements(other)? else {
                return Ok(unsupported("merge", other, Value::Array(items)));
            };
            let list = Rc::make_mut(&mut items);
            for item in extra {
                if !list.iter().any(|existing| equals(existing, &item)) {
                    list.push(item);
                }
            }
            Ok(Value::Array(items))
        }
        Value::Map(mut store) => {
            let Value::Map(extra) = other else {
                return Ok(unsupported("merge", other, Value::Map(store)));
            };
            let map = Rc::make_mut(&mut store);
            for (key, item) in extra.iter() {
                let missing = map.get(key).is_none_or(|existing| !existing.is_defined());
                if missing || replace {
                    map.insert(key.clone(), item.clone());
                }
            }
            Ok(Value::Map(store))
        }
        value if value.is_truthy() => Ok(unsupported("merge", &value, value.clone())),
        value => Ok(value),
    }
}

pub(super) fn builtin_keys(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "keys", "keys(value)")?;
    keys(&args[0])
}

pub(super) fn builtin_values(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "values", "values(value)")?;
    values(&args[0])
}

pub(super) fn builtin_items(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "items", "items(value)")?;
    items(&args[0])
}

pub(super) fn builtin_pairs(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "pairs", "pairs(value)")?;
    pairs(&args[0])
}

pub(super) fn builtin_access(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "access", "access(value, index)")?;
    access(&args[0], &args[1])
}

pub(super) fn builtin_offset(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "offset", "offset(value, index)")?;
    let index = arg_int(&args, 1, "offset", "second argument", "offset(value, index)")?;
    offset(&args[0], index).map(Value::Integer)
}

pub(super) fn builtin_copy(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity_range(&args, 1, 2, "copy", "copy(value, depth=1)")?;
    let depth = arg_int_or(&args, 1, Some(1), "copy", "second argument", "copy(value, depth=1)")?
        .unwrap_or(1);
    copy(&args[0], depth)
}

pub(super) fn builtin_merge(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity_range(&args, 2, 3, "merge", "merge(a, b, replace=false)")?;
    let replace = optional(&args, 2).is_some_and(Value::is_truthy);
    let mut args = args.into_iter();
    let value = args.next().unwrap_or(Value::Undefined);
    let other = args.next().unwrap_or(Value::Undefined);
    merge(value, &other, replace)
}

