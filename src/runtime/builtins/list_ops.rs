use std::rc::Rc;

use crate::runtime::{
    callable::Function,
    classify::{Kind, classify, length},
    error::RuntimeError,
    flow::Flow,
    iterate::iterate,
    key::Key,
    ordering::equals,
    value::Value,
};

use super::helpers::{
    arg_function, arg_function_opt, arg_int, arg_int_or, check_arity, check_arity_range,
    elements, unsupported, visit,
};

const NOT_FOUND: i64 = -1;

/// Key of the first element satisfying `matches`, if any.
fn position(
    container: &Value,
    mut matches: impl FnMut(&Value, &Key) -> Result<bool, RuntimeError>,
) -> Result<Option<Key>, RuntimeError> {
    let mut found = None;
    iterate(container, |value, key| {
        if matches(value, key)? {
            found = Some(key.clone());
            Ok(Flow::Break)
        } else {
            Ok(Flow::Continue)
        }
    })?;
    Ok(found)
}

fn key_or_not_found(key: Option<Key>) -> Value {
    key.map(|k| k.to_value()).unwrap_or(Value::Integer(NOT_FOUND))
}

/// Key of the first element equal to `needle`, or `-1`.
pub fn find(container: &Value, needle: &Value) -> Result<Value, RuntimeError> {
    position(container, |value, _| Ok(equals(value, needle))).map(key_or_not_found)
}

/// Key of the first element for which `predicate(value, key)` is truthy,
/// or `-1`.
pub fn find_like(container: &Value, predicate: &Function) -> Result<Value, RuntimeError> {
    position(container, |value, key| Ok(visit(predicate, value, key)?.is_truthy()))
        .map(key_or_not_found)
}

/// Key of the first element that [`is_in`] `values`, or `-1`.
pub fn find_one_of(container: &Value, values: &Value) -> Result<Value, RuntimeError> {
    position(container, |value, _| is_in(value, values, None)).map(key_or_not_found)
}

/// First element matching `predicate` (the first element without one), or
/// `None`.
pub fn first(container: &Value, predicate: Option<&Function>) -> Result<Value, RuntimeError> {
    let outcome = iterate(container, |value, key| {
        let hit = match predicate {
            Some(predicate) => visit(predicate, value, key)?.is_truthy(),
            None => true,
        };
        Ok(if hit {
            Flow::Return(value.clone())
        } else {
            Flow::Continue
        })
    })?;
    Ok(outcome.into_returned().unwrap_or(Value::None))
}

/// Last element matching `predicate` (the last element without one), or
/// `None`.
pub fn last(container: &Value, predicate: Option<&Function>) -> Result<Value, RuntimeError> {
    let mut found = Value::None;
    iterate(container, |value, key| {
        let hit = match predicate {
            Some(predicate) => visit(predicate, value, key)?.is_truthy(),
            None => true,
        };
        if hit {
            found = value.clone();
        }
        Ok(Flow::Continue)
    })?;
    Ok(found)
}

/// Inserts `item` before `position` (negative counts from the end, out of
/// range clamps). Non-arrays are reported and yield `None`.
pub fn insert(list: Value, position: i64, item: Value) -> Result<Value, RuntimeError> {
    let mut items = match list {
        Value::Array(items) => items,
        other => return Ok(unsupported("insert", &other, Value::None)),
    };
    let len = items.len() as i64;
    let at = if position < 0 { len + position } else { position };
    let at = at.clamp(0, len) as usize;
    Rc::make_mut(&mut items).insert(at, item);
    Ok(Value::Array(items))
}

/// Appends `item`. Non-arrays are reported and yield `None`.
pub fn add(list: Value, item: Value) -> Result<Value, RuntimeError> {
    let mut items = match list {
        Value::Array(items) => items,
        other => return Ok(unsupported("add", &other, Value::None)),
    };
    Rc::make_mut(&mut items).push(item);
    Ok(Value::Array(items))
}

/// Removes the first element equal to `needle` from an array, or the key
/// equal to `needle` from a map. Other values come back unchanged.
pub fn remove(container: Value, needle: &Value) -> Result<Value, RuntimeError> {
    Ok(match container {
        Value::Array(mut items) => {
            if let Some(i) = items.iter().position(|item| equals(item, needle)) {
                Rc::make_mut(&mut items).remove(i);
            }
            Value::Array(items)
        }
        Value::Map(mut entries) => {
            let name = needle.to_string_value();
            if entries.contains_key(name.as_str()) {
                Rc::make_mut(&mut entries).shift_remove(name.as_str());
            }
            Value::Map(entries)
        }
        other => other,
    })
}

/// Removes the element at `index` from an array (ignored when out of
/// range), or the key `index` from a map.
pub fn remove_at(container: Value, index: &Value) -> Result<Value, RuntimeError> {
    Ok(match (container, index) {
        (Value::Array(mut items), Value::Integer(i)) => {
            if *i >= 0 && (*i as usize) < items.len() {
                Rc::make_mut(&mut items).remove(*i as usize);
            }
            Value::Array(items)
        }
        (Value::Map(mut entries), key) => {
            let name = key.to_string_value();
            if entries.contains_key(name.as_str()) {
                Rc::make_mut(&mut entries).shift_remove(name.as_str());
            }
            Value::Map(entries)
        }
        (other, _) => other,
    })
}

/// Elements from `start` up to `end` (exclusive), negative bounds counting
/// from the end. Strings slice by character. Anything but strings,
/// sequences and generic iterables is an error.
pub fn slice(value: &Value, start: i64, end: Option<i64>) -> Result<Value, RuntimeError> {
    let is_sliceable = matches!(value, Value::String(_))
        || matches!(classify(value), Kind::Sequence | Kind::GenericIterable);
    if !is_sliceable {
        return Err(RuntimeError::unsupported("slice", value));
    }
    let len = length(value)? as i64;
    let bound = |raw: i64| -> usize {
        let resolved = if raw < 0 { len + raw } else { raw };
        resolved.clamp(0, len) as usize
    };
    let from = bound(start);
    let to = bound(end.unwrap_or(len));
    if let Value::String(s) = value {
        let text: String = s.chars().skip(from).take(to.saturating_sub(from)).collect();
        return Ok(Value::from(text));
    }
    let items = elements(value)?.unwrap_or_default();
    Ok(Value::array(
        items
            .into_iter()
            .skip(from)
            .take(to.saturating_sub(from))
            .collect(),
    ))
}

/// A reversed copy of a string (by character), a sequence or a generic
/// iterable. Anything else is reported and yields `None`.
pub fn reverse(value: &Value) -> Result<Value, RuntimeError> {
    if let Value::String(s) = value {
        return Ok(Value::from(s.chars().rev().collect::<String>()));
    }
    match elements(value)? {
        Some(mut items) => {
            items.reverse();
            Ok(Value::array(items))
        }
        None => Ok(unsupported("reverse", value, Value::None)),
    }
}

/// Whether `list` (a sequence, or the values of a map) holds an element
/// `e` with `predicate(e, value)`, by default [`equals`].
pub fn is_in(
    value: &Value,
    list: &Value,
    predicate: Option<&Function>,
) -> Result<bool, RuntimeError> {
    if !classify(list).is_container() {
        return Ok(false);
    }
    let outcome = iterate(list, |item, _| {
        let hit = match predicate {
            Some(predicate) => predicate.call(&[item.clone(), value.clone()])?.is_truthy(),
            None => equals(item, value),
        };
        Ok(if hit { Flow::Break } else { Flow::Continue })
    })?;
    Ok(outcome.halted())
}

pub(super) fn builtin_find(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "find", "find(container, value)")?;
    find(&args[0], &args[1])
}

pub(super) fn builtin_find_like(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "find_like(container, pred)";
    check_arity(&args, 2, "find_like", SIGNATURE)?;
    let predicate = arg_function(&args, 1, "find_like", "second argument", SIGNATURE)?;
    find_like(&args[0], predicate)
}

pub(super) fn builtin_find_one_of(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "find_one_of", "find_one_of(container, values)")?;
    find_one_of(&args[0], &args[1])
}

pub(super) fn builtin_first(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "first(container, pred?)";
    check_arity_range(&args, 1, 2, "first", SIGNATURE)?;
    let predicate = arg_function_opt(&args, 1, "first", "second argument", SIGNATURE)?;
    first(&args[0], predicate)
}

pub(super) fn builtin_last(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "last(container, pred?)";
    check_arity_range(&args, 1, 2, "last", SIGNATURE)?;
    let predicate = arg_function_opt(&args, 1, "last", "second argument", SIGNATURE)?;
    last(&args[0], predicate)
}

pub(super) fn builtin_insert(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 3, "insert", "insert(list, position, value)")?;
    let position = arg_int(&args, 1, "insert", "second argument", "insert(list, position, value)")?;
    let mut args = args.into_iter();
    let list = args.next().unwrap_or(Value::Undefined);
    let item = args.nth(1).unwrap_or(Value::Undefined);
    insert(list, position, item)
}

pub(super) fn builtin_add(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "add", "add(list, value)")?;
    let mut args = args.into_iter();
    let list = args.next().unwrap_or(Value::Undefined);
    let item = args.next().unwrap_or(Value::Undefined);
    add(list, item)
}

pub(super) fn builtin_remove(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "remove", "remove(container, value)")?;
    let mut args = args.into_iter();
    let container = args.next().unwrap_or(Value::Undefined);
    let needle = args.next().unwrap_or(Value::Undefined);
    remove(container, &needle)
}

pub(super) fn builtin_remove_at(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "remove_at", "remove_at(container, index)")?;
    let mut args = args.into_iter();
    let container = args.next().unwrap_or(Value::Undefined);
    let index = args.next().unwrap_or(Value::Undefined);
    remove_at(container, &index)
}

pub(super) fn builtin_slice(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "slice(value, start=0, end?)";
    check_arity_range(&args, 1, 3, "slice", SIGNATURE)?;
    let start =
        arg_int_or(&args, 1, Some(0), "slice", "second argument", SIGNATURE)?.unwrap_or(0);
    let end = arg_int_or(&args, 2, None, "slice", "third argument", SIGNATURE)?;
    slice(&args[0], start, end)
}

pub(super) fn builtin_reverse(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "reverse", "reverse(value)")?;
    reverse(&args[0])
}

pub(super) fn builtin_is_in(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "is_in(value, list, pred?)";
    check_arity_range(&args, 2, 3, "is_in", SIGNATURE)?;
    let predicate = arg_function_opt(&args, 2, "is_in", "third argument", SIGNATURE)?;
    is_in(&args[0], &args[1], predicate).map(Value::Boolean)
}

