use crate::runtime::{
    callable::Function,
    classify::{Kind, classify, length},
    error::RuntimeError,
    flow::Flow,
    iterate::iterate,
    key::Key,
    ordering::equals,
    value::{MapStore, Value},
};

use super::{
    collection_ops::{copy, merge},
    helpers::{
        arg_function, arg_function_opt, check_arity, check_arity_range, elements, unsupported,
    },
};

fn is_empty(value: &Value) -> Result<bool, RuntimeError> {
    Ok(!value.is_truthy() || (classify(value).is_container() && length(value)? == 0))
}

fn contains(items: &[Value], needle: &Value) -> bool {
    items.iter().any(|item| equals(item, needle))
}

/// Elements of `other` as a flat list: a map's values, a sequence's items.
fn members(other: &Value) -> Result<Vec<Value>, RuntimeError> {
    match other {
        Value::Map(entries) => Ok(entries.values().cloned().collect()),
        _ => Ok(elements(other)?.unwrap_or_default()),
    }
}

/// Elements of `a` not in `b`.
///
/// For a list `a`, a map `b` contributes its values. For a map `a`, a map
/// `b` removes the keys it holds and a list `b` removes the entries whose
/// value it holds.
pub fn difference(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    if is_empty(a)? || is_empty(b)? {
        return Ok(a.clone());
    }
    match (classify(a), a) {
        (Kind::Sequence | Kind::GenericIterable, _) => {
            let excluded = members(b)?;
            let kept = elements(a)?
                .unwrap_or_default()
                .into_iter()
                .filter(|item| !contains(&excluded, item))
                .collect();
            Ok(Value::array(kept))
        }
        (Kind::Associative, Value::Map(entries)) => {
            let kept: MapStore = match b {
                Value::Map(excluded) => entries
                    .iter()
                    .filter(|(key, _)| !excluded.contains_key(*key))
                    .map(|(key, item)| (key.clone(), item.clone()))
                    .collect(),
                _ => {
                    let excluded = members(b)?;
                    entries
                        .iter()
                        .filter(|(_, item)| !contains(&excluded, item))
                        .map(|(key, item)| (key.clone(), item.clone()))
                        .collect()
                }
            };
            Ok(kept.into())
        }
        _ => Ok(unsupported("difference", a, Value::None)),
    }
}

/// Elements of `a` followed by those of `b` it lacks.
///
/// Two maps merge without replacing `a`'s defined keys. A list `b` merged
/// into a map `a` fills the keys `"0"`, `"1"`, ... that `a` leaves
/// undefined.
pub fn union(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    if is_empty(a)? {
        return Ok(b.clone());
    }
    if is_empty(b)? {
        return Ok(a.clone());
    }
    match (classify(a), a) {
        (Kind::Sequence | Kind::GenericIterable, _) => {
            let mut out = elements(a)?.unwrap_or_default();
            for item in members(b)? {
                if !contains(&out, &item) {
                    out.push(item);
                }
            }
            Ok(Value::array(out))
        }
        (Kind::Associative, Value::Map(entries)) => match b {
            Value::Map(_) => merge(copy(a, 1)?, b, false),
            _ => {
                let mut out = (**entries).clone();
                for (index, item) in members(b)?.into_iter().enumerate() {
                    let key = Key::Index(index).to_name();
                    if out.get(&key).is_none_or(|existing| !existing.is_defined()) {
                        out.insert(key, item);
                    }
                }
                Ok(out.into())
            }
        },
        _ => Ok(unsupported("union", a, Value::None)),
    }
}

/// Elements common to `a` and `b`.
///
/// - list and list: the items of `a` that `b` holds;
/// - list and map: the items of `a` whose string form is a key of `b`;
/// - map and map: `b`'s entries for the keys both hold;
/// - map and list: `a`'s defined entries for the keys `b` lists.
pub fn intersection(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    if is_empty(a)? {
        return Ok(Value::None);
    }
    match (classify(a), a) {
        (Kind::Sequence | Kind::GenericIterable, _) => {
            let items = elements(a)?.unwrap_or_default();
            let kept = match b {
                Value::Map(keys) => items
                    .into_iter()
                    .filter(|item| keys.contains_key(item.to_string_value().as_str()))
                    .collect(),
                _ => {
                    let other = elements(b)?.unwrap_or_default();
                    items.into_iter().filter(|item| contains(&other, item)).collect()
                }
            };
            Ok(Value::array(kept))
        }
        (Kind::Associative, Value::Map(entries)) => {
            let mut out = MapStore::new();
            match b {
                Value::Map(other) => {
                    for (key, item) in other.iter() {
                        if entries.contains_key(key) {
                            out.insert(key.clone(), item.clone());
                        }
                    }
                }
                _ => {
                    for key in elements(b)?.unwrap_or_default() {
                        let name = key.to_string_value();
                        if let Some(item) = entries.get(name.as_str()).filter(|v| v.is_defined()) {
                            out.insert(name.into(), item.clone());
                        }
                    }
                }
            }
            Ok(out.into())
        }
        _ => Ok(unsupported("intersection", a, Value::None)),
    }
}

/// Indexes the elements of `iterable` by `extractor(value, key)`.
///
/// When two elements share a key the later one wins, unless `replacer` is
/// given: then the stored value becomes `replacer(value, existing, key)`.
pub fn as_map(
    iterable: &Value,
    extractor: &Function,
    replacer: Option<&Function>,
) -> Result<Value, RuntimeError> {
    let mut out = MapStore::new();
    iterate(iterable, |value, key| {
        let name = extractor
            .call(&[value.clone(), key.to_value()])?
            .to_string_value();
        let stored = match (out.get(name.as_str()), replacer) {
            (Some(existing), Some(replacer)) => {
                replacer.call(&[value.clone(), existing.clone(), Value::from(name.as_str())])?
            }
            _ => value.clone(),
        };
        out.insert(name.into(), stored);
        Ok(Flow::Continue)
    })?;
    Ok(out.into())
}

/// Builds a map from `[key, value]` pairs. Pairs without a key are skipped.
pub fn couples_as_map(couples: &Value) -> Result<Value, RuntimeError> {
    let Some(items) = elements(couples)? else {
        return Ok(unsupported("couples_as_map", couples, Value::None));
    };
    let mut out = MapStore::new();
    for couple in items {
        let Some(pair) = elements(&couple)? else {
            continue;
        };
        let mut pair = pair.into_iter();
        if let Some(key) = pair.next() {
            out.insert(key.to_string_value().into(), pair.next().unwrap_or(Value::Undefined));
        }
    }
    Ok(out.into())
}

/// Builds a map from `{key, value}` maps. Items without a `key` are skipped.
pub fn items_as_map(items: &Value) -> Result<Value, RuntimeError> {
    let Some(list) = elements(items)? else {
        return Ok(unsupported("items_as_map", items, Value::None));
    };
    let mut out = MapStore::new();
    for item in list {
        let Value::Map(entry) = item else {
            continue;
        };
        if let Some(key) = entry.get("key").filter(|key| key.is_defined()) {
            let value = entry.get("value").cloned().unwrap_or(Value::Undefined);
            out.insert(key.to_string_value().into(), value);
        }
    }
    Ok(out.into())
}

pub(super) fn builtin_difference(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "difference", "difference(a, b)")?;
    difference(&args[0], &args[1])
}

pub(super) fn builtin_union(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "union", "union(a, b)")?;
    union(&args[0], &args[1])
}

pub(super) fn builtin_intersection(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "intersection", "intersection(a, b)")?;
    intersection(&args[0], &args[1])
}

pub(super) fn builtin_as_map(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "as_map(iterable, extractor, replacer?)";
    check_arity_range(&args, 2, 3, "as_map", SIGNATURE)?;
    let extractor = arg_function(&args, 1, "as_map", "second argument", SIGNATURE)?;
    let replacer = arg_function_opt(&args, 2, "as_map", "third argument", SIGNATURE)?;
    as_map(&args[0], extractor, replacer)
}

pub(super) fn builtin_couples_as_map(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "couples_as_map", "couples_as_map(couples)")?;
    couples_as_map(&args[0])
}

pub(super) fn builtin_items_as_map(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1, "items_as_map", "items_as_map(items)")?;
    items_as_map(&args[0])
}
