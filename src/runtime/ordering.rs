//! Heterogeneous total order over runtime values.
//!
//! Values of different kinds order by kind rank:
//! `Undefined < None < Bool < number < String < sequence < Map < Function
//! < Class < Instance`. Within a kind:
//! - numbers compare numerically, integers and floats mixed, NaN last;
//! - strings compare by code point;
//! - sequences compare element-wise over the longer length, a missing
//!   element counting as `Undefined`, so an equal shorter prefix sorts first;
//! - maps compare over the sorted union of their keys, a side missing the
//!   key sorts first, otherwise the values decide;
//! - functions by name, classes by id, instances by class id, then identity.

use std::{cmp::Ordering, rc::Rc};

use crate::runtime::{
    classify::{Kind, classify, length},
    diagnostics,
    error::RuntimeError,
    flow::Flow,
    instance::Instance,
    iterate::iterate,
    value::{MapStore, Value},
};

fn rank(value: &Value) -> u8 {
    match value {
        Value::Undefined => 0,
        Value::None => 1,
        Value::Boolean(_) => 2,
        Value::Integer(_) | Value::Float(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) | Value::Typed(_) | Value::Iterable(_) => 5,
        Value::Map(_) => 6,
        Value::Function(_) => 7,
        Value::Class(_) => 8,
        Value::Instance(_) => {
            if classify(value) == Kind::GenericIterable {
                5
            } else {
                9
            }
        }
    }
}

pub fn cmp(a: &Value, b: &Value) -> Ordering {
    let (ra, rb) = (rank(a), rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Integer(x), Value::Float(y)) => cmp_int_float(*x, *y),
        (Value::Float(x), Value::Integer(y)) => cmp_int_float(*y, *x).reverse(),
        (Value::Float(x), Value::Float(y)) => cmp_floats(*x, *y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Map(x), Value::Map(y)) => cmp_maps(x, y),
        (Value::Function(x), Value::Function(y)) => {
            x.name.cmp(&y.name).then_with(|| x.addr().cmp(&y.addr()))
        }
        (Value::Class(x), Value::Class(y)) => x.id().cmp(&y.id()),
        (Value::Instance(x), Value::Instance(y)) if ra == 9 => {
            let identity = |i: &Rc<Instance>| Rc::as_ptr(i) as usize;
            x.get_class()
                .id()
                .cmp(&y.get_class().id())
                .then_with(|| identity(x).cmp(&identity(y)))
        }
        (Value::Undefined, Value::Undefined) | (Value::None, Value::None) => Ordering::Equal,
        _ => cmp_sequences(a, b),
    }
}

fn cmp_floats(x: f64, y: f64) -> Ordering {
    match x.partial_cmp(&y) {
        Some(ordering) => ordering,
        None => x.is_nan().cmp(&y.is_nan()),
    }
}

/// Exact comparison of an integer with a float. Casting the integer to
/// `f64` would round above 2^53 and break transitivity.
fn cmp_int_float(x: i64, y: f64) -> Ordering {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if y.is_nan() || y >= LIMIT {
        return Ordering::Less;
    }
    if y < -LIMIT {
        return Ordering::Greater;
    }
    let whole = y.trunc();
    x.cmp(&(whole as i64)).then_with(|| cmp_floats(whole, y))
}

fn element(sequence: &Value, index: usize) -> Value {
    let found = match sequence {
        Value::Array(items) => items.get(index).cloned(),
        Value::Typed(array) => array.get(index),
        other => other.as_length_indexed().and_then(|indexed| match indexed.at(index) {
            Ok(value) => Some(value),
            Err(err) => {
                diagnostics::debug(format!("cmp: element {} unavailable: {}", index, err));
                Option::None
            }
        }),
    };
    found.unwrap_or(Value::Undefined)
}

fn cmp_sequences(a: &Value, b: &Value) -> Ordering {
    let la = length(a).unwrap_or(0);
    let lb = length(b).unwrap_or(0);
    for i in 0..la.max(lb) {
        let ordering = match (i < la, i < lb) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => cmp(&element(a, i), &element(b, i)),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn cmp_maps(a: &MapStore, b: &MapStore) -> Ordering {
    let mut keys: Vec<_> = a.keys().chain(b.keys()).collect();
    keys.sort();
    keys.dedup();
    for key in keys {
        let va = a.get(key).filter(|v| v.is_defined());
        let vb = b.get(key).filter(|v| v.is_defined());
        let ordering = match (va, vb) {
            (Some(x), Some(y)) => cmp(x, y),
            (Option::None, Some(_)) => Ordering::Less,
            (Some(_), Option::None) => Ordering::Greater,
            (Option::None, Option::None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Value equality in the ordering sense: `equals(1, 1.0)` holds.
pub fn equals(a: &Value, b: &Value) -> bool {
    cmp(a, b) == Ordering::Equal
}

pub fn greater(a: &Value, b: &Value) -> bool {
    cmp(a, b) == Ordering::Greater
}

pub fn smaller(a: &Value, b: &Value) -> bool {
    cmp(a, b) == Ordering::Less
}

pub type Comparator = Box<dyn Fn(&Value, &Value) -> Result<Ordering, RuntimeError>>;
pub type Extractor = Box<dyn Fn(&Value) -> Result<Value, RuntimeError>>;

/// How `sorted` orders elements.
pub enum Comparison {
    /// [`cmp`].
    Natural,
    Comparator(Comparator),
    /// Lexicographic over the extracted keys, first extractor most
    /// significant; each key compares with [`cmp`].
    Extractors(Vec<Extractor>),
}

/// Returns a sorted copy of a sequence, or the sorted values of a map.
///
/// Scalars, `Undefined` and `None` are returned as is. Functions, classes
/// and opaque instances cannot be sorted.
pub fn sorted(
    value: &Value,
    comparison: &Comparison,
    reverse: bool,
) -> Result<Value, RuntimeError> {
    let mut items = match classify(value) {
        Kind::Sequence | Kind::GenericIterable | Kind::Associative => {
            let mut items = Vec::new();
            iterate(value, |item, _| {
                items.push(item.clone());
                Ok(Flow::Continue)
            })?;
            items
        }
        Kind::Scalar | Kind::Undefined | Kind::None => return Ok(value.clone()),
        Kind::Function | Kind::Instance => {
            return Err(RuntimeError::unsupported("sorted", value));
        }
    };

    match comparison {
        Comparison::Natural => items.sort_by(cmp),
        Comparison::Comparator(compare) => items = merge_sort(items, compare)?,
        Comparison::Extractors(extractors) => {
            let mut keyed = Vec::with_capacity(items.len());
            for item in items {
                let keys = extractors
                    .iter()
                    .map(|extract| extract(&item))
                    .collect::<Result<Vec<_>, _>>()?;
                keyed.push((keys, item));
            }
            keyed.sort_by(|(ka, _), (kb, _)| {
                ka.iter()
                    .zip(kb.iter())
                    .map(|(x, y)| cmp(x, y))
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
            items = keyed.into_iter().map(|(_, item)| item).collect();
        }
    }

    if reverse {
        items.reverse();
    }
    Ok(Value::array(items))
}

/// Stable merge sort for user comparators. Any answer the comparator gives
/// is accepted, so an inconsistent one yields some permutation instead of a
/// panic. The first error stops the sort.
fn merge_sort(mut items: Vec<Value>, compare: &Comparator) -> Result<Vec<Value>, RuntimeError> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l)? == Ordering::Less,
            _ => break,
        };
        out.extend(if take_right { right.next() } else { left.next() });
    }
    out.extend(left);
    out.extend(right);
    Ok(out)
}
