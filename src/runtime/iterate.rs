//! Generic iteration over sequences, associative containers and generic
//! iterables.
//!
//! [`iterate`] is the only place that walks a container. `map`, `filter` and
//! `reduce` are layered on it, so they share its visiting order and its
//! error triage: a callback answers with a [`Flow`], and any `Err` it
//! returns is reported to the diagnostics sink and then propagated
//! unchanged.

use crate::{
    config,
    runtime::{
        classify::{Kind, classify},
        diagnostics,
        error::RuntimeError,
        flow::{Flow, Outcome},
        key::Key,
        value::{MapStore, Value},
    },
};

fn report(err: RuntimeError) -> RuntimeError {
    if config::active().report_callback_errors {
        diagnostics::exception(&err, "iterate");
    }
    err
}

fn settle(result: Result<Flow, RuntimeError>) -> Result<Option<Outcome>, RuntimeError> {
    match result {
        Ok(Flow::Continue) => Ok(None),
        Ok(Flow::Break) => Ok(Some(Outcome::Broken)),
        Ok(Flow::Return(value)) => Ok(Some(Outcome::Returned(value))),
        Err(err) => Err(report(err)),
    }
}

/// Visits every element of `container`.
///
/// - Sequences and generic iterables: increasing index, `Key::Index`.
/// - Associative containers: storage order, `Key::Name`.
/// - `Undefined`, `None`, scalars, functions and opaque instances: no visits.
pub fn iterate<F>(container: &Value, mut visit: F) -> Result<Outcome, RuntimeError>
where
    F: FnMut(&Value, &Key) -> Result<Flow, RuntimeError>,
{
    match container {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if let Some(outcome) = settle(visit(item, &Key::Index(i)))? {
                    return Ok(outcome);
                }
            }
        }
        Value::Typed(array) => {
            for (i, item) in array.to_values().iter().enumerate() {
                if let Some(outcome) = settle(visit(item, &Key::Index(i)))? {
                    return Ok(outcome);
                }
            }
        }
        Value::Map(entries) => {
            for (name, item) in entries.iter() {
                if let Some(outcome) = settle(visit(item, &Key::Name(name.clone())))? {
                    return Ok(outcome);
                }
            }
        }
        other => {
            if let Some(indexed) = other.as_length_indexed() {
                let length = indexed.length().map_err(report)?;
                for i in 0..length {
                    let item = indexed.at(i).map_err(report)?;
                    if let Some(outcome) = settle(visit(&item, &Key::Index(i)))? {
                        return Ok(outcome);
                    }
                }
            } else if other.is_defined() && !matches!(other, Value::None) {
                diagnostics::debug(format!(
                    "iterate: {} is not a container, nothing to visit",
                    other.type_name()
                ));
            }
        }
    }
    Ok(Outcome::Exhausted)
}

/// Replaces every element with `f(value, key)`.
///
/// Sequences and generic iterables produce an `Array`, associative
/// containers a `Map` with the same keys. `Undefined` and `None` come back
/// unchanged; other values are reported and returned unchanged.
pub fn map<F>(container: &Value, mut f: F) -> Result<Value, RuntimeError>
where
    F: FnMut(&Value, &Key) -> Result<Value, RuntimeError>,
{
    match classify(container) {
        Kind::Sequence | Kind::GenericIterable => {
            let mut out = Vec::new();
            iterate(container, |value, key| {
                out.push(f(value, key)?);
                Ok(Flow::Continue)
            })?;
            Ok(Value::array(out))
        }
        Kind::Associative => {
            let mut out = MapStore::new();
            iterate(container, |value, key| {
                out.insert(key.to_name(), f(value, key)?);
                Ok(Flow::Continue)
            })?;
            Ok(out.into())
        }
        Kind::Undefined | Kind::None => Ok(container.clone()),
        _ => Ok(unsupported("map", container)),
    }
}

/// Keeps the elements for which `predicate(value, key)` holds.
pub fn filter<P>(container: &Value, predicate: P) -> Result<Value, RuntimeError>
where
    P: FnMut(&Value, &Key) -> Result<bool, RuntimeError>,
{
    filter_impl(container, predicate, None)
}

/// Like [`filter`], but every kept element is replaced by
/// `processor(value, key)` before it is stored.
pub fn filter_with<P, T>(
    container: &Value,
    predicate: P,
    mut processor: T,
) -> Result<Value, RuntimeError>
where
    P: FnMut(&Value, &Key) -> Result<bool, RuntimeError>,
    T: FnMut(&Value, &Key) -> Result<Value, RuntimeError>,
{
    filter_impl(container, predicate, Some(&mut processor as Processor<'_>))
}

type Processor<'a> = &'a mut dyn FnMut(&Value, &Key) -> Result<Value, RuntimeError>;

fn filter_impl<P>(
    container: &Value,
    mut predicate: P,
    mut processor: Option<Processor<'_>>,
) -> Result<Value, RuntimeError>
where
    P: FnMut(&Value, &Key) -> Result<bool, RuntimeError>,
{
    let mut keep = |value: &Value, key: &Key| -> Result<Option<Value>, RuntimeError> {
        if !predicate(value, key)? {
            return Ok(None);
        }
        match processor.as_mut() {
            Some(process) => process(value, key).map(Some),
            None => Ok(Some(value.clone())),
        }
    };

    match classify(container) {
        Kind::Sequence | Kind::GenericIterable => {
            let mut out = Vec::new();
            iterate(container, |value, key| {
                if let Some(kept) = keep(value, key)? {
                    out.push(kept);
                }
                Ok(Flow::Continue)
            })?;
            Ok(Value::array(out))
        }
        Kind::Associative => {
            let mut out = MapStore::new();
            iterate(container, |value, key| {
                if let Some(kept) = keep(value, key)? {
                    out.insert(key.to_name(), kept);
                }
                Ok(Flow::Continue)
            })?;
            Ok(out.into())
        }
        Kind::Undefined | Kind::None => Ok(container.clone()),
        _ => Ok(unsupported("filter", container)),
    }
}

/// Folds the container into an accumulator.
///
/// Without `initial` (or with `initial` undefined) the first visited element
/// becomes the seed and `f` is not called for it. For every other element
/// `f(&mut acc, value, key, ordinal)` runs; a defined return value replaces
/// the accumulator, `Undefined` leaves it as the callback left it.
///
/// An empty container yields `initial`, or `Undefined` when there is none.
pub fn reduce<F>(container: &Value, mut f: F, initial: Option<Value>) -> Result<Value, RuntimeError>
where
    F: FnMut(&mut Value, &Value, &Key, usize) -> Result<Value, RuntimeError>,
{
    let mut acc = initial.unwrap_or(Value::Undefined);
    let mut ordinal = 0;
    iterate(container, |value, key| {
        let next = if ordinal == 0 && !acc.is_defined() {
            value.clone()
        } else {
            f(&mut acc, value, key, ordinal)?
        };
        if next.is_defined() {
            acc = next;
        }
        ordinal += 1;
        Ok(Flow::Continue)
    })?;
    Ok(acc)
}

fn unsupported(operation: &'static str, value: &Value) -> Value {
    diagnostics::warn(RuntimeError::unsupported(operation, value).to_string());
    value.clone()
}
