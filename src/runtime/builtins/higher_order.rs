use std::cmp::Ordering;

use crate::runtime::{
    callable::Function,
    error::RuntimeError,
    iterate,
    key::Key,
    ordering::{self, Comparator, Comparison, Extractor},
    value::Value,
};

use super::helpers::{
    arg_function, arg_function_opt, check_arity, check_arity_range, optional, type_error, visit,
};

/// `f(value, key)` for every element.
pub fn map(container: &Value, f: &Function) -> Result<Value, RuntimeError> {
    iterate::map(container, |value, key| visit(f, value, key))
}

/// Elements for which `predicate(value, key)` is truthy, each replaced by
/// `processor(value, key)` when one is given.
pub fn filter(
    container: &Value,
    predicate: &Function,
    processor: Option<&Function>,
) -> Result<Value, RuntimeError> {
    let keep = |value: &Value, key: &Key| -> Result<bool, RuntimeError> {
        Ok(visit(predicate, value, key)?.is_truthy())
    };
    match processor {
        Some(processor) => {
            iterate::filter_with(container, keep, |value, key| visit(processor, value, key))
        }
        None => iterate::filter(container, keep),
    }
}

/// Folds with `f(acc, value, key, ordinal)`; see [`iterate::reduce`] for the
/// seeding rule.
pub fn reduce(
    container: &Value,
    f: &Function,
    initial: Option<Value>,
) -> Result<Value, RuntimeError> {
    iterate::reduce(
        container,
        |acc, value, key, ordinal| {
            f.call(&[acc.clone(), value.clone(), key.to_value(), Value::from(ordinal)])
        },
        initial,
    )
}

/// Left fold that always starts from `seed`.
pub fn foldl(container: &Value, seed: Value, f: &Function) -> Result<Value, RuntimeError> {
    reduce(container, f, Some(seed))
}

fn ordering_value(ordering: Ordering) -> Value {
    Value::Integer(match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

/// Turns a user comparator's numeric answer into an [`Ordering`].
fn sign_of(name: &str, result: &Value) -> Result<Ordering, RuntimeError> {
    match result {
        Value::Integer(v) => Ok(v.cmp(&0)),
        Value::Float(v) => Ok(v.partial_cmp(&0.0).unwrap_or(Ordering::Equal)),
        other => Err(type_error(
            name,
            "comparator result",
            "Int or Float",
            other.type_name(),
            "comparator(a, b) -> number",
        )),
    }
}

/// The comparison described by the optional `sorted` argument: nothing for
/// the natural order, a comparator function, or a list of key extractors.
fn comparison_from(arg: Option<&Value>) -> Result<Comparison, RuntimeError> {
    match arg {
        None => Ok(Comparison::Natural),
        Some(Value::Function(compare)) => {
            let compare = compare.clone();
            let comparator: Comparator = Box::new(move |a: &Value, b: &Value| {
                sign_of("sorted", &compare.call(&[a.clone(), b.clone()])?)
            });
            Ok(Comparison::Comparator(comparator))
        }
        Some(Value::Array(functions)) => {
            let mut extractors = Vec::with_capacity(functions.len());
            for function in functions.iter() {
                let Value::Function(extract) = function else {
                    return Err(type_error(
                        "sorted",
                        "every extractor",
                        "Function",
                        function.type_name(),
                        SORTED_SIGNATURE,
                    ));
                };
                let extract = extract.clone();
                let extractor: Extractor =
                    Box::new(move |item: &Value| extract.call(&[item.clone()]));
                extractors.push(extractor);
            }
            Ok(Comparison::Extractors(extractors))
        }
        Some(other) => Err(type_error(
            "sorted",
            "second argument",
            "Function or Array of Functions",
            other.type_name(),
            SORTED_SIGNATURE,
        )),
    }
}

const SORTED_SIGNATURE: &str = "sorted(value, comparison?, reverse=false)";

pub(super) fn builtin_map(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "map", "map(container, fn)")?;
    let f = arg_function(&args, 1, "map", "second argument", "map(container, fn)")?;
    map(&args[0], f)
}

pub(super) fn builtin_filter(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "filter(container, pred, processor?)";
    check_arity_range(&args, 2, 3, "filter", SIGNATURE)?;
    let predicate = arg_function(&args, 1, "filter", "second argument", SIGNATURE)?;
    let processor = arg_function_opt(&args, 2, "filter", "third argument", SIGNATURE)?;
    filter(&args[0], predicate, processor)
}

pub(super) fn builtin_reduce(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "reduce(container, fn, initial?)";
    check_arity_range(&args, 2, 3, "reduce", SIGNATURE)?;
    let f = arg_function(&args, 1, "reduce", "second argument", SIGNATURE)?;
    let initial = args.get(2).filter(|v| v.is_defined()).cloned();
    reduce(&args[0], f, initial)
}

pub(super) fn builtin_foldl(args: Vec<Value>) -> Result<Value, RuntimeError> {
    const SIGNATURE: &str = "foldl(container, seed, fn)";
    check_arity(&args, 3, "foldl", SIGNATURE)?;
    let f = arg_function(&args, 2, "foldl", "third argument", SIGNATURE)?;
    foldl(&args[0], args[1].clone(), f)
}

pub(super) fn builtin_cmp(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "cmp", "cmp(a, b)")?;
    Ok(ordering_value(ordering::cmp(&args[0], &args[1])))
}

pub(super) fn builtin_greater(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "greater", "greater(a, b)")?;
    Ok(Value::Boolean(ordering::greater(&args[0], &args[1])))
}

pub(super) fn builtin_smaller(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2, "smaller", "smaller(a, b)")?;
    Ok(Value::Boolean(ordering::smaller(&args[0], &args[1])))
}

pub(super) fn builtin_sorted(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity_range(&args, 1, 3, "sorted", SORTED_SIGNATURE)?;
    let comparison = comparison_from(optional(&args, 1))?;
    let reverse = optional(&args, 2).is_some_and(Value::is_truthy);
    ordering::sorted(&args[0], &comparison, reverse)
}
