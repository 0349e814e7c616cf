use crate::runtime::{callable::Function, error::RuntimeError, value::Value};

use super::{
    get_builtin,
    higher_order::{builtin_cmp, builtin_sorted, filter, foldl, map, reduce},
};

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().map(|v| Value::Integer(*v)).collect())
}

fn int(value: &Value) -> i64 {
    match value {
        Value::Integer(v) => *v,
        _ => 0,
    }
}

fn sum() -> Function {
    Function::new("sum", |args| Ok(Value::Integer(int(&args[0]) + int(&args[1]))))
}

#[test]
fn map_receives_value_and_key() {
    let f = Function::new("value_plus_key", |args| {
        Ok(Value::Integer(int(&args[0]) + int(&args[1])))
    });
    assert_eq!(map(&ints(&[10, 20]), &f).unwrap(), ints(&[10, 21]));
}

#[test]
fn filter_with_processor() {
    let odd = Function::new("odd", |args| Ok(Value::Boolean(int(&args[0]) % 2 == 1)));
    let double = Function::new("double", |args| Ok(Value::Integer(int(&args[0]) * 2)));
    let list = ints(&[1, 2, 3]);
    assert_eq!(filter(&list, &odd, None).unwrap(), ints(&[1, 3]));
    assert_eq!(filter(&list, &odd, Some(&double)).unwrap(), ints(&[2, 6]));
}

#[test]
fn reduce_seeds_from_first_element() {
    assert_eq!(reduce(&ints(&[1, 2, 3]), &sum(), None).unwrap(), Value::Integer(6));
    assert_eq!(reduce(&ints(&[]), &sum(), None).unwrap(), Value::Undefined);
    assert_eq!(
        reduce(&ints(&[]), &sum(), Some(Value::Integer(0))).unwrap(),
        Value::Integer(0)
    );
}

#[test]
fn reduce_passes_ordinal() {
    let ordinals = Function::new("ordinals", |args| {
        Ok(Value::Integer(int(&args[0]) * 10 + int(&args[3])))
    });
    assert_eq!(
        reduce(&ints(&[7, 7, 7]), &ordinals, Some(Value::Integer(0))).unwrap(),
        Value::Integer(12)
    );
}

#[test]
fn undefined_result_keeps_accumulator() {
    let noop = Function::new("noop", |_| Ok(Value::Undefined));
    assert_eq!(
        reduce(&ints(&[1, 2]), &noop, Some(Value::Integer(5))).unwrap(),
        Value::Integer(5)
    );
}

#[test]
fn foldl_always_invokes_the_callback() {
    assert_eq!(foldl(&ints(&[4]), Value::Integer(1), &sum()).unwrap(), Value::Integer(5));
}

#[test]
fn cmp_returns_sign() {
    assert_eq!(
        builtin_cmp(vec![ints(&[1, 2]), ints(&[1, 3])]).unwrap(),
        Value::Integer(-1)
    );
    assert_eq!(
        builtin_cmp(vec![Value::from("b"), Value::from("a")]).unwrap(),
        Value::Integer(1)
    );
    assert_eq!(
        builtin_cmp(vec![Value::Integer(2), Value::Float(2.0)]).unwrap(),
        Value::Integer(0)
    );
}

#[test]
fn sorted_with_comparator_and_reverse() {
    let descending = Function::new("descending", |args| {
        Ok(Value::Integer(int(&args[1]) - int(&args[0])))
    });
    let list = ints(&[2, 3, 1]);
    assert_eq!(
        builtin_sorted(vec![list.clone(), Value::Function(descending)]).unwrap(),
        ints(&[3, 2, 1])
    );
    assert_eq!(
        builtin_sorted(vec![list, Value::None, Value::Boolean(true)]).unwrap(),
        ints(&[3, 2, 1])
    );
}

#[test]
fn sorted_with_extractors() {
    let row = |group: i64, n: i64| {
        Value::map([("group", Value::Integer(group)), ("n", Value::Integer(n))])
    };
    let field = |name: &'static str| {
        Value::Function(Function::new(name, move |args| match &args[0] {
            Value::Map(entries) => Ok(entries.get(name).cloned().unwrap_or(Value::Undefined)),
            _ => Ok(Value::Undefined),
        }))
    };
    let rows = Value::array(vec![row(2, 1), row(1, 9), row(1, 3)]);
    let extractors = Value::array(vec![field("group"), field("n")]);
    assert_eq!(
        builtin_sorted(vec![rows, extractors]).unwrap(),
        Value::array(vec![row(1, 3), row(1, 9), row(2, 1)])
    );
}

#[test]
fn sorted_rejects_non_numeric_comparator_result() {
    let broken = Function::new("broken", |_| Ok(Value::from("?")));
    let err = builtin_sorted(vec![ints(&[1, 2]), Value::Function(broken)]).unwrap_err();
    assert!(matches!(err, RuntimeError::Type(_)));
}

#[test]
fn sorted_of_function_is_unsupported() {
    let err = builtin_sorted(vec![Value::Function(sum())]).unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedType { .. }));
}

#[test]
fn every_builtin_is_reachable_by_name() {
    let map = get_builtin("map").unwrap();
    let double = Function::new("double", |args| Ok(Value::Integer(int(&args[0]) * 2)));
    assert_eq!(
        map.call(vec![ints(&[1, 2]), Value::Function(double)]).unwrap(),
        ints(&[2, 4])
    );
    assert!(get_builtin("print").is_none());
    for name in ["len", "keys", "slice", "union", "as_map", "foldl", "sorted"] {
        assert!(get_builtin(name).is_some(), "{} missing", name);
    }
}

#[test]
fn builtins_pass_as_callbacks() {
    let len = get_builtin("len").unwrap().to_value();
    let Value::Function(len) = len else {
        panic!("expected a function");
    };
    let words = Value::array(vec![Value::from("ab"), Value::from("abc")]);
    let err = map(&words, &len).unwrap_err();
    // `len` takes one argument, map passes (value, key).
    assert!(matches!(err, RuntimeError::Arity(_)));
}
