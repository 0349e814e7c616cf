use std::rc::Rc;

use crate::runtime::{
    class::{ClassDeclaration, declare_class},
    error::RuntimeError,
    value::Value,
};

use super::collection_ops::{
    access, builtin_copy, builtin_merge, copy, items, keys, merge, offset, pairs, values,
};

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().map(|v| Value::Integer(*v)).collect())
}

#[test]
fn keys_of_sequences_and_maps() {
    assert_eq!(keys(&ints(&[5, 6])).unwrap(), ints(&[0, 1]));
    let map = Value::map([("b", Value::Integer(1)), ("a", Value::Integer(2))]);
    assert_eq!(
        keys(&map).unwrap(),
        Value::array(vec![Value::from("b"), Value::from("a")])
    );
    assert_eq!(keys(&Value::None).unwrap(), Value::None);
    assert_eq!(keys(&Value::Integer(3)).unwrap(), Value::None);
}

#[test]
fn values_of_missing_is_empty() {
    assert_eq!(values(&Value::Undefined).unwrap(), Value::array(vec![]));
    assert_eq!(values(&Value::Integer(3)).unwrap(), Value::None);
    let map = Value::map([("a", Value::Integer(2))]);
    assert_eq!(values(&map).unwrap(), ints(&[2]));
}

#[test]
fn keys_of_an_instance_are_its_properties() {
    let point = declare_class(
        ClassDeclaration::named("Point")
            .property("x", 1)
            .property("y", 2),
    );
    let instance = Value::Instance(point.construct(&[]).unwrap());
    assert_eq!(
        keys(&instance).unwrap(),
        Value::array(vec![Value::from("x"), Value::from("y")])
    );
}

#[test]
fn items_and_pairs_shapes() {
    let list = ints(&[7]);
    assert_eq!(
        items(&list).unwrap(),
        Value::array(vec![Value::map([
            ("key", Value::Integer(0)),
            ("value", Value::Integer(7)),
        ])])
    );
    assert_eq!(
        pairs(&list).unwrap(),
        Value::array(vec![ints(&[0, 7])])
    );
}

#[test]
fn access_supports_negative_indices() {
    let list = ints(&[1, 2, 3]);
    assert_eq!(access(&list, &Value::Integer(-1)).unwrap(), Value::Integer(3));
    assert_eq!(access(&list, &Value::Integer(9)).unwrap(), Value::Undefined);
    assert_eq!(
        access(&Value::from("abc"), &Value::Integer(-2)).unwrap(),
        Value::from("b")
    );
    let map = Value::map([("k", Value::Integer(4))]);
    assert_eq!(access(&map, &Value::from("k")).unwrap(), Value::Integer(4));
}

#[test]
fn access_negative_on_map_is_unsupported() {
    let err = access(&Value::empty_map(), &Value::Integer(-1)).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::UnsupportedType { operation: "access", .. }
    ));
}

#[test]
fn offset_resolves_against_length() {
    assert_eq!(offset(&ints(&[1, 2, 3, 4]), -1).unwrap(), 3);
    assert_eq!(offset(&ints(&[1, 2, 3, 4]), 2).unwrap(), 2);
}

#[test]
fn copy_produces_a_fresh_container() {
    let inner = ints(&[1]);
    let outer = Value::array(vec![inner.clone()]);
    let shallow = copy(&outer, 1).unwrap();
    let deep = copy(&outer, 2).unwrap();
    match (&outer, &shallow, &deep) {
        (Value::Array(o), Value::Array(s), Value::Array(d)) => {
            assert!(!Rc::ptr_eq(o, s));
            assert_eq!(o, s);
            match (&o[0], &s[0], &d[0]) {
                (Value::Array(oi), Value::Array(si), Value::Array(di)) => {
                    assert!(Rc::ptr_eq(oi, si));
                    assert!(!Rc::ptr_eq(oi, di));
                }
                _ => panic!("expected nested arrays"),
            }
        }
        _ => panic!("expected arrays"),
    }
    assert_eq!(builtin_copy(vec![Value::Integer(3)]).unwrap(), Value::Integer(3));
}

#[test]
fn merge_lists_appends_missing_items() {
    let merged = merge(ints(&[1, 2]), &ints(&[2, 3]), false).unwrap();
    assert_eq!(merged, ints(&[1, 2, 3]));
}

#[test]
fn merge_maps_respects_replace() {
    let a = Value::map([("x", Value::Integer(1)), ("y", Value::Undefined)]);
    let b = Value::map([("x", Value::Integer(9)), ("y", Value::Integer(2))]);
    assert_eq!(
        merge(a.clone(), &b, false).unwrap(),
        Value::map([("x", Value::Integer(1)), ("y", Value::Integer(2))])
    );
    assert_eq!(
        builtin_merge(vec![a, b, Value::Boolean(true)]).unwrap(),
        Value::map([("x", Value::Integer(9)), ("y", Value::Integer(2))])
    );
}

#[test]
fn merge_mismatch_returns_value_unchanged() {
    let list = ints(&[1]);
    assert_eq!(merge(list.clone(), &Value::Integer(4), false).unwrap(), list);
}
