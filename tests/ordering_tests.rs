use std::cmp::Ordering;

use extend::runtime::{
    callable::Function,
    class::{ClassDeclaration, declare_class},
    error::RuntimeError,
    ordering::{Comparison, Extractor, cmp, equals, greater, smaller, sorted},
    typed_array::TypedArray,
    value::Value,
};

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().map(|v| Value::Integer(*v)).collect())
}

#[test]
fn every_scalar_equals_itself() {
    for value in [
        Value::Undefined,
        Value::None,
        Value::Boolean(true),
        Value::Integer(-4),
        Value::Float(0.25),
        Value::Float(f64::NAN),
        Value::from(""),
        Value::from("abc"),
    ] {
        assert_eq!(cmp(&value, &value), Ordering::Equal, "{}", value);
    }
}

#[test]
fn sequences_compare_element_wise() {
    assert_eq!(cmp(&ints(&[1, 2]), &ints(&[1, 3])), Ordering::Less);
    assert_eq!(cmp(&ints(&[1, 2]), &ints(&[1, 2, 3])), Ordering::Less);
    assert_eq!(cmp(&ints(&[2]), &ints(&[1, 9, 9])), Ordering::Greater);
    assert_eq!(cmp(&ints(&[]), &ints(&[])), Ordering::Equal);
}

#[test]
fn typed_and_plain_sequences_compare_by_content() {
    let typed = Value::from(TypedArray::Int32(vec![1, 2]));
    assert_eq!(cmp(&typed, &ints(&[1, 2])), Ordering::Equal);
    assert_eq!(cmp(&typed, &ints(&[1, 3])), Ordering::Less);
}

#[test]
fn maps_compare_over_sorted_key_union() {
    let a = Value::map([("a", Value::Integer(1)), ("b", Value::Integer(2))]);
    let b = Value::map([("b", Value::Integer(2)), ("a", Value::Integer(1))]);
    assert_eq!(cmp(&a, &b), Ordering::Equal);

    let missing_a = Value::map([("b", Value::Integer(2))]);
    assert_eq!(cmp(&missing_a, &a), Ordering::Less);

    let undefined_a = Value::map([("a", Value::Undefined), ("b", Value::Integer(2))]);
    assert_eq!(cmp(&undefined_a, &missing_a), Ordering::Equal);

    let bigger = Value::map([("a", Value::Integer(5))]);
    assert_eq!(cmp(&bigger, &a), Ordering::Greater);
}

#[test]
fn kinds_order_by_rank() {
    let class = declare_class(ClassDeclaration::named("Ranked"));
    let ladder = [
        Value::Undefined,
        Value::None,
        Value::Boolean(true),
        Value::Integer(1_000),
        Value::from("a"),
        ints(&[1]),
        Value::empty_map(),
        Value::Function(Function::new("f", |_| Ok(Value::None))),
        Value::Class(class.clone()),
        Value::Instance(class.construct(&[]).unwrap()),
    ];
    for pair in ladder.windows(2) {
        assert_eq!(cmp(&pair[0], &pair[1]), Ordering::Less, "{} < {}", pair[0], pair[1]);
        assert_eq!(cmp(&pair[1], &pair[0]), Ordering::Greater);
    }
}

#[test]
fn numbers_mix_and_nan_sorts_last() {
    assert!(equals(&Value::Integer(3), &Value::Float(3.0)));
    assert!(smaller(&Value::Integer(3), &Value::Float(3.5)));
    assert!(greater(&Value::Float(f64::NAN), &Value::Float(f64::INFINITY)));
    assert!(smaller(&Value::Boolean(false), &Value::Boolean(true)));
}

#[test]
fn instances_compare_by_class_then_identity() {
    let first = declare_class(ClassDeclaration::named("First"));
    let second = declare_class(ClassDeclaration::named("Second"));
    let a = Value::Instance(first.construct(&[]).unwrap());
    let b = Value::Instance(second.construct(&[]).unwrap());
    assert_eq!(cmp(&a, &b), Ordering::Less);
    assert_eq!(cmp(&a, &a.clone()), Ordering::Equal);
    let other = Value::Instance(first.construct(&[]).unwrap());
    assert_ne!(cmp(&a, &other), Ordering::Equal);
}

#[test]
fn sorted_natural_and_reverse() {
    let mixed = Value::array(vec![
        Value::from("b"),
        Value::Integer(2),
        Value::None,
        Value::Float(1.5),
        Value::from("a"),
    ]);
    assert_eq!(
        sorted(&mixed, &Comparison::Natural, false).unwrap(),
        Value::array(vec![
            Value::None,
            Value::Float(1.5),
            Value::Integer(2),
            Value::from("a"),
            Value::from("b"),
        ])
    );
    assert_eq!(
        sorted(&ints(&[1, 3, 2]), &Comparison::Natural, true).unwrap(),
        ints(&[3, 2, 1])
    );
}

#[test]
fn sorted_map_yields_sorted_values() {
    let map = Value::map([
        ("x", Value::Integer(3)),
        ("y", Value::Integer(1)),
        ("z", Value::Integer(2)),
    ]);
    assert_eq!(
        sorted(&map, &Comparison::Natural, false).unwrap(),
        ints(&[1, 2, 3])
    );
}

#[test]
fn sorted_passes_scalars_through() {
    assert_eq!(
        sorted(&Value::Integer(3), &Comparison::Natural, false).unwrap(),
        Value::Integer(3)
    );
    assert_eq!(
        sorted(&Value::None, &Comparison::Natural, true).unwrap(),
        Value::None
    );
}

#[test]
fn sorted_rejects_opaque_values() {
    let class = declare_class(ClassDeclaration::named("Opaque"));
    for value in [
        Value::Class(class.clone()),
        Value::Instance(class.construct(&[]).unwrap()),
        Value::Function(Function::new("f", |_| Ok(Value::None))),
    ] {
        let err = sorted(&value, &Comparison::Natural, false).unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedType { operation: "sorted", .. }));
    }
}

#[test]
fn extractors_are_lexicographic() {
    let record = |name: &str, age: i64| {
        Value::map([("name", Value::from(name)), ("age", Value::Integer(age))])
    };
    let field = |key: &'static str| -> Extractor {
        Box::new(move |item: &Value| match item {
            Value::Map(entries) => Ok(entries.get(key).cloned().unwrap_or(Value::Undefined)),
            _ => Ok(Value::Undefined),
        })
    };
    let people = Value::array(vec![record("cy", 30), record("al", 40), record("bo", 30)]);
    let by_age_then_name = Comparison::Extractors(vec![field("age"), field("name")]);
    assert_eq!(
        sorted(&people, &by_age_then_name, false).unwrap(),
        Value::array(vec![record("bo", 30), record("cy", 30), record("al", 40)])
    );
}

#[test]
fn comparator_errors_propagate() {
    let failing = Comparison::Comparator(Box::new(
        |_: &Value, _: &Value| -> Result<Ordering, RuntimeError> {
            Err(RuntimeError::raise("cmp"))
        },
    ));
    let err = sorted(&ints(&[2, 1]), &failing, false).unwrap_err();
    assert!(matches!(err, RuntimeError::Raised(_)));
}

#[test]
fn custom_comparator_orders_descending() {
    let descending = Comparison::Comparator(Box::new(|a: &Value, b: &Value| Ok(cmp(b, a))));
    assert_eq!(
        sorted(&ints(&[2, 9, 4]), &descending, false).unwrap(),
        ints(&[9, 4, 2])
    );
}

/// A fixed grid of mixed values, including integers and floats around 2^53
/// where an `f64` cast would round.
fn grid() -> Vec<Value> {
    const EDGE: i64 = 1 << 53;
    vec![
        Value::Undefined,
        Value::None,
        Value::Boolean(false),
        Value::Boolean(true),
        Value::Integer(-3),
        Value::Float(-2.5),
        Value::Integer(0),
        Value::Float(-0.0),
        Value::Float(0.5),
        Value::Integer(EDGE),
        Value::Float(EDGE as f64),
        Value::Integer(EDGE + 1),
        Value::Float((EDGE + 2) as f64),
        Value::Integer(i64::MAX),
        Value::Float(9.3e18),
        Value::Float(f64::INFINITY),
        Value::Float(f64::NEG_INFINITY),
        Value::Integer(i64::MIN),
        Value::Float(f64::NAN),
        Value::from(""),
        Value::from("b"),
        ints(&[1]),
        ints(&[1, 2]),
        Value::array(vec![Value::Float(1.5)]),
        Value::array(vec![Value::Float(f64::NAN)]),
        Value::from(TypedArray::Int32(vec![1, 2])),
        Value::empty_map(),
        Value::map([("a", Value::Integer(EDGE + 1))]),
        Value::map([("a", Value::Float(EDGE as f64))]),
        Value::map([("b", Value::None)]),
    ]
}

#[test]
fn cmp_is_antisymmetric_and_transitive() {
    let values = grid();
    for a in &values {
        for b in &values {
            assert_eq!(cmp(a, b), cmp(b, a).reverse(), "{} vs {}", a, b);
            for c in &values {
                let (ab, bc, ac) = (cmp(a, b), cmp(b, c), cmp(a, c));
                if ab != Ordering::Greater && bc != Ordering::Greater {
                    assert_ne!(ac, Ordering::Greater, "{} <= {} <= {}", a, b, c);
                }
                if ab == Ordering::Equal && bc == Ordering::Equal {
                    assert_eq!(ac, Ordering::Equal, "{} == {} == {}", a, b, c);
                }
            }
        }
    }
}

#[test]
fn large_integers_compare_exactly_with_floats() {
    const EDGE: i64 = 1 << 53;
    let float_edge = Value::Float(EDGE as f64);
    assert_eq!(cmp(&Value::Integer(EDGE), &float_edge), Ordering::Equal);
    assert_eq!(cmp(&Value::Integer(EDGE + 1), &float_edge), Ordering::Greater);
    assert_eq!(cmp(&float_edge, &Value::Integer(EDGE + 1)), Ordering::Less);
    assert_eq!(cmp(&Value::Integer(i64::MAX), &Value::Float(9.3e18)), Ordering::Less);
    assert_eq!(
        cmp(&Value::Integer(i64::MIN), &Value::Float(f64::NEG_INFINITY)),
        Ordering::Greater
    );
    assert_eq!(cmp(&Value::Integer(2), &Value::Float(2.5)), Ordering::Less);
    assert_eq!(cmp(&Value::Integer(-2), &Value::Float(-2.5)), Ordering::Greater);
}

#[test]
fn sorting_mixed_large_numbers_is_ordered() {
    const EDGE: i64 = 1 << 53;
    let items: Vec<Value> = (0..400_i64)
        .map(|i| {
            let n = EDGE - 200 + i * 7 % 400;
            if i % 2 == 0 {
                Value::Integer(n)
            } else {
                Value::Float(n as f64)
            }
        })
        .collect();
    let Value::Array(out) = sorted(&Value::array(items), &Comparison::Natural, false).unwrap()
    else {
        panic!("expected an array");
    };
    assert_eq!(out.len(), 400);
    for pair in out.windows(2) {
        assert_ne!(cmp(&pair[0], &pair[1]), Ordering::Greater);
    }
}

#[test]
fn inconsistent_comparator_still_sorts() {
    let erratic = Comparison::Comparator(Box::new(
        |a: &Value, b: &Value| -> Result<Ordering, RuntimeError> {
            let (Value::Integer(x), Value::Integer(y)) = (a, b) else {
                return Ok(Ordering::Equal);
            };
            Ok(if (x + y) % 3 == 0 { Ordering::Less } else { x.cmp(y) })
        },
    ));
    let input: Vec<i64> = (0..100).map(|i| (i * 37) % 100).collect();
    let Value::Array(out) = sorted(&ints(&input), &erratic, false).unwrap() else {
        panic!("expected an array");
    };
    let mut seen: Vec<i64> = out
        .iter()
        .map(|v| match v {
            Value::Integer(n) => *n,
            _ => -1,
        })
        .collect();
    seen.sort();
    assert_eq!(seen, (0..100).collect::<Vec<_>>());
}

#[test]
fn comparator_sort_is_stable() {
    let by_tens = Comparison::Comparator(Box::new(|a: &Value, b: &Value| match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok((x / 10).cmp(&(y / 10))),
        _ => Ok(Ordering::Equal),
    }));
    assert_eq!(
        sorted(&ints(&[21, 13, 25, 11, 2]), &by_tens, false).unwrap(),
        ints(&[2, 13, 11, 21, 25])
    );
}
