use extend::runtime::{
    builtins::get_builtin,
    callable::Function,
    class::{ClassDeclaration, declare_class},
    typed_array::TypedArray,
    value::Value,
};

fn json(value: &Value) -> String {
    serde_json::to_string(value).unwrap()
}

fn nested() -> Value {
    Value::map([
        ("name", Value::from("grid")),
        ("size", Value::array(vec![Value::Integer(2), Value::Integer(3)])),
        ("scale", Value::Float(0.5)),
        ("hidden", Value::Boolean(false)),
        ("parent", Value::None),
    ])
}

#[test]
fn display_of_nested_containers() {
    insta::assert_snapshot!(
        nested().to_string(),
        @r#"{"name": "grid", "size": [2, 3], "scale": 0.5, "hidden": false, "parent": None}"#
    );
}

#[test]
fn display_of_opaque_values() {
    let class = declare_class(ClassDeclaration::named("Point"));
    let rendered = [
        Value::Undefined,
        Value::Function(Function::new("area", |_| Ok(Value::None))),
        Value::Class(class.clone()),
        Value::Instance(class.construct(&[]).unwrap()),
        Value::from(TypedArray::Int8(vec![1, -1])),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join(" ");
    insta::assert_snapshot!(
        rendered,
        @"undefined <function area> <class Point> <Point instance> [1, -1]"
    );
}

#[test]
fn json_keeps_map_order() {
    insta::assert_snapshot!(
        json(&nested()),
        @r#"{"name":"grid","size":[2,3],"scale":0.5,"hidden":false,"parent":null}"#
    );
}

#[test]
fn json_of_an_instance_is_its_properties() {
    let class = declare_class(
        ClassDeclaration::named("Pixel")
            .property("x", 0)
            .property("y", 0),
    );
    let pixel = class.construct(&[]).unwrap();
    pixel.set("y", 7);
    pixel.set("tag", "hot");
    insta::assert_snapshot!(json(&Value::Instance(pixel)), @r#"{"x":0,"y":7,"tag":"hot"}"#);
}

#[test]
fn json_drops_what_has_no_data() {
    let value = Value::array(vec![
        Value::Undefined,
        Value::Function(Function::new("f", |_| Ok(Value::None))),
        Value::from(TypedArray::Int32(vec![4])),
    ]);
    insta::assert_snapshot!(json(&value), @"[null,null,[4]]");
}

#[test]
fn items_and_pairs_render() {
    let map = Value::map([("a", Value::Integer(1)), ("b", Value::Integer(2))]);
    let items = get_builtin("items").unwrap().call(vec![map.clone()]).unwrap();
    let pairs = get_builtin("pairs").unwrap().call(vec![map]).unwrap();
    insta::assert_snapshot!(
        json(&items),
        @r#"[{"key":"a","value":1},{"key":"b","value":2}]"#
    );
    insta::assert_snapshot!(json(&pairs), @r#"[["a",1],["b",2]]"#);
}

#[test]
fn arity_error_message() {
    let err = get_builtin("slice").unwrap().call(vec![]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r"
    wrong number of arguments

      function: slice/1..3
      expected: 1..3
      got: 0

    Hint:
      slice(value, start=0, end?)
    ");
}
