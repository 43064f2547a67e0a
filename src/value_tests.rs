use super::*;

#[test]
fn kind_names() {
    let kinds = [
        (ValueKind::Empty, "empty"),
        (ValueKind::String, "string"),
        (ValueKind::Int, "int"),
        (ValueKind::Float, "float"),
        (ValueKind::Bool, "bool"),
        (ValueKind::Array, "array"),
        (ValueKind::Vec2, "vec2"),
        (ValueKind::Vec3, "vec3"),
        (ValueKind::Vec4, "vec4"),
        (ValueKind::Object, "object"),
    ];
    for (kind, name) in kinds {
        assert_eq!(kind.as_str(), name);
        assert_eq!(kind.to_string(), name);
    }
}

#[test]
fn kind_predicates() {
    assert_eq!(ValueKind::vector(2), Some(ValueKind::Vec2));
    assert_eq!(ValueKind::vector(4), Some(ValueKind::Vec4));
    assert_eq!(ValueKind::vector(1), None);
    assert_eq!(ValueKind::vector(5), None);

    assert!(ValueKind::String.is_scalar());
    assert!(ValueKind::Bool.is_scalar());
    assert!(!ValueKind::Object.is_scalar());
    assert!(!ValueKind::Vec2.is_scalar());
    assert!(!ValueKind::Empty.is_scalar());
}

#[test]
fn vector_arity_and_components() {
    let v = Vector::new([1.0, 2.5, 3.0, 0.0], 3);
    assert_eq!(v.arity(), 3);
    assert_eq!(v.kind(), ValueKind::Vec3);
    assert_eq!(v.components(), &[1.0, 2.5, 3.0]);
    assert_eq!(v.raw(), [1.0, 2.5, 3.0, 0.0]);
    assert_eq!(v.to_array::<3>(), Some([1.0, 2.5, 3.0]));
    assert_eq!(v.to_array::<2>(), None);
    assert_eq!(v.to_array::<4>(), None);
}

#[test]
fn vector_kinds_follow_arity() {
    assert_eq!(Vector::new([0.0; 4], 2).kind(), ValueKind::Vec2);
    assert_eq!(Vector::new([0.0; 4], 4).kind(), ValueKind::Vec4);
}

#[test]
fn accessors_do_not_convert() {
    let int = Value::Int(7);
    assert_eq!(int.kind(), ValueKind::Int);
    assert_eq!(int.as_int(), Some(7));
    assert_eq!(int.as_float(), None);
    assert_eq!(int.as_bool(), None);
    assert!(int.as_str().is_none());

    let float = Value::Float(7.0);
    assert_eq!(float.as_float(), Some(7.0));
    assert_eq!(float.as_int(), None);

    let b = Value::Bool(true);
    assert_eq!(b.as_bool(), Some(true));
    assert_eq!(b.as_int(), None);

    let s = Value::String(Str::from("7"));
    assert_eq!(s.as_str().unwrap(), "7");
    assert_eq!(s.as_int(), None);
    assert!(s.as_array().is_none());
    assert!(s.as_object().is_none());
}

#[test]
fn vector_value_accessors() {
    let v2 = Value::Vector(Vector::new([3.0, 4.0, 0.0, 0.0], 2));
    assert_eq!(v2.kind(), ValueKind::Vec2);
    assert_eq!(v2.as_vec2(), Some([3.0, 4.0]));
    assert_eq!(v2.as_vec3(), None);
    assert_eq!(v2.as_vec4(), None);
    assert_eq!(v2.as_vector().map(|v| v.arity()), Some(2));

    let v4 = Value::Vector(Vector::new([1.0, 2.0, 3.0, 4.0], 4));
    assert_eq!(v4.kind(), ValueKind::Vec4);
    assert_eq!(v4.as_vec4(), Some([1.0, 2.0, 3.0, 4.0]));
    assert_eq!(v4.as_vec2(), None);
    assert_eq!(Value::Int(1).as_vec2(), None);
}

#[test]
fn empty_and_containers() {
    assert!(Value::Empty.is_empty());
    assert_eq!(Value::Empty.kind(), ValueKind::Empty);
    assert!(!Value::Int(0).is_empty());

    let arr = Value::Array(Array::EMPTY);
    assert_eq!(arr.kind(), ValueKind::Array);
    assert_eq!(arr.as_array().map(|a| a.len()), Some(0));

    let obj = Value::Object(Fields::default());
    assert_eq!(obj.kind(), ValueKind::Object);
    assert!(obj.as_object().is_some_and(|f| f.is_empty()));
}

#[test]
fn debug_output() {
    assert_eq!(format!("{:?}", Value::Int(-4)), "-4");
    assert_eq!(format!("{:?}", Value::Float(1.5)), "1.5");
    assert_eq!(format!("{:?}", Value::String(Str::from("s"))), "\"s\"");
    assert_eq!(format!("{:?}", Value::Empty), "Empty");
    assert_eq!(
        format!("{:?}", Value::Vector(Vector::new([1.0, 2.0, 0.0, 0.0], 2))),
        "vec2[1.0, 2.0]"
    );
    assert_eq!(format!("{:?}", Value::Object(Fields::default())), "{}");
}

#[test]
fn value_is_small() {
    assert!(std::mem::size_of::<Value<'_>>() <= 32);
}
