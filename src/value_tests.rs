use super::*;
use crate::parse;

#[test]
fn typed_accessors() {
    let root = parse(
        "s = \"x\"\nn = 1\nf = 0.5\nb = true\narr = [1]\ntab = {}\nodt = 1970-01-01T00:00:00Z\nld = 1970-01-01\n",
    )
    .unwrap();

    let s = root.get("s").unwrap();
    assert_eq!(s.as_str(), Some("x"));
    assert_eq!(s.as_integer(), None);
    assert_eq!(s.type_str(), "string");

    let n = root.get("n").unwrap();
    assert_eq!(n.as_integer(), Some(1));
    assert_eq!(n.as_float(), None);
    assert_eq!(n.type_str(), "integer");

    let f = root.get("f").unwrap();
    assert_eq!(f.as_float(), Some(0.5));
    assert_eq!(f.as_bool(), None);

    let b = root.get("b").unwrap();
    assert_eq!(b.as_bool(), Some(true));
    assert_eq!(b.as_str(), None);

    let arr = root.get("arr").unwrap();
    assert_eq!(arr.as_array().map(Vec::len), Some(1));
    assert!(arr.as_table().is_none());

    let tab = root.get("tab").unwrap();
    assert!(tab.as_table().is_some());
    assert!(tab.as_array().is_none());

    let odt = root.get("odt").unwrap();
    assert_eq!(odt.as_offset_datetime().map(|d| d.epoch_seconds), Some(0));
    assert_eq!(odt.as_local_lexeme(), None);
    assert_eq!(odt.type_str(), "offset date-time");

    let ld = root.get("ld").unwrap();
    assert_eq!(ld.as_local_lexeme(), Some("1970-01-01"));
    assert!(ld.as_offset_datetime().is_none());
    assert_eq!(ld.type_str(), "local date");
}

#[test]
fn mutable_accessors() {
    let mut root = parse("arr = [1]\ntab = {x = 1}").unwrap();

    root.get_mut("arr")
        .unwrap()
        .as_array_mut()
        .unwrap()
        .push(Value::Integer(2));
    assert_eq!(root.get("arr").unwrap().as_array().unwrap().len(), 2);

    let tab = root.get_mut("tab").unwrap().as_table_mut().unwrap();
    *tab.get_mut("x").unwrap() = Value::Boolean(false);
    assert_eq!(
        root.get("tab").unwrap().as_table().unwrap().get("x").unwrap().as_bool(),
        Some(false)
    );
}

#[test]
fn local_variants_are_distinct() {
    let dt = Value::LocalDatetime("1979-05-27T07:32:00".to_string());
    let d = Value::LocalDate("1979-05-27".to_string());
    let t = Value::LocalTime("07:32:00".to_string());
    assert_ne!(dt, d);
    assert_ne!(d, t);
    assert_eq!(dt.type_str(), "local date-time");
    assert_eq!(t.type_str(), "local time");
}

#[test]
fn debug_forwards_to_payload() {
    assert_eq!(format!("{:?}", Value::Integer(3)), "3");
    assert_eq!(format!("{:?}", Value::String("hi".to_string())), "\"hi\"");
    assert_eq!(format!("{:?}", Value::Boolean(false)), "false");
    assert_eq!(
        format!("{:?}", Value::Array(vec![Value::Integer(1), Value::Integer(2)])),
        "[1, 2]"
    );
    assert_eq!(
        format!("{:?}", Value::LocalDate("1979-05-27".to_string())),
        "\"1979-05-27\""
    );
}

#[test]
fn keys_compare_by_name_only() {
    let a = Key {
        name: "k".to_string(),
        span: crate::Span::new(0, 1),
    };
    let b = Key {
        name: "k".to_string(),
        span: crate::Span::new(9, 10),
    };
    assert_eq!(a, b);
    assert_eq!(&a, "k");
    assert_eq!(format!("{a}"), "k");
    assert_eq!(format!("{a:?}"), "k");
}
