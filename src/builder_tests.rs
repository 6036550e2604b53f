use super::*;
use crate::ErrorKind;

fn key(name: &str) -> Key {
    Key {
        name: name.to_string(),
        span: Span::new(0, name.len() as u32),
    }
}

fn path(names: &[&str]) -> Vec<Key> {
    names.iter().map(|n| key(n)).collect()
}

#[test]
fn open_table_creates_the_full_path() {
    let mut b = Builder::new();
    b.open_table(&path(&["a", "b", "c"])).unwrap();

    let root = b.into_root();
    let c = root
        .get("a")
        .unwrap()
        .as_table()
        .unwrap()
        .get("b")
        .unwrap()
        .as_table()
        .unwrap()
        .get("c")
        .unwrap();
    assert!(c.as_table().unwrap().is_empty());
}

#[test]
fn current_table_follows_the_last_header() {
    let mut b = Builder::new();
    b.open_table(&path(&["t"])).unwrap();
    insert_value(b.current_table(), key("x"), Value::Integer(1)).unwrap();

    let root = b.into_root();
    let t = root.get("t").unwrap().as_table().unwrap();
    assert_eq!(t.get("x").unwrap().as_integer(), Some(1));
}

#[test]
fn reopening_a_declared_table_is_an_error() {
    let mut b = Builder::new();
    b.open_table(&path(&["t"])).unwrap();
    let err = b.open_table(&path(&["t"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateTable { .. }));
}

#[test]
fn implicit_parents_can_be_declared_later() {
    let mut b = Builder::new();
    b.open_table(&path(&["a", "b"])).unwrap();
    // `a` was only created implicitly, so `[a]` is still available.
    b.open_table(&path(&["a"])).unwrap();
    // but a second [a.b] is not
    let err = b.open_table(&path(&["a", "b"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateTable { .. }));
}

#[test]
fn array_of_tables_appends_entries() {
    let mut b = Builder::new();
    b.open_array_of_tables(&path(&["a"])).unwrap();
    insert_value(b.current_table(), key("n"), Value::Integer(1)).unwrap();
    b.open_array_of_tables(&path(&["a"])).unwrap();
    insert_value(b.current_table(), key("n"), Value::Integer(2)).unwrap();

    let root = b.into_root();
    let arr = root.get("a").unwrap().as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0].as_table().unwrap().get("n").unwrap().as_integer(), Some(1));
    assert_eq!(arr[1].as_table().unwrap().get("n").unwrap().as_integer(), Some(2));
}

#[test]
fn header_descends_into_the_latest_entry() {
    let mut b = Builder::new();
    b.open_array_of_tables(&path(&["a"])).unwrap();
    b.open_array_of_tables(&path(&["a"])).unwrap();
    b.open_table(&path(&["a", "sub"])).unwrap();
    insert_value(b.current_table(), key("x"), Value::Integer(1)).unwrap();

    let root = b.into_root();
    let arr = root.get("a").unwrap().as_array().unwrap();
    // the sub-table landed in the second entry, not the first
    assert!(arr[0].as_table().unwrap().is_empty());
    assert!(arr[1].as_table().unwrap().contains_key("sub"));
}

#[test]
fn static_arrays_are_sealed() {
    let mut b = Builder::new();
    insert_value(
        b.current_table(),
        key("a"),
        Value::Array(vec![Value::Integer(1)]),
    )
    .unwrap();

    let err = b.open_array_of_tables(&path(&["a"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaticArrayExtension));
    let err = b.open_table(&path(&["a", "b"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaticArrayExtension));
}

#[test]
fn scalars_do_not_become_tables() {
    let mut b = Builder::new();
    insert_value(b.current_table(), key("a"), Value::Integer(1)).unwrap();

    let err = b.open_table(&path(&["a"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { .. }));
    let err = b.open_array_of_tables(&path(&["a"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { .. }));
}

#[test]
fn dotted_navigation_creates_and_reuses() {
    let mut b = Builder::new();
    let root = b.current_table();
    let inner = navigate_dotted_key(root, &key("a")).unwrap();
    insert_value(inner, key("x"), Value::Integer(1)).unwrap();

    // a second pass reuses the same sub-table
    let root = b.current_table();
    let inner = navigate_dotted_key(root, &key("a")).unwrap();
    insert_value(inner, key("y"), Value::Integer(2)).unwrap();

    let root = b.into_root();
    let a = root.get("a").unwrap().as_table().unwrap();
    assert_eq!(a.len(), 2);
}

#[test]
fn dotted_navigation_rejects_non_tables() {
    let mut b = Builder::new();
    insert_value(b.current_table(), key("a"), Value::Boolean(true)).unwrap();
    let err = navigate_dotted_key(b.current_table(), &key("a")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { .. }));
}

#[test]
fn duplicate_insert_reports_the_first_span() {
    let mut b = Builder::new();
    let first = Key {
        name: "k".to_string(),
        span: Span::new(5, 6),
    };
    let second = Key {
        name: "k".to_string(),
        span: Span::new(20, 21),
    };
    insert_value(b.current_table(), first, Value::Integer(1)).unwrap();
    let err = insert_value(b.current_table(), second, Value::Integer(2)).unwrap_err();
    let ErrorKind::DuplicateKey { key, first } = err.kind else {
        panic!("wrong kind: {:?}", err.kind);
    };
    assert_eq!(key, "k");
    assert_eq!(first, Span::new(5, 6));
    assert_eq!(err.span, Span::new(20, 21));
}
