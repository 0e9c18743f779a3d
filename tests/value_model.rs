//! Value model tests through the public API.
//!
//! Covers the array and object contracts: index rules, key rules, iteration
//! order and ownership on failure.

use simjson::{Array, ErrorCode, Kind, Number, Object, Value};

fn ints(array: &Array) -> Vec<i64> {
    array.iter().filter_map(|(_, v)| v.as_i64()).collect()
}

// ============================================================================
// Array
// ============================================================================

#[test]
fn array_insert_then_get() {
    let mut array = Array::new();
    array.insert(Value::integer(10), 0).unwrap();
    array.insert(Value::integer(30), 1).unwrap();
    array.insert(Value::integer(20), 1).unwrap();
    array.insert(Value::integer(0), 0).unwrap();

    assert_eq!(ints(&array), vec![0, 10, 20, 30]);
    assert_eq!(array.get(2), Some(&Value::integer(20)));
}

#[test]
fn array_insert_at_size_appends() {
    let mut array = Array::new();
    for i in 0..5 {
        array.insert(Value::integer(i), array.len()).unwrap();
    }
    assert_eq!(ints(&array), vec![0, 1, 2, 3, 4]);
    assert_eq!(array.get(array.len() - 1), Some(&Value::integer(4)));
}

#[test]
fn array_delete_shifts_later_elements() {
    let mut array: Array = (0..6).map(Value::integer).collect();
    array.delete(2).unwrap();
    assert_eq!(ints(&array), vec![0, 1, 3, 4, 5]);
    assert_eq!(array.get(2), Some(&Value::integer(3)));

    array.delete(0).unwrap();
    array.delete(array.len() - 1).unwrap();
    assert_eq!(ints(&array), vec![1, 3, 4]);
}

#[test]
fn array_out_of_range_does_not_mutate() {
    let mut array: Array = (0..3).map(Value::integer).collect();

    assert_eq!(
        array.insert(Value::integer(9), 4),
        Err(ErrorCode::E200_IndexOutOfRange(4, 3))
    );
    assert_eq!(array.get(3), None);
    assert_eq!(array.delete(3), Err(ErrorCode::E200_IndexOutOfRange(3, 3)));
    assert_eq!(ints(&array), vec![0, 1, 2]);
}

#[test]
fn array_iterator_from_start_index() {
    let array: Array = (0..5).map(Value::integer).collect();
    let mut iter = array.iter_from(3).unwrap();

    assert!(iter.has_next());
    assert_eq!(iter.next(), Some((3, &Value::integer(3))));
    assert_eq!(iter.next(), Some((4, &Value::integer(4))));
    assert!(!iter.has_next());
    assert_eq!(iter.next(), None);
}

#[test]
fn array_iterator_needs_an_existing_element() {
    let empty = Array::new();
    assert_eq!(
        empty.iter_from(0).err(),
        Some(ErrorCode::E206_IteratorStartOutOfRange(0, 0))
    );
    assert_eq!(empty.iter().count(), 0);

    let array: Array = (0..2).map(Value::integer).collect();
    assert_eq!(
        array.iter_from(2).err(),
        Some(ErrorCode::E206_IteratorStartOutOfRange(2, 2))
    );
}

#[test]
fn array_get_mut_edits_in_place() {
    let mut array: Array = (0..3).map(Value::integer).collect();
    if let Some(slot) = array.get_mut(1) {
        *slot = Value::string("one");
    }
    assert_eq!(array.get(1).and_then(Value::as_str), Some("one"));
}

#[test]
fn nested_arrays_are_owned() {
    let mut inner = Array::new();
    inner.push(Value::integer(1));
    let mut outer = Array::new();
    outer.push(Value::Array(inner));
    outer.push(Value::Array(Array::new()));

    let copy = outer.clone();
    outer.delete(0).unwrap();
    assert_eq!(outer.len(), 1);
    assert_eq!(copy.len(), 2);
    assert_eq!(copy.get(0).and_then(|v| v.get_index(0)), Some(&Value::integer(1)));
}

// ============================================================================
// Object
// ============================================================================

#[test]
fn object_add_get_delete() {
    let mut object = Object::new();
    object.add("name", Value::string("Bob")).unwrap();
    object.add("age", Value::integer(30)).unwrap();

    assert_eq!(object.len(), 2);
    assert_eq!(object.get("name").and_then(Value::as_str), Some("Bob"));

    object.delete("name").unwrap();
    assert_eq!(object.get("name"), None);
    assert_eq!(object.len(), 1);
}

#[test]
fn object_duplicate_key_keeps_original() {
    let mut object = Object::new();
    object.add("k", Value::integer(1)).unwrap();

    assert_eq!(
        object.add("k", Value::integer(2)),
        Err(ErrorCode::E202_DuplicateKey("k".to_string()))
    );
    assert_eq!(object.get("k"), Some(&Value::integer(1)));
    assert_eq!(object.len(), 1);
}

#[test]
fn object_key_errors() {
    let mut object = Object::new();
    assert_eq!(object.add("", Value::null()), Err(ErrorCode::E201_EmptyKey));
    assert_eq!(
        object.delete("missing"),
        Err(ErrorCode::E203_KeyNotFound("missing".to_string()))
    );
    assert!(object.is_empty());
}

#[test]
fn object_keys_are_raw_bytes() {
    let mut object = Object::new();
    object.add(b"a\0b", Value::integer(1)).unwrap();
    object.add(b"a", Value::integer(2)).unwrap();

    assert_eq!(object.get(b"a\0b"), Some(&Value::integer(1)));
    assert_eq!(object.get("a"), Some(&Value::integer(2)));
    assert!(!object.contains_key(b"a\0"));
}

#[test]
fn object_iteration_visits_every_entry_once() {
    let mut object = Object::with_buckets(4);
    for i in 0..20 {
        object.add(format!("key{}", i), Value::integer(i)).unwrap();
    }

    let mut seen: Vec<i64> = object.iter().filter_map(|(_, v)| v.as_i64()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..20).collect::<Vec<_>>());
    assert_eq!(object.iter().len(), 20);
}

#[test]
fn object_iteration_is_bucket_then_newest_first() {
    let mut object = Object::new();
    for key in ["alpha", "beta", "gamma", "delta"] {
        object.add(key, Value::null()).unwrap();
    }

    let keys: Vec<&[u8]> = object.iter().map(|(k, _)| k).collect();
    let buckets: Vec<usize> = keys.iter().map(|k| object.bucket_index(k)).collect();
    let mut sorted = buckets.clone();
    sorted.sort_unstable();
    assert_eq!(buckets, sorted);
}

#[test]
fn single_bucket_object_is_a_stack() {
    let mut object = Object::with_buckets(1);
    for key in ["a", "b", "c"] {
        object.add(key, Value::null()).unwrap();
    }
    let keys: Vec<&[u8]> = object.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![&b"c"[..], &b"b"[..], &b"a"[..]]);
}

#[test]
fn object_get_mut_and_equality() {
    let mut a = Object::with_buckets(2);
    let mut b = Object::with_buckets(16);
    for (k, v) in [("x", 1), ("y", 2)] {
        a.add(k, Value::integer(v)).unwrap();
    }
    for (k, v) in [("y", 2), ("x", 1)] {
        b.add(k, Value::integer(v)).unwrap();
    }
    assert_eq!(a, b);

    if let Some(v) = a.get_mut("x") {
        *v = Value::integer(100);
    }
    assert_ne!(a, b);
}

// ============================================================================
// Scalars and Value
// ============================================================================

#[test]
fn number_requires_exactly_one_payload() {
    assert_eq!(Number::new(Some(1), None), Ok(Number::Integer(1)));
    assert_eq!(Number::new(None, Some(1.5)), Ok(Number::Float(1.5)));
    assert_eq!(
        Number::new(Some(1), Some(1.5)),
        Err(ErrorCode::E204_InvalidNumberPayload)
    );
    assert_eq!(Number::new(None, None), Err(ErrorCode::E204_InvalidNumberPayload));
}

#[test]
fn kinds_have_stable_tags() {
    let values = [
        Value::string("s"),
        Value::integer(1),
        Value::boolean(true),
        Value::null(),
        Value::array(),
        Value::object(0),
    ];
    let tags: Vec<u8> = values.iter().map(|v| v.kind() as u8).collect();
    assert_eq!(tags, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(values[4].kind(), Kind::Array);
}

#[test]
fn long_chains_drop_and_clone() {
    let mut object = Object::with_buckets(1);
    for i in 0..5_000 {
        object.add(format!("k{}", i), Value::integer(i)).unwrap();
    }
    let copy = object.clone();
    assert_eq!(copy, object);
    drop(object);
    assert_eq!(copy.get("k4999"), Some(&Value::integer(4999)));
}

#[test]
fn deeply_nested_tree_drops_without_recursion() {
    let mut value = Value::integer(0);
    for level in 0..100_000 {
        value = if level % 2 == 0 {
            let mut array = Array::new();
            array.push(value);
            Value::Array(array)
        } else {
            let mut object = Object::with_buckets(2);
            object.add("k", value).unwrap();
            Value::Object(object)
        };
    }
    assert!(value.is_object());
    drop(value);
}
