//! Array element and `length` behavior

use super::*;
use objcore::{ObjectRef, RealmConfig};

fn array_len(realm: &mut Realm, array: &JsValue) -> f64 {
    realm.get(array, "length").unwrap().to_number()
}

#[test]
fn test_index_read_and_write() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0), n(2.0)]);
    assert_eq!(realm.get(&arr, "1").unwrap(), n(2.0));

    realm.set_property(&arr, &n(0.0), s("zero")).unwrap();
    assert_eq!(realm.get_property(&arr, &n(0.0)).unwrap(), s("zero"));
    assert_eq!(array_len(&mut realm, &arr), 2.0);
}

#[test]
fn test_write_past_end_leaves_holes() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![]);
    realm.set(&arr, "5", n(1.0)).unwrap();

    assert_eq!(array_len(&mut realm, &arr), 6.0);
    for i in 0..5u32 {
        assert_eq!(realm.get_property(&arr, &JsValue::from(i)).unwrap(), JsValue::Undefined);
    }
    assert_eq!(keys(&mut realm, &arr), vec!["5"]);
}

#[test]
fn test_holes_are_not_own_properties() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![]);
    realm.set(&arr, "2", n(1.0)).unwrap();

    let has = call_method(&mut realm, &arr, "hasOwnProperty", &[s("0")]).unwrap();
    assert_eq!(has, JsValue::Boolean(false));
    let has = call_method(&mut realm, &arr, "hasOwnProperty", &[s("2")]).unwrap();
    assert_eq!(has, JsValue::Boolean(true));
    assert!(!realm.has_property(&arr, &s("1")).unwrap());
}

#[test]
fn test_non_canonical_index_is_a_plain_key() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0)]);
    realm.set(&arr, "01", s("x")).unwrap();

    assert_eq!(array_len(&mut realm, &arr), 1.0);
    assert_eq!(realm.get(&arr, "01").unwrap(), s("x"));
    assert_eq!(keys(&mut realm, &arr), vec!["0", "01"]);

    let desc = new_object(&mut realm);
    let result = call_static(&mut realm, "defineProperty", &[arr.clone(), s("1.0"), desc]);
    assert!(result.is_ok());
    assert_eq!(array_len(&mut realm, &arr), 1.0);
}

#[test]
fn test_length_write_truncates_and_extends() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0), n(2.0), n(3.0)]);

    realm.set(&arr, "length", n(1.0)).unwrap();
    assert_eq!(array_len(&mut realm, &arr), 1.0);
    assert_eq!(realm.get(&arr, "1").unwrap(), JsValue::Undefined);

    realm.set(&arr, "length", n(4.0)).unwrap();
    assert_eq!(array_len(&mut realm, &arr), 4.0);
    assert_eq!(keys(&mut realm, &arr), vec!["0"]);
}

#[test]
fn test_invalid_length_is_range_error() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![]);
    let err = realm.set(&arr, "length", n(1.5)).unwrap_err();
    assert!(matches!(err, JsError::RangeError { .. }));
    assert_eq!(err.message(), "Invalid array length");

    let err = realm.set(&arr, "length", n(-1.0)).unwrap_err();
    assert!(matches!(err, JsError::RangeError { .. }));
}

#[test]
fn test_expansion_limit_is_memory_error() {
    let config = RealmConfig::default().with_max_array_length(10);
    let mut realm = Realm::with_config(config).unwrap();
    let arr = new_array(&mut realm, vec![]);

    realm.set(&arr, "9", n(1.0)).unwrap();
    let err = realm.set(&arr, "10", n(1.0)).unwrap_err();
    assert!(matches!(err, JsError::MemoryError { .. }));
    assert_eq!(array_len(&mut realm, &arr), 10.0);
}

#[test]
fn test_length_is_own_but_not_enumerable() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0)]);

    let (value, attrs) = realm.own_property_descriptor(&arr, &s("length")).unwrap().unwrap();
    assert_eq!(value, n(1.0));
    assert!(attrs.writable);
    assert!(!attrs.enumerable);
    assert!(!attrs.configurable);
    assert!(is_type_error(realm.delete_property(&arr, &s("length"))));
}

#[test]
fn test_delete_element_leaves_hole() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0), n(2.0), n(3.0)]);

    assert!(realm.delete_property(&arr, &s("1")).unwrap());
    assert_eq!(array_len(&mut realm, &arr), 3.0);
    assert_eq!(keys(&mut realm, &arr), vec!["0", "2"]);
}

#[test]
fn test_delete_past_end_never_expands() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0)]);
    assert!(realm.delete_property(&arr, &s("7")).unwrap());
    assert_eq!(array_len(&mut realm, &arr), 1.0);
}

#[test]
fn test_inherited_array_elements() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![s("a"), s("b")]);
    let child = call_static(&mut realm, "create", &[arr]).unwrap();

    assert_eq!(realm.get(&child, "1").unwrap(), s("b"));
    assert_eq!(realm.get(&child, "5").unwrap(), JsValue::Undefined);
    assert_eq!(keys(&mut realm, &child), Vec::<String>::new());
}

#[test]
fn test_array_constructor() {
    let mut realm = create_test_realm();
    let ctor = JsValue::Object(realm.constructor(PrototypeIndex::Array));

    let sized = realm.call(&ctor, JsValue::Undefined, &[n(3.0)]).unwrap();
    assert_eq!(array_len(&mut realm, &sized), 3.0);
    assert_eq!(keys(&mut realm, &sized), Vec::<String>::new());

    let listed = realm.call(&ctor, JsValue::Undefined, &[s("x"), s("y")]).unwrap();
    assert_eq!(strings(&mut realm, &listed), vec!["x", "y"]);
}

#[test]
fn test_array_prototype_is_an_array() {
    let mut realm = create_test_realm();
    let proto: ObjectRef = realm.prototype(PrototypeIndex::Array);
    assert!(realm.object(proto).unwrap().is_array());
    let kind = call_method(&mut realm, &JsValue::Object(proto), "toString", &[]).unwrap();
    assert_eq!(kind, s("[object Array]"));
}
