//! Object.keys / values / entries / getOwnPropertyNames ordering

use super::*;
use objcore::EnumKind;

#[test]
fn test_keys_preserve_creation_order() {
    let mut realm = create_test_realm();
    let obj = object_with(&mut realm, &[("b", n(1.0)), ("a", n(2.0))]);
    assert_eq!(keys(&mut realm, &obj), vec!["b", "a"]);

    let values = call_static(&mut realm, "values", &[obj.clone()]).unwrap();
    assert_eq!(strings(&mut realm, &values), vec!["1", "2"]);
}

#[test]
fn test_entries_are_pairs() {
    let mut realm = create_test_realm();
    let obj = object_with(&mut realm, &[("b", n(1.0)), ("a", n(2.0))]);
    let entries = call_static(&mut realm, "entries", &[obj]).unwrap();

    let first = realm.get(&entries, "0").unwrap();
    assert_eq!(strings(&mut realm, &first), vec!["b", "1"]);
    let second = realm.get(&entries, "1").unwrap();
    assert_eq!(strings(&mut realm, &second), vec!["a", "2"]);
    assert_eq!(realm.get(&entries, "length").unwrap(), n(2.0));
}

#[test]
fn test_keys_skip_non_enumerable_and_deleted() {
    let mut realm = create_test_realm();
    let obj = object_with(&mut realm, &[("a", n(1.0)), ("b", n(2.0)), ("c", n(3.0))]);
    let hidden = object_with(&mut realm, &[("value", n(0.0))]);
    call_static(&mut realm, "defineProperty", &[obj.clone(), s("h"), hidden]).unwrap();
    realm.delete_property(&obj, &s("b")).unwrap();

    assert_eq!(keys(&mut realm, &obj), vec!["a", "c"]);
    let names = call_static(&mut realm, "getOwnPropertyNames", &[obj]).unwrap();
    assert_eq!(strings(&mut realm, &names), vec!["a", "c", "h"]);
}

#[test]
fn test_keys_ignore_inherited_properties() {
    let mut realm = create_test_realm();
    let parent = object_with(&mut realm, &[("p", n(1.0))]);
    let child = call_static(&mut realm, "create", &[parent]).unwrap();
    realm.set(&child, "c", n(2.0)).unwrap();
    assert_eq!(keys(&mut realm, &child), vec!["c"]);
}

#[test]
fn test_array_elements_come_first() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![s("x"), s("y")]);
    realm.set(&arr, "name", s("list")).unwrap();

    assert_eq!(keys(&mut realm, &arr), vec!["0", "1", "name"]);
    let names = call_static(&mut realm, "getOwnPropertyNames", &[arr]).unwrap();
    assert_eq!(strings(&mut realm, &names), vec!["0", "1", "length", "name"]);
}

#[test]
fn test_names_include_shared_entries_once() {
    let mut realm = create_test_realm();
    let ctor = JsValue::Object(realm.constructor(PrototypeIndex::Object));

    // Reading materializes the shared entries into the own map
    realm.get(&ctor, "prototype").unwrap();
    realm.get(&ctor, "keys").unwrap();

    let names = call_static(&mut realm, "getOwnPropertyNames", &[ctor]).unwrap();
    let names = strings(&mut realm, &names);
    for expected in ["name", "length", "prototype", "create", "keys", "isExtensible"] {
        assert_eq!(
            names.iter().filter(|name| name.as_str() == expected).count(),
            1,
            "{expected} in {names:?}"
        );
    }
}

#[test]
fn test_host_function_reports_length() {
    let mut realm = create_test_realm();
    let closure = realm.create_closure("f", 2, |_, _, _| Ok(JsValue::Undefined)).unwrap();
    let names = call_static(&mut realm, "getOwnPropertyNames", &[closure]).unwrap();
    assert_eq!(strings(&mut realm, &names), vec!["length"]);
}

#[test]
fn test_keys_of_primitives() {
    let mut realm = create_test_realm();
    assert_eq!(keys(&mut realm, &n(5.0)), Vec::<String>::new());
    assert_eq!(keys(&mut realm, &JsValue::Boolean(true)), Vec::<String>::new());

    let err = call_static(&mut realm, "keys", &[JsValue::Undefined]).unwrap_err();
    assert_eq!(err.message(), "cannot convert undefined argument to object");
    let err = call_static(&mut realm, "values", &[JsValue::Null]).unwrap_err();
    assert_eq!(err.message(), "cannot convert null argument to object");
}

#[test]
fn test_all_values_include_array_length() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0), n(2.0)]);
    let values = realm.enumerate(&arr, EnumKind::Values, true).unwrap();
    assert_eq!(values, vec![n(1.0), n(2.0), n(2.0)]);
}

#[test]
fn test_builtin_prototype_names_are_unique() {
    let mut realm = create_test_realm();
    for idx in [PrototypeIndex::Array, PrototypeIndex::String, PrototypeIndex::Function] {
        let proto = JsValue::Object(realm.prototype(idx));
        let names = call_static(&mut realm, "getOwnPropertyNames", &[proto]).unwrap();
        let names = strings(&mut realm, &names);
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len(), "{idx:?}: {names:?}");
        assert!(names.iter().any(|name| name == "length"), "{idx:?}: {names:?}");
    }
}
