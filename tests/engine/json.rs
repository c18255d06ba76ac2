//! serde_json import and export

use super::*;
use serde_json::json;

#[test]
fn test_import_preserves_key_order() {
    let mut realm = create_test_realm();
    let value = realm
        .value_from_json(&json!({"b": 1, "a": [true, null, "s"], "c": {"d": 2.5}}))
        .unwrap();

    assert_eq!(keys(&mut realm, &value), vec!["b", "a", "c"]);
    let list = realm.get(&value, "a").unwrap();
    assert_eq!(realm.get(&list, "length").unwrap(), n(3.0));
    assert_eq!(realm.get(&list, "0").unwrap(), JsValue::Boolean(true));
    assert_eq!(realm.get(&list, "1").unwrap(), JsValue::Null);
    let nested = realm.get(&value, "c").unwrap();
    assert_eq!(realm.get(&nested, "d").unwrap(), n(2.5));
}

#[test]
fn test_export_objects_and_arrays() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0), s("two")]);
    let obj = object_with(&mut realm, &[("z", arr), ("a", JsValue::Boolean(false))]);

    let exported = realm.value_to_json(&obj).unwrap();
    assert_eq!(exported, json!({"z": [1, "two"], "a": false}));
    assert_eq!(serde_json::to_string(&exported).unwrap(), r#"{"z":[1,"two"],"a":false}"#);
}

#[test]
fn test_export_holes_functions_and_undefined() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![]);
    realm.set(&arr, "2", n(3.0)).unwrap();
    let func = realm.create_closure("f", 0, |_, _, _| Ok(JsValue::Undefined)).unwrap();
    realm.set(&arr, "3", func.clone()).unwrap();

    let obj = object_with(
        &mut realm,
        &[("list", arr), ("skip", JsValue::Undefined), ("method", func), ("nan", n(f64::NAN))],
    );
    let exported = realm.value_to_json(&obj).unwrap();
    assert_eq!(exported, json!({"list": [null, null, 3, null], "nan": null}));
}

#[test]
fn test_export_skips_non_enumerable_and_unwraps_boxes() {
    let mut realm = create_test_realm();
    let obj = object_with(&mut realm, &[("shown", n(1.0))]);
    let desc = object_with(&mut realm, &[("value", n(2.0))]);
    call_static(&mut realm, "defineProperty", &[obj.clone(), s("hidden"), desc]).unwrap();

    let ctor = JsValue::Object(realm.constructor(PrototypeIndex::Object));
    let boxed = realm.call(&ctor, JsValue::Undefined, &[s("str")]).unwrap();
    realm.set(&obj, "boxed", boxed).unwrap();

    let exported = realm.value_to_json(&obj).unwrap();
    assert_eq!(exported, json!({"shown": 1, "boxed": "str"}));
}

#[test]
fn test_export_rejects_cycles() {
    let mut realm = create_test_realm();
    let obj = new_object(&mut realm);
    realm.set(&obj, "self", obj.clone()).unwrap();
    let err = realm.value_to_json(&obj).unwrap_err();
    assert_eq!(err.message(), "Converting circular structure to JSON");
}

#[test]
fn test_shared_subtrees_are_not_cycles() {
    let mut realm = create_test_realm();
    let shared = object_with(&mut realm, &[("v", n(1.0))]);
    let obj = object_with(&mut realm, &[("a", shared.clone()), ("b", shared)]);
    let exported = realm.value_to_json(&obj).unwrap();
    assert_eq!(exported, json!({"a": {"v": 1}, "b": {"v": 1}}));
}

#[test]
fn test_import_stores_special_keys_as_data() {
    let mut realm = create_test_realm();
    let value = realm
        .value_from_json(&json!({"__proto__": {"evil": 1}, "constructor": 2, "length": 3}))
        .unwrap();

    assert_eq!(keys(&mut realm, &value), vec!["__proto__", "constructor", "length"]);
    assert_eq!(realm.get(&value, "evil").unwrap(), JsValue::Undefined);
    assert_eq!(
        realm.prototype_of(&value).unwrap(),
        JsValue::Object(realm.prototype(PrototypeIndex::Object))
    );
    assert_eq!(realm.get(&value, "constructor").unwrap(), n(2.0));

    let exported = realm.value_to_json(&value).unwrap();
    assert_eq!(exported, json!({"__proto__": {"evil": 1}, "constructor": 2, "length": 3}));
}
