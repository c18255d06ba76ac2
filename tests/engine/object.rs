//! Object constructor, Object.prototype methods and the other intrinsic constructors

use super::*;
use objcore::ValueKind;

#[test]
fn test_object_constructor_wraps_primitives() {
    let mut realm = create_test_realm();
    let ctor = JsValue::Object(realm.constructor(PrototypeIndex::Object));

    let fresh = realm.call(&ctor, JsValue::Undefined, &[]).unwrap();
    assert_eq!(realm.value_kind(&fresh).unwrap(), ValueKind::Object);

    let boxed = realm.call(&ctor, JsValue::Undefined, &[n(3.0)]).unwrap();
    assert_eq!(realm.value_kind(&boxed).unwrap(), ValueKind::ObjectNumber);
    assert_eq!(realm.to_number(&boxed).unwrap(), 3.0);

    let obj = new_object(&mut realm);
    let same = realm.call(&ctor, JsValue::Undefined, &[obj.clone()]).unwrap();
    assert_eq!(same, obj);
}

#[test]
fn test_has_own_property() {
    let mut realm = create_test_realm();
    let obj = object_with(&mut realm, &[("x", n(1.0))]);

    let has = call_method(&mut realm, &obj, "hasOwnProperty", &[s("x")]).unwrap();
    assert_eq!(has, JsValue::Boolean(true));
    let has = call_method(&mut realm, &obj, "hasOwnProperty", &[s("toString")]).unwrap();
    assert_eq!(has, JsValue::Boolean(false));

    let has = call_method(&mut realm, &s("abc"), "hasOwnProperty", &[n(1.0)]).unwrap();
    assert_eq!(has, JsValue::Boolean(true));
}

#[test]
fn test_prototype_methods_reject_null_this() {
    let mut realm = create_test_realm();
    let obj = new_object(&mut realm);
    let method = realm.get(&obj, "hasOwnProperty").unwrap();
    let err = realm.call(&method, JsValue::Null, &[s("x")]).unwrap_err();
    assert_eq!(err.message(), "Object.prototype.hasOwnProperty called on null");
}

#[test]
fn test_property_is_enumerable() {
    let mut realm = create_test_realm();
    let arr = new_array(&mut realm, vec![n(1.0)]);

    let result = call_method(&mut realm, &arr, "propertyIsEnumerable", &[s("0")]).unwrap();
    assert_eq!(result, JsValue::Boolean(true));
    let result = call_method(&mut realm, &arr, "propertyIsEnumerable", &[s("length")]).unwrap();
    assert_eq!(result, JsValue::Boolean(false));
    let result = call_method(&mut realm, &arr, "propertyIsEnumerable", &[s("nope")]).unwrap();
    assert_eq!(result, JsValue::Boolean(false));
}

#[test]
fn test_value_of_and_to_string() {
    let mut realm = create_test_realm();
    let obj = new_object(&mut realm);
    assert_eq!(call_method(&mut realm, &obj, "valueOf", &[]).unwrap(), obj);
    assert_eq!(
        call_method(&mut realm, &obj, "toString", &[]).unwrap(),
        s("[object Object]")
    );

    let to_string = realm.get(&obj, "toString").unwrap();
    let tag = realm.call(&to_string, JsValue::Undefined, &[]).unwrap();
    assert_eq!(tag, s("[object Undefined]"));
    let tag = realm.call(&to_string, n(1.0), &[]).unwrap();
    assert_eq!(tag, s("[object Number]"));
}

#[test]
fn test_intrinsic_constructors() {
    let mut realm = create_test_realm();

    let boolean = JsValue::Object(realm.constructor(PrototypeIndex::Boolean));
    let result = realm.call(&boolean, JsValue::Undefined, &[s("x")]).unwrap();
    assert_eq!(result, JsValue::Boolean(true));

    let number = JsValue::Object(realm.constructor(PrototypeIndex::Number));
    let result = realm.call(&number, JsValue::Undefined, &[s("12")]).unwrap();
    assert_eq!(result, n(12.0));

    let regexp = JsValue::Object(realm.constructor(PrototypeIndex::RegExp));
    let result = realm.call(&regexp, JsValue::Undefined, &[s("a+"), s("g")]).unwrap();
    assert_eq!(realm.value_kind(&result).unwrap(), ValueKind::RegExp);
    let proto = realm.prototype_of(&result).unwrap();
    assert_eq!(proto, JsValue::Object(realm.prototype(PrototypeIndex::RegExp)));

    let date = JsValue::Object(realm.constructor(PrototypeIndex::Date));
    let result = realm.call(&date, JsValue::Undefined, &[n(0.0)]).unwrap();
    assert_eq!(realm.value_kind(&result).unwrap(), ValueKind::Date);

    let function = JsValue::Object(realm.constructor(PrototypeIndex::Function));
    let err = realm.call(&function, JsValue::Undefined, &[]).unwrap_err();
    assert_eq!(err.message(), "Function constructor is not supported");
}

#[test]
fn test_constructor_names() {
    let mut realm = create_test_realm();
    let expected = [
        (PrototypeIndex::Array, "Array"),
        (PrototypeIndex::RegExp, "RegExp"),
        (PrototypeIndex::UriError, "URIError"),
        (PrototypeIndex::InternalError, "InternalError"),
    ];
    for (idx, name) in expected {
        let ctor = JsValue::Object(realm.constructor(idx));
        assert_eq!(realm.get(&ctor, "name").unwrap(), s(name));
    }
}

#[test]
fn test_host_closure_receives_this_and_args() {
    let mut realm = create_test_realm();
    let closure = realm
        .create_closure("sum", 2, |realm, this, args| {
            let base = realm.get(&this, "base")?.to_number();
            let total = args.iter().map(JsValue::to_number).sum::<f64>();
            Ok(JsValue::Number(base + total))
        })
        .unwrap();
    let obj = object_with(&mut realm, &[("base", n(10.0)), ("sum", closure)]);

    let result = call_method(&mut realm, &obj, "sum", &[n(1.0), n(2.0)]).unwrap();
    assert_eq!(result, n(13.0));
}

#[test]
fn test_to_primitive_prefers_to_string() {
    let mut realm = create_test_realm();
    let obj = new_object(&mut realm);
    let value_of = realm.create_closure("valueOf", 0, |_, _, _| Ok(JsValue::from(7))).unwrap();
    realm.set(&obj, "valueOf", value_of).unwrap();

    assert_eq!(realm.to_primitive(&obj).unwrap(), s("[object Object]"));

    let bare = call_static(&mut realm, "create", &[JsValue::Null]).unwrap();
    let value_of = realm.create_closure("valueOf", 0, |_, _, _| Ok(JsValue::from(7))).unwrap();
    realm.set(&bare, "valueOf", value_of).unwrap();
    assert_eq!(realm.to_number(&bare).unwrap(), 7.0);

    let empty = call_static(&mut realm, "create", &[JsValue::Null]).unwrap();
    assert!(is_type_error(realm.to_primitive(&empty)));
}
