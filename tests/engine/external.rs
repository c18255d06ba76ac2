//! Host objects through the external bridge

use super::*;
use objcore::{ClassId, ExternalCall, ExternalClass, ExternalData, ExternalKind};

/// Key/value store exposed to scripts
#[derive(Default)]
struct Store {
    entries: Vec<(String, String)>,
}

impl Store {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn key_of(call: &ExternalCall) -> String {
    match &call.data {
        ExternalData::Key(key) => key.to_string(),
        ExternalData::Token(token) => format!("#{token}"),
    }
}

fn store_get(realm: &mut Realm, call: &ExternalCall) -> Result<JsValue, JsError> {
    let store = realm.external_instance::<Store>(call.instance)?;
    Ok(store
        .lookup(&key_of(call))
        .map_or(JsValue::Undefined, JsValue::from))
}

fn store_set(realm: &mut Realm, call: &ExternalCall, value: &str) -> Result<(), JsError> {
    let key = key_of(call);
    let store = realm.external_instance_mut::<Store>(call.instance)?;
    store.entries.retain(|(k, _)| *k != key);
    store.entries.push((key, value.to_string()));
    Ok(())
}

fn store_find(realm: &mut Realm, call: &ExternalCall, delete: bool) -> Result<bool, JsError> {
    let key = key_of(call);
    let store = realm.external_instance_mut::<Store>(call.instance)?;
    let found = store.lookup(&key).is_some();
    if delete {
        store.entries.retain(|(k, _)| *k != key);
    }
    Ok(found)
}

fn register_store(realm: &mut Realm) -> ClassId {
    let class = ExternalClass::builder("Store", ExternalKind::Value)
        .get(store_get)
        .set(store_set)
        .find(store_find);
    realm.register_external_class(class).unwrap()
}

#[test]
fn test_get_set_delete_through_callbacks() {
    let mut realm = create_test_realm();
    let class = register_store(&mut realm);
    let host = realm.create_external(class, Store::default()).unwrap();

    assert_eq!(realm.get(&host, "a").unwrap(), JsValue::Undefined);
    realm.set(&host, "a", n(42.0)).unwrap();
    assert_eq!(realm.get(&host, "a").unwrap(), s("42"));

    realm.set(&host, "b", JsValue::Null).unwrap();
    assert_eq!(realm.get(&host, "b").unwrap(), s(""));

    assert!(realm.delete_property(&host, &s("a")).unwrap());
    assert!(!realm.delete_property(&host, &s("a")).unwrap());
    assert_eq!(realm.get(&host, "a").unwrap(), JsValue::Undefined);

    let store = realm.external_instance::<Store>(0).unwrap();
    assert_eq!(store.entries, vec![("b".to_string(), String::new())]);
}

#[test]
fn test_read_only_class_rejects_writes_and_deletes() {
    let mut realm = create_test_realm();
    let class = ExternalClass::builder("Frozen", ExternalKind::Value).get(store_get);
    let class = realm.register_external_class(class).unwrap();
    let host = realm.create_external(class, Store::default()).unwrap();

    let err = realm.set(&host, "a", n(1.0)).unwrap_err();
    assert_eq!(err.message(), "Cannot assign to read-only property \"a\"");
    let err = realm.delete_property(&host, &s("a")).unwrap_err();
    assert_eq!(err.message(), "Cannot delete property \"a\"");
}

fn version_get(_realm: &mut Realm, call: &ExternalCall) -> Result<JsValue, JsError> {
    match call.data {
        ExternalData::Token(token) => Ok(JsValue::from(token as u32)),
        ExternalData::Key(_) => Ok(JsValue::Undefined),
    }
}

fn greet(_realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let name = args.first().and_then(JsValue::to_property_key);
    Ok(JsValue::from(format!(
        "hello {}",
        name.map_or_else(String::new, |name| name.to_string())
    )))
}

#[test]
fn test_members_tokens_and_methods() {
    let mut realm = create_test_realm();
    let version = ExternalClass::builder("version", ExternalKind::Value)
        .get(version_get)
        .data(7);
    let version = realm.register_external_class(version).unwrap();
    let method = realm
        .register_external_class(ExternalClass::builder("greet", ExternalKind::Method(greet)))
        .unwrap();
    let info = ExternalClass::builder("Info", ExternalKind::Object).member("version", version);
    let info = realm.register_external_class(info).unwrap();
    let app = ExternalClass::builder("App", ExternalKind::Object)
        .member("info", info)
        .member("greet", method);
    let app = realm.register_external_class(app).unwrap();

    let host = realm.create_external(app, ()).unwrap();
    let info_value = realm.get(&host, "info").unwrap();
    assert!(info_value.is_external());
    assert_eq!(realm.get(&info_value, "version").unwrap(), n(7.0));
    assert_eq!(realm.get(&host, "missing").unwrap(), JsValue::Undefined);

    let greet_fn = realm.get(&host, "greet").unwrap();
    assert!(realm.is_callable(&greet_fn));
    let result = realm.call(&greet_fn, host.clone(), &[s("world")]).unwrap();
    assert_eq!(result, s("hello world"));

    assert!(realm.has_property(&host, &s("anything")).unwrap());
}

#[test]
fn test_external_to_string() {
    let mut realm = create_test_realm();
    let class = register_store(&mut realm);
    let host = realm.create_external(class, Store::default()).unwrap();
    assert_eq!(realm.to_string(&host).unwrap().as_str(), "[object Store]");
}

#[test]
fn test_unknown_member_class_is_rejected() {
    let mut realm = create_test_realm();
    let store = register_store(&mut realm);

    let mut fresh = create_test_realm();
    let class = ExternalClass::builder("Bad", ExternalKind::Object).member("x", store);
    let err = fresh.register_external_class(class).unwrap_err();
    assert!(matches!(err, JsError::Internal { .. }));
}

#[test]
fn test_released_instance_fails_cleanly() {
    let mut realm = create_test_realm();
    let class = register_store(&mut realm);
    let host = realm.create_external(class, Store::default()).unwrap();
    realm.release_external(&host).unwrap();
    let err = realm.get(&host, "a").unwrap_err();
    assert!(matches!(err, JsError::Internal { .. }));
}

/// Forwards every access to another host value
struct Forward {
    target: JsValue,
}

fn forward_get(realm: &mut Realm, call: &ExternalCall) -> Result<JsValue, JsError> {
    let target = realm.external_instance::<Forward>(call.instance)?.target.clone();
    realm.get(&target, &key_of(call))
}

fn forward_set(realm: &mut Realm, call: &ExternalCall, value: &str) -> Result<(), JsError> {
    let target = realm.external_instance::<Forward>(call.instance)?.target.clone();
    realm.set(&target, &key_of(call), JsValue::from(value))
}

fn forward_find(realm: &mut Realm, call: &ExternalCall, _delete: bool) -> Result<bool, JsError> {
    let target = realm.external_instance::<Forward>(call.instance)?.target.clone();
    realm.delete_property(&target, &JsValue::from(key_of(call)))
}

#[test]
fn test_callbacks_may_reenter_the_bridge() {
    let mut realm = create_test_realm();
    let store_class = register_store(&mut realm);
    let store = realm.create_external(store_class, Store::default()).unwrap();

    let forward = ExternalClass::builder("Forward", ExternalKind::Value)
        .get(forward_get)
        .set(forward_set)
        .find(forward_find);
    let forward = realm.register_external_class(forward).unwrap();
    let outer = realm
        .create_external(forward, Forward { target: store.clone() })
        .unwrap();
    let outermost = realm
        .create_external(forward, Forward { target: outer.clone() })
        .unwrap();

    realm.set(&outermost, "k", s("v")).unwrap();
    assert_eq!(realm.get(&store, "k").unwrap(), s("v"));
    assert_eq!(realm.get(&outermost, "k").unwrap(), s("v"));

    assert!(realm.delete_property(&outermost, &s("k")).unwrap());
    assert_eq!(realm.get(&store, "k").unwrap(), JsValue::Undefined);
}

#[test]
fn test_host_values_as_ordinary_property_values() {
    let mut realm = create_test_realm();
    let class = register_store(&mut realm);
    let host = realm.create_external(class, Store::default()).unwrap();
    let obj = object_with(&mut realm, &[("store", host.clone())]);

    let stored = realm.get(&obj, "store").unwrap();
    assert_eq!(stored, host);
    realm.set(&stored, "x", s("1")).unwrap();
    assert_eq!(realm.get(&host, "x").unwrap(), s("1"));
}
