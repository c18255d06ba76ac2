//! Garbage collection and allocation limits

use super::*;

#[test]
fn test_unrooted_objects_are_freed() {
    let mut realm = create_test_realm();
    let baseline = realm.collect_garbage(&[]).live;

    let kept = object_with(&mut realm, &[("x", n(1.0))]);
    let child = new_object(&mut realm);
    realm.set(&kept, "child", child.clone()).unwrap();
    let dropped = new_object(&mut realm);

    let stats = realm.collect_garbage(&[kept.clone()]);
    assert_eq!(stats.freed, 1);
    assert_eq!(stats.live, baseline + 2);

    assert_eq!(realm.get(&kept, "child").unwrap(), child);
    let err = realm.get(&dropped, "x").unwrap_err();
    assert!(matches!(err, JsError::Internal { .. }));
}

#[test]
fn test_freed_slot_reuse_keeps_old_handles_stale() {
    let mut realm = create_test_realm();
    let old = new_object(&mut realm);
    realm.collect_garbage(&[]);
    let fresh = new_object(&mut realm);

    assert_ne!(old, fresh);
    assert!(realm.object(old.as_object().unwrap()).is_err());
    assert!(realm.object(fresh.as_object().unwrap()).is_ok());
}

#[test]
fn test_intrinsics_survive_collection() {
    let mut realm = create_test_realm();
    let ctor = JsValue::Object(realm.constructor(PrototypeIndex::Object));
    realm.get(&ctor, "keys").unwrap();
    realm.collect_garbage(&[]);

    let obj = object_with(&mut realm, &[("a", n(1.0))]);
    assert_eq!(keys(&mut realm, &obj), vec!["a"]);
    let arr = new_array(&mut realm, vec![n(1.0)]);
    assert_eq!(realm.get(&arr, "length").unwrap(), n(1.0));
}

#[test]
fn test_array_elements_are_traced() {
    let mut realm = create_test_realm();
    let inner = object_with(&mut realm, &[("v", n(5.0))]);
    let arr = new_array(&mut realm, vec![inner.clone()]);
    realm.collect_garbage(&[arr]);
    assert_eq!(realm.get(&inner, "v").unwrap(), n(5.0));
}

#[test]
fn test_heap_limit_is_memory_error() {
    let config = RealmConfig::default().with_heap_limit(8);
    assert!(matches!(
        Realm::with_config(config),
        Err(JsError::MemoryError { .. })
    ));

    let mut realm = create_test_realm();
    let live = realm.live_objects();
    let config = RealmConfig::default().with_heap_limit(live + 1);
    let mut tight = Realm::with_config(config).unwrap();
    tight.alloc_object().unwrap();
    let err = tight.alloc_object().unwrap_err();
    assert!(matches!(err, JsError::MemoryError { .. }));
    assert!(realm.alloc_object().is_ok());
}

#[test]
fn test_config_from_json() {
    let config = RealmConfig::from_json_str(r#"{"max_array_length": 4}"#).unwrap();
    let mut realm = Realm::with_config(config).unwrap();
    let arr = new_array(&mut realm, vec![]);
    assert!(matches!(
        realm.set(&arr, "4", n(1.0)),
        Err(JsError::MemoryError { .. })
    ));

    let err = RealmConfig::from_json_str("{").unwrap_err();
    assert!(err.is_type_error());
}
