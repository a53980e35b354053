#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::module::ModuleKind;

fn make_module(map_id: MapId, z: i64) -> Module {
    let mut module = Module::new(map_id, ModuleKind::Site, 0.0, 0.0, 100.0, 80.0);
    module.z_index = z;
    module
}

fn store_with_map() -> (DocumentStore, MapId) {
    let mut store = DocumentStore::new();
    let map_id = store.create_map("north field", 2000.0, 1500.0, 10.0);
    (store, map_id)
}

// =============================================================
// Map lifecycle
// =============================================================

#[test]
fn create_map_registers_meta_and_empty_document() {
    let (store, map_id) = store_with_map();
    let meta = store.meta(&map_id).unwrap();
    assert_eq!(meta.name, "north field");
    assert_eq!(meta.scale, 10.0);
    assert!(store.map(&map_id).unwrap().is_empty());
}

#[test]
fn remove_map_drops_meta_and_modules() {
    let (mut store, map_id) = store_with_map();
    store.add_module(&map_id, make_module(map_id, 0)).unwrap();
    let doc = store.remove_map(&map_id).unwrap();
    assert_eq!(doc.len(), 1);
    assert!(store.meta(&map_id).is_none());
    assert!(store.map(&map_id).is_none());
}

// =============================================================
// Module CRUD
// =============================================================

#[test]
fn add_module_assigns_nil_id_and_map_id() {
    let (mut store, map_id) = store_with_map();
    let mut module = make_module(Uuid::new_v4(), 0);
    module.id = Uuid::nil();
    let id = store.add_module(&map_id, module).unwrap();
    assert!(!id.is_nil());
    let stored = store.map(&map_id).unwrap().get(&id).unwrap();
    assert_eq!(stored.map_id, map_id);
}

#[test]
fn add_module_keeps_existing_id() {
    let (mut store, map_id) = store_with_map();
    let module = make_module(map_id, 0);
    let original = module.id;
    let id = store.add_module(&map_id, module).unwrap();
    assert_eq!(id, original);
}

#[test]
fn add_module_to_missing_map_fails() {
    let mut store = DocumentStore::new();
    let err = store
        .add_module(&Uuid::new_v4(), make_module(Uuid::new_v4(), 0))
        .unwrap_err();
    assert!(matches!(err, StoreError::MapNotFound(_)));
}

#[test]
fn remove_module_returns_value_and_errors_when_missing() {
    let (mut store, map_id) = store_with_map();
    let module = make_module(map_id, 0);
    let id = store.add_module(&map_id, module.clone()).unwrap();
    let removed = store.remove_module(&map_id, &id).unwrap();
    assert_eq!(removed, module);
    let err = store.remove_module(&map_id, &id).unwrap_err();
    assert!(matches!(err, StoreError::ModuleNotFound(_)));
}

#[test]
fn update_module_replaces_but_never_adds() {
    let (mut store, map_id) = store_with_map();
    let mut module = make_module(map_id, 0);
    store.add_module(&map_id, module.clone()).unwrap();
    module.x = 42.0;
    store.update_module(&map_id, module.clone()).unwrap();
    assert_eq!(store.map(&map_id).unwrap().get(&module.id).unwrap().x, 42.0);

    let stranger = make_module(map_id, 0);
    let err = store.update_module(&map_id, stranger).unwrap_err();
    assert!(matches!(err, StoreError::ModuleNotFound(_)));
    assert_eq!(store.map(&map_id).unwrap().len(), 1);
}

#[test]
fn apply_partial_updates_present_fields() {
    let (mut store, map_id) = store_with_map();
    let id = store.add_module(&map_id, make_module(map_id, 0)).unwrap();
    store
        .apply_partial(&map_id, &id, &PartialModule::move_to(30.0, 40.0))
        .unwrap();
    let stored = store.map(&map_id).unwrap().get(&id).unwrap();
    assert_eq!((stored.x, stored.y), (30.0, 40.0));

    let err = store
        .apply_partial(&map_id, &Uuid::new_v4(), &PartialModule::move_to(0.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, StoreError::ModuleNotFound(_)));
}

#[test]
fn get_module_searches_across_maps() {
    let (mut store, map_a) = store_with_map();
    let map_b = store.create_map("south field", 1000.0, 1000.0, 10.0);
    let id = store.add_module(&map_b, make_module(map_b, 0)).unwrap();
    assert!(store.map(&map_a).unwrap().get(&id).is_none());
    assert_eq!(store.get_module(&id).unwrap().id, id);
}

// =============================================================
// Snapshots and ordering
// =============================================================

#[test]
fn snapshot_is_ordered_by_z_then_creation() {
    let (mut store, map_id) = store_with_map();
    let mut first = make_module(map_id, 5);
    let mut second = make_module(map_id, 1);
    let mut third = make_module(map_id, 5);
    // Force distinct creation times so the tie-break is deterministic.
    first.created_at = 100;
    second.created_at = 200;
    third.created_at = 300;
    let first_id = store.add_module(&map_id, first).unwrap();
    let second_id = store.add_module(&map_id, second).unwrap();
    let third_id = store.add_module(&map_id, third).unwrap();

    let snapshot = store.snapshot(&map_id).unwrap();
    let ids: Vec<_> = snapshot.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![second_id, first_id, third_id]);
}

#[test]
fn snapshot_is_a_value_copy() {
    let (mut store, map_id) = store_with_map();
    let id = store.add_module(&map_id, make_module(map_id, 0)).unwrap();
    let snapshot = store.snapshot(&map_id).unwrap();
    store
        .apply_partial(&map_id, &id, &PartialModule::move_to(500.0, 500.0))
        .unwrap();
    assert_eq!(snapshot[0].x, 0.0);
}

#[test]
fn load_snapshot_replaces_all_modules() {
    let (mut store, map_id) = store_with_map();
    store.add_module(&map_id, make_module(map_id, 0)).unwrap();
    let replacement = make_module(map_id, 7);
    let replacement_id = replacement.id;
    store.load_snapshot(&map_id, vec![replacement]).unwrap();
    let doc = store.map(&map_id).unwrap();
    assert_eq!(doc.len(), 1);
    assert!(doc.contains(&replacement_id));
}

#[test]
fn load_snapshot_on_missing_map_fails() {
    let mut store = DocumentStore::new();
    let err = store.load_snapshot(&Uuid::new_v4(), Vec::new()).unwrap_err();
    assert!(matches!(err, StoreError::MapNotFound(_)));
}

#[test]
fn modules_by_layer_lists_top_first() {
    let (mut store, map_id) = store_with_map();
    let mut bottom = make_module(map_id, 1);
    let mut top = make_module(map_id, 9);
    bottom.created_at = 100;
    top.created_at = 200;
    let bottom_id = store.add_module(&map_id, bottom).unwrap();
    let top_id = store.add_module(&map_id, top).unwrap();

    let layers = store.modules_by_layer(&map_id).unwrap();
    let ids: Vec<_> = layers.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![top_id, bottom_id]);
}

#[test]
fn layer_ties_resolve_by_creation_order() {
    let (mut store, map_id) = store_with_map();
    let mut older = make_module(map_id, 3);
    let mut newer = make_module(map_id, 3);
    older.created_at = 100;
    newer.created_at = 200;
    let older_id = store.add_module(&map_id, older).unwrap();
    let newer_id = store.add_module(&map_id, newer).unwrap();

    let layers = store.modules_by_layer(&map_id).unwrap();
    let ids: Vec<_> = layers.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![older_id, newer_id]);
}
