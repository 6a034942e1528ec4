use super::*;
use crate::test_support::item;

#[test]
fn append_keeps_insertion_order() {
    let mut store = ItemStore::new();
    store.append(item("b", "Bread"));
    store.append(item("a", "Apples"));
    let ids: Vec<&str> = store.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn replace_is_in_place_and_ignores_unknown_ids() {
    let mut store = ItemStore::from_items(vec![item("1", "One"), item("2", "Two")]);

    let mut changed = item("1", "Uno");
    changed.count = 5;
    assert!(store.replace(changed));
    assert_eq!(store.as_slice()[0].name, "Uno");
    assert_eq!(store.as_slice()[0].count, 5);

    assert!(!store.replace(item("9", "Nine")));
    assert_eq!(store.len(), 2);
}

#[test]
fn remove_by_id() {
    let mut store = ItemStore::from_items(vec![item("1", "One"), item("2", "Two")]);
    assert!(store.remove(&ItemId::from("1")));
    assert!(!store.remove(&ItemId::from("1")));
    assert_eq!(store.len(), 1);
    assert!(store.contains(&ItemId::from("2")));
}

#[test]
fn replace_all_normalizes_baseline() {
    let mut stale = item("1", "One");
    stale.deleted_at = Some(crate::test_support::at(5));
    let mut store = ItemStore::from_items(vec![item("0", "Zero")]);
    store.replace_all(vec![stale]);
    assert_eq!(store.len(), 1);
    assert!(store.as_slice()[0].deleted_at.is_none());
}
