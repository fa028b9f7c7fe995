use super::*;
use crate::{
    foundation::core::{DisplayValue, Point},
    scene::model::LineStyle,
};

fn node(id: &str, x: f64) -> Node {
    Node {
        id: id.into(),
        value: DisplayValue::from(id),
        position: Point::new(x, 100.0),
        style: None,
    }
}

fn edge(id: &str, from: &str, to: &str) -> Edge {
    Edge {
        id: id.into(),
        from: from.into(),
        to: to.into(),
        directed: true,
        weight: None,
        line: LineStyle::Solid,
    }
}

#[test]
fn insert_replaces_same_kind() {
    let mut store = SceneStore::new();
    assert!(store.insert(node("a", 10.0)).unwrap().is_none());
    let old = store.insert(node("a", 20.0)).unwrap().unwrap();
    assert_eq!(old.position.x, 10.0);
    assert_eq!(store.get::<Node>("a").unwrap().position.x, 20.0);
    assert_eq!(store.count::<Node>(), 1);
}

#[test]
fn insert_rejects_cross_kind_id() {
    let mut store = SceneStore::new();
    store.insert(node("a", 0.0)).unwrap();
    store.insert(node("b", 0.0)).unwrap();
    let err = store.insert(edge("a", "a", "b")).unwrap_err();
    assert!(err.to_string().contains("already a node"));
    assert_eq!(store.count::<Edge>(), 0);
    assert_eq!(store.kind_of("a"), Some(EntityKind::Node));
}

#[test]
fn lookups_are_soft() {
    let mut store = SceneStore::new();
    assert!(store.get::<Node>("missing").is_none());
    assert!(store.remove::<Edge>("missing").is_none());
    assert!(store.get_mut::<Label>("missing").is_none());
    assert_eq!(store.kind_of("missing"), None);
}

#[test]
fn removed_id_can_change_kind() {
    let mut store = SceneStore::new();
    store.insert(node("x", 0.0)).unwrap();
    store.remove::<Node>("x").unwrap();
    store.insert(node("n1", 0.0)).unwrap();
    store.insert(node("n2", 0.0)).unwrap();
    store.insert(edge("x", "n1", "n2")).unwrap();
    assert_eq!(store.kind_of("x"), Some(EntityKind::Edge));
}

#[test]
fn edges_touching_finds_both_directions() {
    let mut store = SceneStore::new();
    for id in ["a", "b", "c"] {
        store.insert(node(id, 0.0)).unwrap();
    }
    store.insert(edge("e1", "a", "b")).unwrap();
    store.insert(edge("e2", "c", "a")).unwrap();
    store.insert(edge("e3", "b", "c")).unwrap();
    let ids: Vec<_> = store
        .edges_touching("a")
        .into_iter()
        .map(|e| e.as_str().to_owned())
        .collect();
    assert_eq!(ids, vec!["e1", "e2"]);
}

#[test]
fn reset_clears_everything() {
    let mut store = SceneStore::new();
    store.insert(node("a", 0.0)).unwrap();
    store
        .insert(ArrayEntity {
            id: "arr".into(),
            cells: vec!["1".into()],
            anchor: Point::ZERO,
        })
        .unwrap();
    assert_eq!(store.len(), 2);
    store.reset();
    assert!(store.is_empty());
    assert_eq!(store, SceneStore::new());
}

#[test]
fn array_geometry_uses_fixed_cells() {
    let arr = ArrayEntity {
        id: "arr".into(),
        cells: vec!["5".into(), "3".into()],
        anchor: Point::new(100.0, 200.0),
    };
    let r = arr.cell_rect(1);
    assert_eq!((r.x0, r.y0, r.x1, r.y1), (150.0, 200.0, 200.0, 240.0));
    assert!(arr.contains(1));
    assert!(!arr.contains(2));
}

#[test]
fn iter_walks_one_kind_in_id_order() {
    let mut store = SceneStore::new();
    store.insert(node("c", 30.0)).unwrap();
    store.insert(node("a", 10.0)).unwrap();
    store.insert(edge("e", "a", "c")).unwrap();
    let ids: Vec<&str> = store.iter::<Node>().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(store.iter::<Edge>().count(), 1);
}
