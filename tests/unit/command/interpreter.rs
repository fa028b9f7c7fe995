use std::rc::Rc;

use serde_json::json;
use tokio::time::Instant;

use super::*;
use crate::render::{
    primitive::{PartRole, Shape},
    svg::SvgBackend,
};

fn setup() -> (Rc<RefCell<SvgBackend>>, Interpreter) {
    let backend = Rc::new(RefCell::new(SvgBackend::new()));
    let interp = Interpreter::new(backend.clone());
    (backend, interp)
}

fn node_cmd(id: &str, x: f64) -> Value {
    json!({ "command": "CREATE_NODE", "params": { "id": id, "value": id, "position": { "x": x, "y": 100 } } })
}

fn array_cmd(id: &str, values: Value) -> Value {
    json!({ "command": "CREATE_ARRAY", "id": id, "values": values, "position": { "x": 100, "y": 300 } })
}

fn cells(interp: &Interpreter, id: &str) -> Vec<String> {
    interp
        .store()
        .get::<ArrayEntity>(id)
        .unwrap()
        .cells
        .iter()
        .map(|c| c.as_str().to_owned())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn delete_node_leaves_store_after_exit() {
    let (_b, interp) = setup();
    interp.execute(&[node_cmd("n1", 100.0)], Pacing::Realtime).await;
    assert!(interp.store().contains::<Node>("n1"));

    let delete = [json!({ "command": "DELETE_NODE", "id": "n1" })];
    let ((), report) = tokio::join!(
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(interp.store().contains::<Node>("n1"));
            assert!(interp.renderer().is_exiting("n1"));
        },
        interp.execute(&delete, Pacing::Realtime)
    );
    assert_eq!(report.applied, 1);
    assert!(!interp.store().contains::<Node>("n1"));
    assert!(!interp.renderer().contains("n1"));
}

#[tokio::test(start_paused = true)]
async fn recreate_during_exit_keeps_new_node() {
    let (backend, interp) = setup();
    interp.execute(&[node_cmd("n1", 100.0)], Pacing::Realtime).await;

    let delete = [json!({ "command": "DELETE_NODE", "id": "n1" })];
    let recreate = [node_cmd("n1", 400.0)];
    tokio::join!(interp.execute(&delete, Pacing::Realtime), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        interp.execute(&recreate, Pacing::Realtime).await
    });

    let store = interp.store();
    let node = store.get::<Node>("n1").unwrap();
    assert_eq!(node.position.x, 400.0);
    assert_eq!(interp.renderer().live_count(), 1);
    assert!(!interp.renderer().is_exiting("n1"));
    assert_eq!(backend.borrow().count_of(EntityKind::Node), 1);
}

#[tokio::test(start_paused = true)]
async fn wire_shapes_produce_identical_scenes() {
    let (_a, nested) = setup();
    let (_b, flat) = setup();
    nested
        .execute(
            &[
                json!({ "command": "CREATE_NODE", "params": { "id": "a", "value": 1, "position": { "x": 1, "y": 2 } } }),
                json!({ "command": "ADD_LABEL", "params": { "id": "l", "text": "hi", "position": { "x": 5, "y": 5 }, "style": "warning" } }),
            ],
            Pacing::Realtime,
        )
        .await;
    flat.execute(
        &[
            json!({ "command": "CREATE_NODE", "id": "a", "value": 1, "position": { "x": 1, "y": 2 } }),
            json!({ "command": "ADD_LABEL", "id": "l", "text": "hi", "position": { "x": 5, "y": 5 }, "style": "warning" }),
        ],
        Pacing::Realtime,
    )
    .await;
    assert_eq!(*nested.store(), *flat.store());
    assert_eq!(nested.store().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn edge_with_missing_endpoint_is_skipped() {
    let (_b, interp) = setup();
    let report = interp
        .execute(
            &[
                node_cmd("a", 100.0),
                json!({ "command": "CREATE_EDGE", "id": "e1", "from": "a", "to": "ghost" }),
            ],
            Pacing::Realtime,
        )
        .await;
    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert!(matches!(
        &report.skipped[0].error,
        CommandError::Dangling { kind: EntityKind::Node, id, .. } if id.as_str() == "ghost"
    ));
    assert_eq!(interp.store().count::<Edge>(), 0);
}

#[tokio::test(start_paused = true)]
async fn nodes_then_edge_resolve() {
    let (backend, interp) = setup();
    interp.execute(&[node_cmd("a", 100.0)], Pacing::Realtime).await;
    interp.execute(&[node_cmd("b", 300.0)], Pacing::Realtime).await;
    let report = interp
        .execute(
            &[json!({ "command": "CREATE_EDGE", "params": { "id": "e1", "from": "a", "to": "b", "weight": 7 } })],
            Pacing::Realtime,
        )
        .await;
    assert!(report.skipped.is_empty());

    let store = interp.store();
    assert_eq!(store.count::<Node>(), 2);
    assert_eq!(store.count::<Edge>(), 1);
    let edge = store.get::<Edge>("e1").unwrap();
    assert!(store.contains::<Node>(edge.from.as_str()));
    assert!(store.contains::<Node>(edge.to.as_str()));
    assert_eq!(
        backend
            .borrow()
            .primitive("e1")
            .unwrap()
            .text(PartRole::Caption),
        Some("7")
    );
}

#[tokio::test(start_paused = true)]
async fn repeated_pointer_keeps_one_primitive() {
    let (backend, interp) = setup();
    interp
        .execute(&[array_cmd("arr", json!([5, 3, 8]))], Pacing::Realtime)
        .await;
    for index in [0, 2] {
        interp
            .execute(
                &[json!({ "command": "SET_POINTER", "id": "i", "arrayId": "arr", "index": index, "label": "i" })],
                Pacing::Realtime,
            )
            .await;
    }
    assert_eq!(interp.store().count::<Pointer>(), 1);
    assert_eq!(interp.store().get::<Pointer>("i").unwrap().index, 2);
    assert_eq!(interp.renderer().live_count_of(EntityKind::Pointer), 1);
    assert_eq!(backend.borrow().count_of(EntityKind::Pointer), 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_pointer_keeps_previous_one() {
    let (_b, interp) = setup();
    interp
        .execute(&[array_cmd("arr", json!([1, 2]))], Pacing::Realtime)
        .await;
    interp
        .execute(
            &[json!({ "command": "SET_POINTER", "id": "p", "arrayId": "arr", "index": 1 })],
            Pacing::Realtime,
        )
        .await;
    let report = interp
        .execute(
            &[json!({ "command": "SET_POINTER", "id": "p", "arrayId": "arr", "index": 9 })],
            Pacing::Realtime,
        )
        .await;
    assert!(matches!(
        report.skipped[0].error,
        CommandError::OutOfBounds { index: 9, len: 2, .. }
    ));
    assert_eq!(interp.store().get::<Pointer>("p").unwrap().index, 1);
    assert_eq!(interp.store().get::<Pointer>("p").unwrap().label, "");
    assert!(interp.renderer().contains("p"));
}

#[tokio::test(start_paused = true)]
async fn swap_twice_restores_order() {
    let (_b, interp) = setup();
    interp
        .execute(&[array_cmd("arr", json!([5, 3, 8, 1]))], Pacing::Realtime)
        .await;
    let swap = [json!({ "command": "SWAP", "arrayId": "arr", "indices": [0, 2] })];

    let start = Instant::now();
    interp.execute(&swap, Pacing::Realtime).await;
    assert_eq!(start.elapsed(), Duration::from_millis(800));
    assert_eq!(cells(&interp, "arr"), vec!["8", "3", "5", "1"]);

    let mut sorted = cells(&interp, "arr");
    sorted.sort();
    assert_eq!(sorted, vec!["1", "3", "5", "8"]);

    interp.execute(&swap, Pacing::Realtime).await;
    assert_eq!(cells(&interp, "arr"), vec!["5", "3", "8", "1"]);
}

#[tokio::test(start_paused = true)]
async fn swap_out_of_bounds_is_skipped() {
    let (_b, interp) = setup();
    interp
        .execute(&[array_cmd("arr", json!([1, 2]))], Pacing::Realtime)
        .await;
    let report = interp
        .execute(
            &[json!({ "command": "SWAP", "arrayId": "arr", "indices": [0, 5] })],
            Pacing::Realtime,
        )
        .await;
    assert_eq!(report.applied, 0);
    assert_eq!(cells(&interp, "arr"), vec!["1", "2"]);
}

#[tokio::test(start_paused = true)]
async fn update_cell_sets_value_and_highlight_reverts() {
    let (backend, interp) = setup();
    interp
        .execute(&[array_cmd("arr", json!([1, 2]))], Pacing::Realtime)
        .await;
    let cmd = [json!({ "command": "UPDATE_CELL", "arrayId": "arr", "index": 1, "value": 42, "highlight": true })];
    tokio::join!(interp.execute(&cmd, Pacing::Realtime), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let b = backend.borrow();
        let fill = b.primitive("arr").unwrap().part(PartRole::Cell(1)).unwrap().paint.fill;
        assert_eq!(fill, Some(Rgba8::GREEN.tint()));
    });
    assert_eq!(cells(&interp, "arr"), vec!["1", "42"]);
    let b = backend.borrow();
    let fill = b.primitive("arr").unwrap().part(PartRole::Cell(1)).unwrap().paint.fill;
    assert_eq!(fill, Some(Rgba8::WHITE.with_opacity(0.05)));
}

#[tokio::test(start_paused = true)]
async fn unknown_and_malformed_commands_do_not_halt_step() {
    let (_b, interp) = setup();
    let report = interp
        .execute(
            &[
                json!({ "command": "TELEPORT", "id": "x" }),
                json!({ "id": "no-tag" }),
                json!({ "command": "CREATE_NODE", "id": "n" }),
                node_cmd("ok", 10.0),
            ],
            Pacing::Realtime,
        )
        .await;
    assert_eq!(report.applied, 1);
    let errors: Vec<_> = report.skipped.iter().map(|s| s.index).collect();
    assert_eq!(errors, vec![0, 1, 2]);
    assert!(interp.store().contains::<Node>("ok"));
}

#[tokio::test(start_paused = true)]
async fn cross_kind_id_is_rejected() {
    let (_b, interp) = setup();
    interp.execute(&[node_cmd("x", 10.0)], Pacing::Realtime).await;
    let report = interp
        .execute(&[array_cmd("x", json!([1]))], Pacing::Realtime)
        .await;
    assert!(matches!(
        report.skipped[0].error,
        CommandError::Rejected {
            tag: CommandTag::CreateArray,
            ..
        }
    ));
    assert_eq!(interp.store().kind_of("x"), Some(EntityKind::Node));
}

#[tokio::test(start_paused = true)]
async fn timed_commands_settle_after_their_animation() {
    let (_b, interp) = setup();
    interp
        .execute(
            &[node_cmd("a", 100.0), node_cmd("b", 200.0), node_cmd("c", 300.0)],
            Pacing::Realtime,
        )
        .await;

    let cases = [
        (json!({ "command": "COMPARE", "elements": ["a", "b"], "result": true }), 1500),
        (json!({ "command": "PULSE", "id": "a" }), 1200),
        (json!({ "command": "HIGHLIGHT", "id": "a", "duration": 250 }), 250),
        (json!({ "command": "HIGHLIGHT_PATH", "nodes": ["a", "b", "c"] }), 1400),
        (json!({ "command": "HIGHLIGHT_PATH", "nodes": ["a", "b"], "sequential": false }), 2000),
        (json!({ "command": "MOVE_NODE", "id": "c", "to": { "x": 0, "y": 0 } }), 1000),
    ];
    for (cmd, expected) in cases {
        let start = Instant::now();
        let report = interp.execute(&[cmd.clone()], Pacing::Realtime).await;
        assert!(report.skipped.is_empty(), "{cmd}: {:?}", report.skipped);
        assert_eq!(start.elapsed(), Duration::from_millis(expected), "{cmd}");
    }
}

#[tokio::test(start_paused = true)]
async fn step_waits_for_slowest_command() {
    let (_b, interp) = setup();
    interp.execute(&[node_cmd("a", 100.0)], Pacing::Realtime).await;
    let start = Instant::now();
    interp
        .execute(
            &[
                json!({ "command": "HIGHLIGHT", "id": "a", "duration": 200 }),
                json!({ "command": "MOVE_NODE", "id": "a", "to": { "x": 10, "y": 10 }, "duration": 700 }),
            ],
            Pacing::Realtime,
        )
        .await;
    assert_eq!(start.elapsed(), Duration::from_millis(700));
}

#[tokio::test(start_paused = true)]
async fn compare_shows_verdict_then_reverts() {
    let (backend, interp) = setup();
    interp
        .execute(&[node_cmd("a", 100.0), node_cmd("b", 200.0)], Pacing::Realtime)
        .await;
    let fill = |id: &str| {
        backend
            .borrow()
            .primitive(id)
            .unwrap()
            .part(PartRole::Body)
            .unwrap()
            .paint
            .fill
    };
    let cmd = [json!({ "command": "COMPARE", "elements": ["a", "b"], "result": false })];
    tokio::join!(interp.execute(&cmd, Pacing::Realtime), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fill("a"), Some(Rgba8::AMBER.tint()));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fill("b"), Some(Rgba8::RED));
    });
    assert_eq!(fill("a"), Some(Rgba8::WHITE.with_opacity(0.1)));
}

#[tokio::test(start_paused = true)]
async fn edges_follow_moved_node() {
    let (backend, interp) = setup();
    interp
        .execute(&[node_cmd("a", 100.0), node_cmd("b", 300.0)], Pacing::Realtime)
        .await;
    interp
        .execute(
            &[json!({ "command": "CREATE_EDGE", "id": "e", "from": "a", "to": "b", "directed": false })],
            Pacing::Realtime,
        )
        .await;
    interp
        .execute(
            &[json!({ "command": "MOVE_NODE", "id": "a", "to": { "x": 100, "y": 400 }, "easing": "linear" })],
            Pacing::Realtime,
        )
        .await;
    assert_eq!(
        interp.store().get::<Node>("a").unwrap().position,
        Point::new(100.0, 400.0)
    );
    let b = backend.borrow();
    match &b.primitive("e").unwrap().part(PartRole::Body).unwrap().shape {
        Shape::Line { from, to } => {
            assert_eq!(*from, Point::new(100.0, 400.0));
            assert_eq!(*to, Point::new(300.0, 100.0));
        }
        other => panic!("expected line, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn instant_pacing_takes_no_time() {
    let (_b, interp) = setup();
    let start = Instant::now();
    let report = interp
        .execute(
            &[
                node_cmd("a", 100.0),
                array_cmd("arr", json!([2, 1])),
                json!({ "command": "SWAP", "arrayId": "arr", "indices": [0, 1] }),
            ],
            Pacing::Instant,
        )
        .await;
    assert_eq!(report.applied, 3);
    interp
        .execute(
            &[
                json!({ "command": "PULSE", "id": "a", "count": 5 }),
                json!({ "command": "DELETE_NODE", "id": "a" }),
            ],
            Pacing::Instant,
        )
        .await;
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(!interp.store().contains::<Node>("a"));
}

#[tokio::test(start_paused = true)]
async fn update_node_changes_value_and_style() {
    let (backend, interp) = setup();
    interp.execute(&[node_cmd("a", 100.0)], Pacing::Realtime).await;
    interp
        .execute(
            &[json!({ "command": "UPDATE_NODE", "id": "a", "value": 9, "style": "highlight" })],
            Pacing::Realtime,
        )
        .await;
    let node = interp.store().get::<Node>("a").unwrap().clone();
    assert_eq!(node.value.as_str(), "9");
    assert_eq!(node.style.as_deref(), Some("highlight"));
    assert_eq!(
        backend.borrow().primitive("a").unwrap().text(PartRole::Text),
        Some("9")
    );

    let report = interp
        .execute(&[json!({ "command": "UPDATE_NODE", "id": "zzz" })], Pacing::Realtime)
        .await;
    assert_eq!(report.applied, 0);
}

#[tokio::test(start_paused = true)]
async fn annotations_must_be_arrows() {
    let (_b, interp) = setup();
    let report = interp
        .execute(
            &[
                json!({ "command": "ADD_ANNOTATION", "id": "a1", "type": "circle", "from": { "x": 0, "y": 0 }, "to": { "x": 1, "y": 1 } }),
                json!({ "command": "ADD_ANNOTATION", "id": "a2", "type": "arrow", "from": { "x": 0, "y": 0 }, "to": { "x": 1, "y": 1 }, "label": "mid" }),
            ],
            Pacing::Realtime,
        )
        .await;
    assert_eq!(report.applied, 1);
    assert_eq!(interp.store().count::<Annotation>(), 1);
    assert_eq!(
        interp.store().get::<Annotation>("a2").unwrap().text.as_deref(),
        Some("mid")
    );
}

#[tokio::test(start_paused = true)]
async fn reset_clears_scene() {
    let (backend, interp) = setup();
    interp
        .execute(&[node_cmd("a", 1.0), array_cmd("arr", json!([1]))], Pacing::Realtime)
        .await;
    interp.reset();
    assert!(interp.store().is_empty());
    assert_eq!(interp.renderer().live_count(), 0);
    assert!(backend.borrow().is_empty());
}
