use super::*;
use serde_json::json;

#[test]
fn nested_and_flat_shapes_agree() {
    let nested = normalize(&json!({
        "command": "CREATE_NODE",
        "params": { "id": "n1", "value": 5, "position": { "x": 1, "y": 2 } }
    }))
    .unwrap();
    let flat = normalize(&json!({
        "command": "CREATE_NODE",
        "id": "n1",
        "value": 5,
        "position": { "x": 1, "y": 2 }
    }))
    .unwrap();
    assert_eq!(nested, flat);
    assert_eq!(flat.tag, "CREATE_NODE");
    assert!(!flat.payload.contains_key("command"));
}

#[test]
fn null_params_means_flat() {
    let w = normalize(&json!({ "command": "DELETE_NODE", "params": null, "id": "n1" })).unwrap();
    assert_eq!(w.payload.get("id"), Some(&json!("n1")));
    assert!(!w.payload.contains_key("params"));
}

#[test]
fn nested_params_ignore_siblings() {
    let w = normalize(&json!({
        "command": "DELETE_NODE",
        "params": { "id": "inner" },
        "id": "outer"
    }))
    .unwrap();
    assert_eq!(w.payload.get("id"), Some(&json!("inner")));
    assert_eq!(w.payload.len(), 1);
}

#[test]
fn missing_or_blank_tag() {
    assert_eq!(
        normalize(&json!({ "id": "n1" })).unwrap_err(),
        CommandError::MissingTag
    );
    assert_eq!(
        normalize(&json!({ "command": "  " })).unwrap_err(),
        CommandError::MissingTag
    );
    assert_eq!(
        normalize(&json!({ "command": 3 })).unwrap_err(),
        CommandError::MissingTag
    );
}

#[test]
fn rejects_non_objects() {
    assert!(matches!(
        normalize(&json!("CREATE_NODE")).unwrap_err(),
        CommandError::Malformed { .. }
    ));
    assert!(matches!(
        normalize(&json!({ "command": "SWAP", "params": [1, 2] })).unwrap_err(),
        CommandError::Malformed { tag, .. } if tag == "SWAP"
    ));
}
