use std::time::Duration;

use super::*;
use crate::{
    animation::ease::Ease,
    foundation::core::DisplayValue,
    render::build,
    scene::model::{ArrayEntity, Node},
};

fn node_primitive(x: f64) -> Primitive {
    build::node(
        &Node {
            id: "n1".into(),
            value: DisplayValue::from("a<b"),
            position: Point::new(x, 100.0),
            style: None,
        },
        None,
    )
}

#[test]
fn document_has_canvas_and_marker() {
    let svg = SvgBackend::new().to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"viewBox="0 0 800 600""#));
    assert!(svg.contains(r#"points="0 0, 10 3, 0 6""#));
    assert!(svg.contains("#12141c"));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn create_update_discard_round_trip() {
    let mut b = SvgBackend::new();
    let id = EntityId::new("n1");
    let h = b.render(
        EntityKind::Node,
        &id,
        None,
        &RenderOp::Create {
            primitive: node_primitive(100.0),
            enter: Transition::cut(),
        },
    );
    assert_eq!(b.len(), 1);
    let svg = b.to_svg();
    assert!(svg.contains(r#"data-id="n1""#));
    assert!(svg.contains("a&lt;b"));
    assert!(svg.contains(r#"translate(100 100)"#));

    let h2 = b.render(
        EntityKind::Node,
        &id,
        Some(h),
        &RenderOp::Update {
            primitive: node_primitive(300.0),
            transition: Transition::cut(),
        },
    );
    assert_eq!(h, h2);
    assert!(b.to_svg().contains(r#"translate(300 100)"#));

    b.render(EntityKind::Node, &id, Some(h), &RenderOp::Discard);
    assert!(b.is_empty());
}

#[tokio::test(start_paused = true)]
async fn in_flight_transitions_are_sampled() {
    let mut b = SvgBackend::new();
    let id = EntityId::new("n1");
    let start = Instant::now();
    let h = b.render(
        EntityKind::Node,
        &id,
        None,
        &RenderOp::Create {
            primitive: node_primitive(0.0),
            enter: Transition::fade_in(Duration::from_millis(300)),
        },
    );
    assert!(b.to_svg_at(start).contains(r#"opacity="0""#));
    assert!(
        b.to_svg_at(start + Duration::from_millis(300))
            .contains(r#"opacity="1""#)
    );

    tokio::time::advance(Duration::from_millis(300)).await;
    b.render(
        EntityKind::Node,
        &id,
        Some(h),
        &RenderOp::Move {
            to: Point::new(200.0, 100.0),
            transition: Transition::move_between(
                Point::ZERO,
                Point::ZERO,
                Duration::from_millis(1000),
                Ease::Linear,
            ),
        },
    );
    let moving = Instant::now();
    assert!(
        b.to_svg_at(moving + Duration::from_millis(500))
            .contains("translate(100 100)")
    );
    assert!(
        b.to_svg_at(moving + Duration::from_millis(1000))
            .contains("translate(200 100)")
    );
}

#[test]
fn layers_order_edges_first() {
    let mut b = SvgBackend::new();
    b.render(
        EntityKind::Node,
        &"n1".into(),
        None,
        &RenderOp::Create {
            primitive: node_primitive(0.0),
            enter: Transition::cut(),
        },
    );
    let edge = crate::scene::model::Edge {
        id: "e1".into(),
        from: "n1".into(),
        to: "n2".into(),
        directed: false,
        weight: None,
        line: crate::scene::model::LineStyle::Solid,
    };
    b.render(
        EntityKind::Edge,
        &"e1".into(),
        None,
        &RenderOp::Create {
            primitive: build::edge(&edge, Point::ZERO, Point::new(10.0, 10.0)),
            enter: Transition::cut(),
        },
    );
    let svg = b.to_svg();
    let edge_at = svg.find(r#"data-id="e1""#).unwrap();
    let node_at = svg.find(r#"data-id="n1""#).unwrap();
    assert!(edge_at < node_at);
    assert_eq!(b.count_of(EntityKind::Edge), 1);
}

#[test]
fn cut_exit_hides_primitive_until_discard() {
    let mut b = SvgBackend::new();
    let id = EntityId::new("arr");
    let arr = ArrayEntity {
        id: id.clone(),
        cells: vec!["1".into()],
        anchor: Point::new(10.0, 10.0),
    };
    let h = b.render(
        EntityKind::Array,
        &id,
        None,
        &RenderOp::Create {
            primitive: build::array(&arr, &[]),
            enter: Transition::cut(),
        },
    );
    b.render(
        EntityKind::Array,
        &id,
        Some(h),
        &RenderOp::Exit {
            transition: Transition::cut(),
        },
    );
    assert_eq!(b.len(), 1);
    assert!(b.to_svg().contains(r#"opacity="0""#));
}

#[test]
fn fmt_num_trims_integers() {
    assert_eq!(fmt_num(800.0), "800");
    assert_eq!(fmt_num(0.6), "0.6");
    assert_eq!(fmt_num(1.0 / 3.0), "0.333");
}

#[test]
fn demultiply_restores_straight_alpha() {
    let mut px = [64u8, 0, 128, 128];
    demultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [128, 0, 255, 128]);
}

#[test]
fn rasterize_rejects_bad_scale() {
    assert!(rasterize_svg("<svg/>", 0.0).is_err());
}

#[test]
fn rasterizes_empty_scene() {
    let frame = SvgBackend::new().rasterize(0.5).unwrap();
    assert_eq!((frame.width, frame.height), (400, 300));
    assert_eq!(frame.data.len(), 400 * 300 * 4);
    assert_eq!(&frame.data[..4], &[18, 20, 28, 255]);
}
