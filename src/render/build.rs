//! Pure builders from scene entities to [`Primitive`]s.

use crate::{
    foundation::{
        color::Rgba8,
        core::{CELL_HEIGHT, CELL_WIDTH, NODE_RADIUS, Point, Rect, Vec2},
    },
    render::primitive::{Layer, Paint, Part, PartRole, Primitive, Shape, TextAnchor},
    scene::model::{Annotation, ArrayEntity, Edge, LineStyle, Label, Node, Pointer},
};

const NODE_STROKE_WIDTH: f64 = 2.0;
const HIGHLIGHT_STROKE_WIDTH: f64 = 3.0;
const EDGE_OPACITY: f64 = 0.6;
const POINTER_RISE: f64 = 20.0;
const POINTER_LENGTH: f64 = 15.0;

/// Strength of a transient highlight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Intensity {
    /// Solid fill.
    #[default]
    High,
    /// Tinted fill.
    Medium,
    /// Tinted fill.
    Low,
}

impl Intensity {
    /// Lenient parse; unknown names are `High`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("medium") => Self::Medium,
            Some("low") => Self::Low,
            _ => Self::High,
        }
    }
}

/// A transient color override on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Highlight {
    /// Highlight color.
    pub color: Rgba8,
    /// How strongly the fill is tinted.
    pub intensity: Intensity,
}

fn node_fill(style: Option<&str>) -> Rgba8 {
    match style {
        None => Rgba8::WHITE.with_opacity(0.1),
        Some("root") => Rgba8::CYAN,
        Some("highlight") => Rgba8::GREEN.tint(),
        Some(_) => Rgba8::CYAN.tint(),
    }
}

/// Node circle with its value, optionally highlighted.
pub fn node(node: &Node, highlight: Option<Highlight>) -> Primitive {
    let paint = match highlight {
        None => Paint {
            fill: Some(node_fill(node.style.as_deref())),
            stroke: Some(if node.style.as_deref() == Some("highlight") {
                Rgba8::GREEN
            } else {
                Rgba8::CYAN
            }),
            stroke_width: NODE_STROKE_WIDTH,
            dash: None,
        },
        Some(h) => Paint {
            fill: Some(match h.intensity {
                Intensity::High => h.color,
                Intensity::Medium | Intensity::Low => h.color.tint(),
            }),
            stroke: Some(h.color),
            stroke_width: HIGHLIGHT_STROKE_WIDTH,
            dash: None,
        },
    };

    Primitive {
        layer: Layer::Shapes,
        origin: node.position,
        opacity: 1.0,
        parts: vec![
            Part {
                role: PartRole::Body,
                shape: Shape::Circle {
                    center: Point::ZERO,
                    radius: NODE_RADIUS,
                },
                paint,
            },
            Part {
                role: PartRole::Text,
                shape: text(Point::ZERO, node.value.as_str(), 16.0, 600, true),
                paint: Paint::fill(Rgba8::WHITE),
            },
        ],
    }
}

/// Edge between two node centers, drawn behind shapes.
///
/// Directed edges stop at the target circle so the arrowhead stays visible.
pub fn edge(edge: &Edge, from: Point, to: Point) -> Primitive {
    let mut paint = Paint::stroke(Rgba8::CYAN, 2.0);
    if edge.line == LineStyle::Dashed {
        paint = paint.dashed(5.0, 5.0);
    }

    let body = if edge.directed {
        let dir = to - from;
        let len = dir.hypot();
        let head = if len > NODE_RADIUS {
            to - dir * (NODE_RADIUS / len)
        } else {
            to
        };
        Shape::Arrow { from, to: head }
    } else {
        Shape::Line { from, to }
    };

    let mut parts = vec![Part {
        role: PartRole::Body,
        shape: body,
        paint,
    }];

    if let Some(w) = &edge.weight {
        let mid = from.midpoint(to) + Vec2::new(0.0, -8.0);
        parts.push(Part {
            role: PartRole::Caption,
            shape: text(mid, w.as_str(), 12.0, 400, false),
            paint: Paint::fill(Rgba8::WHITE),
        });
    }

    Primitive {
        layer: Layer::Edges,
        origin: Point::ZERO,
        opacity: EDGE_OPACITY,
        parts,
    }
}

/// Array cells with values and index captions. `tinted` overrides individual cell fills.
pub fn array(array: &ArrayEntity, tinted: &[(usize, Rgba8)]) -> Primitive {
    let mut parts = Vec::with_capacity(array.cells.len() * 3);
    for (i, value) in array.cells.iter().enumerate() {
        let x = i as f64 * CELL_WIDTH;
        let fill = tinted
            .iter()
            .rev()
            .find(|(idx, _)| *idx == i)
            .map_or(Rgba8::WHITE.with_opacity(0.05), |(_, c)| *c);
        let center_x = x + CELL_WIDTH / 2.0;

        parts.push(Part {
            role: PartRole::Cell(i),
            shape: Shape::Rect(Rect::new(x, 0.0, x + CELL_WIDTH, CELL_HEIGHT)),
            paint: Paint {
                fill: Some(fill),
                stroke: Some(Rgba8::CYAN),
                stroke_width: 1.0,
                dash: None,
            },
        });
        parts.push(Part {
            role: PartRole::CellText(i),
            shape: text(
                Point::new(center_x, CELL_HEIGHT / 2.0),
                value.as_str(),
                14.0,
                400,
                true,
            ),
            paint: Paint::fill(Rgba8::WHITE),
        });
        parts.push(Part {
            role: PartRole::CellIndex(i),
            shape: text(
                Point::new(center_x, CELL_HEIGHT + 15.0),
                &i.to_string(),
                11.0,
                400,
                false,
            ),
            paint: Paint::fill(Rgba8::WHITE.with_opacity(0.5)),
        });
    }

    Primitive {
        layer: Layer::Shapes,
        origin: array.anchor,
        opacity: 1.0,
        parts,
    }
}

/// Pointer arrow above cell `pointer.index` of `array`.
pub fn pointer(pointer: &Pointer, array: &ArrayEntity) -> Primitive {
    let cell = array.cell_rect(pointer.index);
    let origin = Point::new(cell.center().x, array.anchor.y - POINTER_RISE);

    Primitive {
        layer: Layer::Shapes,
        origin,
        opacity: 1.0,
        parts: vec![
            Part {
                role: PartRole::Body,
                shape: Shape::Arrow {
                    from: Point::ZERO,
                    to: Point::new(0.0, POINTER_LENGTH),
                },
                paint: Paint::stroke(pointer.color, 2.0),
            },
            Part {
                role: PartRole::Caption,
                shape: text(Point::new(0.0, -5.0), &pointer.label, 12.0, 400, false),
                paint: Paint::fill(pointer.color),
            },
        ],
    }
}

/// Free-standing label.
pub fn label(label: &Label) -> Primitive {
    Primitive {
        layer: Layer::Overlay,
        origin: label.position,
        opacity: 1.0,
        parts: vec![Part {
            role: PartRole::Text,
            shape: text(Point::ZERO, &label.text, 14.0, 500, false),
            paint: Paint::fill(label.tone.color()),
        }],
    }
}

/// Dashed amber arrow with an optional midpoint caption.
pub fn annotation(annotation: &Annotation) -> Primitive {
    let mut parts = vec![Part {
        role: PartRole::Body,
        shape: Shape::Arrow {
            from: annotation.from,
            to: annotation.to,
        },
        paint: Paint::stroke(Rgba8::AMBER, 2.0).dashed(4.0, 4.0),
    }];
    if let Some(caption) = annotation.text.as_deref().filter(|t| !t.is_empty()) {
        parts.push(Part {
            role: PartRole::Caption,
            shape: text(
                annotation.midpoint() + Vec2::new(0.0, -5.0),
                caption,
                12.0,
                400,
                false,
            ),
            paint: Paint::fill(Rgba8::AMBER),
        });
    }

    Primitive {
        layer: Layer::Overlay,
        origin: Point::ZERO,
        opacity: 1.0,
        parts,
    }
}

fn text(at: Point, content: &str, size: f64, weight: u16, centered: bool) -> Shape {
    Shape::Text {
        at,
        content: content.to_owned(),
        size,
        weight,
        anchor: TextAnchor::Middle,
        centered,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/build.rs"]
mod tests;
