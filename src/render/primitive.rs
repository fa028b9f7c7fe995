use serde::Serialize;

use crate::foundation::{
    color::Rgba8,
    core::{Point, Rect},
};

/// Opaque handle a backend returns for a primitive it owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PrimitiveHandle(pub u64);

/// Paint order bucket. Edges are always drawn behind nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Layer {
    /// Connections.
    Edges,
    /// Nodes, arrays, pointers.
    Shapes,
    /// Labels and annotations.
    Overlay,
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    Start,
    /// Text is centered on the anchor point.
    #[default]
    Middle,
}

/// Geometry of one part, in coordinates relative to the primitive origin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Shape {
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Plain segment.
    Line {
        /// Start.
        from: Point,
        /// End.
        to: Point,
    },
    /// Segment with an arrowhead at `to`.
    Arrow {
        /// Tail.
        from: Point,
        /// Head.
        to: Point,
    },
    /// Single line of text.
    Text {
        /// Anchor point.
        at: Point,
        /// Content.
        content: String,
        /// Font size.
        size: f64,
        /// Font weight.
        weight: u16,
        /// Alignment.
        anchor: TextAnchor,
        /// Center vertically on `at` instead of sitting on the baseline.
        centered: bool,
    },
}

/// Fill and stroke of a part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Paint {
    /// Fill color.
    pub fill: Option<Rgba8>,
    /// Stroke color.
    pub stroke: Option<Rgba8>,
    /// Stroke width; ignored without a stroke.
    pub stroke_width: f64,
    /// Dash pattern `[on, off]`.
    pub dash: Option<[f64; 2]>,
}

impl Paint {
    /// Fill only.
    pub fn fill(color: Rgba8) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// Stroke only.
    pub fn stroke(color: Rgba8, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    /// Add a dash pattern.
    pub fn dashed(self, on: f64, off: f64) -> Self {
        Self {
            dash: Some([on, off]),
            ..self
        }
    }
}

/// What a part represents inside its primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PartRole {
    /// Main body (circle, line, arrow).
    Body,
    /// Main text.
    Text,
    /// Background of array cell `i`.
    Cell(usize),
    /// Value of array cell `i`.
    CellText(usize),
    /// Index caption below array cell `i`.
    CellIndex(usize),
    /// Secondary caption (weight, pointer label, annotation text).
    Caption,
}

/// A shape with its paint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Part {
    /// Role inside the primitive.
    pub role: PartRole,
    /// Geometry.
    pub shape: Shape,
    /// Paint.
    pub paint: Paint,
}

/// Backend-agnostic drawing of one scene entity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Primitive {
    /// Paint order bucket.
    pub layer: Layer,
    /// Translation applied to every part.
    pub origin: Point,
    /// Group opacity.
    pub opacity: f64,
    /// Parts in paint order.
    pub parts: Vec<Part>,
}

impl Primitive {
    /// First part with `role`.
    pub fn part(&self, role: PartRole) -> Option<&Part> {
        self.parts.iter().find(|p| p.role == role)
    }

    /// Text content of the first text part with `role`.
    pub fn text(&self, role: PartRole) -> Option<&str> {
        match self.part(role).map(|p| &p.shape) {
            Some(Shape::Text { content, .. }) => Some(content.as_str()),
            _ => None,
        }
    }
}
