use std::fmt;

use serde::Serialize;

use crate::foundation::{
    color::Rgba8,
    core::{CELL_HEIGHT, CELL_WIDTH, DisplayValue, EntityId, Point, Rect},
};

/// Kind tag shared by the store, the renderer and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Graph/tree node.
    Node,
    /// Connection between two nodes.
    Edge,
    /// Row of cells.
    Array,
    /// Marker over one array cell.
    Pointer,
    /// Free text.
    Label,
    /// Arrow between two points.
    Annotation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Array => "array",
            Self::Pointer => "pointer",
            Self::Label => "label",
            Self::Annotation => "annotation",
        })
    }
}

/// A node with a display value at a canvas position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    /// Identifier.
    pub id: EntityId,
    /// Text drawn at the center.
    pub value: DisplayValue,
    /// Center position.
    pub position: Point,
    /// Optional style tag such as `root` or `highlight`.
    pub style: Option<String>,
}

/// Stroke pattern of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// `5,5` dash pattern.
    Dashed,
}

impl LineStyle {
    /// Lenient parse; anything but `dashed` is solid.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "dashed" || s == "dotted" => Self::Dashed,
            _ => Self::Solid,
        }
    }
}

/// A connection between two existing nodes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edge {
    /// Identifier.
    pub id: EntityId,
    /// Source node id.
    pub from: EntityId,
    /// Target node id.
    pub to: EntityId,
    /// Whether an arrowhead is drawn at the target.
    pub directed: bool,
    /// Optional weight drawn at the midpoint.
    pub weight: Option<DisplayValue>,
    /// Stroke pattern.
    pub line: LineStyle,
}

/// A horizontal row of cells anchored at its top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArrayEntity {
    /// Identifier.
    pub id: EntityId,
    /// Cell values, mutated in place.
    pub cells: Vec<DisplayValue>,
    /// Top-left corner of cell 0.
    pub anchor: Point,
}

impl ArrayEntity {
    /// Rectangle of cell `index` (not bounds-checked).
    pub fn cell_rect(&self, index: usize) -> Rect {
        let x = self.anchor.x + index as f64 * CELL_WIDTH;
        Rect::new(x, self.anchor.y, x + CELL_WIDTH, self.anchor.y + CELL_HEIGHT)
    }

    /// Whether `index` addresses a cell.
    pub fn contains(&self, index: usize) -> bool {
        index < self.cells.len()
    }
}

/// A labelled arrow above one array cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pointer {
    /// Identifier.
    pub id: EntityId,
    /// Array the pointer refers to.
    pub array: EntityId,
    /// Cell index inside that array.
    pub index: usize,
    /// Text above the arrow; defaults to the id.
    pub label: String,
    /// Arrow and text color.
    pub color: Rgba8,
}

/// Semantic tone of a label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelTone {
    /// Neutral information.
    #[default]
    Info,
    /// Positive outcome.
    Success,
    /// Caution.
    Warning,
    /// Failure.
    Error,
}

impl LabelTone {
    /// Lenient parse; unknown names are `Info`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("success") => Self::Success,
            Some("warning") => Self::Warning,
            Some("error") => Self::Error,
            _ => Self::Info,
        }
    }

    /// Text color for this tone.
    pub fn color(self) -> Rgba8 {
        match self {
            Self::Info => Rgba8::CYAN,
            Self::Success => Rgba8::GREEN,
            Self::Warning => Rgba8::AMBER,
            Self::Error => Rgba8::RED,
        }
    }
}

/// Static text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
    /// Identifier.
    pub id: EntityId,
    /// Text content.
    pub text: String,
    /// Baseline start position.
    pub position: Point,
    /// Color tone.
    pub tone: LabelTone,
}

/// An arrow annotation with an optional midpoint caption.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Annotation {
    /// Identifier.
    pub id: EntityId,
    /// Tail.
    pub from: Point,
    /// Head.
    pub to: Point,
    /// Caption drawn above the midpoint.
    pub text: Option<String>,
}

impl Annotation {
    /// Midpoint of the arrow.
    pub fn midpoint(&self) -> Point {
        self.from.midpoint(self.to)
    }
}
