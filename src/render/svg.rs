use std::{collections::BTreeMap, fmt::Write as _, path::Path, sync::Arc};

use anyhow::Context as _;
use tokio::time::Instant;

use crate::{
    animation::transition::{Transition, TransitionKind},
    foundation::{
        color::Rgba8,
        core::{CANVAS_HEIGHT, CANVAS_WIDTH, EntityId, Point},
        error::{VizError, VizResult},
    },
    render::{
        backend::{RenderBackend, RenderOp},
        primitive::{Paint, Primitive, PrimitiveHandle, Shape, TextAnchor},
    },
    scene::model::EntityKind,
};

/// Default canvas background.
pub const BACKGROUND: Rgba8 = Rgba8::rgb(18, 20, 28);

#[derive(Clone, Copy, Debug)]
struct Stamp {
    transition: Transition,
    started: Instant,
}

impl Stamp {
    fn new(transition: Transition) -> Option<Self> {
        if matches!(transition.kind, TransitionKind::Cut) || transition.duration.is_zero() {
            return None;
        }
        Some(Self {
            transition,
            started: Instant::now(),
        })
    }

    fn elapsed(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.started)
    }
}

#[derive(Clone, Debug)]
struct Item {
    kind: EntityKind,
    id: EntityId,
    primitive: Primitive,
    appear: Option<Stamp>,
    motion: Option<Stamp>,
    exit: Option<Stamp>,
}

impl Item {
    fn origin_at(&self, now: Instant) -> Point {
        self.motion
            .and_then(|s| s.transition.origin_at(s.elapsed(now)))
            .unwrap_or(self.primitive.origin)
    }

    fn opacity_at(&self, now: Instant) -> f64 {
        let mut o = self.primitive.opacity;
        for s in [self.appear, self.exit].into_iter().flatten() {
            o *= s.transition.opacity(s.elapsed(now));
        }
        o
    }

    fn reveal_at(&self, now: Instant) -> f64 {
        self.appear
            .map_or(1.0, |s| s.transition.stroke_reveal(s.elapsed(now)))
    }
}

/// RGBA8 pixels with straight alpha, row-major.
#[derive(Clone, Debug)]
pub struct RasterFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 bytes.
    pub data: Vec<u8>,
}

impl RasterFrame {
    /// Write the frame as a PNG file.
    pub fn save_png(&self, path: &Path) -> VizResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Display-list backend that serializes the scene to SVG.
///
/// Transitions are stamped with the tokio clock when applied, so a document sampled at any
/// instant shows in-flight fades and moves at their interpolated state.
#[derive(Clone, Debug)]
pub struct SvgBackend {
    items: BTreeMap<u64, Item>,
    next: u64,
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgBackend {
    /// Empty display list.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            next: 0,
        }
    }

    /// Number of drawn primitives, exiting ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drawing currently associated with `id`.
    pub fn primitive(&self, id: &str) -> Option<&Primitive> {
        self.items
            .values()
            .find(|i| i.id.as_str() == id)
            .map(|i| &i.primitive)
    }

    /// Number of drawn primitives of `kind`.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.items.values().filter(|i| i.kind == kind).count()
    }

    /// SVG document for the current instant.
    pub fn to_svg(&self) -> String {
        self.to_svg_at(Instant::now())
    }

    /// SVG document with transitions sampled at `now`.
    pub fn to_svg_at(&self, now: Instant) -> String {
        let mut out = String::with_capacity(1024 + self.items.len() * 256);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" viewBox="0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}">"#
        );
        out.push_str(
            r##"<defs><marker id="arrowhead" markerWidth="10" markerHeight="10" refX="9" refY="3" orient="auto"><polygon points="0 0, 10 3, 0 6" fill="#22d3ee"/></marker></defs>"##,
        );
        let _ = write!(
            out,
            r#"<rect width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" fill="{}"/>"#,
            BACKGROUND.to_hex_rgb()
        );

        let mut ordered: Vec<(&u64, &Item)> = self.items.iter().collect();
        ordered.sort_by_key(|(seq, item)| (item.primitive.layer, **seq));

        for (_, item) in ordered {
            let origin = item.origin_at(now);
            let opacity = item.opacity_at(now);
            let reveal = item.reveal_at(now);
            let _ = write!(
                out,
                r#"<g data-id="{}" data-kind="{}" transform="translate({} {})" opacity="{}">"#,
                escape(item.id.as_str()),
                item.kind,
                fmt_num(origin.x),
                fmt_num(origin.y),
                fmt_num(opacity),
            );
            for part in &item.primitive.parts {
                write_shape(&mut out, &part.shape, &part.paint, reveal);
            }
            out.push_str("</g>");
        }

        out.push_str("</svg>");
        out
    }

    /// Rasterize the current document at `scale` (1.0 = 800×600 pixels).
    pub fn rasterize(&self, scale: f32) -> VizResult<RasterFrame> {
        rasterize_svg(&self.to_svg(), scale)
    }
}

impl RenderBackend for SvgBackend {
    fn render(
        &mut self,
        kind: EntityKind,
        id: &EntityId,
        target: Option<PrimitiveHandle>,
        op: &RenderOp,
    ) -> PrimitiveHandle {
        let existing = target.filter(|h| self.items.contains_key(&h.0));
        match (op, existing) {
            (RenderOp::Create { primitive, enter }, _) | (RenderOp::Update { primitive, transition: enter }, None) => {
                self.next += 1;
                self.items.insert(
                    self.next,
                    Item {
                        kind,
                        id: id.clone(),
                        primitive: primitive.clone(),
                        appear: Stamp::new(*enter),
                        motion: None,
                        exit: None,
                    },
                );
                PrimitiveHandle(self.next)
            }
            (RenderOp::Update { primitive, transition }, Some(h)) => {
                if let Some(item) = self.items.get_mut(&h.0) {
                    item.primitive = primitive.clone();
                    item.motion = None;
                    if let Some(stamp) = Stamp::new(*transition) {
                        item.appear = Some(stamp);
                    }
                }
                h
            }
            (RenderOp::Move { to, transition }, Some(h)) => {
                if let Some(item) = self.items.get_mut(&h.0) {
                    let now = Instant::now();
                    let from = item.origin_at(now);
                    let transition = Transition {
                        kind: TransitionKind::Move { from, to: *to },
                        ..*transition
                    };
                    item.motion = Stamp::new(transition);
                    item.primitive.origin = *to;
                }
                h
            }
            (RenderOp::Exit { transition }, Some(h)) => {
                if let Some(item) = self.items.get_mut(&h.0) {
                    item.exit = Stamp::new(*transition);
                    if item.exit.is_none() {
                        item.primitive.opacity = 0.0;
                    }
                }
                h
            }
            (RenderOp::Discard, Some(h)) => {
                self.items.remove(&h.0);
                h
            }
            (_, None) => {
                tracing::warn!(%id, %kind, "svg backend: operation on unknown primitive");
                target.unwrap_or(PrimitiveHandle(0))
            }
        }
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

/// Parse an SVG document and rasterize it with system fonts.
pub fn rasterize_svg(svg: &str, scale: f32) -> VizResult<RasterFrame> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(VizError::validation(format!(
            "raster scale must be > 0, got {scale}"
        )));
    }

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts).context("parse svg snapshot")?;

    let width = ((tree.size().width() * scale).ceil() as u32).max(1);
    let height = ((tree.size().height() * scale).ceil() as u32).max(1);
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| VizError::validation("failed to allocate svg pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let mut data = pixmap.take();
    demultiply_rgba8_in_place(&mut data);
    Ok(RasterFrame {
        width,
        height,
        data,
    })
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn write_shape(out: &mut String, shape: &Shape, paint: &Paint, reveal: f64) {
    match shape {
        Shape::Circle { center, radius } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(*radius),
                paint_attrs(paint)
            );
        }
        Shape::Rect(r) => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
                fmt_num(r.x0),
                fmt_num(r.y0),
                fmt_num(r.width()),
                fmt_num(r.height()),
                paint_attrs(paint)
            );
        }
        Shape::Line { from, to } | Shape::Arrow { from, to } => {
            let end = from.lerp(*to, reveal.clamp(0.0, 1.0));
            let marker = if matches!(shape, Shape::Arrow { .. }) {
                r#" marker-end="url(#arrowhead)""#
            } else {
                ""
            };
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}{marker}/>"#,
                fmt_num(from.x),
                fmt_num(from.y),
                fmt_num(end.x),
                fmt_num(end.y),
                paint_attrs(paint)
            );
        }
        Shape::Text {
            at,
            content,
            size,
            weight,
            anchor,
            centered,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
            };
            let baseline = if *centered {
                r#" dominant-baseline="central""#
            } else {
                ""
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" font-weight="{weight}" text-anchor="{anchor}"{baseline}{}>{}</text>"#,
                fmt_num(at.x),
                fmt_num(at.y),
                fmt_num(*size),
                paint_attrs(paint),
                escape(content)
            );
        }
    }
}

fn paint_attrs(paint: &Paint) -> String {
    let mut s = String::new();
    match paint.fill {
        Some(c) => {
            let _ = write!(s, r#" fill="{}""#, c.to_hex_rgb());
            if c.a != 255 {
                let _ = write!(s, r#" fill-opacity="{}""#, fmt_num(c.opacity()));
            }
        }
        None => s.push_str(r#" fill="none""#),
    }
    if let Some(c) = paint.stroke {
        let _ = write!(
            s,
            r#" stroke="{}" stroke-width="{}""#,
            c.to_hex_rgb(),
            fmt_num(paint.stroke_width)
        );
        if c.a != 255 {
            let _ = write!(s, r#" stroke-opacity="{}""#, fmt_num(c.opacity()));
        }
        if let Some([on, off]) = paint.dash {
            let _ = write!(s, r#" stroke-dasharray="{},{}""#, fmt_num(on), fmt_num(off));
        }
    }
    s
}

fn fmt_num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == r.trunc() {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
