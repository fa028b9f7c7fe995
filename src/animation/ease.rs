use crate::foundation::error::{VizError, VizResult};

/// Progress curve for a transition.
///
/// Power curves: `In*` accelerates from rest, `Out*` is its mirror, `InOutCubic` joins the
/// two halves at the midpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InCubic,
    OutCubic,
    #[default]
    InOutCubic,
}

impl Ease {
    /// Eased value of progress `t`, clamped to `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t.powi(2),
            Self::OutQuad => mirrored(t, 2),
            Self::InCubic => t.powi(3),
            Self::OutCubic => mirrored(t, 3),
            Self::InOutCubic if t < 0.5 => (2.0 * t).powi(3) / 2.0,
            Self::InOutCubic => 0.5 + mirrored(2.0 * t - 1.0, 3) / 2.0,
        }
    }
}

fn mirrored(t: f64, power: i32) -> f64 {
    1.0 - (1.0 - t).powi(power)
}

/// Parse a CSS-style easing name as emitted by visualization generators.
///
/// Accepts the CSS keywords (`linear`, `ease`, `ease-in`, `ease-out`, `ease-in-out`) and the
/// variant names of [`Ease`] in any case, with `-`/`_` separators ignored.
pub fn parse_ease(name: &str) -> VizResult<Ease> {
    let key: String = name
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match key.as_str() {
        "linear" => Ok(Ease::Linear),
        "ease" | "easeinout" | "inoutcubic" => Ok(Ease::InOutCubic),
        "easein" | "incubic" => Ok(Ease::InCubic),
        "easeout" | "outcubic" => Ok(Ease::OutCubic),
        "inquad" => Ok(Ease::InQuad),
        "outquad" => Ok(Ease::OutQuad),
        _ => Err(VizError::validation(format!("unknown easing '{name}'"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
