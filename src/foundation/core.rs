use std::{borrow::Borrow, fmt, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};

use crate::foundation::error::{VizError, VizResult};

pub use kurbo::{Point, Rect, Vec2};

/// Logical canvas width. Every backend lays out in this space.
pub const CANVAS_WIDTH: f64 = 800.0;
/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 600.0;
/// Width of one array cell.
pub const CELL_WIDTH: f64 = 50.0;
/// Height of one array cell.
pub const CELL_HEIGHT: f64 = 40.0;
/// Radius of a node circle.
pub const NODE_RADIUS: f64 = 25.0;

/// Step duration used when a step does not carry one.
pub const DEFAULT_STEP_DURATION_MS: u64 = 2000;
/// Fade-out applied before a deleted primitive leaves the live index.
pub const EXIT_TRANSITION_MS: u64 = 300;
/// Fade-in applied to newly created primitives.
pub const ENTER_TRANSITION_MS: u64 = 300;

/// Duration of `secs` seconds, clamped to `[0, Duration::MAX]`.
pub fn saturating_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Positive playback speed multiplier. Step durations are divided by it.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Speed(f64);

impl Speed {
    /// Multipliers offered by playback controls.
    pub const PRESETS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

    /// Normal speed.
    pub const NORMAL: Self = Self(1.0);

    /// Create a validated speed (finite and strictly positive).
    pub fn new(multiplier: f64) -> VizResult<Self> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(VizError::validation(format!(
                "speed must be a positive finite multiplier, got {multiplier}"
            )));
        }
        Ok(Self(multiplier))
    }

    /// Raw multiplier.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Divide `d` by this multiplier, saturating at [`Duration::MAX`].
    pub fn scale(self, d: Duration) -> Duration {
        saturating_secs(d.as_secs_f64() / self.0)
    }

    /// Next preset after the current multiplier, wrapping to the slowest.
    pub fn next_preset(self) -> Self {
        Self::PRESETS
            .iter()
            .copied()
            .find(|p| *p > self.0 + f64::EPSILON)
            .map_or(Self(Self::PRESETS[0]), Self)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f64> for Speed {
    type Error = VizError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Speed> for f64 {
    fn from(s: Speed) -> Self {
        s.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Identifier shared by every scene entity kind.
///
/// Generators emit ids as strings or bare numbers; both decode to the same id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "id must be a string or number, got {other}"
            ))),
        }
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Millisecond duration as found on the wire (integer, float or numeric string).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    /// Convert to a [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl<'de> Deserialize<'de> for Millis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        fn from_f64<E: serde::de::Error>(v: f64) -> Result<Millis, E> {
            if !v.is_finite() || v < 0.0 {
                return Err(E::custom(format!("duration must be >= 0 ms, got {v}")));
            }
            Ok(Millis(v.round() as u64))
        }

        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(v) => Ok(Self(v)),
                None => from_f64(n.as_f64().unwrap_or(-1.0)),
            },
            serde_json::Value::String(s) => {
                let v: f64 = s
                    .trim()
                    .parse()
                    .map_err(|_| serde::de::Error::custom(format!("invalid duration \"{s}\"")))?;
                from_f64(v)
            }
            other => Err(serde::de::Error::custom(format!(
                "duration must be a number, got {other}"
            ))),
        }
    }
}

/// Text shown inside a node or cell. Any JSON scalar is accepted and rendered as text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayValue(pub String);

impl DisplayValue {
    /// Borrow the rendered text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self(String::new()),
            serde_json::Value::String(s) => Self(s.clone()),
            other => Self(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&v))
    }
}

impl From<&str> for DisplayValue {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire position `{ x, y }`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate in canvas units.
    pub x: f64,
    /// Vertical coordinate in canvas units.
    pub y: f64,
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
