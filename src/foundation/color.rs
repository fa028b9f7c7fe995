use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Alpha used for translucent highlight fills (`#rrggbb33`).
pub const TINT_ALPHA: u8 = 0x33;

impl Rgba8 {
    /// Primary accent.
    pub const CYAN: Self = Self::rgb(0x22, 0xd3, 0xee);
    /// Success.
    pub const GREEN: Self = Self::rgb(0x34, 0xd3, 0x99);
    /// Neutral comparison and warnings.
    pub const AMBER: Self = Self::rgb(0xfb, 0xbf, 0x24);
    /// Failure.
    pub const RED: Self = Self::rgb(0xef, 0x44, 0x44);
    /// Plain white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a replaced alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Same color with alpha set from a `[0, 1]` opacity.
    pub fn with_opacity(self, opacity: f64) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Translucent variant used for highlight fills.
    pub const fn tint(self) -> Self {
        self.with_alpha(TINT_ALPHA)
    }

    /// `#rrggbb` without alpha, as SVG paint attributes expect.
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as `[0, 1]` opacity.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Parse `s`, falling back to `fallback` when it is not a recognized color.
    pub fn parse_or(s: Option<&str>, fallback: Self) -> Self {
        s.and_then(|s| s.parse().ok()).unwrap_or(fallback)
    }
}

impl FromStr for Rgba8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body);
        }
        Err(format!(
            "color must be #rgb, #rrggbb, #rrggbbaa, rgb() or rgba(), got \"{s}\""
        ))
    }
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err(format!("invalid hex color \"#{s}\""));
    }

    match s.len() {
        3 => {
            let mut out = [0u8; 3];
            for (slot, ch) in out.iter_mut().zip(s.chars()) {
                let nibble = hex_byte(&ch.to_string())?;
                *slot = nibble * 17;
            }
            Ok(Rgba8::rgb(out[0], out[1], out[2]))
        }
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8 {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: hex_byte(&s[6..8])?,
        }),
        _ => Err(format!("invalid hex color \"#{s}\"")),
    }
}

fn parse_functional(body: &str) -> Result<Rgba8, String> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("rgb()/rgba() needs 3 or 4 components, got \"{body}\""));
    }

    fn channel(s: &str) -> Result<u8, String> {
        let v: f64 = s
            .parse()
            .map_err(|_| format!("invalid color channel \"{s}\""))?;
        Ok(v.clamp(0.0, 255.0).round() as u8)
    }

    let mut c = Rgba8::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    if let Some(a) = parts.get(3) {
        let a: f64 = a.parse().map_err(|_| format!("invalid alpha \"{a}\""))?;
        c = c.with_opacity(a);
    }
    Ok(c)
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
