//! CSS color parsing and RGB/HSL conversion.
//!
//! Unparseable input is routine when scanning real pages (gradients,
//! `currentcolor`, CSS variables), so [`parse_color`] returns `None` rather
//! than an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from arbitrary integer channels, saturating each into `[0, 255]`.
    #[must_use]
    pub fn saturating(r: i32, g: i32, b: i32) -> Self {
        let clamp = |c: i32| u8::try_from(c.clamp(0, 255)).unwrap_or(u8::MAX);
        Self::new(clamp(r), clamp(g), clamp(b))
    }

    /// Lowercase `#rrggbb` representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hue/saturation/lightness, used to adjust lightness while keeping hue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees, `[0, 360)`
    pub h: f64,
    /// Saturation, `[0, 1]`
    pub s: f64,
    /// Lightness, `[0, 1]`
    pub l: f64,
}

/// CSS named colors. `transparent` resolves to black channels.
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("aqua", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("silver", Rgb::new(192, 192, 192)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("olive", Rgb::new(128, 128, 0)),
    ("lime", Rgb::new(0, 255, 0)),
    ("teal", Rgb::new(0, 128, 128)),
    ("navy", Rgb::new(0, 0, 128)),
    ("purple", Rgb::new(128, 0, 128)),
    ("orange", Rgb::new(255, 165, 0)),
    ("darkgray", Rgb::new(169, 169, 169)),
    ("darkgrey", Rgb::new(169, 169, 169)),
    ("lightgray", Rgb::new(211, 211, 211)),
    ("lightgrey", Rgb::new(211, 211, 211)),
    ("dimgray", Rgb::new(105, 105, 105)),
    ("dimgrey", Rgb::new(105, 105, 105)),
    ("gainsboro", Rgb::new(220, 220, 220)),
    ("whitesmoke", Rgb::new(245, 245, 245)),
    ("brown", Rgb::new(165, 42, 42)),
    ("crimson", Rgb::new(220, 20, 60)),
    ("gold", Rgb::new(255, 215, 0)),
    ("indigo", Rgb::new(75, 0, 130)),
    ("pink", Rgb::new(255, 192, 203)),
    ("violet", Rgb::new(238, 130, 238)),
    ("transparent", Rgb::new(0, 0, 0)),
];

/// Parse any supported CSS color: hex, `rgb()/rgba()`, `hsl()/hsla()` or a named color.
///
/// Alpha components are accepted and discarded.
#[must_use]
pub fn parse_color(input: &str) -> Option<Rgb> {
    let value = input.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }

    if let Some(hex) = value.strip_prefix('#') {
        parse_hex(hex)
    } else if value.starts_with("rgb") {
        parse_rgb_function(&value)
    } else if value.starts_with("hsl") {
        parse_hsl_function(&value)
    } else {
        parse_named_color(&value)
    }
}

/// Look up a CSS named color (expects lowercase input).
#[must_use]
pub fn parse_named_color(name: &str) -> Option<Rgb> {
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, rgb)| *rgb)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
            Some(Rgb::new(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 | 8 => Some(Rgb::new(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

fn parse_rgb_function(value: &str) -> Option<Rgb> {
    static RGB_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = RGB_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"^rgba?\(\s*(\d{1,3})(?:\s*,\s*|\s+)(\d{1,3})(?:\s*,\s*|\s+)(\d{1,3})",
            r"\s*(?:[,/]\s*\d*\.?\d+%?\s*)?\)$",
        ))
        .expect("valid regex")
    });

    let caps = regex.captures(value)?;
    let channel = |i: usize| -> Option<u8> {
        let v: u16 = caps[i].parse().ok()?;
        u8::try_from(v.min(255)).ok()
    };
    Some(Rgb::new(channel(1)?, channel(2)?, channel(3)?))
}

fn parse_hsl_function(value: &str) -> Option<Rgb> {
    static HSL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = HSL_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"^hsla?\(\s*(-?\d*\.?\d+)(?:deg)?(?:\s*,\s*|\s+)(\d*\.?\d+)%",
            r"(?:\s*,\s*|\s+)(\d*\.?\d+)%\s*(?:[,/]\s*\d*\.?\d+%?\s*)?\)$",
        ))
        .expect("valid regex")
    });

    let caps = regex.captures(value)?;
    let h: f64 = caps[1].parse().ok()?;
    let s: f64 = caps[2].parse().ok()?;
    let l: f64 = caps[3].parse().ok()?;

    Some(hsl_to_rgb(Hsl {
        h: h.rem_euclid(360.0),
        s: s.clamp(0.0, 100.0) / 100.0,
        l: l.clamp(0.0, 100.0) / 100.0,
    }))
}

/// Convert RGB to HSL. Grayscale colors yield `h = 0, s = 0`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    // max is exactly one of the channels, so the equality checks are exact
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h * 60.0, s, l }
}

/// Convert HSL to RGB, rounding each channel to the nearest 8-bit value.
#[must_use]
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h.rem_euclid(360.0) / 360.0;
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);

    if s == 0.0 {
        let v = unit_to_channel(l);
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::new(
        unit_to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        unit_to_channel(hue_to_channel(p, q, h)),
        unit_to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Lowercase `#rrggbb` for a color.
#[must_use]
pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_hex()
}
