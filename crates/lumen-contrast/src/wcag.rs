//! WCAG 2.1 relative luminance and contrast ratio.
//!
//! <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
//! - AA: 4.5:1 for normal text, 3:1 for large text
//! - AAA: 7:1 for normal text, 4.5:1 for large text
//! - Non-text (UI components, graphics): 3:1

use crate::color::Rgb;
use lumen_core::WcagLevel;
use serde::Serialize;

/// AA threshold for normal text.
pub const AA_NORMAL: f64 = 4.5;
/// AA threshold for large text.
pub const AA_LARGE: f64 = 3.0;
/// AAA threshold for normal text.
pub const AAA_NORMAL: f64 = 7.0;
/// AAA threshold for large text.
pub const AAA_LARGE: f64 = 4.5;
/// Threshold for non-text UI components (1.4.11).
pub const NON_TEXT: f64 = 3.0;

/// Regular-weight text at or above this size (px) is large.
const LARGE_TEXT_PX: f64 = 24.0;
/// Bold text at or above this size (px) is large.
const LARGE_BOLD_TEXT_PX: f64 = 18.5;
const BOLD_WEIGHT: u16 = 700;

/// sRGB channel to linear light.
#[must_use]
pub fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance with ITU-R BT.709 weights, in `[0, 1]`.
#[must_use]
pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// WCAG contrast ratio in `[1, 21]`. Symmetric in its arguments.
#[must_use]
pub fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Whether text of this size and weight counts as large text. Boundaries are inclusive.
#[must_use]
pub fn is_large_text(font_size_px: f64, font_weight: u16) -> bool {
    if font_weight >= BOLD_WEIGHT {
        font_size_px >= LARGE_BOLD_TEXT_PX
    } else {
        font_size_px >= LARGE_TEXT_PX
    }
}

/// Minimum ratio for a level and text size. Level A carries no contrast
/// criterion and is held to AA.
#[must_use]
pub fn required_ratio(level: WcagLevel, is_large: bool) -> f64 {
    match (level, is_large) {
        (WcagLevel::A | WcagLevel::AA, false) => AA_NORMAL,
        (WcagLevel::A | WcagLevel::AA, true) => AA_LARGE,
        (WcagLevel::AAA, false) => AAA_NORMAL,
        (WcagLevel::AAA, true) => AAA_LARGE,
    }
}

/// Whether `ratio` satisfies the level's threshold for the given text size.
#[must_use]
pub fn meets_wcag(ratio: f64, level: WcagLevel, is_large: bool) -> bool {
    ratio >= required_ratio(level, is_large)
}

/// WCAG contrast of a color pair against every level and text size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WcagContrastResult {
    /// Contrast ratio
    pub ratio: f64,
    /// Passes AA for normal text
    #[serde(rename = "meetsAA")]
    pub meets_aa: bool,
    /// Passes AAA for normal text
    #[serde(rename = "meetsAAA")]
    pub meets_aaa: bool,
    /// Passes AA for large text
    #[serde(rename = "meetsAALargeText")]
    pub meets_aa_large_text: bool,
    /// Passes AAA for large text
    #[serde(rename = "meetsAAALargeText")]
    pub meets_aaa_large_text: bool,
}

/// Evaluate a foreground/background pair.
#[must_use]
pub fn check_wcag(fg: Rgb, bg: Rgb) -> WcagContrastResult {
    let ratio = contrast_ratio(fg, bg);
    WcagContrastResult {
        ratio,
        meets_aa: meets_wcag(ratio, WcagLevel::AA, false),
        meets_aaa: meets_wcag(ratio, WcagLevel::AAA, false),
        meets_aa_large_text: meets_wcag(ratio, WcagLevel::AA, true),
        meets_aaa_large_text: meets_wcag(ratio, WcagLevel::AAA, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_luminance_extremes() {
        assert!((relative_luminance(Rgb::WHITE) - 1.0).abs() < 1e-9);
        assert!(relative_luminance(Rgb::BLACK).abs() < 1e-9);
    }

    #[test]
    fn test_linearize_threshold() {
        // 10/255 = 0.0392 sits below the 0.03928 knee
        assert!((linearize(10) - (10.0 / 255.0) / 12.92).abs() < 1e-12);
        assert!(linearize(11) > linearize(10));
    }

    #[test]
    fn test_required_ratio_table() {
        assert_eq!(required_ratio(WcagLevel::AA, false), 4.5);
        assert_eq!(required_ratio(WcagLevel::AA, true), 3.0);
        assert_eq!(required_ratio(WcagLevel::AAA, false), 7.0);
        assert_eq!(required_ratio(WcagLevel::AAA, true), 4.5);
        assert_eq!(required_ratio(WcagLevel::A, false), 4.5);
    }

    #[test]
    fn test_check_wcag_mid_gray() {
        // #767676 on white is the classic "just passes AA" gray
        let result = check_wcag(Rgb::new(0x76, 0x76, 0x76), Rgb::WHITE);
        assert!(result.ratio > 4.5 && result.ratio < 4.6, "got {}", result.ratio);
        assert!(result.meets_aa);
        assert!(!result.meets_aaa);
        assert!(result.meets_aa_large_text);
        assert!(result.meets_aaa_large_text);
    }

    #[test]
    fn test_check_wcag_serialization() {
        let json = serde_json::to_value(check_wcag(Rgb::BLACK, Rgb::WHITE)).expect("serialize");
        assert_eq!(json["meetsAA"], true);
        assert_eq!(json["meetsAAALargeText"], true);
    }
}
