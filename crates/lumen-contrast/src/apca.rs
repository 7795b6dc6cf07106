//! APCA (Accessible Perceptual Contrast Algorithm) lightness contrast.
//!
//! Uses the APCA-W3 0.1.9 constants. Lc is signed and polarity-sensitive:
//! positive for dark text on a light background, negative for light text on
//! a dark background. Black on white is about Lc 106, white on black about
//! Lc -108.

use crate::color::Rgb;
use serde::Serialize;

const MAIN_TRC: f64 = 2.4;
const S_RCO: f64 = 0.212_672_9;
const S_GCO: f64 = 0.715_152_2;
const S_BCO: f64 = 0.072_175_0;

const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_BG: f64 = 0.65;
const REV_TXT: f64 = 0.62;

const BLK_THRS: f64 = 0.022;
const BLK_CLMP: f64 = 1.414;

const SCALE_BOW: f64 = 1.14;
const SCALE_WOB: f64 = 1.14;
const LO_BOW_OFFSET: f64 = 0.027;
const LO_WOB_OFFSET: f64 = 0.027;
const DELTA_Y_MIN: f64 = 0.0005;
const LO_CLIP: f64 = 0.1;

/// Minimum |Lc| for body text.
pub const BODY_TEXT_LC: f64 = 75.0;
/// Minimum |Lc| for large text.
pub const LARGE_TEXT_LC: f64 = 60.0;
/// Minimum |Lc| for non-text elements.
pub const NON_TEXT_LC: f64 = 45.0;

/// What kind of content an APCA threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApcaCategory {
    /// Body copy
    BodyText,
    /// Large or bold text
    LargeText,
    /// Icons, borders, focus indicators
    NonText,
}

impl ApcaCategory {
    /// Minimum |Lc| for the category.
    #[must_use]
    pub fn min_lc(&self) -> f64 {
        match self {
            Self::BodyText => BODY_TEXT_LC,
            Self::LargeText => LARGE_TEXT_LC,
            Self::NonText => NON_TEXT_LC,
        }
    }
}

/// Screen luminance (Y) with the APCA soft clamp for near-black.
///
/// This is a plain power curve, not the piecewise WCAG linearization.
#[must_use]
pub fn apca_luminance(rgb: Rgb) -> f64 {
    let channel = |c: u8| (f64::from(c) / 255.0).powf(MAIN_TRC);
    let y = S_RCO * channel(rgb.r) + S_GCO * channel(rgb.g) + S_BCO * channel(rgb.b);
    if y > BLK_THRS {
        y
    } else {
        y + (BLK_THRS - y).powf(BLK_CLMP)
    }
}

/// Lightness contrast of `text` over `bg`.
#[must_use]
pub fn apca_contrast(text: Rgb, bg: Rgb) -> f64 {
    let txt_y = apca_luminance(text);
    let bg_y = apca_luminance(bg);

    if (bg_y - txt_y).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let output = if bg_y > txt_y {
        // normal polarity, dark text on light background
        let sapc = (bg_y.powf(NORM_BG) - txt_y.powf(NORM_TXT)) * SCALE_BOW;
        if sapc < LO_CLIP {
            0.0
        } else {
            sapc - LO_BOW_OFFSET
        }
    } else {
        // reverse polarity, light text on dark background
        let sapc = (bg_y.powf(REV_BG) - txt_y.powf(REV_TXT)) * SCALE_WOB;
        if sapc > -LO_CLIP {
            0.0
        } else {
            sapc + LO_WOB_OFFSET
        }
    };

    output * 100.0
}

/// Whether `|lc|` reaches the category threshold.
#[must_use]
pub fn meets_apca(lc: f64, category: ApcaCategory) -> bool {
    lc.abs() >= category.min_lc()
}

/// APCA contrast of a pair against every category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApcaContrastResult {
    /// Signed lightness contrast
    pub lc: f64,
    /// Passes the body text threshold
    pub meets_body: bool,
    /// Passes the large text threshold
    pub meets_large: bool,
    /// Passes the non-text threshold
    pub meets_non_text: bool,
}

/// Evaluate a text/background pair.
#[must_use]
pub fn check_apca(text: Rgb, bg: Rgb) -> ApcaContrastResult {
    let lc = apca_contrast(text, bg);
    ApcaContrastResult {
        lc,
        meets_body: meets_apca(lc, ApcaCategory::BodyText),
        meets_large: meets_apca(lc, ApcaCategory::LargeText),
        meets_non_text: meets_apca(lc, ApcaCategory::NonText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference values from the apca-w3 npm package
    #[test]
    fn test_black_on_white() {
        let lc = apca_contrast(Rgb::BLACK, Rgb::WHITE);
        assert!((lc - 106.0).abs() < 1.0, "got {lc}");
    }

    #[test]
    fn test_white_on_black() {
        let lc = apca_contrast(Rgb::WHITE, Rgb::BLACK);
        assert!((lc - (-107.9)).abs() < 1.0, "got {lc}");
    }

    #[test]
    fn test_gray_on_white() {
        let lc = apca_contrast(Rgb::new(0x76, 0x76, 0x76), Rgb::WHITE);
        assert!((lc - 71.6).abs() < 1.0, "got {lc}");
    }

    #[test]
    fn test_slate_on_white() {
        let lc = apca_contrast(Rgb::new(0x1e, 0x29, 0x3b), Rgb::WHITE);
        assert!((lc - 101.4).abs() < 1.0, "got {lc}");
    }

    #[test]
    fn test_same_color_is_zero() {
        let gray = Rgb::new(128, 128, 128);
        assert!(apca_contrast(gray, gray).abs() < 1.0);
    }

    #[test]
    fn test_polarity_changes_magnitude() {
        let dark = Rgb::new(0x33, 0x33, 0x33);
        let light = Rgb::new(0xee, 0xee, 0xee);
        let normal = apca_contrast(dark, light);
        let reverse = apca_contrast(light, dark);
        assert!(normal > 0.0 && reverse < 0.0);
        assert!((normal.abs() - reverse.abs()).abs() > 0.5);
    }

    #[test]
    fn test_thresholds_compare_absolute_value() {
        assert!(meets_apca(-80.0, ApcaCategory::BodyText));
        assert!(!meets_apca(74.9, ApcaCategory::BodyText));
        assert!(meets_apca(60.0, ApcaCategory::LargeText));
        assert!(meets_apca(-45.0, ApcaCategory::NonText));
        assert!(!meets_apca(44.0, ApcaCategory::NonText));
    }

    #[test]
    fn test_check_apca() {
        let result = check_apca(Rgb::new(0x76, 0x76, 0x76), Rgb::WHITE);
        assert!(!result.meets_body);
        assert!(result.meets_large);
        assert!(result.meets_non_text);
    }
}
