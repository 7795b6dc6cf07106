//! Lumen Contrast - color contrast analysis.
//!
//! Parses CSS colors, computes WCAG 2.1 contrast ratios and APCA lightness
//! contrast, and suggests minimally adjusted foreground colors for failing
//! pairs.
//!
//! # Example
//!
//! ```rust
//! use lumen_contrast::{contrast_ratio, parse_color, suggest_fixed_color};
//!
//! let fg = parse_color("#999").expect("valid color");
//! let bg = parse_color("white").expect("valid color");
//! assert!(contrast_ratio(fg, bg) < 4.5);
//!
//! let fix = suggest_fixed_color(fg, bg, 4.5);
//! assert!(fix.meets_target);
//! assert!(contrast_ratio(fix.foreground, bg) >= 4.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod analysis;
pub mod apca;
pub mod color;
pub mod fix;
pub mod wcag;

// Re-export commonly used types
pub use analysis::{
    analyze_samples, ContrastOptions, ContrastReport, ContrastSample, ContrastSummary,
    TextSizeCounts,
};
pub use apca::{apca_contrast, check_apca, meets_apca, ApcaCategory, ApcaContrastResult};
pub use color::{hsl_to_rgb, parse_color, rgb_to_hex, rgb_to_hsl, Hsl, Rgb};
pub use fix::{suggest_fixed_color, suggest_fixed_color_for_apca, ColorSuggestion};
pub use wcag::{
    check_wcag, contrast_ratio, is_large_text, meets_wcag, relative_luminance, required_ratio,
    WcagContrastResult,
};
