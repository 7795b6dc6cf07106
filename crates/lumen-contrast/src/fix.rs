//! Foreground color fix suggestion.
//!
//! Bisects the HSL lightness of the foreground, keeping hue and saturation,
//! until the pair reaches the target contrast. The search only ever pushes
//! the foreground's luminance away from the background's; a candidate that
//! crosses to the background's side counts as failing regardless of its
//! raw score.

use crate::apca::apca_contrast;
use crate::color::{hsl_to_rgb, rgb_to_hsl, Hsl, Rgb};
use crate::wcag::{contrast_ratio, relative_luminance};
use serde::Serialize;

const MAX_ITERATIONS: usize = 50;
const TOLERANCE: f64 = 0.01;

/// Result of a fix search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSuggestion {
    /// Suggested foreground
    pub foreground: Rgb,
    /// Ratio or |Lc| achieved by the suggestion
    pub value: f64,
    /// Ratio or |Lc| that was asked for
    pub target: f64,
    /// False when the target is out of reach inside the sRGB gamut
    pub meets_target: bool,
    /// Bisection steps taken
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Lighten,
    Darken,
}

impl Direction {
    fn for_pair(fg: Rgb, bg: Rgb) -> Self {
        let lf = relative_luminance(fg);
        let lb = relative_luminance(bg);
        if lf > lb {
            Self::Lighten
        } else if lf < lb {
            Self::Darken
        } else {
            // Same luminance: go where there is more room.
            let toward_white = 1.05 / (lb + 0.05);
            let toward_black = (lb + 0.05) / 0.05;
            if toward_white >= toward_black {
                Self::Lighten
            } else {
                Self::Darken
            }
        }
    }
}

/// Suggest a foreground meeting `target_ratio` against `bg`.
///
/// Returns `fg` unchanged if it already passes. When even white or black
/// cannot reach the target, returns that extreme with `meets_target` unset.
#[must_use]
pub fn suggest_fixed_color(fg: Rgb, bg: Rgb, target_ratio: f64) -> ColorSuggestion {
    let direction = Direction::for_pair(fg, bg);
    let bg_lum = relative_luminance(bg);
    bisect_lightness(
        fg,
        direction,
        target_ratio,
        |candidate| contrast_ratio(candidate, bg),
        |candidate| {
            let lum = relative_luminance(candidate);
            match direction {
                Direction::Lighten => lum > bg_lum,
                Direction::Darken => lum < bg_lum,
            }
        },
    )
}

/// Suggest a foreground whose `|Lc|` against `bg` reaches `target_lc`.
///
/// Polarity is held fixed: a lightened foreground must keep a negative Lc
/// and a darkened one a positive Lc.
#[must_use]
pub fn suggest_fixed_color_for_apca(fg: Rgb, bg: Rgb, target_lc: f64) -> ColorSuggestion {
    let direction = Direction::for_pair(fg, bg);
    bisect_lightness(
        fg,
        direction,
        target_lc.abs(),
        |candidate| apca_contrast(candidate, bg).abs(),
        |candidate| {
            let lc = apca_contrast(candidate, bg);
            match direction {
                Direction::Lighten => lc < 0.0,
                Direction::Darken => lc > 0.0,
            }
        },
    )
}

fn bisect_lightness<M, S>(
    fg: Rgb,
    direction: Direction,
    target: f64,
    measure: M,
    on_side: S,
) -> ColorSuggestion
where
    M: Fn(Rgb) -> f64,
    S: Fn(Rgb) -> bool,
{
    let passes = |candidate: Rgb| on_side(candidate) && measure(candidate) >= target;

    let start = measure(fg);
    if passes(fg) {
        return ColorSuggestion {
            foreground: fg,
            value: start,
            target,
            meets_target: true,
            iterations: 0,
        };
    }

    let hsl = rgb_to_hsl(fg);
    let with_lightness = |l: f64| hsl_to_rgb(Hsl { l, ..hsl });

    // `failing` never passes and `passing` always does.
    let (mut failing, mut passing) = match direction {
        Direction::Lighten => (hsl.l, 1.0),
        Direction::Darken => (hsl.l, 0.0),
    };

    let extreme = with_lightness(passing);
    if !passes(extreme) {
        tracing::debug!(
            "Target {:.2} unreachable from {} (best {:.2})",
            target,
            fg,
            measure(extreme)
        );
        return ColorSuggestion {
            foreground: extreme,
            value: measure(extreme),
            target,
            meets_target: false,
            iterations: 0,
        };
    }

    let mut best = extreme;
    let mut iterations = 0;
    while iterations < MAX_ITERATIONS {
        iterations += 1;
        let mid = (failing + passing) / 2.0;
        let candidate = with_lightness(mid);
        if passes(candidate) {
            passing = mid;
            best = candidate;
            if measure(candidate) - target <= TOLERANCE {
                break;
            }
        } else {
            failing = mid;
        }
        if (passing - failing).abs() < f64::EPSILON {
            break;
        }
    }

    ColorSuggestion {
        foreground: best,
        value: measure(best),
        target,
        meets_target: true,
        iterations,
    }
}
